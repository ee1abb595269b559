// src/repositories/movie_cache_repository.rs
//
// Local movie cache
//
// The table mirrors the last successful trending fetch. Observers re-run
// their query whenever the table changes and receive the full ordered list.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use rusqlite::{params, Row};
use tokio::sync::watch;

use crate::db::{get_connection, run_blocking, ConnectionPool};
use crate::domain::Movie;
use crate::error::{AppError, AppResult};

/// Stream of full result sets, re-emitted after every table change
pub type MovieListStream = BoxStream<'static, AppResult<Vec<Movie>>>;

pub trait MovieCacheRepository: Send + Sync {
    /// Atomically swap the cached set for `movies` (last duplicate id wins)
    fn replace_all(&self, movies: &[Movie]) -> AppResult<()>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Movie>>;
    fn list_all(&self) -> AppResult<Vec<Movie>>;
    fn search(&self, query: &str) -> AppResult<Vec<Movie>>;
    fn observe_all(&self) -> MovieListStream;
    fn observe_search(&self, query: &str) -> MovieListStream;
    fn count(&self) -> AppResult<usize>;
}

const SELECT_COLUMNS: &str = "SELECT id, title, overview, poster_path, backdrop_path,
        release_date, vote_average, vote_count, popularity, adult,
        original_language, original_title
 FROM movies";

const POPULARITY_ORDER: &str = "ORDER BY popularity DESC NULLS LAST";

pub struct SqliteMovieCacheRepository {
    pool: Arc<ConnectionPool>,
    /// Bumped after every committed write
    invalidation: watch::Sender<u64>,
}

impl SqliteMovieCacheRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        let (invalidation, _) = watch::channel(0);
        Self { pool, invalidation }
    }

    /// Map database row to Movie - returns rusqlite::Error for query_map compatibility
    fn row_to_movie(row: &Row) -> Result<Movie, rusqlite::Error> {
        let vote_count: i64 = row.get("vote_count")?;
        let vote_count = u32::try_from(vote_count)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Movie {
            id: row.get("id")?,
            title: row.get("title")?,
            overview: row.get("overview")?,
            poster_path: row.get("poster_path")?,
            backdrop_path: row.get("backdrop_path")?,
            release_date: row.get("release_date")?,
            vote_average: row.get("vote_average")?,
            vote_count,
            popularity: row.get("popularity")?,
            adult: row.get("adult")?,
            original_language: row.get("original_language")?,
            original_title: row.get("original_title")?,
        })
    }

    fn query_all(pool: &ConnectionPool) -> AppResult<Vec<Movie>> {
        let conn = get_connection(pool)?;

        let mut stmt = conn.prepare(&format!("{} {}", SELECT_COLUMNS, POPULARITY_ORDER))?;

        let movies: Vec<Movie> = stmt
            .query_map([], Self::row_to_movie)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(movies)
    }

    fn query_search(pool: &ConnectionPool, query: &str) -> AppResult<Vec<Movie>> {
        let conn = get_connection(pool)?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE title LIKE ?1 ESCAPE '\\' OR overview LIKE ?1 ESCAPE '\\' {}",
            SELECT_COLUMNS, POPULARITY_ORDER
        ))?;

        let pattern = format!("%{}%", escape_like(query));

        let movies: Vec<Movie> = stmt
            .query_map(params![pattern], Self::row_to_movie)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(movies)
    }

    fn observe<F>(&self, query: F) -> MovieListStream
    where
        F: Fn(&ConnectionPool) -> AppResult<Vec<Movie>> + Send + Sync + 'static,
    {
        let pool = Arc::clone(&self.pool);
        let query = Arc::new(query);

        // One tick for the current contents, then one per committed write
        let ticks = stream::unfold((self.invalidation.subscribe(), true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            rx.borrow_and_update();
            Some(((), (rx, false)))
        });

        ticks
            .then(move |_| {
                let pool = Arc::clone(&pool);
                let query = Arc::clone(&query);
                run_blocking(move || query(pool.as_ref()))
            })
            .boxed()
    }
}

/// Make `%`, `_` and the escape character match literally in a LIKE pattern
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl MovieCacheRepository for SqliteMovieCacheRepository {
    fn replace_all(&self, movies: &[Movie]) -> AppResult<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM movies", [])?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO movies (
                    id, title, overview, poster_path, backdrop_path,
                    release_date, vote_average, vote_count, popularity, adult,
                    original_language, original_title
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;

            for movie in movies {
                stmt.execute(params![
                    movie.id,
                    movie.title,
                    movie.overview,
                    movie.poster_path,
                    movie.backdrop_path,
                    movie.release_date,
                    movie.vote_average,
                    movie.vote_count as i64,
                    movie.popularity,
                    movie.adult,
                    movie.original_language,
                    movie.original_title,
                ])?;
            }
        }

        tx.commit()?;

        self.invalidation.send_modify(|version| *version += 1);
        log::debug!("movie cache replaced with {} records", movies.len());

        Ok(())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Movie>> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;

        match stmt.query_row(params![id], Self::row_to_movie) {
            Ok(movie) => Ok(Some(movie)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Movie>> {
        Self::query_all(&self.pool)
    }

    fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        Self::query_search(&self.pool, query)
    }

    fn observe_all(&self) -> MovieListStream {
        self.observe(Self::query_all)
    }

    fn observe_search(&self, query: &str) -> MovieListStream {
        let query = query.to_string();
        self.observe(move |pool| Self::query_search(pool, &query))
    }

    fn count(&self) -> AppResult<usize> {
        let conn = get_connection(&self.pool)?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool_at, initialize_database};
    use std::collections::BTreeSet;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SqliteMovieCacheRepository) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool_at(&dir.path().join("cache.db")).unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        (dir, SqliteMovieCacheRepository::new(Arc::new(pool)))
    }

    fn movie(id: i64, title: &str, popularity: Option<f64>) -> Movie {
        let mut movie = Movie::new(id, title);
        movie.popularity = popularity;
        movie
    }

    fn ids(movies: &[Movie]) -> Vec<i64> {
        movies.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_list_orders_by_popularity_with_nulls_last() {
        let (_dir, repo) = setup();

        repo.replace_all(&[
            movie(1, "Low", Some(1.5)),
            movie(2, "Unknown", None),
            movie(3, "High", Some(99.0)),
            movie(4, "Mid", Some(10.0)),
        ])
        .unwrap();

        assert_eq!(ids(&repo.list_all().unwrap()), vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_round_trip_keeps_every_field() {
        let (_dir, repo) = setup();

        let mut full = movie(42, "Arrival", Some(55.5));
        full.overview = "Linguist meets heptapods".to_string();
        full.poster_path = Some("/arrival.jpg".to_string());
        full.release_date = Some("2016-11-10".to_string());
        full.vote_average = 7.6;
        full.vote_count = 18000;
        full.adult = Some(false);
        full.original_language = Some("en".to_string());
        full.original_title = Some("Arrival".to_string());

        repo.replace_all(std::slice::from_ref(&full)).unwrap();

        assert_eq!(repo.get_by_id(42).unwrap(), Some(full));
        assert_eq!(repo.get_by_id(7).unwrap(), None);
    }

    #[test]
    fn test_replace_drops_previous_set() {
        let (_dir, repo) = setup();

        repo.replace_all(&[movie(1, "Old", Some(1.0)), movie(2, "Older", Some(2.0))])
            .unwrap();
        repo.replace_all(&[movie(3, "New", Some(3.0))]).unwrap();

        assert_eq!(ids(&repo.list_all().unwrap()), vec![3]);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ids_last_one_wins() {
        let (_dir, repo) = setup();

        repo.replace_all(&[
            movie(1, "First draft", Some(5.0)),
            movie(2, "Other", Some(4.0)),
            movie(1, "Final cut", Some(3.0)),
        ])
        .unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(ids(&all), vec![2, 1]);
        assert_eq!(all[1].title, "Final cut");
    }

    #[test]
    fn test_search_matches_title_or_overview() {
        let (_dir, repo) = setup();

        let mut by_overview = movie(2, "The Dark Knight", Some(80.0));
        by_overview.overview = "Batman raises the stakes".to_string();

        repo.replace_all(&[
            movie(1, "Batman Begins", Some(50.0)),
            by_overview,
            movie(3, "Heat", Some(90.0)),
        ])
        .unwrap();

        assert_eq!(ids(&repo.search("bat").unwrap()), vec![2, 1]);
        assert_eq!(ids(&repo.search("heat").unwrap()), vec![3]);
        assert!(repo.search("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_search_wildcards_are_literal() {
        let (_dir, repo) = setup();

        repo.replace_all(&[movie(1, "100% Wolf", Some(1.0)), movie(2, "Wolfwalkers", Some(2.0))])
            .unwrap();

        assert_eq!(ids(&repo.search("0%").unwrap()), vec![1]);
        assert!(repo.search("_olf_").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_observe_all_pushes_full_set_on_change() {
        let (_dir, repo) = setup();
        repo.replace_all(&[movie(1, "A", Some(1.0))]).unwrap();

        let mut stream = repo.observe_all();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(ids(&first), vec![1]);

        repo.replace_all(&[movie(2, "B", Some(1.0)), movie(3, "C", Some(2.0))])
            .unwrap();

        let second = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(ids(&second), vec![3, 2]);
    }

    #[tokio::test]
    async fn test_observe_search_requeries_after_change() {
        let (_dir, repo) = setup();
        repo.replace_all(&[movie(1, "Alien", Some(1.0))]).unwrap();

        let mut stream = repo.observe_search("ali");
        assert_eq!(ids(&stream.next().await.unwrap().unwrap()), vec![1]);

        repo.replace_all(&[movie(2, "Aliens", Some(9.0)), movie(3, "Heat", Some(5.0))])
            .unwrap();

        let refreshed = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(ids(&refreshed), vec![2]);
    }

    #[test]
    fn test_concurrent_readers_never_see_partial_replace() {
        let (_dir, repo) = setup();
        let repo = Arc::new(repo);

        let old_set: Vec<Movie> = (1..=50).map(|id| movie(id, "old", Some(id as f64))).collect();
        let new_set: Vec<Movie> =
            (101..=180).map(|id| movie(id, "new", Some(id as f64))).collect();
        repo.replace_all(&old_set).unwrap();

        let old_ids: BTreeSet<i64> = old_set.iter().map(|m| m.id).collect();
        let new_ids: BTreeSet<i64> = new_set.iter().map(|m| m.id).collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|_| repo.list_all().unwrap().iter().map(|m| m.id).collect())
                        .collect::<Vec<BTreeSet<i64>>>()
                })
            })
            .collect();

        for _ in 0..10 {
            repo.replace_all(&new_set).unwrap();
            repo.replace_all(&old_set).unwrap();
        }

        for reader in readers {
            for seen in reader.join().unwrap() {
                assert!(
                    seen == old_ids || seen == new_ids,
                    "reader observed a mixed set of {} rows",
                    seen.len()
                );
            }
        }
    }
}
