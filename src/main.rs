// src/main.rs
//
// moviehub - command-line front end for the movie browsing core.
// Prints the projected screen state instead of rendering it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;

use moviehub::application::{
    AppState, MovieDetailDto, MovieDto, MovieListDto, MovieListUiState, SearchGate, SearchTrigger,
};
use moviehub::config::AppConfig;
use moviehub::db::get_database_stats;
use moviehub::integrations::{ConnectivityProbe, StaticConnectivity, SystemConnectivityProbe};

#[derive(Parser, Debug)]
#[command(name = "moviehub", version, about = "Browse trending movies with an offline cache")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Act as if the network were unreachable
    #[arg(long)]
    offline: bool,

    /// Print state as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show trending movies (refreshing the cache when online)
    Trending,
    /// Search cached movies by title or overview
    Search { query: String },
    /// Show one cached movie
    Show { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    let connectivity: Arc<dyn ConnectivityProbe> = if cli.offline {
        Arc::new(StaticConnectivity::new(false))
    } else {
        Arc::new(SystemConnectivityProbe::new())
    };

    let state = AppState::new(config, connectivity).context("failed to initialize")?;

    match get_database_stats(&*state.pool.get()?) {
        Ok(stats) => log::debug!(
            "cache: {} movies, {} bytes",
            stats.movie_count,
            stats.size_bytes
        ),
        Err(e) => log::warn!("could not read cache stats: {}", e),
    }

    match cli.command {
        Command::Trending => trending(&state, cli.json).await,
        Command::Search { query } => search(&state, &query, cli.json).await,
        Command::Show { id } => show(&state, id, cli.json).await,
    }
}

async fn trending(state: &AppState, json: bool) -> Result<()> {
    let controller = state.movie_list();
    let mut rx = controller.subscribe();

    let settled = tokio::time::timeout(
        state.config.request_timeout() + Duration::from_secs(1),
        rx.wait_for(|ui| !ui.is_loading),
    )
    .await
    .context("timed out waiting for trending movies")?
    .context("list controller stopped")?
    .clone();

    controller.shutdown();
    print_list(state, &settled, json)
}

async fn search(state: &AppState, query: &str, json: bool) -> Result<()> {
    let mut ui = MovieListUiState {
        search_query: query.to_string(),
        ..MovieListUiState::default()
    };

    let mut stream = match SearchGate::new(state.config.min_search_length).admit(query.to_string()) {
        Some(SearchTrigger::Trending) => state.sync.get_trending(),
        Some(SearchTrigger::Search(query)) => state.sync.search_movies(&query),
        None => bail!(
            "search query must be at least {} characters",
            state.config.min_search_length
        ),
    };

    while let Some(result) = stream.next().await {
        let terminal = result.is_terminal();
        ui.apply(result);
        if terminal {
            break;
        }
    }

    print_list(state, &ui, json)
}

async fn show(state: &AppState, id: i64, json: bool) -> Result<()> {
    let controller = state.movie_detail();
    controller.load_movie(id).await;
    let ui = controller.state();
    let dto = MovieDetailDto::with_image_base(&ui, &state.config.image_base_url);

    if json {
        println!("{}", serde_json::to_string_pretty(&dto)?);
        return Ok(());
    }

    if let Some(error) = &dto.error {
        bail!("{}", error);
    }
    if let Some(movie) = &dto.movie {
        print_movie(movie);
        if !movie.poster_url.is_empty() {
            println!("{:>8}  {}", "", movie.poster_url);
        }
        if !movie.overview.is_empty() {
            println!();
            println!("{}", movie.overview);
        }
    }
    Ok(())
}

fn print_list(state: &AppState, ui: &MovieListUiState, json: bool) -> Result<()> {
    let dto = MovieListDto::with_image_base(ui, &state.config.image_base_url);

    if json {
        println!("{}", serde_json::to_string_pretty(&dto)?);
        return Ok(());
    }

    for movie in &dto.movies {
        print_movie(movie);
    }

    if let Some(error) = &dto.error {
        if dto.movies.is_empty() {
            bail!("{}", error);
        }
        log::warn!("{}", error);
    } else if dto.movies.is_empty() {
        println!("no movies");
    }
    Ok(())
}

fn print_movie(movie: &MovieDto) {
    let year = movie
        .release_year
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();

    println!(
        "{:>8}  {}{}  ★ {:.1} [{}]",
        movie.id, movie.title, year, movie.vote_average, movie.vote_count
    );
}
