// src/events/types.rs
//
// Domain events emitted by the sync layer.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events carry only the data needed to react

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($event:ident) => {
        impl DomainEvent for $event {
            fn event_id(&self) -> Uuid { self.event_id }
            fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
            fn event_type(&self) -> &'static str { stringify!($event) }
        }
    };
}

// ============================================================================
// SYNC EVENTS
// ============================================================================

/// Emitted after a non-empty trending page replaced the cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingSynced {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_count: usize,
}

impl TrendingSynced {
    pub fn new(movie_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            movie_count,
        }
    }
}

impl_domain_event!(TrendingSynced);

/// Why cached rows were served instead of fresh ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    Offline,
    EmptyUpstream,
    NetworkFault,
}

/// Emitted whenever the cache stands in for the network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFallbackServed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub reason: FallbackReason,
    pub movie_count: usize,
}

impl CacheFallbackServed {
    pub fn new(reason: FallbackReason, movie_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            reason,
            movie_count,
        }
    }
}

impl_domain_event!(CacheFallbackServed);

// ============================================================================
// SEARCH EVENTS
// ============================================================================

/// Emitted when a debounced query is dispatched against the cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDispatched {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub query: String,
    pub generation: u64,
}

impl SearchDispatched {
    pub fn new(query: String, generation: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            query,
            generation,
        }
    }
}

impl_domain_event!(SearchDispatched);
