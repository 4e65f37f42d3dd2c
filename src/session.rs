// Per-agent booking session state: search outcome and selected itinerary.
//
// Sessions live in a shared store keyed by an opaque id and expire after a
// period without access. Reads hand out clones so callers never hold a shard
// lock across an await point.

use crate::aggregator::{FareQuote, FareRules, FlightOption, SsrResponse};
use crate::error::{PortalError, PortalResult};
use crate::search::{PassengerCounts, SearchCriteria};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        SessionId(format!("{:032x}", rand::random::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub trace_id: String,
    pub flights: Vec<FlightOption>,
    pub counts: PassengerCounts,
}

// Everything the booking form needs about the chosen itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedFlight {
    pub flight: FlightOption,
    pub fare_quote: FareQuote,
    pub fare_rules: FareRules,
    pub ssr: SsrResponse,
    pub trace_id: String,
    pub counts: PassengerCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingSession {
    criteria: Option<SearchCriteria>,
    search: Option<SearchOutcome>,
    selected: Option<SelectedFlight>,
}

impl BookingSession {
    // A new search invalidates whatever was selected from the previous one
    pub fn record_search(&mut self, criteria: SearchCriteria, outcome: SearchOutcome) {
        self.criteria = Some(criteria);
        self.search = Some(outcome);
        self.selected = None;
    }

    pub fn select(&mut self, selected: SelectedFlight) {
        self.selected = Some(selected);
    }

    pub fn criteria(&self) -> Option<&SearchCriteria> {
        self.criteria.as_ref()
    }

    pub fn search(&self) -> PortalResult<&SearchOutcome> {
        self.search
            .as_ref()
            .ok_or_else(|| PortalError::missing_state("No search results, please search again"))
    }

    pub fn selected(&self) -> PortalResult<&SelectedFlight> {
        self.selected
            .as_ref()
            .ok_or_else(|| PortalError::missing_state("No flight selected, please search again"))
    }

    // Booking done: keep the last criteria so the search form can be refilled
    pub fn complete(&mut self) {
        self.search = None;
        self.selected = None;
    }
}

#[derive(Debug, Default)]
pub struct SessionStats {
    pub created: AtomicUsize,
    pub hits: AtomicUsize,
    pub misses: AtomicUsize,
    pub expired: AtomicUsize,
    pub removed: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStatsReport {
    pub active: usize,
    pub created: usize,
    pub hits: usize,
    pub misses: usize,
    pub expired: usize,
    pub removed: usize,
}

struct SessionEntry {
    session: BookingSession,
    last_accessed: Instant,
}

impl SessionEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_accessed.elapsed() > ttl
    }
}

pub struct SessionStore {
    sessions: DashMap<SessionId, SessionEntry>,
    ttl: Duration,
    stats: SessionStats,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
            stats: SessionStats::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn create(&self) -> SessionId {
        let id = SessionId::generate();
        self.sessions.insert(
            id.clone(),
            SessionEntry {
                session: BookingSession::default(),
                last_accessed: Instant::now(),
            },
        );
        self.stats.created.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(session = %id, "session created");
        id
    }

    pub fn get(&self, id: &SessionId) -> PortalResult<BookingSession> {
        self.update(id, |session| session.clone())
    }

    /// Runs `f` against the live session and refreshes its idle timer.
    /// Expired sessions are dropped and reported as missing state.
    pub fn update<R>(&self, id: &SessionId, f: impl FnOnce(&mut BookingSession) -> R) -> PortalResult<R> {
        let expired = match self.sessions.get_mut(id) {
            Some(mut entry) if !entry.is_expired(self.ttl) => {
                entry.last_accessed = Instant::now();
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(f(&mut entry.session));
            }
            Some(_) => true,
            None => false,
        };

        // Shard guard released above before removing
        if expired && self.sessions.remove(id).is_some() {
            self.stats.expired.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(session = %id, "session expired");
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        Err(PortalError::missing_state(
            "Your session has expired, please search again",
        ))
    }

    pub fn remove(&self, id: &SessionId) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            self.stats.removed.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !entry.is_expired(self.ttl));
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            self.stats.expired.fetch_add(purged, Ordering::Relaxed);
            tracing::debug!(purged, "expired sessions purged");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn stats(&self) -> SessionStatsReport {
        SessionStatsReport {
            active: self.sessions.len(),
            created: self.stats.created.load(Ordering::Relaxed),
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            expired: self.stats.expired.load(Ordering::Relaxed),
            removed: self.stats.removed.load(Ordering::Relaxed),
        }
    }
}
