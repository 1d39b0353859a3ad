use serde::{Deserialize, Serialize};
use status_core::domain::{Incident, IncidentHistoryEntry, IncidentId, ServiceState};
use status_core::error::AppError;

use crate::config::{clamp_recent_count, DEFAULT_RECENT_COUNT};

pub mod http;

/// The status API as seen by the dashboard. Calls are blocking and single-shot;
/// the session runs them off its loop and never retries.
pub trait IncidentApi: Send + Sync {
    /// Most recent incidents first.
    fn fetch_recent(&self, query: &RecentQuery) -> Result<Vec<Incident>, AppError>;

    /// History of one incident, oldest entry first.
    fn fetch_history(&self, id: IncidentId) -> Result<Vec<IncidentHistoryEntry>, AppError>;

    /// Ask the server to synthesize an incident, optionally in a given state.
    fn generate(&self, state: Option<ServiceState>) -> Result<Incident, AppError>;

    /// Transition `incident` to operational and return the server's record.
    fn resolve(&self, incident: &Incident) -> Result<Incident, AppError>;

    fn health(&self) -> Result<HealthStatus, AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentQuery {
    count: u32,
    start_date: Option<String>,
}

impl RecentQuery {
    /// `count` is clamped to what the server accepts (`1..=50`).
    pub fn new(count: u32) -> Self {
        Self {
            count: clamp_recent_count(count),
            start_date: None,
        }
    }

    /// Only incidents created at or after `start_date` (ISO timestamp).
    pub fn since(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn start_date(&self) -> Option<&str> {
        self.start_date.as_deref()
    }
}

impl Default for RecentQuery {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_COUNT)
    }
}

/// Payload of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
