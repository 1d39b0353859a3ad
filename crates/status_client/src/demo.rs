use std::sync::{Mutex, MutexGuard};

use status_core::demo::{demo_batch, demo_incident, demo_state_for};
use status_core::domain::{Incident, IncidentHistoryEntry, IncidentId, ServiceState};
use status_core::error::AppError;
use status_core::normalize::timestamps::{now_rfc3339_utc, parse_server_timestamp};
use time::OffsetDateTime;

use crate::api::{HealthStatus, IncidentApi, RecentQuery};

struct DemoState {
    incidents: Vec<Incident>,
    // Shared by incidents and history entries so history ids never collide.
    next_id: i64,
}

/// In-memory stand-in for the status API, used by `--demo` and tests.
///
/// Generated incidents get increasing ids; resolving updates the stored record in place
/// and appends a history entry, so the returned record keeps its identifier.
pub struct DemoApi {
    state: Mutex<DemoState>,
}

impl DemoApi {
    pub fn new(seed_count: usize) -> Self {
        Self::with_clock(seed_count, OffsetDateTime::now_utc())
    }

    pub fn with_clock(seed_count: usize, now: OffsetDateTime) -> Self {
        let incidents = demo_batch(seed_count, now);
        let next_id = incidents.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(DemoState {
                incidents,
                next_id,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, DemoState>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::new("DEMO_STATE_POISONED", "Demo API state is unavailable"))
    }
}

fn not_found(id: IncidentId) -> AppError {
    AppError::new("API_STATUS_FAILED", "Incident not found")
        .with_details(format!("status=404; id={id}"))
}

impl IncidentApi for DemoApi {
    fn fetch_recent(&self, query: &RecentQuery) -> Result<Vec<Incident>, AppError> {
        let state = self.lock()?;
        let since = query.start_date().and_then(parse_server_timestamp);
        Ok(state
            .incidents
            .iter()
            .filter(|i| match since {
                Some(since) => parse_server_timestamp(&i.created_at).is_some_and(|t| t >= since),
                None => true,
            })
            .take(query.count() as usize)
            .cloned()
            .collect())
    }

    fn fetch_history(&self, id: IncidentId) -> Result<Vec<IncidentHistoryEntry>, AppError> {
        let state = self.lock()?;
        state
            .incidents
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.history.clone())
            .ok_or_else(|| not_found(id))
    }

    fn generate(&self, hint: Option<ServiceState>) -> Result<Incident, AppError> {
        let mut state = self.lock()?;
        let id = state.next_id;
        state.next_id += 1;
        let incident = demo_incident(
            id,
            hint.unwrap_or_else(|| demo_state_for(id)),
            OffsetDateTime::now_utc(),
        );
        state.incidents.insert(0, incident.clone());
        Ok(Incident {
            history: Vec::new(),
            ..incident
        })
    }

    fn resolve(&self, incident: &Incident) -> Result<Incident, AppError> {
        let recorded_at = now_rfc3339_utc()?;
        let mut state = self.lock()?;
        let history_id = state.next_id;
        state.next_id += 1;
        let stored = state
            .incidents
            .iter_mut()
            .find(|i| i.id == incident.id)
            .ok_or_else(|| not_found(incident.id))?;

        stored.previous_state = stored.current_state;
        stored.current_state = ServiceState::Operational;
        stored.history.push(IncidentHistoryEntry {
            id: history_id,
            incident_id: stored.id,
            recorded_at,
            service: stored.service.clone(),
            previous_state: stored.previous_state,
            current_state: ServiceState::Operational,
            incident: stored.incident.clone(),
        });
        Ok(stored.clone())
    }

    fn health(&self) -> Result<HealthStatus, AppError> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: now_rfc3339_utc()?,
        })
    }
}
