use serde::{Deserialize, Serialize};

mod state;

pub use state::ServiceState;

pub type IncidentId = i64;

/// Descriptive block embedded in both incidents and their history entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentDetail {
    pub title: String,
    pub description: String,
    pub components: Vec<String>,
    pub url: String,
}

/// Current status record for one monitored service, as delivered by the status API.
///
/// Notes:
/// - `created_at` is kept as the raw server string; see `normalize::timestamps` for parsing.
/// - `history` is oldest first and is never reordered client-side. Responses that omit it
///   (`/incidents/generate`, older deployments) decode to an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    pub id: IncidentId,
    pub service: String,
    pub previous_state: ServiceState,
    pub current_state: ServiceState,
    pub created_at: String,
    pub incident: IncidentDetail,
    #[serde(default)]
    pub history: Vec<IncidentHistoryEntry>,
}

impl Incident {
    pub fn title(&self) -> &str {
        &self.incident.title
    }

    /// Only incidents that are not already operational can be resolved.
    pub fn is_resolvable(&self) -> bool {
        !self.current_state.is_operational()
    }

    /// Copy of this incident carrying a freshly fetched history.
    pub fn with_history(&self, history: Vec<IncidentHistoryEntry>) -> Self {
        Self {
            history,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentHistoryEntry {
    pub id: i64,
    pub incident_id: IncidentId,
    pub recorded_at: String,
    pub service: String,
    pub previous_state: ServiceState,
    pub current_state: ServiceState,
    pub incident: IncidentDetail,
}

/// Body accepted by `POST /incidents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentCreate {
    pub service: String,
    pub previous_state: ServiceState,
    pub current_state: ServiceState,
    pub incident: IncidentDetail,
}

impl IncidentCreate {
    /// Transition of `incident` back to operational, keeping its service and detail block.
    pub fn resolution_of(incident: &Incident) -> Self {
        Self {
            service: incident.service.clone(),
            previous_state: incident.current_state,
            current_state: ServiceState::Operational,
            incident: incident.incident.clone(),
        }
    }
}
