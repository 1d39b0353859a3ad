use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{Incident, IncidentDetail, IncidentHistoryEntry, IncidentId, ServiceState};
use crate::normalize::timestamps::minutes_before;

const SERVICES: [&str; 5] = ["payments", "auth", "api", "search", "billing"];
const COMPONENTS: [&str; 6] = ["Database", "API Gateway", "CDN", "Worker Pool", "Cache", "DNS"];

fn headline(state: ServiceState, service: &str) -> (String, String) {
    match state {
        ServiceState::Operational => (
            format!("{service} operating normally"),
            format!("All {service} systems are operating normally."),
        ),
        ServiceState::Degraded => (
            format!("Elevated latency on {service}"),
            format!("Some {service} requests are slower than usual. We are investigating."),
        ),
        ServiceState::Outage => (
            format!("{service} unavailable"),
            format!("{service} is failing for most requests. Engineers are engaged."),
        ),
        ServiceState::Maintenance => (
            format!("Scheduled maintenance for {service}"),
            format!("{service} is undergoing planned maintenance."),
        ),
    }
}

/// State chosen when a generate request carries no hint. Cycles so demo data covers every state.
pub fn demo_state_for(seq: i64) -> ServiceState {
    ServiceState::ALL[(seq.rem_euclid(ServiceState::ALL.len() as i64)) as usize]
}

/// Build one deterministic demo incident. History holds the single transition that created it.
pub fn demo_incident(id: IncidentId, state: ServiceState, created_at: OffsetDateTime) -> Incident {
    let idx = id.rem_euclid(SERVICES.len() as i64) as usize;
    let service = SERVICES[idx].to_string();
    let (title, description) = headline(state, &service);
    let components = vec![
        COMPONENTS[idx % COMPONENTS.len()].to_string(),
        COMPONENTS[(idx + 2) % COMPONENTS.len()].to_string(),
    ];
    let created = created_at.format(&Rfc3339).unwrap_or_default();
    let detail = IncidentDetail {
        title,
        description,
        components,
        url: format!("https://status.example.com/incidents/{id}"),
    };
    let previous_state = if state.is_operational() {
        ServiceState::Degraded
    } else {
        ServiceState::Operational
    };

    Incident {
        id,
        service: service.clone(),
        previous_state,
        current_state: state,
        created_at: created.clone(),
        incident: detail.clone(),
        history: vec![IncidentHistoryEntry {
            id,
            incident_id: id,
            recorded_at: created,
            service,
            previous_state,
            current_state: state,
            incident: detail,
        }],
    }
}

/// `count` demo incidents, most recent first, ids `count..=1`, ten minutes apart ending at `now`.
pub fn demo_batch(count: usize, now: OffsetDateTime) -> Vec<Incident> {
    (1..=count as i64)
        .rev()
        .map(|id| {
            let age = (count as i64 - id) * 10;
            demo_incident(id, demo_state_for(id), minutes_before(now, age))
        })
        .collect()
}
