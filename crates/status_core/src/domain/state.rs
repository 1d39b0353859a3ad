use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Operational state of a monitored service.
///
/// Parsing is case-insensitive and accepts the legacy `ok`/`minor`/`major` labels
/// still emitted by older API deployments. Serialization always writes the
/// canonical lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ServiceState {
    Operational,
    Degraded,
    Outage,
    Maintenance,
}

impl ServiceState {
    pub const ALL: [ServiceState; 4] = [
        ServiceState::Operational,
        ServiceState::Degraded,
        ServiceState::Outage,
        ServiceState::Maintenance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceState::Operational => "operational",
            ServiceState::Degraded => "degraded",
            ServiceState::Outage => "outage",
            ServiceState::Maintenance => "maintenance",
        }
    }

    pub fn is_operational(self) -> bool {
        self == ServiceState::Operational
    }
}

impl FromStr for ServiceState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "operational" | "ok" => Ok(ServiceState::Operational),
            "degraded" | "minor" => Ok(ServiceState::Degraded),
            "outage" | "major" => Ok(ServiceState::Outage),
            "maintenance" => Ok(ServiceState::Maintenance),
            _ => Err(AppError::new("STATE_UNKNOWN", "Unknown service state")
                .with_details(format!("value={s}"))),
        }
    }
}

impl TryFrom<String> for ServiceState {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServiceState> for String {
    fn from(state: ServiceState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceState;

    #[test]
    fn parses_case_insensitively_with_legacy_aliases() {
        assert_eq!("OPERATIONAL".parse::<ServiceState>().ok(), Some(ServiceState::Operational));
        assert_eq!("Ok".parse::<ServiceState>().ok(), Some(ServiceState::Operational));
        assert_eq!("MINOR".parse::<ServiceState>().ok(), Some(ServiceState::Degraded));
        assert_eq!("major".parse::<ServiceState>().ok(), Some(ServiceState::Outage));
        assert_eq!(" Maintenance ".parse::<ServiceState>().ok(), Some(ServiceState::Maintenance));
        assert!("on fire".parse::<ServiceState>().is_err());
    }

    #[test]
    fn serializes_canonical_name() {
        let v: ServiceState = serde_json::from_str("\"MAJOR\"").expect("decode");
        assert_eq!(v, ServiceState::Outage);
        assert_eq!(serde_json::to_string(&v).expect("encode"), "\"outage\"");
    }
}
