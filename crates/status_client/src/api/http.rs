use serde::de::DeserializeOwned;
use status_core::domain::{Incident, IncidentCreate, IncidentHistoryEntry, IncidentId, ServiceState};
use status_core::error::AppError;

use super::{HealthStatus, IncidentApi, RecentQuery};
use crate::config::ClientConfig;

// Keep error details readable when the server returns an HTML error page.
const BODY_EXCERPT_LEN: usize = 512;

/// `ureq`-backed client for the status API.
#[derive(Debug, Clone)]
pub struct HttpIncidentClient {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpIncidentClient {
    /// Build a client from a validated config.
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        let config = config.clone().validate()?;
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Ok(Self {
            base_url: config.api_url,
            agent,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        op: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, op, "GET");
        let mut req = self.agent.get(&url).set("Accept", "application/json");
        for (key, value) in query {
            req = req.query(key, value);
        }
        decode(op, req.call())
    }

    fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        op: &str,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, op, "POST");
        let body = serde_json::to_value(body).map_err(|e| {
            AppError::new("API_REQUEST_ENCODE_FAILED", format!("Failed to encode {op} request"))
                .with_details(e.to_string())
        })?;
        let resp = self
            .agent
            .post(&url)
            .set("Accept", "application/json")
            .send_json(body);
        decode(op, resp)
    }
}

fn decode<T: DeserializeOwned>(op: &str, resp: Result<ureq::Response, ureq::Error>) -> Result<T, AppError> {
    match resp {
        Ok(r) => {
            let text = r.into_string().map_err(|e| {
                AppError::transport(format!("Failed to read {op} response"), e.to_string())
            })?;
            serde_json::from_str(&text).map_err(|e| {
                tracing::warn!(op, error = %e, "unexpected response shape");
                AppError::malformed(format!("Unexpected {op} response shape"), e.to_string())
            })
        }
        Err(ureq::Error::Status(status, r)) => {
            let body = r.into_string().unwrap_or_default();
            let excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
            tracing::warn!(op, status, "status API returned an error status");
            Err(
                AppError::new("API_STATUS_FAILED", format!("{op} request was rejected"))
                    .with_details(format!("status={status}; body={excerpt}"))
                    .with_retryable(status >= 500),
            )
        }
        Err(e) => {
            tracing::warn!(op, error = %e, "status API unreachable");
            Err(AppError::transport(
                format!("Failed to call {op} endpoint"),
                e.to_string(),
            ))
        }
    }
}

impl IncidentApi for HttpIncidentClient {
    fn fetch_recent(&self, query: &RecentQuery) -> Result<Vec<Incident>, AppError> {
        let mut params = vec![("count", query.count().to_string())];
        if let Some(start) = query.start_date() {
            params.push(("start_date", start.to_string()));
        }
        self.get_json("recent incidents", "/incidents/recent", &params)
    }

    fn fetch_history(&self, id: IncidentId) -> Result<Vec<IncidentHistoryEntry>, AppError> {
        self.get_json("incident history", &format!("/incidents/{id}/history"), &[])
    }

    fn generate(&self, state: Option<ServiceState>) -> Result<Incident, AppError> {
        let params: Vec<(&str, String)> = state
            .map(|s| vec![("state", s.as_str().to_string())])
            .unwrap_or_default();
        self.get_json("generate incident", "/incidents/generate", &params)
    }

    fn resolve(&self, incident: &Incident) -> Result<Incident, AppError> {
        self.post_json(
            "resolve incident",
            "/incidents",
            &IncidentCreate::resolution_of(incident),
        )
    }

    fn health(&self) -> Result<HealthStatus, AppError> {
        self.get_json("health", "/health", &[])
    }
}
