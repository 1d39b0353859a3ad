use std::collections::HashSet;
use std::sync::Arc;

use status_core::domain::{Incident, IncidentHistoryEntry, IncidentId, ServiceState};
use status_core::error::AppError;
use status_core::store::{IncidentStore, InsertOutcome, UpdateOutcome};
use tokio::sync::mpsc;

use crate::api::{IncidentApi, RecentQuery};

pub type Ticket = u64;

/// User-level actions the dashboard can trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadRecent(RecentQuery),
    Generate(Option<ServiceState>),
    Resolve(IncidentId),
    History(IncidentId),
}

/// Result of one API call, as delivered back to the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Loaded(Result<Vec<Incident>, AppError>),
    Generated(Result<Incident, AppError>),
    Resolved {
        id: IncidentId,
        result: Result<Incident, AppError>,
    },
    History {
        id: IncidentId,
        result: Result<Vec<IncidentHistoryEntry>, AppError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

/// What applying a completion did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Initialized { count: usize },
    Inserted { id: IncidentId },
    Replaced { id: IncidentId, index: usize },
    AlreadyPresent { id: IncidentId, index: usize },
    /// An update arrived for an incident that is no longer (or not yet) displayed.
    Dropped { id: IncidentId },
    Failed(AppError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(AppError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing message produced while applying completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub error: Option<AppError>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>, error: AppError) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            error: Some(error),
        }
    }
}

// Owned copy of what a worker needs, so the store is never shared with it.
#[derive(Debug, Clone)]
enum Request {
    Recent(RecentQuery),
    Generate(Option<ServiceState>),
    Resolve(Incident),
    History(IncidentId),
}

impl Request {
    fn run(&self, api: &dyn IncidentApi) -> Outcome {
        match self {
            Request::Recent(query) => Outcome::Loaded(api.fetch_recent(query)),
            Request::Generate(state) => Outcome::Generated(api.generate(*state)),
            Request::Resolve(incident) => Outcome::Resolved {
                id: incident.id,
                result: api.resolve(incident),
            },
            Request::History(id) => Outcome::History {
                id: *id,
                result: api.fetch_history(*id),
            },
        }
    }

    fn failed(&self, err: AppError) -> Outcome {
        match self {
            Request::Recent(_) => Outcome::Loaded(Err(err)),
            Request::Generate(_) => Outcome::Generated(Err(err)),
            Request::Resolve(incident) => Outcome::Resolved {
                id: incident.id,
                result: Err(err),
            },
            Request::History(id) => Outcome::History {
                id: *id,
                result: Err(err),
            },
        }
    }
}

/// Single-threaded owner of the displayed incidents.
///
/// API calls run on tokio's blocking pool; their results come back as [`Completion`]s on a
/// channel and are applied one at a time by [`Session::apply`], the only caller of the
/// store's mutators. Completions are applied in arrival order, which need not match the
/// order actions were submitted in. Failed calls never touch the store.
///
/// At most one resolve per incident is in flight; a second one is rejected until the first
/// completes. Only completions for tickets this session issued count against `pending`.
///
/// `submit` must be called from within a tokio runtime.
pub struct Session {
    api: Arc<dyn IncidentApi>,
    store: IncidentStore,
    load_state: LoadState,
    notices: Vec<Notice>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    next_ticket: Ticket,
    in_flight: HashSet<Ticket>,
    resolving: HashSet<IncidentId>,
}

impl Session {
    pub fn new(api: Arc<dyn IncidentApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            store: IncidentStore::new(),
            load_state: LoadState::Idle,
            notices: Vec::new(),
            tx,
            rx,
            next_ticket: 1,
            in_flight: HashSet::new(),
            resolving: HashSet::new(),
        }
    }

    pub fn store(&self) -> &IncidentStore {
        &self.store
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Number of submitted actions whose completion has not been applied yet.
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether a resolve for `id` has been submitted and not yet applied.
    pub fn is_resolving(&self, id: IncidentId) -> bool {
        self.resolving.contains(&id)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Start `action` in the background and return its ticket.
    ///
    /// Resolving requires the incident to be displayed, not already operational and not
    /// already being resolved; otherwise the action is rejected before any request is made.
    pub fn submit(&mut self, action: Action) -> Result<Ticket, AppError> {
        let request = match action {
            Action::LoadRecent(query) => {
                self.load_state = LoadState::Loading;
                Request::Recent(query)
            }
            Action::Generate(state) => Request::Generate(state),
            Action::Resolve(id) => {
                if self.resolving.contains(&id) {
                    return Err(AppError::new(
                        "SESSION_RESOLVE_IN_FLIGHT",
                        "Incident is already being resolved",
                    )
                    .with_details(format!("id={id}")));
                }
                let incident = self.store.get(id).cloned().ok_or_else(|| {
                    AppError::new("SESSION_INCIDENT_NOT_LOADED", "Incident is not displayed")
                        .with_details(format!("id={id}"))
                })?;
                if !incident.is_resolvable() {
                    return Err(AppError::new(
                        "SESSION_ALREADY_OPERATIONAL",
                        "Incident is already operational",
                    )
                    .with_details(format!("id={id}")));
                }
                self.resolving.insert(id);
                Request::Resolve(incident)
            }
            Action::History(id) => Request::History(id),
        };

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight.insert(ticket);
        tracing::debug!(ticket, ?request, "submitting request");

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let worker_request = request.clone();
            let outcome =
                match tokio::task::spawn_blocking(move || worker_request.run(api.as_ref())).await {
                    Ok(outcome) => outcome,
                    Err(e) => request.failed(
                        AppError::new("SESSION_WORKER_FAILED", "Background request did not finish")
                            .with_details(e.to_string()),
                    ),
                };
            // The receiver only goes away with the session itself.
            let _ = tx.send(Completion { ticket, outcome });
        });

        Ok(ticket)
    }

    /// Wait for the next completion and apply it. Returns `None` when nothing is pending.
    pub async fn next_completion(&mut self) -> Option<Applied> {
        if self.in_flight.is_empty() {
            return None;
        }
        let completion = self.rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply completions until every submitted action has finished.
    pub async fn drain(&mut self) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Some(a) = self.next_completion().await {
            applied.push(a);
        }
        applied
    }

    /// Fold one completion into the store.
    ///
    /// A completion whose ticket was not issued by [`Session::submit`] is still applied but
    /// leaves the pending count alone.
    pub fn apply(&mut self, completion: Completion) -> Applied {
        let ticket = completion.ticket;
        if !self.in_flight.remove(&ticket) {
            tracing::debug!(ticket, "applying completion for a ticket not issued here");
        }
        if let Outcome::Resolved { id, .. } = &completion.outcome {
            self.resolving.remove(id);
        }

        let applied = match completion.outcome {
            Outcome::Loaded(Ok(batch)) => {
                let count = batch.len();
                self.store.initialize(batch);
                self.load_state = LoadState::Ready;
                Applied::Initialized { count }
            }
            Outcome::Loaded(Err(e)) => {
                self.load_state = LoadState::Failed(e.clone());
                self.fail("Failed to load incidents. Please try again later.", e)
            }
            Outcome::Generated(Ok(incident)) => {
                let id = incident.id;
                match self.store.insert_if_absent(incident) {
                    InsertOutcome::Inserted => Applied::Inserted { id },
                    InsertOutcome::AlreadyPresent { index } => Applied::AlreadyPresent { id, index },
                }
            }
            Outcome::Generated(Err(e)) => {
                self.fail("Failed to generate incident. Please try again.", e)
            }
            Outcome::Resolved { result: Ok(incident), .. } => {
                self.notices.push(Notice::success("Incident resolved successfully"));
                let id = incident.id;
                // The server may answer with a record we already show (update it in place)
                // or with one we have never seen (show it first).
                if self.store.contains(id) {
                    self.replace(incident)
                } else {
                    match self.store.insert_if_absent(incident) {
                        InsertOutcome::Inserted => Applied::Inserted { id },
                        InsertOutcome::AlreadyPresent { index } => Applied::AlreadyPresent { id, index },
                    }
                }
            }
            Outcome::Resolved { result: Err(e), .. } => {
                self.fail("Failed to resolve incident. Please try again.", e)
            }
            Outcome::History { id, result: Ok(history) } => match self.store.get(id) {
                Some(current) => {
                    let refreshed = current.with_history(history);
                    self.replace(refreshed)
                }
                None => Applied::Dropped { id },
            },
            Outcome::History { result: Err(e), .. } => {
                self.fail("Failed to load incident history.", e)
            }
        };

        tracing::info!(ticket, ?applied, pending = self.in_flight.len(), "applied completion");
        applied
    }

    fn replace(&mut self, incident: Incident) -> Applied {
        let id = incident.id;
        match self.store.update(incident) {
            UpdateOutcome::Replaced { index } => Applied::Replaced { id, index },
            UpdateOutcome::Ignored => Applied::Dropped { id },
        }
    }

    fn fail(&mut self, message: &str, error: AppError) -> Applied {
        tracing::warn!(code = %error.code, error = %error, "{message}");
        self.notices.push(Notice::error(message, error.clone()));
        Applied::Failed(error)
    }
}
