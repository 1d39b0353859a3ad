use std::collections::HashMap;

use crate::domain::{Incident, IncidentId};

/// Result of [`IncidentStore::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Replaced { index: usize },
    /// The identifier is not displayed; nothing changed.
    Ignored,
}

/// Result of [`IncidentStore::insert_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyPresent { index: usize },
}

/// Ordered collection of displayed incidents (most recent first) plus an id → position lookup.
///
/// Contract:
/// - identifiers are unique within `incidents`;
/// - `lookup[id]` is always the position of `id` in `incidents`;
/// - the lookup is rebuilt only by `initialize` and shifted only by a prepend, never by
///   an in-place `update`.
///
/// `initialize`, `update` and `insert_if_absent` are the only mutators.
#[derive(Debug, Default, Clone)]
pub struct IncidentStore {
    incidents: Vec<Incident>,
    lookup: HashMap<IncidentId, usize>,
}

impl IncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with `batch`, keeping its order, and rebuild the lookup.
    ///
    /// This is a full replace, so a retried initial load never merges with an earlier
    /// batch. A batch that repeats an identifier keeps the first occurrence.
    pub fn initialize(&mut self, batch: Vec<Incident>) {
        let mut incidents = Vec::with_capacity(batch.len());
        let mut lookup = HashMap::with_capacity(batch.len());

        for incident in batch {
            if lookup.contains_key(&incident.id) {
                tracing::warn!(id = incident.id, "dropping duplicate incident id in batch");
                continue;
            }
            lookup.insert(incident.id, incidents.len());
            incidents.push(incident);
        }

        tracing::debug!(count = incidents.len(), "incident store initialized");
        self.incidents = incidents;
        self.lookup = lookup;
    }

    /// Replace the incident with the same identifier in place.
    ///
    /// Unknown identifiers are dropped without inserting: an update for an incident
    /// that is not displayed yet is lost until the next `initialize`.
    pub fn update(&mut self, incident: Incident) -> UpdateOutcome {
        match self.lookup.get(&incident.id).copied() {
            Some(index) => {
                self.incidents[index] = incident;
                UpdateOutcome::Replaced { index }
            }
            None => {
                tracing::debug!(id = incident.id, "ignoring update for incident not in store");
                UpdateOutcome::Ignored
            }
        }
    }

    /// Prepend `incident` unless its identifier is already displayed.
    ///
    /// An existing entry is left untouched, not overwritten.
    pub fn insert_if_absent(&mut self, incident: Incident) -> InsertOutcome {
        if let Some(&index) = self.lookup.get(&incident.id) {
            return InsertOutcome::AlreadyPresent { index };
        }

        for position in self.lookup.values_mut() {
            *position += 1;
        }
        self.lookup.insert(incident.id, 0);
        self.incidents.insert(0, incident);
        InsertOutcome::Inserted
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn lookup(&self) -> &HashMap<IncidentId, usize> {
        &self.lookup
    }

    pub fn position(&self, id: IncidentId) -> Option<usize> {
        self.lookup.get(&id).copied()
    }

    pub fn get(&self, id: IncidentId) -> Option<&Incident> {
        self.position(id).map(|i| &self.incidents[i])
    }

    pub fn contains(&self, id: IncidentId) -> bool {
        self.lookup.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}
