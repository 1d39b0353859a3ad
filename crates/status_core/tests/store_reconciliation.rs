use pretty_assertions::assert_eq;

use status_core::domain::{Incident, IncidentDetail, ServiceState};
use status_core::store::{IncidentStore, InsertOutcome, UpdateOutcome};

fn incident(id: i64, state: ServiceState) -> Incident {
    Incident {
        id,
        service: format!("svc-{id}"),
        previous_state: ServiceState::Operational,
        current_state: state,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        incident: IncidentDetail {
            title: format!("Incident {id}"),
            description: "desc".to_string(),
            components: vec!["API".to_string()],
            url: format!("https://status.example.com/{id}"),
        },
        history: Vec::new(),
    }
}

fn ids(store: &IncidentStore) -> Vec<i64> {
    store.incidents().iter().map(|i| i.id).collect()
}

fn seeded() -> IncidentStore {
    let mut store = IncidentStore::new();
    store.initialize(vec![
        incident(1, ServiceState::Outage),
        incident(2, ServiceState::Operational),
    ]);
    store
}

#[test]
fn new_store_is_empty() {
    let store = IncidentStore::new();
    assert!(store.is_empty());
    assert!(store.lookup().is_empty());
    assert_eq!(store.position(1), None);
}

#[test]
fn initialize_keeps_batch_order_and_builds_lookup() {
    let store = seeded();
    assert_eq!(ids(&store), vec![1, 2]);
    assert_eq!(store.position(1), Some(0));
    assert_eq!(store.position(2), Some(1));
    assert_eq!(store.lookup().len(), 2);
}

#[test]
fn initialize_replaces_rather_than_merges() {
    let mut store = seeded();
    let b2 = vec![incident(7, ServiceState::Degraded), incident(8, ServiceState::Outage)];
    store.initialize(b2.clone());
    assert_eq!(store.incidents(), b2.as_slice());
    assert!(!store.contains(1));
    assert!(!store.contains(2));
    assert_eq!(store.position(7), Some(0));
    assert_eq!(store.position(8), Some(1));
}

#[test]
fn initialize_with_empty_batch_clears_store() {
    let mut store = seeded();
    store.initialize(Vec::new());
    assert!(store.is_empty());
    assert!(store.lookup().is_empty());
}

#[test]
fn initialize_drops_repeated_ids_keeping_first() {
    let mut store = IncidentStore::new();
    store.initialize(vec![
        incident(5, ServiceState::Outage),
        incident(6, ServiceState::Degraded),
        incident(5, ServiceState::Operational),
    ]);
    assert_eq!(ids(&store), vec![5, 6]);
    assert_eq!(store.get(5).map(|i| i.current_state), Some(ServiceState::Outage));
    assert_eq!(store.position(6), Some(1));
}

#[test]
fn update_replaces_in_place_without_reordering() {
    let mut store = seeded();
    let outcome = store.update(incident(1, ServiceState::Operational));
    assert_eq!(outcome, UpdateOutcome::Replaced { index: 0 });
    assert_eq!(
        store.incidents(),
        &[
            incident(1, ServiceState::Operational),
            incident(2, ServiceState::Operational)
        ]
    );
    assert_eq!(store.position(1), Some(0));
    assert_eq!(store.position(2), Some(1));
}

#[test]
fn update_for_unknown_id_is_a_silent_noop() {
    let mut store = seeded();
    let before = store.incidents().to_vec();
    let lookup_before = store.lookup().clone();

    let outcome = store.update(incident(99, ServiceState::Operational));

    assert_eq!(outcome, UpdateOutcome::Ignored);
    assert_eq!(store.incidents(), before.as_slice());
    assert_eq!(store.lookup(), &lookup_before);
}

#[test]
fn insert_if_absent_prepends_and_shifts_lookup() {
    let mut store = seeded();
    store.update(incident(1, ServiceState::Operational));

    let outcome = store.insert_if_absent(incident(3, ServiceState::Degraded));

    assert_eq!(outcome, InsertOutcome::Inserted);
    assert_eq!(ids(&store), vec![3, 1, 2]);
    assert_eq!(store.position(3), Some(0));
    assert_eq!(store.position(1), Some(1));
    assert_eq!(store.position(2), Some(2));
}

#[test]
fn insert_if_absent_ignores_existing_id_without_overwriting() {
    let mut store = seeded();
    store.insert_if_absent(incident(3, ServiceState::Degraded));
    let before = store.incidents().to_vec();

    let outcome = store.insert_if_absent(incident(1, ServiceState::Maintenance));

    assert_eq!(outcome, InsertOutcome::AlreadyPresent { index: 1 });
    assert_eq!(store.incidents(), before.as_slice());
    assert_eq!(store.get(1).map(|i| i.current_state), Some(ServiceState::Outage));
    assert_eq!(store.incidents().iter().filter(|i| i.id == 1).count(), 1);
}

#[test]
fn insert_before_initialize_is_replaced_by_the_batch() {
    let mut store = IncidentStore::new();
    store.insert_if_absent(incident(42, ServiceState::Outage));
    assert_eq!(ids(&store), vec![42]);

    store.initialize(vec![incident(1, ServiceState::Outage)]);
    assert_eq!(ids(&store), vec![1]);
    assert_eq!(store.position(42), None);
}

#[test]
fn update_after_prepend_uses_shifted_position() {
    let mut store = seeded();
    store.insert_if_absent(incident(3, ServiceState::Degraded));

    let outcome = store.update(incident(2, ServiceState::Maintenance));

    assert_eq!(outcome, UpdateOutcome::Replaced { index: 2 });
    assert_eq!(store.incidents()[2].current_state, ServiceState::Maintenance);
    assert_eq!(ids(&store), vec![3, 1, 2]);
}
