//! End-to-end allocation protocol tests over the in-memory store:
//! - Smallest-fit candidate selection
//! - Occupancy exclusion across successive calls
//! - Exhaustion as a normal outcome
//! - NotFound preconditions
//! - Dual-view audit consistency

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use uuid::Uuid;

use lockbox_core::error::AllocationError;
use lockbox_db::models::{ReservationStatus, ReservationView};
use lockbox_db::{MemoryStore, Store};
use lockbox_engine::{AllocationEngine, AllocationOutcome};

fn fixture() -> (Arc<MemoryStore>, AllocationEngine) {
    let store = Arc::new(MemoryStore::new());
    let engine = AllocationEngine::new(Arc::clone(&store) as Arc<dyn Store>);
    (store, engine)
}

#[tokio::test]
async fn confirms_smallest_sufficient_box() {
    let (store, engine) = fixture();
    let locker_id = store.create_locker("L", &[1, 2, 3]).await.unwrap();
    let shipment_id = store.create_shipment("S", 2).await.unwrap();

    let outcome = engine
        .allocate(locker_id, shipment_id, Utc::now())
        .await
        .unwrap();

    // Capacity 2 at index 1 beats capacity 3 at index 2; capacity 1 at
    // index 0 is never eligible.
    assert_eq!(outcome, AllocationOutcome::Confirmed { box_index: 1 });
}

#[tokio::test]
async fn second_shipment_never_reuses_a_confirmed_box() {
    let (store, engine) = fixture();
    let locker_id = store.create_locker("L", &[1, 2, 3]).await.unwrap();
    let first = store.create_shipment("first", 2).await.unwrap();
    let second = store.create_shipment("second", 2).await.unwrap();

    let at = Utc::now();
    let first_outcome = engine.allocate(locker_id, first, at).await.unwrap();
    assert_eq!(first_outcome, AllocationOutcome::Confirmed { box_index: 1 });

    let second_outcome = engine
        .allocate(locker_id, second, at + Duration::milliseconds(5))
        .await
        .unwrap();
    assert_eq!(second_outcome, AllocationOutcome::Confirmed { box_index: 2 });
}

#[tokio::test]
async fn oversized_shipment_exhausts_without_writes() {
    let (store, engine) = fixture();
    let locker_id = store.create_locker("L", &[1, 2]).await.unwrap();
    let shipment_id = store.create_shipment("S", 3).await.unwrap();

    let outcome = engine
        .allocate(locker_id, shipment_id, Utc::now())
        .await
        .unwrap();

    assert_eq!(outcome, AllocationOutcome::Exhausted);
    assert!(store
        .list_reservations_by_locker(locker_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn fully_occupied_locker_exhausts_without_new_confirmations() {
    let (store, engine) = fixture();
    let locker_id = store.create_locker("L", &[3, 3]).await.unwrap();

    let mut at = Utc::now();
    for name in ["a", "b"] {
        let id = store.create_shipment(name, 3).await.unwrap();
        let outcome = engine.allocate(locker_id, id, at).await.unwrap();
        assert_matches!(outcome, AllocationOutcome::Confirmed { .. });
        at += Duration::milliseconds(5);
    }

    let late = store.create_shipment("late", 3).await.unwrap();
    let outcome = engine.allocate(locker_id, late, at).await.unwrap();
    assert_eq!(outcome, AllocationOutcome::Exhausted);

    let confirmed = store
        .list_reservations_by_locker(locker_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.status == ReservationStatus::Confirmed)
        .count();
    assert_eq!(confirmed, 2);

    // The losing shipment leaves no record at all: both candidates were
    // excluded up front by locally-known occupancy.
    assert!(store
        .list_reservations_by_shipment(late)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn missing_locker_is_not_found() {
    let (store, engine) = fixture();
    let shipment_id = store.create_shipment("S", 1).await.unwrap();

    let err = engine
        .allocate(Uuid::new_v4(), shipment_id, Utc::now())
        .await
        .unwrap_err();
    assert_matches!(err, AllocationError::NotFound { entity: "locker", .. });
}

#[tokio::test]
async fn missing_shipment_is_not_found() {
    let (store, engine) = fixture();
    let locker_id = store.create_locker("L", &[1]).await.unwrap();

    let err = engine
        .allocate(locker_id, Uuid::new_v4(), Utc::now())
        .await
        .unwrap_err();
    assert_matches!(err, AllocationError::NotFound { entity: "shipment", .. });
}

#[tokio::test]
async fn both_views_stay_field_consistent() {
    let (store, engine) = fixture();
    let locker_id = store.create_locker("L", &[1, 2, 2, 3]).await.unwrap();

    let mut at = Utc::now();
    for (name, size) in [("a", 2), ("b", 2), ("c", 1), ("d", 3)] {
        let id = store.create_shipment(name, size).await.unwrap();
        engine.allocate(locker_id, id, at).await.unwrap();
        at += Duration::milliseconds(5);
    }

    // Every record in the locker view must match the shipment view
    // field-for-field, and vice versa.
    let by_locker = store.list_reservations_by_locker(locker_id).await.unwrap();
    assert!(!by_locker.is_empty());
    for record in by_locker {
        let twin = store
            .get_reservation(ReservationView::ByShipment, record.locker_id, record.shipment_id)
            .await
            .unwrap()
            .expect("shipment view missing a record the locker view has");
        assert_eq!(record, twin);
    }
}
