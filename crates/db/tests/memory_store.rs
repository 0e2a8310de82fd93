//! Store client semantics, exercised through the in-memory implementation:
//! - Entity create/get/list round trips
//! - Last-write-wins upserts per (view, locker, shipment) key
//! - Dual-view writes and their independence
//! - Full reset

use chrono::Utc;
use uuid::Uuid;

use lockbox_db::models::{ReservationStatus, ReservationView};
use lockbox_db::{MemoryStore, Store};

#[tokio::test]
async fn locker_round_trip() {
    let store = MemoryStore::new();
    let id = store.create_locker("POZ123", &[1, 2, 3]).await.unwrap();

    let locker = store.get_locker(id).await.unwrap().unwrap();
    assert_eq!(locker.id, id);
    assert_eq!(locker.name, "POZ123");
    assert_eq!(locker.boxes, vec![1, 2, 3]);

    assert_eq!(store.list_lockers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn shipment_round_trip() {
    let store = MemoryStore::new();
    let id = store.create_shipment("Allegro", 2).await.unwrap();

    let shipment = store.get_shipment(id).await.unwrap().unwrap();
    assert_eq!(shipment.name, "Allegro");
    assert_eq!(shipment.size, 2);
}

#[tokio::test]
async fn missing_entities_read_as_none() {
    let store = MemoryStore::new();
    assert!(store.get_locker(Uuid::new_v4()).await.unwrap().is_none());
    assert!(store.get_shipment(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn reservation_upsert_is_last_write_wins() {
    let store = MemoryStore::new();
    let locker_id = store.create_locker("L", &[2]).await.unwrap();
    let shipment_id = store.create_shipment("S", 2).await.unwrap();
    let at = Utc::now();

    store
        .write_reservation(locker_id, shipment_id, 0, at, ReservationStatus::Waiting)
        .await
        .unwrap();
    store
        .write_reservation(locker_id, shipment_id, 0, at, ReservationStatus::Confirmed)
        .await
        .unwrap();

    // One record per view, carrying the final status.
    let by_locker = store.list_reservations_by_locker(locker_id).await.unwrap();
    assert_eq!(by_locker.len(), 1);
    assert_eq!(by_locker[0].status, ReservationStatus::Confirmed);

    let by_shipment = store
        .list_reservations_by_shipment(shipment_id)
        .await
        .unwrap();
    assert_eq!(by_shipment.len(), 1);
    assert_eq!(by_shipment[0], by_locker[0]);
}

#[tokio::test]
async fn views_are_written_independently() {
    let store = MemoryStore::new();
    let locker_id = store.create_locker("L", &[2]).await.unwrap();
    let shipment_id = store.create_shipment("S", 2).await.unwrap();
    let at = Utc::now();

    // Only the shipment view is written; the locker view must not see it.
    store
        .put_reservation(
            ReservationView::ByShipment,
            locker_id,
            shipment_id,
            0,
            at,
            ReservationStatus::Waiting,
        )
        .await
        .unwrap();

    assert!(store
        .list_reservations_by_locker(locker_id)
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .get_reservation(ReservationView::ByShipment, locker_id, shipment_id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn list_filters_by_owning_id() {
    let store = MemoryStore::new();
    let locker_a = store.create_locker("A", &[2]).await.unwrap();
    let locker_b = store.create_locker("B", &[2]).await.unwrap();
    let shipment_id = store.create_shipment("S", 2).await.unwrap();
    let at = Utc::now();

    store
        .write_reservation(locker_a, shipment_id, 0, at, ReservationStatus::Waiting)
        .await
        .unwrap();

    assert_eq!(
        store.list_reservations_by_locker(locker_a).await.unwrap().len(),
        1
    );
    assert!(store
        .list_reservations_by_locker(locker_b)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn reset_clears_every_collection() {
    let store = MemoryStore::new();
    let locker_id = store.create_locker("L", &[1, 2]).await.unwrap();
    let shipment_id = store.create_shipment("S", 1).await.unwrap();
    store
        .write_reservation(locker_id, shipment_id, 0, Utc::now(), ReservationStatus::Confirmed)
        .await
        .unwrap();

    store.reset_all().await.unwrap();

    assert!(store.get_locker(locker_id).await.unwrap().is_none());
    assert!(store.get_shipment(shipment_id).await.unwrap().is_none());
    assert!(store
        .list_reservations_by_locker(locker_id)
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .list_reservations_by_shipment(shipment_id)
        .await
        .unwrap()
        .is_empty());
    assert!(store.list_lockers().await.unwrap().is_empty());
    assert!(store.list_shipments().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_status_string_fails_decode() {
    // Guard on the shared TEXT representation both stores use.
    assert!("CONFIRMED".parse::<ReservationStatus>().is_ok());
    assert!("confirmed".parse::<ReservationStatus>().is_err());
    assert!("DONE".parse::<ReservationStatus>().is_err());
}
