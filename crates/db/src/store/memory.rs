//! In-memory store for tests and local stress runs.
//!
//! Mirrors the semantics the protocol relies on: reservation records are
//! keyed by (owning id, other id) per view, an upsert replaces whatever was
//! there, and reads return point-in-time snapshots. Each operation takes the
//! lock only for its own duration, so two concurrent allocation calls
//! interleave their reads and writes the same way they would against a
//! remote cluster.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use lockbox_core::error::StoreError;
use lockbox_core::types::{BoxSize, EntityId, Timestamp};

use crate::models::{Locker, Reservation, ReservationStatus, ReservationView, Shipment};
use crate::store::Store;

#[derive(Default)]
struct Collections {
    lockers: HashMap<EntityId, Locker>,
    shipments: HashMap<EntityId, Shipment>,
    /// Keyed (locker_id, shipment_id).
    by_locker: HashMap<(EntityId, EntityId), Reservation>,
    /// Keyed (shipment_id, locker_id).
    by_shipment: HashMap<(EntityId, EntityId), Reservation>,
}

/// Store implementation backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_locker(&self, name: &str, boxes: &[BoxSize]) -> Result<EntityId, StoreError> {
        let id = EntityId::new_v4();
        let locker = Locker {
            id,
            name: name.to_string(),
            boxes: boxes.to_vec(),
        };
        self.inner.write().await.lockers.insert(id, locker);
        Ok(id)
    }

    async fn get_locker(&self, id: EntityId) -> Result<Option<Locker>, StoreError> {
        Ok(self.inner.read().await.lockers.get(&id).cloned())
    }

    async fn list_lockers(&self) -> Result<Vec<Locker>, StoreError> {
        Ok(self.inner.read().await.lockers.values().cloned().collect())
    }

    async fn create_shipment(&self, name: &str, size: BoxSize) -> Result<EntityId, StoreError> {
        let id = EntityId::new_v4();
        let shipment = Shipment {
            id,
            name: name.to_string(),
            size,
        };
        self.inner.write().await.shipments.insert(id, shipment);
        Ok(id)
    }

    async fn get_shipment(&self, id: EntityId) -> Result<Option<Shipment>, StoreError> {
        Ok(self.inner.read().await.shipments.get(&id).cloned())
    }

    async fn list_shipments(&self) -> Result<Vec<Shipment>, StoreError> {
        Ok(self.inner.read().await.shipments.values().cloned().collect())
    }

    async fn put_reservation(
        &self,
        view: ReservationView,
        locker_id: EntityId,
        shipment_id: EntityId,
        box_index: i32,
        added_at: Timestamp,
        status: ReservationStatus,
    ) -> Result<(), StoreError> {
        let record = Reservation {
            locker_id,
            shipment_id,
            box_index,
            added_at,
            status,
        };
        let mut inner = self.inner.write().await;
        match view {
            ReservationView::ByLocker => {
                inner.by_locker.insert((locker_id, shipment_id), record);
            }
            ReservationView::ByShipment => {
                inner.by_shipment.insert((shipment_id, locker_id), record);
            }
        }
        Ok(())
    }

    async fn get_reservation(
        &self,
        view: ReservationView,
        locker_id: EntityId,
        shipment_id: EntityId,
    ) -> Result<Option<Reservation>, StoreError> {
        let inner = self.inner.read().await;
        let record = match view {
            ReservationView::ByLocker => inner.by_locker.get(&(locker_id, shipment_id)),
            ReservationView::ByShipment => inner.by_shipment.get(&(shipment_id, locker_id)),
        };
        Ok(record.cloned())
    }

    async fn list_reservations_by_locker(
        &self,
        locker_id: EntityId,
    ) -> Result<Vec<Reservation>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_locker
            .iter()
            .filter(|((lid, _), _)| *lid == locker_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn list_reservations_by_shipment(
        &self,
        shipment_id: EntityId,
    ) -> Result<Vec<Reservation>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_shipment
            .iter()
            .filter(|((sid, _), _)| *sid == shipment_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn reset_all(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.lockers.clear();
        inner.shipments.clear();
        inner.by_locker.clear();
        inner.by_shipment.clear();
        Ok(())
    }
}
