//! The abstract store client.
//!
//! The allocation engine and validator never talk to a concrete database;
//! they receive a `dyn Store` by dependency injection. Any key-value or
//! wide-column store able to satisfy these operations qualifies.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use lockbox_core::error::StoreError;
use lockbox_core::types::{BoxSize, EntityId, Timestamp};

use crate::models::{Locker, Reservation, ReservationStatus, ReservationView, Shipment};

/// Point read/write access to the four record collections: lockers,
/// shipments, and the two denormalized reservation views.
///
/// Every operation may fail with [`StoreError`]. Callers treat each call as
/// a potentially slow, potentially failing remote operation and must not
/// hold any in-process lock across one. No operation here is conditional:
/// reservation writes are unconditional upserts and the last write for a
/// key wins.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new locker and return its generated id.
    async fn create_locker(&self, name: &str, boxes: &[BoxSize]) -> Result<EntityId, StoreError>;

    async fn get_locker(&self, id: EntityId) -> Result<Option<Locker>, StoreError>;

    async fn list_lockers(&self) -> Result<Vec<Locker>, StoreError>;

    /// Insert a new shipment and return its generated id.
    async fn create_shipment(&self, name: &str, size: BoxSize) -> Result<EntityId, StoreError>;

    async fn get_shipment(&self, id: EntityId) -> Result<Option<Shipment>, StoreError>;

    async fn list_shipments(&self) -> Result<Vec<Shipment>, StoreError>;

    /// Unconditional upsert of one reservation record in one view.
    ///
    /// The last write for the same (view, locker, shipment) key wins; there
    /// is no conditional check. Overwriting a WAITING record with CONFIRMED
    /// or REJECTED is how the protocol finalizes a claim.
    async fn put_reservation(
        &self,
        view: ReservationView,
        locker_id: EntityId,
        shipment_id: EntityId,
        box_index: i32,
        added_at: Timestamp,
        status: ReservationStatus,
    ) -> Result<(), StoreError>;

    /// Point read of one reservation record from one view.
    async fn get_reservation(
        &self,
        view: ReservationView,
        locker_id: EntityId,
        shipment_id: EntityId,
    ) -> Result<Option<Reservation>, StoreError>;

    /// All reservations currently visible in the locker-indexed view.
    async fn list_reservations_by_locker(
        &self,
        locker_id: EntityId,
    ) -> Result<Vec<Reservation>, StoreError>;

    /// All reservations currently visible in the shipment-indexed view.
    async fn list_reservations_by_shipment(
        &self,
        shipment_id: EntityId,
    ) -> Result<Vec<Reservation>, StoreError>;

    /// Remove every record from all four collections.
    async fn reset_all(&self) -> Result<(), StoreError>;

    /// Write one logical reservation into both views.
    ///
    /// Two independent upserts, shipment view first. A failure or crash
    /// between the two leaves the views diverged until the next overwrite of
    /// the same key; callers must not assume the pair is atomic.
    async fn write_reservation(
        &self,
        locker_id: EntityId,
        shipment_id: EntityId,
        box_index: i32,
        added_at: Timestamp,
        status: ReservationStatus,
    ) -> Result<(), StoreError> {
        self.put_reservation(
            ReservationView::ByShipment,
            locker_id,
            shipment_id,
            box_index,
            added_at,
            status,
        )
        .await?;
        self.put_reservation(
            ReservationView::ByLocker,
            locker_id,
            shipment_id,
            box_index,
            added_at,
            status,
        )
        .await
    }
}
