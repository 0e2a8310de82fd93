//! Shipment entity: an item requiring exactly one sufficiently large box.

use serde::Serialize;
use sqlx::FromRow;

use lockbox_core::types::{BoxSize, EntityId};

/// A row from the `shipments` collection. Immutable after creation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shipment {
    pub id: EntityId,
    pub name: String,
    /// Required box size; only boxes with capacity >= `size` are eligible.
    pub size: BoxSize,
}
