//! Locker entity: a container with a fixed ordered sequence of boxes.

use serde::Serialize;
use sqlx::FromRow;

use lockbox_core::types::{BoxSize, EntityId};

/// A row from the `lockers` collection.
///
/// `boxes` holds one capacity per physical box; the vector index is the box
/// position. Boxes are never added, removed, or resized after creation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Locker {
    pub id: EntityId,
    pub name: String,
    pub boxes: Vec<BoxSize>,
}
