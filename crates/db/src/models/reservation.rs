//! Reservation: a timestamped claim by one shipment on one box of one locker.

use std::str::FromStr;

use serde::Serialize;

use lockbox_core::error::StoreError;
use lockbox_core::types::{EntityId, Timestamp};

/// Which denormalized view a reservation record lives in.
///
/// The same logical reservation is materialized twice, once per view, so it
/// can be listed efficiently by either owning entity. The two records are
/// written independently; nothing makes the pair atomic, and they may
/// transiently diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationView {
    /// Keyed by locker id first; answers "what is in this locker?".
    ByLocker,
    /// Keyed by shipment id first; answers "where is this shipment?".
    ByShipment,
}

/// Adjudication state of a reservation.
///
/// A reservation is created `Waiting` and transitions exactly once, to
/// `Confirmed` or `Rejected`. Terminal states are never reopened; rejected
/// records stay behind as audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReservationStatus {
    Waiting,
    Confirmed,
    Rejected,
}

impl ReservationStatus {
    /// Database representation, shared by both store implementations.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Confirmed => "CONFIRMED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(Self::Waiting),
            "CONFIRMED" => Ok(Self::Confirmed),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(StoreError::Corrupt(format!(
                "unknown reservation status {other:?}"
            ))),
        }
    }
}

/// One reservation record as read back from either view.
///
/// Both views carry identical field values for the same
/// (locker id, shipment id) key when consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub locker_id: EntityId,
    pub shipment_id: EntityId,
    /// 0-based position of the claimed box within the locker.
    pub box_index: i32,
    /// Claim timestamp; strictly earlier claims win conflict validation.
    pub added_at: Timestamp,
    pub status: ReservationStatus,
}
