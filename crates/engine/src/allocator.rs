//! Allocation engine: claims one box in a locker for a shipment.
//!
//! The protocol is optimistic: write a WAITING claim, check for competing
//! claims, then promote to CONFIRMED or demote to REJECTED. There is no
//! coordinator and no cross-record transaction; the conflict validator's
//! read-then-decide check (see [`crate::validator`]) is the only
//! adjudication.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use lockbox_core::candidate::candidate_order;
use lockbox_core::error::AllocationError;
use lockbox_core::types::{EntityId, Timestamp};
use lockbox_db::models::ReservationStatus;
use lockbox_db::Store;

use crate::validator::validate_claim;

/// Terminal result of an allocation call that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// A box was claimed and promoted to CONFIRMED.
    Confirmed { box_index: i32 },
    /// Every eligible candidate was occupied or contested; no box obtained.
    /// A normal outcome, distinct from a store failure, and not retried.
    Exhausted,
}

/// Allocates boxes through an injected store client.
pub struct AllocationEngine {
    store: Arc<dyn Store>,
}

impl AllocationEngine {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Try to reserve one box of `locker_id` for `shipment_id`.
    ///
    /// `added_at` is the claim timestamp used for conflict tie-breaks. The
    /// reservation key is (locker, shipment): successive candidate attempts
    /// by the same call overwrite one another, so at most one record pair
    /// remains per call, carrying the final status.
    ///
    /// A store failure aborts immediately; records already written by this
    /// call are left in place (REJECTED attempts are permanent audit trail).
    pub async fn allocate(
        &self,
        locker_id: EntityId,
        shipment_id: EntityId,
        added_at: Timestamp,
    ) -> Result<AllocationOutcome, AllocationError> {
        let locker = self
            .store
            .get_locker(locker_id)
            .await?
            .ok_or(AllocationError::NotFound {
                entity: "locker",
                id: locker_id,
            })?;
        let shipment = self
            .store
            .get_shipment(shipment_id)
            .await?
            .ok_or(AllocationError::NotFound {
                entity: "shipment",
                id: shipment_id,
            })?;

        // One seeded RNG per call: reproducible under fixed inputs, while
        // still spreading concurrent callers across equal-capacity boxes.
        let mut rng = StdRng::seed_from_u64(tie_break_seed(shipment_id, added_at));
        let mut candidates = candidate_order(&locker.boxes, shipment.size, &mut rng);

        // Locally-known occupancy. May be stale under concurrency; the
        // validator re-checks each claim against a fresh read.
        let reservations = self.store.list_reservations_by_locker(locker_id).await?;
        let occupied: HashSet<i32> = reservations
            .iter()
            .filter(|r| r.status == ReservationStatus::Confirmed)
            .map(|r| r.box_index)
            .collect();
        candidates.retain(|&i| !occupied.contains(&(i as i32)));

        for index in candidates {
            let box_index = index as i32;
            self.store
                .write_reservation(
                    locker_id,
                    shipment_id,
                    box_index,
                    added_at,
                    ReservationStatus::Waiting,
                )
                .await?;

            if validate_claim(self.store.as_ref(), locker_id, shipment_id, box_index).await? {
                self.store
                    .write_reservation(
                        locker_id,
                        shipment_id,
                        box_index,
                        added_at,
                        ReservationStatus::Confirmed,
                    )
                    .await?;
                tracing::debug!(%locker_id, %shipment_id, box_index, "Reservation confirmed");
                return Ok(AllocationOutcome::Confirmed { box_index });
            }

            self.store
                .write_reservation(
                    locker_id,
                    shipment_id,
                    box_index,
                    added_at,
                    ReservationStatus::Rejected,
                )
                .await?;
            tracing::debug!(
                %locker_id,
                %shipment_id,
                box_index,
                "Claim contested, trying next candidate",
            );
        }

        tracing::debug!(%locker_id, %shipment_id, "Candidates exhausted, no box obtained");
        Ok(AllocationOutcome::Exhausted)
    }
}

/// Seed for the per-call tie-break RNG, derived from the call's inputs.
fn tie_break_seed(shipment_id: EntityId, added_at: Timestamp) -> u64 {
    let nanos = added_at
        .timestamp_nanos_opt()
        .unwrap_or_else(|| added_at.timestamp()) as u64;
    (shipment_id.as_u128() as u64) ^ nanos
}
