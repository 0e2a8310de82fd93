//! Conflict validation: decides whether a WAITING claim may be promoted.
//!
//! A best-effort read-then-decide check over an eventually consistent store.
//! Two validators that both read before either promotes can both see
//! themselves as the earliest claimant and both confirm; the stress harness
//! measures exactly this residual race. Closing it would need a genuine
//! conditional-write-once primitive, which the store does not provide for
//! the promotion step.

use lockbox_core::error::AllocationError;
use lockbox_core::types::EntityId;
use lockbox_db::models::{ReservationStatus, ReservationView};
use lockbox_db::Store;

/// Whether the caller's claim on (`locker_id`, `box_index`) is currently the
/// unique, earliest, still-uncontested one.
///
/// The caller's own timestamp is re-read from the shipment view so the
/// decision is made against the durable write, not an in-memory copy.
/// Ineligible when another reservation on the box is already CONFIRMED, or
/// when any competing claim on it carries a strictly earlier timestamp.
pub async fn validate_claim(
    store: &dyn Store,
    locker_id: EntityId,
    shipment_id: EntityId,
    box_index: i32,
) -> Result<bool, AllocationError> {
    let visible = store.list_reservations_by_locker(locker_id).await?;

    let own = match store
        .get_reservation(ReservationView::ByShipment, locker_id, shipment_id)
        .await?
    {
        Some(own) => own,
        None => {
            // The store has not surfaced our own write yet (read-your-writes
            // is not guaranteed). Without a durable timestamp there is
            // nothing to adjudicate against; treat the claim as contested.
            tracing::warn!(
                %locker_id,
                %shipment_id,
                box_index,
                "Own claim not readable back, treating as contested",
            );
            return Ok(false);
        }
    };

    let contenders: Vec<_> = visible.iter().filter(|r| r.box_index == box_index).collect();

    if contenders
        .iter()
        .any(|r| r.status == ReservationStatus::Confirmed)
    {
        return Ok(false);
    }

    if contenders.iter().any(|r| r.added_at < own.added_at) {
        return Ok(false);
    }

    Ok(true)
}
