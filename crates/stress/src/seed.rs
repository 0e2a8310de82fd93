//! Demo dataset: one locker and a handful of named shipments, allocated
//! sequentially. Useful for eyeballing the protocol against a live store.

use std::sync::Arc;

use chrono::Utc;

use lockbox_core::error::AllocationError;
use lockbox_core::types::{BoxSize, SIZE_LARGE, SIZE_MEDIUM, SIZE_SMALL};
use lockbox_core::validation::{validate_capacities, validate_name, validate_size};
use lockbox_db::Store;
use lockbox_engine::AllocationEngine;

/// Capacities of the demo locker: one box of each class on each side.
const DEMO_BOXES: [BoxSize; 6] = [
    SIZE_SMALL,
    SIZE_MEDIUM,
    SIZE_LARGE,
    SIZE_LARGE,
    SIZE_MEDIUM,
    SIZE_SMALL,
];

/// Demo shipments. One more large shipment than there are large boxes, so
/// the final allocation ends exhausted by design.
const DEMO_SHIPMENTS: [(&str, BoxSize); 7] = [
    ("Allegro", SIZE_MEDIUM),
    ("Nike", SIZE_SMALL),
    ("Adidas", SIZE_SMALL),
    ("Decathlon", SIZE_LARGE),
    ("Puma", SIZE_SMALL),
    ("Reebok", SIZE_SMALL),
    ("Action", SIZE_LARGE),
];

/// Create the demo locker and shipments, then allocate each shipment into
/// the locker in order.
pub async fn seed_demo(store: Arc<dyn Store>) -> Result<(), AllocationError> {
    validate_name("POZ123")?;
    validate_capacities(&DEMO_BOXES)?;
    let locker_id = store.create_locker("POZ123", &DEMO_BOXES).await?;

    let engine = AllocationEngine::new(Arc::clone(&store));
    for (name, size) in DEMO_SHIPMENTS {
        validate_name(name)?;
        validate_size(size)?;
        let shipment_id = store.create_shipment(name, size).await?;
        let outcome = engine.allocate(locker_id, shipment_id, Utc::now()).await?;
        tracing::info!(name, ?outcome, "Seed allocation finished");
    }
    Ok(())
}
