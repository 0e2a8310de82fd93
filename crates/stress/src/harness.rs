//! Randomized concurrent allocation followed by a duplicate-occupancy scan.
//!
//! Many workers hammer a small set of lockers, then every locker is scanned
//! for box indices holding more than one CONFIRMED reservation. Any
//! duplicate is a safety violation of the protocol. The count is reported,
//! not asserted: the validator's read-then-decide check leaves a known race
//! window open, and this harness exists to measure it statistically.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;
use tokio_util::sync::CancellationToken;

use lockbox_core::error::{AllocationError, StoreError};
use lockbox_core::types::{BoxSize, EntityId, SIZE_CLASSES, SIZE_SMALL};
use lockbox_db::models::ReservationStatus;
use lockbox_db::Store;
use lockbox_engine::{AllocationEngine, AllocationOutcome};

/// Upper bound on the worker join; stragglers are cancelled past this.
const JOIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Boxes per generated locker (inclusive bounds).
const MIN_BOXES: usize = 1;
const MAX_BOXES: usize = 5;

/// Parameters for one concurrency check run.
#[derive(Debug, Clone, Copy)]
pub struct CheckConfig {
    /// Lockers to generate.
    pub lockers: usize,
    /// Shipments to generate.
    pub shipments: usize,
    /// Concurrent worker tasks.
    pub workers: usize,
}

impl CheckConfig {
    fn validate(&self) -> Result<(), AllocationError> {
        if self.lockers == 0 || self.shipments == 0 || self.workers == 0 {
            return Err(AllocationError::InvalidInput(
                "lockers, shipments, and workers must all be positive".into(),
            ));
        }
        Ok(())
    }

    /// Allocation rounds for the whole run, split across workers.
    fn rounds_per_worker(&self) -> usize {
        (self.lockers * 2).div_ceil(self.workers)
    }
}

/// Outcome of a concurrency check run.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckReport {
    /// Allocate calls that ended with a CONFIRMED box.
    pub confirmed: usize,
    /// Allocate calls that exhausted their candidates.
    pub exhausted: usize,
    /// Allocate calls that failed with a store or protocol error.
    pub errors: usize,
    /// Box indices holding more than one CONFIRMED reservation, summed over
    /// all lockers. Any value above zero is a detected safety violation.
    pub violations: usize,
}

#[derive(Debug, Default)]
struct WorkerTotals {
    confirmed: usize,
    exhausted: usize,
    errors: usize,
}

/// Reset the store, generate randomized fixtures, run concurrent workers,
/// then scan every locker for duplicate confirmed occupants.
pub async fn run_concurrency_check(
    store: Arc<dyn Store>,
    config: CheckConfig,
) -> Result<CheckReport, AllocationError> {
    config.validate()?;
    store.reset_all().await?;

    let (locker_ids, shipment_ids) = generate_fixtures(store.as_ref(), &config).await?;
    tracing::info!(
        lockers = locker_ids.len(),
        shipments = shipment_ids.len(),
        workers = config.workers,
        rounds_per_worker = config.rounds_per_worker(),
        "Fixtures generated, starting workers",
    );

    let cancel = CancellationToken::new();
    let mut handles = Vec::with_capacity(config.workers);
    for worker in 0..config.workers {
        let store = Arc::clone(&store);
        let locker_ids = locker_ids.clone();
        let shipment_ids = shipment_ids.clone();
        let cancel = cancel.clone();
        let rounds = config.rounds_per_worker();
        handles.push(tokio::spawn(async move {
            worker_loop(worker, store, locker_ids, shipment_ids, rounds, cancel).await
        }));
    }

    // Bounded join: past the budget, cancel remaining work and collect
    // whatever the workers managed to finish. Workers poll the token every
    // round, so the second await returns promptly.
    let collect = async {
        let mut totals = WorkerTotals::default();
        for handle in handles {
            match handle.await {
                Ok(t) => {
                    totals.confirmed += t.confirmed;
                    totals.exhausted += t.exhausted;
                    totals.errors += t.errors;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Worker task panicked");
                    totals.errors += 1;
                }
            }
        }
        totals
    };
    tokio::pin!(collect);
    let totals = tokio::select! {
        totals = &mut collect => totals,
        _ = tokio::time::sleep(JOIN_TIMEOUT) => {
            tracing::warn!("Worker join timed out, cancelling remaining work");
            cancel.cancel();
            collect.await
        }
    };

    let mut violations = 0;
    for locker_id in &locker_ids {
        violations += scan_locker(store.as_ref(), *locker_id).await?;
    }

    Ok(CheckReport {
        confirmed: totals.confirmed,
        exhausted: totals.exhausted,
        errors: totals.errors,
        violations,
    })
}

/// Count box indices with more than one CONFIRMED reservation in one locker.
pub async fn scan_locker(store: &dyn Store, locker_id: EntityId) -> Result<usize, StoreError> {
    let reservations = store.list_reservations_by_locker(locker_id).await?;

    let mut confirmed_per_box: HashMap<i32, usize> = HashMap::new();
    for record in reservations
        .iter()
        .filter(|r| r.status == ReservationStatus::Confirmed)
    {
        *confirmed_per_box.entry(record.box_index).or_default() += 1;
    }

    let duplicates = confirmed_per_box.values().filter(|&&n| n > 1).count();
    if duplicates == 0 {
        tracing::debug!(%locker_id, "No duplicate occupants");
    } else {
        tracing::warn!(%locker_id, duplicates, "Safety violation: duplicate confirmed occupants");
    }
    Ok(duplicates)
}

async fn generate_fixtures(
    store: &dyn Store,
    config: &CheckConfig,
) -> Result<(Vec<EntityId>, Vec<EntityId>), StoreError> {
    // Draw all random data up front; ThreadRng must not be held across an
    // await point.
    let (locker_plans, shipment_sizes) = {
        let mut rng = rand::rng();
        let locker_plans: Vec<Vec<BoxSize>> = (0..config.lockers)
            .map(|_| {
                let boxes = rng.random_range(MIN_BOXES..=MAX_BOXES);
                (0..boxes)
                    .map(|_| SIZE_CLASSES.choose(&mut rng).copied().unwrap_or(SIZE_SMALL))
                    .collect()
            })
            .collect();
        let shipment_sizes: Vec<BoxSize> = (0..config.shipments)
            .map(|_| SIZE_CLASSES.choose(&mut rng).copied().unwrap_or(SIZE_SMALL))
            .collect();
        (locker_plans, shipment_sizes)
    };

    let mut locker_ids = Vec::with_capacity(config.lockers);
    for (i, boxes) in locker_plans.iter().enumerate() {
        locker_ids.push(store.create_locker(&format!("locker-{i}"), boxes).await?);
    }

    let mut shipment_ids = Vec::with_capacity(config.shipments);
    for (i, size) in shipment_sizes.iter().enumerate() {
        shipment_ids.push(store.create_shipment(&format!("shipment-{i}"), *size).await?);
    }

    Ok((locker_ids, shipment_ids))
}

async fn worker_loop(
    worker: usize,
    store: Arc<dyn Store>,
    lockers: Vec<EntityId>,
    shipments: Vec<EntityId>,
    rounds: usize,
    cancel: CancellationToken,
) -> WorkerTotals {
    let engine = AllocationEngine::new(store);
    let mut totals = WorkerTotals::default();

    for round in 0..rounds {
        if cancel.is_cancelled() {
            tracing::debug!(worker, round, "Worker cancelled");
            break;
        }

        let picked = {
            let mut rng = rand::rng();
            match (lockers.choose(&mut rng), shipments.choose(&mut rng)) {
                (Some(&locker_id), Some(&shipment_id)) => Some((locker_id, shipment_id)),
                _ => None,
            }
        };
        let Some((locker_id, shipment_id)) = picked else {
            break;
        };

        match engine.allocate(locker_id, shipment_id, Utc::now()).await {
            Ok(AllocationOutcome::Confirmed { box_index }) => {
                totals.confirmed += 1;
                tracing::debug!(worker, %locker_id, %shipment_id, box_index, "Confirmed");
            }
            Ok(AllocationOutcome::Exhausted) => {
                totals.exhausted += 1;
            }
            Err(e) => {
                totals.errors += 1;
                tracing::error!(worker, error = %e, "Allocate call failed");
            }
        }
    }

    totals
}
