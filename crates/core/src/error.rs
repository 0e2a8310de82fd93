use crate::types::EntityId;

/// A failed interaction with the backing store.
///
/// The protocol performs no automatic retry: the first store failure aborts
/// the in-progress call and surfaces here. Retry policy, if any, belongs to
/// the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A read or write against the store failed (timeout, connection loss,
    /// rejected statement).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A record was read back but could not be decoded into its model.
    #[error("malformed record: {0}")]
    Corrupt(String),
}

/// Errors surfaced by an allocation call.
///
/// Exhausting every candidate box is deliberately *not* represented here:
/// that is a normal outcome of the protocol (`AllocationOutcome::Exhausted`
/// in the engine crate), and must stay distinguishable from a store failure.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    /// Referenced locker or shipment does not exist. Raised before any
    /// reservation record is written.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: EntityId },

    /// Malformed input rejected at the boundary, before any store access.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A store operation failed mid-call. Partial writes already committed
    /// by this call are not rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),
}
