//! The box-allocation protocol.
//!
//! Candidate ordering, optimistic reservation, conflict validation, and
//! promotion or rejection — everything between "a shipment wants a box" and
//! "this box is CONFIRMED for it" (or "no box was obtained").

pub mod allocator;
pub mod validator;

pub use allocator::{AllocationEngine, AllocationOutcome};
