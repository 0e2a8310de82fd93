//! Shared domain types and pure allocation logic.
//!
//! Zero internal dependencies: everything here is usable from the store
//! layer, the engine, and the stress harness alike. Nothing in this crate
//! touches a database or the network.

pub mod candidate;
pub mod error;
pub mod types;
pub mod validation;
