//! Store client layer.
//!
//! Data models for the four record collections, the abstract [`Store`]
//! trait, and its two implementations: Postgres-backed ([`PgStore`]) and
//! in-memory ([`MemoryStore`], used by tests and local runs).

pub mod models;
pub mod store;

pub use store::memory::MemoryStore;
pub use store::postgres::PgStore;
pub use store::Store;
