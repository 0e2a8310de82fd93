//! Concurrency-safety stress harness for the allocation protocol, plus the
//! demo seed dataset.

pub mod harness;
pub mod seed;

pub use harness::{run_concurrency_check, CheckConfig, CheckReport};
