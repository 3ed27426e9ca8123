//! Configuration types
//!
//! Board-agnostic configuration structures, optionally serde-serializable.

pub mod types;

pub use types::*;
