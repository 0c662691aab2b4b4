//! Core types for stash
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: Unified enum for all storable data types
//! - ValueMap: String-keyed map of values (the in-memory store shape)
//! - InstanceId / SnapshotId: Identifiers for instances and generations
//! - StoreError / ErrorCode: Error type hierarchy
//! - json: The tagged JSON payload codec

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod json;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use error::{ErrorCode, Result, StoreError};
pub use types::{InstanceId, SnapshotId};
pub use value::{Value, ValueMap, ValueTag};
