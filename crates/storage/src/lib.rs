//! Persistence engine for stash
//!
//! This crate implements the file-backed store behind the public API:
//! - SnapshotStore: generation files, atomic writes, rotation
//! - DefaultsOverlay: immutable fallback values loaded at open time
//! - KvStore: the in-memory instance with flush/restore
//! - KvStoreBuilder: the open protocol (need-kvs / need-defaults)
//!
//! # On-disk layout
//!
//! For working directory `D`, instance `I`, generation `S`:
//!
//! ```text
//! D/kvs_<I>_<S>.json      payload (JSON object, keys → tagged values)
//! D/kvs_<I>_<S>.hash      8-hex-digit lowercase Adler-32 of the payload bytes
//! D/kvs_<I>_default.json  defaults payload (same schema)
//! D/kvs_<I>_default.hash  Adler-32 over the defaults payload
//! ```
//!
//! A generation is valid only when payload and hash are both present and
//! agree. Writers publish payload first, then hash; readers that see a
//! payload without a matching hash treat the pair as absent.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod defaults;
pub mod integrity;
pub(crate) mod paths;
pub mod snapshot;
pub mod store;
pub mod testing;

pub use builder::{KvStoreBuilder, LoadMode, DEFAULT_SNAPSHOT_MAX_COUNT};
pub use defaults::DefaultsOverlay;
pub use snapshot::SnapshotStore;
pub use store::KvStore;

// Re-export the core types that make up the public API surface
pub use stash_core::{
    ErrorCode, InstanceId, Result, SnapshotId, StoreError, Value, ValueMap, ValueTag,
};
