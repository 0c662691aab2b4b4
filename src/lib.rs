//! # Stash
//!
//! An embedded, file-backed key-value store for middleware that needs small,
//! typed configuration and state persistence — with snapshot rotation,
//! integrity-checked payloads, and per-instance defaults overlays.
//!
//! # Quick Start
//!
//! ```no_run
//! use stash::{InstanceId, KvStoreBuilder, Value};
//!
//! fn main() -> stash::Result<()> {
//!     let mut store = KvStoreBuilder::new(InstanceId(0))
//!         .dir("./my-data")
//!         .open()?;
//!
//!     store.set_value("user:name", "Alice");
//!     assert_eq!(store.get_value("user:name")?, Value::String("Alice".into()));
//!
//!     // Persist the current state as snapshot generation 0. Older
//!     // generations rotate up and age out past the configured maximum.
//!     store.flush()?;
//!
//!     // Roll back to an older on-disk generation.
//!     if store.snapshot_count() > 1 {
//!         store.snapshot_restore(stash::SnapshotId(1))?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Storage model
//!
//! | Concept | Meaning |
//! |---------|---------|
//! | **Instance** | One logical store in a directory, identified by [`InstanceId`] |
//! | **Snapshot** | A flushed generation on disk; id `0` is always the newest |
//! | **Rotation** | On flush, generation `i` becomes `i + 1`; ids past the maximum are deleted |
//! | **Defaults overlay** | Immutable fallback values consulted for keys never written |
//! | **Integrity hash** | Adler-32 of the payload bytes, stored beside the payload |
//!
//! The engine is single-threaded per instance: callers provide external
//! synchronization, and only `flush`, `snapshot_restore`, and the open path
//! touch the filesystem.
//!
//! Internal crates (`stash-core`, `stash-storage`) are not exposed directly.
//! Only the surface re-exported here is stable.

// Re-export the public API from stash-storage
pub use stash_storage::*;
