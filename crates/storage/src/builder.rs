//! Builder and open protocol
//!
//! [`KvStoreBuilder`] validates the configuration, loads the defaults
//! document and the newest valid snapshot according to the *need-kvs /
//! need-defaults* contract, and constructs the instance. Errors raised
//! here are terminal for the open attempt: a half-constructed instance
//! is never returned.
//!
//! # Load modes
//!
//! | Mode | File present | File absent |
//! |------|--------------|-------------|
//! | `Required` | load and validate | fail with `KvsFileReadError` |
//! | `Optional` | load if it verifies, else start empty | start empty |
//! | `Ignored`  | skip | skip |
//!
//! Under `Optional` the snapshot load scans generations `0..N` and takes
//! the newest pair that verifies, so a corrupted generation `0` falls
//! back to an older intact one. Under `Required` the first failure on
//! generation `0` surfaces to the caller unchanged.

use crate::defaults::DefaultsOverlay;
use crate::paths::InstancePaths;
use crate::snapshot::SnapshotStore;
use crate::store::KvStore;
use stash_core::{InstanceId, Result, SnapshotId, StoreError, ValueMap};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Default number of snapshot generations retained per instance.
pub const DEFAULT_SNAPSHOT_MAX_COUNT: usize = 3;

/// How the builder treats an on-disk document at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// The document must exist and verify; otherwise opening fails.
    Required,
    /// Use the document when it exists and verifies; start empty otherwise.
    #[default]
    Optional,
    /// Do not consult the document at all.
    Ignored,
}

/// Builder for opening or creating a [`KvStore`] instance.
///
/// Only the instance id is mandatory; every other option has a default.
///
/// ```no_run
/// use stash_storage::{InstanceId, KvStoreBuilder, LoadMode};
///
/// # fn main() -> stash_storage::Result<()> {
/// let store = KvStoreBuilder::new(InstanceId(0))
///     .dir("/var/lib/app")
///     .defaults(LoadMode::Required)
///     .snapshot_max_count(5)
///     .open()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct KvStoreBuilder {
    instance_id: InstanceId,
    dir: PathBuf,
    defaults: LoadMode,
    kvs_load: LoadMode,
    snapshot_max_count: usize,
}

impl KvStoreBuilder {
    /// Create a builder for the given instance.
    ///
    /// Defaults: current working directory, `Optional` for both the
    /// defaults document and the snapshot load, and
    /// [`DEFAULT_SNAPSHOT_MAX_COUNT`] retained generations.
    pub fn new(instance_id: InstanceId) -> Self {
        Self {
            instance_id,
            dir: PathBuf::new(),
            defaults: LoadMode::default(),
            kvs_load: LoadMode::default(),
            snapshot_max_count: DEFAULT_SNAPSHOT_MAX_COUNT,
        }
    }

    /// Set the working directory holding the instance files.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Configure how the defaults document is treated.
    pub fn defaults(mut self, mode: LoadMode) -> Self {
        self.defaults = mode;
        self
    }

    /// Configure how the newest snapshot is treated.
    pub fn kvs_load(mut self, mode: LoadMode) -> Self {
        self.kvs_load = mode;
        self
    }

    /// Flag form of [`defaults`](Self::defaults): `true` means the
    /// defaults document is required, `false` means optional.
    pub fn need_defaults(self, need: bool) -> Self {
        self.defaults(if need {
            LoadMode::Required
        } else {
            LoadMode::Optional
        })
    }

    /// Flag form of [`kvs_load`](Self::kvs_load): `true` means an existing
    /// snapshot is required, `false` means optional.
    pub fn need_kvs(self, need: bool) -> Self {
        self.kvs_load(if need {
            LoadMode::Required
        } else {
            LoadMode::Optional
        })
    }

    /// Set the maximum number of snapshot generations retained.
    ///
    /// Must be positive; zero is rejected at open time with `ConfigError`.
    pub fn snapshot_max_count(mut self, count: usize) -> Self {
        self.snapshot_max_count = count;
        self
    }

    /// Open the instance.
    ///
    /// # Errors
    /// * `ConfigError`: `snapshot_max_count` is zero
    /// * `KvsFileReadError` / `KvsHashFileReadError`: a required document
    ///   is missing or unreadable
    /// * `ValidationFailed`: a required document fails its integrity check
    /// * `JsonParserError`: a required document is malformed
    pub fn open(self) -> Result<KvStore> {
        if self.snapshot_max_count == 0 {
            return Err(StoreError::config("snapshot_max_count must be positive"));
        }

        if !self.dir.as_os_str().is_empty() {
            std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::KvsFileWrite {
                path: self.dir.clone(),
                source,
            })?;
        }

        let paths = InstancePaths::new(self.dir, self.instance_id);
        let snapshots = SnapshotStore::from_paths(paths.clone(), self.snapshot_max_count);

        let swept = snapshots.cleanup_temp_files();
        if swept > 0 {
            debug!(instance = %self.instance_id, swept, "removed stale temp files");
        }

        let defaults = match self.defaults {
            LoadMode::Ignored => DefaultsOverlay::empty(),
            LoadMode::Required => DefaultsOverlay::load(&paths)?,
            LoadMode::Optional => match DefaultsOverlay::load(&paths) {
                Ok(overlay) => overlay,
                Err(e) => {
                    if !matches!(&e, StoreError::KvsFileRead { source, .. }
                        if source.kind() == std::io::ErrorKind::NotFound)
                    {
                        warn!(instance = %self.instance_id, error = %e,
                            "defaults document unusable, starting with empty overlay");
                    }
                    DefaultsOverlay::empty()
                }
            },
        };

        let map = match self.kvs_load {
            LoadMode::Ignored => ValueMap::new(),
            LoadMode::Required => snapshots.load(SnapshotId::CURRENT)?,
            LoadMode::Optional => match snapshots.load_newest_valid() {
                Some((id, map)) => {
                    debug!(instance = %self.instance_id, snapshot = %id, keys = map.len(),
                        "loaded snapshot");
                    map
                }
                None => ValueMap::new(),
            },
        };

        Ok(KvStore::new(map, defaults, snapshots))
    }
}
