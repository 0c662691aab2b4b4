//! KVS instance
//!
//! [`KvStore`] is one opened store: an in-memory map, the immutable
//! defaults overlay, and the snapshot store that persists generations.
//! All mutating operations touch only the in-memory map; `flush` is the
//! single write path to disk, and `snapshot_restore` is the single read
//! path after open.
//!
//! # Lookup semantics
//!
//! A key is *written* only when it has been explicitly stored, even when
//! the stored value equals its default. Reads fall back to the defaults
//! overlay; `key_exists` and `get_all_keys` see written keys only.
//!
//! # Concurrency
//!
//! One instance is single-threaded: mutators take `&mut self` and callers
//! provide any cross-thread synchronization themselves. Two live
//! instances sharing an instance id *and* a directory would race on
//! rotation and are not supported.

use crate::defaults::DefaultsOverlay;
use crate::snapshot::{flush_map, SnapshotStore};
use stash_core::{InstanceId, Result, SnapshotId, StoreError, Value, ValueMap};
use std::path::Path;
use tracing::debug;

/// One opened key-value store instance.
///
/// Constructed by [`KvStoreBuilder`](crate::builder::KvStoreBuilder);
/// dropped without an implicit flush.
#[derive(Debug)]
pub struct KvStore {
    map: ValueMap,
    defaults: DefaultsOverlay,
    snapshots: SnapshotStore,
    dirty: bool,
}

impl KvStore {
    pub(crate) fn new(map: ValueMap, defaults: DefaultsOverlay, snapshots: SnapshotStore) -> Self {
        Self {
            map,
            defaults,
            snapshots,
            dirty: false,
        }
    }

    /// The instance id this store was opened with.
    pub fn instance_id(&self) -> InstanceId {
        self.snapshots.instance_id()
    }

    /// The working directory holding this instance's files.
    pub fn dir(&self) -> &Path {
        self.snapshots.dir()
    }

    /// Whether the in-memory state has been mutated since the last flush,
    /// restore, or open. Informational only: flushing a clean store still
    /// produces a new generation.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // =========================================================================
    // Key operations (in-memory only)
    // =========================================================================

    /// Written value when set, else the default when present.
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.map.get(key).or_else(|| self.defaults.resolve(key))
    }

    /// Assign a value to a key.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.map.insert(key.into(), value.into());
        self.dirty = true;
    }

    /// Get the value for a key: the written value when set, else the
    /// default when present.
    ///
    /// # Errors
    /// * `KeyNotFound`: key neither written nor defaulted
    pub fn get_value(&self, key: &str) -> Result<Value> {
        self.lookup(key)
            .cloned()
            .ok_or_else(|| StoreError::key_not_found(key))
    }

    /// Get the value for a key, converted to a concrete type.
    ///
    /// # Errors
    /// * `KeyNotFound`: key neither written nor defaulted
    /// * `TypeMismatch`: stored tag disagrees with `T`
    pub fn get_value_as<T>(&self, key: &str) -> Result<T>
    where
        for<'a> T: TryFrom<&'a Value, Error = StoreError>,
    {
        let value = self
            .lookup(key)
            .ok_or_else(|| StoreError::key_not_found(key))?;
        T::try_from(value)
    }

    /// Whether `key` has been written. Defaults do not count.
    pub fn key_exists(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Remove a written key. Removing an absent key is not an error;
    /// returns whether an entry was present.
    pub fn remove_key(&mut self, key: &str) -> bool {
        let removed = self.map.remove(key).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// List all written keys. Keys that exist only in defaults are not
    /// included.
    pub fn get_all_keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    /// Whether a default exists for `key`.
    ///
    /// # Errors
    /// * `KeyNotFound`: key neither written nor defaulted
    pub fn has_default_value(&self, key: &str) -> Result<bool> {
        if self.defaults.has_default(key) {
            Ok(true)
        } else if self.map.contains_key(key) {
            Ok(false)
        } else {
            Err(StoreError::key_not_found(key))
        }
    }

    /// The default value for `key`.
    ///
    /// # Errors
    /// * `KeyNotFound`: key not present in the defaults document
    pub fn get_default_value(&self, key: &str) -> Result<Value> {
        self.defaults.default_value(key).cloned()
    }

    /// Whether `key` currently resolves to its default value.
    ///
    /// A written value is compared structurally against the default, tag
    /// included; an unwritten key with a default trivially resolves to it.
    ///
    /// # Errors
    /// * `KeyNotFound`: key neither written nor defaulted
    pub fn is_value_default(&self, key: &str) -> Result<bool> {
        match (self.map.get(key), self.defaults.resolve(key)) {
            (Some(written), Some(default)) => Ok(written == default),
            (Some(_), None) => Ok(false),
            (None, Some(_)) => Ok(true),
            (None, None) => Err(StoreError::key_not_found(key)),
        }
    }

    /// Clear all written keys. Defaults become visible for every defaulted
    /// key. Does not touch disk.
    pub fn reset(&mut self) {
        if !self.map.is_empty() {
            self.dirty = true;
        }
        self.map.clear();
    }

    /// Clear a single written key, letting it fall back to its default
    /// (when one exists). Resetting an unwritten key is a no-op.
    pub fn reset_key(&mut self, key: &str) {
        if self.map.remove(key).is_some() {
            self.dirty = true;
        }
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Persist the in-memory state as snapshot generation `0`, rotating
    /// older generations up by one.
    ///
    /// # Errors
    /// * `KvsFileWriteError`: payload could not be written or rotated
    /// * `KvsHashFileWriteError`: hash sibling could not be written
    pub fn flush(&mut self) -> Result<()> {
        flush_map(&self.snapshots, &self.map)?;
        self.dirty = false;
        Ok(())
    }

    /// Number of complete generations currently on disk.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.count()
    }

    /// Maximum number of generations retained.
    pub fn snapshot_max_count(&self) -> usize {
        self.snapshots.max_count()
    }

    /// Replace the in-memory state with the contents of an older
    /// generation. Disk files are left untouched; the restored state
    /// becomes a *new* generation on the next flush.
    ///
    /// Id `0` is the live generation and cannot be restored.
    ///
    /// # Errors
    /// * `InvalidSnapshotId`: id `0`, out of range, or no complete pair
    /// * `ValidationFailed`: the generation's hash does not match
    /// * `KvsFileReadError` / `KvsHashFileReadError`: pair unreadable
    pub fn snapshot_restore(&mut self, id: SnapshotId) -> Result<()> {
        if id == SnapshotId::CURRENT
            || id.raw() >= self.snapshots.max_count()
            || !self.snapshots.has_pair(id)
        {
            return Err(StoreError::invalid_snapshot_id(id.raw()));
        }

        // Load fully before replacing anything: a failed restore must
        // leave the in-memory state unchanged.
        let restored = self.snapshots.load(id)?;
        self.map = restored;
        self.dirty = true;
        debug!(instance = %self.instance_id(), snapshot = %id, "restored snapshot");
        Ok(())
    }
}
