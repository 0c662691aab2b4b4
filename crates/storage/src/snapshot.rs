//! Snapshot store: generation files, atomic writes, rotation
//!
//! Snapshots are numbered generations of one instance, newest at id `0`.
//! Publishing a new generation uses the write-fsync-rename pattern:
//!
//! 1. Write payload to a dot-prefixed temporary file, fsync
//! 2. Write the hash sibling to its own temporary file, fsync
//! 3. Rename the payload into place, then the hash
//! 4. fsync the directory
//!
//! A reader that observes a payload without a matching hash treats the
//! pair as invalid, so the rename ordering makes the new generation
//! appear atomically. A crash between the renames leaves generation `0`
//! invalid but never damages older generations.
//!
//! Rotation runs before each write: ids at or past the configured maximum
//! are deleted, then every remaining generation moves up by one
//! (`i-1 → i`, for `i` from the maximum down to `1`). Partial pairs move
//! too — a payload that lost its hash still ages out instead of pinning
//! its slot forever.

use crate::integrity;
use crate::paths::InstancePaths;
use stash_core::{json, InstanceId, Result, SnapshotId, StoreError, ValueMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Load and verify one payload/hash pair into a map.
///
/// Shared by generation loads and the defaults overlay, which use the
/// same schema and the same integrity rule.
pub(crate) fn load_verified(payload_path: &Path, hash_path: &Path) -> Result<ValueMap> {
    let payload = fs::read(payload_path).map_err(|source| StoreError::KvsFileRead {
        path: payload_path.to_path_buf(),
        source,
    })?;
    let hash_text = fs::read_to_string(hash_path).map_err(|source| StoreError::KvsHashFileRead {
        path: hash_path.to_path_buf(),
        source,
    })?;
    integrity::verify(&payload, &hash_text, payload_path)?;
    json::from_payload_bytes(&payload)
}

/// Maps `(instance, snapshot id)` to on-disk file pairs and owns their
/// lifecycle: atomic publication, rotation, enumeration, deletion.
#[derive(Debug)]
pub struct SnapshotStore {
    paths: InstancePaths,
    max_count: usize,
}

impl SnapshotStore {
    /// Create a snapshot store for one instance in `dir`.
    ///
    /// `max_count` is the number of generations retained; it must be
    /// positive (the builder validates this before constructing one).
    pub fn new(dir: PathBuf, instance_id: InstanceId, max_count: usize) -> Self {
        Self {
            paths: InstancePaths::new(dir, instance_id),
            max_count,
        }
    }

    pub(crate) fn from_paths(paths: InstancePaths, max_count: usize) -> Self {
        Self { paths, max_count }
    }

    /// The instance these generations belong to.
    pub fn instance_id(&self) -> InstanceId {
        self.paths.instance_id()
    }

    /// The working directory.
    pub fn dir(&self) -> &Path {
        self.paths.dir()
    }

    /// Maximum number of generations retained.
    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Whether both files of a generation exist.
    pub fn has_pair(&self, id: SnapshotId) -> bool {
        self.paths.payload(id).exists() && self.paths.hash(id).exists()
    }

    /// Number of complete generations with ids in `0..max_count`.
    pub fn count(&self) -> usize {
        self.ids().len()
    }

    /// Enumerate complete generations, ascending (newest first).
    pub fn ids(&self) -> Vec<SnapshotId> {
        (0..self.max_count)
            .map(SnapshotId)
            .filter(|id| self.has_pair(*id))
            .collect()
    }

    /// Publish `payload` as the new generation `0`.
    ///
    /// Rotates existing generations up by one first, then writes the new
    /// pair with the crash-safe protocol described in the module docs.
    pub fn write(&self, payload: &[u8]) -> Result<()> {
        self.rotate()?;

        let current = SnapshotId::CURRENT;
        let payload_path = self.paths.payload(current);
        let hash_path = self.paths.hash(current);
        let payload_temp = self.paths.payload_temp(current);
        let hash_temp = self.paths.hash_temp(current);

        let hash_text = integrity::encode(integrity::checksum(payload));

        write_temp(&payload_temp, payload).map_err(|source| StoreError::KvsFileWrite {
            path: payload_temp.clone(),
            source,
        })?;
        write_temp(&hash_temp, hash_text.as_bytes()).map_err(|source| {
            StoreError::KvsHashFileWrite {
                path: hash_temp.clone(),
                source,
            }
        })?;

        // Payload first, then hash: the pair only becomes valid with the
        // second rename.
        fs::rename(&payload_temp, &payload_path).map_err(|source| StoreError::KvsFileWrite {
            path: payload_path.clone(),
            source,
        })?;
        fs::rename(&hash_temp, &hash_path).map_err(|source| StoreError::KvsHashFileWrite {
            path: hash_path.clone(),
            source,
        })?;

        sync_dir(self.paths.dir()).map_err(|source| StoreError::KvsFileWrite {
            path: self.paths.dir().to_path_buf(),
            source,
        })?;

        debug!(
            instance = %self.instance_id(),
            bytes = payload.len(),
            "published snapshot 0"
        );
        Ok(())
    }

    /// Load and verify one generation.
    pub fn load(&self, id: SnapshotId) -> Result<ValueMap> {
        load_verified(&self.paths.payload(id), &self.paths.hash(id))
    }

    /// Scan for the newest generation that loads and verifies.
    ///
    /// Damaged or incomplete pairs are skipped; they stay on disk and age
    /// out through rotation.
    pub fn load_newest_valid(&self) -> Option<(SnapshotId, ValueMap)> {
        for id in (0..self.max_count).map(SnapshotId) {
            match self.load(id) {
                Ok(map) => return Some((id, map)),
                Err(e) if matches!(&e, StoreError::KvsFileRead { source, .. }
                        if source.kind() == std::io::ErrorKind::NotFound) =>
                {
                    continue;
                }
                Err(e) => {
                    warn!(instance = %self.instance_id(), snapshot = %id, error = %e,
                        "skipping invalid snapshot");
                }
            }
        }
        None
    }

    /// Remove leftover temporary files from interrupted writes.
    ///
    /// Best effort: an entry that cannot be removed is logged and skipped.
    /// Returns the number of files removed.
    pub fn cleanup_temp_files(&self) -> usize {
        let Ok(entries) = fs::read_dir(self.paths.dir()) else {
            return 0;
        };
        let mut removed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if self.paths.is_temp_file(name) {
                match fs::remove_file(entry.path()) {
                    Ok(()) => removed += 1,
                    Err(e) => warn!(path = %entry.path().display(), error = %e,
                        "failed to remove stale temp file"),
                }
            }
        }
        removed
    }

    /// Rotate generations up by one to make room at id `0`.
    fn rotate(&self) -> Result<()> {
        if !self.paths.dir().exists() {
            return Ok(());
        }
        self.discard_overflow()?;

        for idx in (1..self.max_count).rev() {
            let from = SnapshotId(idx - 1);
            let to = SnapshotId(idx);
            let moved_payload = rename_if_exists(&self.paths.payload(from), &self.paths.payload(to))
                .map_err(|source| StoreError::KvsFileWrite {
                    path: self.paths.payload(from),
                    source,
                })?;
            let moved_hash = rename_if_exists(&self.paths.hash(from), &self.paths.hash(to))
                .map_err(|source| StoreError::KvsHashFileWrite {
                    path: self.paths.hash(from),
                    source,
                })?;
            if moved_payload || moved_hash {
                debug!(instance = %self.instance_id(), "rotated snapshot {from} -> {to}");
            }
        }
        Ok(())
    }

    /// Delete generation files at ids past the retention window, so the
    /// upcoming rotation cannot push anything beyond `max_count - 1`.
    fn discard_overflow(&self) -> Result<()> {
        let entries = fs::read_dir(self.paths.dir()).map_err(|source| StoreError::KvsFileRead {
            path: self.paths.dir().to_path_buf(),
            source,
        })?;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(id) = self.paths.parse_snapshot_id(name) else {
                continue;
            };
            if id >= self.max_count {
                debug!(instance = %self.instance_id(), snapshot = id, "discarding expired snapshot file");
                fs::remove_file(entry.path()).map_err(|source| {
                    if name.ends_with(".hash") {
                        StoreError::KvsHashFileWrite {
                            path: entry.path(),
                            source,
                        }
                    } else {
                        StoreError::KvsFileWrite {
                            path: entry.path(),
                            source,
                        }
                    }
                })?;
            }
        }
        Ok(())
    }
}

/// Serialize a map and publish it as generation `0`.
pub(crate) fn flush_map(store: &SnapshotStore, map: &ValueMap) -> Result<()> {
    let payload = json::to_payload_bytes(map)?;
    store.write(&payload)
}

/// Convenience used by tests and the defaults tooling: write an arbitrary
/// payload/hash pair without rotation.
pub(crate) fn save_pair(map: &ValueMap, payload_path: &Path, hash_path: &Path) -> Result<()> {
    let payload = json::to_payload_bytes(map)?;
    fs::write(payload_path, &payload).map_err(|source| StoreError::KvsFileWrite {
        path: payload_path.to_path_buf(),
        source,
    })?;
    let hash_text = integrity::encode(integrity::checksum(&payload));
    fs::write(hash_path, hash_text).map_err(|source| StoreError::KvsHashFileWrite {
        path: hash_path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn write_temp(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

fn rename_if_exists(from: &Path, to: &Path) -> std::io::Result<bool> {
    if !from.exists() {
        return Ok(false);
    }
    fs::rename(from, to)?;
    Ok(true)
}
