//! File naming for one store instance
//!
//! The path rule is frozen: `kvs_<instance>_<snapshot>.json` plus a `.hash`
//! sibling, and `kvs_<instance>_default.json` / `.hash` for the defaults
//! document. Temporary files used by atomic writes are dot-prefixed and
//! carry a `.tmp` suffix so they can be recognized and swept on open.

use stash_core::{InstanceId, SnapshotId};
use std::path::{Path, PathBuf};

/// Path construction for one `(directory, instance)` pair.
#[derive(Debug, Clone)]
pub(crate) struct InstancePaths {
    dir: PathBuf,
    instance_id: InstanceId,
}

impl InstancePaths {
    pub(crate) fn new(dir: PathBuf, instance_id: InstanceId) -> Self {
        Self { dir, instance_id }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    /// Payload file of one generation: `kvs_<I>_<S>.json`
    pub(crate) fn payload(&self, id: SnapshotId) -> PathBuf {
        self.dir.join(format!("kvs_{}_{}.json", self.instance_id, id))
    }

    /// Hash sibling of one generation: `kvs_<I>_<S>.hash`
    pub(crate) fn hash(&self, id: SnapshotId) -> PathBuf {
        self.dir.join(format!("kvs_{}_{}.hash", self.instance_id, id))
    }

    /// Defaults payload: `kvs_<I>_default.json`
    pub(crate) fn defaults_payload(&self) -> PathBuf {
        self.dir.join(format!("kvs_{}_default.json", self.instance_id))
    }

    /// Defaults hash sibling: `kvs_<I>_default.hash`
    pub(crate) fn defaults_hash(&self) -> PathBuf {
        self.dir.join(format!("kvs_{}_default.hash", self.instance_id))
    }

    /// Temporary payload file for the atomic write of one generation.
    pub(crate) fn payload_temp(&self, id: SnapshotId) -> PathBuf {
        self.dir
            .join(format!(".kvs_{}_{}.json.tmp", self.instance_id, id))
    }

    /// Temporary hash file for the atomic write of one generation.
    pub(crate) fn hash_temp(&self, id: SnapshotId) -> PathBuf {
        self.dir
            .join(format!(".kvs_{}_{}.hash.tmp", self.instance_id, id))
    }

    /// Parse the snapshot id out of a payload or hash file name belonging
    /// to this instance. Returns `None` for the defaults pair, temp files,
    /// other instances, and unrelated directory entries.
    pub(crate) fn parse_snapshot_id(&self, file_name: &str) -> Option<usize> {
        let prefix = format!("kvs_{}_", self.instance_id);
        let rest = file_name.strip_prefix(&prefix)?;
        let id = rest
            .strip_suffix(".json")
            .or_else(|| rest.strip_suffix(".hash"))?;
        id.parse().ok()
    }

    /// Whether a directory entry is a leftover temp file of this instance.
    pub(crate) fn is_temp_file(&self, file_name: &str) -> bool {
        file_name.starts_with(&format!(".kvs_{}_", self.instance_id))
            && file_name.ends_with(".tmp")
    }
}
