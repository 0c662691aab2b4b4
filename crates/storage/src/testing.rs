//! Test fixtures
//!
//! Helpers for preparing on-disk instance state in tests: defaults
//! documents and pre-seeded snapshot pairs. Production code never writes
//! these files outside of `flush`.

use crate::paths::InstancePaths;
use crate::snapshot::save_pair;
use stash_core::{InstanceId, Result, SnapshotId, ValueMap};
use std::path::Path;

/// Write a verified defaults document for an instance.
pub fn write_defaults_file(dir: &Path, instance_id: InstanceId, map: &ValueMap) -> Result<()> {
    let paths = InstancePaths::new(dir.to_path_buf(), instance_id);
    save_pair(map, &paths.defaults_payload(), &paths.defaults_hash())
}

/// Write a verified snapshot pair at an arbitrary generation id,
/// bypassing rotation.
pub fn write_snapshot_pair(
    dir: &Path,
    instance_id: InstanceId,
    id: SnapshotId,
    map: &ValueMap,
) -> Result<()> {
    let paths = InstancePaths::new(dir.to_path_buf(), instance_id);
    save_pair(map, &paths.payload(id), &paths.hash(id))
}
