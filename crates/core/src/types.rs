//! Identifier types for stash
//!
//! This module defines the two identifiers of the on-disk layout:
//! - InstanceId: identifies one logical store within a directory
//! - SnapshotId: identifies one flushed generation of an instance

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one logical store instance within a working directory.
///
/// Instances with distinct ids share a directory without interfering;
/// two live instances with the *same* id in the same directory race on
/// snapshot rotation and are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create an instance id from its raw value.
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl From<u32> for InstanceId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one snapshot generation.
///
/// Id `0` is always the newest generation; higher ids are older. Rotation
/// renames generation `i` to `i + 1` on every flush, so a given id does
/// not name a fixed point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotId(pub usize);

impl SnapshotId {
    /// The newest generation.
    pub const CURRENT: SnapshotId = SnapshotId(0);

    /// Create a snapshot id from its raw value.
    pub fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub fn raw(&self) -> usize {
        self.0
    }
}

impl From<usize> for SnapshotId {
    fn from(raw: usize) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_display() {
        assert_eq!(InstanceId(7).to_string(), "7");
        assert_eq!(InstanceId::new(123).to_string(), "123");
    }

    #[test]
    fn test_instance_id_equality() {
        assert_eq!(InstanceId(1), InstanceId::from(1));
        assert_ne!(InstanceId(1), InstanceId(2));
    }

    #[test]
    fn test_snapshot_id_ordering() {
        // Newest first: id 0 sorts before older generations.
        let mut ids = vec![SnapshotId(2), SnapshotId(0), SnapshotId(1)];
        ids.sort();
        assert_eq!(ids, vec![SnapshotId(0), SnapshotId(1), SnapshotId(2)]);
        assert_eq!(ids[0], SnapshotId::CURRENT);
    }

    #[test]
    fn test_snapshot_id_display() {
        assert_eq!(SnapshotId(0).to_string(), "0");
        assert_eq!(SnapshotId::new(42).raw(), 42);
    }
}
