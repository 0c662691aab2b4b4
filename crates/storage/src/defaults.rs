//! Defaults overlay
//!
//! An instance may ship a defaults document (`kvs_<I>_default.json` plus
//! hash sibling) supplying fallback values for keys the application has
//! not written yet. The overlay is loaded once at open time and is
//! immutable for the life of the instance: it never participates in
//! writes, and keys that exist only in defaults are invisible to
//! `get_all_keys`.

use crate::paths::InstancePaths;
use crate::snapshot::load_verified;
use stash_core::{Result, StoreError, Value, ValueMap};

/// Immutable fallback values for one instance.
#[derive(Debug, Default)]
pub struct DefaultsOverlay {
    map: ValueMap,
}

impl DefaultsOverlay {
    /// An overlay with no defaults. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an overlay from an already-loaded map.
    pub fn from_map(map: ValueMap) -> Self {
        Self { map }
    }

    /// Load and verify the defaults document of an instance.
    pub(crate) fn load(paths: &InstancePaths) -> Result<Self> {
        let map = load_verified(&paths.defaults_payload(), &paths.defaults_hash())?;
        Ok(Self { map })
    }

    /// Whether a default exists for `key`.
    pub fn has_default(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// The default for `key`, or `KeyNotFound` when the defaults document
    /// does not mention it.
    pub fn default_value(&self, key: &str) -> Result<&Value> {
        self.map
            .get(key)
            .ok_or_else(|| StoreError::key_not_found(key))
    }

    /// Resolution helper for the store: the default for `key` when present.
    pub(crate) fn resolve(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Number of defaulted keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the overlay is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
