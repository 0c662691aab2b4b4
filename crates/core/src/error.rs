//! Error types for stash
//!
//! This module defines the error surface of the whole engine. We use
//! `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Error Model
//!
//! [`StoreError`] is the unified error type returned by every fallible
//! operation. Each variant carries the context a caller needs (the key,
//! the offending path, the underlying I/O error), while [`ErrorCode`]
//! provides the frozen classification used for matching and reporting.
//!
//! ### Canonical Error Codes (Frozen)
//!
//! | Code | Description |
//! |------|-------------|
//! | KeyNotFound | Key neither written nor present in defaults |
//! | TypeMismatch | Value tag disagrees with the requested type |
//! | InvalidSnapshotId | Snapshot id out of range or not on disk |
//! | KvsFileReadError | Payload file could not be read |
//! | KvsFileWriteError | Payload file could not be written |
//! | KvsHashFileReadError | Hash sibling could not be read |
//! | KvsHashFileWriteError | Hash sibling could not be written |
//! | JsonParserError | Payload JSON malformed or not encodable |
//! | ValidationFailed | Stored hash does not match the payload bytes |
//! | ConfigError | Contradictory or out-of-range builder options |
//!
//! Expected failures (missing keys, invalid snapshot ids) are ordinary
//! `Err` values, never panics. I/O failures keep payload and hash reads
//! distinguishable so callers can tell which file of a pair is damaged.

use crate::value::ValueTag;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stash operations
pub type Result<T> = std::result::Result<T, StoreError>;

// =============================================================================
// ErrorCode - Canonical Error Classification (Frozen)
// =============================================================================

/// Canonical error codes.
///
/// These 10 codes are the stable classification of all engine errors.
/// They are frozen and will not change without a major version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Key neither written nor present in defaults
    KeyNotFound,
    /// Value tag disagrees with the requested type
    TypeMismatch,
    /// Snapshot id out of range or not on disk
    InvalidSnapshotId,
    /// Payload file could not be read
    KvsFileReadError,
    /// Payload file could not be written
    KvsFileWriteError,
    /// Hash sibling could not be read
    KvsHashFileReadError,
    /// Hash sibling could not be written
    KvsHashFileWriteError,
    /// Payload JSON malformed or not encodable
    JsonParserError,
    /// Stored hash does not match the payload bytes
    ValidationFailed,
    /// Contradictory or out-of-range builder options
    ConfigError,
}

impl ErrorCode {
    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::KeyNotFound => "KeyNotFound",
            ErrorCode::TypeMismatch => "TypeMismatch",
            ErrorCode::InvalidSnapshotId => "InvalidSnapshotId",
            ErrorCode::KvsFileReadError => "KvsFileReadError",
            ErrorCode::KvsFileWriteError => "KvsFileWriteError",
            ErrorCode::KvsHashFileReadError => "KvsHashFileReadError",
            ErrorCode::KvsHashFileWriteError => "KvsHashFileWriteError",
            ErrorCode::JsonParserError => "JsonParserError",
            ErrorCode::ValidationFailed => "ValidationFailed",
            ErrorCode::ConfigError => "ConfigError",
        }
    }

    /// Parse an error code from its string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "KeyNotFound" => Some(ErrorCode::KeyNotFound),
            "TypeMismatch" => Some(ErrorCode::TypeMismatch),
            "InvalidSnapshotId" => Some(ErrorCode::InvalidSnapshotId),
            "KvsFileReadError" => Some(ErrorCode::KvsFileReadError),
            "KvsFileWriteError" => Some(ErrorCode::KvsFileWriteError),
            "KvsHashFileReadError" => Some(ErrorCode::KvsHashFileReadError),
            "KvsHashFileWriteError" => Some(ErrorCode::KvsHashFileWriteError),
            "JsonParserError" => Some(ErrorCode::JsonParserError),
            "ValidationFailed" => Some(ErrorCode::ValidationFailed),
            "ConfigError" => Some(ErrorCode::ConfigError),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// StoreError - Unified Error Type
// =============================================================================

/// Unified error type for all stash operations
///
/// Every variant maps to exactly one [`ErrorCode`] via [`StoreError::code`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key neither written nor present in the defaults overlay.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The key that was looked up
        key: String,
    },

    /// The stored value's tag disagrees with the requested type.
    ///
    /// Tags are never coerced: an `I32` is not a `U32` and neither is
    /// an `F64`, even when the numeric values coincide.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Tag the caller asked for
        expected: ValueTag,
        /// Tag actually stored
        actual: ValueTag,
    },

    /// Snapshot id out of range or without a complete on-disk pair.
    ///
    /// Id `0` is the live generation and cannot be restored.
    #[error("invalid snapshot id: {id}")]
    InvalidSnapshotId {
        /// The rejected id
        id: usize,
    },

    /// Reading a payload file failed.
    #[error("failed to read store file {}: {source}", .path.display())]
    KvsFileRead {
        /// Payload file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Writing a payload file failed.
    #[error("failed to write store file {}: {source}", .path.display())]
    KvsFileWrite {
        /// Payload file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading a hash sibling failed.
    #[error("failed to read hash file {}: {source}", .path.display())]
    KvsHashFileRead {
        /// Hash file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Writing a hash sibling failed.
    #[error("failed to write hash file {}: {source}", .path.display())]
    KvsHashFileWrite {
        /// Hash file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Payload JSON was malformed, or a value cannot be represented as JSON.
    #[error("malformed payload: {message}")]
    JsonParser {
        /// What went wrong
        message: String,
    },

    /// Integrity check failed: the hash sibling disagrees with the payload.
    #[error("integrity check failed for {}: {message}", .path.display())]
    ValidationFailed {
        /// Payload file path
        path: PathBuf,
        /// Mismatch description
        message: String,
    },

    /// Builder options are contradictory or out of range.
    #[error("invalid configuration: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },
}

impl StoreError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a KeyNotFound error
    pub fn key_not_found(key: impl Into<String>) -> Self {
        StoreError::KeyNotFound { key: key.into() }
    }

    /// Create a TypeMismatch error
    pub fn type_mismatch(expected: ValueTag, actual: ValueTag) -> Self {
        StoreError::TypeMismatch { expected, actual }
    }

    /// Create an InvalidSnapshotId error
    pub fn invalid_snapshot_id(id: usize) -> Self {
        StoreError::InvalidSnapshotId { id }
    }

    /// Create a JsonParser error
    pub fn json_parser(message: impl Into<String>) -> Self {
        StoreError::JsonParser {
            message: message.into(),
        }
    }

    /// Create a ValidationFailed error
    pub fn validation_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        StoreError::ValidationFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        StoreError::Config {
            message: message.into(),
        }
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Get the canonical error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::KeyNotFound { .. } => ErrorCode::KeyNotFound,
            StoreError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            StoreError::InvalidSnapshotId { .. } => ErrorCode::InvalidSnapshotId,
            StoreError::KvsFileRead { .. } => ErrorCode::KvsFileReadError,
            StoreError::KvsFileWrite { .. } => ErrorCode::KvsFileWriteError,
            StoreError::KvsHashFileRead { .. } => ErrorCode::KvsHashFileReadError,
            StoreError::KvsHashFileWrite { .. } => ErrorCode::KvsHashFileWriteError,
            StoreError::JsonParser { .. } => ErrorCode::JsonParserError,
            StoreError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            StoreError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::KeyNotFound { .. })
    }

    /// Check if this is an integrity failure
    ///
    /// Integrity failures mean the on-disk pair is damaged; the generation
    /// is skipped on open and ages out through rotation.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, StoreError::ValidationFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_error_code_round_trip() {
        let codes = [
            ErrorCode::KeyNotFound,
            ErrorCode::TypeMismatch,
            ErrorCode::InvalidSnapshotId,
            ErrorCode::KvsFileReadError,
            ErrorCode::KvsFileWriteError,
            ErrorCode::KvsHashFileReadError,
            ErrorCode::KvsHashFileWriteError,
            ErrorCode::JsonParserError,
            ErrorCode::ValidationFailed,
            ErrorCode::ConfigError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::parse(code.as_str()), Some(code));
        }
        assert_eq!(ErrorCode::parse("NotACode"), None);
    }

    #[test]
    fn test_key_not_found_display() {
        let err = StoreError::key_not_found("language");
        assert_eq!(err.code(), ErrorCode::KeyNotFound);
        assert!(err.is_not_found());
        assert!(err.to_string().contains("language"));
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = StoreError::type_mismatch(ValueTag::I32, ValueTag::String);
        assert_eq!(err.code(), ErrorCode::TypeMismatch);
        let msg = err.to_string();
        assert!(msg.contains("I32"));
        assert!(msg.contains("String"));
    }

    #[test]
    fn test_file_errors_stay_distinguishable() {
        let payload = StoreError::KvsFileRead {
            path: PathBuf::from("kvs_1_0.json"),
            source: io::Error::new(ErrorKind::NotFound, "missing"),
        };
        let hash = StoreError::KvsHashFileRead {
            path: PathBuf::from("kvs_1_0.hash"),
            source: io::Error::new(ErrorKind::NotFound, "missing"),
        };
        assert_eq!(payload.code(), ErrorCode::KvsFileReadError);
        assert_eq!(hash.code(), ErrorCode::KvsHashFileReadError);
        assert_ne!(payload.code(), hash.code());
    }

    #[test]
    fn test_validation_failed_classification() {
        let err = StoreError::validation_failed("kvs_1_0.json", "stored 0000002e, computed deadbeef");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(err.is_integrity_failure());
    }

    #[test]
    fn test_config_error() {
        let err = StoreError::config("snapshot_max_count must be positive");
        assert_eq!(err.code(), ErrorCode::ConfigError);
        assert!(err.to_string().contains("snapshot_max_count"));
    }

    #[test]
    fn test_invalid_snapshot_id() {
        let err = StoreError::invalid_snapshot_id(123);
        assert_eq!(err.code(), ErrorCode::InvalidSnapshotId);
        assert!(err.to_string().contains("123"));
    }
}
