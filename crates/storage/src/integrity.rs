//! Adler-32 integrity checking
//!
//! Every payload file has a `.hash` sibling holding the Adler-32 checksum
//! of the exact payload bytes, written as 8 lowercase ASCII hex digits.
//! A trailing newline is tolerated on read. The checksum is an integrity
//! check against torn writes and bit rot, not a MAC.

use stash_core::{Result, StoreError};
use std::path::Path;

/// Compute the Adler-32 checksum of a payload.
pub fn checksum(bytes: &[u8]) -> u32 {
    adler32::RollingAdler32::from_buffer(bytes).hash()
}

/// Render a checksum in the on-disk hash file format.
pub fn encode(sum: u32) -> String {
    format!("{sum:08x}")
}

/// Parse the contents of a hash file.
///
/// Exactly 8 hex digits after stripping an optional trailing newline;
/// anything else is malformed.
pub fn decode(text: &str) -> Option<u32> {
    let trimmed = text.trim_end_matches(['\r', '\n']);
    if trimmed.len() != 8 {
        return None;
    }
    u32::from_str_radix(trimmed, 16).ok()
}

/// Verify payload bytes against the contents of their hash sibling.
///
/// `payload_path` is only used for error reporting.
pub fn verify(payload: &[u8], hash_text: &str, payload_path: &Path) -> Result<()> {
    let stored = decode(hash_text).ok_or_else(|| {
        StoreError::validation_failed(payload_path, format!("malformed hash file contents {hash_text:?}"))
    })?;
    let computed = checksum(payload);
    if stored != computed {
        return Err(StoreError::validation_failed(
            payload_path,
            format!("stored {}, computed {}", encode(stored), encode(computed)),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_core::ErrorCode;
    use std::path::PathBuf;

    #[test]
    fn test_known_checksums() {
        // Reference vectors for Adler-32.
        assert_eq!(checksum(b""), 1);
        assert_eq!(checksum(b"Wikipedia"), 0x11e6_0398);
    }

    #[test]
    fn test_encode_is_lowercase_hex() {
        assert_eq!(encode(0x11e6_0398), "11e60398");
        assert_eq!(encode(1), "00000001");
    }

    #[test]
    fn test_decode_tolerates_trailing_newline() {
        assert_eq!(decode("11e60398"), Some(0x11e6_0398));
        assert_eq!(decode("11e60398\n"), Some(0x11e6_0398));
        assert_eq!(decode("11e60398\r\n"), Some(0x11e6_0398));
    }

    #[test]
    fn test_decode_rejects_malformed_contents() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("11e603"), None);
        assert_eq!(decode("11e6039811"), None);
        assert_eq!(decode("11e603zz"), None);
        assert_eq!(decode("11e60398 extra"), None);
    }

    #[test]
    fn test_verify_accepts_matching_pair() {
        let payload = b"{\"k\":{\"t\":\"i32\",\"v\":1}}";
        let hash = encode(checksum(payload));
        verify(payload, &hash, &PathBuf::from("kvs_1_0.json")).unwrap();
    }

    #[test]
    fn test_verify_rejects_mismatch() {
        let payload = b"payload";
        let err = verify(payload, "00000000", &PathBuf::from("kvs_1_0.json")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_verify_rejects_malformed_hash_file() {
        let err = verify(b"payload", "not hex!", &PathBuf::from("kvs_1_0.json")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
