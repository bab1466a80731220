//! Filesystem helpers for reading source payloads.

use std::io;
use std::path::Path;

use crate::error::BundleError;

/// Default cap for a single audio payload.
pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

/// Read a payload file into memory with a size cap.
///
/// Every failure (missing file, I/O error, oversized file) is reported as
/// [`BundleError::PayloadReadError`] carrying the offending path.
pub fn read_payload(path: &Path, max_bytes: u64) -> Result<Vec<u8>, BundleError> {
    let read_error = |source: io::Error| BundleError::PayloadReadError {
        path: path.to_path_buf(),
        source,
    };

    let len = std::fs::metadata(path).map_err(read_error)?.len();
    if len > max_bytes {
        return Err(read_error(io::Error::other(format!(
            "file too large ({} bytes, max {} bytes)",
            len, max_bytes
        ))));
    }
    std::fs::read(path).map_err(read_error)
}
