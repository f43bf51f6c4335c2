//! Content Fingerprinting
//!
//! SHA-256 digests of file contents (change detection) and of file paths
//! (stable cache addressing that survives content edits).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::types::{Fingerprint, Result};

/// Read buffer size for streaming file hashing
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Digest the raw bytes of a file.
///
/// Returns `DocsError::Io` if the file cannot be read. Callers deciding
/// staleness must treat that as "cannot determine", i.e. stale.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(Fingerprint::new(format!("{:x}", hasher.finalize())))
}

/// Digest an in-memory buffer
pub fn fingerprint_bytes(bytes: &[u8]) -> Fingerprint {
    Fingerprint::new(format!("{:x}", Sha256::digest(bytes)))
}

/// Cache key for a source file, derived from its path (not its content)
pub fn path_key(path: &Path) -> String {
    format!("{:x}", Sha256::digest(path.to_string_lossy().as_bytes()))
}
