//! File system helpers
//!
//! Thin wrappers over `std::fs` that report failures as [`StorageError`].

use std::fs;
use std::path::Path;

use crate::error::StorageError;
use crate::storage::validation::ResolvedPath;

/// Create a directory and any missing parents.
///
/// Succeeds if the directory already exists, including when another request
/// created it concurrently.
pub fn ensure_directory(target: &ResolvedPath) -> Result<(), StorageError> {
    match fs::create_dir_all(target.real_path()) {
        Ok(()) => Ok(()),
        Err(_) if target.real_path().is_dir() => Ok(()),
        Err(e) => Err(StorageError::from_io(target.client_path(), e)),
    }
}

/// Size of a regular file, or 0 if it cannot be read.
pub fn file_size_or_zero(path: &Path) -> u64 {
    fs::metadata(path).map(|meta| meta.len()).unwrap_or(0)
}
