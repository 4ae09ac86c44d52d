//! Input validation utilities
//!
//! Provides validation and sanitization for user-supplied names.

use crate::error::StorageError;

/// Validate a folder name and return it trimmed.
pub fn validate_folder_name(name: &str) -> Result<&str, StorageError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StorageError::Validation("Folder name required".into()));
    }
    if trimmed.contains('\0') {
        return Err(StorageError::Validation("Invalid folder name".into()));
    }
    Ok(trimmed)
}

/// Reduce an uploaded filename to a single safe path segment.
///
/// Only the last segment (split on `/` and `\`) is kept. Characters other than
/// alphanumerics, `.`, `-` and `_` become `_`, and leading dots are dropped so
/// neither `..` nor hidden files survive. Returns `None` if nothing is left.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mapped: String = last
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = mapped.trim_start_matches('.').trim_matches('_');
    if sanitized.is_empty() || sanitized.chars().all(|ch| ch == '.') {
        None
    } else {
        Some(sanitized.to_string())
    }
}
