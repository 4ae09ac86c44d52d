//! Directory listing implementation

use std::fs;

use log::{error, info, warn};

use crate::error::{StorageError, display_client_path};
use crate::navigate::results::{Entry, Listing};
use crate::storage::filesystem::{ensure_directory, file_size_or_zero};
use crate::storage::{ResolvedPath, join_client_path};
use crate::utils::human_size;

/// Lists the immediate children of a resolved directory.
///
/// A missing directory is created before it is read, so navigating to a new
/// path in the browser always lands in an (empty) folder. Entries are sorted
/// by name, ignoring case.
pub fn list_directory(dir: &ResolvedPath) -> Result<Listing, StorageError> {
    let client_path = dir.client_path();
    let real_path = dir.real_path();

    if !real_path.exists() {
        ensure_directory(dir)?;
        info!("Created missing directory {} on listing", display_client_path(client_path));
    } else if !real_path.is_dir() {
        return Err(StorageError::NotFound(format!(
            "{} is not a directory",
            display_client_path(client_path)
        )));
    }

    let read_dir = fs::read_dir(real_path).map_err(|e| {
        error!(
            "Failed to list directory {} (real: {}): {}",
            client_path,
            real_path.display(),
            e
        );
        StorageError::from_io(client_path, e)
    })?;

    let mut items = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| StorageError::from_io(client_path, e))?;
        let full = entry.path();
        // Non-UTF-8 names cannot round-trip through a client path.
        let Ok(name) = entry.file_name().into_string() else {
            warn!("Skipping non-UTF-8 entry {}", full.display());
            continue;
        };

        // Follows symlinks; an entry that cannot be stat'ed shows as a 0 B file.
        let is_dir = full.is_dir();
        let size = if is_dir { 0 } else { file_size_or_zero(&full) };

        items.push(Entry {
            path: join_client_path(client_path, &name),
            name,
            is_dir,
            size: human_size(size),
        });
    }

    items.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });

    info!(
        "Listed directory {} (real: {}) - {} entries",
        display_client_path(client_path),
        real_path.display(),
        items.len()
    );

    Ok(Listing {
        items,
        current: client_path.to_string(),
        parent: parent_path(client_path),
    })
}

/// Client path with the last segment removed; `""` at the top level.
pub fn parent_path(client_path: &str) -> String {
    let trimmed = client_path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => trimmed[..idx].to_string(),
        None => String::new(),
    }
}
