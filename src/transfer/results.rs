//! Transfer result types
//!
//! Defines result structures returned by transfer operations.

use mime_guess::Mime;
use tempfile::NamedTempFile;

/// An upload streamed into the staging area
///
/// The staging file is removed when this is dropped without being stored.
#[derive(Debug)]
pub struct StagedUpload {
    pub file: NamedTempFile,
    pub filename: String,
    pub bytes: u64,
}

/// A file opened for download
#[derive(Debug)]
pub struct DownloadResult {
    pub file: tokio::fs::File,
    pub filename: String,
    pub content_type: Mime,
    pub len: u64,
}
