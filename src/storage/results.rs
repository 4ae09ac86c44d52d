//! Storage result types
//!
//! Defines result structures returned by storage operations.

/// Result of a folder creation
#[derive(Debug, Clone)]
pub struct CreateFolderResult {
    pub client_path: String,
}

/// Result of a file storage operation
#[derive(Debug, Clone)]
pub struct StoreResult {
    pub client_path: String,
    pub filename: String,
}

/// Result of a deletion
#[derive(Debug, Clone)]
pub struct DeleteResult {
    pub client_path: String,
    pub was_directory: bool,
}
