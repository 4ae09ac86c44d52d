//! File system storage management
//!
//! Handles path containment and the mutating file operations.

pub mod filesystem;
pub mod operations;
pub mod results;
pub mod validation;

pub use operations::{create_folder, delete_entry, locate_download, save_upload};
pub use validation::{ResolvedPath, SandboxRoot, join_client_path, split_leaf};
