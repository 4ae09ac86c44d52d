//! Navigate module
//!
//! Handles directory listings for the browser, including the parent pointer
//! used to walk back up the tree.

mod operations;
mod results;

// Re-export public types and functions
pub use operations::{list_directory, parent_path};
pub use results::{Entry, Listing};
