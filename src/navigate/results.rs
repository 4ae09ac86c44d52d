//! Result types for directory listings

use serde::Serialize;

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    /// Human-readable size; `"0 B"` for directories.
    pub size: String,
    /// Client path of this entry, always `/`-separated.
    pub path: String,
}

/// Contents of a directory plus navigation pointers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub items: Vec<Entry>,
    pub current: String,
    pub parent: String,
}
