//! Transfer module
//!
//! Streams upload bodies to disk and file contents back to the client.

pub mod file_ops;
pub mod results;

pub use file_ops::{open_download, stage_upload};
pub use results::{DownloadResult, StagedUpload};
