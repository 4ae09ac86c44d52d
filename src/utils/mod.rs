//! Utility functions
//!
//! Provides size formatting, logging and input validation utilities.

pub mod format;
pub mod logging;
pub mod validation;

pub use format::human_size;
