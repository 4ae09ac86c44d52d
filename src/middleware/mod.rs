//! Server middleware
//!
//! Provides request logging.

pub mod logging;

pub use logging::request_logger;
