//! Server core functionality
//!
//! This module contains the HTTP server, its shared state, and startup.

pub mod core;

pub use core::{AppState, Server};
