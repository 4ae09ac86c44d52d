//! HTTP protocol layer
//!
//! Route handlers, request body parsing and response shapes.

pub mod handlers;
pub mod parser;
pub mod responses;

pub use handlers::register;
pub use responses::OpResponse;
