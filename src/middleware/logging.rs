//! Logging middleware
//!
//! Provides request logging functionality.

use actix_web::middleware::Logger;

/// Access log format: peer, request line, status, bytes sent, duration.
const ACCESS_LOG_FORMAT: &str = r#"%a "%r" %s %b %Dms"#;

/// Access logger writing through the `log` facade
pub fn request_logger() -> Logger {
    Logger::new(ACCESS_LOG_FORMAT).log_target("rax_file_manager::access")
}
