//! RAX File Manager - Entry Point
//!
//! A browser-accessible file manager confined to a single storage root.

use std::process::ExitCode;

use log::{error, info};

use rax_file_manager::utils::logging::setup_logging;
use rax_file_manager::{Server, ServerConfig};

#[actix_web::main]
async fn main() -> ExitCode {
    setup_logging();

    info!("Launching file manager...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let server = match Server::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.start().await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
