use std::fs;
use std::path::PathBuf;

use actix_web::{App, HttpServer, web};
use log::info;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::middleware::request_logger;
use crate::protocol::register;
use crate::storage::SandboxRoot;

/// State shared by every request; immutable after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub root: SandboxRoot,
    pub staging_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub chunk_size: usize,
}

impl AppState {
    /// Open the storage root and staging area described by `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let root_path = config.server_root_path();
        let root = SandboxRoot::open(&root_path).map_err(|e| ServerError::root(&root_path, e))?;

        let staging_dir = config.staging_path();
        fs::create_dir_all(&staging_dir)?;

        Ok(Self {
            root,
            staging_dir,
            max_upload_bytes: config.max_upload_size_bytes(),
            chunk_size: config.chunk_size,
        })
    }
}

pub struct Server {
    config: ServerConfig,
    state: web::Data<AppState>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let state = AppState::from_config(&config)?;
        info!("Storage root directory: {}", state.root.path().display());
        info!("Upload staging directory: {}", state.staging_dir.display());

        Ok(Self {
            config,
            state: web::Data::new(state),
        })
    }

    pub async fn start(self) -> Result<(), ServerError> {
        let bind_addr = self.config.socket_addr();
        info!(
            "Starting RAX file manager on {} (max upload {} MB)",
            bind_addr, self.config.max_upload_size_mb
        );

        let state = self.state.clone();
        HttpServer::new(move || {
            App::new()
                .wrap(request_logger())
                .app_data(state.clone())
                .configure(register)
        })
        .bind(&bind_addr)?
        .run()
        .await?;

        info!("Server stopped");
        Ok(())
    }
}
