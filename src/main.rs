//! Gallery store - Entry Point
//!
//! Loads configuration, prepares a fresh storage root and serves the line
//! protocol.

use log::{error, info};
use std::process;
use std::sync::Arc;

use gallery_store::utils::logging::setup_logging;
use gallery_store::{AppConfig, Server, StorageService};

#[tokio::main]
async fn main() {
    setup_logging();

    info!("Launching gallery storage server...");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let service = match StorageService::from_config(&config.storage) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!("Invalid storage configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = service.bootstrap() {
        error!("Failed to prepare storage root: {}", e);
        process::exit(1);
    }

    let server = match Server::bind(config.server, service).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            process::exit(1);
        }
    };

    server.start().await;
}
