mod config;
mod constants;
mod directory;
mod handlers;
mod query;
mod state;

use actix_web::{web, App, HttpServer};
use config::ServerConfig;
use directory::InMemoryUserDirectory;
use state::AppState;
use std::sync::Arc;
use tracing::{error, info};
use uploader::{BulkUploadCoordinator, CloudinaryClient, WebClient};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing with env filter
    // Filter out actix-server worker shutdown messages
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info")
                    .add_directive("actix_server::worker=warn".parse().unwrap())
                    .add_directive("actix_server::accept=warn".parse().unwrap())
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting user administration server (PID: {})",
        std::process::id()
    );

    let config = ServerConfig::load()?;
    info!(
        cloud_name = %config.cloudinary.cloud_name,
        upload_url = %config.cloudinary.upload_url,
        "Image host configured"
    );

    // One pooled client for the whole process
    let web_client = WebClient::new(&config.web).map_err(|e| {
        error!("Failed to initialize HTTP client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let image_host = Arc::new(CloudinaryClient::new(web_client, config.cloudinary.clone()));
    let directory = Arc::new(InMemoryUserDirectory::new());

    let state = web::Data::new(AppState::new(
        BulkUploadCoordinator::new(image_host),
        directory.clone(),
        directory,
    ));

    let bind_address = config.bind_address();
    info!("Starting server on http://{}", bind_address);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .map_err(|e| {
        error!("Failed to bind to {}: {}", bind_address, e);
        e
    })?;

    info!("Server bound successfully to http://{}", bind_address);

    server.run().await
}
