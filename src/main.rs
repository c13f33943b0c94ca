mod config;
mod database;
mod logging;
mod routes;

use crate::config::load_config;
use axum::Extension;
use log::{error, info};
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    // Load configuration before logging so the logging level is known
    let config = load_config().unwrap_or_default();

    logging::setup(config.logging);

    info!("Starting Scoreboard v{}", config::VERSION);

    // Connect to the database before accepting any requests
    let db = database::init().await;

    let router = routes::router()
        // Shared database connection for all route handlers
        .layer(Extension(db));

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind HTTP server");

    info!("Server listening on {addr}");

    if let Err(err) = axum::serve(listener, router).await {
        error!("Error while serving: {err:?}");
    }
}
