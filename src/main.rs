// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, store, and start HTTP server

mod app;
mod config;
mod db;
mod errors;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;
#[cfg(test)]
mod testing;

use actix_web::{web, HttpServer};
use config::Config;
use dotenv::dotenv;
use state::AppState;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.clone()
        } else {
            "info,actix_web=info,sqlx=warn".to_string()
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting yelpcamp...");
    log::info!("Environment: {}", config.environment);
    log::info!("Store backend: {:?}", config.store_backend);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize repositories (and the database pool when configured)
    let state = match AppState::from_config(config.clone()).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Expired sessions are purged in the background
    services::start_session_purge_task(state.clone(), config.session_purge_interval_secs);
    log::info!(
        "Started session purge task (interval: {}s)",
        config.session_purge_interval_secs
    );

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);

    HttpServer::new(move || app::build_app(state.clone()))
        .bind(&server_addr)?
        .run()
        .await
}
