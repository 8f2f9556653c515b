//! # Digital Diner API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Digital Diner API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;
    let cors_origins = config.cors_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::cors(&cors_origins))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(handlers::json_config())
            .app_data(handlers::path_config())
            .configure(|cfg| handlers::configure_routes(cfg, &state))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
