//! # HTTP Server for Label Generation
//!
//! Provides a web interface for picking locations or assets and generating
//! label sheets via HTTP.
//!
//! ## Usage
//!
//! ```bash
//! etiqueta serve --listen 0.0.0.0:8080
//! ```
//!
//! Then open http://localhost:8080 in a browser to select records, choose a
//! template, and download the generated PDF or PNG bundle.

mod handlers;
mod state;
mod static_files;

pub use state::ServerConfig;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::HomeboxClient;
use crate::error::LabelError;
use crate::label::LabelPattern;
use state::AppState;

/// Start the HTTP server.
///
/// Authenticates against Homebox once at startup; a failed login aborts
/// before the listener binds so misconfiguration is visible immediately.
pub async fn serve(config: ServerConfig) -> Result<(), LabelError> {
    let client =
        HomeboxClient::login(&config.base_url, &config.username, &config.password).await?;
    let pattern = LabelPattern::new(&config.id_pattern, config.pad_width)?;
    let app_state = Arc::new(AppState::new(config.clone(), client, pattern));

    let app = Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        .route("/assets/*path", get(static_files::asset_handler))
        // JSON API
        .route("/api/records", get(handlers::records))
        .route("/api/templates", get(handlers::templates))
        .route("/api/generate", post(handlers::generate))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    println!("Etiqueta HTTP server starting...");
    println!("Listening on: {}", config.listen_addr);
    println!("Homebox: {}", config.base_url);
    println!();
    println!(
        "Open http://{}/ in your browser to generate labels",
        config.listen_addr
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            LabelError::Config(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| LabelError::Config(format!("Server error: {e}")))?;

    Ok(())
}
