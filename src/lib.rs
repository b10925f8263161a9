//! Phish-Shield URL Classifier
//!
//! Scores URLs as Safe or Phishing from lexical and structural features
//! with a gradient-boosted tree ensemble.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PHISH-SHIELD                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌──────────┐ │
//! │  │  URL      │─▶│  Feature  │─▶│  Tree     │─▶│  Policy  │ │
//! │  │  Parser   │  │  Extractor│  │  Ensemble │  │          │ │
//! │  └───────────┘  └───────────┘  └───────────┘  └────┬─────┘ │
//! │                                      Override Table ┘       │
//! │                       ▲                                     │
//! │                ┌──────┴──────┐                             │
//! │                │ API (Axum)  │                             │
//! │                └─────────────┘                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod logic;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};
use logic::scoring::ScoringService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scoring: Arc<ScoringService>,
    pub config: config::Config,
}

/// Create the main router with all routes.
///
/// Only the extension-facing routes carry CORS. Admin routes are mounted
/// when `config.admin_api` is set and never answer cross-origin requests.
pub fn create_router(state: AppState) -> Router {
    // Extension-facing routes
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/check", post(handlers::check::check))
        .route("/api/v1/features", post(handlers::features::extract))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        );

    let mut app = Router::new().merge(public_routes);

    // Model admin
    if state.config.admin_api {
        let admin_routes = Router::new()
            .route("/api/v1/model", get(handlers::model::info))
            .route("/api/v1/model/reload", post(handlers::model::reload));
        app = app.merge(admin_routes);
    } else {
        tracing::info!("Admin API disabled");
    }

    app.layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
