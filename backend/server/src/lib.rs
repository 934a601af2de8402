//! Documentation of the insights dashboard backend.
//!
//! Serves a fixed dataset of market insights (topic, sector, region, pestle, source, country plus
//! intensity/likelihood/relevance scores) to the dashboard front end. All filtering and charting
//! happens client side, see the `insights` crate.
//!
//!
//!
//! # General Infrastructure
//! - Meilisearch holds the dataset as one index, loaded once with the `seed` tool
//! - This server is the only thing talking to Meilisearch, the browser never sees the store key
//! - One read-only route, no auth, no query parameters
//! - CORS restricted to the dashboard's origin through `ALLOWED_ORIGIN`
//!
//!
//!
//! # Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /api/data` | `200` + JSON array of every document, or `500` + `{"message": ...}` |
//! | `GET /healthz` | `200 ok` when the store answers, `503` otherwise |
//!
//!
//!
//! # Environment
//!
//! | Variable | Default |
//! |----------|---------|
//! | `RUST_PORT` | `1111` |
//! | `MEILI_URL` | `http://meilisearch:7700` |
//! | `MEILI_ADMIN_KEY` | `/run/secrets/MEILI_ADMIN_KEY`, then env |
//! | `DATA_INDEX` | `data` |
//! | `ALLOWED_ORIGIN` | `*` |
//!
//!
//!
//! # Setup
//!
//! Seed the store.
//! ```sh
//! cargo run -p seed -- data/jsondata.json
//! ```
//!
//! Start the server.
//! ```sh
//! RUST_LOG=info cargo run -p insights-backend
//! ```
//!
//! Check it.
//! ```sh
//! curl localhost:1111/api/data | head -c 300
//! ```
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod state;

use error::AppError;
use routes::{data_handler, health_handler};
use state::State;

pub async fn start_server() -> Result<(), AppError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new()?;

    info!("Starting server...");

    let cors = cors_layer(&state.config.allowed_origin)?;

    let app = Router::new()
        .route("/api/data", get(data_handler))
        .route("/healthz", get(health_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::InternalError(Box::new(e)))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::InternalError(Box::new(e)))?;

    info!("Server shut down");

    Ok(())
}

pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, AppError> {
    let origin = if allowed_origin == "*" {
        AllowOrigin::from(Any)
    } else {
        let value = HeaderValue::from_str(allowed_origin).map_err(|e| AppError::Config {
            key: "ALLOWED_ORIGIN".to_string(),
            reason: e.to_string(),
        })?;

        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
