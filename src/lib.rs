//! # Accel
//!
//! Accelerometer recording backend.
//!
//! Phones push batches of accelerometer readings; we persist them per user and
//! serve them back by calendar day.
//!
//!
//!
//! # General Infrastructure
//! - One axum server, one MongoDB collection for samples, one Redis instance for
//!   the user registry
//! - Every request is independent; the only shared state is the two store handles
//! - Samples are insert-only, no update or delete path exists
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | POST | `/samples` | ingest one reading or an array of readings |
//! | GET | `/samples?userId&date` | all readings for one UTC calendar day |
//! | GET | `/days?userId&pageNumber` | distinct days with data, 7 per page |
//! | GET | `/registered?userId` | has this user ever submitted data |
//!
//!
//!
//! # Notes
//!
//! ## MongoDB + Redis
//! MongoDB holds the readings themselves and answers the day-window and
//! distinct-day queries. Looking up "has this user ever posted" there would mean
//! a collection scan or an extra index for a yes/no question, so registration
//! lives in Redis instead: one `users:{id}` key per user, written on first
//! successful ingest, O(1) to check.
//!
//! The two stores are kept consistent best-effort. The registry key is written
//! only after the batch insert succeeds, so a crash mid-ingest can leave data
//! without a registry key but never the reverse; any later ingest for that user
//! repairs the key.
//!
//!
//!
//! # Setup
//!
//! Run against local stores.
//! ```sh
//! RUST_LOG=info cargo run
//! ```
//!
//! Configuration comes from `RUST_PORT`, `MONGO_URL` and `REDIS_URL`.
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod ingest;
pub mod query;
pub mod registry;
pub mod routes;
pub mod samples;
pub mod state;
pub mod store;

use routes::{day_handler, days_handler, ingest_handler, registered_handler};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await.expect("Stores misconfigured!");

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = router(state.clone()).layer(cors);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/samples", post(ingest_handler).get(day_handler))
        .route("/days", get(days_handler))
        .route("/registered", get(registered_handler))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
