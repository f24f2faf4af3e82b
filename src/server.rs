//! Router construction and server lifecycle
//!
//! # Architecture
//!
//! ```text
//! Request ──▶ AccessLog ──▶ Trace ──▶ CORS ──▶ Router ──▶ Handler ──▶ DataStore
//!                                                                      │
//!                                                                      ▼
//!                                                                  PostgreSQL
//! ```
//!
//! [`AppState`] is built once at startup and cloned into every handler. It
//! holds nothing mutable; the only shared resource is the store's pool.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::access_log::AccessLogLayer;
use crate::config::Config;
use crate::error::StartupError;
use crate::handlers;
use crate::shutdown::shutdown_signal;
use crate::store::{DataStore, PgStore};
use crate::tracing_setup::request_tracing_layer;

/// Shared, read-only handler context
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DataStore>,
}

impl AppState {
    /// Wrap a store
    pub fn new<S: DataStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Use an already shared store
    pub fn from_shared(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// The store handlers query
    pub fn store(&self) -> &dyn DataStore {
        self.store.as_ref()
    }
}

/// CORS policy: any origin may issue `GET`
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
}

/// Build the application router with all middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/apb/verse-quotations", get(handlers::verse_quotations_handler))
        .route("/apb/verse-trend", get(handlers::verse_trend_handler))
        .route("/bom/christenings", get(handlers::christenings_handler))
        .route("/bom/list-christenings", get(handlers::list_christenings_handler))
        .route("/bom/parishes", get(handlers::parishes_handler))
        .route("/healthz", get(handlers::health_handler))
        .fallback(not_found)
        .with_state(state)
        .layer(cors_layer())
        .layer(request_tracing_layer())
        .layer(AccessLogLayer::new())
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "404 Not found.",
    )
}

/// Connect, serve until a shutdown signal, then close the pool
pub async fn run(config: Config) -> Result<(), StartupError> {
    let store = PgStore::connect(&config.database)
        .await
        .map_err(StartupError::Connect)?;

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    info!("starting the server on http://{}", address);

    let app = router(AppState::new(store.clone()));
    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        shutdown_signal().await;
    })
    .await;

    store.close().await;
    info!("shutting down the server");

    served.map_err(StartupError::Serve)
}
