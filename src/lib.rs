//! Relec API - read-only data API for historical-record statistics
//!
//! This crate serves pre-aggregated statistics over HTTP as JSON:
//!
//! - **Verse quotations**: dated quotations of a Bible verse found in
//!   digitized newspapers
//! - **Verse trends**: yearly quotation rates per million words with a
//!   centered three-year moving average, gap-filled over the corpus window
//! - **Christenings**: weekly christening counts from the London Bills of
//!   Mortality, filtered by year and paginated
//! - **Parishes**: the parish reference table
//!
//! # Architecture
//!
//! ```text
//! HTTP GET ──▶ QueryParams ──▶ Handler ──▶ DataStore ──▶ PostgreSQL
//!                  │              │
//!                  ▼              ▼
//!             400 on bad      JSON rows
//!              parameters     (or 404/500)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use relec_api::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     server::run(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Testing Handlers
//!
//! Any [`DataStore`] can back the router, which lets handlers run against
//! in-memory data:
//!
//! ```rust,ignore
//! let app = relec_api::server::router(AppState::new(MyStore::default()));
//! ```

#![warn(missing_docs)]

pub mod access_log;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod params;
pub mod server;
pub mod shutdown;
pub mod store;
pub mod tracing_setup;
pub mod trend;

pub use config::Config;
pub use error::{ApiError, ApiResult, StartupError, StoreError};
pub use models::{
    Christenings, ChristeningsByYear, Parish, VerseQuotation, VerseTrend, VerseTrendResponse,
};
pub use server::{router, AppState};
pub use store::{DataStore, PgStore, StoreResult};
pub use trend::{Corpus, YearRate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
