//! HTTP handlers
//!
//! Every handler follows the same path: validate query parameters, run one
//! store query, return the rows as JSON.
//!
//! # Modules
//!
//! - [`apb`] - verse quotations and verse trends
//! - [`bom`] - christenings, christening labels and parishes
//! - [`health`] - store liveness probe

pub mod apb;
pub mod bom;
pub mod health;

pub use apb::{verse_quotations_handler, verse_trend_handler};
pub use bom::{
    christenings_handler, list_christenings_handler, parishes_handler, DEFAULT_LIMIT,
    DEFAULT_OFFSET,
};
pub use health::{health_handler, HealthResponse};
