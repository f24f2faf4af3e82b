//! Error types with HTTP status mapping
//!
//! Client mistakes map to `400`, an empty verse-quotation lookup maps to `404`,
//! and every store failure maps to `500` with a generic body. Store failures
//! are logged where they are converted into responses; their details never
//! reach the client.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::config::ConfigError;

/// Failure while talking to the data store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query execution or row decoding failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Request-level errors returned by handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required query parameter was absent
    #[error("Missing required parameter '{0}'.")]
    MissingParameter(&'static str),

    /// A parameter was present but could not be parsed
    #[error("Parameter '{name}' must be an integer, got '{value}'.")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Raw value supplied
        value: String,
    },

    /// A pagination parameter was negative
    #[error("Parameter '{name}' must not be negative, got {value}.")]
    NegativeParameter {
        /// Parameter name
        name: &'static str,
        /// Parsed value
        value: i64,
    },

    /// A parameter that must be unique was given more than once
    #[error("Please provide exactly one '{0}' parameter.")]
    AmbiguousParameter(&'static str),

    /// The corpus is not one of the known corpora
    #[error("Corpus must be 'ncnp' or 'chronam', got '{0}'.")]
    InvalidCorpus(String),

    /// The lookup was valid but matched nothing
    #[error("Not found.")]
    NotFound,

    /// The data store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_)
            | Self::InvalidParameter { .. }
            | Self::NegativeParameter { .. }
            | Self::AmbiguousParameter(_)
            | Self::InvalidCorpus(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body sent to the client
    pub fn body(&self) -> String {
        let status = self.status_code();
        match self {
            Self::NotFound => "404 Not found.".to_string(),
            // Internal details stay in the logs
            Self::Store(_) => format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Internal Server Error")
            ),
            _ => format!(
                "{} {}. {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Error"),
                self
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let Self::Store(err) = &self {
            tracing::error!(error = %err, "store failure");
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.body(),
        )
            .into_response()
    }
}

/// Errors that abort startup
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The initial database connection failed
    #[error("failed to connect to the database: {0}")]
    Connect(#[source] StoreError),

    /// The listening socket could not be bound
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address that was attempted
        address: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingParameter("ref").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidParameter {
                name: "limit",
                value: "ten".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::AmbiguousParameter("ref").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCorpus("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(StoreError::from(sqlx::Error::PoolClosed)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_body() {
        assert_eq!(ApiError::NotFound.body(), "404 Not found.");
    }

    #[test]
    fn test_bad_request_body_names_parameter() {
        let body = ApiError::AmbiguousParameter("ref").body();
        assert!(body.starts_with("400 Bad Request."));
        assert!(body.contains("exactly one 'ref'"));
    }

    #[test]
    fn test_store_error_body_is_generic() {
        let err = ApiError::from(StoreError::from(sqlx::Error::Configuration(
            "password=hunter2".into(),
        )));
        assert_eq!(err.body(), "500 Internal Server Error");
    }

    #[test]
    fn test_into_response_is_plain_text() {
        let response = ApiError::MissingParameter("start-year").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }
}
