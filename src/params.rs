//! Query-string access that keeps repeated keys
//!
//! axum's `Query<HashMap<..>>` collapses repeated parameters, which hides
//! requests like `?ref=a&ref=b`. Handlers take [`QueryParams`] instead and
//! decide per parameter whether repetition is an error.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use url::form_urlencoded;

use crate::error::{ApiError, ApiResult};

/// Decoded query-string pairs in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a raw (still percent-encoded) query string
    pub fn parse(query: &str) -> Self {
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Every value supplied for `name`
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The first value supplied for `name`, treating an empty value as absent
    pub fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// A parameter that must appear exactly once
    ///
    /// An empty value still counts as present.
    pub fn exactly_one(&self, name: &'static str) -> ApiResult<&str> {
        match self.all(name).as_slice() {
            [] => Err(ApiError::MissingParameter(name)),
            [value] => Ok(*value),
            _ => Err(ApiError::AmbiguousParameter(name)),
        }
    }

    /// A parameter that may appear at most once
    pub fn at_most_one(&self, name: &'static str) -> ApiResult<Option<&str>> {
        match self.all(name).as_slice() {
            [] => Ok(None),
            [value] => Ok(Some(*value)),
            _ => Err(ApiError::AmbiguousParameter(name)),
        }
    }

    /// A required integer parameter
    pub fn required_int(&self, name: &'static str) -> ApiResult<i64> {
        let raw = self.first(name).ok_or(ApiError::MissingParameter(name))?;
        parse_int(name, raw)
    }

    /// An optional integer parameter with a default
    pub fn int_or(&self, name: &'static str, default: i64) -> ApiResult<i64> {
        match self.first(name) {
            Some(raw) => parse_int(name, raw),
            None => Ok(default),
        }
    }

    /// An optional non-negative integer parameter with a default
    pub fn non_negative_or(&self, name: &'static str, default: i64) -> ApiResult<i64> {
        let value = self.int_or(name, default)?;
        if value < 0 {
            return Err(ApiError::NegativeParameter { name, value });
        }
        Ok(value)
    }
}

fn parse_int(name: &'static str, raw: &str) -> ApiResult<i64> {
    raw.parse().map_err(|_| ApiError::InvalidParameter {
        name,
        value: raw.to_string(),
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .uri
            .query()
            .map(QueryParams::parse)
            .unwrap_or_default())
    }
}
