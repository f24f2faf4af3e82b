//! Common Log Format access logging
//!
//! [`AccessLogLayer`] writes one line per request at target `access`:
//!
//! ```text
//! 127.0.0.1 - - [02/Mar/2024:14:05:09 +0000] "GET /bom/parishes HTTP/1.1" 200 5123
//! ```
//!
//! The client address comes from `ConnectInfo<SocketAddr>`, so the router must
//! be served with `into_make_service_with_connect_info`. When it is missing the
//! host is written as `-`, as is an unknown response size.

use std::{
    net::{IpAddr, SocketAddr},
    task::{Context, Poll},
};

use axum::{
    body::HttpBody,
    extract::ConnectInfo,
    http::{header, Method, Request, Response, StatusCode, Version},
};
use chrono::{DateTime, Utc};
use tower::{Layer, Service};

/// Tracing target access lines are written to
pub const ACCESS_LOG_TARGET: &str = "access";

// ============================================================================
// Layer and Service
// ============================================================================

/// Layer that logs each completed request in Common Log Format
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessLogLayer;

impl AccessLogLayer {
    /// Create the layer
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for AccessLogLayer {
    type Service = AccessLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessLogService { inner }
    }
}

/// Service produced by [`AccessLogLayer`]
#[derive(Clone, Debug)]
pub struct AccessLogService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AccessLogService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    ResBody: HttpBody,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = AccessLogFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let host = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let target = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| request.uri().path().to_string());

        let entry = PendingEntry {
            host,
            received: Utc::now(),
            method: request.method().clone(),
            target,
            version: request.version(),
        };

        AccessLogFuture {
            future: self.inner.call(request),
            entry: Some(entry),
        }
    }
}

// ============================================================================
// Response Future
// ============================================================================

/// Request details captured before the inner service runs
#[derive(Debug, Clone)]
struct PendingEntry {
    host: Option<IpAddr>,
    received: DateTime<Utc>,
    method: Method,
    target: String,
    version: Version,
}

/// Future produced by [`AccessLogService`]
#[pin_project::pin_project]
pub struct AccessLogFuture<F> {
    #[pin]
    future: F,
    entry: Option<PendingEntry>,
}

impl<F, ResBody, E> std::future::Future for AccessLogFuture<F>
where
    F: std::future::Future<Output = Result<Response<ResBody>, E>>,
    ResBody: HttpBody,
{
    type Output = Result<Response<ResBody>, E>;

    fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        match this.future.poll(cx) {
            Poll::Ready(result) => {
                if let (Ok(response), Some(entry)) = (&result, this.entry.take()) {
                    let line = format_common_log(
                        entry.host,
                        entry.received,
                        &entry.method,
                        &entry.target,
                        entry.version,
                        response.status(),
                        response_size(response),
                    );
                    tracing::info!(target: ACCESS_LOG_TARGET, "{}", line);
                }
                Poll::Ready(result)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

fn response_size<B: HttpBody>(response: &Response<B>) -> Option<u64> {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .or_else(|| response.body().size_hint().exact())
}

// ============================================================================
// Line Formatting
// ============================================================================

/// Render one Common Log Format line
pub fn format_common_log(
    host: Option<IpAddr>,
    received: DateTime<Utc>,
    method: &Method,
    target: &str,
    version: Version,
    status: StatusCode,
    size: Option<u64>,
) -> String {
    let host = host.map(|ip| ip.to_string()).unwrap_or_else(|| "-".to_string());
    let size = size.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());

    format!(
        "{} - - [{}] \"{} {} {:?}\" {} {}",
        host,
        received.format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        target,
        version,
        status.as_u16(),
        size
    )
}
