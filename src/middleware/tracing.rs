// ABOUTME: Request span construction for correlation and structured logging
// ABOUTME: Creates one span per HTTP request and records its outcome when the response is ready
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use http::{Request, Response};
use std::time::Duration;
use tracing::Span;

/// Create a tracing span for HTTP requests
pub fn create_request_span(method: &str, path: &str) -> Span {
    tracing::info_span!(
        "http_request",
        method = %method,
        path = %path,
        request_id = tracing::field::Empty,
        status_code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}

/// Span factory for `TraceLayer::make_span_with`
pub fn make_request_span<B>(request: &Request<B>) -> Span {
    create_request_span(request.method().as_str(), request.uri().path())
}

/// Response hook for `TraceLayer::on_response`
pub fn record_response<B>(response: &Response<B>, latency: Duration, span: &Span) {
    span.record("status_code", response.status().as_u16());
    span.record(
        "duration_ms",
        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
    );
    tracing::info!(parent: span, status = response.status().as_u16(), "Request completed");
}

/// Create a tracing span for etag evaluation
pub fn create_etag_span(route: &str) -> Span {
    tracing::debug_span!(
        "etag_support",
        route = %route,
        etag.phase = tracing::field::Empty,
        etag.value = tracing::field::Empty,
    )
}
