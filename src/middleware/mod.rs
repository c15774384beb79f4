// ABOUTME: HTTP middleware for etag support, request correlation, and tracing
// ABOUTME: Composed onto axum routers at registration time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Conditional-request handling backed by etag signatures
pub mod etag;
/// Request ID generation and propagation
pub mod request_id;
/// Request span construction for `tower-http` tracing
pub mod tracing;

pub use etag::{etag_middleware, EtagSupport};
pub use request_id::{request_id_middleware, RequestId};
pub use tracing::{make_request_span, record_response};
