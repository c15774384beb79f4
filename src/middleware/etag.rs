// ABOUTME: Axum middleware answering conditional GETs from etag signatures
// ABOUTME: Returns 304 when If-None-Match is current, otherwise runs the handler and sets ETag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Etag support is attached per route with the cache keys that route depends on:
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use bridge_server::cache::factory::Cache;
//! use bridge_server::etag::{EtagCacheKey, EtagComponent};
//! use bridge_server::middleware::{etag_middleware, EtagSupport};
//!
//! # async fn handler() -> &'static str { "" }
//! # fn example(component: EtagComponent) {
//! let support = EtagSupport::new(
//!     component,
//!     vec![EtagCacheKey::new("Schedule", &["appId", "studyId"])],
//! );
//! let app: Router = Router::new().route(
//!     "/v5/studies/:studyId/schedule",
//!     get(handler).layer(middleware::from_fn_with_state(support, etag_middleware::<Cache>)),
//! );
//! # }
//! ```

use super::request_id::RequestId;
use super::tracing::create_etag_span;
use crate::cache::factory::Cache;
use crate::cache::CacheProvider;
use crate::constants::headers::SESSION_TOKEN;
use crate::errors::AppError;
use crate::etag::{ArgValues, EtagCacheKey, EtagComponent, EtagContext, EtagOutcome};
use axum::extract::{RawPathParams, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::{ETAG, IF_NONE_MATCH};
use http::{HeaderMap, HeaderValue, StatusCode};
use std::sync::Arc;
use tracing::Instrument;

/// Middleware state: the component plus the cache keys one route declares
#[derive(Clone)]
pub struct EtagSupport<C: CacheProvider = Cache> {
    component: EtagComponent<C>,
    cache_keys: Arc<[EtagCacheKey]>,
}

impl<C: CacheProvider> EtagSupport<C> {
    /// Declare etag support over `cache_keys`, evaluated in order
    pub fn new(component: EtagComponent<C>, cache_keys: Vec<EtagCacheKey>) -> Self {
        Self {
            component,
            cache_keys: cache_keys.into(),
        }
    }
}

fn header_value(headers: &HeaderMap, name: impl http::header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}

fn etag_header(etag: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(etag)
        .map_err(|e| AppError::internal(format!("Invalid etag header value: {e}")))
}

fn error_response(error: AppError, request_id: Option<String>) -> Response {
    match request_id {
        Some(request_id) => error.with_request_id(request_id).into_response(),
        None => error.into_response(),
    }
}

/// Evaluate etag support around the wrapped handler
///
/// Must be layered on a route so the matched path parameters are available.
pub async fn etag_middleware<C: CacheProvider + 'static>(
    State(support): State<EtagSupport<C>>,
    path_params: RawPathParams,
    request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let request_etag = header_value(headers, IF_NONE_MATCH);
    let session_token = header_value(headers, SESSION_TOKEN);
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone());

    let args = ArgValues::from_path_params(&path_params);
    let context = EtagContext::new(support.cache_keys.clone(), args);
    let span = create_etag_span(request.uri().path());

    let outcome = support
        .component
        .check_etag(
            &context,
            request_etag.as_deref(),
            session_token.as_deref(),
            || next.run(request),
        )
        .instrument(span)
        .await;

    match outcome {
        Ok(EtagOutcome::NotModified { etag }) => match etag_header(&etag) {
            Ok(value) => (StatusCode::NOT_MODIFIED, [(ETAG, value)]).into_response(),
            Err(e) => error_response(e, request_id),
        },
        Ok(EtagOutcome::Proceed {
            value: mut response,
            etag,
        }) => {
            if let Some(etag) = etag.filter(|_| response.status().is_success()) {
                match etag_header(&etag) {
                    Ok(value) => {
                        response.headers_mut().insert(ETAG, value);
                    }
                    Err(e) => return error_response(e, request_id),
                }
            }
            response
        }
        Err(e) => error_response(e, request_id),
    }
}
