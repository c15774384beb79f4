// ABOUTME: Route module organization for bridge server HTTP endpoints
// ABOUTME: Builds the application router, its shared state, and the request-wide layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the bridge server
//!
//! Each domain module contains route definitions and thin handlers. Etag support is
//! attached per route inside the domain module; request correlation and tracing are
//! applied here to the whole router.

/// Health check and system status routes
pub mod health;
/// Study schedule and participant timeline routes
pub mod studies;

pub use health::HealthRoutes;
pub use studies::StudyRoutes;

use crate::auth::SessionStore;
use crate::cache::factory::Cache;
use crate::config::environment::ServerConfig;
use crate::etag::{EtagComponent, EtagTimestamps};
use crate::middleware::{make_request_span, record_response, request_id_middleware};
use axum::body::Body;
use axum::extract::FromRef;
use axum::{middleware, Router};
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// Shared state of every route
#[derive(Clone, FromRef)]
pub struct AppState {
    /// Cache holding documents, sessions, and etag timestamps
    pub cache: Cache,
    /// Session lookup and storage
    pub sessions: SessionStore<Cache>,
    /// Etag timestamp writers
    pub timestamps: EtagTimestamps<Cache>,
    /// Etag evaluation shared by the etag-guarded routes
    pub etag: EtagComponent<Cache>,
    /// TTL of stored documents
    pub document_ttl: Duration,
}

impl AppState {
    /// Wire the state over one cache using configured TTLs
    #[must_use]
    pub fn new(cache: Cache, config: &ServerConfig) -> Self {
        let sessions = SessionStore::new(cache.clone(), config.session.ttl());
        Self {
            timestamps: EtagTimestamps::new(cache.clone(), config.etag.timestamp_ttl()),
            etag: EtagComponent::new(cache.clone(), sessions.clone()),
            document_ttl: config.etag.timestamp_ttl(),
            sessions,
            cache,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(StudyRoutes::routes(&state))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span::<Body>)
                .on_response(record_response::<Body>),
        )
        .with_state(state)
}
