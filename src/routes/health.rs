// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Reports liveness together with the health of the cache backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use crate::cache::factory::Cache;
use crate::cache::CacheProvider;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use tracing::warn;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes<S>() -> Router<S>
    where
        Cache: axum::extract::FromRef<S>,
        S: Clone + Send + Sync + 'static,
    {
        Router::new().route("/health", get(health_handler))
    }
}

async fn health_handler(State(cache): State<Cache>) -> (StatusCode, Json<serde_json::Value>) {
    let (status, cache_status) = match cache.health_check().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            warn!(error = %e, "Cache health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    (
        status,
        Json(serde_json::json!({
            "status": if status.is_success() { "healthy" } else { "degraded" },
            "cache": {
                "backend": cache.backend_info(),
                "status": cache_status,
            },
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}
