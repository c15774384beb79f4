// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides cache, session, and application state helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `bridge_server`

use anyhow::Result;
use bridge_server::{
    auth::{SessionStore, UserSession},
    cache::{factory::Cache, memory::InMemoryCache, CacheConfig, CacheProvider},
    config::environment::ServerConfig,
    etag::{EtagComponent, EtagTimestamps},
    routes::AppState,
};
use chrono::{DateTime, FixedOffset};
use std::sync::Once;
use std::time::Duration;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Session TTL used by tests
pub const TEST_TTL: Duration = Duration::from_secs(3600);

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

fn test_cache_config() -> CacheConfig {
    CacheConfig {
        max_entries: 1000,
        redis_url: None,
        cleanup_interval: Duration::from_secs(300),
        enable_background_cleanup: false,
        ..Default::default()
    }
}

/// In-memory cache without the background cleanup task
pub async fn create_test_memory_cache() -> Result<InMemoryCache> {
    init_test_logging();
    Ok(InMemoryCache::new(test_cache_config()).await?)
}

/// Cache handle as the server builds it, backed by memory
pub async fn create_test_cache() -> Result<Cache> {
    init_test_logging();
    Ok(Cache::new(test_cache_config()).await?)
}

/// Component, session store, and timestamp writer over one in-memory cache
pub async fn create_test_component() -> Result<(
    EtagComponent<InMemoryCache>,
    SessionStore<InMemoryCache>,
    EtagTimestamps<InMemoryCache>,
)> {
    let cache = create_test_memory_cache().await?;
    let sessions = SessionStore::new(cache.clone(), TEST_TTL);
    let timestamps = EtagTimestamps::new(cache.clone(), TEST_TTL);
    Ok((EtagComponent::new(cache, sessions.clone()), sessions, timestamps))
}

/// Application state over a fresh in-memory cache
pub async fn create_test_state() -> Result<AppState> {
    let cache = create_test_cache().await?;
    Ok(AppState::new(cache, &ServerConfig::default()))
}

/// Store a new session for a random user of `app_id`
pub async fn create_test_session<C: CacheProvider>(
    sessions: &SessionStore<C>,
    app_id: &str,
) -> Result<UserSession> {
    let session = UserSession::new(
        Uuid::new_v4().to_string(),
        app_id,
        Uuid::new_v4().simple().to_string(),
    );
    sessions.put(&session).await?;
    Ok(session)
}

/// Parse an RFC 3339 timestamp
pub fn timestamp(value: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(value).expect("valid RFC 3339 timestamp")
}
