// ABOUTME: Cache abstraction layer for etag timestamps and user sessions
// ABOUTME: Pluggable backend support (in-memory, Redis) behind a single provider trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cache factory for creating cache providers
pub mod factory;
/// In-memory cache implementation
pub mod memory;
/// Redis cache implementation
pub mod redis;

use crate::config::cache::RedisConnectionConfig;
use crate::constants::cache::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLEANUP_INTERVAL_SECS, ETAG_KEY_SUFFIX, KEY_SEPARATOR,
    SESSION_KEY_SUFFIX,
};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Cache provider trait for pluggable backend implementations
///
/// Every request that carries etag support reads from the provider concurrently,
/// so implementations must be cheap to clone and safe to share across tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use bridge_server::cache::{CacheConfig, CacheKey, CacheProvider};
/// use bridge_server::cache::memory::InMemoryCache;
/// use chrono::{DateTime, Utc};
/// use std::time::Duration;
/// # async fn example() -> Result<(), bridge_server::errors::AppError> {
///
/// let config = CacheConfig {
///     enable_background_cleanup: false,
///     ..Default::default()
/// };
/// let cache = InMemoryCache::new(config).await?;
///
/// let key = CacheKey::etag("Schedule", vec!["api".to_owned(), "study1".to_owned()]);
/// cache.set(&key, &Utc::now(), Duration::from_secs(3600)).await?;
///
/// let modified_on: Option<DateTime<Utc>> = cache.get(&key).await?;
/// assert!(modified_on.is_some());
///
/// cache.invalidate(&key).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync + Clone {
    /// Create new cache instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Store value in cache with TTL
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>;

    /// Retrieve value from cache, `None` on a miss or an expired entry
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization or the backend read fails
    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>>;

    /// Remove single cache entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    async fn invalidate(&self, key: &CacheKey) -> AppResult<()>;

    /// Remove all cache entries matching a glob pattern (e.g., `"*:Schedule:Etag"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid or invalidation fails
    async fn invalidate_pattern(&self, pattern: &str) -> AppResult<u64>;

    /// Check if key exists in cache
    ///
    /// # Errors
    ///
    /// Returns an error if existence check fails
    async fn exists(&self, key: &CacheKey) -> AppResult<bool>;

    /// Get remaining TTL for key
    ///
    /// # Errors
    ///
    /// Returns an error if TTL check fails
    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>>;

    /// Verify cache backend is healthy
    ///
    /// # Errors
    ///
    /// Returns an error if health check fails
    async fn health_check(&self) -> AppResult<()>;

    /// Clear all cache entries (for testing/admin)
    ///
    /// # Errors
    ///
    /// Returns an error if clear operation fails
    async fn clear_all(&self) -> AppResult<()>;
}

/// Runtime cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries (for in-memory cache)
    pub max_entries: usize,
    /// Redis connection URL (selects the Redis backend when present)
    pub redis_url: Option<String>,
    /// Cleanup interval for expired entries
    pub cleanup_interval: Duration,
    /// Enable background cleanup task (should be false in tests to avoid runtime conflicts)
    pub enable_background_cleanup: bool,
    /// Redis connection and retry configuration
    pub redis_connection: RedisConnectionConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            redis_url: None,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::default(),
        }
    }
}

/// Structured cache key
///
/// Keys render to colon-separated strings with the most specific identifiers first,
/// so every etag key for one model shares the `:<Model>:Etag` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Last-modified timestamp of an entity model scoped by ordered identifier values
    Etag {
        /// Entity model name (e.g. `Schedule`)
        model: String,
        /// Resolved identifier values in declaration order
        values: Vec<String>,
    },
    /// Authenticated user session addressed by its session token
    UserSession {
        /// Opaque session token
        token: String,
    },
    /// Stored document of an entity model scoped by ordered identifier values
    Document {
        /// Entity model name (e.g. `Schedule`)
        model: String,
        /// Identifier values in declaration order
        values: Vec<String>,
    },
}

impl CacheKey {
    /// Key under which an entity model's modification timestamp is stored
    pub fn etag(model: impl Into<String>, values: Vec<String>) -> Self {
        Self::Etag {
            model: model.into(),
            values,
        }
    }

    /// Key under which a user session is stored
    pub fn user_session(token: impl Into<String>) -> Self {
        Self::UserSession {
            token: token.into(),
        }
    }

    /// Key under which an entity document is stored
    pub fn document(model: impl Into<String>, values: Vec<String>) -> Self {
        Self::Document {
            model: model.into(),
            values,
        }
    }

    /// Create pattern matching every etag timestamp of one model
    #[must_use]
    pub fn model_pattern(model: &str) -> String {
        format!("*{KEY_SEPARATOR}{model}{KEY_SEPARATOR}{ETAG_KEY_SUFFIX}")
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Etag { model, values } => {
                for value in values {
                    write!(f, "{value}{KEY_SEPARATOR}")?;
                }
                write!(f, "{model}{KEY_SEPARATOR}{ETAG_KEY_SUFFIX}")
            }
            Self::UserSession { token } => {
                write!(f, "{token}{KEY_SEPARATOR}{SESSION_KEY_SUFFIX}")
            }
            Self::Document { model, values } => {
                for value in values {
                    write!(f, "{value}{KEY_SEPARATOR}")?;
                }
                write!(f, "{model}")
            }
        }
    }
}
