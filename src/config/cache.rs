// ABOUTME: Cache configuration types loaded from the environment
// ABOUTME: Handles Redis connection tuning and in-memory cache sizing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::env_or;
use crate::cache;
use crate::constants::{cache as cache_defaults, redis};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Cache configuration for Redis and in-memory caching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis URL for distributed caching (optional)
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Maximum number of entries in local cache
    pub max_entries: usize,
    /// Cache cleanup interval in seconds
    pub cleanup_interval_secs: u64,
    /// Redis connection configuration
    #[serde(default)]
    pub redis_connection: RedisConnectionConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            max_entries: cache_defaults::DEFAULT_CACHE_MAX_ENTRIES,
            cleanup_interval_secs: cache_defaults::DEFAULT_CLEANUP_INTERVAL_SECS,
            redis_connection: RedisConnectionConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Load cache configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            max_entries: env_or(
                "CACHE_MAX_ENTRIES",
                cache_defaults::DEFAULT_CACHE_MAX_ENTRIES,
            ),
            cleanup_interval_secs: env_or(
                "CACHE_CLEANUP_INTERVAL_SECS",
                cache_defaults::DEFAULT_CLEANUP_INTERVAL_SECS,
            ),
            redis_connection: RedisConnectionConfig::from_env(),
        }
    }

    /// Build the runtime configuration used to construct a cache backend
    #[must_use]
    pub fn to_runtime(&self) -> cache::CacheConfig {
        cache::CacheConfig {
            max_entries: self.max_entries,
            redis_url: self.redis_url.clone(),
            cleanup_interval: Duration::from_secs(self.cleanup_interval_secs),
            enable_background_cleanup: true,
            redis_connection: self.redis_connection.clone(),
        }
    }
}

/// Redis connection and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConnectionConfig {
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
    /// Response/command timeout in seconds
    pub response_timeout_secs: u64,
    /// Number of reconnection retries after connection drop
    pub reconnection_retries: usize,
    /// Exponential backoff base for retry delays
    pub retry_exponent_base: u64,
    /// Maximum retry delay in milliseconds
    pub max_retry_delay_ms: u64,
    /// Number of retries for initial connection at startup
    pub initial_connection_retries: u32,
    /// Initial retry delay in milliseconds (doubles with exponential backoff)
    pub initial_retry_delay_ms: u64,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: redis::CONNECTION_TIMEOUT_SECS,
            response_timeout_secs: redis::RESPONSE_TIMEOUT_SECS,
            reconnection_retries: redis::RECONNECTION_RETRIES,
            retry_exponent_base: redis::RETRY_EXPONENT_BASE,
            max_retry_delay_ms: redis::MAX_RETRY_DELAY_MS,
            initial_connection_retries: redis::INITIAL_CONNECTION_RETRIES,
            initial_retry_delay_ms: redis::INITIAL_RETRY_DELAY_MS,
        }
    }
}

impl RedisConnectionConfig {
    /// Load Redis connection configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            connection_timeout_secs: env_or(
                "REDIS_CONNECTION_TIMEOUT_SECS",
                redis::CONNECTION_TIMEOUT_SECS,
            ),
            response_timeout_secs: env_or(
                "REDIS_RESPONSE_TIMEOUT_SECS",
                redis::RESPONSE_TIMEOUT_SECS,
            ),
            reconnection_retries: env_or("REDIS_RECONNECTION_RETRIES", redis::RECONNECTION_RETRIES),
            retry_exponent_base: env_or("REDIS_RETRY_EXPONENT_BASE", redis::RETRY_EXPONENT_BASE),
            max_retry_delay_ms: env_or("REDIS_MAX_RETRY_DELAY_MS", redis::MAX_RETRY_DELAY_MS),
            initial_connection_retries: env_or(
                "REDIS_INITIAL_CONNECTION_RETRIES",
                redis::INITIAL_CONNECTION_RETRIES,
            ),
            initial_retry_delay_ms: env_or(
                "REDIS_INITIAL_RETRY_DELAY_MS",
                redis::INITIAL_RETRY_DELAY_MS,
            ),
        }
    }
}
