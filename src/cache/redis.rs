// ABOUTME: Redis cache implementation with connection management and TTL support
// ABOUTME: Shares etag timestamps and sessions across every API instance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{CacheConfig, CacheKey, CacheProvider};
use crate::config::cache::RedisConnectionConfig;
use crate::constants::cache::CACHE_KEY_PREFIX;
use crate::errors::{AppError, AppResult};
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

/// Keys fetched per SCAN round trip
const SCAN_BATCH_SIZE: usize = 100;

/// Redis cache implementation
///
/// Uses Redis `ConnectionManager` for automatic reconnection. Every key is
/// prefixed with `CACHE_KEY_PREFIX` so a shared Redis instance can host other data.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

/// Map a Redis failure onto a storage error, logging the failed command
fn storage_error(command: &'static str) -> impl FnOnce(redis::RedisError) -> AppError {
    move |e| {
        error!(command, error = %e, "Redis command failed");
        AppError::storage(format!("Redis {command} failed: {e}")).with_source(e)
    }
}

impl RedisCache {
    async fn new_with_config(config: &CacheConfig) -> AppResult<Self> {
        let redis_url = config
            .redis_url
            .as_ref()
            .ok_or_else(|| AppError::config("Redis URL is required for Redis cache backend"))?;

        let conn_config = &config.redis_connection;

        info!(
            "Connecting to Redis (timeout={}s, response_timeout={}s, retries={})",
            conn_config.connection_timeout_secs,
            conn_config.response_timeout_secs,
            conn_config.initial_connection_retries
        );

        let client = redis::Client::open(redis_url.as_str())
            .map_err(|e| AppError::config(format!("Invalid Redis URL: {e}")))?;

        let manager = Self::connect_with_retry(&client, conn_config).await?;

        info!("Successfully connected to Redis");

        Ok(Self { manager })
    }

    /// Connect to Redis with exponential backoff retry on failure
    async fn connect_with_retry(
        client: &redis::Client,
        conn_config: &RedisConnectionConfig,
    ) -> AppResult<ConnectionManager> {
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(conn_config.connection_timeout_secs))
            .set_response_timeout(Duration::from_secs(conn_config.response_timeout_secs))
            .set_number_of_retries(conn_config.reconnection_retries)
            .set_exponent_base(conn_config.retry_exponent_base)
            .set_max_delay(conn_config.max_retry_delay_ms);

        let max_retries = conn_config.initial_connection_retries;
        let mut delay_ms = conn_config.initial_retry_delay_ms;
        let mut attempt = 0;

        loop {
            match ConnectionManager::new_with_config(client.clone(), manager_config.clone()).await {
                Ok(manager) => {
                    if attempt > 0 {
                        info!("Redis connection established after {} retries", attempt);
                    }
                    return Ok(manager);
                }
                Err(e) if attempt < max_retries => {
                    warn!(
                        "Redis connection attempt {}/{} failed, retrying in {}ms: {}",
                        attempt + 1,
                        max_retries + 1,
                        delay_ms,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms = (delay_ms * 2).min(conn_config.max_retry_delay_ms);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(AppError::storage(format!(
                        "Failed to connect to Redis after {} attempts: {e}",
                        max_retries + 1
                    )));
                }
            }
        }
    }

    /// Build full Redis key with namespace prefix
    fn build_key(key: &CacheKey) -> String {
        format!("{CACHE_KEY_PREFIX}{key}")
    }

    /// Delete every namespaced key matching `pattern`, walking the keyspace with SCAN
    async fn delete_matching(&self, pattern: &str) -> AppResult<u64> {
        let redis_pattern = format!("{CACHE_KEY_PREFIX}{pattern}");
        let mut conn = self.manager.clone();
        let mut deleted = 0u64;
        let mut cursor = 0u64;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&redis_pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH_SIZE)
                .query_async(&mut conn)
                .await
                .map_err(storage_error("SCAN"))?;

            if !keys.is_empty() {
                let removed: u64 = conn.del(&keys).await.map_err(storage_error("DEL"))?;
                deleted += removed;
            }

            cursor = next_cursor;
            if cursor == 0 {
                return Ok(deleted);
            }
        }
    }
}

#[async_trait::async_trait]
impl CacheProvider for RedisCache {
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized,
    {
        Self::new_with_config(&config).await
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let serialized = serde_json::to_vec(value)?;
        let mut conn = self.manager.clone();

        // SETEX writes value and expiration atomically; Redis rejects a zero TTL
        conn.set_ex::<_, _, ()>(Self::build_key(key), serialized, ttl.as_secs().max(1))
            .await
            .map_err(storage_error("SETEX"))
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let mut conn = self.manager.clone();

        let data: Option<Vec<u8>> = conn
            .get(Self::build_key(key))
            .await
            .map_err(storage_error("GET"))?;

        data.map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(AppError::from)
    }

    async fn invalidate(&self, key: &CacheKey) -> AppResult<()> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(Self::build_key(key))
            .await
            .map_err(storage_error("DEL"))
    }

    async fn invalidate_pattern(&self, pattern: &str) -> AppResult<u64> {
        self.delete_matching(pattern).await
    }

    async fn exists(&self, key: &CacheKey) -> AppResult<bool> {
        let mut conn = self.manager.clone();
        conn.exists(Self::build_key(key))
            .await
            .map_err(storage_error("EXISTS"))
    }

    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>> {
        let mut conn = self.manager.clone();

        let ttl_secs: i64 = conn
            .ttl(Self::build_key(key))
            .await
            .map_err(storage_error("TTL"))?;

        // Redis returns -2 if key doesn't exist, -1 if key has no expiration
        Ok(u64::try_from(ttl_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs))
    }

    async fn health_check(&self) -> AppResult<()> {
        let mut conn = self.manager.clone();

        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(storage_error("PING"))?;

        if response == "PONG" {
            Ok(())
        } else {
            Err(AppError::storage(format!(
                "Unexpected PING response '{response}'"
            )))
        }
    }

    async fn clear_all(&self) -> AppResult<()> {
        // Only keys under our namespace prefix, safe for shared Redis instances
        let removed = self.delete_matching("*").await?;
        info!("Cleared {} cache entries", removed);
        Ok(())
    }
}
