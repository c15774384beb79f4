// ABOUTME: Writers for entity modification timestamps that feed etag signatures
// ABOUTME: Records, refreshes, and clears timestamps when tracked entities change
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::cache::factory::Cache;
use crate::cache::{CacheKey, CacheProvider};
use crate::errors::AppResult;
use chrono::{DateTime, FixedOffset, Utc};
use std::time::Duration;
use tracing::debug;

/// Records modification timestamps under etag cache keys
#[derive(Clone)]
pub struct EtagTimestamps<C: CacheProvider = Cache> {
    cache: C,
    ttl: Duration,
}

impl<C: CacheProvider> EtagTimestamps<C> {
    /// Create a writer that stores timestamps with the given TTL
    pub const fn new(cache: C, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Store the modification timestamp of one entity
    ///
    /// # Errors
    ///
    /// Returns an error if the cache write fails
    pub async fn record(
        &self,
        model: &str,
        values: Vec<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> AppResult<()> {
        let key = CacheKey::etag(model, values);
        debug!(key = %key, timestamp = %timestamp, "Recording etag timestamp");
        self.cache.set(&key, &timestamp, self.ttl).await
    }

    /// Store the current time as the modification timestamp of one entity
    ///
    /// # Errors
    ///
    /// Returns an error if the cache write fails
    pub async fn record_now(
        &self,
        model: &str,
        values: Vec<String>,
    ) -> AppResult<DateTime<FixedOffset>> {
        let now = Utc::now().fixed_offset();
        self.record(model, values, now).await?;
        Ok(now)
    }

    /// Remove the timestamp of a deleted entity
    ///
    /// # Errors
    ///
    /// Returns an error if the cache delete fails
    pub async fn clear(&self, model: &str, values: Vec<String>) -> AppResult<()> {
        let key = CacheKey::etag(model, values);
        debug!(key = %key, "Clearing etag timestamp");
        self.cache.invalidate(&key).await
    }

    /// Remove every timestamp recorded for a model
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern delete fails
    pub async fn clear_model(&self, model: &str) -> AppResult<u64> {
        let removed = self
            .cache
            .invalidate_pattern(&CacheKey::model_pattern(model))
            .await?;
        debug!(model, removed, "Cleared etag timestamps for model");
        Ok(removed)
    }
}
