// ABOUTME: Integration tests for the Redis cache backend
// ABOUTME: Runs against a real Redis instance when REDIS_URL is set, otherwise skips
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use anyhow::Result;
use bridge_server::cache::{factory::Cache, CacheConfig, CacheKey, CacheProvider};
use chrono::{DateTime, FixedOffset, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Etag key under a random app so concurrent runs do not collide
fn unique_key(model: &str) -> (String, CacheKey) {
    let app_id = Uuid::new_v4().simple().to_string();
    let key = CacheKey::etag(model, vec![app_id.clone(), "study1".to_owned()]);
    (app_id, key)
}

/// Create Redis cache from `REDIS_URL`; `None` when it is not set
async fn create_redis_cache() -> Result<Option<Cache>> {
    let Ok(redis_url) = std::env::var("REDIS_URL") else {
        println!("REDIS_URL not set, skipping Redis cache tests");
        return Ok(None);
    };

    let config = CacheConfig {
        redis_url: Some(redis_url),
        enable_background_cleanup: false,
        ..Default::default()
    };

    Ok(Some(Cache::new(config).await?))
}

macro_rules! require_redis {
    ($cache:expr) => {
        match $cache {
            Some(cache) => cache,
            None => {
                println!("Skipping test: Redis not available");
                return Ok(());
            }
        }
    };
}

#[tokio::test]
async fn test_redis_cache_health_check() -> Result<()> {
    let cache = require_redis!(create_redis_cache().await?);
    assert_eq!(cache.backend_info(), "Redis (shared)");
    cache.health_check().await?;
    Ok(())
}

#[tokio::test]
async fn test_redis_timestamp_set_get_invalidate() -> Result<()> {
    let cache = require_redis!(create_redis_cache().await?);
    let (_, key) = unique_key("Schedule");
    let now = Utc::now().fixed_offset();

    cache.set(&key, &now, Duration::from_secs(60)).await?;
    let loaded: Option<DateTime<FixedOffset>> = cache.get(&key).await?;
    assert_eq!(loaded, Some(now));

    let ttl = cache.ttl(&key).await?.expect("ttl for live key");
    assert!(ttl.as_secs() <= 60);

    cache.invalidate(&key).await?;
    assert!(!cache.exists(&key).await?);
    Ok(())
}

#[tokio::test]
async fn test_redis_invalidate_pattern() -> Result<()> {
    let cache = require_redis!(create_redis_cache().await?);
    let (app_id, first) = unique_key("Schedule");
    let second = CacheKey::etag("Schedule", vec![app_id.clone(), "study2".to_owned()]);
    let other = CacheKey::etag("StudyActivityEvent", vec![app_id.clone()]);

    for key in [&first, &second, &other] {
        cache.set(key, &1, Duration::from_secs(60)).await?;
    }

    let removed = cache
        .invalidate_pattern(&format!("{app_id}:*:Schedule:Etag"))
        .await?;
    assert_eq!(removed, 2);
    assert!(!cache.exists(&first).await?);
    assert!(cache.exists(&other).await?);

    cache.invalidate(&other).await?;
    Ok(())
}
