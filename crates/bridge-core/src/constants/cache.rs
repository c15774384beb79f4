// ABOUTME: Cache-related constants for capacity, cleanup intervals, and key layout
// ABOUTME: Supports both in-memory and Redis cache backends with optimal defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default maximum cache entries for in-memory cache
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Default cleanup interval in seconds for expired entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300; // 5 minutes

/// Cache key prefix for namespacing shared Redis instances
pub const CACHE_KEY_PREFIX: &str = "bridge:cache:";

/// Separator between cache key segments
pub const KEY_SEPARATOR: &str = ":";

/// Trailing segment of every etag timestamp key
pub const ETAG_KEY_SUFFIX: &str = "Etag";

/// Trailing segment of every session key
pub const SESSION_KEY_SUFFIX: &str = "session";
