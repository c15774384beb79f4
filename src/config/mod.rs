// ABOUTME: Configuration module root for environment-driven server settings
// ABOUTME: Exposes cache and environment configuration plus shared parsing helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-only configuration management

/// Cache backend configuration
pub mod cache;
/// Server, etag, and session configuration
pub mod environment;

use std::env;
use std::str::FromStr;

/// Read an environment variable, falling back to `default` when unset or unparsable
pub(crate) fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
