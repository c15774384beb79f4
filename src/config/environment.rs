// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Loads server port, cache backend, etag, and session settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use super::cache::CacheConfig;
use super::env_or;
use crate::constants::{etag, ports, session};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;

/// Environment type for logging and deployment behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Whether this is a production deployment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Etag timestamp configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtagConfig {
    /// TTL applied when recording an entity's modification timestamp
    pub timestamp_ttl_secs: u64,
}

impl Default for EtagConfig {
    fn default() -> Self {
        Self {
            timestamp_ttl_secs: etag::DEFAULT_TIMESTAMP_TTL_SECS,
        }
    }
}

impl EtagConfig {
    /// Load etag configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            timestamp_ttl_secs: env_or("ETAG_TIMESTAMP_TTL_SECS", etag::DEFAULT_TIMESTAMP_TTL_SECS),
        }
    }

    /// TTL of a recorded timestamp
    #[must_use]
    pub const fn timestamp_ttl(&self) -> Duration {
        Duration::from_secs(self.timestamp_ttl_secs)
    }
}

/// User session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// TTL applied when storing a session
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: session::DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl SessionConfig {
    /// Load session configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            ttl_secs: env_or("SESSION_TTL_SECS", session::DEFAULT_SESSION_TTL_SECS),
        }
    }

    /// TTL of a stored session
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Cache backend configuration
    pub cache: CacheConfig,
    /// Etag timestamp configuration
    pub etag: EtagConfig,
    /// Session configuration
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `HTTP_PORT` is set but is not a valid port number
    /// - A TTL is configured as zero
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|e| anyhow!("Invalid HTTP_PORT value '{value}': {e}"))?,
            Err(_) => ports::DEFAULT_HTTP_PORT,
        };

        let environment = env::var("ENVIRONMENT")
            .map(|value| Environment::from_str_or_default(&value))
            .unwrap_or_default();

        let config = Self {
            http_port,
            environment,
            cache: CacheConfig::from_env(),
            etag: EtagConfig::from_env(),
            session: SessionConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a TTL is zero
    pub fn validate(&self) -> Result<()> {
        if self.etag.timestamp_ttl_secs == 0 {
            return Err(anyhow!("ETAG_TIMESTAMP_TTL_SECS must be greater than zero"));
        }
        if self.session.ttl_secs == 0 {
            return Err(anyhow!("SESSION_TTL_SECS must be greater than zero"));
        }
        Ok(())
    }

    /// Human-readable configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Bridge Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Cache Backend: {}\n\
             - Cache Max Entries: {}\n\
             - Etag Timestamp TTL: {}s\n\
             - Session TTL: {}s",
            self.http_port,
            self.environment,
            if self.cache.redis_url.is_some() {
                "redis"
            } else {
                "in-memory"
            },
            self.cache.max_entries,
            self.etag.timestamp_ttl_secs,
            self.session.ttl_secs,
        )
    }
}
