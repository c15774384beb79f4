// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants organized by domain for the Bridge research API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Cache-related constants (TTL, sizes, key layout)
pub mod cache;

/// HTTP header names read and written by the service
pub mod headers {
    /// Session credential header supplied by authenticated callers
    pub const SESSION_TOKEN: &str = "Bridge-Session";
    /// Request correlation header
    pub const REQUEST_ID: &str = "x-request-id";
}

/// Etag support constants
pub mod etag {
    /// Prefix of the error raised when a key parameter cannot be resolved
    pub const NO_VALUE_ERROR: &str = "EtagSupport: no value for key: ";
    /// Identity field resolved from the session's app
    pub const APP_ID_FIELD: &str = "appId";
    /// Identity field resolved from the session's user
    pub const USER_ID_FIELD: &str = "userId";
    /// Identity field resolved from the participant's organization membership
    pub const ORG_ID_FIELD: &str = "orgId";
    /// Separator between canonical timestamps before hashing
    pub const TIMESTAMP_SEPARATOR: &str = " ";
    /// Default TTL for recorded modification timestamps (30 days)
    pub const DEFAULT_TIMESTAMP_TTL_SECS: u64 = 2_592_000;
}

/// Session constants
pub mod session {
    /// Default TTL for cached user sessions (12 hours)
    pub const DEFAULT_SESSION_TTL_SECS: u64 = 43_200;
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// Service names used in structured logging
pub mod service_names {
    /// Name of the API server binary
    pub const BRIDGE_SERVER: &str = "bridge-server";
}

/// Redis connection defaults
pub mod redis {
    /// Connection timeout in seconds
    pub const CONNECTION_TIMEOUT_SECS: u64 = 5;
    /// Response timeout in seconds
    pub const RESPONSE_TIMEOUT_SECS: u64 = 3;
    /// Reconnection retries after a dropped connection
    pub const RECONNECTION_RETRIES: usize = 6;
    /// Exponential backoff base
    pub const RETRY_EXPONENT_BASE: u64 = 2;
    /// Maximum retry delay in milliseconds
    pub const MAX_RETRY_DELAY_MS: u64 = 10_000;
    /// Retries for the initial connection at startup
    pub const INITIAL_CONNECTION_RETRIES: u32 = 3;
    /// Initial retry delay in milliseconds
    pub const INITIAL_RETRY_DELAY_MS: u64 = 500;
}
