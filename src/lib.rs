// ABOUTME: Main library entry point for the Bridge research API server
// ABOUTME: Serves study routes whose conditional reads are answered from etag signatures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Bridge Server
//!
//! HTTP service for a health-research platform. Responses that depend on slowly
//! changing entities (study schedules, participant activity events) carry an `ETag`
//! computed from those entities' modification timestamps, and a request whose
//! `If-None-Match` still matches is answered with `304 Not Modified` without running
//! the handler.
//!
//! ## Architecture
//!
//! - **Cache**: pluggable in-memory or Redis backend holding sessions, documents, and
//!   etag timestamps
//! - **Etag**: signature computation and the request-time decision to short-circuit
//! - **Middleware**: axum layers for etag support, request IDs, and tracing
//! - **Routes**: health and study endpoints
//! - **Config**: environment-only configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bridge_server::config::environment::ServerConfig;
//! use bridge_server::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Bridge server configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Session model and cache-backed session store
pub mod auth;

/// Cache abstraction layer with pluggable backends
pub mod cache;

/// Configuration management
pub mod config;

/// Application constants and configuration defaults
pub mod constants;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Etag signatures, evaluation, and timestamp writers
pub mod etag;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// HTTP routes and application state
pub mod routes;
