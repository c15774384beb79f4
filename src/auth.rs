// ABOUTME: User session model and cache-backed session store
// ABOUTME: Resolves the caller identity from the session token carried on each request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sessions
//!
//! Sessions are created by the sign-in flow and cached under their token. Request
//! handling only reads them: a request is authenticated when the token from the
//! `Bridge-Session` header maps to a live session.

use crate::cache::factory::Cache;
use crate::cache::{CacheKey, CacheProvider};
use crate::constants::headers::SESSION_TOKEN;
use crate::errors::{AppError, AppResult};
use axum::extract::{FromRef, FromRequestParts};
use http::request::Parts;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Authenticated caller identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    /// Account identifier of the caller
    pub id: String,
    /// App the caller signed in to
    pub app_id: String,
    /// Token the session is cached under
    pub session_token: String,
    /// Organization the caller is a member of, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_membership: Option<String>,
}

impl UserSession {
    /// Create a session with no organization membership
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        app_id: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            app_id: app_id.into(),
            session_token: session_token.into(),
            org_membership: None,
        }
    }

    /// Attach an organization membership
    #[must_use]
    pub fn with_org_membership(mut self, org_id: impl Into<String>) -> Self {
        self.org_membership = Some(org_id.into());
        self
    }
}

/// Session lookup and storage over a cache provider
#[derive(Clone)]
pub struct SessionStore<C: CacheProvider> {
    cache: C,
    ttl: Duration,
}

impl<C: CacheProvider> SessionStore<C> {
    /// Create a store that writes sessions with the given TTL
    pub const fn new(cache: C, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Look up the session for a token; a missing token is never authenticated
    ///
    /// # Errors
    ///
    /// Returns an error if the cache read or deserialization fails
    pub async fn get(&self, token: Option<&str>) -> AppResult<Option<UserSession>> {
        let Some(token) = token.filter(|token| !token.is_empty()) else {
            debug!("No session token supplied");
            return Ok(None);
        };
        self.cache.get(&CacheKey::user_session(token)).await
    }

    /// Store a session under its own token
    ///
    /// # Errors
    ///
    /// Returns an error if the cache write fails
    pub async fn put(&self, session: &UserSession) -> AppResult<()> {
        self.cache
            .set(
                &CacheKey::user_session(session.session_token.as_str()),
                session,
                self.ttl,
            )
            .await
    }

    /// Remove the session stored under a token
    ///
    /// # Errors
    ///
    /// Returns an error if the cache delete fails
    pub async fn remove(&self, token: &str) -> AppResult<()> {
        self.cache.invalidate(&CacheKey::user_session(token)).await
    }
}

/// Extractor yielding the caller's session, rejecting unauthenticated requests
#[derive(Debug, Clone)]
pub struct AuthenticatedSession(pub UserSession);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedSession
where
    SessionStore<Cache>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(SESSION_TOKEN)
            .and_then(|value| value.to_str().ok());

        SessionStore::<Cache>::from_ref(state)
            .get(token)
            .await?
            .map(Self)
            .ok_or_else(AppError::auth_required)
    }
}
