// ABOUTME: Request-time etag evaluation over cached modification timestamps
// ABOUTME: Authenticates the caller, computes the signature, and decides 304 versus proceed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{signature, ArgValues, EtagContext};
use crate::auth::{SessionStore, UserSession};
use crate::cache::factory::Cache;
use crate::cache::{CacheKey, CacheProvider};
use crate::constants::etag::{APP_ID_FIELD, NO_VALUE_ERROR, ORG_ID_FIELD, USER_ID_FIELD};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset};
use std::future::Future;
use tracing::{debug, Span};

/// Result of evaluating a request against its etag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EtagOutcome<T> {
    /// Client copy is current; the operation was not invoked
    NotModified {
        /// Signature the client presented and the server recomputed
        etag: String,
    },
    /// The operation ran and produced `value`
    Proceed {
        /// Operation result
        value: T,
        /// Fresh signature, absent when any timestamp is unknown
        etag: Option<String>,
    },
}

/// Evaluates etag support for intercepted operations
///
/// Only reads the cache: both the session lookup and the timestamp lookups are
/// side-effect free, so one component is shared by every request.
#[derive(Clone)]
pub struct EtagComponent<C: CacheProvider = Cache> {
    cache: C,
    sessions: SessionStore<C>,
}

impl<C: CacheProvider> EtagComponent<C> {
    /// Create a component reading timestamps from `cache` and sessions from `sessions`
    pub const fn new(cache: C, sessions: SessionStore<C>) -> Self {
        Self { cache, sessions }
    }

    /// Resolve the caller's session
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` if the token is missing or maps to no session
    pub async fn user_session(&self, session_token: Option<&str>) -> AppResult<UserSession> {
        self.sessions
            .get(session_token)
            .await?
            .ok_or_else(|| AppError::auth_required())
    }

    /// Evaluate a request and run `proceed` unless the client's copy is current
    ///
    /// The session is checked before any signature work. When `request_etag`
    /// equals the computed signature, `proceed` is dropped without being called.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not authenticated
    /// - A declared parameter cannot be resolved
    /// - The cache backend fails
    pub async fn check_etag<F, Fut, T>(
        &self,
        context: &EtagContext,
        request_etag: Option<&str>,
        session_token: Option<&str>,
        proceed: F,
    ) -> AppResult<EtagOutcome<T>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
    {
        let span = Span::current();
        span.record("etag.phase", "start");

        let session = self.user_session(session_token).await?;
        span.record("etag.phase", "identity_checked");

        let etag = self.calculate_etag(context, &session).await?;
        span.record("etag.phase", "signature_computed");
        if let Some(etag) = &etag {
            span.record("etag.value", etag.as_str());
        }

        if let (Some(requested), Some(current)) = (request_etag, etag.as_deref()) {
            if requested == current {
                span.record("etag.phase", "short_circuited");
                debug!("Returning 304 for etag: {current}");
                return Ok(EtagOutcome::NotModified {
                    etag: current.to_owned(),
                });
            }
        }

        span.record("etag.phase", "proceed");
        let value = proceed().await;
        if let Some(etag) = &etag {
            debug!("Returning etag to response: {etag}");
        }
        Ok(EtagOutcome::Proceed { value, etag })
    }

    /// Compute the signature for the declared cache keys
    ///
    /// Returns `Ok(None)` as soon as any declared timestamp is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter cannot be resolved or the cache read fails
    pub async fn calculate_etag(
        &self,
        context: &EtagContext,
        session: &UserSession,
    ) -> AppResult<Option<String>> {
        let mut timestamps = Vec::with_capacity(context.cache_keys().len());

        for etag_key in context.cache_keys() {
            let values = etag_key
                .keys
                .iter()
                .map(|field| resolve_value(context.args(), session, field))
                .collect::<AppResult<Vec<_>>>()?;

            let cache_key = CacheKey::etag(etag_key.model.as_str(), values);
            let timestamp: Option<DateTime<FixedOffset>> = self.cache.get(&cache_key).await?;
            let Some(timestamp) = timestamp else {
                debug!(key = %cache_key, "No etag timestamp cached");
                return Ok(None);
            };
            timestamps.push(timestamp);
        }

        Ok(Some(signature(&timestamps)))
    }
}

/// Resolve one parameter from the argument bindings, then from the caller's identity
///
/// # Errors
///
/// Returns `InvalidArgument` if the parameter is bound without a value or cannot be resolved
pub fn resolve_value(args: &ArgValues, session: &UserSession, field: &str) -> AppResult<String> {
    let value = match args.get(field) {
        Some(bound) => bound,
        None => match field {
            APP_ID_FIELD => Some(session.app_id.as_str()),
            USER_ID_FIELD => Some(session.id.as_str()),
            ORG_ID_FIELD => session.org_membership.as_deref(),
            _ => None,
        },
    };

    value
        .map(ToOwned::to_owned)
        .ok_or_else(|| AppError::invalid_argument(format!("{NO_VALUE_ERROR}{field}")))
}
