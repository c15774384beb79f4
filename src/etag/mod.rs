// ABOUTME: Etag freshness signatures built from cached entity modification timestamps
// ABOUTME: Declares cache-key specs, request argument bindings, and the digest computation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Etag Support
//!
//! An etag is derived from the UTC modification timestamps of every entity a response
//! depends on. Each [`EtagCacheKey`] names an entity model and the ordered parameters
//! (`appId`, `studyId`, `userId`, ...) whose values locate that model's timestamp in the
//! cache. Wherever a tracked entity is created, updated, or deleted its timestamp must be
//! recorded or removed through [`EtagTimestamps`].
//!
//! If any declared timestamp is missing the whole etag is absent; there is no partial
//! signature.

/// Request-time etag evaluation
pub mod component;
/// Modification timestamp writers
pub mod timestamps;

pub use component::{EtagComponent, EtagOutcome};
pub use timestamps::EtagTimestamps;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use md5::{Digest, Md5};
use std::sync::Arc;

use crate::constants::etag::TIMESTAMP_SEPARATOR;

/// One entity model whose modification timestamp contributes to an etag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtagCacheKey {
    /// Entity model name (e.g. `Schedule`)
    pub model: String,
    /// Parameter names resolved, in order, into the cache key values
    pub keys: Vec<String>,
}

impl EtagCacheKey {
    /// Declare a model and the parameters that locate its timestamp
    #[must_use]
    pub fn new(model: impl Into<String>, keys: &[&str]) -> Self {
        Self {
            model: model.into(),
            keys: keys.iter().map(|key| (*key).to_owned()).collect(),
        }
    }
}

/// Named arguments bound to the intercepted operation
///
/// A name bound to `None` is present but has no value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgValues(Vec<(String, Option<String>)>);

impl ArgValues {
    /// Empty binding set
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Bind a name; the first binding of a name wins on lookup
    pub fn bind(&mut self, name: impl Into<String>, value: Option<String>) {
        self.0.push((name.into(), value));
    }

    /// Builder form of [`ArgValues::bind`]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bind(name, Some(value.into()));
        self
    }

    /// Binding for `name`: `None` when unbound, `Some(None)` when bound without a value
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.0
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value.as_deref())
    }

    /// Bind the matched route's path parameters
    ///
    /// Query string pairs are never bound, so client input cannot stand in for a
    /// session identity field.
    #[must_use]
    pub fn from_path_params<'a>(
        path_params: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut args = Self::new();
        for (name, value) in path_params {
            args.bind(name, Some(value.to_owned()));
        }
        args
    }
}

/// Per-request inputs to etag evaluation
#[derive(Debug, Clone)]
pub struct EtagContext {
    cache_keys: Arc<[EtagCacheKey]>,
    args: ArgValues,
}

impl EtagContext {
    /// Pair declared cache keys with the request's argument bindings
    #[must_use]
    pub const fn new(cache_keys: Arc<[EtagCacheKey]>, args: ArgValues) -> Self {
        Self { cache_keys, args }
    }

    /// Declared cache keys in declaration order
    #[must_use]
    pub fn cache_keys(&self) -> &[EtagCacheKey] {
        &self.cache_keys
    }

    /// Argument bindings of the request
    #[must_use]
    pub const fn args(&self) -> &ArgValues {
        &self.args
    }
}

/// Canonical form of a timestamp: UTC ISO 8601 with millisecond precision
#[must_use]
pub fn canonical_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    timestamp
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Lowercase hex MD5 of the space-joined canonical timestamps
#[must_use]
pub fn signature<Tz: TimeZone>(timestamps: &[DateTime<Tz>]) -> String {
    let base = timestamps
        .iter()
        .map(canonical_timestamp)
        .collect::<Vec<_>>()
        .join(TIMESTAMP_SEPARATOR);
    hex::encode(Md5::digest(base.as_bytes()))
}
