// ABOUTME: Re-exports shared constants from bridge-core
// ABOUTME: Header names, cache key layout, etag field names, and configuration defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use bridge_core::constants::*;
