// ABOUTME: Re-exports the unified error type from bridge-core
// ABOUTME: AppError, ErrorCode, and the JSON error response rendered by axum handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use bridge_core::errors::*;
