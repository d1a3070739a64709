// ABOUTME: Utility modules shared across the copilot: HTTP clients and text helpers
// ABOUTME: Small, dependency-light helpers with no domain state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// HTTP client configuration and helpers
pub mod http_client;
/// Text casing and number formatting helpers
pub mod text;
