// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Provides the provider client and the short-budget client used to fetch images
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

use copilot_core::constants::timeouts;

/// Global shared HTTP client used for generative provider calls
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or create the shared HTTP client with default settings
///
/// Per-call budgets are enforced by the caller with `tokio::time::timeout`;
/// the client-level timeout only bounds runaway connections.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        create_client_with_timeout(timeouts::IMAGE_ANALYSIS_SECS * 2, timeouts::IMAGE_FETCH_SECS)
    })
}

/// Create a new HTTP client with custom timeout settings
///
/// Falls back to a default client if the builder fails.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Create a client for downloading user images referenced by URL
#[must_use]
pub fn image_fetch_client() -> Client {
    create_client_with_timeout(timeouts::IMAGE_FETCH_SECS, timeouts::IMAGE_FETCH_SECS)
}
