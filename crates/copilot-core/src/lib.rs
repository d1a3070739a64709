// ABOUTME: Core types and constants for the Fitness Copilot brain
// ABOUTME: Foundation crate with error handling, action wire models, and domain constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Copilot Core
//!
//! Foundation crate providing shared types and constants for the Fitness Copilot
//! decision engine. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ConfirmRejection`
//! - **constants**: Defaults, caps, timeouts and unit conversion factors
//! - **models**: The `Action` tagged union, its payloads, and chat message types

/// Unified error handling system with standard error codes
pub mod errors;

/// Domain constants organized by concern
pub mod constants;

/// Wire models shared by the engine and its calling layer
pub mod models;
