// ABOUTME: Main library entry point for the Fitness Copilot decision engine
// ABOUTME: Turns one chat message plus a user context snapshot into one structured action
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Fitness Copilot
//!
//! A conversation-to-action engine for food and training logs. Each inbound
//! chat message is classified into exactly one action (log food, log
//! exercise, propose from an image, reset the day, or nothing) together with
//! a confirmation text that reports progress against the day's targets.
//!
//! ## Tiers
//!
//! - **Deterministic**: trigger words, a longest-match food lexicon and
//!   exercise aliases with regex number extraction
//! - **Generative**: an optional model-backed extractor for exercise
//!   reports, general conversation and image analysis, always bounded by a
//!   timeout and never required for a valid answer
//!
//! ## Architecture
//!
//! - **Context**: read-only snapshot of targets, progress, plan and history
//! - **Brain**: matcher, vision analysis, reply composer and the engine
//! - **LLM**: provider abstraction, Gemini client, JSON salvage and prompts
//! - **Store / Services**: persistence and the chat round trip around the engine
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fitness_copilot::brain::ActionEngine;
//! use fitness_copilot::services::{ChatService, MessageInput};
//! use fitness_copilot::store::InMemoryStore;
//! use fitness_copilot::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let service = ChatService::new(Arc::new(InMemoryStore::new()), ActionEngine::default());
//!     let exchange = service
//!         .send_message(uuid::Uuid::new_v4(), MessageInput::text("I ate a banana"))
//!         .await?;
//!     println!("{}", exchange.assistant_message.content);
//!     Ok(())
//! }
//! ```

/// Action decision engine, deterministic matcher, vision analysis and replies
pub mod brain;

/// Environment-driven engine configuration
pub mod config;

/// User context snapshot, data-access contract and history sanitation
pub mod context;

/// Daily energy and protein target calculation
pub mod intelligence;

/// Food, exercise and trigger word tables
pub mod lexicon;

/// Generative provider abstraction, Gemini client, prompts and JSON salvage
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Chat round trips around the engine
pub mod services;

/// Persistence contract and the in-memory store
pub mod store;

/// Text and HTTP client helpers
pub mod utils;

pub use copilot_core::{constants, errors, models};
