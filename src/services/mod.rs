// ABOUTME: Service layer that wires the decision engine to persistence
// ABOUTME: Owns every write the engine's decisions imply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer

/// Chat round trips, proposal confirmation and daily progress
pub mod chat;

pub use chat::{AppliedEffect, ChatExchange, ChatService, DailySummary, MessageInput};
