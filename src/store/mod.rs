// ABOUTME: Persistence contract for chat messages, logs and proposal confirmation
// ABOUTME: Extends the read-only context source with the writes the calling layer performs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Fitness Store
//!
//! [`FitnessStore`] is the write side of persistence. The decision engine only
//! ever reads through [`FitnessDataSource`]; the chat service owns every write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use copilot_core::models::{ChatMessageRecord, ExerciseLog, MealLog};

use crate::context::FitnessDataSource;
use crate::errors::AppResult;

pub mod demo;
mod memory;

pub use demo::{seed_persona, DemoPersona};
pub use memory::InMemoryStore;

/// Log created by confirming a proposal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "log", rename_all = "snake_case")]
pub enum CreatedLog {
    /// Meal log from a food proposal
    Meal(MealLog),
    /// Exercise log from an exercise proposal
    Exercise(ExerciseLog),
}

impl CreatedLog {
    /// Identifier of the created log row
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Meal(log) => log.id,
            Self::Exercise(log) => log.id,
        }
    }
}

/// Number of rows removed by a day reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearedLogs {
    /// Meal logs removed
    pub meals: usize,
    /// Exercise logs removed
    pub exercises: usize,
}

/// Write access to persisted fitness data
///
/// Every operation is scoped by user identity. Implementations must make
/// [`FitnessStore::confirm_proposal`] atomic: a proposal is flipped to tracked
/// and its log created exactly once, however many confirmations race.
#[async_trait]
pub trait FitnessStore: FitnessDataSource {
    // ================================
    // Chat
    // ================================

    /// Persist a chat entry
    async fn save_chat_message(&self, message: &ChatMessageRecord) -> AppResult<()>;

    /// Chat entry by id regardless of owner
    async fn get_chat_message(&self, message_id: Uuid) -> AppResult<Option<ChatMessageRecord>>;

    /// Remove every chat entry of `user_id`, returning how many were removed
    async fn delete_chat_messages(&self, user_id: Uuid) -> AppResult<usize>;

    // ================================
    // Logs
    // ================================

    /// Persist a meal log
    async fn save_meal_log(&self, log: &MealLog) -> AppResult<()>;

    /// Persist an exercise log
    async fn save_exercise_log(&self, log: &ExerciseLog) -> AppResult<()>;

    /// Meal logs of `user_id` for `day`, oldest first
    async fn get_meal_logs(&self, user_id: Uuid, day: u8) -> AppResult<Vec<MealLog>>;

    /// Exercise logs of `user_id` for `day`, oldest first
    async fn get_exercise_logs(&self, user_id: Uuid, day: u8) -> AppResult<Vec<ExerciseLog>>;

    /// Remove every meal and exercise log of `user_id` for `day`
    async fn delete_day_logs(&self, user_id: Uuid, day: u8) -> AppResult<ClearedLogs>;

    // ================================
    // Proposals and profile
    // ================================

    /// Mark the proposal in `message_id` tracked and create its log
    ///
    /// # Errors
    ///
    /// Fails with a [`copilot_core::errors::ConfirmRejection`] converted into
    /// an `AppError`, checked in order: message missing, owned by another
    /// user, not a proposal, already tracked.
    async fn confirm_proposal(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        day: u8,
        logged_at: DateTime<Utc>,
    ) -> AppResult<CreatedLog>;

    /// Store the simulated day of `user_id`, creating an empty profile if needed
    async fn set_simulated_day(&self, user_id: Uuid, day: u8) -> AppResult<()>;
}
