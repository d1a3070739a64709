// ABOUTME: Narrow read-only data-access contract the context builder consumes
// ABOUTME: Every query is scoped by user or program identity and by simulated day where relevant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;

use async_trait::async_trait;
use uuid::Uuid;

use copilot_core::models::{ChatTurn, ExerciseLogItem, MealPlanItem, Profile, RoutineItem};

use crate::errors::AppResult;

/// Calories and protein logged for one simulated day
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroTotals {
    /// Energy in kcal
    pub calories: u32,
    /// Protein in grams
    pub protein_g: f64,
}

/// Read access to persisted fitness data
///
/// Implementations own persistence; the engine never writes through this trait.
#[async_trait]
pub trait FitnessDataSource: Send + Sync {
    /// Profile of `user_id`, `None` if the user is unknown
    async fn get_user_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>>;

    /// Calories and protein logged by `user_id` for `day`
    async fn sum_logged_macros(&self, user_id: Uuid, day: u8) -> AppResult<MacroTotals>;

    /// Meal plan entries of `user_id` for `day`
    async fn get_scheduled_meals(&self, user_id: Uuid, day: u8) -> AppResult<Vec<MealPlanItem>>;

    /// Routine entries of `program_id` for `day`
    async fn get_scheduled_exercises(
        &self,
        program_id: Uuid,
        day: u8,
    ) -> AppResult<Vec<RoutineItem>>;

    /// Distinct exercise names across every day of `program_id`
    async fn get_all_program_exercise_names(&self, program_id: Uuid)
        -> AppResult<BTreeSet<String>>;

    /// Exercises `user_id` logged for `day`
    async fn get_completed_exercises(
        &self,
        user_id: Uuid,
        day: u8,
    ) -> AppResult<Vec<ExerciseLogItem>>;

    /// Most recent `limit` chat entries of `user_id`, oldest first, role and text only
    async fn get_recent_chat_messages(&self, user_id: Uuid, limit: usize)
        -> AppResult<Vec<ChatTurn>>;
}
