// ABOUTME: DashMap-backed in-process store for tests, benches and the CLI
// ABOUTME: Clone shares the same maps so one store can serve many concurrent tasks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use copilot_core::errors::ConfirmRejection;
use copilot_core::models::{
    Action, ChatMessageRecord, ChatTurn, ExerciseLog, ExerciseLogItem, MealLog, MealPlanItem,
    Profile, RoutineItem,
};

use super::{ClearedLogs, CreatedLog, FitnessStore};
use crate::context::{FitnessDataSource, MacroTotals};
use crate::errors::AppResult;

/// In-memory fitness store
///
/// Programs are shared templates keyed by program id; everything else is
/// keyed by user id.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    profiles: Arc<DashMap<Uuid, Profile>>,
    meal_plans: Arc<DashMap<Uuid, Vec<MealPlanItem>>>,
    routines: Arc<DashMap<Uuid, Vec<RoutineItem>>>,
    meal_logs: Arc<DashMap<Uuid, Vec<MealLog>>>,
    exercise_logs: Arc<DashMap<Uuid, Vec<ExerciseLog>>>,
    messages: Arc<DashMap<Uuid, ChatMessageRecord>>,
    message_order: Arc<DashMap<Uuid, Vec<Uuid>>>,
}

impl InMemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile
    pub fn upsert_profile(&self, profile: Profile) {
        self.profiles.insert(profile.user_id, profile);
    }

    /// Replace the weekly meal plan of `user_id`
    pub fn set_meal_plan(&self, user_id: Uuid, items: Vec<MealPlanItem>) {
        self.meal_plans.insert(user_id, items);
    }

    /// Replace the weekly routine of `program_id`
    pub fn set_routine(&self, program_id: Uuid, items: Vec<RoutineItem>) {
        self.routines.insert(program_id, items);
    }

    /// Number of chat entries stored for `user_id`
    #[must_use]
    pub fn message_count(&self, user_id: Uuid) -> usize {
        self.message_order.get(&user_id).map_or(0, |ids| ids.len())
    }

    fn day_filtered<T: Clone>(
        map: &DashMap<Uuid, Vec<T>>,
        key: Uuid,
        keep: impl Fn(&T) -> bool,
    ) -> Vec<T> {
        map.get(&key)
            .map(|items| items.iter().filter(|item| keep(item)).cloned().collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("profiles", &self.profiles.len())
            .field("programs", &self.routines.len())
            .field("messages", &self.messages.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FitnessDataSource for InMemoryStore {
    async fn get_user_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        Ok(self.profiles.get(&user_id).map(|p| p.clone()))
    }

    async fn sum_logged_macros(&self, user_id: Uuid, day: u8) -> AppResult<MacroTotals> {
        let totals = self.meal_logs.get(&user_id).map_or_else(MacroTotals::default, |logs| {
            logs.iter()
                .filter(|log| log.simulated_day == day)
                .fold(MacroTotals::default(), |acc, log| MacroTotals {
                    calories: acc.calories.saturating_add(log.calories),
                    protein_g: acc.protein_g + log.protein_g,
                })
        });
        Ok(totals)
    }

    async fn get_scheduled_meals(&self, user_id: Uuid, day: u8) -> AppResult<Vec<MealPlanItem>> {
        Ok(Self::day_filtered(&self.meal_plans, user_id, |item| {
            item.day_of_week == day
        }))
    }

    async fn get_scheduled_exercises(
        &self,
        program_id: Uuid,
        day: u8,
    ) -> AppResult<Vec<RoutineItem>> {
        Ok(Self::day_filtered(&self.routines, program_id, |item| {
            item.day_of_week == day
        }))
    }

    async fn get_all_program_exercise_names(
        &self,
        program_id: Uuid,
    ) -> AppResult<BTreeSet<String>> {
        Ok(self
            .routines
            .get(&program_id)
            .map(|items| items.iter().map(|i| i.exercise_name.clone()).collect())
            .unwrap_or_default())
    }

    async fn get_completed_exercises(
        &self,
        user_id: Uuid,
        day: u8,
    ) -> AppResult<Vec<ExerciseLogItem>> {
        Ok(
            Self::day_filtered(&self.exercise_logs, user_id, |log| log.simulated_day == day)
                .iter()
                .map(ExerciseLog::to_item)
                .collect(),
        )
    }

    async fn get_recent_chat_messages(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> AppResult<Vec<ChatTurn>> {
        let Some(order) = self.message_order.get(&user_id) else {
            return Ok(Vec::new());
        };
        let start = order.len().saturating_sub(limit);
        Ok(order[start..]
            .iter()
            .filter_map(|id| self.messages.get(id).map(|m| m.to_turn()))
            .collect())
    }
}

#[async_trait]
impl FitnessStore for InMemoryStore {
    async fn save_chat_message(&self, message: &ChatMessageRecord) -> AppResult<()> {
        self.messages.insert(message.id, message.clone());
        self.message_order
            .entry(message.user_id)
            .or_default()
            .push(message.id);
        Ok(())
    }

    async fn get_chat_message(&self, message_id: Uuid) -> AppResult<Option<ChatMessageRecord>> {
        Ok(self.messages.get(&message_id).map(|m| m.clone()))
    }

    async fn delete_chat_messages(&self, user_id: Uuid) -> AppResult<usize> {
        let Some((_, ids)) = self.message_order.remove(&user_id) else {
            return Ok(0);
        };
        for id in &ids {
            self.messages.remove(id);
        }
        Ok(ids.len())
    }

    async fn save_meal_log(&self, log: &MealLog) -> AppResult<()> {
        self.meal_logs
            .entry(log.user_id)
            .or_default()
            .push(log.clone());
        Ok(())
    }

    async fn save_exercise_log(&self, log: &ExerciseLog) -> AppResult<()> {
        self.exercise_logs
            .entry(log.user_id)
            .or_default()
            .push(log.clone());
        Ok(())
    }

    async fn get_meal_logs(&self, user_id: Uuid, day: u8) -> AppResult<Vec<MealLog>> {
        Ok(Self::day_filtered(&self.meal_logs, user_id, |log| {
            log.simulated_day == day
        }))
    }

    async fn get_exercise_logs(&self, user_id: Uuid, day: u8) -> AppResult<Vec<ExerciseLog>> {
        Ok(Self::day_filtered(&self.exercise_logs, user_id, |log| {
            log.simulated_day == day
        }))
    }

    async fn delete_day_logs(&self, user_id: Uuid, day: u8) -> AppResult<ClearedLogs> {
        let mut cleared = ClearedLogs::default();
        if let Some(mut logs) = self.meal_logs.get_mut(&user_id) {
            let before = logs.len();
            logs.retain(|log| log.simulated_day != day);
            cleared.meals = before - logs.len();
        }
        if let Some(mut logs) = self.exercise_logs.get_mut(&user_id) {
            let before = logs.len();
            logs.retain(|log| log.simulated_day != day);
            cleared.exercises = before - logs.len();
        }
        debug!(%user_id, day, meals = cleared.meals, exercises = cleared.exercises, "cleared day logs");
        Ok(cleared)
    }

    async fn confirm_proposal(
        &self,
        user_id: Uuid,
        message_id: Uuid,
        day: u8,
        logged_at: DateTime<Utc>,
    ) -> AppResult<CreatedLog> {
        // Shard write lock held until the log is stored
        let mut entry = self
            .messages
            .get_mut(&message_id)
            .ok_or(ConfirmRejection::NotFound)?;
        if entry.user_id != user_id {
            return Err(ConfirmRejection::NotOwned.into());
        }
        if !entry.action.is_proposal() {
            return Err(ConfirmRejection::NotAProposal.into());
        }
        if !entry.action.mark_tracked() {
            return Err(ConfirmRejection::AlreadyTracked.into());
        }

        let created = match &entry.action {
            Action::ProposeFood(proposal) => CreatedLog::Meal(MealLog {
                id: Uuid::new_v4(),
                user_id,
                simulated_day: day,
                meal_name: proposal.meal.meal_name.clone(),
                meal_type: proposal.meal.meal_type.clone(),
                calories: proposal.meal.calories,
                protein_g: proposal.meal.protein_g,
                carbs_g: proposal.meal.carbs_g,
                fat_g: proposal.meal.fat_g,
                logged_at,
            }),
            Action::ProposeExercise(proposal) => CreatedLog::Exercise(ExerciseLog {
                id: Uuid::new_v4(),
                user_id,
                simulated_day: day,
                exercise_name: proposal.exercise.exercise_name.clone(),
                sets: proposal.exercise.sets,
                reps: proposal.exercise.reps,
                weight_kg: proposal.exercise.weight_kg,
                logged_at,
            }),
            _ => return Err(ConfirmRejection::NotAProposal.into()),
        };

        match &created {
            CreatedLog::Meal(log) => self
                .meal_logs
                .entry(user_id)
                .or_default()
                .push(log.clone()),
            CreatedLog::Exercise(log) => self
                .exercise_logs
                .entry(user_id)
                .or_default()
                .push(log.clone()),
        }
        drop(entry);

        Ok(created)
    }

    async fn set_simulated_day(&self, user_id: Uuid, day: u8) -> AppResult<()> {
        self.profiles
            .entry(user_id)
            .or_insert_with(|| Profile::empty(user_id))
            .simulated_day = day;
        Ok(())
    }
}
