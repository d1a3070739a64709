// ABOUTME: Chat service around the decision engine: persist, decide, apply, persist
// ABOUTME: Also confirms image proposals, reports the daily summary and moves the simulated day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat Service
//!
//! The engine decides; this layer owns every write. One inbound message
//! produces at most one log (or one reset) plus two chat entries.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use copilot_core::constants::week;
use copilot_core::models::{
    Action, AssistantReply, Attachment, AttachmentKind, ChatMessageRecord, ChatRole, ExerciseLog,
    MealLog, Message,
};

use crate::brain::ActionEngine;
use crate::context::{ContextBuilder, FitnessDataSource, HistoryLimits};
use crate::errors::{AppError, AppResult};
use crate::intelligence::{EnergyTargetCalculator, TargetCalculator};
use crate::store::{ClearedLogs, CreatedLog, FitnessStore};

/// Inbound chat request as a client submits it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInput {
    /// Typed text, may be empty for media-only messages
    #[serde(default)]
    pub content: String,
    /// Hosted image
    #[serde(default)]
    pub image_url: Option<String>,
    /// Inline image, base64
    #[serde(default)]
    pub image_base64: Option<String>,
    /// Hosted voice note
    #[serde(default)]
    pub audio_url: Option<String>,
    /// Voice note without a hosted copy
    #[serde(default)]
    pub has_audio: bool,
}

impl MessageInput {
    /// Text-only input
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Engine message; an image wins over audio, inline data over a URL
    #[must_use]
    pub fn into_message(self) -> Message {
        let attachment = if self.image_base64.is_some() || self.image_url.is_some() {
            Attachment {
                kind: AttachmentKind::Image,
                url: self.image_url,
                base64: self.image_base64,
            }
        } else if self.has_audio || self.audio_url.is_some() {
            Attachment::audio(self.audio_url)
        } else {
            Attachment::none()
        };
        Message::with_attachment(self.content, attachment)
    }
}

/// Side effect applied for a decided action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum AppliedEffect {
    /// Log row written
    Logged {
        /// The new row
        log: CreatedLog,
    },
    /// Simulated day cleared
    Cleared {
        /// Rows removed
        cleared: ClearedLogs,
    },
    /// Proposal shown or plain reply
    Nothing,
}

/// Result of one chat round trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatExchange {
    /// Persisted user entry
    pub user_message: ChatMessageRecord,
    /// Persisted assistant entry carrying the action
    pub assistant_message: ChatMessageRecord,
    /// What the action changed
    pub effect: AppliedEffect,
}

impl ChatExchange {
    /// Reply as the engine produced it
    #[must_use]
    pub fn reply(&self) -> AssistantReply {
        AssistantReply::new(
            self.assistant_message.content.clone(),
            self.assistant_message.action.clone(),
        )
    }
}

/// Progress for the simulated day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// Day index, 0 = Monday
    pub simulated_day: u8,
    /// Day display name
    pub day_name: &'static str,
    /// Calories logged
    pub calories_consumed: u32,
    /// Calorie target
    pub calories_target: u32,
    /// Protein logged, grams
    pub protein_consumed: f64,
    /// Protein target, grams
    pub protein_target: f64,
    /// Exercise logs recorded
    pub workouts_completed: usize,
    /// Exercises scheduled
    pub workouts_scheduled: usize,
    /// Meal logs of the day
    pub meals: Vec<MealLog>,
    /// Exercise logs of the day
    pub exercises: Vec<ExerciseLog>,
}

/// Chat service over a store and an engine
pub struct ChatService<S: FitnessStore + 'static> {
    store: Arc<S>,
    engine: ActionEngine,
    context_builder: ContextBuilder,
}

impl<S: FitnessStore + 'static> ChatService<S> {
    /// Service with the default target calculator and history limits
    #[must_use]
    pub fn new(store: Arc<S>, engine: ActionEngine) -> Self {
        Self::with_parts(
            store,
            engine,
            Arc::new(EnergyTargetCalculator),
            HistoryLimits::default(),
        )
    }

    /// Service with an explicit calculator and history limits
    #[must_use]
    pub fn with_parts(
        store: Arc<S>,
        engine: ActionEngine,
        calculator: Arc<dyn TargetCalculator>,
        limits: HistoryLimits,
    ) -> Self {
        let source: Arc<dyn FitnessDataSource> = store.clone();
        let context_builder = ContextBuilder::new(source, calculator).with_history_limits(limits);
        Self {
            store,
            engine,
            context_builder,
        }
    }

    /// Underlying store
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Persist `input`, decide the reply, apply its action and persist the reply
    ///
    /// The context is built after the user entry is stored, so the current
    /// message is part of the history the model sees.
    ///
    /// # Errors
    ///
    /// Returns store errors; the engine itself never fails
    #[instrument(skip(self, input), fields(user_id = %user_id))]
    pub async fn send_message(&self, user_id: Uuid, input: MessageInput) -> AppResult<ChatExchange> {
        let message = input.into_message();
        let user_message = ChatMessageRecord {
            id: Uuid::new_v4(),
            user_id,
            role: ChatRole::User,
            content: message.content.clone(),
            attachment: message.attachment.clone(),
            action: Action::None,
            created_at: Utc::now(),
        };
        self.store.save_chat_message(&user_message).await?;

        let context = self.context_builder.build(user_id).await;
        let reply = self.engine.decide(&message, &context).await;
        let effect = self
            .apply_action(user_id, context.simulated_day, &reply.action)
            .await?;

        let assistant_message = ChatMessageRecord {
            id: Uuid::new_v4(),
            user_id,
            role: ChatRole::Assistant,
            content: reply.content,
            attachment: Attachment::none(),
            action: reply.action,
            created_at: Utc::now(),
        };
        self.store.save_chat_message(&assistant_message).await?;

        Ok(ChatExchange {
            user_message,
            assistant_message,
            effect,
        })
    }

    async fn apply_action(&self, user_id: Uuid, day: u8, action: &Action) -> AppResult<AppliedEffect> {
        let logged_at = Utc::now();
        match action {
            Action::LogFood(payload) => {
                let log = MealLog {
                    id: Uuid::new_v4(),
                    user_id,
                    simulated_day: day,
                    meal_name: payload.meal.meal_name.clone(),
                    meal_type: payload.meal.meal_type.clone(),
                    calories: payload.meal.calories,
                    protein_g: payload.meal.protein_g,
                    carbs_g: payload.meal.carbs_g,
                    fat_g: payload.meal.fat_g,
                    logged_at,
                };
                self.store.save_meal_log(&log).await?;
                info!(%user_id, meal = %log.meal_name, calories = log.calories, "meal logged");
                Ok(AppliedEffect::Logged {
                    log: CreatedLog::Meal(log),
                })
            }
            Action::LogExercise(payload) => {
                let log = ExerciseLog {
                    id: Uuid::new_v4(),
                    user_id,
                    simulated_day: day,
                    exercise_name: payload.exercise_name.clone(),
                    sets: payload.sets,
                    reps: payload.reps,
                    weight_kg: payload.weight_kg,
                    logged_at,
                };
                self.store.save_exercise_log(&log).await?;
                info!(%user_id, exercise = %log.exercise_name, "exercise logged");
                Ok(AppliedEffect::Logged {
                    log: CreatedLog::Exercise(log),
                })
            }
            Action::Reset => {
                let cleared = self.store.delete_day_logs(user_id, day).await?;
                info!(%user_id, day, meals = cleared.meals, exercises = cleared.exercises, "day reset");
                Ok(AppliedEffect::Cleared { cleared })
            }
            Action::ProposeFood(_) | Action::ProposeExercise(_) | Action::None => {
                Ok(AppliedEffect::Nothing)
            }
        }
    }

    /// Turn the proposal in `message_id` into a log
    ///
    /// # Errors
    ///
    /// Returns not-found when the message is missing or owned by another
    /// user, invalid-input when it is not a proposal or is already tracked
    #[instrument(skip(self), fields(user_id = %user_id, message_id = %message_id))]
    pub async fn confirm_action(&self, user_id: Uuid, message_id: Uuid) -> AppResult<CreatedLog> {
        let day = self.current_day(user_id).await?;
        let created = self
            .store
            .confirm_proposal(user_id, message_id, day, Utc::now())
            .await?;
        info!(log_id = %created.id(), "proposal confirmed");
        Ok(created)
    }

    /// Progress against targets for the simulated day
    ///
    /// # Errors
    ///
    /// Returns store errors while reading the day's logs
    pub async fn daily_summary(&self, user_id: Uuid) -> AppResult<DailySummary> {
        let context = self.context_builder.build(user_id).await;
        let day = context.simulated_day;
        let meals = self.store.get_meal_logs(user_id, day).await?;
        let exercises = self.store.get_exercise_logs(user_id, day).await?;

        Ok(DailySummary {
            simulated_day: day,
            day_name: context.simulated_day_name(),
            calories_consumed: context.calories_consumed,
            calories_target: context.calories_target,
            protein_consumed: context.protein_consumed,
            protein_target: context.protein_target,
            workouts_completed: exercises.len(),
            workouts_scheduled: context.scheduled_exercises.len(),
            meals,
            exercises,
        })
    }

    /// Move the simulated day of `user_id`
    ///
    /// # Errors
    ///
    /// Returns invalid-input for a day outside 0 to 6
    pub async fn set_simulated_day(&self, user_id: Uuid, day: u8) -> AppResult<()> {
        if day > week::MAX_DAY_INDEX {
            return Err(AppError::invalid_input(format!(
                "simulated day must be between 0 and {}, got {day}",
                week::MAX_DAY_INDEX
            )));
        }
        self.store.set_simulated_day(user_id, day).await?;
        info!(%user_id, day, "simulated day changed");
        Ok(())
    }

    /// Delete the whole chat history of `user_id`
    ///
    /// # Errors
    ///
    /// Returns store errors
    pub async fn clear_history(&self, user_id: Uuid) -> AppResult<usize> {
        let count = self.store.delete_chat_messages(user_id).await?;
        info!(%user_id, count, "chat history cleared");
        Ok(count)
    }

    async fn current_day(&self, user_id: Uuid) -> AppResult<u8> {
        Ok(self
            .store
            .get_user_profile(user_id)
            .await?
            .map_or(0, |profile| profile.simulated_day.min(week::MAX_DAY_INDEX)))
    }
}

impl<S: FitnessStore + 'static> std::fmt::Debug for ChatService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}
