// ABOUTME: Per-request user context snapshot and the read-only builder that assembles it
// ABOUTME: Targets, progress, simulated-day plan, program exercise list and bounded chat history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Context Snapshot
//!
//! [`ContextBuilder::build`] never fails and never writes. Each missing or
//! failing piece is replaced by a documented default:
//!
//! | Piece | Default |
//! |---|---|
//! | profile | weight 70 kg, height 170 cm, maintenance, moderately active, sex "unknown", Monday |
//! | targets | meal-plan sum, else calculator, else 2000 kcal / 150 g protein |
//! | program | no scheduled exercises (rest day), empty allowed list |
//! | logs, history | empty |
//!
//! Chat history is capped by entry count and total characters, sanitized of
//! attachment URLs and base64 payloads, and never truncated mid-message.

pub mod redaction;
mod source;

pub use source::{FitnessDataSource, MacroTotals};

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use copilot_core::constants::{history, profile_defaults, target_defaults, week};
use copilot_core::models::{
    ActivityLevel, ChatTurn, ExerciseLogItem, GoalMethod, MealPlanItem, Profile, RoutineItem,
};

use crate::errors::AppResult;
use crate::intelligence::targets::TargetCalculator;
use redaction::{sanitize_history_text, RedactionConfig};

// ============================================================================
// UserContext
// ============================================================================

/// Everything the engine and prompts know about a user for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserContext {
    /// Owning user
    pub user_id: Uuid,
    /// Goal method
    pub goal_method: GoalMethod,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Sex label, "unknown" when not recorded
    pub sex: String,
    /// Calories logged for the simulated day
    pub calories_consumed: u32,
    /// Calorie target for the simulated day
    pub calories_target: u32,
    /// Protein logged for the simulated day, grams
    pub protein_consumed: f64,
    /// Protein target for the simulated day, grams
    pub protein_target: f64,
    /// Exercise logs recorded for the simulated day
    pub workouts_completed: usize,
    /// Meal plan entries for the simulated day
    pub scheduled_meals: Vec<MealPlanItem>,
    /// Routine entries for the simulated day; empty on a rest day
    pub scheduled_exercises: Vec<RoutineItem>,
    /// Exercises logged for the simulated day
    pub completed_exercises: Vec<ExerciseLogItem>,
    /// Every exercise name in the selected program, sorted and deduplicated
    pub allowed_exercise_names: Vec<String>,
    /// Recent chat, oldest first, role and sanitized text only
    pub chat_history: Vec<ChatTurn>,
    /// Day treated as "today", 0 = Monday
    pub simulated_day: u8,
}

impl UserContext {
    /// Safe defaults for an unknown user
    #[must_use]
    pub fn defaults(user_id: Uuid) -> Self {
        Self {
            user_id,
            goal_method: GoalMethod::Maintenance,
            weight_kg: profile_defaults::WEIGHT_KG,
            height_cm: profile_defaults::HEIGHT_CM,
            activity_level: ActivityLevel::ModeratelyActive,
            sex: profile_defaults::SEX.to_owned(),
            calories_consumed: 0,
            calories_target: target_defaults::CALORIES,
            protein_consumed: 0.0,
            protein_target: target_defaults::PROTEIN_G,
            workouts_completed: 0,
            scheduled_meals: Vec::new(),
            scheduled_exercises: Vec::new(),
            completed_exercises: Vec::new(),
            allowed_exercise_names: Vec::new(),
            chat_history: Vec::new(),
            simulated_day: 0,
        }
    }

    /// Display name of the simulated day
    #[must_use]
    pub fn simulated_day_name(&self) -> &'static str {
        week::DAY_NAMES
            .get(usize::from(self.simulated_day))
            .copied()
            .unwrap_or("Unknown")
    }

    /// No exercises scheduled for the simulated day
    #[must_use]
    pub fn is_rest_day(&self) -> bool {
        self.scheduled_exercises.is_empty()
    }

    /// Names of the simulated day's scheduled exercises, in plan order
    #[must_use]
    pub fn scheduled_exercise_names(&self) -> Vec<&str> {
        self.scheduled_exercises
            .iter()
            .map(|item| item.exercise_name.as_str())
            .collect()
    }

    /// Case-insensitive membership in the simulated day's plan
    #[must_use]
    pub fn is_scheduled(&self, exercise_name: &str) -> bool {
        self.scheduled_exercises
            .iter()
            .any(|item| item.exercise_name.eq_ignore_ascii_case(exercise_name))
    }

    /// Case-insensitive membership in the program's exercise list
    #[must_use]
    pub fn is_allowed(&self, exercise_name: &str) -> bool {
        self.allowed_exercise_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(exercise_name))
    }

    /// Sets logged so far for `exercise_name` on the simulated day
    #[must_use]
    pub fn completed_sets(&self, exercise_name: &str) -> u32 {
        self.completed_exercises
            .iter()
            .filter(|log| log.exercise_name.eq_ignore_ascii_case(exercise_name))
            .map(|log| log.sets)
            .sum()
    }

    /// Last `count` history turns
    #[must_use]
    pub fn recent_history(&self, count: usize) -> &[ChatTurn] {
        let start = self.chat_history.len().saturating_sub(count);
        &self.chat_history[start..]
    }

    /// Total characters across history entries
    #[must_use]
    pub fn history_chars(&self) -> usize {
        self.chat_history
            .iter()
            .map(|turn| turn.content.chars().count())
            .sum()
    }
}

// ============================================================================
// ContextBuilder
// ============================================================================

/// Caps applied to chat history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    /// Maximum entries
    pub max_messages: usize,
    /// Maximum cumulative characters
    pub max_chars: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            max_messages: history::MAX_MESSAGES,
            max_chars: history::MAX_CHARS,
        }
    }
}

/// Assembles [`UserContext`] snapshots from a data source
#[derive(Clone)]
pub struct ContextBuilder {
    source: Arc<dyn FitnessDataSource>,
    calculator: Arc<dyn TargetCalculator>,
    limits: HistoryLimits,
    redaction: RedactionConfig,
}

impl ContextBuilder {
    /// Builder over `source`, computing fallback targets with `calculator`
    #[must_use]
    pub fn new(source: Arc<dyn FitnessDataSource>, calculator: Arc<dyn TargetCalculator>) -> Self {
        Self {
            source,
            calculator,
            limits: HistoryLimits::default(),
            redaction: RedactionConfig::default(),
        }
    }

    /// Override the chat history caps
    #[must_use]
    pub const fn with_history_limits(mut self, limits: HistoryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Snapshot of `user_id` for the profile's simulated day
    #[instrument(skip(self))]
    pub async fn build(&self, user_id: Uuid) -> UserContext {
        let profile = match self.source.get_user_profile(user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                debug!("no profile, using default context");
                return UserContext::defaults(user_id);
            }
            Err(e) => {
                warn!(error = %e, "profile lookup failed, using default context");
                return UserContext::defaults(user_id);
            }
        };

        let day = profile.simulated_day.min(week::MAX_DAY_INDEX);
        let program = profile.selected_program_id;

        // Independent reads, all awaited before any decision is made
        let (macros, meals, completed, history, scheduled, allowed) = tokio::join!(
            self.source.sum_logged_macros(user_id, day),
            self.source.get_scheduled_meals(user_id, day),
            self.source.get_completed_exercises(user_id, day),
            self.source
                .get_recent_chat_messages(user_id, self.limits.max_messages),
            async {
                match program {
                    Some(id) => self.source.get_scheduled_exercises(id, day).await,
                    None => Ok(Vec::new()),
                }
            },
            async {
                match program {
                    Some(id) => self.source.get_all_program_exercise_names(id).await,
                    None => Ok(BTreeSet::new()),
                }
            },
        );

        let macros = or_default(macros, "logged macros");
        let scheduled_meals = or_default(meals, "meal plan");
        let completed_exercises = or_default(completed, "exercise logs");
        let scheduled_exercises = or_default(scheduled, "routine");
        let allowed_exercise_names: Vec<String> =
            or_default(allowed, "program exercises").into_iter().collect();
        let chat_history = self.bound_history(or_default(history, "chat history"));

        let (calories_target, protein_target) = self.resolve_targets(&profile, &scheduled_meals);

        let context = UserContext {
            user_id,
            goal_method: profile.goal_method.unwrap_or_default(),
            weight_kg: profile.weight_kg.unwrap_or(profile_defaults::WEIGHT_KG),
            height_cm: profile.height_cm.unwrap_or(profile_defaults::HEIGHT_CM),
            activity_level: profile.activity_level.unwrap_or_default(),
            sex: profile
                .sex
                .map_or_else(|| profile_defaults::SEX.to_owned(), |sex| sex.as_str().to_owned()),
            calories_consumed: macros.calories,
            calories_target,
            protein_consumed: macros.protein_g.max(0.0),
            protein_target,
            workouts_completed: completed_exercises.len(),
            scheduled_meals,
            scheduled_exercises,
            completed_exercises,
            allowed_exercise_names,
            chat_history,
            simulated_day: day,
        };

        info!(
            day,
            scheduled_exercises = context.scheduled_exercises.len(),
            completed_exercises = context.completed_exercises.len(),
            calories = context.calories_consumed,
            calories_target = context.calories_target,
            history = context.chat_history.len(),
            "built user context"
        );

        context
    }

    /// Meal-plan sum, else calculator, else defaults; never negative
    fn resolve_targets(&self, profile: &Profile, meals: &[MealPlanItem]) -> (u32, f64) {
        if !meals.is_empty() {
            let calories = meals.iter().map(|meal| meal.calories).sum();
            let protein: f64 = meals.iter().map(|meal| meal.protein_g).sum();
            return (calories, protein.max(0.0));
        }

        let computed = self.calculator.compute_targets(profile);
        let calories = computed.map_or(target_defaults::CALORIES, |t| t.calories);
        let protein = computed.map(|t| t.protein_g).unwrap_or_else(|| {
            profile.weight_kg.map_or(target_defaults::PROTEIN_G, |weight| {
                profile.protein_g_per_kg * weight
            })
        });
        (calories, protein.max(0.0))
    }

    /// Sanitize, then keep entries oldest first until the character budget would be exceeded
    fn bound_history(&self, turns: Vec<ChatTurn>) -> Vec<ChatTurn> {
        let mut kept = Vec::with_capacity(turns.len().min(self.limits.max_messages));
        let mut total_chars = 0_usize;

        let start = turns.len().saturating_sub(self.limits.max_messages);
        for turn in turns.into_iter().skip(start) {
            let content = sanitize_history_text(&turn.content, &self.redaction);
            let chars = content.chars().count();
            if total_chars + chars > self.limits.max_chars {
                break;
            }
            total_chars += chars;
            kept.push(ChatTurn {
                role: turn.role,
                content,
            });
        }
        kept
    }
}

impl std::fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

fn or_default<T: Default>(result: AppResult<T>, piece: &'static str) -> T {
    result.unwrap_or_else(|e| {
        warn!(piece, error = %e, "context read failed, substituting default");
        T::default()
    })
}
