// ABOUTME: Prompt templates loaded at compile time and rendered from the user context
// ABOUTME: Exercise extraction, coach chat, image classification and image analysis prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! Templates live next to this module as markdown files so they can be
//! edited without touching code. Placeholders are `{name}` tokens filled in a
//! single pass by [`render`]; braces that do not name a supplied value (JSON
//! examples) are left as written, and substituted values are never re-scanned.

use crate::context::UserContext;
use crate::utils::text::{humanize, percent_of, title_case};
use copilot_core::constants::history;

const EXERCISE_EXTRACTION_TEMPLATE: &str = include_str!("exercise_extraction.md");
const COACH_SYSTEM_TEMPLATE: &str = include_str!("coach_system.md");
const COACH_FALLBACK_PROMPT: &str = include_str!("coach_fallback.md");
const VISION_CONTEXT_TEMPLATE: &str = include_str!("vision_context.md");
const GYM_ANALYSIS_TEMPLATE: &str = include_str!("gym_analysis.md");
const FOOD_ANALYSIS_TEMPLATE: &str = include_str!("food_analysis.md");

/// Single-word image classification prompt
pub const IMAGE_CLASSIFICATION_PROMPT: &str = include_str!("image_classification.md");

/// Inputs to [`build_exercise_extraction_prompt`]
#[derive(Debug, Clone)]
pub struct ExerciseExtractionContext<'a> {
    /// Raw user message
    pub user_message: &'a str,
    /// Names of today's scheduled exercises
    pub scheduled_exercises: Vec<&'a str>,
    /// No exercises scheduled today
    pub is_rest_day: bool,
}

impl<'a> ExerciseExtractionContext<'a> {
    /// Extraction inputs for `message` against the context's plan
    #[must_use]
    pub fn from_context(user_message: &'a str, context: &'a UserContext) -> Self {
        Self {
            user_message,
            scheduled_exercises: context.scheduled_exercise_names(),
            is_rest_day: context.is_rest_day(),
        }
    }
}

/// Fill `{name}` placeholders in one left-to-right pass
#[must_use]
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// Text prompts
// ============================================================================

/// Prompt asking the model to pull one exercise log out of `ctx.user_message`
#[must_use]
pub fn build_exercise_extraction_prompt(ctx: &ExerciseExtractionContext<'_>) -> String {
    let schedule = if ctx.is_rest_day {
        "TODAY'S SCHEDULE: Rest day - no exercises scheduled.".to_owned()
    } else if ctx.scheduled_exercises.is_empty() {
        "TODAY'S SCHEDULE: No training plan available.".to_owned()
    } else {
        format!(
            "TODAY'S SCHEDULED EXERCISES: {}",
            ctx.scheduled_exercises.join(", ")
        )
    };

    render(
        EXERCISE_EXTRACTION_TEMPLATE.trim_end(),
        &[("schedule", &schedule), ("message", ctx.user_message)],
    )
}

/// Coach persona grounded in the full user context
#[must_use]
pub fn build_system_prompt(context: &UserContext) -> String {
    let meals = if context.scheduled_meals.is_empty() {
        "  No meal plan for today".to_owned()
    } else {
        context
            .scheduled_meals
            .iter()
            .map(|meal| {
                format!(
                    "  - {}: {} ({} kcal, {}g protein)",
                    meal.meal_type, meal.item_name, meal.calories, meal.protein_g
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let exercises = if context.scheduled_exercises.is_empty() {
        "  Rest day - no exercises scheduled".to_owned()
    } else {
        context
            .scheduled_exercises
            .iter()
            .map(|item| {
                let done = context.completed_sets(&item.exercise_name);
                let status = if done > 0 {
                    format!("({done}/{} sets done)", item.sets)
                } else {
                    "(not started)".to_owned()
                };
                format!(
                    "  - {}: {}x{} @ {}kg {status}",
                    item.exercise_name, item.sets, item.reps, item.target_load_kg
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let completed = if context.completed_exercises.is_empty() {
        "  No exercises logged yet".to_owned()
    } else {
        context
            .completed_exercises
            .iter()
            .map(|log| {
                format!(
                    "  - {}: {} sets x {} reps @ {}kg",
                    log.exercise_name, log.sets, log.reps, log.weight_kg
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let goal = context.goal_method.as_str();
    render(
        COACH_SYSTEM_TEMPLATE,
        &[
            ("goal_title", &humanize(goal)),
            ("weight", &context.weight_kg.to_string()),
            ("height", &context.height_cm.to_string()),
            ("activity_title", &humanize(context.activity_level.as_str())),
            ("sex", &context.sex),
            ("day", context.simulated_day_name()),
            ("calories_consumed", &context.calories_consumed.to_string()),
            ("calories_target", &context.calories_target.to_string()),
            ("calories_pct", &calorie_pct(context).to_string()),
            ("protein_consumed", &format!("{:.0}", context.protein_consumed)),
            ("protein_target", &format!("{:.0}", context.protein_target)),
            ("protein_pct", &protein_pct(context).to_string()),
            ("workouts", &context.workouts_completed.to_string()),
            ("meals", &meals),
            ("exercises", &exercises),
            ("completed", &completed),
            ("history", &recent_history_lines(context)),
            ("goal", goal),
        ],
    )
}

/// Minimal coach persona used when no context is available
#[must_use]
pub fn build_fallback_system_prompt() -> &'static str {
    COACH_FALLBACK_PROMPT.trim_end()
}

/// Complete free-text conversation prompt for `content`
#[must_use]
pub fn build_general_chat_prompt(context: Option<&UserContext>, content: &str) -> String {
    let system = context.map_or_else(
        || build_fallback_system_prompt().to_owned(),
        build_system_prompt,
    );
    format!("{system}\n\nUser message: {content}\n\nAssistant:")
}

// ============================================================================
// Image prompts
// ============================================================================

/// Compact user context embedded in image analysis prompts
#[must_use]
pub fn build_vision_system_context(context: &UserContext) -> String {
    let meals = join_or(
        context.scheduled_meals.iter().map(|meal| {
            format!(
                "- {}: {} ({} kcal)",
                title_case(&meal.meal_type),
                meal.item_name,
                meal.calories
            )
        }),
        "No meals scheduled today.",
    );

    let exercises = join_or(
        context.scheduled_exercises.iter().map(|item| {
            format!(
                "- {}: {}x{} @ {}kg",
                item.exercise_name, item.sets, item.reps, item.target_load_kg
            )
        }),
        "No exercises scheduled today.",
    );

    let allowed = if context.allowed_exercise_names.is_empty() {
        "Any exercise".to_owned()
    } else {
        context.allowed_exercise_names.join(", ")
    };

    let history_lines = recent_history_lines(context);

    render(
        VISION_CONTEXT_TEMPLATE.trim_end(),
        &[
            ("goal", context.goal_method.as_str()),
            ("weight", &context.weight_kg.to_string()),
            ("height", &context.height_cm.to_string()),
            ("activity", context.activity_level.as_str()),
            ("sex", &context.sex),
            ("day", context.simulated_day_name()),
            ("calories_consumed", &context.calories_consumed.to_string()),
            ("calories_target", &context.calories_target.to_string()),
            ("calories_pct", &calorie_pct(context).to_string()),
            ("protein_consumed", &context.protein_consumed.to_string()),
            ("protein_target", &context.protein_target.to_string()),
            ("protein_pct", &protein_pct(context).to_string()),
            ("workouts", &context.workouts_completed.to_string()),
            ("meals", &meals),
            ("exercises", &exercises),
            ("allowed", &allowed),
            ("history", &history_lines),
        ],
    )
}

/// Gym equipment analysis prompt requesting strict JSON
#[must_use]
pub fn build_gym_analysis_prompt(system_context: &str) -> String {
    render(GYM_ANALYSIS_TEMPLATE.trim_end(), &[("context", system_context)])
}

/// Food photo analysis prompt requesting strict JSON
#[must_use]
pub fn build_food_analysis_prompt(system_context: &str) -> String {
    render(FOOD_ANALYSIS_TEMPLATE.trim_end(), &[("context", system_context)])
}

/// Last few sanitized turns, one `ROLE: text` line each
fn recent_history_lines(context: &UserContext) -> String {
    join_or(
        context
            .recent_history(history::PROMPT_TAIL)
            .iter()
            .map(|turn| format!("{}: {}", turn.role.as_str().to_uppercase(), turn.content)),
        "No recent messages.",
    )
}

fn calorie_pct(context: &UserContext) -> i64 {
    percent_of(
        f64::from(context.calories_consumed),
        f64::from(context.calories_target),
    )
}

fn protein_pct(context: &UserContext) -> i64 {
    percent_of(context.protein_consumed, context.protein_target)
}

fn join_or(lines: impl Iterator<Item = String>, empty: &str) -> String {
    let lines: Vec<String> = lines.collect();
    if lines.is_empty() {
        empty.to_owned()
    } else {
        lines.join("\n")
    }
}
