// ABOUTME: User-facing reply text with progress feedback computed from the context snapshot
// ABOUTME: Advisory only; composing text never alters the emitted action or its payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use copilot_core::models::{ExercisePayload, MealEntry};

use crate::context::UserContext;
use crate::utils::text::percent_of;

/// Reply for a reset request
pub const RESET_REPLY: &str =
    "🔄 Reset complete! All of today's food and exercise logs have been cleared.";

/// Reply for any audio attachment
pub const AUDIO_REPLY: &str =
    "I heard your voice note! For now, type what you said and I'll log it.";

/// Terminal fallback listing example commands
pub const HELP_REPLY: &str = "I can help you log food and exercises! Try:\n\
     • 'I ate a banana' - to log food\n\
     • 'Did 3 sets of bench at 60kg' - to log exercise\n\
     • 'reset' - to clear today's logs";

/// Image received with no image-capable provider configured
pub const VISION_UNAVAILABLE_REPLY: &str = "I can see you sent an image! For now, please describe what you're showing me and I'll help log it.";

/// Image classified as neither equipment nor food
pub const VISION_UNKNOWN_REPLY: &str =
    "I'm not sure what this image shows. Could you describe it? I can help log food or exercises.";

/// Image analysis failed
pub const VISION_ERROR_REPLY: &str =
    "I had trouble analyzing that image. Could you describe what you're showing me?";

/// Exercise reported on a day with nothing scheduled
pub const REST_DAY_REPLY: &str = "❌ Today is a rest day - no exercises scheduled!";

// ============================================================================
// Food
// ============================================================================

/// `✅ Logged ...` confirmation with the calorie progress clause
#[must_use]
pub fn food_logged(food_name: &str, meal: &MealEntry, context: &UserContext) -> String {
    format!(
        "✅ Logged {food_name}: {} kcal, {}g protein{}",
        meal.calories,
        meal.protein_g,
        food_progress(context, meal.calories)
    )
}

/// Calorie progress after adding `calories` to today's total
#[must_use]
pub fn food_progress(context: &UserContext, calories: u32) -> String {
    let new_total = i64::from(context.calories_consumed) + i64::from(calories);
    let target = i64::from(context.calories_target);
    #[allow(clippy::cast_precision_loss)]
    let pct = percent_of(new_total as f64, target as f64);
    let remaining = target - new_total;

    if remaining > 0 {
        format!(
            "\n\n📊 You're at {pct}% of your calorie target ({remaining} kcal remaining)"
        )
    } else {
        format!("\n\n📊 You've reached {pct}% of your calorie target")
    }
}

// ============================================================================
// Exercise
// ============================================================================

/// `💪 Logged ...` confirmation with the plan progress clause
#[must_use]
pub fn exercise_logged(exercise: &ExercisePayload, context: &UserContext) -> String {
    format!(
        "💪 Logged {}: {}x{}{}{}",
        exercise.exercise_name,
        exercise.sets,
        exercise.reps,
        weight_suffix(exercise.weight_kg),
        exercise_progress(context, &exercise.exercise_name)
    )
}

/// Plan progress clause for logging `exercise_name`
///
/// Remaining counts scheduled exercises with no log today, excluding the one
/// being logged now.
#[must_use]
pub fn exercise_progress(context: &UserContext, exercise_name: &str) -> String {
    if context.is_rest_day() {
        return String::new();
    }

    let total = context.scheduled_exercises.len();
    if !context.is_scheduled(exercise_name) {
        return format!("\n\n💡 Extra work! Today's plan has {total} scheduled exercises");
    }

    let remaining = context
        .scheduled_exercises
        .iter()
        .filter(|item| !item.exercise_name.eq_ignore_ascii_case(exercise_name))
        .filter(|item| context.completed_sets(&item.exercise_name) == 0)
        .count();

    if remaining > 0 {
        format!("\n\n🎯 Part of today's plan! {remaining} exercises remaining")
    } else {
        "\n\n🎯 Part of today's plan! Great job completing your workout!".to_owned()
    }
}

/// Rejection listing today's plan
#[must_use]
pub fn not_in_plan(exercise_name: &str, scheduled: &[&str]) -> String {
    format!(
        "❌ {exercise_name} is not in today's workout plan.\n\nToday's exercises: {}",
        scheduled.join(", ")
    )
}

// ============================================================================
// Proposals
// ============================================================================

/// Preview text for a proposed exercise
#[must_use]
pub fn exercise_proposal(
    exercise: &ExercisePayload,
    in_plan: bool,
    advice: &str,
    outside_program: bool,
) -> String {
    let plan_note = if in_plan { " (from today's plan)" } else { "" };
    let program_note = if outside_program {
        "\n\n⚠️ This exercise isn't part of your current program."
    } else {
        ""
    };
    format!(
        "🏋️ {}{plan_note}\n\n💪 Suggested: {}x{}{}{}{program_note}\n\nClick 'Add to Track' to log this exercise.",
        exercise.exercise_name,
        exercise.sets,
        exercise.reps,
        weight_suffix(exercise.weight_kg),
        advice_block(advice),
    )
}

/// Preview text for a proposed meal
#[must_use]
pub fn food_proposal(meal: &MealEntry, advice: &str) -> String {
    format!(
        "🍽️ {}\n\n📊 {} kcal | {}g protein | {}g carbs | {}g fat{}\n\nClick 'Add to Track' to log this meal.",
        meal.meal_name,
        meal.calories,
        meal.protein_g,
        meal.carbs_g,
        meal.fat_g,
        advice_block(advice),
    )
}

fn weight_suffix(weight_kg: f64) -> String {
    if weight_kg > 0.0 {
        format!(" @ {weight_kg}kg")
    } else {
        String::new()
    }
}

fn advice_block(advice: &str) -> String {
    let advice = advice.trim();
    if advice.is_empty() {
        String::new()
    } else {
        format!("\n\n💡 {advice}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copilot_core::models::{ExerciseLogItem, RoutineItem};
    use uuid::Uuid;

    fn routine(names: &[&str]) -> Vec<RoutineItem> {
        names
            .iter()
            .map(|name| RoutineItem {
                day_of_week: 0,
                exercise_name: (*name).to_owned(),
                sets: 3,
                reps: 10,
                target_load_kg: 40.0,
            })
            .collect()
    }

    fn banana() -> MealEntry {
        MealEntry {
            meal_name: "Banana".into(),
            meal_type: "snack".into(),
            calories: 105,
            protein_g: 1.3,
            carbs_g: 27.0,
            fat_g: 0.4,
        }
    }

    #[test]
    fn test_food_logged_with_remaining() {
        let ctx = UserContext::defaults(Uuid::new_v4());
        let text = food_logged("banana", &banana(), &ctx);
        assert_eq!(
            text,
            "✅ Logged banana: 105 kcal, 1.3g protein\n\n📊 You're at 5% of your calorie target (1895 kcal remaining)"
        );
    }

    #[test]
    fn test_food_progress_target_reached() {
        let mut ctx = UserContext::defaults(Uuid::new_v4());
        ctx.calories_consumed = 1950;
        assert_eq!(
            food_progress(&ctx, 105),
            "\n\n📊 You've reached 102% of your calorie target"
        );
    }

    #[test]
    fn test_food_progress_zero_target() {
        let mut ctx = UserContext::defaults(Uuid::new_v4());
        ctx.calories_target = 0;
        assert!(food_progress(&ctx, 100).contains("reached 0%"));
    }

    #[test]
    fn test_exercise_progress_variants() {
        let mut ctx = UserContext::defaults(Uuid::new_v4());
        assert_eq!(exercise_progress(&ctx, "Bench Press"), "");

        ctx.scheduled_exercises = routine(&["Bench Press", "Barbell Row", "Dips"]);
        assert_eq!(
            exercise_progress(&ctx, "bench press"),
            "\n\n🎯 Part of today's plan! 2 exercises remaining"
        );
        assert_eq!(
            exercise_progress(&ctx, "Bicep Curl"),
            "\n\n💡 Extra work! Today's plan has 3 scheduled exercises"
        );

        ctx.completed_exercises = ["Barbell Row", "Dips"]
            .iter()
            .map(|name| ExerciseLogItem {
                exercise_name: (*name).to_owned(),
                sets: 3,
                reps: 10,
                weight_kg: 0.0,
            })
            .collect();
        assert_eq!(
            exercise_progress(&ctx, "Bench Press"),
            "\n\n🎯 Part of today's plan! Great job completing your workout!"
        );
    }

    #[test]
    fn test_exercise_logged_weight_suffix() {
        let ctx = UserContext::defaults(Uuid::new_v4());
        let mut payload = ExercisePayload {
            exercise_name: "Bench Press".into(),
            sets: 3,
            reps: 10,
            weight_kg: 60.0,
        };
        assert_eq!(exercise_logged(&payload, &ctx), "💪 Logged Bench Press: 3x10 @ 60kg");
        payload.weight_kg = 0.0;
        assert_eq!(exercise_logged(&payload, &ctx), "💪 Logged Bench Press: 3x10");
    }

    #[test]
    fn test_not_in_plan_lists_schedule() {
        assert_eq!(
            not_in_plan("Deadlift", &["Bench Press", "Dips"]),
            "❌ Deadlift is not in today's workout plan.\n\nToday's exercises: Bench Press, Dips"
        );
    }

    #[test]
    fn test_proposal_texts() {
        let exercise = ExercisePayload {
            exercise_name: "Leg Press".into(),
            sets: 4,
            reps: 12,
            weight_kg: 100.0,
        };
        assert_eq!(
            exercise_proposal(&exercise, true, "Drive through heels", false),
            "🏋️ Leg Press (from today's plan)\n\n💪 Suggested: 4x12 @ 100kg\n\n💡 Drive through heels\n\nClick 'Add to Track' to log this exercise."
        );
        assert!(exercise_proposal(&exercise, false, "", true).contains("isn't part of your current program"));

        assert_eq!(
            food_proposal(&banana(), ""),
            "🍽️ Banana\n\n📊 105 kcal | 1.3g protein | 27g carbs | 0.4g fat\n\nClick 'Add to Track' to log this meal."
        );
    }
}
