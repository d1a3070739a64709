// ABOUTME: Integration tests for the deterministic tier of the decision engine
// ABOUTME: Food, exercise, reset and media routing with no generative provider configured
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files don't require documentation - this is a rustc lint (not clippy)
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::{chat_service, context_builder, engine, seeded_store};
use fitness_copilot::brain::composer::{
    AUDIO_REPLY, HELP_REPLY, RESET_REPLY, VISION_UNAVAILABLE_REPLY,
};
use fitness_copilot::context::FitnessDataSource;
use fitness_copilot::lexicon::Lexicon;
use fitness_copilot::models::{Action, ActionType, AssistantReply, Attachment, Message};
use fitness_copilot::services::{AppliedEffect, MessageInput};
use fitness_copilot::store::{ClearedLogs, DemoPersona};

async fn decide_for(persona: DemoPersona, day: u8, message: Message) -> AssistantReply {
    let (store, user_id) = seeded_store(persona, day);
    let source: Arc<dyn FitnessDataSource> = store;
    let context = context_builder(source).build(user_id).await;
    engine(None).decide(&message, &context).await
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[tokio::test]
async fn test_food_message_logs_banana() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    let service = chat_service(&store, None);

    let exchange = service
        .send_message(user_id, MessageInput::text("I ate a banana"))
        .await
        .unwrap();
    let reply = exchange.reply();

    match &reply.action {
        Action::LogFood(payload) => {
            assert_eq!(payload.food, "banana");
            assert_eq!(payload.meal.calories, 105);
            assert!((payload.meal.protein_g - 1.3).abs() < f64::EPSILON);
            assert!((payload.meal.carbs_g - 27.0).abs() < f64::EPSILON);
            assert!((payload.meal.fat_g - 0.4).abs() < f64::EPSILON);
        }
        other => panic!("expected a food log, got {other:?}"),
    }
    assert!(reply.content.contains("105"));
    assert!(reply.content.contains("protein"));
    assert_eq!(
        reply.content,
        "✅ Logged banana: 105 kcal, 1.3g protein\n\n📊 You're at 6% of your calorie target (1645 kcal remaining)"
    );
    assert!(matches!(exchange.effect, AppliedEffect::Logged { .. }));

    let summary = service.daily_summary(user_id).await.unwrap();
    assert_eq!(summary.calories_consumed, 105);
    assert_eq!(summary.meals.len(), 1);
}

#[tokio::test]
async fn test_exercise_message_logs_bench_with_remaining_count() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    let service = chat_service(&store, None);

    let exchange = service
        .send_message(user_id, MessageInput::text("Did 3 sets of bench at 60kg"))
        .await
        .unwrap();
    let reply = exchange.reply();

    match &reply.action {
        Action::LogExercise(payload) => {
            assert_eq!(payload.exercise_name, "Bench Press");
            assert_eq!(payload.sets, 3);
            assert_eq!(payload.reps, 10);
            assert!((payload.weight_kg - 60.0).abs() < f64::EPSILON);
        }
        other => panic!("expected an exercise log, got {other:?}"),
    }
    assert_eq!(
        reply.content,
        "💪 Logged Bench Press: 3x10 @ 60kg\n\n🎯 Part of today's plan! 2 exercises remaining"
    );

    let summary = service.daily_summary(user_id).await.unwrap();
    assert_eq!(summary.workouts_completed, 1);
    assert_eq!(summary.workouts_scheduled, 3);
}

#[tokio::test]
async fn test_reset_clears_the_simulated_day() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    let service = chat_service(&store, None);

    service
        .send_message(user_id, MessageInput::text("I ate a banana"))
        .await
        .unwrap();
    service
        .send_message(user_id, MessageInput::text("bench 3x8 at 70kg"))
        .await
        .unwrap();

    let exchange = service
        .send_message(user_id, MessageInput::text("reset"))
        .await
        .unwrap();
    assert_eq!(exchange.reply().action, Action::Reset);
    assert_eq!(exchange.reply().content, RESET_REPLY);
    assert_eq!(
        exchange.effect,
        AppliedEffect::Cleared {
            cleared: ClearedLogs {
                meals: 1,
                exercises: 1
            }
        }
    );

    let summary = service.daily_summary(user_id).await.unwrap();
    assert_eq!(summary.calories_consumed, 0);
    assert_eq!(summary.workouts_completed, 0);
    assert!(summary.meals.is_empty());
    assert!(summary.exercises.is_empty());
}

#[tokio::test]
async fn test_image_without_provider_asks_for_description() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    let service = chat_service(&store, None);

    let exchange = service
        .send_message(
            user_id,
            MessageInput {
                image_url: Some("https://cdn.example.com/meal.jpg".into()),
                ..MessageInput::default()
            },
        )
        .await
        .unwrap();
    let reply = exchange.reply();

    assert_eq!(reply.action, Action::None);
    assert_eq!(reply.content, VISION_UNAVAILABLE_REPLY);
    assert!(reply.content.contains("describe"));
    assert_eq!(exchange.effect, AppliedEffect::Nothing);
}

// ============================================================================
// Routing priority
// ============================================================================

#[tokio::test]
async fn test_longest_food_name_wins() {
    let reply = decide_for(
        DemoPersona::Cut,
        0,
        Message::text("For lunch I had a grilled chicken salad"),
    )
    .await;
    match reply.action {
        Action::LogFood(payload) => {
            assert_eq!(payload.food, "grilled chicken salad");
            assert_eq!(payload.meal.meal_name, "Grilled Chicken Salad");
            assert_eq!(payload.meal.calories, 450);
        }
        other => panic!("expected a food log, got {other:?}"),
    }
}

#[tokio::test]
async fn test_food_trigger_without_known_food_falls_to_help() {
    let reply = decide_for(DemoPersona::Cut, 0, Message::text("I had pizza for dinner")).await;
    assert_eq!(reply.action, Action::None);
    assert_eq!(reply.content, HELP_REPLY);
}

#[tokio::test]
async fn test_reset_outranks_food_and_exercise() {
    let reply = decide_for(
        DemoPersona::Cut,
        0,
        Message::text("I ate a banana and did bench, please reset"),
    )
    .await;
    assert_eq!(reply.action, Action::Reset);
}

#[tokio::test]
async fn test_reset_matches_inside_other_words() {
    let reply = decide_for(DemoPersona::Cut, 0, Message::text("I didn't reset my watch")).await;
    assert_eq!(reply.action, Action::Reset);

    let reply = decide_for(DemoPersona::Cut, 0, Message::text("PRESETS are handy")).await;
    assert_eq!(reply.action, Action::Reset);
}

#[tokio::test]
async fn test_audio_outranks_text() {
    let message = Message::with_attachment("I ate a banana", Attachment::audio(None));
    let reply = decide_for(DemoPersona::Cut, 0, message).await;
    assert_eq!(reply.action, Action::None);
    assert_eq!(reply.content, AUDIO_REPLY);
}

#[tokio::test]
async fn test_unrelated_text_gets_help() {
    let reply = decide_for(DemoPersona::Cut, 0, Message::text("hello there")).await;
    assert_eq!(reply.action_type(), ActionType::None);
    assert_eq!(reply.content, HELP_REPLY);
}

// ============================================================================
// Deterministic exercise parsing
// ============================================================================

#[tokio::test]
async fn test_pounds_convert_to_kilograms() {
    let reply = decide_for(DemoPersona::Cut, 0, Message::text("bench 5x5 with 100 lbs")).await;
    match reply.action {
        Action::LogExercise(payload) => {
            assert_eq!(payload.sets, 5);
            assert_eq!(payload.reps, 5);
            assert!((payload.weight_kg - 45.3592).abs() < 1e-9);
        }
        other => panic!("expected an exercise log, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_numbers_use_defaults() {
    let reply = decide_for(DemoPersona::Cut, 0, Message::text("did some dips")).await;
    match reply.action {
        Action::LogExercise(payload) => {
            assert_eq!(payload.exercise_name, "Dips");
            assert_eq!(payload.sets, 3);
            assert_eq!(payload.reps, 10);
            assert!(payload.weight_kg.abs() < f64::EPSILON);
        }
        other => panic!("expected an exercise log, got {other:?}"),
    }
    assert!(reply.content.starts_with("💪 Logged Dips: 3x10\n\n"));
}

#[tokio::test]
async fn test_fallback_logs_on_rest_day_without_plan_clause() {
    let reply = decide_for(DemoPersona::Cut, 5, Message::text("squat 4x8 at 100kg")).await;
    match &reply.action {
        Action::LogExercise(payload) => assert_eq!(payload.exercise_name, "Barbell Squat"),
        other => panic!("expected an exercise log, got {other:?}"),
    }
    assert_eq!(reply.content, "💪 Logged Barbell Squat: 4x8 @ 100kg");
}

#[tokio::test]
async fn test_fallback_logs_unscheduled_exercise_as_extra_work() {
    let reply = decide_for(DemoPersona::Cut, 0, Message::text("deadlift 3x5 at 120kg")).await;
    assert_eq!(reply.action_type(), ActionType::LogExercise);
    assert!(reply
        .content
        .ends_with("💡 Extra work! Today's plan has 3 scheduled exercises"));
}

#[tokio::test]
async fn test_exercise_trigger_without_alias_gets_help() {
    let reply = decide_for(DemoPersona::Cut, 0, Message::text("did 3 sets today")).await;
    assert_eq!(reply.action, Action::None);
    assert_eq!(reply.content, HELP_REPLY);
}

// ============================================================================
// Macro fidelity
// ============================================================================

#[tokio::test]
async fn test_every_lexicon_food_copies_macros_unchanged() {
    let (store, user_id) = seeded_store(DemoPersona::Maintain, 0);
    let source: Arc<dyn FitnessDataSource> = store;
    let context = context_builder(source).build(user_id).await;
    let engine = engine(None);

    for entry in Lexicon::builtin().foods() {
        let reply = engine
            .decide(&Message::text(format!("I ate {}", entry.name)), &context)
            .await;
        match reply.action {
            Action::LogFood(payload) => {
                assert_eq!(payload.food, entry.name);
                assert_eq!(payload.meal.calories, entry.calories);
                assert!((payload.meal.protein_g - entry.protein_g).abs() < f64::EPSILON);
                assert!((payload.meal.carbs_g - entry.carbs_g).abs() < f64::EPSILON);
                assert!((payload.meal.fat_g - entry.fat_g).abs() < f64::EPSILON);
                assert_eq!(payload.meal.meal_type, "snack");
            }
            other => panic!("{} did not log as food: {other:?}", entry.name),
        }
    }
}
