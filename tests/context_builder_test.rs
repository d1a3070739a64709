// ABOUTME: Integration tests for the user context snapshot and its data isolation rules
// ABOUTME: Simulated-day scoping, tenant scoping, history privacy caps and safe defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files don't require documentation - this is a rustc lint (not clippy)
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use common::{context_builder, seeded_store, FailingSource, ProfileOnlySource};
use fitness_copilot::context::redaction::contains_attachment_payload;
use fitness_copilot::context::{FitnessDataSource, HistoryLimits, UserContext};
use fitness_copilot::intelligence::{EnergyTargetCalculator, TargetCalculator};
use fitness_copilot::models::{
    Action, Attachment, ChatMessageRecord, ChatRole, ExerciseLog, GoalMethod, MealLog,
};
use fitness_copilot::store::{DemoPersona, FitnessStore, InMemoryStore};

fn meal(user_id: Uuid, day: u8, name: &str, calories: u32, protein_g: f64) -> MealLog {
    MealLog {
        id: Uuid::new_v4(),
        user_id,
        simulated_day: day,
        meal_name: name.to_owned(),
        meal_type: "snack".to_owned(),
        calories,
        protein_g,
        carbs_g: 10.0,
        fat_g: 5.0,
        logged_at: Utc::now(),
    }
}

fn lift(user_id: Uuid, day: u8, name: &str) -> ExerciseLog {
    ExerciseLog {
        id: Uuid::new_v4(),
        user_id,
        simulated_day: day,
        exercise_name: name.to_owned(),
        sets: 3,
        reps: 8,
        weight_kg: 60.0,
        logged_at: Utc::now(),
    }
}

fn chat(user_id: Uuid, role: ChatRole, content: &str, attachment: Attachment) -> ChatMessageRecord {
    ChatMessageRecord {
        id: Uuid::new_v4(),
        user_id,
        role,
        content: content.to_owned(),
        attachment,
        action: Action::None,
        created_at: Utc::now(),
    }
}

async fn build(store: &Arc<InMemoryStore>, user_id: Uuid) -> UserContext {
    let source: Arc<dyn FitnessDataSource> = store.clone();
    context_builder(source).build(user_id).await
}

// ============================================================================
// Simulated day
// ============================================================================

#[tokio::test]
async fn test_context_reflects_simulated_day_plan() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 1);
    let context = build(&store, user_id).await;

    assert_eq!(context.simulated_day, 1);
    assert_eq!(context.simulated_day_name(), "Tuesday");
    assert_eq!(context.calories_target, 1750);
    assert!((context.protein_target - 119.0).abs() < 1e-9);
    assert_eq!(
        context.scheduled_exercise_names(),
        vec!["Deadlift", "Pull-up", "Barbell Row", "Bicep Curl"]
    );
    assert!(context.allowed_exercise_names.iter().any(|name| name == "Deadlift"));
    assert!(context.allowed_exercise_names.iter().any(|name| name == "Leg Press"));
    assert_eq!(context.scheduled_meals.len(), 4);
    assert!(!context.is_rest_day());
}

#[tokio::test]
async fn test_allowed_names_are_sorted_and_distinct() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    let context = build(&store, user_id).await;

    let mut expected = context.allowed_exercise_names.clone();
    expected.sort();
    expected.dedup();
    assert_eq!(context.allowed_exercise_names, expected);
    assert_eq!(
        context
            .allowed_exercise_names
            .iter()
            .filter(|name| name.as_str() == "Barbell Row")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_logs_from_other_days_are_excluded() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    store.save_meal_log(&meal(user_id, 0, "Banana", 105, 1.3)).await.unwrap();
    store.save_meal_log(&meal(user_id, 3, "Pizza", 900, 35.0)).await.unwrap();
    store.save_exercise_log(&lift(user_id, 0, "Bench Press")).await.unwrap();
    store.save_exercise_log(&lift(user_id, 2, "Leg Press")).await.unwrap();

    let monday = build(&store, user_id).await;
    assert_eq!(monday.calories_consumed, 105);
    assert!((monday.protein_consumed - 1.3).abs() < f64::EPSILON);
    assert_eq!(monday.workouts_completed, 1);
    assert_eq!(monday.completed_exercises[0].exercise_name, "Bench Press");

    store.set_simulated_day(user_id, 3).await.unwrap();
    let thursday = build(&store, user_id).await;
    assert_eq!(thursday.calories_consumed, 900);
    assert_eq!(thursday.workouts_completed, 0);
    assert_eq!(
        thursday.scheduled_exercise_names(),
        vec!["Incline Dumbbell Press", "Dumbbell Press", "Lunges"]
    );
}

#[tokio::test]
async fn test_weekend_is_a_rest_day() {
    let (store, user_id) = seeded_store(DemoPersona::Bulk, 6);
    let context = build(&store, user_id).await;
    assert!(context.is_rest_day());
    assert_eq!(context.simulated_day_name(), "Sunday");
    assert!(!context.allowed_exercise_names.is_empty());
    assert_eq!(context.calories_target, 2150);
}

// ============================================================================
// Tenant isolation
// ============================================================================

#[tokio::test]
async fn test_other_users_data_is_invisible() {
    let (store, alice) = seeded_store(DemoPersona::Cut, 0);
    let bob = fitness_copilot::store::seed_persona(&store, DemoPersona::Bulk, 0);

    store.save_meal_log(&meal(bob, 0, "Burrito", 800, 40.0)).await.unwrap();
    store.save_exercise_log(&lift(bob, 0, "Bench Press")).await.unwrap();
    store
        .save_chat_message(&chat(bob, ChatRole::User, "bob's secret", Attachment::none()))
        .await
        .unwrap();

    let context = build(&store, alice).await;
    assert_eq!(context.calories_consumed, 0);
    assert_eq!(context.workouts_completed, 0);
    assert!(context.chat_history.is_empty());
    assert_eq!(context.calories_target, 1750);
}

// ============================================================================
// History privacy
// ============================================================================

#[tokio::test]
async fn test_history_carries_text_only() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    let payload = "A".repeat(300);
    store
        .save_chat_message(&chat(
            user_id,
            ChatRole::User,
            "here is my lunch",
            Attachment::image_base64(payload.clone()),
        ))
        .await
        .unwrap();
    store
        .save_chat_message(&chat(
            user_id,
            ChatRole::User,
            &format!("pasted data:image/png;base64,{payload} and https://cdn.example.com/p.jpg"),
            Attachment::image_url("https://cdn.example.com/p.jpg"),
        ))
        .await
        .unwrap();

    let context = build(&store, user_id).await;
    assert_eq!(context.chat_history.len(), 2);
    assert_eq!(context.chat_history[0].content, "here is my lunch");
    for turn in &context.chat_history {
        assert!(!contains_attachment_payload(&turn.content), "{}", turn.content);
        assert!(!turn.content.contains("cdn.example.com"));
    }
}

#[tokio::test]
async fn test_history_drops_short_image_payloads() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    let tiny_png = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
    let jpeg_head = "/9j/4AAQSkZJRgABAQAAAQABAAD/2wBDAAgGBgcGBQgHBwcJCQgKDBQNDAsLDBkSEw8UHRofHh0aHBwg";
    for content in [format!("my meal {tiny_png}"), format!("{jpeg_head} gym pic")] {
        store
            .save_chat_message(&chat(user_id, ChatRole::User, &content, Attachment::none()))
            .await
            .unwrap();
    }

    let context = build(&store, user_id).await;
    assert_eq!(context.chat_history.len(), 2);
    assert_eq!(context.chat_history[0].content, "my meal [attachment]");
    assert_eq!(context.chat_history[1].content, "[attachment] gym pic");
    for turn in &context.chat_history {
        assert!(!contains_attachment_payload(&turn.content), "{}", turn.content);
    }
}

#[tokio::test]
async fn test_history_is_capped_by_count_oldest_first() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    for index in 0..15 {
        let role = if index % 2 == 0 {
            ChatRole::User
        } else {
            ChatRole::Assistant
        };
        store
            .save_chat_message(&chat(user_id, role, &format!("message {index}"), Attachment::none()))
            .await
            .unwrap();
    }

    let context = build(&store, user_id).await;
    assert_eq!(context.chat_history.len(), 10);
    assert_eq!(context.chat_history[0].content, "message 5");
    assert_eq!(context.chat_history[9].content, "message 14");
    assert_eq!(context.recent_history(5)[0].content, "message 10");
}

#[tokio::test]
async fn test_history_char_budget_never_splits_a_message() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    for word in ["alpha ", "bravo ", "charlie "] {
        store
            .save_chat_message(&chat(user_id, ChatRole::User, &word.repeat(10), Attachment::none()))
            .await
            .unwrap();
    }

    let source: Arc<dyn FitnessDataSource> = store.clone();
    let context = context_builder(source)
        .with_history_limits(HistoryLimits {
            max_messages: 10,
            max_chars: 130,
        })
        .build(user_id)
        .await;

    assert_eq!(context.chat_history.len(), 2);
    assert_eq!(context.chat_history[0].content, "alpha ".repeat(10));
    assert_eq!(context.chat_history[1].content, "bravo ".repeat(10));
    assert!(context.history_chars() <= 130);
}

// ============================================================================
// Defaults
// ============================================================================

#[tokio::test]
async fn test_unknown_user_gets_defaults() {
    let store = Arc::new(InMemoryStore::new());
    let user_id = Uuid::new_v4();
    let context = build(&store, user_id).await;
    assert_eq!(context, UserContext::defaults(user_id));
    assert_eq!(context.calories_target, 2000);
    assert!((context.protein_target - 150.0).abs() < f64::EPSILON);
    assert_eq!(context.sex, "unknown");
    assert_eq!(context.goal_method, GoalMethod::Maintenance);
}

#[tokio::test]
async fn test_failing_source_gets_defaults() {
    let user_id = Uuid::new_v4();
    let context = context_builder(Arc::new(FailingSource)).build(user_id).await;
    assert_eq!(context, UserContext::defaults(user_id));
}

#[tokio::test]
async fn test_partial_failures_keep_the_profile() {
    let user_id = Uuid::new_v4();
    let profile = DemoPersona::Maintain.profile(user_id, Uuid::new_v4());
    let expected = EnergyTargetCalculator.compute_targets(&profile).unwrap();

    let context = context_builder(Arc::new(ProfileOnlySource(profile)))
        .build(user_id)
        .await;

    assert_eq!(context.sex, "female");
    assert!((context.weight_kg - 60.0).abs() < f64::EPSILON);
    assert_eq!(context.calories_target, expected.calories);
    assert!(context.scheduled_exercises.is_empty());
    assert!(context.chat_history.is_empty());
    assert_eq!(context.calories_consumed, 0);
}

#[tokio::test]
async fn test_targets_fall_back_to_calculator_without_meal_plan() {
    let (store, user_id) = seeded_store(DemoPersona::Maintain, 0);
    let profile = store.get_user_profile(user_id).await.unwrap().unwrap();
    let expected = EnergyTargetCalculator.compute_targets(&profile).unwrap();

    let context = build(&store, user_id).await;
    assert!(context.scheduled_meals.is_empty());
    assert_eq!(context.calories_target, expected.calories);
    assert!((context.protein_target - 120.0).abs() < 1e-9);
    assert!((expected.protein_g - 120.0).abs() < 1e-9);
}
