// ABOUTME: Integration tests for environment configuration and chat service housekeeping
// ABOUTME: Env parsing fallbacks, provider wiring, simulated day bounds and history clearing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files don't require documentation - this is a rustc lint (not clippy)
#![allow(missing_docs)]

mod common;

use std::env;
use std::time::Duration;

use serial_test::serial;

use common::{chat_service, init_test_logging, seeded_store};
use fitness_copilot::config::{env_keys, BrainConfig, LlmProviderType};
use fitness_copilot::errors::ErrorCode;
use fitness_copilot::llm::GEMINI_API_KEY_ENV;
use fitness_copilot::services::MessageInput;
use fitness_copilot::store::DemoPersona;

const ALL_KEYS: &[&str] = &[
    env_keys::LLM_ENABLED,
    env_keys::LLM_MODEL,
    env_keys::EXERCISE_TIMEOUT_SECS,
    env_keys::CHAT_TIMEOUT_SECS,
    env_keys::VISION_TIMEOUT_SECS,
    env_keys::LLM_MAX_ATTEMPTS,
    env_keys::LLM_BACKOFF_UNIT_MS,
    env_keys::HISTORY_MAX_MESSAGES,
    env_keys::HISTORY_MAX_CHARS,
    LlmProviderType::ENV_VAR,
    GEMINI_API_KEY_ENV,
];

fn clear_env() {
    for key in ALL_KEYS {
        env::remove_var(key);
    }
}

// ============================================================================
// Environment configuration
// ============================================================================

#[test]
#[serial]
fn test_unset_environment_gives_defaults() {
    clear_env();
    assert_eq!(BrainConfig::from_env(), BrainConfig::default());
}

#[test]
#[serial]
fn test_environment_overrides_are_applied() {
    clear_env();
    env::set_var(env_keys::LLM_ENABLED, "YES");
    env::set_var(env_keys::LLM_MODEL, "gemini-2.5-pro");
    env::set_var(env_keys::EXERCISE_TIMEOUT_SECS, "4");
    env::set_var(env_keys::CHAT_TIMEOUT_SECS, " 8 ");
    env::set_var(env_keys::VISION_TIMEOUT_SECS, "45");
    env::set_var(env_keys::LLM_MAX_ATTEMPTS, "5");
    env::set_var(env_keys::LLM_BACKOFF_UNIT_MS, "250");
    env::set_var(env_keys::HISTORY_MAX_MESSAGES, "4");
    env::set_var(env_keys::HISTORY_MAX_CHARS, "2000");
    env::set_var(LlmProviderType::ENV_VAR, "Google");

    let config = BrainConfig::from_env();
    clear_env();

    assert!(config.llm.enabled);
    assert_eq!(config.llm.provider, LlmProviderType::Gemini);
    assert_eq!(config.llm.model, "gemini-2.5-pro");
    assert_eq!(config.llm.retry.max_attempts, 5);
    assert_eq!(config.llm.retry.backoff_unit, Duration::from_millis(250));
    assert_eq!(config.timeouts.exercise_extraction, Duration::from_secs(4));
    assert_eq!(config.timeouts.general_chat, Duration::from_secs(8));
    assert_eq!(config.timeouts.image_analysis, Duration::from_secs(45));
    assert_eq!(config.history.max_messages, 4);
    assert_eq!(config.history.max_chars, 2000);
}

#[test]
#[serial]
fn test_invalid_values_fall_back_per_field() {
    clear_env();
    env::set_var(env_keys::LLM_ENABLED, "maybe");
    env::set_var(env_keys::CHAT_TIMEOUT_SECS, "fifteen");
    env::set_var(env_keys::VISION_TIMEOUT_SECS, "-3");
    env::set_var(env_keys::LLM_MAX_ATTEMPTS, "0");
    env::set_var(env_keys::LLM_MODEL, "   ");
    env::set_var(env_keys::HISTORY_MAX_MESSAGES, "6");

    let config = BrainConfig::from_env();
    clear_env();

    let defaults = BrainConfig::default();
    assert!(!config.llm.enabled);
    assert_eq!(config.llm.model, defaults.llm.model);
    assert_eq!(config.llm.retry.max_attempts, 1);
    assert_eq!(config.timeouts.general_chat, defaults.timeouts.general_chat);
    assert_eq!(config.timeouts.image_analysis, defaults.timeouts.image_analysis);
    assert_eq!(config.history.max_messages, 6);
}

#[test]
#[serial]
fn test_enabled_without_api_key_builds_no_extractor() {
    init_test_logging();
    clear_env();
    env::set_var(env_keys::LLM_ENABLED, "true");

    let config = BrainConfig::from_env();
    clear_env();

    assert!(config.llm.enabled);
    assert!(config.build_extractor().is_none());
}

#[test]
#[serial]
fn test_enabled_with_api_key_builds_extractor() {
    clear_env();
    env::set_var(env_keys::LLM_ENABLED, "1");
    env::set_var(GEMINI_API_KEY_ENV, "test-key");

    let extractor = BrainConfig::from_env().build_extractor();
    clear_env();

    assert!(extractor.is_some());
}

// ============================================================================
// Service housekeeping
// ============================================================================

#[tokio::test]
async fn test_simulated_day_is_bounded() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    let service = chat_service(&store, None);

    let error = service.set_simulated_day(user_id, 7).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    service.set_simulated_day(user_id, 6).await.unwrap();
    let summary = service.daily_summary(user_id).await.unwrap();
    assert_eq!(summary.simulated_day, 6);
    assert_eq!(summary.day_name, "Sunday");
    assert_eq!(summary.workouts_scheduled, 0);
}

#[tokio::test]
async fn test_clear_history_removes_every_turn() {
    let (store, user_id) = seeded_store(DemoPersona::Cut, 0);
    let (_, other_user) = seeded_store(DemoPersona::Bulk, 0);
    let service = chat_service(&store, None);

    service
        .send_message(user_id, MessageInput::text("I ate a banana"))
        .await
        .unwrap();
    service
        .send_message(user_id, MessageInput::text("help"))
        .await
        .unwrap();
    assert_eq!(store.message_count(user_id), 4);

    assert_eq!(service.clear_history(user_id).await.unwrap(), 4);
    assert_eq!(store.message_count(user_id), 0);
    assert_eq!(service.clear_history(other_user).await.unwrap(), 0);

    let summary = service.daily_summary(user_id).await.unwrap();
    assert_eq!(summary.calories_consumed, 105);
}
