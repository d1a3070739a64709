// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Seeded stores, scripted generative doubles and a failing data source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `fitness_copilot`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use fitness_copilot::brain::ActionEngine;
use fitness_copilot::context::{ContextBuilder, FitnessDataSource, MacroTotals};
use fitness_copilot::errors::{AppError, AppResult};
use fitness_copilot::intelligence::EnergyTargetCalculator;
use fitness_copilot::lexicon::Lexicon;
use fitness_copilot::llm::{
    ChatRequest, ChatResponse, GenerativeExtractor, ImageSource, JsonObject, LlmCapabilities,
    LlmProvider,
};
use fitness_copilot::models::{ChatTurn, ExerciseLogItem, MealPlanItem, Profile, RoutineItem};
use fitness_copilot::services::ChatService;
use fitness_copilot::store::{seed_persona, DemoPersona, InMemoryStore};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Stores and services
// ============================================================================

/// Store seeded with one persona on `day`
pub fn seeded_store(persona: DemoPersona, day: u8) -> (Arc<InMemoryStore>, Uuid) {
    init_test_logging();
    let store = Arc::new(InMemoryStore::new());
    let user_id = seed_persona(&store, persona, day);
    (store, user_id)
}

/// Engine over the built-in lexicon with an optional extractor
pub fn engine(extractor: Option<Arc<dyn GenerativeExtractor>>) -> ActionEngine {
    ActionEngine::new(Arc::new(Lexicon::builtin())).with_optional_extractor(extractor)
}

/// Chat service over `store`
pub fn chat_service(
    store: &Arc<InMemoryStore>,
    extractor: Option<Arc<dyn GenerativeExtractor>>,
) -> ChatService<InMemoryStore> {
    ChatService::new(store.clone(), engine(extractor))
}

/// Context builder reading from `source`
pub fn context_builder(source: Arc<dyn FitnessDataSource>) -> ContextBuilder {
    ContextBuilder::new(source, Arc::new(EnergyTargetCalculator))
}

/// JSON object literal
pub fn object(value: Value) -> JsonObject {
    value.as_object().cloned().expect("object literal")
}

// ============================================================================
// Scripted generative extractor
// ============================================================================

/// One scripted extractor answer
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    /// Return this value
    Answer(T),
    /// Fail with a non-retryable provider error
    Fail,
}

fn next<T: Clone>(queue: &Mutex<VecDeque<Scripted<T>>>, empty: T) -> AppResult<T> {
    match queue.lock().unwrap().pop_front() {
        Some(Scripted::Answer(value)) => Ok(value),
        Some(Scripted::Fail) => Err(AppError::external_service("scripted", "provider exploded")),
        None => Ok(empty),
    }
}

/// Extractor answering from per-method queues; an empty queue means no result
#[derive(Default)]
pub struct ScriptedExtractor {
    text: Mutex<VecDeque<Scripted<Option<String>>>>,
    structured: Mutex<VecDeque<Scripted<Vec<JsonObject>>>>,
    image_text: Mutex<VecDeque<Scripted<Option<String>>>>,
    image_structured: Mutex<VecDeque<Scripted<Vec<JsonObject>>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, answer: Scripted<Option<String>>) -> Self {
        self.text.lock().unwrap().push_back(answer);
        self
    }

    pub fn structured(self, answer: Scripted<Vec<JsonObject>>) -> Self {
        self.structured.lock().unwrap().push_back(answer);
        self
    }

    pub fn image_text(self, answer: Scripted<Option<String>>) -> Self {
        self.image_text.lock().unwrap().push_back(answer);
        self
    }

    pub fn image_structured(self, answer: Scripted<Vec<JsonObject>>) -> Self {
        self.image_structured.lock().unwrap().push_back(answer);
        self
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of calls across all methods
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Engine-facing handle to a shared extractor
    pub fn handle(this: &Arc<Self>) -> Option<Arc<dyn GenerativeExtractor>> {
        let dynamic: Arc<dyn GenerativeExtractor> = this.clone();
        Some(dynamic)
    }

    fn record(&self, prompt: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_owned());
    }
}

#[async_trait]
impl GenerativeExtractor for ScriptedExtractor {
    async fn complete_text(&self, prompt: &str, _budget: Duration) -> AppResult<Option<String>> {
        self.record(prompt);
        next(&self.text, None)
    }

    async fn complete_structured(
        &self,
        prompt: &str,
        _budget: Duration,
    ) -> AppResult<Vec<JsonObject>> {
        self.record(prompt);
        next(&self.structured, Vec::new())
    }

    async fn complete_text_with_image(
        &self,
        prompt: &str,
        _image: &ImageSource,
        _budget: Duration,
    ) -> AppResult<Option<String>> {
        self.record(prompt);
        next(&self.image_text, None)
    }

    async fn complete_structured_with_image(
        &self,
        prompt: &str,
        _image: &ImageSource,
        _budget: Duration,
    ) -> AppResult<Vec<JsonObject>> {
        self.record(prompt);
        next(&self.image_structured, Vec::new())
    }
}

// ============================================================================
// Scripted LLM provider
// ============================================================================

/// One scripted provider step
#[derive(Debug, Clone)]
pub enum ProviderStep {
    /// Successful completion with this content
    Reply(String),
    /// HTTP 429
    RateLimited,
    /// Non-retryable failure
    Fail,
    /// Never answers
    Hang,
}

/// Provider answering from a queue; an empty queue replies with an empty string
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<ProviderStep>>,
    capabilities: LlmCapabilities,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(steps: impl IntoIterator<Item = ProviderStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            capabilities: LlmCapabilities::full_featured(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_capabilities(mut self, capabilities: LlmCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(ProviderStep::Reply(content)) => Ok(ChatResponse {
                content,
                model: "scripted-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Some(ProviderStep::RateLimited) => Err(AppError::rate_limited("quota exceeded")),
            Some(ProviderStep::Fail) => Err(AppError::external_service("scripted", "bad gateway")),
            Some(ProviderStep::Hang) => {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                Err(AppError::timeout("hung"))
            }
            None => Ok(ChatResponse {
                content: String::new(),
                model: "scripted-model".to_owned(),
                usage: None,
                finish_reason: None,
            }),
        }
    }
}

// ============================================================================
// Failing data source
// ============================================================================

/// Data source whose every read fails
pub struct FailingSource;

fn down<T>() -> AppResult<T> {
    Err(AppError::internal("database unavailable"))
}

#[async_trait]
impl FitnessDataSource for FailingSource {
    async fn get_user_profile(&self, _user_id: Uuid) -> AppResult<Option<Profile>> {
        down()
    }

    async fn sum_logged_macros(&self, _user_id: Uuid, _day: u8) -> AppResult<MacroTotals> {
        down()
    }

    async fn get_scheduled_meals(&self, _user_id: Uuid, _day: u8) -> AppResult<Vec<MealPlanItem>> {
        down()
    }

    async fn get_scheduled_exercises(
        &self,
        _program_id: Uuid,
        _day: u8,
    ) -> AppResult<Vec<RoutineItem>> {
        down()
    }

    async fn get_all_program_exercise_names(
        &self,
        _program_id: Uuid,
    ) -> AppResult<BTreeSet<String>> {
        down()
    }

    async fn get_completed_exercises(
        &self,
        _user_id: Uuid,
        _day: u8,
    ) -> AppResult<Vec<ExerciseLogItem>> {
        down()
    }

    async fn get_recent_chat_messages(
        &self,
        _user_id: Uuid,
        _limit: usize,
    ) -> AppResult<Vec<ChatTurn>> {
        down()
    }
}

/// Data source that knows the profile but fails every other read
pub struct ProfileOnlySource(pub Profile);

#[async_trait]
impl FitnessDataSource for ProfileOnlySource {
    async fn get_user_profile(&self, _user_id: Uuid) -> AppResult<Option<Profile>> {
        Ok(Some(self.0.clone()))
    }

    async fn sum_logged_macros(&self, _user_id: Uuid, _day: u8) -> AppResult<MacroTotals> {
        down()
    }

    async fn get_scheduled_meals(&self, _user_id: Uuid, _day: u8) -> AppResult<Vec<MealPlanItem>> {
        down()
    }

    async fn get_scheduled_exercises(
        &self,
        _program_id: Uuid,
        _day: u8,
    ) -> AppResult<Vec<RoutineItem>> {
        down()
    }

    async fn get_all_program_exercise_names(
        &self,
        _program_id: Uuid,
    ) -> AppResult<BTreeSet<String>> {
        down()
    }

    async fn get_completed_exercises(
        &self,
        _user_id: Uuid,
        _day: u8,
    ) -> AppResult<Vec<ExerciseLogItem>> {
        down()
    }

    async fn get_recent_chat_messages(
        &self,
        _user_id: Uuid,
        _limit: usize,
    ) -> AppResult<Vec<ChatTurn>> {
        down()
    }
}
