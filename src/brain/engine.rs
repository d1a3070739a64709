// ABOUTME: Action decision engine: one message plus a context snapshot in, one reply out
// ABOUTME: Strict priority order over attachment kind and content with tiered fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Action Decision Engine
//!
//! Priority, first match wins:
//!
//! 1. audio attachment: fixed reply, no action
//! 2. image attachment: classify and analyze, emit a proposal
//! 3. "reset" anywhere in the text: reset
//! 4. food trigger and a known food: log food
//! 5. exercise trigger: generative extraction validated against today's plan,
//!    deterministic alias match when the extractor is missing or fails
//! 6. general conversation through the extractor, else the help text
//!
//! [`ActionEngine::decide`] never fails. Every capability error is absorbed
//! into the next tier or a reply with no action.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use copilot_core::constants::{extraction_defaults, timeouts};
use copilot_core::models::{Action, AssistantReply, AttachmentKind, ExercisePayload, Message};

use super::composer;
use super::matcher::{food_payload, Matcher};
use super::vision::{proposal_reply, VisionAnalyzer};
use crate::context::UserContext;
use crate::lexicon::Lexicon;
use crate::llm::json::{get_f64, get_str, get_u32};
use crate::llm::prompts::{
    build_exercise_extraction_prompt, build_general_chat_prompt, ExerciseExtractionContext,
};
use crate::llm::{GenerativeExtractor, ImageSource};

/// Time budgets for each generative call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineTimeouts {
    /// Exercise extraction
    pub exercise_extraction: Duration,
    /// General conversation
    pub general_chat: Duration,
    /// Each image classification and analysis call
    pub image_analysis: Duration,
}

impl Default for EngineTimeouts {
    fn default() -> Self {
        Self {
            exercise_extraction: Duration::from_secs(timeouts::EXERCISE_EXTRACTION_SECS),
            general_chat: Duration::from_secs(timeouts::GENERAL_CHAT_SECS),
            image_analysis: Duration::from_secs(timeouts::IMAGE_ANALYSIS_SECS),
        }
    }
}

/// What the generative tier made of an exercise message
#[derive(Debug, Clone, PartialEq)]
enum ExerciseExtraction {
    /// An exercise log was reported
    Found(ExercisePayload),
    /// The model decided the message is not an exercise log
    NotAnExercise,
    /// No usable answer; use the deterministic tier
    Unavailable,
}

/// Decides one action per inbound message
#[derive(Clone)]
pub struct ActionEngine {
    lexicon: Arc<Lexicon>,
    extractor: Option<Arc<dyn GenerativeExtractor>>,
    timeouts: EngineTimeouts,
}

impl ActionEngine {
    /// Engine over `lexicon` with no generative capability
    #[must_use]
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            extractor: None,
            timeouts: EngineTimeouts::default(),
        }
    }

    /// Attach a generative extractor
    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn GenerativeExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Attach an optional generative extractor
    #[must_use]
    pub fn with_optional_extractor(mut self, extractor: Option<Arc<dyn GenerativeExtractor>>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Override the per-call time budgets
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: EngineTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Whether a generative capability is configured
    #[must_use]
    pub const fn has_extractor(&self) -> bool {
        self.extractor.is_some()
    }

    /// Decide the reply and action for `message`
    #[instrument(
        skip(self, message, context),
        fields(user_id = %context.user_id, attachment = ?message.attachment.kind)
    )]
    pub async fn decide(&self, message: &Message, context: &UserContext) -> AssistantReply {
        let reply = self.route(message, context).await;
        info!(action = %reply.action_type(), "decided action");
        reply
    }

    async fn route(&self, message: &Message, context: &UserContext) -> AssistantReply {
        match message.attachment.kind {
            AttachmentKind::Audio => return AssistantReply::text(composer::AUDIO_REPLY),
            AttachmentKind::Image => return self.handle_image(message, context).await,
            AttachmentKind::None => {}
        }

        let text = message.content.as_str();
        let matcher = Matcher::new(&self.lexicon);

        if matcher.has_reset_trigger(text) {
            return AssistantReply::new(composer::RESET_REPLY, Action::Reset);
        }

        if matcher.has_food_trigger(text) {
            if let Some(entry) = matcher.match_food(text) {
                let payload = food_payload(entry);
                let content = composer::food_logged(&payload.food, &payload.meal, context);
                return AssistantReply::new(content, Action::LogFood(payload));
            }
            debug!("food trigger without a known food");
        }

        if matcher.has_exercise_trigger(text) {
            if let Some(reply) = self.handle_exercise(&matcher, text, context).await {
                return reply;
            }
        }

        self.general_reply(text, context).await
    }

    // ========================================================================
    // Image
    // ========================================================================

    async fn handle_image(&self, message: &Message, context: &UserContext) -> AssistantReply {
        let Some(extractor) = self.extractor.as_deref() else {
            return AssistantReply::text(composer::VISION_UNAVAILABLE_REPLY);
        };

        let image = ImageSource::from_attachment(&message.attachment);
        let analyzer = VisionAnalyzer::new(extractor, self.timeouts.image_analysis);
        match analyzer.analyze(&image, context).await {
            Ok(outcome) => proposal_reply(outcome, context),
            Err(e) => {
                error!(error = %e, "image analysis failed");
                AssistantReply::text(composer::VISION_ERROR_REPLY)
            }
        }
    }

    // ========================================================================
    // Exercise
    // ========================================================================

    async fn handle_exercise(
        &self,
        matcher: &Matcher<'_>,
        text: &str,
        context: &UserContext,
    ) -> Option<AssistantReply> {
        if let Some(extractor) = self.extractor.as_deref() {
            match self.extract_exercise(extractor, text, context).await {
                ExerciseExtraction::Found(exercise) => {
                    return Some(Self::validated_exercise(exercise, context));
                }
                ExerciseExtraction::NotAnExercise => {
                    info!("extractor found no exercise log in message");
                    return None;
                }
                ExerciseExtraction::Unavailable => {
                    debug!("extractor gave no answer, using alias matcher");
                }
            }
        }

        let exercise = matcher.parse_exercise(text)?;
        let content = composer::exercise_logged(&exercise, context);
        Some(AssistantReply::new(content, Action::LogExercise(exercise)))
    }

    async fn extract_exercise(
        &self,
        extractor: &dyn GenerativeExtractor,
        text: &str,
        context: &UserContext,
    ) -> ExerciseExtraction {
        let prompt =
            build_exercise_extraction_prompt(&ExerciseExtractionContext::from_context(text, context));
        debug!(%prompt, "exercise extraction prompt");

        let objects = match extractor
            .complete_structured(&prompt, self.timeouts.exercise_extraction)
            .await
        {
            Ok(objects) => objects,
            Err(e) => {
                warn!(error = %e, "exercise extraction failed");
                return ExerciseExtraction::Unavailable;
            }
        };

        let Some(object) = objects.first() else {
            return ExerciseExtraction::Unavailable;
        };
        let Some(exercise_name) = get_str(object, "exercise_name") else {
            return ExerciseExtraction::NotAnExercise;
        };

        ExerciseExtraction::Found(ExercisePayload {
            exercise_name,
            sets: get_u32(object, "sets")
                .unwrap_or(extraction_defaults::SETS)
                .max(1),
            reps: get_u32(object, "reps")
                .unwrap_or(extraction_defaults::REPS)
                .max(1),
            weight_kg: get_f64(object, "weight_kg").unwrap_or(extraction_defaults::WEIGHT_KG),
        })
    }

    fn validated_exercise(exercise: ExercisePayload, context: &UserContext) -> AssistantReply {
        if context.is_scheduled(&exercise.exercise_name) {
            let content = composer::exercise_logged(&exercise, context);
            return AssistantReply::new(content, Action::LogExercise(exercise));
        }

        info!(exercise = %exercise.exercise_name, "extracted exercise is not on today's plan");
        if context.is_rest_day() {
            AssistantReply::text(composer::REST_DAY_REPLY)
        } else {
            AssistantReply::text(composer::not_in_plan(
                &exercise.exercise_name,
                &context.scheduled_exercise_names(),
            ))
        }
    }

    // ========================================================================
    // General conversation
    // ========================================================================

    async fn general_reply(&self, text: &str, context: &UserContext) -> AssistantReply {
        let Some(extractor) = self.extractor.as_deref() else {
            return AssistantReply::text(composer::HELP_REPLY);
        };

        let prompt = build_general_chat_prompt(Some(context), text);
        debug!(%prompt, "general conversation prompt");

        match extractor
            .complete_text(&prompt, self.timeouts.general_chat)
            .await
        {
            Ok(Some(answer)) if !answer.trim().is_empty() => {
                AssistantReply::text(answer.trim().to_owned())
            }
            Ok(_) => AssistantReply::text(composer::HELP_REPLY),
            Err(e) => {
                warn!(error = %e, "general conversation failed");
                AssistantReply::text(composer::HELP_REPLY)
            }
        }
    }
}

impl Default for ActionEngine {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::builtin()))
    }
}

impl std::fmt::Debug for ActionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionEngine")
            .field("has_extractor", &self.extractor.is_some())
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}
