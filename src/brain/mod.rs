// ABOUTME: Conversation-to-action decision engine and its deterministic and generative tiers
// ABOUTME: Matcher, image analysis, reply composition and the priority-ordered engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Reply text and progress clauses
pub mod composer;
/// Priority-ordered decision engine
pub mod engine;
/// Keyword matching and numeric extraction
pub mod matcher;
/// Image classification and proposals
pub mod vision;

pub use engine::{ActionEngine, EngineTimeouts};
pub use matcher::{extract_sets_reps_weight, ExerciseNumbers, Matcher};
pub use vision::{ImageCategory, VisionAnalyzer, VisionOutcome};
