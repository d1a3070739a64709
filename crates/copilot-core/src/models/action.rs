// ABOUTME: Action tagged union emitted once per inbound message, with typed payloads
// ABOUTME: The serialized form is the wire contract the calling layer copies into logs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of an [`Action`], useful for logging and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Food log created immediately
    LogFood,
    /// Exercise log created immediately
    LogExercise,
    /// Food preview awaiting confirmation
    ProposeFood,
    /// Exercise preview awaiting confirmation
    ProposeExercise,
    /// Clear the simulated day's logs
    Reset,
    /// No structured action
    None,
}

impl ActionType {
    /// Wire name of the action type
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LogFood => "log_food",
            Self::LogExercise => "log_exercise",
            Self::ProposeFood => "propose_food",
            Self::ProposeExercise => "propose_exercise",
            Self::Reset => "reset",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meal fields shared by food logs and food proposals (kcal and grams)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    /// Display name of the meal
    pub meal_name: String,
    /// Meal slot (breakfast, lunch, dinner, snack)
    pub meal_type: String,
    /// Energy in kcal
    pub calories: u32,
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrates in grams
    pub carbs_g: f64,
    /// Fat in grams
    pub fat_g: f64,
}

/// Payload of a text-logged food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodPayload {
    /// Lexicon name the message matched
    pub food: String,
    /// Meal fields
    #[serde(flatten)]
    pub meal: MealEntry,
}

/// Payload of an image-derived food preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodProposal {
    /// Whether the preview has been confirmed into a log
    #[serde(rename = "isTracked")]
    pub is_tracked: bool,
    /// Meal fields
    #[serde(flatten)]
    pub meal: MealEntry,
}

/// Payload of a logged exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePayload {
    /// Canonical exercise name
    pub exercise_name: String,
    /// Sets performed, always positive
    pub sets: u32,
    /// Reps per set, always positive
    pub reps: u32,
    /// Load in kilograms
    pub weight_kg: f64,
}

/// Context kept out of the visible reply until the user asks for it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenContext {
    /// Technique reminders for the proposed exercise
    #[serde(rename = "formCues", default)]
    pub form_cues: Vec<String>,
}

/// Payload of an image-derived exercise preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProposal {
    /// Whether the preview has been confirmed into a log
    #[serde(rename = "isTracked")]
    pub is_tracked: bool,
    /// Suggested exercise fields
    #[serde(flatten)]
    pub exercise: ExercisePayload,
    /// Whether the exercise is scheduled for the simulated day
    #[serde(default)]
    pub in_plan: bool,
    /// Form cues shown on demand
    #[serde(rename = "hiddenContext", default)]
    pub hidden_context: HiddenContext,
}

/// Structured outcome of one inbound message
///
/// `PROPOSE_*` variants only come out of image analysis; `LOG_*` variants come
/// out of text matching or from confirming a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action_type", content = "action_data", rename_all = "snake_case")]
pub enum Action {
    /// Log a known food now
    LogFood(FoodPayload),
    /// Log an exercise now
    LogExercise(ExercisePayload),
    /// Preview a meal recognized in an image
    ProposeFood(FoodProposal),
    /// Preview an exercise recognized in an image
    ProposeExercise(ExerciseProposal),
    /// Clear the simulated day's logs
    Reset,
    /// Nothing to do
    None,
}

impl Action {
    /// Discriminant of this action
    #[must_use]
    pub const fn action_type(&self) -> ActionType {
        match self {
            Self::LogFood(_) => ActionType::LogFood,
            Self::LogExercise(_) => ActionType::LogExercise,
            Self::ProposeFood(_) => ActionType::ProposeFood,
            Self::ProposeExercise(_) => ActionType::ProposeExercise,
            Self::Reset => ActionType::Reset,
            Self::None => ActionType::None,
        }
    }

    /// Whether this action is a preview awaiting confirmation
    #[must_use]
    pub const fn is_proposal(&self) -> bool {
        matches!(self, Self::ProposeFood(_) | Self::ProposeExercise(_))
    }

    /// Tracking flag of a proposal; `None` for every other kind
    #[must_use]
    pub const fn is_tracked(&self) -> Option<bool> {
        match self {
            Self::ProposeFood(proposal) => Some(proposal.is_tracked),
            Self::ProposeExercise(proposal) => Some(proposal.is_tracked),
            _ => None,
        }
    }

    /// Flip a proposal to tracked, returning whether the flag changed
    pub fn mark_tracked(&mut self) -> bool {
        let flag = match self {
            Self::ProposeFood(proposal) => &mut proposal.is_tracked,
            Self::ProposeExercise(proposal) => &mut proposal.is_tracked,
            _ => return false,
        };
        if *flag {
            return false;
        }
        *flag = true;
        true
    }
}
