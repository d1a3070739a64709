// ABOUTME: Image path of the engine: classify a photo, analyze it, and emit a proposal
// ABOUTME: Gym equipment becomes PROPOSE_EXERCISE and food becomes PROPOSE_FOOD, never a direct log
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Image Analysis
//!
//! Two generative calls per image: a one-word classification, then a
//! structured analysis with a category-specific prompt. Missing or malformed
//! fields fall back to per-field defaults; an empty structured result yields
//! the default analysis for the category.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use copilot_core::constants::{matcher, vision_defaults};
use copilot_core::models::{
    Action, AssistantReply, ExercisePayload, ExerciseProposal, FoodProposal, HiddenContext,
    MealEntry,
};

use super::composer;
use crate::context::UserContext;
use crate::errors::AppResult;
use crate::llm::json::{get_bool, get_f64, get_str, get_string_list, get_u32};
use crate::llm::prompts::{
    build_food_analysis_prompt, build_gym_analysis_prompt, build_vision_system_context,
    IMAGE_CLASSIFICATION_PROMPT,
};
use crate::llm::{GenerativeExtractor, ImageSource, JsonObject};

/// What an image shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageCategory {
    /// Machines, free weights, other training equipment
    GymEquipment,
    /// Meals, snacks, drinks
    Food,
    /// Anything else
    Unknown,
}

impl ImageCategory {
    /// Interpret the classifier's free-text answer
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if label.contains("gym") || label.contains("equipment") {
            Self::GymEquipment
        } else if label.contains("food") {
            Self::Food
        } else {
            Self::Unknown
        }
    }
}

/// Structured reading of a gym equipment photo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GymEquipmentAnalysis {
    /// Exercise the equipment is used for
    pub exercise_name: String,
    /// Technique reminders
    pub form_cues: Vec<String>,
    /// Suggested sets, at least 1
    pub suggested_sets: u32,
    /// Suggested reps, at least 1
    pub suggested_reps: u32,
    /// Suggested load in kilograms
    pub suggested_weight_kg: f64,
    /// Model believes the exercise is on today's plan
    pub in_todays_plan: bool,
    /// Goal-aware tip, may be empty
    pub goal_specific_advice: String,
}

impl GymEquipmentAnalysis {
    /// Read an analysis object, defaulting each missing field
    #[must_use]
    pub fn from_object(object: &JsonObject) -> Self {
        Self {
            exercise_name: get_str(object, "exercise_name")
                .unwrap_or_else(|| vision_defaults::EXERCISE_NAME.to_owned()),
            form_cues: get_string_list(object, "form_cues").unwrap_or_else(default_form_cues),
            suggested_sets: get_u32(object, "suggested_sets")
                .unwrap_or(vision_defaults::SETS)
                .max(1),
            suggested_reps: get_u32(object, "suggested_reps")
                .unwrap_or(vision_defaults::REPS)
                .max(1),
            suggested_weight_kg: get_f64(object, "suggested_weight_kg")
                .unwrap_or(vision_defaults::WEIGHT_KG),
            in_todays_plan: get_bool(object, "in_todays_plan").unwrap_or(false),
            goal_specific_advice: get_str(object, "goal_specific_advice").unwrap_or_default(),
        }
    }
}

impl Default for GymEquipmentAnalysis {
    fn default() -> Self {
        Self {
            exercise_name: vision_defaults::EXERCISE_NAME.to_owned(),
            form_cues: default_form_cues(),
            suggested_sets: vision_defaults::SETS,
            suggested_reps: vision_defaults::REPS,
            suggested_weight_kg: vision_defaults::WEIGHT_KG,
            in_todays_plan: false,
            goal_specific_advice: String::new(),
        }
    }
}

/// Structured reading of a food photo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodAnalysis {
    /// Short meal description
    pub meal_name: String,
    /// Estimated energy in kcal
    pub calories: u32,
    /// Estimated protein grams
    pub protein_g: f64,
    /// Estimated carbohydrate grams
    pub carbs_g: f64,
    /// Estimated fat grams
    pub fat_g: f64,
    /// Goal-aware tip, may be empty
    pub goal_specific_advice: String,
}

impl FoodAnalysis {
    /// Read an analysis object, defaulting each missing field
    #[must_use]
    pub fn from_object(object: &JsonObject) -> Self {
        Self {
            meal_name: get_str(object, "meal_name")
                .unwrap_or_else(|| vision_defaults::MEAL_NAME.to_owned()),
            calories: get_u32(object, "calories").unwrap_or(vision_defaults::CALORIES),
            protein_g: get_f64(object, "protein_g").unwrap_or(vision_defaults::PROTEIN_G),
            carbs_g: get_f64(object, "carbs_g").unwrap_or(vision_defaults::CARBS_G),
            fat_g: get_f64(object, "fat_g").unwrap_or(vision_defaults::FAT_G),
            goal_specific_advice: get_str(object, "goal_specific_advice").unwrap_or_default(),
        }
    }
}

impl Default for FoodAnalysis {
    fn default() -> Self {
        Self {
            meal_name: vision_defaults::MEAL_NAME.to_owned(),
            calories: vision_defaults::CALORIES,
            protein_g: vision_defaults::PROTEIN_G,
            carbs_g: vision_defaults::CARBS_G,
            fat_g: vision_defaults::FAT_G,
            goal_specific_advice: String::new(),
        }
    }
}

fn default_form_cues() -> Vec<String> {
    vision_defaults::FORM_CUES
        .iter()
        .map(|cue| (*cue).to_owned())
        .collect()
}

/// Result of analyzing one image
#[derive(Debug, Clone, PartialEq)]
pub enum VisionOutcome {
    /// Gym equipment recognised
    Gym(GymEquipmentAnalysis),
    /// Food recognised
    Food(FoodAnalysis),
    /// Neither
    Unrecognized,
}

/// Runs classification and analysis against a generative extractor
pub struct VisionAnalyzer<'a> {
    extractor: &'a dyn GenerativeExtractor,
    budget: Duration,
}

impl<'a> VisionAnalyzer<'a> {
    /// Analyzer giving each generative call `budget`
    #[must_use]
    pub fn new(extractor: &'a dyn GenerativeExtractor, budget: Duration) -> Self {
        Self { extractor, budget }
    }

    /// Classify the image; no answer counts as unknown
    ///
    /// # Errors
    ///
    /// Returns an error when the extractor fails for a reason other than timeout
    /// or rate-limit exhaustion.
    pub async fn classify(&self, image: &ImageSource) -> AppResult<ImageCategory> {
        let label = self
            .extractor
            .complete_text_with_image(IMAGE_CLASSIFICATION_PROMPT, image, self.budget)
            .await?;
        let category = label
            .as_deref()
            .map_or(ImageCategory::Unknown, ImageCategory::from_label);
        debug!(?label, ?category, "classified image");
        Ok(category)
    }

    /// Classify, then run the category-specific analysis
    ///
    /// # Errors
    ///
    /// Returns an error when either generative call fails for a reason other
    /// than timeout or rate-limit exhaustion.
    pub async fn analyze(
        &self,
        image: &ImageSource,
        context: &UserContext,
    ) -> AppResult<VisionOutcome> {
        let category = self.classify(image).await?;
        if category == ImageCategory::Unknown {
            return Ok(VisionOutcome::Unrecognized);
        }

        let system_context = build_vision_system_context(context);
        let prompt = match category {
            ImageCategory::GymEquipment => build_gym_analysis_prompt(&system_context),
            ImageCategory::Food | ImageCategory::Unknown => {
                build_food_analysis_prompt(&system_context)
            }
        };

        let objects = self
            .extractor
            .complete_structured_with_image(&prompt, image, self.budget)
            .await?;
        let first = objects.first();

        Ok(match category {
            ImageCategory::GymEquipment => VisionOutcome::Gym(
                first.map_or_else(GymEquipmentAnalysis::default, GymEquipmentAnalysis::from_object),
            ),
            ImageCategory::Food | ImageCategory::Unknown => VisionOutcome::Food(
                first.map_or_else(FoodAnalysis::default, FoodAnalysis::from_object),
            ),
        })
    }
}

/// Turn an analysis into the reply the user sees
#[must_use]
pub fn proposal_reply(outcome: VisionOutcome, context: &UserContext) -> AssistantReply {
    match outcome {
        VisionOutcome::Gym(analysis) => {
            let in_plan = analysis.in_todays_plan || context.is_scheduled(&analysis.exercise_name);
            let outside_program = !context.allowed_exercise_names.is_empty()
                && !context.is_allowed(&analysis.exercise_name);
            let exercise = ExercisePayload {
                exercise_name: analysis.exercise_name,
                sets: analysis.suggested_sets,
                reps: analysis.suggested_reps,
                weight_kg: analysis.suggested_weight_kg,
            };
            info!(
                exercise = %exercise.exercise_name,
                in_plan,
                outside_program,
                "proposing exercise from image"
            );
            let content = composer::exercise_proposal(
                &exercise,
                in_plan,
                &analysis.goal_specific_advice,
                outside_program,
            );
            AssistantReply::new(
                content,
                Action::ProposeExercise(ExerciseProposal {
                    is_tracked: false,
                    exercise,
                    in_plan,
                    hidden_context: HiddenContext {
                        form_cues: analysis.form_cues,
                    },
                }),
            )
        }
        VisionOutcome::Food(analysis) => {
            let meal = MealEntry {
                meal_name: analysis.meal_name,
                meal_type: matcher::DEFAULT_MEAL_TYPE.to_owned(),
                calories: analysis.calories,
                protein_g: analysis.protein_g,
                carbs_g: analysis.carbs_g,
                fat_g: analysis.fat_g,
            };
            info!(meal = %meal.meal_name, calories = meal.calories, "proposing meal from image");
            let content = composer::food_proposal(&meal, &analysis.goal_specific_advice);
            AssistantReply::new(
                content,
                Action::ProposeFood(FoodProposal {
                    is_tracked: false,
                    meal,
                }),
            )
        }
        VisionOutcome::Unrecognized => AssistantReply::text(composer::VISION_UNKNOWN_REPLY),
    }
}
