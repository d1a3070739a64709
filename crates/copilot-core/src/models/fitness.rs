// ABOUTME: Fitness domain records read by the context builder: profile, plans and logs
// ABOUTME: Goal and activity enums carry their wire names and display labels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body-composition goal driving the calorie adjustment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalMethod {
    /// Hold weight
    #[default]
    Maintenance,
    /// Lose 0.2 kg per week
    VerySlowCut,
    /// Lose 0.25 kg per week
    SlowCut,
    /// Lose 0.5 kg per week
    StandardCut,
    /// Lose 0.75 kg per week
    AggressiveCut,
    /// Lose 1.0 kg per week
    VeryAggressiveCut,
    /// Gain 0.25 kg per week
    SlowGain,
    /// Gain 0.5 kg per week
    ModerateGain,
    /// User-specified weekly change
    Custom,
}

impl GoalMethod {
    /// Snake-case wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Maintenance => "maintenance",
            Self::VerySlowCut => "very_slow_cut",
            Self::SlowCut => "slow_cut",
            Self::StandardCut => "standard_cut",
            Self::AggressiveCut => "aggressive_cut",
            Self::VeryAggressiveCut => "very_aggressive_cut",
            Self::SlowGain => "slow_gain",
            Self::ModerateGain => "moderate_gain",
            Self::Custom => "custom",
        }
    }
}

/// Daily activity level scaling BMR into TDEE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Desk job, little exercise
    Sedentary,
    /// Light exercise 1-3 days a week
    LightlyActive,
    /// Moderate exercise 3-5 days a week
    #[default]
    ModeratelyActive,
    /// Hard exercise 6-7 days a week
    VeryActive,
    /// Physical job plus training
    ExtraActive,
}

impl ActivityLevel {
    /// Snake-case wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::LightlyActive => "lightly_active",
            Self::ModeratelyActive => "moderately_active",
            Self::VeryActive => "very_active",
            Self::ExtraActive => "extra_active",
        }
    }
}

/// Biological sex as used by the BMR formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
}

impl Sex {
    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// User profile; every body metric is optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Owning user
    pub user_id: Uuid,
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Age in years
    pub age: Option<u32>,
    /// Biological sex
    pub sex: Option<Sex>,
    /// Body fat percentage, enables the lean-mass BMR formula
    pub body_fat_percentage: Option<f64>,
    /// Goal method
    pub goal_method: Option<GoalMethod>,
    /// Activity level
    pub activity_level: Option<ActivityLevel>,
    /// Weekly change for the custom goal, in kilograms
    pub custom_kg_per_week: Option<f64>,
    /// Explicit daily calorie adjustment overriding the weekly goal
    pub custom_kcal_per_day: Option<f64>,
    /// Protein multiplier in grams per kilogram
    pub protein_g_per_kg: f64,
    /// Training program the user follows
    pub selected_program_id: Option<Uuid>,
    /// Day of the week treated as "today", 0 = Monday
    pub simulated_day: u8,
}

impl Profile {
    /// Profile with no metrics, no program and Monday as the simulated day
    #[must_use]
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            weight_kg: None,
            height_cm: None,
            age: None,
            sex: None,
            body_fat_percentage: None,
            goal_method: None,
            activity_level: None,
            custom_kg_per_week: None,
            custom_kcal_per_day: None,
            protein_g_per_kg: crate::constants::profile_defaults::PROTEIN_G_PER_KG,
            selected_program_id: None,
            simulated_day: 0,
        }
    }
}

/// One planned meal for a day of the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanItem {
    /// Day index, 0 = Monday
    pub day_of_week: u8,
    /// Meal slot
    pub meal_type: String,
    /// Planned dish
    pub item_name: String,
    /// Energy in kcal
    pub calories: u32,
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrates in grams
    pub carbs_g: f64,
    /// Fat in grams
    pub fat_g: f64,
}

/// One scheduled exercise of a training program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineItem {
    /// Day index, 0 = Monday
    pub day_of_week: u8,
    /// Canonical exercise name
    pub exercise_name: String,
    /// Target sets
    pub sets: u32,
    /// Target reps
    pub reps: u32,
    /// Target load in kilograms
    pub target_load_kg: f64,
}

/// Sets, reps and weight actually performed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLogItem {
    /// Exercise name as logged
    pub exercise_name: String,
    /// Sets performed
    pub sets: u32,
    /// Reps per set
    pub reps: u32,
    /// Load in kilograms
    pub weight_kg: f64,
}

/// Persisted meal log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLog {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Simulated day the log counts toward
    pub simulated_day: u8,
    /// Meal name
    pub meal_name: String,
    /// Meal slot
    pub meal_type: String,
    /// Energy in kcal
    pub calories: u32,
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrates in grams
    pub carbs_g: f64,
    /// Fat in grams
    pub fat_g: f64,
    /// Real wall-clock time of logging
    pub logged_at: DateTime<Utc>,
}

/// Persisted exercise log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Simulated day the log counts toward
    pub simulated_day: u8,
    /// Exercise name
    pub exercise_name: String,
    /// Sets performed
    pub sets: u32,
    /// Reps per set
    pub reps: u32,
    /// Load in kilograms
    pub weight_kg: f64,
    /// Real wall-clock time of logging
    pub logged_at: DateTime<Utc>,
}

impl ExerciseLog {
    /// Performed values without identity or timestamps
    #[must_use]
    pub fn to_item(&self) -> ExerciseLogItem {
        ExerciseLogItem {
            exercise_name: self.exercise_name.clone(),
            sets: self.sets,
            reps: self.reps,
            weight_kg: self.weight_kg,
        }
    }
}
