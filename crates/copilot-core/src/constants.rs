// ABOUTME: Domain constants for the copilot engine: defaults, history caps and time budgets
// ABOUTME: Grouped by concern so config, context building and the engine share one source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Hardcoded domain constants. Environment overrides live in the root crate's
//! `config` module and fall back to the values defined here.

/// Profile defaults substituted when a user record is missing or incomplete
pub mod profile_defaults {
    /// Body weight used when none is recorded
    pub const WEIGHT_KG: f64 = 70.0;
    /// Height used when none is recorded
    pub const HEIGHT_CM: f64 = 170.0;
    /// Goal method used when none is recorded
    pub const GOAL_METHOD: &str = "maintenance";
    /// Activity level used when none is recorded
    pub const ACTIVITY_LEVEL: &str = "moderately_active";
    /// Sex used when none is recorded
    pub const SEX: &str = "unknown";
    /// Protein multiplier (grams per kilogram of body weight)
    pub const PROTEIN_G_PER_KG: f64 = 2.0;
}

/// Daily targets used when neither a meal plan nor a calculator result exists
pub mod target_defaults {
    /// Calorie target
    pub const CALORIES: u32 = 2000;
    /// Protein target in grams
    pub const PROTEIN_G: f64 = 150.0;
}

/// Chat history bounds applied before context reaches any generative call
pub mod history {
    /// Maximum number of chat entries
    pub const MAX_MESSAGES: usize = 10;
    /// Maximum cumulative characters across all entries
    pub const MAX_CHARS: usize = 10_000;
    /// Entries embedded in prompt system context
    pub const PROMPT_TAIL: usize = 5;
}

/// Time budgets for generative calls, in seconds
pub mod timeouts {
    /// Exercise extraction
    pub const EXERCISE_EXTRACTION_SECS: u64 = 10;
    /// General conversation reply
    pub const GENERAL_CHAT_SECS: u64 = 15;
    /// Image classification and analysis
    pub const IMAGE_ANALYSIS_SECS: u64 = 30;
    /// Fetching an image referenced by URL
    pub const IMAGE_FETCH_SECS: u64 = 10;
}

/// Retry policy for rate-limited generative calls
pub mod retry {
    /// Total attempts, including the first
    pub const MAX_ATTEMPTS: u32 = 3;
    /// Backoff unit in milliseconds; retry `n` waits `unit * 2^n`
    pub const BACKOFF_UNIT_MS: u64 = 1_000;
}

/// Deterministic matcher defaults and unit conversion
pub mod matcher {
    /// Sets assumed when the message names none
    pub const DEFAULT_SETS: u32 = 3;
    /// Reps assumed when the message names none
    pub const DEFAULT_REPS: u32 = 10;
    /// Weight assumed when the message names none
    pub const DEFAULT_WEIGHT_KG: f64 = 0.0;
    /// Pounds to kilograms
    pub const LBS_TO_KG: f64 = 0.453_592;
    /// Meal type stamped on text-logged food
    pub const DEFAULT_MEAL_TYPE: &str = "snack";
}

/// Field defaults for generatively extracted exercises
pub mod extraction_defaults {
    /// Sets when the model omits them
    pub const SETS: u32 = 1;
    /// Reps when the model omits them
    pub const REPS: u32 = 10;
    /// Weight when the model omits it
    pub const WEIGHT_KG: f64 = 0.0;
}

/// Field defaults for image analysis results
pub mod vision_defaults {
    /// Exercise name when the model omits it
    pub const EXERCISE_NAME: &str = "Unknown Exercise";
    /// Form cues when the model omits them
    pub const FORM_CUES: [&str; 2] = ["Maintain proper form", "Control the movement"];
    /// Suggested sets
    pub const SETS: u32 = 3;
    /// Suggested reps
    pub const REPS: u32 = 10;
    /// Suggested weight
    pub const WEIGHT_KG: f64 = 0.0;
    /// Meal name when the model omits it
    pub const MEAL_NAME: &str = "Unknown Meal";
    /// Calories
    pub const CALORIES: u32 = 300;
    /// Protein grams
    pub const PROTEIN_G: f64 = 15.0;
    /// Carb grams
    pub const CARBS_G: f64 = 30.0;
    /// Fat grams
    pub const FAT_G: f64 = 10.0;
}

/// Simulated week
pub mod week {
    /// Highest valid simulated day index (Sunday)
    pub const MAX_DAY_INDEX: u8 = 6;
    /// Display names, Monday first
    pub const DAY_NAMES: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];
}
