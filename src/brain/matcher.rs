// ABOUTME: Deterministic tier: trigger detection, longest-match lookup and numeric extraction
// ABOUTME: Sets, reps and weight are pulled with independent regex scans over the whole message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Deterministic Matcher
//!
//! Two procedures share the shape "trigger word, full match, field extraction".
//! The numeric extraction is not a parser: each field rescans the whole
//! lowercased message and the same number may satisfy more than one rule.
//! Precedence is sets, then reps (`x`/`for` form before the `N reps` form),
//! then weight (`kg` before `lbs`).

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use copilot_core::constants::matcher as defaults;
use copilot_core::models::{ExercisePayload, FoodPayload, MealEntry};

use crate::lexicon::{FoodEntry, Lexicon};
use crate::utils::text::title_case;

/// Sets, reps and weight read out of a message
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseNumbers {
    /// Sets, at least 1
    pub sets: u32,
    /// Reps per set, at least 1
    pub reps: u32,
    /// Load in kilograms
    pub weight_kg: f64,
}

impl Default for ExerciseNumbers {
    fn default() -> Self {
        Self {
            sets: defaults::DEFAULT_SETS,
            reps: defaults::DEFAULT_REPS,
            weight_kg: defaults::DEFAULT_WEIGHT_KG,
        }
    }
}

// ============================================================================
// Patterns
// ============================================================================

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn sets_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"(\d+)\s*(?:sets?|x)")
}

fn reps_after_marker_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"(?:x|for)\s*(\d+)(?:\s*reps?)?")
}

fn reps_suffix_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"(\d+)\s*reps?")
}

fn kg_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"(\d+(?:\.\d+)?)\s*(?:kg|kilos?)")
}

fn lbs_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"(\d+(?:\.\d+)?)\s*(?:lbs?|pounds?)")
}

fn first_capture<T: std::str::FromStr>(regex: Option<&Regex>, text: &str) -> Option<T> {
    regex?
        .captures(text)?
        .get(1)
        .and_then(|group| group.as_str().parse().ok())
}

/// Count captured by `regex`, saturating digit runs too large for `u32`
fn first_count(regex: Option<&Regex>, text: &str) -> Option<u32> {
    let digits = regex?.captures(text)?.get(1)?.as_str();
    Some(digits.parse().unwrap_or_else(|_| {
        debug!(digits, "count out of range, saturating");
        u32::MAX
    }))
}

/// Pull sets, reps and weight out of `text`, defaulting each missing field
///
/// Pounds are converted to kilograms. Zero sets or reps are raised to 1 and
/// counts beyond `u32` saturate.
#[must_use]
pub fn extract_sets_reps_weight(text: &str) -> ExerciseNumbers {
    let lower = text.to_lowercase();
    let mut numbers = ExerciseNumbers::default();

    if let Some(sets) = first_count(sets_regex(), &lower) {
        numbers.sets = sets.max(1);
    }

    let reps = first_count(reps_after_marker_regex(), &lower)
        .or_else(|| first_count(reps_suffix_regex(), &lower));
    if let Some(reps) = reps {
        numbers.reps = reps.max(1);
    }

    if let Some(kg) = first_capture::<f64>(kg_regex(), &lower) {
        numbers.weight_kg = kg;
    } else if let Some(lbs) = first_capture::<f64>(lbs_regex(), &lower) {
        numbers.weight_kg = lbs * defaults::LBS_TO_KG;
    }

    numbers
}

// ============================================================================
// Matcher
// ============================================================================

/// Deterministic classifier over a [`Lexicon`]
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> Matcher<'a> {
    /// Matcher over `lexicon`
    #[must_use]
    pub const fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Food trigger word or known food name present
    #[must_use]
    pub fn has_food_trigger(&self, text: &str) -> bool {
        self.lexicon.has_food_trigger(text)
    }

    /// Longest known food contained in `text`
    #[must_use]
    pub fn match_food(&self, text: &str) -> Option<&'a FoodEntry> {
        self.lexicon.lookup_food(text)
    }

    /// Exercise trigger word present
    #[must_use]
    pub fn has_exercise_trigger(&self, text: &str) -> bool {
        self.lexicon.has_exercise_trigger(text)
    }

    /// Canonical name of the longest alias contained in `text`
    #[must_use]
    pub fn match_exercise_alias(&self, text: &str) -> Option<&'a str> {
        self.lexicon.lookup_exercise(text)
    }

    /// Literal "reset" anywhere in the text
    #[must_use]
    pub fn has_reset_trigger(&self, text: &str) -> bool {
        self.lexicon.has_reset_trigger(text)
    }

    /// Exercise action from the alias table, with no schedule validation
    #[must_use]
    pub fn parse_exercise(&self, text: &str) -> Option<ExercisePayload> {
        let exercise_name = self.match_exercise_alias(text)?;
        let numbers = extract_sets_reps_weight(text);
        Some(ExercisePayload {
            exercise_name: exercise_name.to_owned(),
            sets: numbers.sets,
            reps: numbers.reps,
            weight_kg: numbers.weight_kg,
        })
    }
}

/// Food payload for a lexicon entry with the default meal type, macros copied unchanged
#[must_use]
pub fn food_payload(entry: &FoodEntry) -> FoodPayload {
    FoodPayload {
        food: entry.name.clone(),
        meal: MealEntry {
            meal_name: title_case(&entry.name),
            meal_type: defaults::DEFAULT_MEAL_TYPE.to_owned(),
            calories: entry.calories,
            protein_g: entry.protein_g,
            carbs_g: entry.carbs_g,
            fat_g: entry.fat_g,
        },
    }
}
