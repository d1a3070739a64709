// ABOUTME: Static knowledge tables for the deterministic tier: foods, exercise aliases, triggers
// ABOUTME: Tables are sorted longest-phrase-first once at construction and never mutated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Lexicon
//!
//! Known foods with macros, food trigger words, exercise aliases and exercise
//! trigger words. Lookups are case-insensitive substring containment tests.
//!
//! Matching order is longest phrase first, so "grilled chicken salad" wins over
//! "chicken" and "incline dumbbell press" wins over "press". Entries of equal
//! length keep their declaration order. The ordering is computed once in
//! [`Lexicon::new`]; lookups never sort.


/// Macros for one known food (per typical serving)
#[derive(Debug, Clone, PartialEq)]
pub struct FoodEntry {
    /// Lowercase matchable name
    pub name: String,
    /// Energy in kcal
    pub calories: u32,
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrates in grams
    pub carbs_g: f64,
    /// Fat in grams
    pub fat_g: f64,
}

impl FoodEntry {
    /// Build an entry; the name is lowercased
    #[must_use]
    pub fn new(name: &str, calories: u32, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            name: name.to_lowercase(),
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }
}

/// Matchable phrase resolving to a canonical exercise name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseAlias {
    /// Lowercase phrase searched for in messages
    pub phrase: String,
    /// Display name the phrase resolves to
    pub canonical: String,
}

impl ExerciseAlias {
    /// Build an alias; the phrase is lowercased
    #[must_use]
    pub fn new(phrase: &str, canonical: &str) -> Self {
        Self {
            phrase: phrase.to_lowercase(),
            canonical: canonical.to_owned(),
        }
    }
}

// ============================================================================
// Built-in tables
// ============================================================================

/// (name, kcal, protein g, carbs g, fat g)
const FOODS: &[(&str, u32, f64, f64, f64)] = &[
    // Complete dishes
    ("grilled chicken salad", 450, 42.0, 18.0, 22.0),
    ("chicken salad", 450, 42.0, 18.0, 22.0),
    ("oatmeal with berries", 320, 12.0, 52.0, 8.0),
    ("oatmeal", 320, 12.0, 52.0, 8.0),
    ("eggs and avocado toast", 480, 22.0, 35.0, 28.0),
    ("avocado toast", 480, 22.0, 35.0, 28.0),
    ("rice and grilled chicken", 550, 45.0, 55.0, 12.0),
    ("rice and chicken", 550, 45.0, 55.0, 12.0),
    ("protein shake", 200, 30.0, 10.0, 4.0),
    ("shake", 200, 30.0, 10.0, 4.0),
    // Single ingredients
    ("banana", 105, 1.3, 27.0, 0.4),
    ("chicken", 165, 31.0, 0.0, 3.6),
    ("rice", 206, 4.3, 45.0, 0.4),
    ("eggs", 155, 13.0, 1.1, 11.0),
    ("oats", 150, 5.0, 27.0, 3.0),
    ("salmon", 208, 20.0, 0.0, 13.0),
    ("broccoli", 55, 3.7, 11.0, 0.6),
    ("apple", 95, 0.5, 25.0, 0.3),
    ("bread", 79, 2.7, 15.0, 1.0),
    ("milk", 149, 8.0, 12.0, 8.0),
];

const FOOD_TRIGGERS: &[&str] = &[
    "ate",
    "eaten",
    "had",
    "breakfast",
    "lunch",
    "dinner",
    "snack",
    "eating",
    "eat",
];

const EXERCISE_ALIASES: &[(&str, &str)] = &[
    // Bench variations
    ("incline dumbbell press", "Incline Dumbbell Press"),
    ("incline bench press", "Incline Bench Press"),
    ("flat bench press", "Bench Press"),
    ("bench press", "Bench Press"),
    ("dumbbell press", "Dumbbell Press"),
    ("incline press", "Incline Dumbbell Press"),
    ("bench", "Bench Press"),
    // Squats
    ("barbell squat", "Barbell Squat"),
    ("squat", "Barbell Squat"),
    // Deadlifts
    ("romanian deadlift", "Romanian Deadlift"),
    ("rdl", "Romanian Deadlift"),
    ("deadlift", "Deadlift"),
    // Presses
    ("overhead press", "Overhead Press"),
    ("shoulder press", "Overhead Press"),
    ("military press", "Overhead Press"),
    ("leg press", "Leg Press"),
    ("legpress", "Leg Press"),
    ("press", "Overhead Press"),
    // Rows
    ("barbell row", "Barbell Row"),
    ("row", "Barbell Row"),
    // Accessories
    ("bicep curl", "Bicep Curl"),
    ("curl", "Bicep Curl"),
    ("pullup", "Pull-up"),
    ("pull-up", "Pull-up"),
    ("pull up", "Pull-up"),
    ("lat pulldown", "Lat Pulldown"),
    ("pulldown", "Lat Pulldown"),
    ("dip", "Dips"),
    ("dips", "Dips"),
    ("lunge", "Lunges"),
    ("lunges", "Lunges"),
    ("calf raise", "Calf Raises"),
    ("calf", "Calf Raises"),
];

const EXERCISE_TRIGGERS: &[&str] = &[
    "bench", "squat", "deadlift", "press", "row", "curl", "sets", "reps", "kg", "lbs", "pullup",
    "pull-up", "pull up", "pulldown", "dip", "dips", "leg press", "legpress", "lunge", "lunges",
    "calf", "rdl", "romanian", "incline", "dumbbell", "barbell", "military", "shoulder",
    "overhead",
];

const RESET_TRIGGER: &str = "reset";

// ============================================================================
// Lexicon
// ============================================================================

/// Immutable keyword tables shared by every request
#[derive(Debug, Clone)]
pub struct Lexicon {
    foods: Vec<FoodEntry>,
    food_triggers: Vec<String>,
    aliases: Vec<ExerciseAlias>,
    exercise_triggers: Vec<String>,
}

impl Lexicon {
    /// Build a lexicon from custom tables, sorting phrases longest first
    #[must_use]
    pub fn new(
        mut foods: Vec<FoodEntry>,
        food_triggers: Vec<String>,
        mut aliases: Vec<ExerciseAlias>,
        exercise_triggers: Vec<String>,
    ) -> Self {
        // sort_by_key is stable: equal lengths keep declaration order
        foods.sort_by_key(|food| std::cmp::Reverse(food.name.chars().count()));
        aliases.sort_by_key(|alias| std::cmp::Reverse(alias.phrase.chars().count()));
        Self {
            foods,
            food_triggers: food_triggers.iter().map(|t| t.to_lowercase()).collect(),
            aliases,
            exercise_triggers: exercise_triggers.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Built-in English tables
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            FOODS
                .iter()
                .map(|&(name, kcal, protein, carbs, fat)| {
                    FoodEntry::new(name, kcal, protein, carbs, fat)
                })
                .collect(),
            FOOD_TRIGGERS.iter().map(|&t| t.to_owned()).collect(),
            EXERCISE_ALIASES
                .iter()
                .map(|&(phrase, canonical)| ExerciseAlias::new(phrase, canonical))
                .collect(),
            EXERCISE_TRIGGERS.iter().map(|&t| t.to_owned()).collect(),
        )
    }

    /// Longest known food contained in `text`
    #[must_use]
    pub fn lookup_food(&self, text: &str) -> Option<&FoodEntry> {
        let lower = text.to_lowercase();
        self.foods.iter().find(|food| lower.contains(&food.name))
    }

    /// Canonical exercise for the longest alias contained in `text`
    #[must_use]
    pub fn lookup_exercise(&self, text: &str) -> Option<&str> {
        self.lookup_alias(text).map(|alias| alias.canonical.as_str())
    }

    /// Longest alias contained in `text`
    #[must_use]
    pub fn lookup_alias(&self, text: &str) -> Option<&ExerciseAlias> {
        let lower = text.to_lowercase();
        self.aliases.iter().find(|alias| lower.contains(&alias.phrase))
    }

    /// Whether `text` contains a food trigger word or a known food name
    #[must_use]
    pub fn has_food_trigger(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.food_triggers.iter().any(|t| lower.contains(t.as_str()))
            || self.foods.iter().any(|food| lower.contains(&food.name))
    }

    /// Whether `text` contains an exercise trigger word
    #[must_use]
    pub fn has_exercise_trigger(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.exercise_triggers
            .iter()
            .any(|t| lower.contains(t.as_str()))
    }

    /// Whether `text` contains "reset" anywhere, including inside other words
    #[must_use]
    pub fn has_reset_trigger(&self, text: &str) -> bool {
        text.to_lowercase().contains(RESET_TRIGGER)
    }

    /// Foods in matching order
    #[must_use]
    pub fn foods(&self) -> &[FoodEntry] {
        &self.foods
    }

    /// Aliases in matching order
    #[must_use]
    pub fn aliases(&self) -> &[ExerciseAlias] {
        &self.aliases
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}
