// ABOUTME: Demo personas seeded into a store for the CLI, benches and tests
// ABOUTME: A five-day push/pull/legs program plus a weekly meal plan per persona
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use copilot_core::errors::AppError;
use copilot_core::models::{ActivityLevel, GoalMethod, MealPlanItem, Profile, RoutineItem, Sex};

use super::InMemoryStore;

/// Push, pull, legs, push, pull; weekend off
const PROGRAM: &[(u8, &str, u32, u32, f64)] = &[
    (0, "Bench Press", 4, 6, 70.0),
    (0, "Overhead Press", 4, 8, 40.0),
    (0, "Dips", 3, 10, 0.0),
    (1, "Deadlift", 4, 5, 100.0),
    (1, "Pull-up", 4, 8, 0.0),
    (1, "Barbell Row", 4, 8, 60.0),
    (1, "Bicep Curl", 3, 10, 12.0),
    (2, "Barbell Squat", 4, 6, 90.0),
    (2, "Romanian Deadlift", 3, 10, 70.0),
    (2, "Leg Press", 3, 12, 120.0),
    (2, "Calf Raises", 4, 15, 50.0),
    (3, "Incline Dumbbell Press", 4, 10, 25.0),
    (3, "Dumbbell Press", 3, 10, 30.0),
    (3, "Lunges", 3, 12, 20.0),
    (4, "Lat Pulldown", 4, 10, 55.0),
    (4, "Barbell Row", 4, 10, 50.0),
    (4, "Bicep Curl", 3, 12, 14.0),
];

/// Meal slot, name, kcal, protein, carbs, fat
const DAILY_MEALS: &[(&str, &str, u32, f64, f64, f64)] = &[
    ("breakfast", "Oatmeal with Berries", 350, 12.0, 60.0, 7.0),
    ("lunch", "Chicken and Rice Bowl", 650, 50.0, 75.0, 12.0),
    ("snack", "Greek Yogurt", 150, 15.0, 12.0, 4.0),
    ("dinner", "Salmon with Vegetables", 600, 42.0, 30.0, 32.0),
];

const BULK_EXTRA: (&str, &str, u32, f64, f64, f64) =
    ("snack", "Peanut Butter Toast", 400, 14.0, 38.0, 20.0);

/// Built-in demo user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DemoPersona {
    /// Male, 85 kg, standard cut
    #[default]
    Cut,
    /// Male, 90 kg, moderate gain
    Bulk,
    /// Female, 60 kg, maintenance, no meal plan
    Maintain,
}

impl DemoPersona {
    /// Lowercase persona name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cut => "cut",
            Self::Bulk => "bulk",
            Self::Maintain => "maintain",
        }
    }

    /// Profile for `user_id` following `program_id`
    #[must_use]
    pub fn profile(self, user_id: Uuid, program_id: Uuid) -> Profile {
        let (sex, weight_kg, height_cm, age, goal, activity) = match self {
            Self::Cut => (
                Sex::Male,
                85.0,
                180.0,
                30,
                GoalMethod::StandardCut,
                ActivityLevel::ModeratelyActive,
            ),
            Self::Bulk => (
                Sex::Male,
                90.0,
                185.0,
                25,
                GoalMethod::ModerateGain,
                ActivityLevel::VeryActive,
            ),
            Self::Maintain => (
                Sex::Female,
                60.0,
                165.0,
                28,
                GoalMethod::Maintenance,
                ActivityLevel::LightlyActive,
            ),
        };

        Profile {
            weight_kg: Some(weight_kg),
            height_cm: Some(height_cm),
            age: Some(age),
            sex: Some(sex),
            goal_method: Some(goal),
            activity_level: Some(activity),
            selected_program_id: Some(program_id),
            ..Profile::empty(user_id)
        }
    }

    /// Weekly meal plan; empty for the maintenance persona
    #[must_use]
    pub fn meal_plan(self) -> Vec<MealPlanItem> {
        let extra: &[_] = match self {
            Self::Cut => &[],
            Self::Bulk => &[BULK_EXTRA],
            Self::Maintain => return Vec::new(),
        };

        (0..7u8)
            .flat_map(|day| {
                DAILY_MEALS
                    .iter()
                    .chain(extra)
                    .map(move |&(meal_type, name, calories, protein_g, carbs_g, fat_g)| {
                        MealPlanItem {
                            day_of_week: day,
                            meal_type: meal_type.to_owned(),
                            item_name: name.to_owned(),
                            calories,
                            protein_g,
                            carbs_g,
                            fat_g,
                        }
                    })
            })
            .collect()
    }
}

impl fmt::Display for DemoPersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemoPersona {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cut" => Ok(Self::Cut),
            "bulk" => Ok(Self::Bulk),
            "maintain" | "maintenance" => Ok(Self::Maintain),
            other => Err(AppError::invalid_input(format!(
                "unknown persona '{other}', expected cut, bulk or maintain"
            ))),
        }
    }
}

/// Weekly demo routine
#[must_use]
pub fn demo_program() -> Vec<RoutineItem> {
    PROGRAM
        .iter()
        .map(|&(day, name, sets, reps, load)| RoutineItem {
            day_of_week: day,
            exercise_name: name.to_owned(),
            sets,
            reps,
            target_load_kg: load,
        })
        .collect()
}

/// Seed `persona` as a new user on `day`, returning the user id
pub fn seed_persona(store: &InMemoryStore, persona: DemoPersona, day: u8) -> Uuid {
    let user_id = Uuid::new_v4();
    let program_id = Uuid::new_v4();

    store.set_routine(program_id, demo_program());
    store.set_meal_plan(user_id, persona.meal_plan());
    store.upsert_profile(Profile {
        simulated_day: day,
        ..persona.profile(user_id, program_id)
    });
    user_id
}
