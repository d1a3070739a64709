// ABOUTME: Stateless BMR, TDEE and goal-adjusted daily target calculator
// ABOUTME: Katch-McArdle when body fat is known, Mifflin-St Jeor otherwise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Daily target calculation
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>
//!
//! - Katch, F.I., & McArdle, W.D. (1975). Prediction of body density from simple
//!   anthropometric measurements. *Human Biology*, 47(3), 283-296.

use serde::Serialize;

use copilot_core::models::{ActivityLevel, GoalMethod, Profile, Sex};

/// Energy stored in one kilogram of body weight change
pub const KCAL_PER_KG: f64 = 7700.0;

/// Days per week, used to spread a weekly weight change
const DAYS_PER_WEEK: f64 = 7.0;

/// Calorie and protein targets for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTargets {
    /// Energy target in kcal, never negative
    pub calories: u32,
    /// Protein target in grams
    pub protein_g: f64,
}

/// Computes daily targets from a profile
///
/// Returns `None` when the profile lacks the measurements a formula needs.
pub trait TargetCalculator: Send + Sync {
    /// Targets for `profile`, if computable
    fn compute_targets(&self, profile: &Profile) -> Option<DailyTargets>;
}

/// Default [`TargetCalculator`]: BMR x activity multiplier, adjusted for the goal
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyTargetCalculator;

impl TargetCalculator for EnergyTargetCalculator {
    fn compute_targets(&self, profile: &Profile) -> Option<DailyTargets> {
        let weight = profile.weight_kg?;
        let height = profile.height_cm?;
        let age = profile.age?;
        let sex = profile.sex?;

        let bmr = profile.body_fat_percentage.map_or_else(
            || mifflin_st_jeor(weight, height, age, sex),
            |body_fat| katch_mcardle(weight, body_fat),
        );
        let tdee = (bmr * activity_multiplier(profile.activity_level)).trunc();

        let calories = profile.custom_kcal_per_day.unwrap_or_else(|| {
            let weekly = weekly_weight_change(profile.goal_method, profile.custom_kg_per_week);
            tdee + daily_adjustment(weekly)
        });

        Some(DailyTargets {
            calories: kcal_to_u32(calories),
            protein_g: (profile.protein_g_per_kg * weight).max(0.0),
        })
    }
}

/// Mifflin-St Jeor: 10w + 6.25h - 5a, +5 for men, -161 otherwise
#[must_use]
pub fn mifflin_st_jeor(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> f64 {
    let base = 6.25_f64.mul_add(height_cm, 10.0 * weight_kg) - 5.0 * f64::from(age);
    let offset = match sex {
        Sex::Male => 5.0,
        Sex::Female => -161.0,
    };
    (base + offset).trunc()
}

/// Katch-McArdle: 370 + 21.6 x fat-free mass
#[must_use]
pub fn katch_mcardle(weight_kg: f64, body_fat_percentage: f64) -> f64 {
    let fat_free_mass = weight_kg * (1.0 - body_fat_percentage / 100.0);
    21.6_f64.mul_add(fat_free_mass, 370.0).trunc()
}

/// TDEE multiplier; unknown activity counts as sedentary
#[must_use]
pub const fn activity_multiplier(level: Option<ActivityLevel>) -> f64 {
    match level {
        None | Some(ActivityLevel::Sedentary) => 1.2,
        Some(ActivityLevel::LightlyActive) => 1.375,
        Some(ActivityLevel::ModeratelyActive) => 1.55,
        Some(ActivityLevel::VeryActive) => 1.725,
        Some(ActivityLevel::ExtraActive) => 1.9,
    }
}

/// Target body weight change in kg per week
#[must_use]
pub fn weekly_weight_change(goal: Option<GoalMethod>, custom_kg_per_week: Option<f64>) -> f64 {
    match goal {
        None | Some(GoalMethod::Maintenance) => 0.0,
        Some(GoalMethod::VerySlowCut) => -0.2,
        Some(GoalMethod::SlowCut) => -0.25,
        Some(GoalMethod::StandardCut) => -0.5,
        Some(GoalMethod::AggressiveCut) => -0.75,
        Some(GoalMethod::VeryAggressiveCut) => -1.0,
        Some(GoalMethod::SlowGain) => 0.25,
        Some(GoalMethod::ModerateGain) => 0.5,
        Some(GoalMethod::Custom) => custom_kg_per_week.unwrap_or(0.0),
    }
}

/// Daily kcal surplus (positive) or deficit (negative) for a weekly change
#[must_use]
pub fn daily_adjustment(weekly_change_kg: f64) -> f64 {
    (weekly_change_kg * KCAL_PER_KG / DAYS_PER_WEEK).trunc()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn kcal_to_u32(kcal: f64) -> u32 {
    if kcal.is_finite() {
        kcal.clamp(0.0, f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
