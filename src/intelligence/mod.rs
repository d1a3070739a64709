// ABOUTME: Body-metric arithmetic consumed by the context builder
// ABOUTME: Daily calorie and protein targets derived from profile measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// BMR/TDEE target calculator
pub mod targets;

pub use targets::{DailyTargets, EnergyTargetCalculator, TargetCalculator};
