// ABOUTME: Text helpers for reply and prompt rendering: title casing and progress percentages
// ABOUTME: Pure functions, no allocation beyond the returned strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Capitalize the first letter of every alphabetic run and lowercase the rest
///
/// `"grilled chicken salad"` becomes `"Grilled Chicken Salad"`.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(ch);
            previous_alpha = false;
        }
    }
    out
}

/// Turn a snake-case identifier into a display label (`"standard_cut"` to `"Standard Cut"`)
#[must_use]
pub fn humanize(identifier: &str) -> String {
    title_case(&identifier.replace('_', " "))
}

/// Whole-number percentage of `value` against `target`, truncated; 0 when the target is not positive
#[must_use]
pub fn percent_of(value: f64, target: f64) -> i64 {
    if target > 0.0 {
        (value / target * 100.0) as i64
    } else {
        0
    }
}
