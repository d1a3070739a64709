// ABOUTME: Salvages JSON objects from model output wrapped in code fences or surrounding prose
// ABOUTME: Direct parse, fence stripping, first balanced array, then first balanced object
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::{Map, Value};

/// One JSON object returned by a structured extraction
pub type JsonObject = Map<String, Value>;

/// Parse model output into a list of JSON objects
///
/// Tiers, first success wins:
/// 1. the whole (trimmed) text parses as an object or array
/// 2. the same after stripping Markdown code fences
/// 3. the first balanced `[...]` span that parses as an array
/// 4. the first balanced `{...}` span that parses as an object
///
/// Non-object array elements are dropped. Returns an empty list when nothing parses.
#[must_use]
pub fn parse_objects(raw: &str) -> Vec<JsonObject> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Some(objects) = parse_whole(trimmed) {
        return objects;
    }

    let unfenced = strip_code_fences(trimmed);
    if let Some(objects) = parse_whole(unfenced) {
        return objects;
    }

    for candidate in balanced_spans(unfenced, '[', ']') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(candidate) {
            return objects_only(items);
        }
    }

    for candidate in balanced_spans(unfenced, '{', '}') {
        if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(candidate) {
            return vec![object];
        }
    }

    Vec::new()
}

/// First object of a structured result, if any
#[must_use]
pub fn first_object(raw: &str) -> Option<JsonObject> {
    parse_objects(raw).into_iter().next()
}

fn parse_whole(text: &str) -> Option<Vec<JsonObject>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(object) => Some(vec![object]),
        Value::Array(items) => Some(objects_only(items)),
        _ => None,
    }
}

fn objects_only(items: Vec<Value>) -> Vec<JsonObject> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(object) => Some(object),
            _ => None,
        })
        .collect()
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` fence and a trailing fence
fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.trim_start_matches('`');
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    rest.trim_end().trim_end_matches('`').trim()
}

/// Spans starting at each `open` delimiter and ending at its matching `close`,
/// in order of their start position; delimiters inside JSON strings are ignored
fn balanced_spans(text: &str, open: char, close: char) -> impl Iterator<Item = &str> {
    text.char_indices()
        .filter(move |&(_, ch)| ch == open)
        .filter_map(move |(start, _)| {
            let end = matching_close(&text[start..], open, close)?;
            Some(&text[start..start + end])
        })
}

/// Byte length of the balanced span at the start of `text`, including the closing delimiter
fn matching_close(text: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(index + ch.len_utf8());
            }
        }
    }
    None
}

// ============================================================================
// Field readers
// ============================================================================

/// Non-blank string field
#[must_use]
pub fn get_str(object: &JsonObject, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        _ => None,
    }
}

/// Numeric field; numeric strings are accepted, negatives clamp to zero
#[must_use]
pub fn get_f64(object: &JsonObject, key: &str) -> Option<f64> {
    let value = match object.get(key)? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value.max(0.0))
}

/// Whole-number field; floats truncate, negatives clamp to zero
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn get_u32(object: &JsonObject, key: &str) -> Option<u32> {
    get_f64(object, key).map(|value| value.min(f64::from(u32::MAX)) as u32)
}

/// Boolean field; `"true"`/`"false"` strings are accepted
#[must_use]
pub fn get_bool(object: &JsonObject, key: &str) -> Option<bool> {
    match object.get(key)? {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => text.trim().parse::<bool>().ok(),
        _ => None,
    }
}

/// List of non-blank strings; a single string becomes a one-element list
#[must_use]
pub fn get_string_list(object: &JsonObject, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = match object.get(key)? {
        Value::Array(values) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect(),
        Value::String(text) if !text.trim().is_empty() => vec![text.trim().to_owned()],
        _ => return None,
    };
    (!items.is_empty()).then_some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_object() {
        let objects = parse_objects(r#"{"exercise_name": "Deadlift", "sets": 3}"#);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["exercise_name"], "Deadlift");
    }

    #[test]
    fn test_array_drops_non_objects() {
        let objects = parse_objects(r#"[{"a": 1}, 2, "x", {"b": 2}]"#);
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"meal_name\": \"Pasta\", \"calories\": 640}\n```";
        let objects = parse_objects(raw);
        assert_eq!(objects[0]["calories"], 640);
    }

    #[test]
    fn test_prose_around_object() {
        let raw = r#"Sure! Here is the result: {"exercise_name": null} Hope that helps {}"#;
        let object = first_object(raw).unwrap();
        assert!(object["exercise_name"].is_null());
    }

    #[test]
    fn test_array_preferred_over_object_in_prose() {
        let raw = r#"noise {"single": true} then [{"listed": true}] trailing"#;
        let objects = parse_objects(raw);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["listed"], true);
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let raw = r#"result: {"goal_specific_advice": "keep } calm", "calories": 10} end"#;
        let object = first_object(raw).unwrap();
        assert_eq!(object["calories"], 10);
    }

    #[test]
    fn test_garbage_yields_empty() {
        assert!(parse_objects("I could not tell what that is.").is_empty());
        assert!(parse_objects("").is_empty());
        assert!(parse_objects("{ not json").is_empty());
        assert!(parse_objects("42").is_empty());
    }

    #[test]
    fn test_field_readers_coerce() {
        let object = first_object(
            r#"{"sets": "4", "reps": 8.7, "weight_kg": -5, "flag": "true", "cues": ["a", " ", "b"], "name": "  "}"#,
        )
        .unwrap();
        assert_eq!(get_u32(&object, "sets"), Some(4));
        assert_eq!(get_u32(&object, "reps"), Some(8));
        assert_eq!(get_f64(&object, "weight_kg"), Some(0.0));
        assert_eq!(get_bool(&object, "flag"), Some(true));
        assert_eq!(get_string_list(&object, "cues"), Some(vec!["a".to_owned(), "b".to_owned()]));
        assert_eq!(get_str(&object, "name"), None);
        assert_eq!(get_u32(&object, "missing"), None);
    }
}
