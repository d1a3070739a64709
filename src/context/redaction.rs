// ABOUTME: Strips attachment URLs and binary/base64 payloads from chat history text
// ABOUTME: Applied to every history turn before context can reach a generative prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! History sanitation for prompts
//!
//! History is sourced as role + text only, so attachment fields never enter it.
//! Text can still carry pasted payloads; this module removes:
//! - `data:` URIs with base64 bodies
//! - long base64 runs (pasted image bytes)
//! - base64 image payloads of any length, recognised by their PNG, JPEG, GIF
//!   or WebP signature
//! - http(s) URLs (uploaded media links)

use bitflags::bitflags;
use regex::Regex;
use std::sync::OnceLock;

/// Shortest unbroken base64-alphabet run treated as binary
const BASE64_RUN_MIN: usize = 100;

/// Base64 encodings of the PNG, JPEG, GIF and WebP magic bytes
const IMAGE_SIGNATURES: [&str; 4] = ["iVBORw0KGgo", "/9j/", "R0lGOD", "UklGR"];

bitflags! {
    /// Which payload classes to strip
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RedactionFeatures: u8 {
        /// `data:<mime>;base64,...` URIs
        const DATA_URIS = 0b0001;
        /// Long base64 runs
        const BASE64_RUNS = 0b0010;
        /// http(s) links
        const URLS = 0b0100;
        /// Base64 image payloads of any length, by signature
        const IMAGE_SIGNATURES = 0b1000;
        /// Everything
        const ALL = Self::DATA_URIS.bits()
            | Self::BASE64_RUNS.bits()
            | Self::URLS.bits()
            | Self::IMAGE_SIGNATURES.bits();
    }
}

/// Configuration for history redaction
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    /// Which payload classes to strip
    pub features: RedactionFeatures,
    /// Replacement for stripped media
    pub placeholder: String,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            features: RedactionFeatures::ALL,
            placeholder: "[attachment]".to_owned(),
        }
    }
}

fn data_uri_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)data:[a-z0-9.+/-]+;base64,[A-Za-z0-9+/=_-]+").ok())
        .as_ref()
}

fn base64_run_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"[A-Za-z0-9+/_-]{{{BASE64_RUN_MIN},}}={{0,2}}")).ok())
        .as_ref()
}

fn image_signature_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        let signatures = IMAGE_SIGNATURES.map(regex::escape).join("|");
        Regex::new(&format!(r"(?:{signatures})[A-Za-z0-9+/_-]*={{0,2}}")).ok()
    })
    .as_ref()
}

fn url_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bhttps?://\S+").ok())
        .as_ref()
}

/// Remove media payloads from `text` according to `config`
#[must_use]
pub fn sanitize_history_text(text: &str, config: &RedactionConfig) -> String {
    let mut result = text.to_owned();
    let passes = [
        (RedactionFeatures::DATA_URIS, data_uri_regex()),
        (RedactionFeatures::URLS, url_regex()),
        (RedactionFeatures::IMAGE_SIGNATURES, image_signature_regex()),
        (RedactionFeatures::BASE64_RUNS, base64_run_regex()),
    ];
    for (feature, regex) in passes {
        if !config.features.contains(feature) {
            continue;
        }
        if let Some(re) = regex {
            result = re
                .replace_all(&result, config.placeholder.as_str())
                .into_owned();
        }
    }
    result
}

/// Whether `text` still carries an attachment URL or binary payload
#[must_use]
pub fn contains_attachment_payload(text: &str) -> bool {
    [
        data_uri_regex(),
        url_regex(),
        image_signature_regex(),
        base64_run_regex(),
    ]
        .into_iter()
        .flatten()
        .any(|re| re.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_data_uri() {
        let text = "look data:image/png;base64,iVBORw0KGgoAAAANSUhEUg== at this";
        let clean = sanitize_history_text(text, &RedactionConfig::default());
        assert_eq!(clean, "look [attachment] at this");
        assert!(!contains_attachment_payload(&clean));
    }

    #[test]
    fn test_strips_links() {
        let text = "photo at https://cdn.example.com/uploads/meal.jpg?sig=abc ok";
        let clean = sanitize_history_text(text, &RedactionConfig::default());
        assert_eq!(clean, "photo at [attachment] ok");
    }

    #[test]
    fn test_strips_long_base64_runs() {
        let blob = "A".repeat(400);
        let clean = sanitize_history_text(&format!("x {blob} y"), &RedactionConfig::default());
        assert_eq!(clean, "x [attachment] y");
    }

    #[test]
    fn test_strips_short_image_payloads_by_signature() {
        let payloads = [
            "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==",
            "/9j/4AAQSkZJRgABAQAAAQABAAD/2wBDAAgGBgcGBQgHBwcJCQgKDBQNDAsLDBkSEw8UHRofHh0aHBwg",
            "R0lGODlhAQABAIAAAP///wAAACH5BAEAAAAALAAAAAABAAEAAAICRAEAOw==",
            "UklGRiIAAABXRUJQVlA4IBYAAAAwAQCdASoBAAEADsD+JaQAA3AAAAAA",
        ];
        for payload in payloads {
            assert!(payload.len() < BASE64_RUN_MIN);
            assert!(contains_attachment_payload(payload), "{payload}");
            let clean = sanitize_history_text(
                &format!("here {payload} it is"),
                &RedactionConfig::default(),
            );
            assert_eq!(clean, "here [attachment] it is");
            assert!(!contains_attachment_payload(&clean));
        }
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "Did 3 sets of bench at 60kg";
        assert_eq!(sanitize_history_text(text, &RedactionConfig::default()), text);
        assert!(!contains_attachment_payload(text));
    }

    #[test]
    fn test_features_can_be_disabled() {
        let config = RedactionConfig {
            features: RedactionFeatures::DATA_URIS,
            placeholder: "[x]".into(),
        };
        let text = "see https://example.com/a.png";
        assert_eq!(sanitize_history_text(text, &config), text);
    }
}
