// ABOUTME: Environment-driven configuration for the decision engine and its generative provider
// ABOUTME: Per-field fallback to documented defaults; a missing API key disables the provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `COPILOT_LLM_ENABLED` | `false` |
//! | `COPILOT_LLM_PROVIDER` | `gemini` |
//! | `COPILOT_LLM_MODEL` | `gemini-2.5-flash` |
//! | `GEMINI_API_KEY` | required when enabled |
//! | `COPILOT_EXERCISE_TIMEOUT_SECS` | 10 |
//! | `COPILOT_CHAT_TIMEOUT_SECS` | 15 |
//! | `COPILOT_VISION_TIMEOUT_SECS` | 30 |
//! | `COPILOT_LLM_MAX_ATTEMPTS` | 3 |
//! | `COPILOT_LLM_BACKOFF_UNIT_MS` | 1000 |
//! | `COPILOT_HISTORY_MAX_MESSAGES` | 10 |
//! | `COPILOT_HISTORY_MAX_CHARS` | 10000 |

/// Configuration enums
pub mod types;

pub use types::LlmProviderType;

use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use copilot_core::constants::{history, retry, timeouts};

use crate::brain::EngineTimeouts;
use crate::context::HistoryLimits;
use crate::llm::{GeminiProvider, GenerativeExtractor, ProviderExtractor, RetryPolicy};
use crate::llm::{GEMINI_API_KEY_ENV, GEMINI_DEFAULT_MODEL};

/// Environment variable names
pub mod env_keys {
    /// Enables the generative provider
    pub const LLM_ENABLED: &str = "COPILOT_LLM_ENABLED";
    /// Model name
    pub const LLM_MODEL: &str = "COPILOT_LLM_MODEL";
    /// Exercise extraction budget
    pub const EXERCISE_TIMEOUT_SECS: &str = "COPILOT_EXERCISE_TIMEOUT_SECS";
    /// General chat budget
    pub const CHAT_TIMEOUT_SECS: &str = "COPILOT_CHAT_TIMEOUT_SECS";
    /// Image analysis budget
    pub const VISION_TIMEOUT_SECS: &str = "COPILOT_VISION_TIMEOUT_SECS";
    /// Attempts on rate limit
    pub const LLM_MAX_ATTEMPTS: &str = "COPILOT_LLM_MAX_ATTEMPTS";
    /// Backoff unit
    pub const LLM_BACKOFF_UNIT_MS: &str = "COPILOT_LLM_BACKOFF_UNIT_MS";
    /// History entry cap
    pub const HISTORY_MAX_MESSAGES: &str = "COPILOT_HISTORY_MAX_MESSAGES";
    /// History character cap
    pub const HISTORY_MAX_CHARS: &str = "COPILOT_HISTORY_MAX_CHARS";
}

/// Generative provider settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    /// Whether to wire a provider at all
    pub enabled: bool,
    /// Provider selection
    pub provider: LlmProviderType,
    /// Model name
    pub model: String,
    /// Retry policy on rate limits
    pub retry: RetryPolicy,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: LlmProviderType::default(),
            model: GEMINI_DEFAULT_MODEL.to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrainConfig {
    /// Generative provider
    pub llm: LlmConfig,
    /// Per-call time budgets
    pub timeouts: EngineTimeouts,
    /// Chat history caps
    pub history: HistoryLimits,
}

impl BrainConfig {
    /// Load from environment variables, falling back per field
    #[must_use]
    pub fn from_env() -> Self {
        let llm = LlmConfig {
            enabled: env_flag(env_keys::LLM_ENABLED),
            provider: env::var(LlmProviderType::ENV_VAR)
                .map_or_else(|_| LlmProviderType::default(), |v| {
                    LlmProviderType::from_str_or_default(&v)
                }),
            model: env::var(env_keys::LLM_MODEL)
                .ok()
                .filter(|model| !model.trim().is_empty())
                .unwrap_or_else(|| GEMINI_DEFAULT_MODEL.to_owned()),
            retry: RetryPolicy {
                max_attempts: env_parse(env_keys::LLM_MAX_ATTEMPTS, retry::MAX_ATTEMPTS).max(1),
                backoff_unit: Duration::from_millis(env_parse(
                    env_keys::LLM_BACKOFF_UNIT_MS,
                    retry::BACKOFF_UNIT_MS,
                )),
            },
        };

        let timeouts = EngineTimeouts {
            exercise_extraction: Duration::from_secs(env_parse(
                env_keys::EXERCISE_TIMEOUT_SECS,
                timeouts::EXERCISE_EXTRACTION_SECS,
            )),
            general_chat: Duration::from_secs(env_parse(
                env_keys::CHAT_TIMEOUT_SECS,
                timeouts::GENERAL_CHAT_SECS,
            )),
            image_analysis: Duration::from_secs(env_parse(
                env_keys::VISION_TIMEOUT_SECS,
                timeouts::IMAGE_ANALYSIS_SECS,
            )),
        };

        let history = HistoryLimits {
            max_messages: env_parse(env_keys::HISTORY_MAX_MESSAGES, history::MAX_MESSAGES),
            max_chars: env_parse(env_keys::HISTORY_MAX_CHARS, history::MAX_CHARS),
        };

        Self {
            llm,
            timeouts,
            history,
        }
    }

    /// Build the configured generative extractor
    ///
    /// Returns `None` when disabled or when the provider cannot be built; the
    /// engine then runs on its deterministic tier only.
    #[must_use]
    pub fn build_extractor(&self) -> Option<Arc<dyn GenerativeExtractor>> {
        if !self.llm.enabled {
            info!("generative provider disabled");
            return None;
        }

        match self.llm.provider {
            LlmProviderType::Gemini => match GeminiProvider::from_env() {
                Ok(provider) => {
                    info!(provider = %self.llm.provider, model = %self.llm.model, "generative provider configured");
                    let extractor = ProviderExtractor::new(provider.with_default_model(&self.llm.model))
                        .with_model(&self.llm.model)
                        .with_retry(self.llm.retry);
                    Some(Arc::new(extractor))
                }
                Err(e) => {
                    warn!(error = %e, key = GEMINI_API_KEY_ENV, "generative provider unavailable");
                    None
                }
            },
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).is_ok_and(|v| {
        let v = v.trim();
        v.eq_ignore_ascii_case("true") || v == "1" || v.eq_ignore_ascii_case("yes")
    })
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, %default, "invalid number in environment, using default");
            default
        }),
        Err(_) => default,
    }
}
