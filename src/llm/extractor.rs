// ABOUTME: Generative extraction capability consumed by the engine, with budgets and retries
// ABOUTME: ProviderExtractor adapts any LlmProvider: timeouts, rate-limit backoff, image fetch, JSON salvage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, instrument, warn};

use copilot_core::constants::retry;
use copilot_core::models::Attachment;

use super::json::{parse_objects, JsonObject};
use super::{ChatMessage, ChatRequest, InlineImage, LlmProvider};
use crate::errors::AppResult;
use crate::utils::http_client::image_fetch_client;

/// Free-text generation
const TEXT_TEMPERATURE: f32 = 0.7;
/// Structured extraction, text or image
const STRUCTURED_TEMPERATURE: f32 = 0.2;
/// Free-text answers about an image
const IMAGE_TEXT_TEMPERATURE: f32 = 0.3;

/// Fallback MIME type when the bytes carry no recognizable signature
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

// ============================================================================
// Capability contract
// ============================================================================

/// Where an image comes from: inline base64 or a URL to fetch
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ImageSource {
    /// Inline payload, preferred when present
    pub base64: Option<String>,
    /// Hosted image, fetched only when no inline payload exists
    pub url: Option<String>,
}

impl ImageSource {
    /// Image reference carried by an attachment
    #[must_use]
    pub fn from_attachment(attachment: &Attachment) -> Self {
        Self {
            base64: attachment.base64.clone(),
            url: attachment.url.clone(),
        }
    }

    /// Neither payload nor URL
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base64.as_deref().map_or(true, str::is_empty)
            && self.url.as_deref().map_or(true, str::is_empty)
    }
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSource")
            .field("base64_len", &self.base64.as_ref().map(String::len))
            .field("has_url", &self.url.is_some())
            .finish()
    }
}

/// Text and structured completion over an external generative model
///
/// Expected failures (timeout, malformed output, exhausted rate-limit retries,
/// missing image) come back as `Ok(None)` or an empty list. `Err` is reserved
/// for failures that retrying cannot fix, such as rejected credentials.
#[async_trait]
pub trait GenerativeExtractor: Send + Sync {
    /// Free-text completion
    async fn complete_text(&self, prompt: &str, budget: Duration) -> AppResult<Option<String>>;

    /// JSON objects extracted from a completion
    async fn complete_structured(&self, prompt: &str, budget: Duration)
        -> AppResult<Vec<JsonObject>>;

    /// Free-text completion about an image
    async fn complete_text_with_image(
        &self,
        prompt: &str,
        image: &ImageSource,
        budget: Duration,
    ) -> AppResult<Option<String>>;

    /// JSON objects extracted from a completion about an image
    async fn complete_structured_with_image(
        &self,
        prompt: &str,
        image: &ImageSource,
        budget: Duration,
    ) -> AppResult<Vec<JsonObject>>;
}

// ============================================================================
// Retry policy
// ============================================================================

/// Bounded retry for rate-limited calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Backoff unit; the wait after failed attempt `n` is `unit * 2^n`
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    /// Wait before the attempt following failed attempt `attempt` (1-based)
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(2_u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            backoff_unit: Duration::from_millis(retry::BACKOFF_UNIT_MS),
        }
    }
}

// ============================================================================
// Provider-backed implementation
// ============================================================================

/// [`GenerativeExtractor`] over any [`LlmProvider`]
pub struct ProviderExtractor<P> {
    provider: P,
    retry: RetryPolicy,
    model: Option<String>,
    http: Client,
}

impl<P: LlmProvider> ProviderExtractor<P> {
    /// Wrap `provider` with the default retry policy
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
            model: None,
            http: image_fetch_client(),
        }
    }

    /// Override the retry policy
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Pin a model instead of the provider default
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn request(&self, message: ChatMessage, temperature: f32, json: bool) -> ChatRequest {
        let mut request = ChatRequest::new(vec![message]).with_temperature(temperature);
        if json && self.provider.capabilities().supports_json_mode() {
            request = request.with_json_mode();
        }
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }
        request
    }

    /// One logical call: rate-limit failures retried with exponential backoff
    async fn complete_with_retry(&self, request: &ChatRequest) -> AppResult<Option<String>> {
        let mut attempt = 0_u32;
        loop {
            attempt += 1;
            match self.provider.complete(request).await {
                Ok(response) => {
                    debug!(attempt, chars = response.content.len(), "generative call succeeded");
                    let content = response.content;
                    return Ok((!content.trim().is_empty()).then_some(content));
                }
                Err(e) if e.is_retryable() => {
                    if attempt >= self.retry.max_attempts {
                        warn!(
                            provider = self.provider.name(),
                            attempts = attempt,
                            "rate limit persisted, giving up"
                        );
                        return Ok(None);
                    }
                    let backoff = self.retry.backoff_for(attempt);
                    warn!(
                        provider = self.provider.name(),
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        "rate limited, backing off"
                    );
                    sleep(backoff).await;
                }
                Err(e) => {
                    error!(provider = self.provider.name(), error = %e, "generative call failed");
                    return Err(e);
                }
            }
        }
    }

    /// Resolve an image to inline bytes; `None` when absent or unusable
    async fn resolve_image(&self, image: &ImageSource) -> Option<InlineImage> {
        if let Some(data) = image.base64.as_deref().filter(|d| !d.is_empty()) {
            return decode_inline(data);
        }
        let url = image.url.as_deref().filter(|u| !u.is_empty())?;
        match self.fetch_image(url).await {
            Ok(inline) => Some(inline),
            Err(e) => {
                warn!(error = %e, "failed to fetch image");
                None
            }
        }
    }

    async fn fetch_image(&self, url: &str) -> Result<InlineImage, reqwest::Error> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let header_mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| value.starts_with("image/"))
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_owned());
        let bytes = response.bytes().await?;
        let mime_type = header_mime.unwrap_or_else(|| sniff_mime(&bytes).to_owned());
        Ok(InlineImage {
            mime_type,
            data: STANDARD.encode(&bytes),
        })
    }

    async fn text_call(&self, request: ChatRequest, budget: Duration) -> AppResult<Option<String>> {
        if let Ok(result) = timeout(budget, self.complete_with_retry(&request)).await {
            result
        } else {
            warn!(budget_ms = budget.as_millis() as u64, "generative call timed out");
            Ok(None)
        }
    }

    async fn image_call(
        &self,
        prompt: &str,
        image: &ImageSource,
        budget: Duration,
        temperature: f32,
        json: bool,
    ) -> AppResult<Option<String>> {
        if image.is_empty() {
            warn!("image analysis requested without image data");
            return Ok(None);
        }
        if !self.provider.capabilities().supports_vision() {
            warn!(provider = self.provider.name(), "provider cannot read images");
            return Ok(None);
        }

        let work = async {
            let Some(inline) = self.resolve_image(image).await else {
                return Ok(None);
            };
            let request = self.request(ChatMessage::user_with_image(prompt, inline), temperature, json);
            self.complete_with_retry(&request).await
        };

        if let Ok(result) = timeout(budget, work).await {
            result
        } else {
            warn!(budget_ms = budget.as_millis() as u64, "image analysis timed out");
            Ok(None)
        }
    }
}

#[async_trait]
impl<P: LlmProvider> GenerativeExtractor for ProviderExtractor<P> {
    #[instrument(skip(self, prompt), fields(provider = self.provider.name()))]
    async fn complete_text(&self, prompt: &str, budget: Duration) -> AppResult<Option<String>> {
        debug!(prompt_chars = prompt.len(), "text completion");
        let request = self.request(ChatMessage::user(prompt), TEXT_TEMPERATURE, false);
        self.text_call(request, budget).await
    }

    #[instrument(skip(self, prompt), fields(provider = self.provider.name()))]
    async fn complete_structured(
        &self,
        prompt: &str,
        budget: Duration,
    ) -> AppResult<Vec<JsonObject>> {
        let request = self.request(ChatMessage::user(prompt), STRUCTURED_TEMPERATURE, true);
        let raw = self.text_call(request, budget).await?;
        debug!(raw = ?raw, "structured completion");
        Ok(raw.as_deref().map(parse_objects).unwrap_or_default())
    }

    #[instrument(skip(self, prompt, image), fields(provider = self.provider.name()))]
    async fn complete_text_with_image(
        &self,
        prompt: &str,
        image: &ImageSource,
        budget: Duration,
    ) -> AppResult<Option<String>> {
        self.image_call(prompt, image, budget, IMAGE_TEXT_TEMPERATURE, false)
            .await
    }

    #[instrument(skip(self, prompt, image), fields(provider = self.provider.name()))]
    async fn complete_structured_with_image(
        &self,
        prompt: &str,
        image: &ImageSource,
        budget: Duration,
    ) -> AppResult<Vec<JsonObject>> {
        let raw = self
            .image_call(prompt, image, budget, STRUCTURED_TEMPERATURE, true)
            .await?;
        debug!(raw = ?raw, "structured image completion");
        Ok(raw.as_deref().map(parse_objects).unwrap_or_default())
    }
}

impl<P: LlmProvider> std::fmt::Debug for ProviderExtractor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderExtractor")
            .field("provider", &self.provider.name())
            .field("retry", &self.retry)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Image helpers
// ============================================================================

/// Validate an inline payload, accepting an optional `data:<mime>;base64,` prefix
fn decode_inline(data: &str) -> Option<InlineImage> {
    let (declared_mime, payload) = match data.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',')?;
            let mime = header.split(';').next().filter(|m| m.starts_with("image/"));
            (mime.map(str::to_owned), payload)
        }
        None => (None, data),
    };

    match STANDARD.decode(payload.trim()) {
        Ok(bytes) if !bytes.is_empty() => Some(InlineImage {
            mime_type: declared_mime.unwrap_or_else(|| sniff_mime(&bytes).to_owned()),
            data: payload.trim().to_owned(),
        }),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "failed to decode base64 image");
            None
        }
    }
}

/// MIME type from magic bytes
fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG") {
        "image/png"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        DEFAULT_IMAGE_MIME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        };
        assert_eq!(policy.backoff_for(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(4));
    }

    #[test]
    fn test_empty_image_source() {
        assert!(ImageSource::default().is_empty());
        assert!(ImageSource {
            base64: Some(String::new()),
            url: None
        }
        .is_empty());
        assert!(!ImageSource::from_attachment(&Attachment::image_url("https://x/y.png")).is_empty());
    }

    #[test]
    fn test_decode_inline_sniffs_png() {
        let png = STANDARD.encode(b"\x89PNG\r\n\x1a\nrest");
        let inline = decode_inline(&png).unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, png);
    }

    #[test]
    fn test_decode_inline_honours_data_uri() {
        let payload = STANDARD.encode(b"\xff\xd8\xffjpeg");
        let inline = decode_inline(&format!("data:image/webp;base64,{payload}")).unwrap();
        assert_eq!(inline.mime_type, "image/webp");
        assert_eq!(inline.data, payload);
    }

    #[test]
    fn test_decode_inline_rejects_garbage() {
        assert!(decode_inline("not base64 at all!!").is_none());
    }
}
