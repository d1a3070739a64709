// ABOUTME: Chat-facing models: inbound message, attachment reference, reply and stored record
// ABOUTME: Attachment payloads never leak into Debug output or chat history turns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::action::{Action, ActionType};

/// Author of a chat entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person using the app
    User,
    /// The copilot
    Assistant,
}

impl ChatRole {
    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of media attached to a message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// Photo of food or gym equipment
    Image,
    /// Voice note
    Audio,
    /// Plain text message
    #[default]
    None,
}

/// Reference to attached media; the bytes are owned by a collaborator
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Media kind
    pub kind: AttachmentKind,
    /// Location of the media, if hosted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Inline base64 payload, if uploaded directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
}

impl Attachment {
    /// No attachment
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Image hosted at `url`
    #[must_use]
    pub fn image_url(url: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::Image,
            url: Some(url.into()),
            base64: None,
        }
    }

    /// Image carried inline as base64
    #[must_use]
    pub fn image_base64(data: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::Image,
            url: None,
            base64: Some(data.into()),
        }
    }

    /// Voice note, content not inspected
    #[must_use]
    pub fn audio(url: Option<String>) -> Self {
        Self {
            kind: AttachmentKind::Audio,
            url,
            base64: None,
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("kind", &self.kind)
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field(
                "base64",
                &self.base64.as_ref().map(|data| format!("<{} bytes>", data.len())),
            )
            .finish()
    }
}

/// Inbound chat message; immutable once received
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Free text typed by the user (may be empty for media-only messages)
    pub content: String,
    /// Optional media reference
    #[serde(default)]
    pub attachment: Attachment,
}

impl Message {
    /// Text-only message
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            attachment: Attachment::none(),
        }
    }

    /// Message carrying an attachment
    #[must_use]
    pub fn with_attachment(content: impl Into<String>, attachment: Attachment) -> Self {
        Self {
            content: content.into(),
            attachment,
        }
    }
}

/// Engine output: confirmation text plus the single emitted action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    /// User-facing text
    pub content: String,
    /// Structured outcome
    #[serde(flatten)]
    pub action: Action,
}

impl AssistantReply {
    /// Reply carrying an action
    #[must_use]
    pub fn new(content: impl Into<String>, action: Action) -> Self {
        Self {
            content: content.into(),
            action,
        }
    }

    /// Reply with no structured action
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(content, Action::None)
    }

    /// Discriminant of the emitted action
    #[must_use]
    pub const fn action_type(&self) -> ActionType {
        self.action.action_type()
    }
}

/// Role and text of one past chat entry, the only shape history is kept in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Author
    pub role: ChatRole,
    /// Text content
    pub content: String,
}

/// Persisted chat entry as the calling layer stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Author
    pub role: ChatRole,
    /// Text content
    pub content: String,
    /// Attached media reference
    pub attachment: Attachment,
    /// Action emitted with an assistant reply; `None` for user entries
    #[serde(flatten)]
    pub action: Action,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl ChatMessageRecord {
    /// Text-only projection used for prompt history
    #[must_use]
    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}
