//! Provider-neutral completion types and the `LlmProvider` trait.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{LlmError, SessionError};

/// Media types the completion endpoint accepts for images.
pub const SUPPORTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Largest decoded image the completion endpoint accepts.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// An image the user attached to their next question.
///
/// Single-use: the session hands it to exactly one outgoing request.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    data: Vec<u8>,
    media_type: String,
}

impl ImageAttachment {
    /// Create an attachment from raw bytes and a declared media type.
    pub fn new(data: Vec<u8>, media_type: impl Into<String>) -> Result<Self, SessionError> {
        let media_type = media_type.into().trim().to_lowercase();
        if data.is_empty() {
            return Err(SessionError::InvalidImage {
                reason: "image payload is empty".to_string(),
            });
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(SessionError::InvalidImage {
                reason: format!("image is {} bytes, limit is {MAX_IMAGE_BYTES}", data.len()),
            });
        }
        if !SUPPORTED_IMAGE_TYPES.contains(&media_type.as_str()) {
            return Err(SessionError::InvalidImage {
                reason: format!("unsupported media type {media_type}"),
            });
        }
        Ok(Self { data, media_type })
    }

    /// Create an attachment from a base64 payload.
    pub fn from_base64(encoded: &str, media_type: impl Into<String>) -> Result<Self, SessionError> {
        let data = STANDARD
            .decode(encoded.trim())
            .map_err(|e| SessionError::InvalidImage {
                reason: format!("invalid base64: {e}"),
            })?;
        Self::new(data, media_type)
    }

    /// Guess the media type from a file extension.
    pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Base64 payload as sent on the wire.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

impl std::fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("media_type", &self.media_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One part of a message's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    Image(ImageAttachment),
}

/// A message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentPart::Text(text.into())],
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![ContentPart::Text(text.into())],
        }
    }

    /// Append an image part after the existing content.
    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.content.push(ContentPart::Image(image));
        self
    }

    /// Concatenated text parts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of image parts.
    pub fn image_count(&self) -> usize {
        self.content
            .iter()
            .filter(|part| matches!(part, ContentPart::Image(_)))
            .count()
    }
}

/// A completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            system: None,
            messages,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    Unknown,
}

/// A completion response.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: FinishReason,
}

/// A hosted text-generation backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model identifier sent with each request.
    fn model_name(&self) -> &str;

    /// Run one completion. No retries are attempted.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
