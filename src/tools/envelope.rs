//! Response envelope returned by every operation.
//!
//! The envelope mirrors the MCP tool-call result shape (a list of typed
//! content blocks plus an error flag) without depending on any transport.

use crate::error::DbError;
use serde::{Deserialize, Serialize};

/// One typed block of response content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Success or failure of a single operation; never partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResponse {
    /// Success carrying a plain message.
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(message)],
            is_error: false,
        }
    }

    /// Success carrying `value` as 2-space indented JSON.
    ///
    /// A value that cannot be serialized becomes a failure envelope.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::text(text),
            Err(e) => Self::error_text(format!("Failed to serialize result: {}", e)),
        }
    }

    /// Failure envelope for `err`.
    ///
    /// `prefix` names the failing operation (e.g. `"Error creating record: "`)
    /// and is applied to errors raised while running it. Routing failures
    /// already carry their own wording.
    pub fn failure(prefix: &str, err: &DbError) -> Self {
        let message = match err {
            DbError::UnknownOperation { .. } | DbError::InvalidArguments { .. } => err.to_string(),
            DbError::Engine { .. } | DbError::ConnectionOpen { .. } | DbError::Transport { .. } => {
                format!("{}{}", prefix, err)
            }
        };
        Self::error_text(message)
    }

    fn error_text(message: String) -> Self {
        Self {
            content: vec![ContentBlock::text(message)],
            is_error: true,
        }
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(ContentBlock::as_text)
    }
}
