//! Remote chat messages that carry annotation documents.
//!
//! The backend stores every chat turn as a row with a JSON `metadata` column.
//! Assistant turns for the active session may carry a document, a text reply,
//! or both; [`route`] decides which.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde::{Deserialize, Serialize};

use crate::doc::AnnotationDocument;

/// One message row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteMessage {
    pub id: String,
    pub session_id: String,
    pub role: String,
    pub content: String,
    pub created_at: String,
    pub metadata: Option<MessageMetadata>,
}

/// Message metadata. `kind` is `type` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<AnnotationDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<String>,
}

/// What a message means for the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    Document(AnnotationDocument),
    Text(String),
    Both { document: AnnotationDocument, text: String },
    /// Not for us, or nothing to show.
    Ignored,
}

impl Routed {
    /// The document to render, if any.
    #[must_use]
    pub fn document(&self) -> Option<&AnnotationDocument> {
        match self {
            Self::Document(d) | Self::Both { document: d, .. } => Some(d),
            Self::Text(_) | Self::Ignored => None,
        }
    }

    /// The text reply to show, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(t) | Self::Both { text: t, .. } => Some(t),
            Self::Document(_) | Self::Ignored => None,
        }
    }
}

/// Route a message received while watching `session`.
///
/// Only `assistant` messages for `session` count. Metadata `type` decides the
/// payload: `annotation` yields the document, `text_response` the content,
/// `mixed` both. Anything else is logged and ignored.
#[must_use]
pub fn route(message: RemoteMessage, session: &str) -> Routed {
    if message.session_id != session || message.role != "assistant" {
        tracing::debug!(session = %message.session_id, role = %message.role, "ignoring message");
        return Routed::Ignored;
    }
    let Some(metadata) = message.metadata else {
        tracing::debug!(id = %message.id, "message has no metadata");
        return Routed::Ignored;
    };
    let text = Some(message.content).filter(|c| !c.is_empty());
    let kind = metadata.kind.to_ascii_lowercase();
    let (document, text) = match kind.as_str() {
        "annotation" => (metadata.annotation, None),
        "mixed" => (metadata.annotation, text),
        "text_response" => (None, text),
        other => {
            tracing::debug!(id = %message.id, kind = other, "unknown message type");
            return Routed::Ignored;
        }
    };
    match (document, text) {
        (Some(document), Some(text)) => Routed::Both { document, text },
        (Some(document), None) => Routed::Document(document),
        (None, Some(text)) => Routed::Text(text),
        (None, None) => Routed::Ignored,
    }
}
