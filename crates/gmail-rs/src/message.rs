//! Gmail resources. Required fields are required here too, so a response missing them fails to
//! parse instead of producing a half-empty record.
use serde::{Deserialize, Serialize};

/// A search hit: just enough to fetch the full [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    pub thread_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub result_size_estimate: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub thread_id: String,
    #[serde(default)]
    pub label_ids: Option<Vec<String>>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub payload: Option<Payload>,
    #[serde(default)]
    pub size_estimate: Option<u64>,
    #[serde(default)]
    pub history_id: Option<String>,
    /// Epoch milliseconds, as a string.
    #[serde(default)]
    pub internal_date: Option<String>,
}

impl Message {
    /// The first top-level header with this name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload.as_ref()?.header(name)
    }

    pub fn subject(&self) -> Option<&str> {
        self.header("Subject")
    }

    pub fn internal_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let raw = self.internal_date.as_deref()?;
        crate::unix_millis_to_datetime(raw, 1000).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub history_id: String,
    pub messages: Vec<Message>,
}

/// One node of a message's MIME tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub part_id: String,
    pub mime_type: String,
    pub filename: String,
    pub headers: Vec<Header>,
    pub body: Body,
    #[serde(default)]
    pub parts: Option<Vec<Part>>,
}

/// The root [`Part`] of a message.
pub type Payload = Part;

impl Part {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
    }

    pub fn children(&self) -> &[Part] {
        self.parts.as_deref().unwrap_or(&[])
    }

    pub fn is_attachment(&self) -> bool {
        !self.filename.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub size: u64,
    /// URL-safe base64, for small inline bodies.
    #[serde(default)]
    pub data: Option<String>,
    /// Set instead of `data` when the content has to be fetched separately.
    #[serde(default)]
    pub attachment_id: Option<String>,
}

/// Identifies an attachment for a later `attachments.get`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub message_id: String,
    pub attachment_id: String,
    pub file_name: String,
}

impl AttachmentRef {
    /// Text after the last `.`, or the whole name if there is none.
    pub fn extension(&self) -> &str {
        self.file_name.rsplit('.').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AttachmentBody {
    #[serde(default)]
    pub data: Option<String>,
}

/// Body of `messages.send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    /// The full RFC 5322 message, URL-safe base64 encoded.
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}
