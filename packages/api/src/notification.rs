//! Notification records.
//!
//! `GET /notifications.json` serves an array where each element is an
//! object with exactly one key, the notification kind, mapping to the
//! notification body:
//!
//! ```json
//! [
//!   { "reshared":  { "id": 17, "target_id": 12345, "unread": true, … } },
//!   { "mentioned": { "id": 18, "target_id": 12346, "unread": false, … } }
//! ]
//! ```
//!
//! [`Notification`] flattens that envelope into `kind` + body fields and
//! rejects zero-key or multi-key objects at the decode boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decode failure for the single-key notification envelope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationFormatError {
    #[error("notification object must have exactly one kind key, got {0}")]
    KeyCount(usize),
}

/// One notification, with the envelope key hoisted into [`kind`](Self::kind).
///
/// Kinds observed on the wire: `also_commented`, `comment_on_post`,
/// `liked`, `mentioned`, `reshared`, `started_sharing`. New pod releases
/// add kinds, so this stays a `String`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<String, NotificationBody>",
    into = "HashMap<String, NotificationBody>"
)]
pub struct Notification {
    pub kind: String,
    pub body: NotificationBody,
}

/// The body under the kind key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationBody {
    pub id: u64,

    /// Id of the post, comment, or person the notification is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<u64>,

    #[serde(default)]
    pub unread: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_html: Option<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

impl TryFrom<HashMap<String, NotificationBody>> for Notification {
    type Error = NotificationFormatError;

    fn try_from(map: HashMap<String, NotificationBody>) -> Result<Self, Self::Error> {
        let count = map.len();
        let mut entries = map.into_iter();
        match (entries.next(), entries.next()) {
            (Some((kind, body)), None) => Ok(Notification { kind, body }),
            _ => Err(NotificationFormatError::KeyCount(count)),
        }
    }
}

impl From<Notification> for HashMap<String, NotificationBody> {
    fn from(n: Notification) -> Self {
        HashMap::from([(n.kind, n.body)])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
