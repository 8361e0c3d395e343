//! Conversation records.
//!
//! The mailbox (`GET /conversations.json`) wraps each item in a one-field
//! `{ "conversation": { … } }` envelope; [`ConversationEnvelope`] mirrors
//! that so the feed decodes directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::person::Person;

/// The mailbox envelope around each [`Conversation`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationEnvelope {
    pub conversation: Conversation,
}

/// A private conversation thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: u64,

    pub subject: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<Person>,

    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_mailbox() {
        let json = r#"[
            {
                "conversation": {
                    "id": 329,
                    "guid": "ad62c1d0",
                    "subject": "meeting notes",
                    "created_at": "2026-02-28T18:00:00.000Z",
                    "updated_at": "2026-03-01T08:12:00.000Z",
                    "author_id": 1,
                    "participants": [
                        {"id": 1, "guid": "a"},
                        {"id": 42, "guid": "b", "name": "Marek"}
                    ]
                }
            },
            {
                "conversation": {"id": 330, "subject": "re: hello"}
            }
        ]"#;
        let mailbox: Vec<ConversationEnvelope> = serde_json::from_str(json).unwrap();
        assert_eq!(mailbox.len(), 2);
        assert_eq!(mailbox[0].conversation.id, 329);
        assert_eq!(mailbox[0].conversation.participants.len(), 2);
        assert_eq!(mailbox[1].conversation.subject, "re: hello");
        assert!(mailbox[1].conversation.participants.is_empty());
    }
}
