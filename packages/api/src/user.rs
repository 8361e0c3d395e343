//! The logged-in user's own attributes.
//!
//! Pods embed this record as a JavaScript assignment
//! (`window.current_user_attributes = { … }`) in the `/bookmarklet` page
//! rather than serving it from a JSON endpoint; the client crate scrapes
//! the assignment out and decodes it into [`UserInfo`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aspect::Aspect;
use crate::person::Avatar;

/// Everything the pod tells a session about its own user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: u64,

    pub guid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `username@pod.example.com`.
    #[serde(default, alias = "handle", skip_serializing_if = "Option::is_none")]
    pub diaspora_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,

    /// The user's contact groups. Photo uploads default to targeting all
    /// of these.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aspects: Vec<Aspect>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_messages_count: Option<u64>,

    #[serde(default)]
    pub admin: bool,

    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

impl UserInfo {
    /// Ids of all the user's aspects, in pod order.
    pub fn aspect_ids(&self) -> Vec<u64> {
        self.aspects.iter().map(|a| a.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_scraped_attributes() {
        let json = r#"{
            "id": 1,
            "guid": "0f1a6f60e1db0133",
            "name": "Test User",
            "diaspora_id": "testuser@pod.example.com",
            "notifications_count": 3,
            "unread_messages_count": 0,
            "admin": false,
            "aspects": [
                {"id": 2, "name": "Family", "selected": true},
                {"id": 3, "name": "Work", "selected": false}
            ],
            "services": []
        }"#;
        let info: UserInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.guid, "0f1a6f60e1db0133");
        assert_eq!(info.aspect_ids(), vec![2, 3]);
        assert_eq!(info.notifications_count, Some(3));
        assert!(info.extensions.contains_key("services"));
    }
}
