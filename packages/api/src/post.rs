//! Post records. The stream, mentions, tag, and profile feeds all serve
//! JSON arrays of these; `POST /status_messages` echoes one back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::person::Person;
use crate::photo::Photo;

/// Comment, like, and reshare counters attached to a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interactions {
    #[serde(default)]
    pub comments_count: u64,

    #[serde(default)]
    pub likes_count: u64,

    #[serde(default)]
    pub reshares_count: u64,
}

/// A status message as served by the pod.
///
/// Only `id` and `guid` are always present. Feed entries carry the full
/// shape; the `POST /status_messages` echo omits some of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Database id on the serving pod. Delete calls address the post by
    /// this, not by `guid`.
    pub id: u64,

    /// Federation-wide id.
    pub guid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default)]
    pub public: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// `StatusMessage` or `Reshare`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Person>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<Photo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions: Option<Interactions>,

    /// Keys this crate does not model, preserved as-is.
    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_feed_entry() {
        let json = r#"{
            "id": 12345,
            "guid": "0f1a6f60e1db0133e40d2a0000053625",
            "text": "first post on #thistledown",
            "public": true,
            "created_at": "2026-03-01T09:30:00.000Z",
            "post_type": "StatusMessage",
            "nsfw": false,
            "author": {
                "id": 42,
                "guid": "c3893bf0",
                "name": "Marek",
                "diaspora_id": "marek@pod.example.com"
            },
            "photos": [],
            "interactions": {
                "comments_count": 2,
                "likes_count": 5,
                "reshares_count": 0
            }
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 12345);
        assert!(post.public);
        assert_eq!(post.author.as_ref().unwrap().id, 42);
        assert_eq!(post.interactions.as_ref().unwrap().likes_count, 5);
        assert!(post.photos.is_empty());
        // Unmodelled `nsfw` must survive, not be dropped.
        assert_eq!(post.extensions["nsfw"], serde_json::Value::Bool(false));
    }

    #[test]
    fn decode_minimal_echo() {
        // POST /status_messages answers with a reduced shape.
        let post: Post =
            serde_json::from_str(r#"{"id": 9, "guid": "abc", "text": "hi"}"#).unwrap();
        assert_eq!(post.id, 9);
        assert!(!post.public);
        assert!(post.author.is_none());
        assert!(post.interactions.is_none());
    }

    #[test]
    fn feed_decodes_as_array() {
        let json = r#"[
            {"id": 1, "guid": "a"},
            {"id": 2, "guid": "b"},
            {"id": 3, "guid": "c"}
        ]"#;
        let posts: Vec<Post> = serde_json::from_str(json).unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[2].id, 3);
    }

    #[test]
    fn encode_skips_absent_fields() {
        let post = Post {
            id: 1,
            guid: "g".into(),
            text: None,
            public: false,
            created_at: None,
            post_type: None,
            author: None,
            photos: vec![],
            interactions: None,
            extensions: HashMap::new(),
        };
        let v = serde_json::to_value(&post).unwrap();
        assert!(v.get("text").is_none());
        assert!(v.get("photos").is_none());
    }
}
