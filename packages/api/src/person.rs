//! People records: post authors, search results, conversation participants.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Avatar URLs for a person.
///
/// Pods serve two shapes for the same key: post authors and profiles carry
/// a three-size object, people-search results carry a single URL string.
/// Both decode into this enum; [`Avatar::url`] picks the best available.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Avatar {
    /// `{ "small": …, "medium": …, "large": … }`
    Sizes(AvatarSizes),
    /// A bare URL string, as served by `GET /people.json?q=…`.
    Url(String),
}

/// The three-size avatar object attached to post authors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvatarSizes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
}

impl Avatar {
    /// The best available URL: medium, then large, then small, then the
    /// bare search-result URL.
    pub fn url(&self) -> Option<&str> {
        match self {
            Avatar::Sizes(s) => s
                .medium
                .as_deref()
                .or(s.large.as_deref())
                .or(s.small.as_deref()),
            Avatar::Url(u) => Some(u),
        }
    }
}

/// A person as served by the pod: a post author, a search hit, or a
/// conversation participant.
///
/// Only `id` and `guid` are guaranteed; which other keys appear depends on
/// the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    /// Database id on the serving pod. Not federated.
    pub id: u64,

    /// Federation-wide id.
    pub guid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `username@pod.example.com`. Search results spell this key
    /// `handle`; post authors spell it `diaspora_id`.
    #[serde(default, alias = "handle", skip_serializing_if = "Option::is_none")]
    pub diaspora_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,

    /// Keys this crate does not model, preserved as-is.
    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
