//! Aspect records. Aspects are the pod's contact groups; posts and photos
//! are targeted at aspect ids.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A contact group, as listed in `window.current_user_attributes` and
/// echoed by `POST /aspects`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Aspect {
    pub id: u64,

    pub name: String,

    /// Pod-side UI state: whether the aspect is currently selected in the
    /// stream filter. Rides along in the scraped user attributes.
    #[serde(default)]
    pub selected: bool,

    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

/// The record created by `POST /aspect_memberships.json`, binding one
/// person into one aspect.
///
/// Removing the person from the aspect requires this record's `id`; the
/// pod does not accept the `(aspect_id, person_id)` pair for deletes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AspectMembership {
    pub id: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<u64>,

    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}
