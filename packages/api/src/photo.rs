//! Photo records and the `POST /photos` upload envelope.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Image URLs for one photo in the sizes the pod renders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhotoSizes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
}

/// A photo attached to a post, or freshly uploaded via `POST /photos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    /// Database id. `POST /status_messages` references pending uploads by
    /// this id in `photos[]`.
    pub id: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<PhotoSizes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(flatten)]
    pub extensions: HashMap<String, serde_json::Value>,
}

/// The response body of `POST /photos`.
///
/// ```json
/// { "data": { "photo": { "id": 1234, "guid": "…", … } }, "success": true }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoUploadResponse {
    pub data: PhotoUploadData,

    #[serde(default)]
    pub success: bool,
}

/// The `data` wrapper inside [`PhotoUploadResponse`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoUploadData {
    pub photo: Photo,
}

impl PhotoUploadResponse {
    /// Unwrap the envelope down to the photo record.
    pub fn into_photo(self) -> Photo {
        self.data.photo
    }
}
