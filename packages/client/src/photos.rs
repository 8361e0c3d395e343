//! Photo upload. Pods take the raw image bytes in the request body, not
//! multipart form data; metadata rides in the query string and headers.

use tracing::debug;

use thistledown_api::{Photo, PhotoUploadResponse};

use crate::error::Error;
use crate::session::{check, Session};

impl Session {
    /// Upload a photo and return its pending record.
    ///
    /// `aspect_ids` pre-targets the photo; feeding it all the user's
    /// aspects (from [`UserInfo::aspect_ids`]) matches what the pod's own
    /// web client does. The photo stays pending until a
    /// [`Session::create_post`] call references its id. The pod answers
    /// `200` with the upload envelope.
    ///
    /// [`UserInfo::aspect_ids`]: crate::api::UserInfo::aspect_ids
    pub fn upload_photo(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        aspect_ids: &[u64],
    ) -> Result<Photo, Error> {
        let token = self.token()?;

        let mut query: Vec<(&str, String)> = vec![
            ("photo[pending]", "true".to_string()),
            ("qqfile", filename.to_string()),
        ];
        for id in aspect_ids {
            query.push(("photo[aspect_ids][]", id.to_string()));
        }

        let url = self.url("photos");
        debug!("session: POST {url} ({} bytes)", bytes.len());
        let response = self
            .client
            .post(url)
            .query(&query)
            .header("content-type", "application/octet-stream")
            .header("x-csrf-token", token.as_str())
            .header("x-file-name", filename)
            .body(bytes)
            .send()?;
        check(&response, "photos", 200)?;
        let envelope: PhotoUploadResponse = response.json()?;
        Ok(envelope.into_photo())
    }
}
