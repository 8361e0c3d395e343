//! Feed reads and post mutations.

use serde_json::json;

use thistledown_api::Post;

use crate::error::Error;
use crate::session::{check, Session};

/// Visibility target for a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostTarget {
    /// Visible to everyone; federates beyond the user's contacts.
    Public,
    /// Limited to all of the user's aspects.
    AllAspects,
    /// Limited to the given aspect ids.
    Aspects(Vec<u64>),
}

impl PostTarget {
    /// The `aspect_ids` value the pod expects: the sentinel strings
    /// `"public"` / `"all_aspects"`, or an id array.
    fn aspect_ids(&self) -> serde_json::Value {
        match self {
            PostTarget::Public => json!("public"),
            PostTarget::AllAspects => json!("all_aspects"),
            PostTarget::Aspects(ids) => json!(ids),
        }
    }
}

impl Session {
    /// The signed-in user's main stream, newest first.
    pub fn stream(&self) -> Result<Vec<Post>, Error> {
        let response = self.get("stream.json")?;
        check(&response, "stream.json", 200)?;
        Ok(response.json()?)
    }

    /// Posts the signed-in user is mentioned in.
    pub fn mentions(&self) -> Result<Vec<Post>, Error> {
        let response = self.get("mentions.json")?;
        check(&response, "mentions.json", 200)?;
        Ok(response.json()?)
    }

    /// Publish a status message and return the pod's echo of it.
    ///
    /// `photos` references pending uploads from [`Session::upload_photo`]
    /// by id; pass an empty slice for a text-only post. The pod answers
    /// `201`.
    pub fn create_post(
        &self,
        text: &str,
        target: &PostTarget,
        photos: &[u64],
    ) -> Result<Post, Error> {
        let token = self.token()?;
        let mut payload = json!({
            "status_message": { "text": text },
            "aspect_ids": target.aspect_ids(),
        });
        if !photos.is_empty() {
            payload["photos"] = json!(photos);
        }
        let response = self.post_json("status_messages", &token, &payload)?;
        check(&response, "status_messages", 201)?;
        Ok(response.json()?)
    }

    /// Delete one of the signed-in user's own posts. The pod answers
    /// `204` with no body.
    pub fn delete_post(&self, id: u64) -> Result<(), Error> {
        let token = self.token()?;
        let path = format!("posts/{id}");
        let response = self.delete(&path, &[], &[("x-csrf-token", token.as_str())])?;
        check(&response, &path, 204)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_public_is_the_sentinel_string() {
        assert_eq!(PostTarget::Public.aspect_ids(), json!("public"));
        assert_eq!(PostTarget::AllAspects.aspect_ids(), json!("all_aspects"));
    }

    #[test]
    fn target_aspects_is_an_id_array() {
        assert_eq!(
            PostTarget::Aspects(vec![2, 5]).aspect_ids(),
            json!([2, 5])
        );
    }
}
