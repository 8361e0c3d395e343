//! Tag feeds and tag following.

use serde_json::json;
use urlencoding::encode;

use thistledown_api::Post;

use crate::error::Error;
use crate::session::{check, Session};

impl Session {
    /// Posts carrying `#tag`, newest first. Pass the tag name without the
    /// leading `#`.
    pub fn tagged(&self, tag: &str) -> Result<Vec<Post>, Error> {
        let path = format!("tags/{}.json", encode(tag));
        let response = self.get(&path)?;
        check(&response, &path, 200)?;
        Ok(response.json()?)
    }

    /// Follow a tag, adding it to the signed-in user's followed-tags
    /// stream. The pod answers `201`.
    pub fn follow_tag(&self, name: &str) -> Result<(), Error> {
        let token = self.token()?;
        let response = self.post_json("tag_followings", &token, &json!({ "name": name }))?;
        check(&response, "tag_followings", 201)
    }
}
