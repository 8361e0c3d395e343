//! The notification feed.

use thistledown_api::Notification;

use crate::error::Error;
use crate::session::{check, Session};

impl Session {
    /// All notifications for the signed-in user, newest first. Each entry
    /// decodes from the pod's single-key `{kind: body}` envelope; see
    /// [`Notification`].
    pub fn notifications(&self) -> Result<Vec<Notification>, Error> {
        let response = self.get("notifications.json")?;
        check(&response, "notifications.json", 200)?;
        Ok(response.json()?)
    }
}
