//! The private-conversation mailbox.

use thistledown_api::{Conversation, ConversationEnvelope};

use crate::error::Error;
use crate::session::{check, Session};

impl Session {
    /// All conversation threads in the signed-in user's mailbox, with the
    /// per-item `{"conversation": …}` envelopes already unwrapped.
    pub fn mailbox(&self) -> Result<Vec<Conversation>, Error> {
        let response = self.get("conversations.json")?;
        check(&response, "conversations.json", 200)?;
        let envelopes: Vec<ConversationEnvelope> = response.json()?;
        Ok(envelopes.into_iter().map(|e| e.conversation).collect())
    }

    /// Start a new conversation and return the created thread.
    ///
    /// `contact_ids` are pod-local [`Person::id`]s, not guids; resolve
    /// people first via [`Session::search_people`] or
    /// [`Session::person_by_handle`]. The pod answers `200`.
    ///
    /// [`Person::id`]: crate::api::Person::id
    pub fn new_conversation(
        &self,
        contact_ids: &[u64],
        subject: &str,
        text: &str,
    ) -> Result<Conversation, Error> {
        let token = self.token()?;
        let ids = contact_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let response = self.post(
            "conversations/",
            &[
                ("contact_ids", ids.as_str()),
                ("conversation[subject]", subject),
                ("conversation[text]", text),
                // Rails form-encoding sentinel.
                ("utf8", "&#x2713;"),
                ("authenticity_token", token.as_str()),
            ],
            &[("accept", "application/json")],
        )?;
        check(&response, "conversations/", 200)?;
        Ok(response.json()?)
    }

    /// Add a message to an existing conversation. The pod answers `200`.
    pub fn reply_to_conversation(&self, conversation_id: u64, text: &str) -> Result<(), Error> {
        let token = self.token()?;
        let path = format!("conversations/{conversation_id}/messages");
        let response = self.post(
            &path,
            &[
                ("message[text]", text),
                ("utf8", "&#x2713;"),
                ("authenticity_token", token.as_str()),
            ],
            &[("accept", "application/json")],
        )?;
        check(&response, &path, 200)
    }

    /// Hide a conversation from the mailbox.
    ///
    /// Pods confirm the hide with `404` rather than a 2xx; that status is
    /// the success contract here, the same quirk as
    /// [`Session::remove_aspect`].
    pub fn hide_conversation(&self, conversation_id: u64) -> Result<(), Error> {
        let token = self.token()?;
        let path = format!("conversations/{conversation_id}/visibility");
        let response = self.delete(
            &path,
            &[("authenticity_token", token.as_str())],
            &[("accept", "application/json")],
        )?;
        check(&response, &path, 404)
    }
}
