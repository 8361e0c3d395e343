//! Aspect management: contact groups and their memberships.

use thistledown_api::{Aspect, AspectMembership};

use crate::error::Error;
use crate::session::{check, Session};

impl Session {
    /// The signed-in user's contact groups, from the scraped user
    /// attributes.
    pub fn aspects(&self) -> Result<Vec<Aspect>, Error> {
        Ok(self.user_info()?.aspects)
    }

    /// Create a new aspect and return its record. `contacts_visible`
    /// controls whether members of the aspect can see each other. The pod
    /// answers `200`.
    pub fn add_aspect(&self, name: &str, contacts_visible: bool) -> Result<Aspect, Error> {
        let token = self.token()?;
        let visible = if contacts_visible { "1" } else { "0" };
        let response = self.post(
            "aspects",
            &[
                ("aspect[name]", name),
                ("aspect[contacts_visible]", visible),
                ("authenticity_token", token.as_str()),
            ],
            &[("accept", "application/json")],
        )?;
        check(&response, "aspects", 200)?;
        Ok(response.json()?)
    }

    /// Delete an aspect.
    ///
    /// Pods confirm the delete with `404` rather than a 2xx. That quirk is
    /// the observed contract and is preserved here: any other status,
    /// 2xx included, is an [`Error::UnexpectedStatus`].
    pub fn remove_aspect(&self, aspect_id: u64) -> Result<(), Error> {
        let token = self.token()?;
        let path = format!("aspects/{aspect_id}");
        let response = self.delete(&path, &[("authenticity_token", token.as_str())], &[])?;
        check(&response, &path, 404)
    }

    /// Add a person to an aspect. The pod answers `201` with the new
    /// membership record; keep its `id` around for
    /// [`Session::remove_from_aspect`].
    pub fn add_to_aspect(
        &self,
        aspect_id: u64,
        person_id: u64,
    ) -> Result<AspectMembership, Error> {
        let token = self.token()?;
        let aspect = aspect_id.to_string();
        let person = person_id.to_string();
        let response = self.post(
            "aspect_memberships.json",
            &[
                ("aspect_id", aspect.as_str()),
                ("person_id", person.as_str()),
                ("authenticity_token", token.as_str()),
            ],
            &[],
        )?;
        check(&response, "aspect_memberships.json", 201)?;
        Ok(response.json()?)
    }

    /// Remove a membership created by [`Session::add_to_aspect`], by the
    /// membership id from that call's response. Pods only address
    /// membership deletes by that id, not by the `(aspect, person)` pair.
    /// The pod answers `200` with the removed record.
    pub fn remove_from_aspect(&self, membership_id: u64) -> Result<AspectMembership, Error> {
        let token = self.token()?;
        let path = format!("aspect_memberships/{membership_id}.json");
        let response = self.delete(&path, &[("authenticity_token", token.as_str())], &[])?;
        check(&response, &path, 200)?;
        Ok(response.json()?)
    }
}
