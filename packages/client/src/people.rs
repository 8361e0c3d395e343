//! People lookup: search, guid fetch, handle resolution, public feeds.

use urlencoding::encode;

use thistledown_api::{Handle, Person, Post};

use crate::error::Error;
use crate::session::{check, Session};

impl Session {
    /// Search people by name or handle fragment.
    pub fn search_people(&self, query: &str) -> Result<Vec<Person>, Error> {
        let response = self.get_query("people.json", &[("q", query)])?;
        check(&response, "people.json", 200)?;
        Ok(response.json()?)
    }

    /// Fetch one person by federation guid.
    pub fn person_by_guid(&self, guid: &str) -> Result<Person, Error> {
        let path = format!("people/{}.json", encode(guid));
        let response = self.get(&path)?;
        check(&response, &path, 200)?;
        Ok(response.json()?)
    }

    /// Resolve a federation handle to a person known to this pod.
    ///
    /// Runs a people search for the handle and keeps only an exact
    /// `diaspora_id` match (case-insensitive, handles are lowercase on the
    /// wire). `Ok(None)` means the pod has no contact with that handle;
    /// it does not reach out to the handle's home pod.
    pub fn person_by_handle(&self, handle: &Handle) -> Result<Option<Person>, Error> {
        let needle = handle.to_string();
        let hits = self.search_people(&needle)?;
        Ok(hits.into_iter().find(|person| {
            person
                .diaspora_id
                .as_deref()
                .is_some_and(|id| id.eq_ignore_ascii_case(&needle))
        }))
    }

    /// A person's public activity feed, newest first.
    pub fn person_stream(&self, guid: &str) -> Result<Vec<Post>, Error> {
        let path = format!("people/{}/stream.json", encode(guid));
        let response = self.get(&path)?;
        check(&response, &path, 200)?;
        Ok(response.json()?)
    }
}
