//! The authenticated pod session: cookie jar, csrf lifecycle, HTTP verbs.
//!
//! # Token lifecycle
//!
//! Pods protect every state-changing endpoint with a csrf token that is
//! only served inside HTML pages and is consumed on use. [`Session`]
//! therefore never caches a token: each mutating operation calls
//! [`Session::token`] immediately before its request. A token gone stale
//! anyway (pod restart, parallel client) surfaces as the pod's own
//! rejection status through [`Error::UnexpectedStatus`], not as a local
//! invariant.
//!
//! # Concurrency
//!
//! All calls block. The cookie jar is shared behind the client, but the
//! fetch-token-then-mutate sequence is not atomic: two threads mutating
//! through one `Session` can consume each other's tokens on the pod side.
//! Serialise externally, or give each logical actor its own `Session`.

use std::sync::Arc;

use reqwest::blocking::{Client, Response};
use reqwest::cookie::Jar;
use reqwest::redirect;
use tracing::debug;

use thistledown_api::UserInfo;

use crate::error::{AuthError, Error};
use crate::scrape;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An authenticated session against one pod.
///
/// Only [`Session::login`] produces a value, so holding a `Session` means
/// the sign-in handshake succeeded. The pod-side session lives in the
/// cookie jar for the life of the value; there is no sign-out call in the
/// pod API, sessions just expire.
#[derive(Debug)]
pub struct Session {
    /// Pod base URL with no trailing slash, e.g. `https://pod.example.com`.
    pub(crate) base: String,
    /// Cookie-carrying client. Follows redirects, like a browser.
    pub(crate) client: Client,
}

impl Session {
    /// Sign in to a pod and return the authenticated session.
    ///
    /// Fetches `/users/sign_in`, scrapes the csrf token out of the page,
    /// and submits the credentials as the sign-in form does. The pod
    /// confirms success with a `302` redirect; anything else is
    /// [`AuthError::LoginFailed`]. The redirect is observed, not followed,
    /// so the submission goes through a one-off non-redirecting client
    /// sharing the session's cookie jar.
    pub fn login(
        pod: impl Into<String>,
        username: &str,
        password: &str,
    ) -> Result<Self, Error> {
        let base = pod.into().trim_end_matches('/').to_string();

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()?;
        let sign_in_client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .redirect(redirect::Policy::none())
            .build()?;

        let session = Session { base, client };

        let response = session.get("users/sign_in")?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(AuthError::TokenPageUnavailable { status }.into());
        }
        let token = scrape::csrf_token(&response.text()?).ok_or(AuthError::TokenNotFound)?;

        let response = sign_in_client
            .post(session.url("users/sign_in"))
            .form(&[
                ("user[username]", username),
                ("user[password]", password),
                ("authenticity_token", token.as_str()),
            ])
            .send()?;
        let status = response.status().as_u16();
        if status != 302 {
            return Err(AuthError::LoginFailed { status }.into());
        }

        debug!("session: signed in to {}", session.base);
        Ok(session)
    }

    /// Fetch a fresh csrf token from the stream page.
    ///
    /// Pods treat these tokens as one-shot, so every mutating operation
    /// calls this immediately before its request rather than reusing an
    /// old value. Fails with [`AuthError::TokenNotFound`] when the page
    /// carries no marker, which is what an expired session looks like.
    pub fn token(&self) -> Result<String, Error> {
        debug!("session: refreshing csrf token");
        let response = self.get("stream")?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(AuthError::TokenPageUnavailable { status }.into());
        }
        let token = scrape::csrf_token(&response.text()?).ok_or(AuthError::TokenNotFound)?;
        Ok(token)
    }

    /// The logged-in user's own attributes, scraped from the bookmarklet
    /// page.
    pub fn user_info(&self) -> Result<UserInfo, Error> {
        let response = self.get("bookmarklet")?;
        check(&response, "bookmarklet", 200)?;
        let page = response.text()?;
        let blob = scrape::user_attributes(&page).ok_or(AuthError::UserInfoNotFound)?;
        Ok(serde_json::from_str(blob)?)
    }

    // -----------------------------------------------------------------------
    // HTTP primitives
    // -----------------------------------------------------------------------

    /// `GET {pod}/{path}`, returning the raw response.
    pub fn get(&self, path: &str) -> Result<Response, Error> {
        let url = self.url(path);
        debug!("session: GET {url}");
        Ok(self.client.get(url).send()?)
    }

    /// `GET {pod}/{path}?{query}`, returning the raw response.
    pub fn get_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, Error> {
        let url = self.url(path);
        debug!("session: GET {url} ({} query params)", query.len());
        Ok(self.client.get(url).query(query).send()?)
    }

    /// `POST {pod}/{path}` with a form body and extra headers, returning
    /// the raw response.
    pub fn post(
        &self,
        path: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Response, Error> {
        let url = self.url(path);
        debug!("session: POST {url}");
        let mut request = self.client.post(url).form(form);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        Ok(request.send()?)
    }

    /// `POST {pod}/{path}` with a JSON body, the csrf token in the
    /// `x-csrf-token` header, and a JSON accept, returning the raw
    /// response.
    pub fn post_json(
        &self,
        path: &str,
        token: &str,
        body: &serde_json::Value,
    ) -> Result<Response, Error> {
        let url = self.url(path);
        debug!("session: POST {url} (json)");
        let response = self
            .client
            .post(url)
            .header("x-csrf-token", token)
            .header("accept", "application/json")
            .json(body)
            .send()?;
        Ok(response)
    }

    /// `DELETE {pod}/{path}` with an optional form body and extra headers,
    /// returning the raw response.
    pub fn delete(
        &self,
        path: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Response, Error> {
        let url = self.url(path);
        debug!("session: DELETE {url}");
        let mut request = self.client.delete(url);
        if !form.is_empty() {
            request = request.form(form);
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        Ok(request.send()?)
    }

    /// Absolute URL for a pod-relative path.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }
}

/// Compare a response against the one status the endpoint answers on
/// success.
///
/// Each pod endpoint has exactly one such status, and they differ per
/// endpoint (200, 201, 204, and 404 for the delete-confirmation quirk), so
/// callers pass the expectation explicitly instead of testing `is_success`.
pub(crate) fn check(response: &Response, endpoint: &str, expected: u16) -> Result<(), Error> {
    let status = response.status().as_u16();
    if status != expected {
        return Err(Error::UnexpectedStatus {
            endpoint: endpoint.to_string(),
            status,
            expected,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // Network-facing behaviour is covered end-to-end by the conformance
    // package; these pin the pure parts.

    fn session_for(base: &str) -> Session {
        Session {
            base: base.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    #[test]
    fn url_joins_base_and_path() {
        let s = session_for("https://pod.example.com");
        assert_eq!(s.url("stream.json"), "https://pod.example.com/stream.json");
    }

    #[test]
    fn url_tolerates_slashes_on_both_sides() {
        let s = session_for("https://pod.example.com/");
        assert_eq!(
            s.url("/users/sign_in"),
            "https://pod.example.com/users/sign_in"
        );
    }

    // `Result<Session, _>` combinators (`unwrap_err`, `expect_err`) need
    // the Ok type to be Debug; callers assert on failed logins that way.
    #[test]
    fn debug_format_names_the_pod() {
        let s = session_for("https://pod.example.com");
        let repr = format!("{s:?}");
        assert!(repr.contains("pod.example.com"), "got: {repr}");
    }
}
