//! Error types for session operations.

use thiserror::Error;

/// Login and token-extraction failures.
///
/// These are the failures that mean "you are not (or no longer) signed
/// in", as opposed to an individual call going wrong.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The credential submission did not come back with the `302` the pod
    /// answers on success.
    #[error("sign-in rejected: pod answered {status}, expected 302")]
    LoginFailed { status: u16 },

    /// The page the csrf token is scraped from answered a non-success
    /// status.
    #[error("token page answered {status}")]
    TokenPageUnavailable { status: u16 },

    /// The page contained no `csrf-token` meta marker. On an established
    /// session this means the pod signed the session out.
    #[error("no csrf-token marker in page")]
    TokenNotFound,

    /// The bookmarklet page contained no `current_user_attributes`
    /// assignment.
    #[error("no current_user_attributes in page")]
    UserInfoNotFound,
}

/// Any failure from a [`Session`](crate::Session) operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication or token scraping failed.
    #[error("auth: {0}")]
    Auth(#[from] AuthError),

    /// The pod answered a status other than the one hard-coded for the
    /// endpoint. Carries what came back and what was expected.
    #[error("{endpoint} answered {status}, expected {expected}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        expected: u16,
    },

    /// The HTTP request, response, or body decoding failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A scraped JSON blob did not parse.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
