//! Federation handles: the `username@pod.example.com` strings that
//! identify a person network-wide.
//!
//! A handle names both *who* (the username) and *where* (the pod the
//! account lives on). HTTPS is assumed; the scheme is an implicit
//! constant. Pods also spell this value `diaspora_id` in feed payloads
//! and `handle` in search results; see [`crate::Person::diaspora_id`].

use thiserror::Error;

/// Errors that can occur when parsing a handle string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error("missing '@' separator in handle: '{0}'")]
    MissingAt(String),

    #[error("empty username in handle: '{0}'")]
    EmptyUsername(String),

    #[error("empty pod host in handle: '{0}'")]
    EmptyPod(String),

    #[error("whitespace in handle: '{0}'")]
    Whitespace(String),

    #[error("pod host is not a dotted domain: '{0}'")]
    PodNotDomain(String),
}

/// A parsed `username@pod.example.com` handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle {
    /// The account name on its home pod.
    pub username: String,
    /// The home pod's hostname, no scheme, no path.
    pub pod: String,
}

impl Handle {
    /// Construct from pre-validated parts.
    pub fn new(username: impl Into<String>, pod: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            pod: pod.into(),
        }
    }

    /// Parse a `username@pod.host` string.
    ///
    /// Rejects handles with no `@`, an empty side, embedded whitespace,
    /// or a pod host that is not a dotted domain name.
    pub fn parse(s: &str) -> Result<Self, HandleError> {
        let (username, pod) = s
            .split_once('@')
            .ok_or_else(|| HandleError::MissingAt(s.to_string()))?;

        if username.is_empty() {
            return Err(HandleError::EmptyUsername(s.to_string()));
        }
        if pod.is_empty() {
            return Err(HandleError::EmptyPod(s.to_string()));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(HandleError::Whitespace(s.to_string()));
        }
        if !pod.contains('.') || pod.contains('@') {
            return Err(HandleError::PodNotDomain(s.to_string()));
        }

        Ok(Self {
            username: username.to_string(),
            pod: pod.to_string(),
        })
    }

    /// The base URL of the handle's home pod, `https://pod.host`.
    pub fn pod_url(&self) -> String {
        format!("https://{}", self.pod)
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.username, self.pod)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        let h = Handle::parse("testuser@pod.example.com").unwrap();
        assert_eq!(h.username, "testuser");
        assert_eq!(h.pod, "pod.example.com");
    }

    #[test]
    fn parse_missing_at() {
        assert_eq!(
            Handle::parse("user.pod.example.com"),
            Err(HandleError::MissingAt("user.pod.example.com".into()))
        );
    }

    #[test]
    fn parse_empty_username() {
        assert!(matches!(
            Handle::parse("@pod.example.com"),
            Err(HandleError::EmptyUsername(_))
        ));
    }

    #[test]
    fn parse_empty_pod() {
        assert!(matches!(
            Handle::parse("user@"),
            Err(HandleError::EmptyPod(_))
        ));
    }

    #[test]
    fn parse_whitespace_in_username() {
        assert!(matches!(
            Handle::parse("use r@pod.example.com"),
            Err(HandleError::Whitespace(_))
        ));
    }

    #[test]
    fn parse_whitespace_in_pod() {
        assert!(matches!(
            Handle::parse("user0@pod300 example.com"),
            Err(HandleError::Whitespace(_))
        ));
    }

    #[test]
    fn parse_undotted_pod() {
        assert!(matches!(
            Handle::parse("user@podexamplecom"),
            Err(HandleError::PodNotDomain(_))
        ));
    }

    #[test]
    fn pod_url() {
        let h = Handle::new("testuser", "pod.example.com");
        assert_eq!(h.pod_url(), "https://pod.example.com");
    }

    #[test]
    fn display_roundtrip() {
        let original = "testuser@pod.example.com";
        let h = Handle::parse(original).unwrap();
        assert_eq!(h.to_string(), original);
    }
}
