//! Extraction of values pods embed in HTML instead of serving as JSON.
//!
//! Two values only exist inside pages: the csrf token rides in a
//! `<meta content="…" name="csrf-token" />` tag, and the logged-in user's
//! attributes ride in a `window.current_user_attributes = {…}` script
//! assignment on the `/bookmarklet` page. Both extractors live here, with
//! an explicit miss (`None`) instead of a panic, so every call site shares
//! one definition of the markers.

use std::sync::LazyLock;

use regex::Regex;

static CSRF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"content="(.*?)" name="csrf-token""#).expect("invalid csrf regex")
});

static USER_ATTRIBUTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"window\.current_user_attributes = (\{.*\})")
        .expect("invalid user attributes regex")
});

/// Extract the csrf token from a pod page.
///
/// Returns `None` when the page carries no `csrf-token` meta tag, which
/// is how pods serve pages to signed-out visitors.
pub fn csrf_token(page: &str) -> Option<String> {
    CSRF_RE
        .captures(page)
        .map(|captures| captures[1].to_string())
}

/// Extract the raw `current_user_attributes` JSON blob from a pod page.
///
/// The capture is greedy to the last `}` on the assignment line, matching
/// the single-line object pods emit. Returns `None` when the assignment
/// is absent (signed-out page, or a pod that moved the blob).
pub fn user_attributes(page: &str) -> Option<&str> {
    USER_ATTRIBUTES_RE
        .captures(page)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SIGN_IN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta content="authenticity_token" name="csrf-param" />
<meta content="Teyiys9bYAwNXtElkydaNRSCSPYLolfXjXf9WeJUtzs=" name="csrf-token" />
<title>Sign in</title>
</head>
<body></body>
</html>"#;

    #[test]
    fn csrf_token_from_sign_in_page() {
        assert_eq!(
            csrf_token(SIGN_IN_PAGE).as_deref(),
            Some("Teyiys9bYAwNXtElkydaNRSCSPYLolfXjXf9WeJUtzs=")
        );
    }

    #[test]
    fn csrf_token_missing_marker() {
        assert_eq!(csrf_token("<html><body>plain page</body></html>"), None);
    }

    #[test]
    fn csrf_token_ignores_csrf_param_meta() {
        // The csrf-param meta right above the token must not match.
        let token = csrf_token(SIGN_IN_PAGE).unwrap();
        assert_ne!(token, "authenticity_token");
    }

    #[test]
    fn user_attributes_from_bookmarklet_page() {
        let page = concat!(
            "<script>\n",
            r#"  window.current_user_attributes = {"id": 1, "guid": "abc", "aspects": [{"id": 2, "name": "Family"}]};"#,
            "\n</script>",
        );
        let blob = user_attributes(page).unwrap();
        let value: serde_json::Value = serde_json::from_str(blob).unwrap();
        assert_eq!(value["guid"], "abc");
        assert_eq!(value["aspects"][0]["id"], 2);
    }

    #[test]
    fn user_attributes_missing_assignment() {
        assert_eq!(user_attributes("<html><body></body></html>"), None);
    }

    #[test]
    fn user_attributes_capture_spans_nested_objects() {
        let page = r#"window.current_user_attributes = {"id": 1, "avatar": {"small": "s.png"}};"#;
        assert_eq!(
            user_attributes(page),
            Some(r#"{"id": 1, "avatar": {"small": "s.png"}}"#)
        );
    }
}
