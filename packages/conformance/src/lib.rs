//! Shared helpers for the thistledown conformance test suite.
//!
//! Provides [`spawn_pod`], which runs a minimal in-process diaspora* pod
//! on an ephemeral port and returns its base URL together with a
//! [`PodState`] handle, so tests can seed feeds and inspect what the
//! client actually sent without standing up a real pod.
//!
//! The mock pod reproduces the contract surface the client depends on:
//! CSRF markers in page HTML, one-shot authenticity tokens, the session
//! cookie issued on sign-in, and the per-endpoint success statuses
//! (including the 404-on-success delete quirks).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Form, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Everything the mock pod remembers between requests.
///
/// Collections are plain `Mutex<Vec<Value>>` so tests can seed records
/// and inspect side effects directly. The `AtomicBool` switches induce
/// the failure modes the client has to survive: a sign-in page without
/// a CSRF marker, a pod that answers 5xx, and so on.
pub struct PodState {
    /// Credentials the pod accepts on `POST /users/sign_in`.
    pub username: String,
    pub password: String,

    /// Serve pages without the `csrf-token` meta tag.
    pub omit_csrf_marker: AtomicBool,
    /// Answer 503 on the sign-in and stream pages.
    pub maintenance: AtomicBool,
    /// Answer 500 on `POST /status_messages`.
    pub fail_status_messages: AtomicBool,
    /// Serve the bookmarklet page without the user attributes blob.
    pub omit_user_attributes: AtomicBool,

    /// Number of `GET /stream` requests served so far.
    pub token_page_hits: AtomicUsize,

    pub posts: Mutex<Vec<Value>>,
    pub people: Mutex<Vec<Value>>,
    pub notifications: Mutex<Vec<Value>>,
    pub conversations: Mutex<Vec<Value>>,
    pub aspects: Mutex<Vec<Value>>,
    pub memberships: Mutex<Vec<Value>>,
    pub followed_tags: Mutex<Vec<Value>>,

    /// Metadata of the most recent `POST /photos`, for assertions.
    pub last_upload: Mutex<Option<Value>>,

    csrf_token: Mutex<Option<String>>,
    session_cookie: Mutex<Option<String>>,
    tokens_issued: AtomicUsize,
    id_counter: AtomicU64,
}

impl PodState {
    fn new() -> Self {
        PodState {
            username: "teasel".into(),
            password: "hedgerow42".into(),
            omit_csrf_marker: AtomicBool::new(false),
            maintenance: AtomicBool::new(false),
            fail_status_messages: AtomicBool::new(false),
            omit_user_attributes: AtomicBool::new(false),
            token_page_hits: AtomicUsize::new(0),
            posts: Mutex::new(Vec::new()),
            people: Mutex::new(Vec::new()),
            notifications: Mutex::new(Vec::new()),
            conversations: Mutex::new(Vec::new()),
            aspects: Mutex::new(vec![
                json!({ "id": 4, "name": "Friends", "selected": true }),
                json!({ "id": 7, "name": "Acquaintances", "selected": false }),
            ]),
            memberships: Mutex::new(Vec::new()),
            followed_tags: Mutex::new(Vec::new()),
            last_upload: Mutex::new(None),
            csrf_token: Mutex::new(None),
            session_cookie: Mutex::new(None),
            tokens_issued: AtomicUsize::new(0),
            id_counter: AtomicU64::new(100),
        }
    }

    fn next_id(&self) -> u64 {
        self.id_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Mint a fresh one-shot authenticity token and make it the only
    /// token the pod will accept.
    fn issue_token(&self) -> String {
        let n = self.tokens_issued.fetch_add(1, Ordering::SeqCst);
        let token = format!("token-{n}");
        *self.csrf_token.lock().expect("csrf token lock") = Some(token.clone());
        token
    }

    /// Accept `presented` if it is the live token, and burn it.
    fn consume_token(&self, presented: &str) -> bool {
        let mut current = self.csrf_token.lock().expect("csrf token lock");
        match current.as_deref() {
            Some(live) if live == presented => {
                *current = None;
                true
            }
            _ => false,
        }
    }

    /// Render a page body with the standard diaspora* CSRF meta tags,
    /// unless `omit_csrf_marker` is set.
    fn marker_page(&self, body: &str) -> String {
        if self.omit_csrf_marker.load(Ordering::SeqCst) {
            return format!("<html><head></head><body>{body}</body></html>");
        }
        let token = self.issue_token();
        format!(
            "<html><head>\n\
             <meta content=\"authenticity_token\" name=\"csrf-param\" />\n\
             <meta content=\"{token}\" name=\"csrf-token\" />\n\
             </head><body>{body}</body></html>"
        )
    }

    fn signed_in(&self, headers: &HeaderMap) -> bool {
        let cookie = self.session_cookie.lock().expect("session cookie lock");
        let Some(expected) = cookie.as_deref() else {
            return false;
        };
        headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|sent| sent.contains(expected))
    }
}

/// Start an ephemeral in-process pod and return `(base_url, state)`.
///
/// The pod runs on a dedicated background thread with its own
/// single-threaded `tokio` runtime, so tests stay plain `#[test]`
/// functions and can drive it with the blocking client. The returned
/// `String` is the base URL, e.g. `http://127.0.0.1:51234`.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the pod fails to start.
pub fn spawn_pod() -> (String, Arc<PodState>) {
    let state = Arc::new(PodState::new());
    let router_state = Arc::clone(&state);

    let (addr_tx, addr_rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build pod runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind ephemeral port");
            let addr = listener.local_addr().expect("get local addr");
            addr_tx.send(addr).expect("report pod addr");
            axum::serve(listener, build_router(router_state))
                .await
                .expect("conformance pod error");
        });
    });

    let addr = addr_rx.recv().expect("pod failed to start");
    (format!("http://{addr}"), state)
}

fn build_router(state: Arc<PodState>) -> Router {
    Router::new()
        .route("/users/sign_in", get(sign_in_page).post(sign_in_submit))
        .route("/stream", get(stream_page))
        .route("/bookmarklet", get(bookmarklet_page))
        .route("/stream.json", get(posts_feed))
        .route("/mentions.json", get(posts_feed))
        .route("/tags/{tag}", get(tag_feed))
        .route("/notifications.json", get(notifications_feed))
        .route("/status_messages", post(create_status_message))
        .route("/posts/{id}", delete(delete_post))
        .route("/photos", post(upload_photo))
        .route("/aspects", post(create_aspect))
        .route("/aspects/{id}", delete(delete_aspect))
        .route("/aspect_memberships.json", post(create_membership))
        .route("/aspect_memberships/{id}", delete(delete_membership))
        .route("/conversations.json", get(mailbox_feed))
        .route("/conversations/", post(create_conversation))
        .route("/conversations/{id}/messages", post(create_message))
        .route("/conversations/{id}/visibility", delete(hide_conversation))
        .route("/people.json", get(people_search))
        .route("/people/{guid}", get(person_record))
        .route("/people/{guid}/stream.json", get(person_feed))
        .route("/tag_followings", post(create_tag_following))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Pages: sign-in, stream, bookmarklet
// ---------------------------------------------------------------------------

async fn sign_in_page(State(pod): State<Arc<PodState>>) -> Response {
    if pod.maintenance.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance").into_response();
    }
    Html(pod.marker_page("sign in")).into_response()
}

async fn sign_in_submit(
    State(pod): State<Arc<PodState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let token_ok = form
        .get("authenticity_token")
        .is_some_and(|token| pod.consume_token(token));
    let creds_ok = form.get("user[username]") == Some(&pod.username)
        && form.get("user[password]") == Some(&pod.password);
    if !(token_ok && creds_ok) {
        // Devise re-renders the sign-in page on bad credentials.
        return Html(pod.marker_page("sign in")).into_response();
    }

    let cookie = format!("_pod_session=sess-{}", pod.next_id());
    *pod.session_cookie.lock().expect("session cookie lock") = Some(cookie.clone());
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, "/stream".to_string()),
            (header::SET_COOKIE, format!("{cookie}; Path=/")),
        ],
    )
        .into_response()
}

async fn stream_page(State(pod): State<Arc<PodState>>, headers: HeaderMap) -> Response {
    pod.token_page_hits.fetch_add(1, Ordering::SeqCst);
    if pod.maintenance.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance").into_response();
    }
    if !pod.signed_in(&headers) {
        return Html("<html><body>please sign in</body></html>".to_string()).into_response();
    }
    Html(pod.marker_page("stream")).into_response()
}

async fn bookmarklet_page(State(pod): State<Arc<PodState>>, headers: HeaderMap) -> Response {
    if !pod.signed_in(&headers) || pod.omit_user_attributes.load(Ordering::SeqCst) {
        return Html("<html><body>please sign in</body></html>".to_string()).into_response();
    }
    let aspects = pod.aspects.lock().expect("aspects lock").clone();
    let notification_count = pod.notifications.lock().expect("notifications lock").len();
    let attributes = json!({
        "id": 1,
        "guid": "00000000-aaaa-bbbb-cccc-111111111111",
        "name": "Teasel Burdock",
        "diaspora_id": format!("{}@pod.example.com", pod.username),
        "notifications_count": notification_count,
        "unread_messages_count": 0,
        "admin": false,
        "aspects": aspects,
    });
    Html(format!(
        "<html><body><script>window.current_user_attributes = {attributes}</script></body></html>"
    ))
    .into_response()
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

async fn posts_feed(State(pod): State<Arc<PodState>>, headers: HeaderMap) -> Response {
    if !pod.signed_in(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let posts = pod.posts.lock().expect("posts lock").clone();
    Json(posts).into_response()
}

async fn tag_feed(State(pod): State<Arc<PodState>>, Path(raw): Path<String>) -> Response {
    let tag = raw.trim_end_matches(".json");
    let needle = format!("#{tag}");
    let posts: Vec<Value> = pod
        .posts
        .lock()
        .expect("posts lock")
        .iter()
        .filter(|post| post["text"].as_str().is_some_and(|text| text.contains(&needle)))
        .cloned()
        .collect();
    Json(posts).into_response()
}

async fn notifications_feed(State(pod): State<Arc<PodState>>) -> Json<Vec<Value>> {
    Json(pod.notifications.lock().expect("notifications lock").clone())
}

async fn mailbox_feed(State(pod): State<Arc<PodState>>) -> Json<Vec<Value>> {
    let envelopes = pod
        .conversations
        .lock()
        .expect("conversations lock")
        .iter()
        .map(|conversation| json!({ "conversation": conversation }))
        .collect();
    Json(envelopes)
}

// ---------------------------------------------------------------------------
// Posts and photos
// ---------------------------------------------------------------------------

async fn create_status_message(
    State(pod): State<Arc<PodState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if pod.fail_status_messages.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "pod exploded").into_response();
    }
    if !header_token_ok(&pod, &headers) {
        return (StatusCode::FORBIDDEN, "stale authenticity token").into_response();
    }

    let id = pod.next_id();
    let post = json!({
        "id": id,
        "guid": format!("post-guid-{id}"),
        "text": body["status_message"]["text"].as_str().unwrap_or_default(),
        "public": body["aspect_ids"] == json!("public"),
        "created_at": "2026-03-01T12:00:00.000Z",
    });
    pod.posts.lock().expect("posts lock").push(post.clone());
    (StatusCode::CREATED, Json(post)).into_response()
}

async fn delete_post(
    State(pod): State<Arc<PodState>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if !header_token_ok(&pod, &headers) {
        return (StatusCode::FORBIDDEN, "stale authenticity token").into_response();
    }
    let mut posts = pod.posts.lock().expect("posts lock");
    let before = posts.len();
    posts.retain(|post| post["id"].as_u64() != Some(id));
    if posts.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn upload_photo(
    State(pod): State<Arc<PodState>>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !header_token_ok(&pod, &headers) {
        return (StatusCode::FORBIDDEN, "stale authenticity token").into_response();
    }

    let filename = headers
        .get("x-file-name")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let aspect_ids: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "photo[aspect_ids][]")
        .map(|(_, value)| value.as_str())
        .collect();
    let pending = params
        .iter()
        .find(|(key, _)| key == "photo[pending]")
        .map(|(_, value)| value.clone());
    *pod.last_upload.lock().expect("last upload lock") = Some(json!({
        "filename": filename,
        "bytes": body.len(),
        "pending": pending,
        "aspect_ids": aspect_ids,
    }));

    let id = pod.next_id();
    Json(json!({
        "data": {
            "photo": {
                "id": id,
                "guid": format!("photo-guid-{id}"),
                "created_at": "2026-03-01T12:00:00.000Z",
                "sizes": {
                    "small": format!("/uploads/images/thumb_small_{id}.png"),
                    "medium": format!("/uploads/images/thumb_medium_{id}.png"),
                    "large": format!("/uploads/images/scaled_full_{id}.png"),
                },
            },
        },
        "success": true,
    }))
    .into_response()
}

// ---------------------------------------------------------------------------
// Aspects and memberships
// ---------------------------------------------------------------------------

async fn create_aspect(
    State(pod): State<Arc<PodState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !form_token_ok(&pod, &form) {
        return (StatusCode::FORBIDDEN, "stale authenticity token").into_response();
    }
    let id = pod.next_id();
    let aspect = json!({
        "id": id,
        "name": form.get("aspect[name]").cloned().unwrap_or_default(),
        "selected": false,
    });
    pod.aspects.lock().expect("aspects lock").push(aspect.clone());
    Json(aspect).into_response()
}

async fn delete_aspect(
    State(pod): State<Arc<PodState>>,
    Path(id): Path<u64>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !form_token_ok(&pod, &form) {
        return (StatusCode::FORBIDDEN, "stale authenticity token").into_response();
    }
    pod.aspects
        .lock()
        .expect("aspects lock")
        .retain(|aspect| aspect["id"].as_u64() != Some(id));
    // A destroyed aspect redirects to a page that no longer exists, so
    // the pod answers a successful delete with 404.
    StatusCode::NOT_FOUND.into_response()
}

async fn create_membership(
    State(pod): State<Arc<PodState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !form_token_ok(&pod, &form) {
        return (StatusCode::FORBIDDEN, "stale authenticity token").into_response();
    }
    let parse = |key: &str| {
        form.get(key)
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or_default()
    };
    let id = pod.next_id();
    let membership = json!({
        "id": id,
        "aspect_id": parse("aspect_id"),
        "person_id": parse("person_id"),
    });
    pod.memberships
        .lock()
        .expect("memberships lock")
        .push(membership.clone());
    (StatusCode::CREATED, Json(membership)).into_response()
}

async fn delete_membership(
    State(pod): State<Arc<PodState>>,
    Path(raw): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !form_token_ok(&pod, &form) {
        return (StatusCode::FORBIDDEN, "stale authenticity token").into_response();
    }
    let id: u64 = match raw.trim_end_matches(".json").parse() {
        Ok(id) => id,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };
    let mut memberships = pod.memberships.lock().expect("memberships lock");
    let Some(index) = memberships
        .iter()
        .position(|membership| membership["id"].as_u64() == Some(id))
    else {
        return StatusCode::NOT_FOUND.into_response();
    };
    Json(memberships.remove(index)).into_response()
}

// ---------------------------------------------------------------------------
// Conversations
// ---------------------------------------------------------------------------

async fn create_conversation(
    State(pod): State<Arc<PodState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !form_token_ok(&pod, &form) {
        return (StatusCode::FORBIDDEN, "stale authenticity token").into_response();
    }
    let contact_ids: Vec<u64> = form
        .get("contact_ids")
        .map(|raw| raw.split(',').filter_map(|part| part.parse().ok()).collect())
        .unwrap_or_default();
    let id = pod.next_id();
    let conversation = json!({
        "id": id,
        "guid": format!("conversation-guid-{id}"),
        "subject": form.get("conversation[subject]").cloned().unwrap_or_default(),
        "author_id": 1,
        "created_at": "2026-03-01T12:00:00.000Z",
        "updated_at": "2026-03-01T12:00:00.000Z",
        "participants": contact_ids
            .iter()
            .map(|contact| json!({ "id": contact, "guid": format!("person-guid-{contact}") }))
            .collect::<Vec<_>>(),
    });
    pod.conversations
        .lock()
        .expect("conversations lock")
        .push(conversation.clone());
    Json(conversation).into_response()
}

async fn create_message(
    State(pod): State<Arc<PodState>>,
    Path(id): Path<u64>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !form_token_ok(&pod, &form) {
        return (StatusCode::FORBIDDEN, "stale authenticity token").into_response();
    }
    let known = pod
        .conversations
        .lock()
        .expect("conversations lock")
        .iter()
        .any(|conversation| conversation["id"].as_u64() == Some(id));
    if !known {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({})).into_response()
}

async fn hide_conversation(
    State(pod): State<Arc<PodState>>,
    Path(id): Path<u64>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !form_token_ok(&pod, &form) {
        return (StatusCode::FORBIDDEN, "stale authenticity token").into_response();
    }
    pod.conversations
        .lock()
        .expect("conversations lock")
        .retain(|conversation| conversation["id"].as_u64() != Some(id));
    // The visibility row is gone once hidden, so the pod answers a
    // successful hide with 404.
    StatusCode::NOT_FOUND.into_response()
}

// ---------------------------------------------------------------------------
// People and tags
// ---------------------------------------------------------------------------

async fn people_search(
    State(pod): State<Arc<PodState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let query = params.get("q").cloned().unwrap_or_default().to_lowercase();
    let matches = pod
        .people
        .lock()
        .expect("people lock")
        .iter()
        .filter(|person| {
            ["name", "diaspora_id", "handle"].iter().any(|field| {
                person[field]
                    .as_str()
                    .is_some_and(|value| value.to_lowercase().contains(&query))
            })
        })
        .cloned()
        .collect();
    Json(matches)
}

async fn person_record(State(pod): State<Arc<PodState>>, Path(raw): Path<String>) -> Response {
    let guid = raw.trim_end_matches(".json");
    let people = pod.people.lock().expect("people lock");
    match people.iter().find(|person| person["guid"].as_str() == Some(guid)) {
        Some(person) => Json(person.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn person_feed(State(pod): State<Arc<PodState>>, Path(_guid): Path<String>) -> Json<Vec<Value>> {
    Json(pod.posts.lock().expect("posts lock").clone())
}

async fn create_tag_following(
    State(pod): State<Arc<PodState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !header_token_ok(&pod, &headers) {
        return (StatusCode::FORBIDDEN, "stale authenticity token").into_response();
    }
    let id = pod.next_id();
    let following = json!({
        "id": id,
        "name": body["name"].as_str().unwrap_or_default(),
    });
    pod.followed_tags
        .lock()
        .expect("followed tags lock")
        .push(following.clone());
    (StatusCode::CREATED, Json(following)).into_response()
}

// ---------------------------------------------------------------------------
// Token checks
// ---------------------------------------------------------------------------

fn header_token_ok(pod: &PodState, headers: &HeaderMap) -> bool {
    headers
        .get("x-csrf-token")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|token| pod.consume_token(token))
}

fn form_token_ok(pod: &PodState, form: &HashMap<String, String>) -> bool {
    form.get("authenticity_token")
        .is_some_and(|token| pod.consume_token(token))
}
