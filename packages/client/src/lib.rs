//! Blocking client for the diaspora* pod API.
//!
//! A [`Session`] signs in to one pod, holds the session cookie, and
//! refreshes the csrf token before every state-changing call. Operation
//! methods cover the feeds, posting, photos, notifications, aspects,
//! conversations, tags, and people lookup; each issues a single HTTP
//! request, checks the pod's one documented success status for that
//! endpoint, and decodes the JSON body into the records from
//! [`thistledown_api`].
//!
//! All I/O blocks on the calling thread. Errors propagate; nothing is
//! retried or logged away.
//!
//! ```no_run
//! use thistledown::{PostTarget, Session};
//!
//! # fn main() -> Result<(), thistledown::Error> {
//! let session = Session::login("https://pod.example.com", "alice", "correct-horse")?;
//! let post = session.create_post("hello from rust", &PostTarget::Public, &[])?;
//! println!("posted as {}", post.guid);
//! for notification in session.notifications()? {
//!     println!("[{}] {}", notification.kind, notification.body.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod scrape;

mod aspects;
mod conversations;
mod error;
mod notifications;
mod people;
mod photos;
mod session;
mod streams;
mod tags;

pub use crate::error::{AuthError, Error};
pub use crate::session::Session;
pub use crate::streams::PostTarget;

pub use thistledown_api as api;
