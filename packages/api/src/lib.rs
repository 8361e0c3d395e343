//! Wire-format types for the diaspora* pod JSON API.
//!
//! The pod API has no published schema; these types encode the JSON
//! shapes that pods actually serve, as observed on the wire. Every record
//! keeps unrecognised keys in an `extensions` map so that fields added by
//! newer pod releases survive a decode/encode round trip.
//!
//! # Payloads covered
//!
//! | Endpoint | Type |
//! |----------|------|
//! | `GET /stream.json`, `/mentions.json`, `/tags/{tag}.json` | `Vec<`[`Post`]`>` |
//! | `GET /people/{guid}/stream.json` | `Vec<`[`Post`]`>` |
//! | `GET /notifications.json` | `Vec<`[`Notification`]`>` |
//! | `GET /conversations.json` | `Vec<`[`ConversationEnvelope`]`>` |
//! | `GET /people.json?q=…` | `Vec<`[`Person`]`>` |
//! | `POST /status_messages` | [`Post`] |
//! | `POST /photos` | [`PhotoUploadResponse`] |
//! | `POST /aspects` | [`Aspect`] |
//! | `POST /aspect_memberships.json` | [`AspectMembership`] |
//! | `window.current_user_attributes` (scraped) | [`UserInfo`] |

pub mod aspect;
pub mod conversation;
pub mod handle;
pub mod notification;
pub mod person;
pub mod photo;
pub mod post;
pub mod user;

pub use aspect::{Aspect, AspectMembership};
pub use conversation::{Conversation, ConversationEnvelope};
pub use handle::{Handle, HandleError};
pub use notification::{Notification, NotificationBody, NotificationFormatError};
pub use person::{Avatar, AvatarSizes, Person};
pub use photo::{Photo, PhotoSizes, PhotoUploadResponse};
pub use post::{Interactions, Post};
pub use user::UserInfo;
