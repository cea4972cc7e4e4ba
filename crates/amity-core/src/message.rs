//! Private messaging — threads and messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject given to a thread opened without one.
pub const DEFAULT_MESSAGE_SUBJECT: &str = "(no subject)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageThread {
  pub thread_id: Uuid,
  pub subject:   String,
}

/// A message within a thread. `posted_at` and `read` are store-assigned;
/// messages arrive unread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  pub message_id: Uuid,
  pub thread_id:  Uuid,
  pub from:       Uuid,
  pub to:         Uuid,
  pub body:       String,
  pub posted_at:  DateTime<Utc>,
  pub read:       bool,
}

/// Input to [`crate::store::MessageStore::send_message`]. Omitting
/// `thread_id` opens a new thread; a blank or missing subject becomes
/// [`DEFAULT_MESSAGE_SUBJECT`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
  pub from:      Uuid,
  pub to:        Uuid,
  pub body:      String,
  pub thread_id: Option<Uuid>,
  pub subject:   Option<String>,
}

/// A thread together with its most recent message, as listed in a user's
/// inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadView {
  pub thread: MessageThread,
  pub latest: Message,
}
