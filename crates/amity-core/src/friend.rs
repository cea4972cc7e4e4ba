//! Connection (friendship) records.
//!
//! A link starts life as a directional request and becomes a bidirectional
//! friendship once the requestee confirms it. Classification for search and
//! visibility treats a user as trivially their own friend; the evaluator's
//! self-access short-circuit is separate from that and fires first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the connection graph. `user_id` is the requester, `friend_id`
/// the requestee; a confirmed link counts in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendLink {
  pub user_id:      Uuid,
  pub friend_id:    Uuid,
  pub confirmed:    bool,
  pub requested_at: DateTime<Utc>,
  pub confirmed_at: Option<DateTime<Utc>>,
}

impl FriendLink {
  /// Whether this link connects `a` and `b`, in either column order.
  pub fn connects(&self, a: Uuid, b: Uuid) -> bool {
    (self.user_id == a && self.friend_id == b)
      || (self.user_id == b && self.friend_id == a)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn connects_ignores_column_order() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let link = FriendLink {
      user_id:      alice,
      friend_id:    bob,
      confirmed:    true,
      requested_at: Utc::now(),
      confirmed_at: Some(Utc::now()),
    };

    assert!(link.connects(alice, bob));
    assert!(link.connects(bob, alice));
    assert!(!link.connects(alice, Uuid::new_v4()));
  }
}
