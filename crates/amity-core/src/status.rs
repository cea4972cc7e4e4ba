//! Profile status — a short free-text message with a staleness window.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Statuses older than this are treated as absent on read.
pub const STATUS_MAX_AGE_DAYS: i64 = 7;

/// At most one status exists per user; setting a new one overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStatus {
  pub user_id:   Uuid,
  pub message:   String,
  pub posted_at: DateTime<Utc>,
}

impl ProfileStatus {
  pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
    now - self.posted_at > Duration::days(STATUS_MAX_AGE_DAYS)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_within_window_is_fresh() {
    let now = Utc::now();
    let status = ProfileStatus {
      user_id:   Uuid::new_v4(),
      message:   "at the library".into(),
      posted_at: now - Duration::days(6),
    };
    assert!(!status.is_stale(now));
  }

  #[test]
  fn status_older_than_window_is_stale() {
    let now = Utc::now();
    let status = ProfileStatus {
      user_id:   Uuid::new_v4(),
      message:   "back next week".into(),
      posted_at: now - Duration::days(8),
    };
    assert!(status.is_stale(now));
  }
}
