//! Per-user notification preferences.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kinds of events a user can opt into email notification for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailMessageType {
  ConnectionRequest,
  ConnectionConfirm,
  PrivateMessage,
}

/// One preferences record per user, created with defaults on first read.
///
/// `broadcast_status` opts status updates into the external broadcast queue;
/// credentials for the external service are the host's concern, not ours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
  pub user_id:          Uuid,
  pub email_on_request: bool,
  pub email_on_confirm: bool,
  pub email_on_message: bool,
  pub broadcast_status: bool,
}

impl Preferences {
  pub fn defaults_for(user_id: Uuid) -> Self {
    Self {
      user_id,
      email_on_request: true,
      email_on_confirm: true,
      email_on_message: true,
      broadcast_status: false,
    }
  }

  /// Whether an email should go out for the given event kind.
  pub fn email_enabled_for(&self, kind: EmailMessageType) -> bool {
    match kind {
      EmailMessageType::ConnectionRequest => self.email_on_request,
      EmailMessageType::ConnectionConfirm => self.email_on_confirm,
      EmailMessageType::PrivateMessage => self.email_on_message,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_toggles_are_independent() {
    let mut prefs = Preferences::defaults_for(Uuid::new_v4());
    prefs.email_on_confirm = false;

    assert!(prefs.email_enabled_for(EmailMessageType::ConnectionRequest));
    assert!(!prefs.email_enabled_for(EmailMessageType::ConnectionConfirm));
    assert!(prefs.email_enabled_for(EmailMessageType::PrivateMessage));
  }
}
