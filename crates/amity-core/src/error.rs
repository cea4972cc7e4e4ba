//! Error types for `amity-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no pending connection request from {from} to {to}")]
  PendingRequestNotFound { from: Uuid, to: Uuid },

  #[error("no connection between {0} and {1}")]
  ConnectionNotFound(Uuid, Uuid),

  #[error("connection between {0} and {1} already exists or is pending")]
  ConnectionExists(Uuid, Uuid),

  #[error("users cannot connect to themselves")]
  SelfConnection,

  #[error("message not found: {0}")]
  MessageNotFound(Uuid),

  #[error("message thread not found: {0}")]
  ThreadNotFound(Uuid),

  #[error("unknown privacy setting: {0:?}")]
  UnknownPrivacySetting(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
