//! Store traits implemented by storage backends (e.g. `amity-store-sqlite`).
//!
//! Interfaces are kept narrow — one trait per concern — so call sites declare
//! only what they touch. Higher layers depend on these abstractions, never
//! on a concrete backend. All methods return `Send` futures so the traits
//! can be used in multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  friend::FriendLink,
  image::{ExternalImage, ProfileImageRecord},
  message::{Message, MessageThread, NewMessage, ThreadView},
  preferences::Preferences,
  privacy::PrivacyProfile,
  status::ProfileStatus,
};

// ─── Privacy ─────────────────────────────────────────────────────────────────

/// Persistence for [`PrivacyProfile`] records.
///
/// `load_privacy` returns `None` for users who never saved settings; callers
/// fill the gap from [`crate::privacy::PrivacyDefaults`] so the evaluator
/// never sees a missing facet.
pub trait PrivacyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn load_privacy(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<PrivacyProfile>, Self::Error>> + Send + '_;

  /// Insert or update the record for `profile.user_id`.
  fn save_privacy(
    &self,
    profile: PrivacyProfile,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Friendship ──────────────────────────────────────────────────────────────

/// The connection graph: requests, confirmations, and classification.
pub trait FriendshipStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Record a pending request from `from` to `to`.
  ///
  /// Errors if `from == to` or a link between the pair already exists in
  /// either direction (pending or confirmed).
  fn request_friend(
    &self,
    from: Uuid,
    to: Uuid,
  ) -> impl Future<Output = Result<FriendLink, Self::Error>> + Send + '_;

  /// Confirm the pending request from `from` to `to`. Errors if none exists.
  fn confirm_request(
    &self,
    from: Uuid,
    to: Uuid,
  ) -> impl Future<Output = Result<FriendLink, Self::Error>> + Send + '_;

  /// Drop the pending request from `from` to `to` without confirming it.
  fn ignore_request(
    &self,
    from: Uuid,
    to: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete the confirmed link between two users, whichever way round it was
  /// recorded. Errors if no confirmed link exists.
  fn remove_friend(
    &self,
    user_id: Uuid,
    friend_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Ids of everyone with a confirmed link to `user_id`, either direction.
  fn confirmed_friend_ids(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  /// Ids of users with an unconfirmed request *to* `user_id`.
  fn pending_request_ids(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  /// Whether an unconfirmed request from `from` to `to` exists.
  fn has_pending_request(
    &self,
    from: Uuid,
    to: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Friendship classification: `true` when the ids are equal or a confirmed
  /// link exists between them.
  fn is_friend(
    &self,
    a: Uuid,
    b: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub trait StatusStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The user's current status, or `None` if unset or older than
  /// [`crate::status::STATUS_MAX_AGE_DAYS`].
  fn status(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<ProfileStatus>, Self::Error>> + Send + '_;

  /// Overwrite the user's status; `posted_at` is set by the store.
  fn set_status(
    &self,
    user_id: Uuid,
    message: String,
  ) -> impl Future<Output = Result<ProfileStatus, Self::Error>> + Send + '_;

  /// Delete the user's status. Returns whether a record existed.
  fn clear_status(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Preferences ─────────────────────────────────────────────────────────────

pub trait PreferenceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn load_preferences(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Preferences>, Self::Error>> + Send + '_;

  fn save_preferences(
    &self,
    prefs: Preferences,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Images ──────────────────────────────────────────────────────────────────

pub trait ImageStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn current_image(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<ProfileImageRecord>, Self::Error>> + Send + '_;

  /// Record a newly uploaded image as current, invalidating every previous
  /// record for the user.
  fn add_image(
    &self,
    user_id: Uuid,
    main_path: String,
    thumbnail_path: Option<String>,
  ) -> impl Future<Output = Result<ProfileImageRecord, Self::Error>> + Send + '_;

  /// Superseded (non-current) image records, newest first.
  fn image_history(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ProfileImageRecord>, Self::Error>> + Send + '_;

  fn external_image(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<ExternalImage>, Self::Error>> + Send + '_;

  /// Insert or update the user's external image record.
  fn save_external_image(
    &self,
    image: ExternalImage,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Messages ────────────────────────────────────────────────────────────────

pub trait MessageStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a message, opening a new thread when `thread_id` is absent.
  /// Errors if a given `thread_id` does not exist.
  fn send_message(
    &self,
    input: NewMessage,
  ) -> impl Future<Output = Result<Message, Self::Error>> + Send + '_;

  /// Threads the user participates in, most recently active first, each with
  /// its latest message.
  fn threads_for(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ThreadView>, Self::Error>> + Send + '_;

  fn thread(
    &self,
    thread_id: Uuid,
  ) -> impl Future<Output = Result<Option<MessageThread>, Self::Error>> + Send + '_;

  /// Messages in a thread, oldest first.
  fn messages_in_thread(
    &self,
    thread_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Message>, Self::Error>> + Send + '_;

  /// Count of unread messages addressed to the user, across all threads.
  fn unread_count(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Flip a message's read flag. Errors if the message does not exist.
  fn mark_read(
    &self,
    message_id: Uuid,
    read: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Combined bound ──────────────────────────────────────────────────────────

/// Convenience bound for backends implementing every store trait with a
/// single error type; blanket-implemented.
pub trait SocialStore:
  PrivacyStore
  + FriendshipStore<Error = <Self as PrivacyStore>::Error>
  + StatusStore<Error = <Self as PrivacyStore>::Error>
  + PreferenceStore<Error = <Self as PrivacyStore>::Error>
  + ImageStore<Error = <Self as PrivacyStore>::Error>
  + MessageStore<Error = <Self as PrivacyStore>::Error>
{
}

impl<T> SocialStore for T where
  T: PrivacyStore
    + FriendshipStore<Error = <T as PrivacyStore>::Error>
    + StatusStore<Error = <T as PrivacyStore>::Error>
    + PreferenceStore<Error = <T as PrivacyStore>::Error>
    + ImageStore<Error = <T as PrivacyStore>::Error>
    + MessageStore<Error = <T as PrivacyStore>::Error>
{
}
