//! Integration tests for `SqliteStore` against an in-memory database.

use amity_core::{
  message::{DEFAULT_MESSAGE_SUBJECT, NewMessage},
  preferences::Preferences,
  privacy::{Facet, PrivacyDefaults, PrivacyProfile, PrivacySetting},
  status::STATUS_MAX_AGE_DAYS,
  store::{
    FriendshipStore, ImageStore, MessageStore, PreferenceStore, PrivacyStore,
    StatusStore,
  },
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Privacy ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_privacy_missing_returns_none() {
  let s = store().await;
  let result = s.load_privacy(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn save_and_load_privacy() {
  let s = store().await;
  let alice = Uuid::new_v4();

  let mut profile =
    PrivacyProfile::from_defaults(alice, &PrivacyDefaults::default());
  profile.set(Facet::BasicInfo, PrivacySetting::OnlyMe);
  profile.show_birth_year = false;

  s.save_privacy(profile.clone()).await.unwrap();

  let loaded = s.load_privacy(alice).await.unwrap().unwrap();
  assert_eq!(loaded, profile);
}

#[tokio::test]
async fn save_privacy_overwrites_previous_record() {
  let s = store().await;
  let alice = Uuid::new_v4();

  let mut profile =
    PrivacyProfile::from_defaults(alice, &PrivacyDefaults::default());
  s.save_privacy(profile.clone()).await.unwrap();

  profile.set(Facet::Status, PrivacySetting::OnlyFriends);
  s.save_privacy(profile.clone()).await.unwrap();

  let loaded = s.load_privacy(alice).await.unwrap().unwrap();
  assert_eq!(loaded.status, PrivacySetting::OnlyFriends);
}

// ─── Friendship ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn request_confirm_and_remove_connection() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  let link = s.request_friend(alice, bob).await.unwrap();
  assert!(!link.confirmed);
  assert!(link.confirmed_at.is_none());

  // Pending, not yet a friendship.
  assert!(!s.is_friend(alice, bob).await.unwrap());
  assert_eq!(s.pending_request_ids(bob).await.unwrap(), vec![alice]);
  assert!(s.has_pending_request(alice, bob).await.unwrap());

  let confirmed = s.confirm_request(alice, bob).await.unwrap();
  assert!(confirmed.confirmed);
  assert!(confirmed.confirmed_at.is_some());

  // Symmetric, and the pending list drains.
  assert!(s.is_friend(alice, bob).await.unwrap());
  assert!(s.is_friend(bob, alice).await.unwrap());
  assert!(s.pending_request_ids(bob).await.unwrap().is_empty());
  assert_eq!(s.confirmed_friend_ids(alice).await.unwrap(), vec![bob]);
  assert_eq!(s.confirmed_friend_ids(bob).await.unwrap(), vec![alice]);

  // Removal works from either side of the link.
  s.remove_friend(bob, alice).await.unwrap();
  assert!(!s.is_friend(alice, bob).await.unwrap());
}

#[tokio::test]
async fn self_request_is_rejected() {
  let s = store().await;
  let alice = Uuid::new_v4();

  let err = s.request_friend(alice, alice).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(amity_core::Error::SelfConnection)
  ));
}

#[tokio::test]
async fn duplicate_request_is_rejected_in_both_directions() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  s.request_friend(alice, bob).await.unwrap();

  let err = s.request_friend(alice, bob).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(amity_core::Error::ConnectionExists(..))
  ));

  let err = s.request_friend(bob, alice).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(amity_core::Error::ConnectionExists(..))
  ));
}

#[tokio::test]
async fn ignore_request_drops_the_pending_link() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  s.request_friend(alice, bob).await.unwrap();
  s.ignore_request(alice, bob).await.unwrap();

  assert!(s.pending_request_ids(bob).await.unwrap().is_empty());
  // A fresh request is allowed afterwards.
  s.request_friend(alice, bob).await.unwrap();
}

#[tokio::test]
async fn confirm_without_pending_request_fails() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  let err = s.confirm_request(alice, bob).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(amity_core::Error::PendingRequestNotFound { .. })
  ));
}

#[tokio::test]
async fn confirm_is_directional() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  s.request_friend(alice, bob).await.unwrap();

  // Only the recipient's side may confirm; the stored direction matters.
  let err = s.confirm_request(bob, alice).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(amity_core::Error::PendingRequestNotFound { .. })
  ));
}

#[tokio::test]
async fn concurrent_reverse_requests_leave_a_single_link() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  let (a, b) = tokio::join!(
    s.request_friend(alice, bob),
    s.request_friend(bob, alice),
  );

  // Exactly one side wins; the other sees the existing link.
  assert!(a.is_ok() != b.is_ok());
  let pending = s.pending_request_ids(alice).await.unwrap().len()
    + s.pending_request_ids(bob).await.unwrap().len();
  assert_eq!(pending, 1);
}

#[tokio::test]
async fn is_friend_with_self_is_always_true() {
  let s = store().await;
  let alice = Uuid::new_v4();
  assert!(s.is_friend(alice, alice).await.unwrap());
}

#[tokio::test]
async fn remove_friend_without_confirmed_link_fails() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  s.request_friend(alice, bob).await.unwrap();

  // Pending links are not removable as friendships.
  let err = s.remove_friend(alice, bob).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(amity_core::Error::ConnectionNotFound(..))
  ));
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_and_read_status() {
  let s = store().await;
  let alice = Uuid::new_v4();

  let posted = s.set_status(alice, "at the library".into()).await.unwrap();
  assert_eq!(posted.message, "at the library");

  let read = s.status(alice).await.unwrap().unwrap();
  assert_eq!(read, posted);
}

#[tokio::test]
async fn setting_status_overwrites_the_previous_one() {
  let s = store().await;
  let alice = Uuid::new_v4();

  s.set_status(alice, "first".into()).await.unwrap();
  s.set_status(alice, "second".into()).await.unwrap();

  let read = s.status(alice).await.unwrap().unwrap();
  assert_eq!(read.message, "second");
}

#[tokio::test]
async fn status_older_than_the_window_reads_as_absent() {
  let s = store().await;
  let alice = Uuid::new_v4();

  s.set_status(alice, "old news".into()).await.unwrap();
  s.backdate_status(
    alice,
    Utc::now() - Duration::days(STATUS_MAX_AGE_DAYS + 1),
  )
  .await
  .unwrap();

  assert!(s.status(alice).await.unwrap().is_none());
  // The row itself is retained until overwritten or cleared.
  assert!(s.clear_status(alice).await.unwrap());
}

#[tokio::test]
async fn clear_status_reports_whether_one_existed() {
  let s = store().await;
  let alice = Uuid::new_v4();

  assert!(!s.clear_status(alice).await.unwrap());

  s.set_status(alice, "away".into()).await.unwrap();
  assert!(s.clear_status(alice).await.unwrap());
  assert!(s.status(alice).await.unwrap().is_none());
}

// ─── Preferences ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn preferences_roundtrip() {
  let s = store().await;
  let alice = Uuid::new_v4();

  assert!(s.load_preferences(alice).await.unwrap().is_none());

  let mut prefs = Preferences::defaults_for(alice);
  prefs.email_on_message = false;
  prefs.broadcast_status = true;
  s.save_preferences(prefs.clone()).await.unwrap();

  let loaded = s.load_preferences(alice).await.unwrap().unwrap();
  assert_eq!(loaded, prefs);
}

// ─── Images ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn adding_an_image_supersedes_the_previous_one() {
  let s = store().await;
  let alice = Uuid::new_v4();

  assert!(s.current_image(alice).await.unwrap().is_none());

  let first = s
    .add_image(alice, "/images/a/1.jpg".into(), Some("/images/a/1t.jpg".into()))
    .await
    .unwrap();
  let second = s
    .add_image(alice, "/images/a/2.jpg".into(), None)
    .await
    .unwrap();

  let current = s.current_image(alice).await.unwrap().unwrap();
  assert_eq!(current.image_id, second.image_id);
  assert!(current.current);

  let history = s.image_history(alice).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].image_id, first.image_id);
  assert!(!history[0].current);
}

#[tokio::test]
async fn external_image_upserts() {
  let s = store().await;
  let alice = Uuid::new_v4();

  assert!(s.external_image(alice).await.unwrap().is_none());

  s.save_external_image(amity_core::image::ExternalImage {
    user_id:       alice,
    main_url:      "https://img.example.com/a.png".into(),
    thumbnail_url: None,
  })
  .await
  .unwrap();

  s.save_external_image(amity_core::image::ExternalImage {
    user_id:       alice,
    main_url:      "https://img.example.com/b.png".into(),
    thumbnail_url: Some("https://img.example.com/b-thumb.png".into()),
  })
  .await
  .unwrap();

  let loaded = s.external_image(alice).await.unwrap().unwrap();
  assert_eq!(loaded.main_url, "https://img.example.com/b.png");
  assert!(loaded.thumbnail_url.is_some());
}

// ─── Messages ────────────────────────────────────────────────────────────────

fn new_message(from: Uuid, to: Uuid, body: &str) -> NewMessage {
  NewMessage {
    from,
    to,
    body: body.into(),
    thread_id: None,
    subject: None,
  }
}

#[tokio::test]
async fn sending_without_a_thread_opens_one_with_the_default_subject() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  let msg = s.send_message(new_message(alice, bob, "hi")).await.unwrap();
  assert!(!msg.read);

  let thread = s.thread(msg.thread_id).await.unwrap().unwrap();
  assert_eq!(thread.subject, DEFAULT_MESSAGE_SUBJECT);
}

#[tokio::test]
async fn blank_subjects_fall_back_to_the_default() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  let mut input = new_message(alice, bob, "hi");
  input.subject = Some("   ".into());

  let msg = s.send_message(input).await.unwrap();
  let thread = s.thread(msg.thread_id).await.unwrap().unwrap();
  assert_eq!(thread.subject, DEFAULT_MESSAGE_SUBJECT);
}

#[tokio::test]
async fn replies_land_in_the_same_thread_in_order() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  let mut opener = new_message(alice, bob, "lunch?");
  opener.subject = Some("plans".into());
  let first = s.send_message(opener).await.unwrap();

  let mut reply = new_message(bob, alice, "sure");
  reply.thread_id = Some(first.thread_id);
  let second = s.send_message(reply).await.unwrap();
  assert_eq!(second.thread_id, first.thread_id);

  let messages = s.messages_in_thread(first.thread_id).await.unwrap();
  assert_eq!(messages.len(), 2);
  assert_eq!(messages[0].message_id, first.message_id);
  assert_eq!(messages[1].message_id, second.message_id);
}

#[tokio::test]
async fn replying_to_a_missing_thread_fails() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  let mut input = new_message(alice, bob, "hello?");
  input.thread_id = Some(Uuid::new_v4());

  let err = s.send_message(input).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(amity_core::Error::ThreadNotFound(_))
  ));
}

#[tokio::test]
async fn inbox_lists_threads_with_their_latest_message() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  let carol = Uuid::new_v4();

  let first = s.send_message(new_message(alice, bob, "one")).await.unwrap();
  s.send_message(new_message(carol, alice, "two")).await.unwrap();

  let mut reply = new_message(bob, alice, "three");
  reply.thread_id = Some(first.thread_id);
  let latest = s.send_message(reply).await.unwrap();

  let inbox = s.threads_for(alice).await.unwrap();
  assert_eq!(inbox.len(), 2);
  // Most recently active thread first, carrying its newest message.
  assert_eq!(inbox[0].thread.thread_id, first.thread_id);
  assert_eq!(inbox[0].latest.message_id, latest.message_id);

  // A bystander sees neither thread.
  let uninvolved = s.threads_for(Uuid::new_v4()).await.unwrap();
  assert!(uninvolved.is_empty());
}

#[tokio::test]
async fn unread_counts_track_the_read_flag() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  let first = s.send_message(new_message(alice, bob, "one")).await.unwrap();
  s.send_message(new_message(alice, bob, "two")).await.unwrap();

  assert_eq!(s.unread_count(bob).await.unwrap(), 2);
  assert_eq!(s.unread_count(alice).await.unwrap(), 0);

  s.mark_read(first.message_id, true).await.unwrap();
  assert_eq!(s.unread_count(bob).await.unwrap(), 1);

  s.mark_read(first.message_id, false).await.unwrap();
  assert_eq!(s.unread_count(bob).await.unwrap(), 2);
}

#[tokio::test]
async fn marking_a_missing_message_fails() {
  let s = store().await;

  let err = s.mark_read(Uuid::new_v4(), true).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(amity_core::Error::MessageNotFound(_))
  ));
}
