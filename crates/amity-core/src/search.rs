//! Search-result assembly.
//!
//! The user directory itself belongs to the host platform; we take its raw
//! hits and filter them through the visibility evaluator. Elevated viewers
//! (admins) skip the filter entirely but still get friendship flags.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  privacy::{Facet, PrivacyDefaults, PrivacyProfile},
  store::{FriendshipStore, PrivacyStore},
  visibility::is_visible,
};

/// Hard cap on assembled results, applied after filtering.
pub const MAX_SEARCH_RESULTS: usize = 50;

// ─── Directory ───────────────────────────────────────────────────────────────

/// A directory entry as provided by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
  pub user_id:      Uuid,
  pub display_name: String,
  pub email:        Option<String>,
}

/// Host-side user lookup. Dyn-safe and synchronous; implementations are
/// expected to be in-memory or cached.
pub trait Directory: Send + Sync {
  fn lookup(&self, user_id: Uuid) -> Option<UserRecord>;

  /// Raw directory hits for a free-text query, unfiltered and uncapped.
  fn search(&self, query: &str) -> Vec<UserRecord>;
}

/// [`Directory`] backed by a fixed list; matches case-insensitively on
/// display name or email substring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
  users: Vec<UserRecord>,
}

impl InMemoryDirectory {
  pub fn new(users: Vec<UserRecord>) -> Self { Self { users } }
}

impl Directory for InMemoryDirectory {
  fn lookup(&self, user_id: Uuid) -> Option<UserRecord> {
    self.users.iter().find(|u| u.user_id == user_id).cloned()
  }

  fn search(&self, query: &str) -> Vec<UserRecord> {
    let needle = query.to_lowercase();
    self
      .users
      .iter()
      .filter(|u| {
        u.display_name.to_lowercase().contains(&needle)
          || u
            .email
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(&needle))
      })
      .cloned()
      .collect()
  }
}

// ─── Access ──────────────────────────────────────────────────────────────────

/// Answers whether a user holds elevated (admin) rights on the host.
pub trait AccessOracle: Send + Sync {
  fn is_elevated(&self, user_id: Uuid) -> bool;
}

/// [`AccessOracle`] backed by an explicit id set.
#[derive(Debug, Clone, Default)]
pub struct ElevatedSet {
  ids: HashSet<Uuid>,
}

impl ElevatedSet {
  pub fn new(ids: impl IntoIterator<Item = Uuid>) -> Self {
    Self {
      ids: ids.into_iter().collect(),
    }
  }
}

impl AccessOracle for ElevatedSet {
  fn is_elevated(&self, user_id: Uuid) -> bool { self.ids.contains(&user_id) }
}

// ─── Assembly ────────────────────────────────────────────────────────────────

/// One assembled search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
  pub user: UserRecord,
  /// Whether the viewer and this user share a confirmed connection.
  pub friend: bool,
  /// An unanswered request from the viewer to this user exists.
  pub pending_outgoing: bool,
  /// An unanswered request from this user to the viewer exists.
  pub pending_incoming: bool,
  /// Whether the viewer may see this user's profile image and status, for
  /// rendering the hit without further round trips.
  pub profile_image_visible: bool,
  pub status_visible: bool,
}

/// Filter raw directory hits down to what `viewer` may see.
///
/// The viewer's own entry is dropped. For everyone else the `Search` facet
/// is evaluated against their stored privacy record (or `defaults` when they
/// have none), unless the viewer is elevated, in which case every check
/// passes. The surviving list is capped at [`MAX_SEARCH_RESULTS`].
pub async fn assemble_search_results<S>(
  store: &S,
  access: &dyn AccessOracle,
  defaults: &PrivacyDefaults,
  viewer: Uuid,
  candidates: Vec<UserRecord>,
) -> Result<Vec<SearchResult>, <S as PrivacyStore>::Error>
where
  S: PrivacyStore + FriendshipStore<Error = <S as PrivacyStore>::Error>,
{
  let elevated = access.is_elevated(viewer);
  let mut results = Vec::new();

  for candidate in candidates {
    if candidate.user_id == viewer {
      continue;
    }

    let friend = store.is_friend(viewer, candidate.user_id).await?;
    let pending_outgoing =
      store.has_pending_request(viewer, candidate.user_id).await?;
    let pending_incoming =
      store.has_pending_request(candidate.user_id, viewer).await?;

    let (profile_image_visible, status_visible) = if elevated {
      (true, true)
    } else {
      let privacy = match store.load_privacy(candidate.user_id).await? {
        Some(p) => p,
        None => PrivacyProfile::from_defaults(candidate.user_id, defaults),
      };
      if !is_visible(candidate.user_id, &privacy, viewer, Facet::Search, friend)
      {
        continue;
      }
      (
        is_visible(
          candidate.user_id,
          &privacy,
          viewer,
          Facet::ProfileImage,
          friend,
        ),
        is_visible(candidate.user_id, &privacy, viewer, Facet::Status, friend),
      )
    };

    results.push(SearchResult {
      user: candidate,
      friend,
      pending_outgoing,
      pending_incoming,
      profile_image_visible,
      status_visible,
    });
    if results.len() == MAX_SEARCH_RESULTS {
      break;
    }
  }

  Ok(results)
}

#[cfg(test)]
mod tests {
  use std::{
    collections::{HashMap, HashSet},
    convert::Infallible,
  };

  use super::*;
  use crate::{friend::FriendLink, privacy::PrivacySetting};

  /// Minimal in-memory store for exercising the assembly path.
  #[derive(Default)]
  struct FakeStore {
    privacy: HashMap<Uuid, PrivacyProfile>,
    friends: HashSet<(Uuid, Uuid)>,
    pending: HashSet<(Uuid, Uuid)>,
  }

  impl FakeStore {
    fn befriend(&mut self, a: Uuid, b: Uuid) {
      self.friends.insert((a, b));
    }
  }

  impl PrivacyStore for FakeStore {
    type Error = Infallible;

    async fn load_privacy(
      &self,
      user_id: Uuid,
    ) -> Result<Option<PrivacyProfile>, Infallible> {
      Ok(self.privacy.get(&user_id).cloned())
    }

    async fn save_privacy(
      &self,
      _profile: PrivacyProfile,
    ) -> Result<(), Infallible> {
      unimplemented!("not exercised by assembly")
    }
  }

  impl FriendshipStore for FakeStore {
    type Error = Infallible;

    async fn is_friend(&self, a: Uuid, b: Uuid) -> Result<bool, Infallible> {
      Ok(
        a == b
          || self.friends.contains(&(a, b))
          || self.friends.contains(&(b, a)),
      )
    }

    async fn request_friend(
      &self,
      _from: Uuid,
      _to: Uuid,
    ) -> Result<FriendLink, Infallible> {
      unimplemented!()
    }

    async fn confirm_request(
      &self,
      _from: Uuid,
      _to: Uuid,
    ) -> Result<FriendLink, Infallible> {
      unimplemented!()
    }

    async fn ignore_request(
      &self,
      _from: Uuid,
      _to: Uuid,
    ) -> Result<(), Infallible> {
      unimplemented!()
    }

    async fn remove_friend(
      &self,
      _user_id: Uuid,
      _friend_id: Uuid,
    ) -> Result<(), Infallible> {
      unimplemented!()
    }

    async fn confirmed_friend_ids(
      &self,
      _user_id: Uuid,
    ) -> Result<Vec<Uuid>, Infallible> {
      unimplemented!()
    }

    async fn pending_request_ids(
      &self,
      _user_id: Uuid,
    ) -> Result<Vec<Uuid>, Infallible> {
      unimplemented!()
    }

    async fn has_pending_request(
      &self,
      from: Uuid,
      to: Uuid,
    ) -> Result<bool, Infallible> {
      Ok(self.pending.contains(&(from, to)))
    }
  }

  fn record(name: &str) -> UserRecord {
    UserRecord {
      user_id:      Uuid::new_v4(),
      display_name: name.to_owned(),
      email:        Some(format!("{name}@example.edu")),
    }
  }

  fn restricted_profile(user_id: Uuid) -> PrivacyProfile {
    let mut p =
      PrivacyProfile::from_defaults(user_id, &PrivacyDefaults::default());
    p.set(Facet::Search, PrivacySetting::OnlyFriends);
    p
  }

  #[tokio::test]
  async fn strangers_are_filtered_by_the_search_facet() {
    let viewer = Uuid::new_v4();
    let hidden = record("hidden");
    let open = record("open");

    let mut store = FakeStore::default();
    store
      .privacy
      .insert(hidden.user_id, restricted_profile(hidden.user_id));

    let results = assemble_search_results(
      &store,
      &ElevatedSet::default(),
      &PrivacyDefaults::default(),
      viewer,
      vec![hidden, open.clone()],
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].user, open);
    assert!(!results[0].friend);
  }

  #[tokio::test]
  async fn friends_pass_a_friends_only_search_facet() {
    let viewer = Uuid::new_v4();
    let guarded = record("guarded");

    let mut store = FakeStore::default();
    store
      .privacy
      .insert(guarded.user_id, restricted_profile(guarded.user_id));
    store.befriend(viewer, guarded.user_id);

    let results = assemble_search_results(
      &store,
      &ElevatedSet::default(),
      &PrivacyDefaults::default(),
      viewer,
      vec![guarded.clone()],
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].friend);
  }

  #[tokio::test]
  async fn elevated_viewers_bypass_the_filter() {
    let admin = Uuid::new_v4();
    let hidden = record("hidden");

    let mut store = FakeStore::default();
    store
      .privacy
      .insert(hidden.user_id, restricted_profile(hidden.user_id));

    let results = assemble_search_results(
      &store,
      &ElevatedSet::new([admin]),
      &PrivacyDefaults::default(),
      admin,
      vec![hidden.clone()],
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].user, hidden);
  }

  #[tokio::test]
  async fn pending_requests_are_reported_in_both_directions() {
    let viewer = Uuid::new_v4();
    let invited = record("invited");
    let inviter = record("inviter");

    let mut store = FakeStore::default();
    store.pending.insert((viewer, invited.user_id));
    store.pending.insert((inviter.user_id, viewer));

    let results = assemble_search_results(
      &store,
      &ElevatedSet::default(),
      &PrivacyDefaults::default(),
      viewer,
      vec![invited.clone(), inviter.clone()],
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].pending_outgoing);
    assert!(!results[0].pending_incoming);
    assert!(!results[1].pending_outgoing);
    assert!(results[1].pending_incoming);
  }

  #[tokio::test]
  async fn hidden_facets_are_flagged_on_surviving_hits() {
    let viewer = Uuid::new_v4();
    let guarded = record("guarded");

    // Searchable by everyone, but image and status are friends-only.
    let mut p = PrivacyProfile::from_defaults(
      guarded.user_id,
      &PrivacyDefaults::default(),
    );
    p.set(Facet::ProfileImage, PrivacySetting::OnlyFriends);
    p.set(Facet::Status, PrivacySetting::OnlyFriends);

    let mut store = FakeStore::default();
    store.privacy.insert(guarded.user_id, p);

    let results = assemble_search_results(
      &store,
      &ElevatedSet::default(),
      &PrivacyDefaults::default(),
      viewer,
      vec![guarded],
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert!(!results[0].profile_image_visible);
    assert!(!results[0].status_visible);
  }

  #[tokio::test]
  async fn the_viewer_never_appears_in_their_own_results() {
    let me = record("me");
    let viewer = me.user_id;

    let results = assemble_search_results(
      &FakeStore::default(),
      &ElevatedSet::default(),
      &PrivacyDefaults::default(),
      viewer,
      vec![me],
    )
    .await
    .unwrap();

    assert!(results.is_empty());
  }

  #[tokio::test]
  async fn results_are_capped() {
    let viewer = Uuid::new_v4();
    let candidates: Vec<_> = (0..MAX_SEARCH_RESULTS + 10)
      .map(|i| record(&format!("user{i}")))
      .collect();

    let results = assemble_search_results(
      &FakeStore::default(),
      &ElevatedSet::default(),
      &PrivacyDefaults::default(),
      viewer,
      candidates,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), MAX_SEARCH_RESULTS);
  }

  #[test]
  fn in_memory_directory_matches_name_and_email() {
    let ada = record("Ada Lovelace");
    let grace = record("Grace Hopper");
    let dir = InMemoryDirectory::new(vec![ada.clone(), grace.clone()]);

    assert_eq!(dir.search("lovelace"), vec![ada.clone()]);
    assert_eq!(dir.search("grace@example.edu"), vec![grace]);
    assert!(dir.search("turing").is_empty());
    assert_eq!(dir.lookup(ada.user_id), Some(ada));
  }
}
