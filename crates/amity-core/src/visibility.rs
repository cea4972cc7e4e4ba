//! The visibility evaluator — pure decision functions over privacy records.
//!
//! No I/O, no shared state; safe for unrestricted concurrent use. The caller
//! supplies the friendship flag (see
//! [`FriendshipStore::is_friend`](crate::store::FriendshipStore::is_friend));
//! the evaluator never computes it.

use uuid::Uuid;

use crate::privacy::{Facet, PrivacyProfile, PrivacySetting};

/// Decide whether `viewer` may see `facet` of `subject`'s profile.
///
/// The same rule chain applies to every facet, with one inherited quirk:
/// facets where [`Facet::only_me_restricts`] is `false` skip the explicit
/// only-me rejection, so an `OnlyMe` setting on them reaches the final
/// unmatched-rule branch. The outcome is still `false`, but it is reported
/// as a rule-evaluation failure rather than a policy decision.
pub fn is_visible(
  subject: Uuid,
  privacy: &PrivacyProfile,
  viewer: Uuid,
  facet: Facet,
  is_friend: bool,
) -> bool {
  // A subject always sees their own facets, whatever is stored.
  if subject == viewer {
    return true;
  }

  let setting = privacy.setting_for(facet);

  if facet.only_me_restricts() && setting == PrivacySetting::OnlyMe {
    return false;
  }

  if is_friend && setting == PrivacySetting::OnlyFriends {
    return true;
  }

  if !is_friend && setting == PrivacySetting::OnlyFriends {
    return false;
  }

  if setting == PrivacySetting::Everyone {
    return true;
  }

  // Only reachable for the facets that skip the only-me rule. Fail closed.
  tracing::error!(
    %subject,
    %viewer,
    ?facet,
    ?setting,
    friend = is_friend,
    "unmatched visibility rule"
  );
  false
}

/// Birth-year display is a plain flag, independent of viewer and friendship.
pub fn is_birth_year_visible(privacy: &PrivacyProfile) -> bool {
  privacy.show_birth_year
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::privacy::PrivacyDefaults;

  fn profile(user_id: Uuid) -> PrivacyProfile {
    PrivacyProfile::from_defaults(user_id, &PrivacyDefaults::default())
  }

  fn uniform(user_id: Uuid, setting: PrivacySetting) -> PrivacyProfile {
    let mut p = profile(user_id);
    for facet in Facet::ALL {
      p.set(facet, setting);
    }
    p
  }

  #[test]
  fn self_access_always_visible() {
    let alice = Uuid::new_v4();
    let p = uniform(alice, PrivacySetting::OnlyMe);
    for facet in Facet::ALL {
      for friend in [false, true] {
        assert!(is_visible(alice, &p, alice, facet, friend));
      }
    }
  }

  #[test]
  fn only_me_blocks_non_self_on_restricting_facets() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let p = uniform(alice, PrivacySetting::OnlyMe);
    for facet in [
      Facet::BasicInfo,
      Facet::ContactInfo,
      Facet::AcademicInfo,
      Facet::PersonalInfo,
      Facet::FriendsList,
    ] {
      assert!(!is_visible(alice, &p, bob, facet, false));
      assert!(!is_visible(alice, &p, bob, facet, true));
    }
  }

  // Pins the inherited asymmetry: these three facets never adopted the
  // explicit only-me check and land in the fail-closed fallback instead.
  // The observable result is identical; the test guards against anyone
  // "fixing" the rule chain in a way that changes the outcome.
  #[test]
  fn only_me_still_blocks_on_exempt_facets() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let p = uniform(alice, PrivacySetting::OnlyMe);
    for facet in [Facet::ProfileImage, Facet::Search, Facet::Status] {
      assert!(!facet.only_me_restricts());
      assert!(!is_visible(alice, &p, bob, facet, false));
      assert!(!is_visible(alice, &p, bob, facet, true));
    }
  }

  #[test]
  fn everyone_visible_regardless_of_friendship() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let p = uniform(alice, PrivacySetting::Everyone);
    for facet in Facet::ALL {
      assert!(is_visible(alice, &p, bob, facet, false));
      assert!(is_visible(alice, &p, bob, facet, true));
    }
  }

  #[test]
  fn only_friends_tracks_the_friend_flag() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let p = uniform(alice, PrivacySetting::OnlyFriends);
    for facet in Facet::ALL {
      assert_eq!(is_visible(alice, &p, bob, facet, true), true);
      assert_eq!(is_visible(alice, &p, bob, facet, false), false);
    }
  }

  #[test]
  fn basic_info_friends_only_scenario() {
    // alice sets basic-info to friends-only; bob starts as a stranger.
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let mut p = profile(alice);
    p.set(Facet::BasicInfo, PrivacySetting::OnlyFriends);

    assert!(!is_visible(alice, &p, bob, Facet::BasicInfo, false));
    // ...then the connection is confirmed.
    assert!(is_visible(alice, &p, bob, Facet::BasicInfo, true));
  }

  #[test]
  fn status_open_to_everyone_scenario() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let mut p = profile(alice);
    p.set(Facet::Status, PrivacySetting::Everyone);

    assert!(is_visible(alice, &p, bob, Facet::Status, false));
  }

  #[test]
  fn birth_year_is_a_passthrough() {
    let alice = Uuid::new_v4();
    let mut p = uniform(alice, PrivacySetting::OnlyMe);

    p.show_birth_year = true;
    assert!(is_birth_year_visible(&p));

    p.show_birth_year = false;
    assert!(!is_birth_year_visible(&p));
  }
}
