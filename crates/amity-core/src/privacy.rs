//! Privacy settings — the per-user record governing who sees what.
//!
//! One [`PrivacySetting`] exists per profile facet, plus an independent
//! boolean for birth-year display. A user who has never saved a record gets
//! one materialised from [`PrivacyDefaults`] on first read; nothing is ever
//! evaluated against a missing setting.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Setting ─────────────────────────────────────────────────────────────────

/// Who may see a profile facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacySetting {
  OnlyMe,
  OnlyFriends,
  Everyone,
}

impl PrivacySetting {
  /// The string stored in database columns and accepted in config files.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::OnlyMe => "only_me",
      Self::OnlyFriends => "only_friends",
      Self::Everyone => "everyone",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "only_me" => Ok(Self::OnlyMe),
      "only_friends" => Ok(Self::OnlyFriends),
      "everyone" => Ok(Self::Everyone),
      other => Err(Error::UnknownPrivacySetting(other.to_owned())),
    }
  }
}

// ─── Facet ───────────────────────────────────────────────────────────────────

/// A visibility-governed category of profile data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
  ProfileImage,
  BasicInfo,
  ContactInfo,
  AcademicInfo,
  PersonalInfo,
  Search,
  FriendsList,
  Status,
}

impl Facet {
  pub const ALL: [Facet; 8] = [
    Facet::ProfileImage,
    Facet::BasicInfo,
    Facet::ContactInfo,
    Facet::AcademicInfo,
    Facet::PersonalInfo,
    Facet::Search,
    Facet::FriendsList,
    Facet::Status,
  ];

  /// Whether the explicit only-me rule applies to this facet.
  ///
  /// `ProfileImage`, `Search`, and `Status` never adopted the rule; under an
  /// `OnlyMe` setting they fall through to the unmatched-rule branch of the
  /// evaluator instead. Inherited behaviour, pinned by tests — do not unify
  /// without a product decision.
  pub fn only_me_restricts(self) -> bool {
    !matches!(self, Self::ProfileImage | Self::Search | Self::Status)
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// The stored privacy record for one user: one setting per facet plus the
/// birth-year flag. Owned and mutated only by that user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyProfile {
  pub user_id:         Uuid,
  pub profile_image:   PrivacySetting,
  pub basic_info:      PrivacySetting,
  pub contact_info:    PrivacySetting,
  pub academic_info:   PrivacySetting,
  pub personal_info:   PrivacySetting,
  pub search:          PrivacySetting,
  pub friends_list:    PrivacySetting,
  pub status:          PrivacySetting,
  pub show_birth_year: bool,
}

impl PrivacyProfile {
  /// Materialise a record from the admin-configured defaults. Used when a
  /// user has never saved their own settings.
  pub fn from_defaults(user_id: Uuid, defaults: &PrivacyDefaults) -> Self {
    Self {
      user_id,
      profile_image: defaults.profile_image,
      basic_info: defaults.basic_info,
      contact_info: defaults.contact_info,
      academic_info: defaults.academic_info,
      personal_info: defaults.personal_info,
      search: defaults.search,
      friends_list: defaults.friends_list,
      status: defaults.status,
      show_birth_year: defaults.show_birth_year,
    }
  }

  /// The facet-to-setting accessor the evaluator is parameterised over.
  pub fn setting_for(&self, facet: Facet) -> PrivacySetting {
    match facet {
      Facet::ProfileImage => self.profile_image,
      Facet::BasicInfo => self.basic_info,
      Facet::ContactInfo => self.contact_info,
      Facet::AcademicInfo => self.academic_info,
      Facet::PersonalInfo => self.personal_info,
      Facet::Search => self.search,
      Facet::FriendsList => self.friends_list,
      Facet::Status => self.status,
    }
  }

  pub fn set(&mut self, facet: Facet, setting: PrivacySetting) {
    match facet {
      Facet::ProfileImage => self.profile_image = setting,
      Facet::BasicInfo => self.basic_info = setting,
      Facet::ContactInfo => self.contact_info = setting,
      Facet::AcademicInfo => self.academic_info = setting,
      Facet::PersonalInfo => self.personal_info = setting,
      Facet::Search => self.search = setting,
      Facet::FriendsList => self.friends_list = setting,
      Facet::Status => self.status = setting,
    }
  }
}

// ─── Defaults ────────────────────────────────────────────────────────────────

/// Admin-configurable default settings, deserialisable from server config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyDefaults {
  pub profile_image:   PrivacySetting,
  pub basic_info:      PrivacySetting,
  pub contact_info:    PrivacySetting,
  pub academic_info:   PrivacySetting,
  pub personal_info:   PrivacySetting,
  pub search:          PrivacySetting,
  pub friends_list:    PrivacySetting,
  pub status:          PrivacySetting,
  pub show_birth_year: bool,
}

impl Default for PrivacyDefaults {
  fn default() -> Self {
    Self {
      profile_image: PrivacySetting::Everyone,
      basic_info: PrivacySetting::Everyone,
      contact_info: PrivacySetting::OnlyFriends,
      academic_info: PrivacySetting::Everyone,
      personal_info: PrivacySetting::OnlyFriends,
      search: PrivacySetting::Everyone,
      friends_list: PrivacySetting::OnlyFriends,
      status: PrivacySetting::Everyone,
      show_birth_year: true,
    }
  }
}
