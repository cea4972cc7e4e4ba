//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Privacy settings are stored
//! as their canonical lowercase names. UUIDs are stored as hyphenated
//! lowercase strings; booleans as SQLite integers.

use amity_core::{
  friend::FriendLink,
  image::{ExternalImage, ProfileImageRecord},
  message::{Message, MessageThread},
  preferences::Preferences,
  privacy::{PrivacyProfile, PrivacySetting},
  status::ProfileStatus,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Privacy settings ────────────────────────────────────────────────────────

pub fn encode_setting(s: PrivacySetting) -> &'static str { s.as_str() }

pub fn decode_setting(s: &str) -> Result<PrivacySetting> {
  Ok(PrivacySetting::parse(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `privacy` row.
pub struct RawPrivacy {
  pub user_id:         String,
  pub profile_image:   String,
  pub basic_info:      String,
  pub contact_info:    String,
  pub academic_info:   String,
  pub personal_info:   String,
  pub search:          String,
  pub friends_list:    String,
  pub status:          String,
  pub show_birth_year: bool,
}

impl RawPrivacy {
  pub fn into_profile(self) -> Result<PrivacyProfile> {
    Ok(PrivacyProfile {
      user_id:         decode_uuid(&self.user_id)?,
      profile_image:   decode_setting(&self.profile_image)?,
      basic_info:      decode_setting(&self.basic_info)?,
      contact_info:    decode_setting(&self.contact_info)?,
      academic_info:   decode_setting(&self.academic_info)?,
      personal_info:   decode_setting(&self.personal_info)?,
      search:          decode_setting(&self.search)?,
      friends_list:    decode_setting(&self.friends_list)?,
      status:          decode_setting(&self.status)?,
      show_birth_year: self.show_birth_year,
    })
  }
}

/// Raw strings read directly from a `friend_links` row.
pub struct RawFriendLink {
  pub user_id:      String,
  pub friend_id:    String,
  pub confirmed:    bool,
  pub requested_at: String,
  pub confirmed_at: Option<String>,
}

impl RawFriendLink {
  pub fn into_link(self) -> Result<FriendLink> {
    Ok(FriendLink {
      user_id:      decode_uuid(&self.user_id)?,
      friend_id:    decode_uuid(&self.friend_id)?,
      confirmed:    self.confirmed,
      requested_at: decode_dt(&self.requested_at)?,
      confirmed_at: self.confirmed_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

pub struct RawStatus {
  pub user_id:   String,
  pub message:   String,
  pub posted_at: String,
}

impl RawStatus {
  pub fn into_status(self) -> Result<ProfileStatus> {
    Ok(ProfileStatus {
      user_id:   decode_uuid(&self.user_id)?,
      message:   self.message,
      posted_at: decode_dt(&self.posted_at)?,
    })
  }
}

pub struct RawPreferences {
  pub user_id:          String,
  pub email_on_request: bool,
  pub email_on_confirm: bool,
  pub email_on_message: bool,
  pub broadcast_status: bool,
}

impl RawPreferences {
  pub fn into_preferences(self) -> Result<Preferences> {
    Ok(Preferences {
      user_id:          decode_uuid(&self.user_id)?,
      email_on_request: self.email_on_request,
      email_on_confirm: self.email_on_confirm,
      email_on_message: self.email_on_message,
      broadcast_status: self.broadcast_status,
    })
  }
}

/// Raw strings read directly from a `profile_images` row.
pub struct RawImage {
  pub image_id:       String,
  pub user_id:        String,
  pub main_path:      String,
  pub thumbnail_path: Option<String>,
  pub is_current:     bool,
  pub recorded_at:    String,
}

impl RawImage {
  pub fn into_record(self) -> Result<ProfileImageRecord> {
    Ok(ProfileImageRecord {
      image_id:       decode_uuid(&self.image_id)?,
      user_id:        decode_uuid(&self.user_id)?,
      main_path:      self.main_path,
      thumbnail_path: self.thumbnail_path,
      current:        self.is_current,
      recorded_at:    decode_dt(&self.recorded_at)?,
    })
  }
}

pub struct RawExternalImage {
  pub user_id:       String,
  pub main_url:      String,
  pub thumbnail_url: Option<String>,
}

impl RawExternalImage {
  pub fn into_image(self) -> Result<ExternalImage> {
    Ok(ExternalImage {
      user_id:       decode_uuid(&self.user_id)?,
      main_url:      self.main_url,
      thumbnail_url: self.thumbnail_url,
    })
  }
}

pub struct RawThread {
  pub thread_id: String,
  pub subject:   String,
}

impl RawThread {
  pub fn into_thread(self) -> Result<MessageThread> {
    Ok(MessageThread {
      thread_id: decode_uuid(&self.thread_id)?,
      subject:   self.subject,
    })
  }
}

/// Raw strings read directly from a `messages` row.
pub struct RawMessage {
  pub message_id: String,
  pub thread_id:  String,
  pub from_user:  String,
  pub to_user:    String,
  pub body:       String,
  pub posted_at:  String,
  pub is_read:    bool,
}

impl RawMessage {
  pub fn into_message(self) -> Result<Message> {
    Ok(Message {
      message_id: decode_uuid(&self.message_id)?,
      thread_id:  decode_uuid(&self.thread_id)?,
      from:       decode_uuid(&self.from_user)?,
      to:         decode_uuid(&self.to_user)?,
      body:       self.body,
      posted_at:  decode_dt(&self.posted_at)?,
      read:       self.is_read,
    })
  }
}
