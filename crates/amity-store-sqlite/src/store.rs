//! [`SqliteStore`] — the SQLite implementation of the profile store traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use amity_core::{
  friend::FriendLink,
  image::{ExternalImage, ProfileImageRecord},
  message::{
    DEFAULT_MESSAGE_SUBJECT, Message, MessageThread, NewMessage, ThreadView,
  },
  preferences::Preferences,
  privacy::PrivacyProfile,
  status::ProfileStatus,
  store::{
    FriendshipStore, ImageStore, MessageStore, PreferenceStore, PrivacyStore,
    StatusStore,
  },
};

use crate::{
  Error, Result,
  encode::{
    RawExternalImage, RawFriendLink, RawImage, RawMessage, RawPreferences,
    RawPrivacy, RawStatus, RawThread, decode_uuid, encode_dt, encode_setting,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Amity profile store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Rewrite a status row's timestamp, to exercise the staleness window.
  #[cfg(test)]
  pub(crate) async fn backdate_status(
    &self,
    user_id: Uuid,
    posted_at: chrono::DateTime<Utc>,
  ) -> Result<()> {
    let id_str = encode_uuid(user_id);
    let at_str = encode_dt(posted_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE statuses SET posted_at = ?2 WHERE user_id = ?1",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The link row between two users, whichever way round it was recorded.
  async fn find_link(&self, a: Uuid, b: Uuid) -> Result<Option<FriendLink>> {
    let a_str = encode_uuid(a);
    let b_str = encode_uuid(b);

    let raw: Option<RawFriendLink> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, friend_id, confirmed, requested_at, confirmed_at
               FROM friend_links
               WHERE (user_id = ?1 AND friend_id = ?2)
                  OR (user_id = ?2 AND friend_id = ?1)",
              rusqlite::params![a_str, b_str],
              |row| {
                Ok(RawFriendLink {
                  user_id:      row.get(0)?,
                  friend_id:    row.get(1)?,
                  confirmed:    row.get(2)?,
                  requested_at: row.get(3)?,
                  confirmed_at: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFriendLink::into_link).transpose()
  }
}

// ─── PrivacyStore impl ───────────────────────────────────────────────────────

impl PrivacyStore for SqliteStore {
  type Error = Error;

  async fn load_privacy(&self, user_id: Uuid) -> Result<Option<PrivacyProfile>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawPrivacy> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, profile_image, basic_info, contact_info,
                      academic_info, personal_info, search, friends_list,
                      status, show_birth_year
               FROM privacy WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawPrivacy {
                  user_id:         row.get(0)?,
                  profile_image:   row.get(1)?,
                  basic_info:      row.get(2)?,
                  contact_info:    row.get(3)?,
                  academic_info:   row.get(4)?,
                  personal_info:   row.get(5)?,
                  search:          row.get(6)?,
                  friends_list:    row.get(7)?,
                  status:          row.get(8)?,
                  show_birth_year: row.get(9)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPrivacy::into_profile).transpose()
  }

  async fn save_privacy(&self, profile: PrivacyProfile) -> Result<()> {
    let id_str          = encode_uuid(profile.user_id);
    let profile_image   = encode_setting(profile.profile_image).to_owned();
    let basic_info      = encode_setting(profile.basic_info).to_owned();
    let contact_info    = encode_setting(profile.contact_info).to_owned();
    let academic_info   = encode_setting(profile.academic_info).to_owned();
    let personal_info   = encode_setting(profile.personal_info).to_owned();
    let search          = encode_setting(profile.search).to_owned();
    let friends_list    = encode_setting(profile.friends_list).to_owned();
    let status          = encode_setting(profile.status).to_owned();
    let show_birth_year = profile.show_birth_year;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO privacy (
             user_id, profile_image, basic_info, contact_info, academic_info,
             personal_info, search, friends_list, status, show_birth_year
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
           ON CONFLICT (user_id) DO UPDATE SET
             profile_image   = excluded.profile_image,
             basic_info      = excluded.basic_info,
             contact_info    = excluded.contact_info,
             academic_info   = excluded.academic_info,
             personal_info   = excluded.personal_info,
             search          = excluded.search,
             friends_list    = excluded.friends_list,
             status          = excluded.status,
             show_birth_year = excluded.show_birth_year",
          rusqlite::params![
            id_str,
            profile_image,
            basic_info,
            contact_info,
            academic_info,
            personal_info,
            search,
            friends_list,
            status,
            show_birth_year,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── FriendshipStore impl ────────────────────────────────────────────────────

impl FriendshipStore for SqliteStore {
  type Error = Error;

  async fn request_friend(&self, from: Uuid, to: Uuid) -> Result<FriendLink> {
    if from == to {
      return Err(amity_core::Error::SelfConnection.into());
    }

    let link = FriendLink {
      user_id:      from,
      friend_id:    to,
      confirmed:    false,
      requested_at: Utc::now(),
      confirmed_at: None,
    };

    let from_str = encode_uuid(from);
    let to_str   = encode_uuid(to);
    let at_str   = encode_dt(link.requested_at);

    // Probe and insert in one transaction; a concurrent reverse-direction
    // request would slip between two separate round trips.
    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists: bool = tx.query_row(
          "SELECT EXISTS (
             SELECT 1 FROM friend_links
             WHERE (user_id = ?1 AND friend_id = ?2)
                OR (user_id = ?2 AND friend_id = ?1)
           )",
          rusqlite::params![from_str, to_str],
          |row| row.get(0),
        )?;
        if !exists {
          tx.execute(
            "INSERT INTO friend_links (user_id, friend_id, confirmed, requested_at)
             VALUES (?1, ?2, 0, ?3)",
            rusqlite::params![from_str, to_str, at_str],
          )?;
        }
        tx.commit()?;
        Ok(!exists)
      })
      .await?;

    if !inserted {
      return Err(amity_core::Error::ConnectionExists(from, to).into());
    }
    Ok(link)
  }

  async fn confirm_request(&self, from: Uuid, to: Uuid) -> Result<FriendLink> {
    let pending = match self.find_link(from, to).await? {
      Some(link) if !link.confirmed && link.user_id == from => link,
      _ => {
        return Err(amity_core::Error::PendingRequestNotFound { from, to }.into());
      }
    };

    let confirmed_at = Utc::now();
    let from_str     = encode_uuid(from);
    let to_str       = encode_uuid(to);
    let at_str       = encode_dt(confirmed_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE friend_links SET confirmed = 1, confirmed_at = ?3
           WHERE user_id = ?1 AND friend_id = ?2 AND confirmed = 0",
          rusqlite::params![from_str, to_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(FriendLink {
      confirmed: true,
      confirmed_at: Some(confirmed_at),
      ..pending
    })
  }

  async fn ignore_request(&self, from: Uuid, to: Uuid) -> Result<()> {
    let from_str = encode_uuid(from);
    let to_str   = encode_uuid(to);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM friend_links
           WHERE user_id = ?1 AND friend_id = ?2 AND confirmed = 0",
          rusqlite::params![from_str, to_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(amity_core::Error::PendingRequestNotFound { from, to }.into());
    }
    Ok(())
  }

  async fn remove_friend(&self, user_id: Uuid, friend_id: Uuid) -> Result<()> {
    let a_str = encode_uuid(user_id);
    let b_str = encode_uuid(friend_id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM friend_links
           WHERE confirmed = 1
             AND ((user_id = ?1 AND friend_id = ?2)
               OR (user_id = ?2 AND friend_id = ?1))",
          rusqlite::params![a_str, b_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(amity_core::Error::ConnectionNotFound(user_id, friend_id).into());
    }
    Ok(())
  }

  async fn confirmed_friend_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
    let id_str = encode_uuid(user_id);

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT CASE WHEN user_id = ?1 THEN friend_id ELSE user_id END
           FROM friend_links
           WHERE confirmed = 1 AND (user_id = ?1 OR friend_id = ?1)",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    ids.iter().map(|s| decode_uuid(s)).collect()
  }

  async fn pending_request_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
    let id_str = encode_uuid(user_id);

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id FROM friend_links
           WHERE friend_id = ?1 AND confirmed = 0
           ORDER BY requested_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    ids.iter().map(|s| decode_uuid(s)).collect()
  }

  async fn has_pending_request(&self, from: Uuid, to: Uuid) -> Result<bool> {
    Ok(
      self
        .find_link(from, to)
        .await?
        .is_some_and(|link| !link.confirmed && link.user_id == from),
    )
  }

  async fn is_friend(&self, a: Uuid, b: Uuid) -> Result<bool> {
    // A user is always their own friend.
    if a == b {
      return Ok(true);
    }
    Ok(self.find_link(a, b).await?.is_some_and(|link| link.confirmed))
  }
}

// ─── StatusStore impl ────────────────────────────────────────────────────────

impl StatusStore for SqliteStore {
  type Error = Error;

  async fn status(&self, user_id: Uuid) -> Result<Option<ProfileStatus>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawStatus> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, message, posted_at FROM statuses WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawStatus {
                  user_id:   row.get(0)?,
                  message:   row.get(1)?,
                  posted_at: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    let status = raw.map(RawStatus::into_status).transpose()?;
    // Expired statuses read as absent; the row stays until overwritten.
    Ok(status.filter(|s| !s.is_stale(Utc::now())))
  }

  async fn set_status(&self, user_id: Uuid, message: String) -> Result<ProfileStatus> {
    let status = ProfileStatus {
      user_id,
      message,
      posted_at: Utc::now(),
    };

    let id_str  = encode_uuid(user_id);
    let msg     = status.message.clone();
    let at_str  = encode_dt(status.posted_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO statuses (user_id, message, posted_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT (user_id) DO UPDATE SET
             message = excluded.message, posted_at = excluded.posted_at",
          rusqlite::params![id_str, msg, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(status)
  }

  async fn clear_status(&self, user_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(user_id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM statuses WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }
}

// ─── PreferenceStore impl ────────────────────────────────────────────────────

impl PreferenceStore for SqliteStore {
  type Error = Error;

  async fn load_preferences(&self, user_id: Uuid) -> Result<Option<Preferences>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawPreferences> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, email_on_request, email_on_confirm,
                      email_on_message, broadcast_status
               FROM preferences WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawPreferences {
                  user_id:          row.get(0)?,
                  email_on_request: row.get(1)?,
                  email_on_confirm: row.get(2)?,
                  email_on_message: row.get(3)?,
                  broadcast_status: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPreferences::into_preferences).transpose()
  }

  async fn save_preferences(&self, prefs: Preferences) -> Result<()> {
    let id_str           = encode_uuid(prefs.user_id);
    let email_on_request = prefs.email_on_request;
    let email_on_confirm = prefs.email_on_confirm;
    let email_on_message = prefs.email_on_message;
    let broadcast_status = prefs.broadcast_status;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO preferences (
             user_id, email_on_request, email_on_confirm,
             email_on_message, broadcast_status
           ) VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (user_id) DO UPDATE SET
             email_on_request = excluded.email_on_request,
             email_on_confirm = excluded.email_on_confirm,
             email_on_message = excluded.email_on_message,
             broadcast_status = excluded.broadcast_status",
          rusqlite::params![
            id_str,
            email_on_request,
            email_on_confirm,
            email_on_message,
            broadcast_status,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ImageStore impl ─────────────────────────────────────────────────────────

impl ImageStore for SqliteStore {
  type Error = Error;

  async fn current_image(&self, user_id: Uuid) -> Result<Option<ProfileImageRecord>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawImage> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT image_id, user_id, main_path, thumbnail_path,
                      is_current, recorded_at
               FROM profile_images
               WHERE user_id = ?1 AND is_current = 1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawImage {
                  image_id:       row.get(0)?,
                  user_id:        row.get(1)?,
                  main_path:      row.get(2)?,
                  thumbnail_path: row.get(3)?,
                  is_current:     row.get(4)?,
                  recorded_at:    row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawImage::into_record).transpose()
  }

  async fn add_image(
    &self,
    user_id: Uuid,
    main_path: String,
    thumbnail_path: Option<String>,
  ) -> Result<ProfileImageRecord> {
    let record = ProfileImageRecord {
      image_id: Uuid::new_v4(),
      user_id,
      main_path,
      thumbnail_path,
      current: true,
      recorded_at: Utc::now(),
    };

    let image_id_str = encode_uuid(record.image_id);
    let user_id_str  = encode_uuid(user_id);
    let main_path    = record.main_path.clone();
    let thumb_path   = record.thumbnail_path.clone();
    let at_str       = encode_dt(record.recorded_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "UPDATE profile_images SET is_current = 0 WHERE user_id = ?1",
          rusqlite::params![user_id_str],
        )?;
        tx.execute(
          "INSERT INTO profile_images (
             image_id, user_id, main_path, thumbnail_path, is_current, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, 1, ?5)",
          rusqlite::params![image_id_str, user_id_str, main_path, thumb_path, at_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn image_history(&self, user_id: Uuid) -> Result<Vec<ProfileImageRecord>> {
    let id_str = encode_uuid(user_id);

    let raws: Vec<RawImage> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT image_id, user_id, main_path, thumbnail_path,
                  is_current, recorded_at
           FROM profile_images
           WHERE user_id = ?1 AND is_current = 0
           ORDER BY recorded_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawImage {
              image_id:       row.get(0)?,
              user_id:        row.get(1)?,
              main_path:      row.get(2)?,
              thumbnail_path: row.get(3)?,
              is_current:     row.get(4)?,
              recorded_at:    row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawImage::into_record).collect()
  }

  async fn external_image(&self, user_id: Uuid) -> Result<Option<ExternalImage>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawExternalImage> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, main_url, thumbnail_url
               FROM external_images WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawExternalImage {
                  user_id:       row.get(0)?,
                  main_url:      row.get(1)?,
                  thumbnail_url: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawExternalImage::into_image).transpose()
  }

  async fn save_external_image(&self, image: ExternalImage) -> Result<()> {
    let id_str    = encode_uuid(image.user_id);
    let main_url  = image.main_url;
    let thumb_url = image.thumbnail_url;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO external_images (user_id, main_url, thumbnail_url)
           VALUES (?1, ?2, ?3)
           ON CONFLICT (user_id) DO UPDATE SET
             main_url = excluded.main_url,
             thumbnail_url = excluded.thumbnail_url",
          rusqlite::params![id_str, main_url, thumb_url],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── MessageStore impl ───────────────────────────────────────────────────────

impl MessageStore for SqliteStore {
  type Error = Error;

  async fn send_message(&self, input: NewMessage) -> Result<Message> {
    let thread_id = match input.thread_id {
      Some(thread_id) => {
        if self.thread(thread_id).await?.is_none() {
          return Err(amity_core::Error::ThreadNotFound(thread_id).into());
        }
        thread_id
      }
      None => {
        let thread_id = Uuid::new_v4();
        let subject = match input.subject.as_deref().map(str::trim) {
          Some(s) if !s.is_empty() => s.to_owned(),
          _ => DEFAULT_MESSAGE_SUBJECT.to_owned(),
        };

        let id_str = encode_uuid(thread_id);
        self
          .conn
          .call(move |conn| {
            conn.execute(
              "INSERT INTO message_threads (thread_id, subject) VALUES (?1, ?2)",
              rusqlite::params![id_str, subject],
            )?;
            Ok(())
          })
          .await?;
        thread_id
      }
    };

    let message = Message {
      message_id: Uuid::new_v4(),
      thread_id,
      from: input.from,
      to: input.to,
      body: input.body,
      posted_at: Utc::now(),
      read: false,
    };

    let message_id_str = encode_uuid(message.message_id);
    let thread_id_str  = encode_uuid(thread_id);
    let from_str       = encode_uuid(message.from);
    let to_str         = encode_uuid(message.to);
    let body           = message.body.clone();
    let at_str         = encode_dt(message.posted_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO messages (
             message_id, thread_id, from_user, to_user, body, posted_at, is_read
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
          rusqlite::params![
            message_id_str,
            thread_id_str,
            from_str,
            to_str,
            body,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(message)
  }

  async fn threads_for(&self, user_id: Uuid) -> Result<Vec<ThreadView>> {
    let id_str = encode_uuid(user_id);

    let raws: Vec<(RawThread, RawMessage)> = self
      .conn
      .call(move |conn| {
        // Latest message per thread by insertion order; ties on posted_at
        // are possible within one second of wall clock.
        let mut stmt = conn.prepare(
          "SELECT t.thread_id, t.subject,
                  m.message_id, m.thread_id, m.from_user, m.to_user,
                  m.body, m.posted_at, m.is_read
           FROM message_threads t
           JOIN messages m ON m.thread_id = t.thread_id
           WHERE m.rowid = (
             SELECT MAX(m2.rowid) FROM messages m2
             WHERE m2.thread_id = t.thread_id
           )
           AND EXISTS (
             SELECT 1 FROM messages m3
             WHERE m3.thread_id = t.thread_id
               AND (m3.from_user = ?1 OR m3.to_user = ?1)
           )
           ORDER BY m.posted_at DESC, m.rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok((
              RawThread {
                thread_id: row.get(0)?,
                subject:   row.get(1)?,
              },
              RawMessage {
                message_id: row.get(2)?,
                thread_id:  row.get(3)?,
                from_user:  row.get(4)?,
                to_user:    row.get(5)?,
                body:       row.get(6)?,
                posted_at:  row.get(7)?,
                is_read:    row.get(8)?,
              },
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(t, m)| {
        Ok(ThreadView {
          thread: t.into_thread()?,
          latest: m.into_message()?,
        })
      })
      .collect()
  }

  async fn thread(&self, thread_id: Uuid) -> Result<Option<MessageThread>> {
    let id_str = encode_uuid(thread_id);

    let raw: Option<RawThread> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT thread_id, subject FROM message_threads WHERE thread_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawThread {
                  thread_id: row.get(0)?,
                  subject:   row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawThread::into_thread).transpose()
  }

  async fn messages_in_thread(&self, thread_id: Uuid) -> Result<Vec<Message>> {
    let id_str = encode_uuid(thread_id);

    let raws: Vec<RawMessage> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT message_id, thread_id, from_user, to_user, body, posted_at, is_read
           FROM messages
           WHERE thread_id = ?1
           ORDER BY posted_at ASC, rowid ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawMessage {
              message_id: row.get(0)?,
              thread_id:  row.get(1)?,
              from_user:  row.get(2)?,
              to_user:    row.get(3)?,
              body:       row.get(4)?,
              posted_at:  row.get(5)?,
              is_read:    row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMessage::into_message).collect()
  }

  async fn unread_count(&self, user_id: Uuid) -> Result<u64> {
    let id_str = encode_uuid(user_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM messages WHERE to_user = ?1 AND is_read = 0",
          rusqlite::params![id_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn mark_read(&self, message_id: Uuid, read: bool) -> Result<()> {
    let id_str = encode_uuid(message_id);

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE messages SET is_read = ?2 WHERE message_id = ?1",
          rusqlite::params![id_str, read],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(amity_core::Error::MessageNotFound(message_id).into());
    }
    Ok(())
  }
}
