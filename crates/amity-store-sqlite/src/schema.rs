//! SQL schema for the Amity SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per user who has saved their own settings; everyone else is
-- served from the configured defaults.
CREATE TABLE IF NOT EXISTS privacy (
    user_id         TEXT PRIMARY KEY,
    profile_image   TEXT NOT NULL,   -- 'only_me' | 'only_friends' | 'everyone'
    basic_info      TEXT NOT NULL,
    contact_info    TEXT NOT NULL,
    academic_info   TEXT NOT NULL,
    personal_info   TEXT NOT NULL,
    search          TEXT NOT NULL,
    friends_list    TEXT NOT NULL,
    status          TEXT NOT NULL,
    show_birth_year INTEGER NOT NULL
);

-- One row per connection, whichever user initiated it. confirmed_at is set
-- when the pending request is accepted.
CREATE TABLE IF NOT EXISTS friend_links (
    user_id      TEXT NOT NULL,
    friend_id    TEXT NOT NULL,
    confirmed    INTEGER NOT NULL DEFAULT 0,
    requested_at TEXT NOT NULL,      -- ISO 8601 UTC; server-assigned
    confirmed_at TEXT,
    PRIMARY KEY (user_id, friend_id),
    CHECK (user_id != friend_id)
);

CREATE TABLE IF NOT EXISTS statuses (
    user_id   TEXT PRIMARY KEY,
    message   TEXT NOT NULL,
    posted_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS preferences (
    user_id          TEXT PRIMARY KEY,
    email_on_request INTEGER NOT NULL,
    email_on_confirm INTEGER NOT NULL,
    email_on_message INTEGER NOT NULL,
    broadcast_status INTEGER NOT NULL
);

-- Uploads are never deleted; adding an image flips is_current on the rest.
CREATE TABLE IF NOT EXISTS profile_images (
    image_id       TEXT PRIMARY KEY,
    user_id        TEXT NOT NULL,
    main_path      TEXT NOT NULL,
    thumbnail_path TEXT,
    is_current     INTEGER NOT NULL DEFAULT 1,
    recorded_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS external_images (
    user_id       TEXT PRIMARY KEY,
    main_url      TEXT NOT NULL,
    thumbnail_url TEXT
);

CREATE TABLE IF NOT EXISTS message_threads (
    thread_id TEXT PRIMARY KEY,
    subject   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    message_id TEXT PRIMARY KEY,
    thread_id  TEXT NOT NULL REFERENCES message_threads(thread_id),
    from_user  TEXT NOT NULL,
    to_user    TEXT NOT NULL,
    body       TEXT NOT NULL,
    posted_at  TEXT NOT NULL,
    is_read    INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS friend_links_friend_idx ON friend_links(friend_id);
CREATE INDEX IF NOT EXISTS profile_images_user_idx ON profile_images(user_id);
CREATE INDEX IF NOT EXISTS messages_thread_idx     ON messages(thread_id);
CREATE INDEX IF NOT EXISTS messages_unread_idx     ON messages(to_user, is_read);

PRAGMA user_version = 1;
";
