//! Profile image records.
//!
//! No binary data lives in the store — uploaded images are referenced by
//! resource path, external ones by URL. Thumbnail lookups fall back to the
//! main image when no thumbnail was recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
  Main,
  Thumbnail,
}

/// An uploaded image. Exactly one record per user is current; adding a new
/// image invalidates all previous ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileImageRecord {
  pub image_id:       Uuid,
  pub user_id:        Uuid,
  pub main_path:      String,
  pub thumbnail_path: Option<String>,
  pub current:        bool,
  pub recorded_at:    DateTime<Utc>,
}

impl ProfileImageRecord {
  pub fn path_for(&self, size: ImageSize) -> &str {
    match size {
      ImageSize::Main => &self.main_path,
      ImageSize::Thumbnail => {
        self.thumbnail_path.as_deref().unwrap_or(&self.main_path)
      }
    }
  }
}

/// A URL-hosted image, upserted (one record per user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalImage {
  pub user_id:       Uuid,
  pub main_url:      String,
  pub thumbnail_url: Option<String>,
}

impl ExternalImage {
  pub fn url_for(&self, size: ImageSize) -> &str {
    match size {
      ImageSize::Main => &self.main_url,
      ImageSize::Thumbnail => {
        self.thumbnail_url.as_deref().unwrap_or(&self.main_url)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn thumbnail_falls_back_to_main() {
    let record = ProfileImageRecord {
      image_id:       Uuid::new_v4(),
      user_id:        Uuid::new_v4(),
      main_path:      "/images/a/main.jpg".into(),
      thumbnail_path: None,
      current:        true,
      recorded_at:    Utc::now(),
    };
    assert_eq!(record.path_for(ImageSize::Thumbnail), "/images/a/main.jpg");

    let external = ExternalImage {
      user_id:       Uuid::new_v4(),
      main_url:      "https://img.example.com/me.png".into(),
      thumbnail_url: Some("https://img.example.com/me-thumb.png".into()),
    };
    assert_eq!(
      external.url_for(ImageSize::Thumbnail),
      "https://img.example.com/me-thumb.png"
    );
  }
}
