//! Outbound status broadcasting.
//!
//! Status updates from users who opted in are handed to a [`StatusSink`]
//! (typically a bridge to an external feed) through a bounded queue. Delivery
//! is at-most-once: if the queue is full or the worker is gone, the update is
//! dropped with a warning rather than slowing the request path down.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One accepted status change, queued for external delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
  pub user_id:   Uuid,
  pub message:   String,
  pub posted_at: DateTime<Utc>,
}

/// Destination for broadcast status updates.
pub trait StatusSink: Send + Sync + 'static {
  fn deliver(
    &self,
    update: StatusUpdate,
  ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Handle for submitting updates to the broadcast worker.
///
/// Cheap to clone. A notifier built with [`StatusNotifier::disabled`] accepts
/// and discards every update.
#[derive(Clone)]
pub struct StatusNotifier {
  tx: Option<mpsc::Sender<StatusUpdate>>,
}

impl StatusNotifier {
  /// Spawn a delivery worker feeding `sink` and return its handle.
  pub fn spawn<K: StatusSink>(sink: K, capacity: usize) -> Self {
    let (tx, mut rx) = mpsc::channel::<StatusUpdate>(capacity);

    tokio::spawn(async move {
      while let Some(update) = rx.recv().await {
        let user_id = update.user_id;
        if let Err(e) = sink.deliver(update).await {
          tracing::warn!(%user_id, error = %e, "status broadcast failed");
        }
      }
    });

    Self { tx: Some(tx) }
  }

  /// A notifier with broadcasting switched off.
  pub fn disabled() -> Self { Self { tx: None } }

  #[cfg(test)]
  fn from_sender(tx: mpsc::Sender<StatusUpdate>) -> Self {
    Self { tx: Some(tx) }
  }

  /// Queue an update without waiting. Dropped if the queue is full.
  pub fn submit(&self, update: StatusUpdate) {
    let Some(tx) = &self.tx else { return };
    if let Err(e) = tx.try_send(update) {
      let update = match &e {
        mpsc::error::TrySendError::Full(u)
        | mpsc::error::TrySendError::Closed(u) => u,
      };
      tracing::warn!(
        user_id = %update.user_id,
        "status broadcast queue unavailable, update dropped"
      );
    }
  }
}
