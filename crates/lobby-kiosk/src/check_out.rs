//! The check-out workflow: mark a visit as departed.
//!
//! Deliberately thin — the store already guarantees that the checkout
//! timestamp and flag are set together and that a repeat call is a no-op.

use std::sync::Arc;

use uuid::Uuid;

use lobby_core::{store::VisitorLogStore, visit::VisitorLog};

pub struct CheckOutWorkflow<V> {
  visits: Arc<V>,
}

impl<V> Clone for CheckOutWorkflow<V> {
  fn clone(&self) -> Self {
    Self {
      visits: Arc::clone(&self.visits),
    }
  }
}

impl<V: VisitorLogStore> CheckOutWorkflow<V> {
  pub fn new(visits: Arc<V>) -> Self {
    Self { visits }
  }

  /// Check the visit out. Safe to call from a stale screen: a visit that
  /// already checked out comes back unchanged.
  pub async fn submit(&self, id: Uuid) -> Result<VisitorLog, V::Error> {
    self.visits.check_out(id).await
  }
}
