//! Preregistration — a guest announced ahead of their visit.
//!
//! An office manager registers the guest before arrival; the kiosk shows
//! the pending list and checks a guest in with one tap, reusing the
//! regular check-in pipeline. A record leaves the pending list by having
//! its status flipped, never by deletion, so the history of announced
//! visits survives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a preregistration is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreregStatus {
  /// Announced, not yet arrived.
  Pending,
  /// Arrived and checked in through the kiosk.
  CheckedIn,
}

/// One announced guest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preregistration {
  pub id:               Uuid,
  pub visitor_name:     String,
  pub company_name:     Option<String>,
  /// The host the guest is announced for.
  pub employee_id:      Uuid,
  pub expected_arrival: DateTime<Utc>,
  pub status:           PreregStatus,
}

impl Preregistration {
  pub fn is_pending(&self) -> bool {
    self.status == PreregStatus::Pending
  }
}

/// Input to [`crate::store::PreregistrationStore::register`].
///
/// The id is assigned by the store; the record always starts `Pending`.
#[derive(Debug, Clone)]
pub struct NewPreregistration {
  pub visitor_name:     String,
  pub company_name:     Option<String>,
  pub employee_id:      Uuid,
  pub expected_arrival: DateTime<Utc>,
}
