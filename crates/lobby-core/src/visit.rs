//! VisitorLog — one check-in event, covering one or more bundled guests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── VisitorLog ──────────────────────────────────────────────────────────────

/// A single check-in event.
///
/// Created once at check-in and mutated exactly once at check-out, when the
/// store sets `check_out_time` and `checked_out` together. The invariant
/// `checked_out == true` iff `check_out_time.is_some()` holds because the
/// store is the only writer of those two fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorLog {
  pub id:             Uuid,
  /// All guest names from the check-in, joined into one display string.
  pub visitor_name:   String,
  pub company_name:   Option<String>,
  pub purpose:        Option<String>,
  pub employee_id:    Uuid,
  /// Denormalized "first last" of the host, captured at check-in time so the
  /// log survives later directory edits and deletions.
  pub employee_name:  String,
  /// Store-assigned; never supplied by the client.
  pub check_in_time:  DateTime<Utc>,
  pub check_out_time: Option<DateTime<Utc>>,
  pub checked_out:    bool,
}

impl VisitorLog {
  /// A record is "currently checked in" iff the checked-out flag is false.
  pub fn is_checked_in(&self) -> bool { !self.checked_out }
}

// ─── NewVisit ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::VisitorLogStore::check_in`].
///
/// `check_in_time` is always assigned by the store; it is not accepted from
/// callers.
#[derive(Debug, Clone)]
pub struct NewVisit {
  pub visitor_name:  String,
  pub company_name:  Option<String>,
  pub purpose:       Option<String>,
  pub employee_id:   Uuid,
  pub employee_name: String,
}
