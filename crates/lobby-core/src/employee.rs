//! Employee — a directory entry a guest can check in to visit.
//!
//! The directory is owned by the store; clients hold no authoritative copy.
//! Everything a screen shows is a projection of the latest snapshot pushed
//! through the live subscription.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

// ─── Employee ────────────────────────────────────────────────────────────────

/// A member of the employee directory.
///
/// `id`, `created_at`, and `updated_at` are assigned by the store; callers
/// submit a [`NewEmployee`] and receive the persisted record back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
  pub id:         Uuid,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub title:      Option<String>,
  pub department: Option<String>,
  /// URI of a profile photo; the binary itself never enters the store.
  pub photo_url:  Option<String>,
  pub active:     bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Employee {
  /// The denormalized "first last" string captured onto visitor logs.
  pub fn display_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

// ─── NewEmployee ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::DirectoryStore::add`] and
/// [`crate::store::DirectoryStore::update`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  #[serde(default)]
  pub title:      Option<String>,
  #[serde(default)]
  pub department: Option<String>,
  #[serde(default)]
  pub photo_url:  Option<String>,
  #[serde(default = "default_active")]
  pub active:     bool,
}

fn default_active() -> bool { true }

impl NewEmployee {
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      first_name: first_name.into(),
      last_name:  last_name.into(),
      email:      email.into(),
      title:      None,
      department: None,
      photo_url:  None,
      active:     true,
    }
  }

  /// Reject blank required fields and malformed email addresses.
  ///
  /// Runs entirely client-side; a write that fails here never reaches the
  /// store.
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.first_name.trim().is_empty() {
      return Err(ValidationError::BlankFirstName);
    }
    if self.last_name.trim().is_empty() {
      return Err(ValidationError::BlankLastName);
    }
    if self.email.trim().is_empty() {
      return Err(ValidationError::BlankEmail);
    }
    if !is_valid_email(&self.email) {
      return Err(ValidationError::MalformedEmail(self.email.clone()));
    }
    Ok(())
  }
}

// ─── Email format check ──────────────────────────────────────────────────────

/// Basic address-format check: one `@`, a non-empty local part, and a domain
/// containing a dot with non-empty labels. Intentionally far short of RFC
/// 5322 — the goal is catching typos at the kiosk, not parsing every legal
/// address.
pub fn is_valid_email(email: &str) -> bool {
  let email = email.trim();
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  let Some((host, tld)) = domain.rsplit_once('.') else {
    return false;
  };
  !host.is_empty() && !tld.is_empty() && !email.contains(char::is_whitespace)
}
