//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Booleans are SQLite INTEGERs.

use chrono::{DateTime, Utc};
use lobby_core::{
  employee::Employee,
  prereg::{PreregStatus, Preregistration},
  visit::VisitorLog,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── PreregStatus ────────────────────────────────────────────────────────────

pub fn encode_status(status: PreregStatus) -> &'static str {
  match status {
    PreregStatus::Pending => "pending",
    PreregStatus::CheckedIn => "checked_in",
  }
}

pub fn decode_status(s: &str) -> Result<PreregStatus> {
  match s {
    "pending" => Ok(PreregStatus::Pending),
    "checked_in" => Ok(PreregStatus::CheckedIn),
    other => Err(Error::UnknownStatus(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `employees` row.
pub struct RawEmployee {
  pub id:         String,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub title:      Option<String>,
  pub department: Option<String>,
  pub photo_url:  Option<String>,
  pub active:     bool,
  pub created_at: String,
  pub updated_at: String,
}

impl RawEmployee {
  pub fn into_employee(self) -> Result<Employee> {
    Ok(Employee {
      id:         decode_uuid(&self.id)?,
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
      title:      self.title,
      department: self.department,
      photo_url:  self.photo_url,
      active:     self.active,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `visitor_logs` row.
pub struct RawVisit {
  pub id:             String,
  pub visitor_name:   String,
  pub company_name:   Option<String>,
  pub purpose:        Option<String>,
  pub employee_id:    String,
  pub employee_name:  String,
  pub check_in_time:  String,
  pub check_out_time: Option<String>,
  pub checked_out:    bool,
}

impl RawVisit {
  pub fn into_visit(self) -> Result<VisitorLog> {
    Ok(VisitorLog {
      id:             decode_uuid(&self.id)?,
      visitor_name:   self.visitor_name,
      company_name:   self.company_name,
      purpose:        self.purpose,
      employee_id:    decode_uuid(&self.employee_id)?,
      employee_name:  self.employee_name,
      check_in_time:  decode_dt(&self.check_in_time)?,
      check_out_time: self
        .check_out_time
        .as_deref()
        .map(decode_dt)
        .transpose()?,
      checked_out:    self.checked_out,
    })
  }
}

/// Raw values read directly from a `preregistrations` row.
pub struct RawPreregistration {
  pub id:               String,
  pub visitor_name:     String,
  pub company_name:     Option<String>,
  pub employee_id:      String,
  pub expected_arrival: String,
  pub status:           String,
}

impl RawPreregistration {
  pub fn into_preregistration(self) -> Result<Preregistration> {
    Ok(Preregistration {
      id:               decode_uuid(&self.id)?,
      visitor_name:     self.visitor_name,
      company_name:     self.company_name,
      employee_id:      decode_uuid(&self.employee_id)?,
      expected_arrival: decode_dt(&self.expected_arrival)?,
      status:           decode_status(&self.status)?,
    })
  }
}
