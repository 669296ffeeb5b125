//! The guest-details form: who is visiting, from which company, and whom.
//!
//! The form enforces the submit contract client-side: the check-in action
//! is enabled iff an employee is selected and every guest-name field is
//! non-blank. Company name is never required.

use lobby_core::{employee::Employee, error::ValidationError};
use uuid::Uuid;

/// One guest-name entry. The id exists so front ends can key list rows
/// while names are being edited.
#[derive(Debug, Clone)]
pub struct Guest {
  pub id:   Uuid,
  pub name: String,
}

impl Guest {
  fn blank() -> Self {
    Self {
      id:   Uuid::new_v4(),
      name: String::new(),
    }
  }
}

/// Validated output of a [`GuestForm`], ready for the check-in workflow.
#[derive(Debug, Clone)]
pub struct CheckInInput {
  pub employee:    Employee,
  /// May be blank.
  pub company:     String,
  /// May be blank. Persisted on the log but not sent to the host.
  pub purpose:     String,
  /// Trimmed, all non-blank, at least one.
  pub guest_names: Vec<String>,
}

/// Local, ephemeral state of the guest-details screen.
#[derive(Debug, Clone)]
pub struct GuestForm {
  selected: Option<Employee>,
  company:  String,
  purpose:  String,
  guests:   Vec<Guest>,
}

impl Default for GuestForm {
  fn default() -> Self { Self::new() }
}

impl GuestForm {
  /// A fresh form with one blank guest row.
  pub fn new() -> Self {
    Self {
      selected: None,
      company:  String::new(),
      purpose:  String::new(),
      guests:   vec![Guest::blank()],
    }
  }

  pub fn selected(&self) -> Option<&Employee> { self.selected.as_ref() }

  pub fn company(&self) -> &str { &self.company }

  pub fn purpose(&self) -> &str { &self.purpose }

  pub fn guests(&self) -> &[Guest] { &self.guests }

  pub fn select_employee(&mut self, employee: Employee) {
    self.selected = Some(employee);
  }

  pub fn set_company(&mut self, company: impl Into<String>) {
    self.company = company.into();
  }

  pub fn set_purpose(&mut self, purpose: impl Into<String>) {
    self.purpose = purpose.into();
  }

  pub fn set_guest_name(&mut self, id: Uuid, name: impl Into<String>) {
    if let Some(guest) = self.guests.iter_mut().find(|g| g.id == id) {
      guest.name = name.into();
    }
  }

  pub fn add_guest(&mut self) -> Uuid {
    let guest = Guest::blank();
    let id = guest.id;
    self.guests.push(guest);
    id
  }

  /// Remove a guest row; the last remaining row cannot be removed.
  pub fn remove_guest(&mut self, id: Uuid) {
    if self.guests.len() > 1 {
      self.guests.retain(|g| g.id != id);
    }
  }

  /// The submit-control predicate: an employee is selected and every
  /// guest-name field is non-blank. Company name may be blank.
  pub fn submit_enabled(&self) -> bool {
    self.selected.is_some()
      && !self.guests.is_empty()
      && self.guests.iter().all(|g| !g.name.trim().is_empty())
  }

  /// Validate and convert into workflow input. Mirrors [`submit_enabled`]
  /// but reports which rule failed.
  ///
  /// [`submit_enabled`]: GuestForm::submit_enabled
  pub fn to_input(&self) -> Result<CheckInInput, ValidationError> {
    let employee = self
      .selected
      .clone()
      .ok_or(ValidationError::NoEmployeeSelected)?;

    if self.guests.is_empty() {
      return Err(ValidationError::NoGuests);
    }

    let mut guest_names = Vec::with_capacity(self.guests.len());
    for guest in &self.guests {
      let name = guest.name.trim();
      if name.is_empty() {
        return Err(ValidationError::BlankGuestName);
      }
      guest_names.push(name.to_owned());
    }

    Ok(CheckInInput {
      employee,
      company: self.company.trim().to_owned(),
      purpose: self.purpose.trim().to_owned(),
      guest_names,
    })
  }
}
