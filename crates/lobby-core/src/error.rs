//! Error types for `lobby-core`.

use thiserror::Error;

/// A client-side validation failure, caught before any store or network
/// call is made. Each variant maps to a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("first name must not be blank")]
  BlankFirstName,

  #[error("last name must not be blank")]
  BlankLastName,

  #[error("email must not be blank")]
  BlankEmail,

  #[error("malformed email address: {0:?}")]
  MalformedEmail(String),

  #[error("no employee selected")]
  NoEmployeeSelected,

  #[error("guest name must not be blank")]
  BlankGuestName,

  #[error("at least one guest is required")]
  NoGuests,
}

