//! Error type for `lobby-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A write rejected before reaching the database.
  #[error(transparent)]
  Validation(#[from] lobby_core::ValidationError),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("employee not found: {0}")]
  EmployeeNotFound(uuid::Uuid),

  #[error("visitor log not found: {0}")]
  VisitNotFound(uuid::Uuid),

  #[error("preregistration not found: {0}")]
  PreregNotFound(uuid::Uuid),

  #[error("unknown preregistration status: {0:?}")]
  UnknownStatus(String),

  /// Claims were requested while no identity is signed in.
  #[error("not authenticated")]
  NotAuthenticated,

  /// The signed-in identity's user row disappeared between sign-in and the
  /// claims fetch. Surfaced distinctly rather than treated as non-admin.
  #[error("user record missing for signed-in identity")]
  IdentityRevoked,

  #[error("password hash error: {0}")]
  PasswordHash(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
