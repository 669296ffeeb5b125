//! Authentication and admin-authorization contracts.
//!
//! The kiosk has exactly one privileged surface: the employee directory
//! management screens. Whether the signed-in identity may use them is
//! decided by a boolean `admin` claim fetched fresh on every identity
//! change.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

/// A signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub user_id: Uuid,
  pub email:   String,
}

/// Authorization claims attached to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Claims {
  pub admin: bool,
}

/// Abstraction over the authentication backend.
///
/// Implementations keep a single "current identity" (the kiosk is a
/// single-session device) and publish changes on a [`watch`] channel so
/// consumers react to sign-in and sign-out without polling.
pub trait AuthProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Verify credentials without touching the current session.
  ///
  /// Returns `Ok(None)` for unknown accounts and wrong passwords — the two
  /// are deliberately indistinguishable to callers.
  fn authenticate(
    &self,
    email: &str,
    password: &str,
  ) -> impl Future<Output = Result<Option<(Identity, Claims)>, Self::Error>> + Send;

  /// Verify credentials and, on success, make the identity current.
  fn sign_in(
    &self,
    email: &str,
    password: &str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send;

  /// Clear the current identity. Returns `true` if a session was cleared.
  fn sign_out(&self) -> bool;

  /// The identity signed in right now, if any.
  fn identity(&self) -> Option<Identity>;

  /// Live stream of identity changes; emits the current value immediately
  /// and on every sign-in/sign-out thereafter.
  fn subscribe_identity(&self) -> watch::Receiver<Option<Identity>>;

  /// Fetch authorization claims for the current identity.
  ///
  /// `force_refresh` bypasses any cached token. A refresh failure must
  /// surface as an error — never as a silent `admin: false`.
  fn authorization_claims(
    &self,
    force_refresh: bool,
  ) -> impl Future<Output = Result<Claims, Self::Error>> + Send;
}
