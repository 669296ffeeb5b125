//! HTTP Basic-auth extractor for the admin endpoints.
//!
//! Credentials are verified against the [`AuthProvider`] on every request;
//! there are no sessions or tokens. A bad username and a bad password are
//! indistinguishable (both 401). A good account without the admin claim is
//! a 403 — the distinction matters to the kiosk's admin screen.

use axum::{extract::FromRequestParts, http::request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use lobby_core::{
  auth::{AuthProvider, Identity},
  notify::Notifier,
  store::{DirectoryStore, VisitorLogStore},
};

use crate::{AppState, error::ApiError};

/// Present in a handler's arguments means the request carried valid admin
/// credentials. Carries the verified identity.
pub struct AdminAuthed(pub Identity);

/// Pull `email:password` out of an `Authorization: Basic …` header.
fn basic_credentials(parts: &Parts) -> Result<(String, String), ApiError> {
  let header_val = parts
    .headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds = String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;

  let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  Ok((email.to_owned(), password.to_owned()))
}

impl<S, A, N> FromRequestParts<AppState<S, A, N>> for AdminAuthed
where
  S: DirectoryStore + VisitorLogStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, A, N>,
  ) -> Result<Self, Self::Rejection> {
    let (email, password) = basic_credentials(parts)?;

    match state
      .auth
      .authenticate(&email, &password)
      .await
      .map_err(ApiError::store)?
    {
      Some((identity, claims)) if claims.admin => Ok(AdminAuthed(identity)),
      Some(_) => Err(ApiError::Forbidden),
      None => Err(ApiError::Unauthorized),
    }
  }
}
