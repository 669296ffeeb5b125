//! Handlers for `/visits` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/visits` | `?status=checked_in` (default) or `?status=all` |
//! | `POST` | `/visits/check-in` | Records the visit, then emails the host |
//! | `POST` | `/visits/:id/check-out` | Idempotent |
//!
//! All of these are kiosk-facing and unauthenticated.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lobby_core::{
  auth::AuthProvider,
  notify::Notifier,
  store::{DirectoryStore, VisitorLogStore},
  visit::VisitorLog,
};
use lobby_kiosk::{CheckInError, GuestForm, project};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
  /// Visitors currently on-site, oldest check-in first.
  #[default]
  CheckedIn,
  /// Full history, newest check-in first.
  All,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub status: StatusFilter,
}

/// One board row: the log plus the host's *current* directory name, falling
/// back to "Unknown" when the host has been deleted.
#[derive(Debug, Serialize)]
pub struct BoardRow {
  #[serde(flatten)]
  pub log:       VisitorLog,
  pub host_name: String,
}

/// `GET /visits[?status=checked_in|all]` — the visitor board.
pub async fn list<S, A, N>(
  State(state): State<AppState<S, A, N>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<BoardRow>>, ApiError>
where
  S: DirectoryStore + VisitorLogStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  let logs = match params.status {
    StatusFilter::CheckedIn => state.store.subscribe_checked_in().borrow().clone(),
    StatusFilter::All => state.store.subscribe_all().borrow().clone(),
  };
  let employees = state.store.subscribe().borrow().clone();

  let rows = project(&employees, &logs)
    .into_iter()
    .map(|row| BoardRow {
      log:       row.log,
      host_name: row.host_name,
    })
    .collect();
  Ok(Json(rows))
}

// ─── Check-in ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CheckInBody {
  pub employee_id:  Uuid,
  #[serde(default)]
  pub company_name: Option<String>,
  /// Free-text reason for the visit, kept on the log.
  #[serde(default)]
  pub purpose:      Option<String>,
  pub guests:       Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
  pub log:      VisitorLog,
  pub notified: bool,
  pub warning:  Option<String>,
}

/// `POST /visits/check-in`
///
/// The visit is durable once this returns 201; a failed host notification
/// is reported in `warning`, never as a request failure.
pub async fn check_in<S, A, N>(
  State(state): State<AppState<S, A, N>>,
  Json(body): Json<CheckInBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore + VisitorLogStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  let employee = state
    .store
    .get(body.employee_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("employee {} not found", body.employee_id))
    })?;

  let mut form = GuestForm::new();
  form.select_employee(employee);
  if let Some(company) = body.company_name {
    form.set_company(company);
  }
  if let Some(purpose) = body.purpose {
    form.set_purpose(purpose);
  }
  let mut names = body.guests.into_iter();
  if let Some(first) = names.next() {
    let row = form.guests()[0].id;
    form.set_guest_name(row, first);
  }
  for name in names {
    let row = form.add_guest();
    form.set_guest_name(row, name);
  }

  let outcome = state.check_in.submit(&form).await.map_err(|e| match e {
    CheckInError::Busy => ApiError::Conflict(e.to_string()),
    CheckInError::Validation(e) => ApiError::Validation(e),
    CheckInError::Store(e) => ApiError::store(e),
  })?;

  Ok((
    StatusCode::CREATED,
    Json(CheckInResponse {
      log:      outcome.log,
      notified: outcome.notified,
      warning:  outcome.warning,
    }),
  ))
}

// ─── Check-out ────────────────────────────────────────────────────────────────

/// `POST /visits/:id/check-out`
///
/// Safe to repeat: a visit that is already checked out comes back unchanged
/// with its original timestamp.
pub async fn check_out<S, A, N>(
  State(state): State<AppState<S, A, N>>,
  Path(id): Path<Uuid>,
) -> Result<Json<VisitorLog>, ApiError>
where
  S: DirectoryStore + VisitorLogStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  state
    .store
    .find(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("visit {id} not found")))?;

  let log = state.check_out.submit(id).await.map_err(ApiError::store)?;
  Ok(Json(log))
}
