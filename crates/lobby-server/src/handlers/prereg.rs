//! Handlers for `/preregistrations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/preregistrations` | Pending announcements, earliest arrival first |
//! | `POST` | `/preregistrations` | Admin: announce an expected guest |
//! | `POST` | `/preregistrations/:id/check-in` | One-tap kiosk check-in |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lobby_core::{
  auth::AuthProvider,
  error::ValidationError,
  notify::Notifier,
  prereg::{NewPreregistration, Preregistration},
  store::{DirectoryStore, PreregistrationStore, VisitorLogStore},
  visit::VisitorLog,
};
use lobby_kiosk::{CheckInError, PreregCheckInError};

use crate::{AppState, auth::AdminAuthed, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /preregistrations` — guests still expected.
pub async fn list<S, A, N>(
  State(state): State<AppState<S, A, N>>,
) -> Result<Json<Vec<Preregistration>>, ApiError>
where
  S: DirectoryStore + VisitorLogStore + PreregistrationStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  let pending = state.store.subscribe_pending().borrow().clone();
  Ok(Json(pending))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub visitor_name:     String,
  #[serde(default)]
  pub company_name:     Option<String>,
  pub employee_id:      Uuid,
  pub expected_arrival: DateTime<Utc>,
}

/// `POST /preregistrations` — announce an expected guest. Admin only.
pub async fn create<S, A, N>(
  _admin: AdminAuthed,
  State(state): State<AppState<S, A, N>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore + VisitorLogStore + PreregistrationStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  if body.visitor_name.trim().is_empty() {
    return Err(ApiError::Validation(ValidationError::BlankGuestName));
  }

  // The announced host must exist now; the directory may still change
  // before the guest arrives.
  state
    .store
    .get(body.employee_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("employee {} not found", body.employee_id))
    })?;

  let prereg = state
    .store
    .register(NewPreregistration {
      visitor_name:     body.visitor_name,
      company_name:     body.company_name,
      employee_id:      body.employee_id,
      expected_arrival: body.expected_arrival,
    })
    .await
    .map_err(ApiError::store)?;

  Ok((StatusCode::CREATED, Json(prereg)))
}

// ─── One-tap check-in ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PreregCheckInResponse {
  pub log:             VisitorLog,
  pub notified:        bool,
  pub warning:         Option<String>,
  pub preregistration: Preregistration,
}

/// `POST /preregistrations/:id/check-in`
///
/// Runs the regular check-in for the announced guest and flips the
/// announcement to checked-in. A repeat tap is a 409, not a second visit.
pub async fn check_in<S, A, N>(
  State(state): State<AppState<S, A, N>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore + VisitorLogStore + PreregistrationStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  let outcome = state.prereg.check_in_guest(id).await.map_err(|e| match e {
    PreregCheckInError::NotFound(id) => {
      ApiError::NotFound(format!("preregistration {id} not found"))
    }
    PreregCheckInError::AlreadyCheckedIn(_) => ApiError::Conflict(e.to_string()),
    PreregCheckInError::UnknownHost(id) => {
      ApiError::NotFound(format!("employee {id} not found"))
    }
    PreregCheckInError::Directory(e) => ApiError::store(e),
    PreregCheckInError::Prereg(e) => ApiError::store(e),
    PreregCheckInError::CheckIn(CheckInError::Busy) => {
      ApiError::Conflict("a check-in is already in progress".into())
    }
    PreregCheckInError::CheckIn(CheckInError::Validation(e)) => {
      ApiError::Validation(e)
    }
    PreregCheckInError::CheckIn(CheckInError::Store(e)) => ApiError::store(e),
  })?;

  Ok((
    StatusCode::CREATED,
    Json(PreregCheckInResponse {
      log:             outcome.check_in.log,
      notified:        outcome.check_in.notified,
      warning:         outcome.check_in.warning,
      preregistration: outcome.preregistration,
    }),
  ))
}
