//! Handlers for `/employees` endpoints.
//!
//! | Method   | Path | Auth | Notes |
//! |----------|------|------|-------|
//! | `GET`    | `/employees` | none | Optional `?search=<substring>` |
//! | `POST`   | `/employees` | admin | Body: [`NewEmployee`] |
//! | `PUT`    | `/employees/:id` | admin | Full replacement of mutable fields |
//! | `DELETE` | `/employees/:id` | admin | Hard delete; logs keep their copy |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use lobby_core::{
  auth::AuthProvider,
  employee::{Employee, NewEmployee},
  notify::Notifier,
  store::{DirectoryStore, VisitorLogStore},
};
use lobby_kiosk::filter_employees;

use crate::{AppState, auth::AdminAuthed, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub search: Option<String>,
}

/// `GET /employees[?search=<substring>]` — the kiosk's host picker.
pub async fn list<S, A, N>(
  State(state): State<AppState<S, A, N>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Employee>>, ApiError>
where
  S: DirectoryStore + VisitorLogStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  // The live query always holds the latest ordered snapshot.
  let employees = state.store.subscribe().borrow().clone();
  let employees = match params.search.as_deref() {
    Some(query) => filter_employees(&employees, query),
    None => employees,
  };
  Ok(Json(employees))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /employees` — admin only.
pub async fn create<S, A, N>(
  _admin: AdminAuthed,
  State(state): State<AppState<S, A, N>>,
  Json(body): Json<NewEmployee>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore + VisitorLogStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  // Validate up front so rule violations map to 422 rather than a store
  // error.
  body.validate()?;
  let employee = state.store.add(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(employee)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /employees/:id` — admin only. Replaces every mutable field;
/// `created_at` is preserved by the store.
pub async fn update<S, A, N>(
  _admin: AdminAuthed,
  State(state): State<AppState<S, A, N>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewEmployee>,
) -> Result<Json<Employee>, ApiError>
where
  S: DirectoryStore + VisitorLogStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  body.validate()?;
  ensure_exists(&state, id).await?;
  let employee = state
    .store
    .update(id, body)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(employee))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /employees/:id` — admin only. Visitor logs referencing the
/// employee are untouched; the board falls back to their denormalized name.
pub async fn remove<S, A, N>(
  _admin: AdminAuthed,
  State(state): State<AppState<S, A, N>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DirectoryStore + VisitorLogStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  ensure_exists(&state, id).await?;
  state.store.delete(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

async fn ensure_exists<S, A, N>(
  state: &AppState<S, A, N>,
  id: Uuid,
) -> Result<(), ApiError>
where
  S: DirectoryStore + VisitorLogStore + 'static,
{
  state
    .store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .map(|_| ())
    .ok_or_else(|| ApiError::NotFound(format!("employee {id} not found")))
}
