//! JSON REST API for the Lobby kiosk.
//!
//! Exposes an axum [`Router`] over any pair of store and auth backends from
//! `lobby-core`. The kiosk-facing endpoints (host search, check-in,
//! check-out, visitor board) are unauthenticated — the tablet itself is the
//! trust boundary. Directory management requires HTTP Basic credentials for
//! an account carrying the admin claim.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use serde::Deserialize;

use lobby_core::{
  auth::AuthProvider,
  notify::Notifier,
  store::{DirectoryStore, PreregistrationStore, VisitorLogStore},
};
use lobby_kiosk::{CheckInWorkflow, CheckOutWorkflow, PreregWorkflow};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Endpoint that turns a check-in notice into an email to the host.
  pub notify_url: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, A, N> {
  pub store:     Arc<S>,
  pub auth:      Arc<A>,
  pub check_in:  CheckInWorkflow<S, N>,
  pub check_out: CheckOutWorkflow<S>,
  pub prereg:    PreregWorkflow<S, N>,
}

impl<S, A, N> Clone for AppState<S, A, N> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      auth:      Arc::clone(&self.auth),
      check_in:  self.check_in.clone(),
      check_out: self.check_out.clone(),
      prereg:    self.prereg.clone(),
    }
  }
}

impl<S, A, N> AppState<S, A, N>
where
  S: DirectoryStore + VisitorLogStore + PreregistrationStore,
  A: AuthProvider,
  N: Notifier,
{
  pub fn new(store: Arc<S>, auth: Arc<A>, notifier: Arc<N>) -> Self {
    let check_in = CheckInWorkflow::new(Arc::clone(&store), notifier);
    Self {
      // Shares the check-in busy flag, so a one-tap check-in and a manual
      // submit cannot overlap.
      prereg:    PreregWorkflow::new(Arc::clone(&store), check_in.clone()),
      check_out: CheckOutWorkflow::new(Arc::clone(&store)),
      check_in,
      store,
      auth,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S, A, N>(state: AppState<S, A, N>) -> Router
where
  S: DirectoryStore + VisitorLogStore + PreregistrationStore + 'static,
  A: AuthProvider + 'static,
  N: Notifier + 'static,
{
  Router::new()
    // Directory
    .route(
      "/api/employees",
      get(handlers::employees::list::<S, A, N>)
        .post(handlers::employees::create::<S, A, N>),
    )
    .route(
      "/api/employees/{id}",
      put(handlers::employees::update::<S, A, N>)
        .delete(handlers::employees::remove::<S, A, N>),
    )
    // Visitor log
    .route("/api/visits", get(handlers::visits::list::<S, A, N>))
    .route(
      "/api/visits/check-in",
      post(handlers::visits::check_in::<S, A, N>),
    )
    .route(
      "/api/visits/{id}/check-out",
      post(handlers::visits::check_out::<S, A, N>),
    )
    // Preregistrations
    .route(
      "/api/preregistrations",
      get(handlers::prereg::list::<S, A, N>)
        .post(handlers::prereg::create::<S, A, N>),
    )
    .route(
      "/api/preregistrations/{id}/check-in",
      post(handlers::prereg::check_in::<S, A, N>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use std::sync::Mutex;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use lobby_core::notify::{CheckInNotice, NotifyError};
  use lobby_store_sqlite::{SqliteAuth, SqliteStore};

  /// In-memory notifier with a switchable failure mode.
  struct StubNotifier {
    fail: bool,
    sent: Mutex<Vec<CheckInNotice>>,
  }

  impl StubNotifier {
    fn new(fail: bool) -> Self {
      Self {
        fail,
        sent: Mutex::new(Vec::new()),
      }
    }
  }

  impl Notifier for StubNotifier {
    async fn notify_check_in(&self, notice: &CheckInNotice) -> Result<(), NotifyError> {
      if self.fail {
        return Err(NotifyError::Status(502));
      }
      self.sent.lock().unwrap().push(notice.clone());
      Ok(())
    }
  }

  type TestState = AppState<SqliteStore, SqliteAuth, StubNotifier>;

  async fn make_state_with_notifier(
    notify_fails: bool,
  ) -> (TestState, Arc<StubNotifier>) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let auth = store.auth();
    auth.add_user("admin@example.com", "secret", true).await.unwrap();
    auth.add_user("staff@example.com", "secret", false).await.unwrap();

    let notifier = Arc::new(StubNotifier::new(notify_fails));
    let state = AppState::new(Arc::new(store), Arc::new(auth), Arc::clone(&notifier));
    (state, notifier)
  }

  async fn make_state(notify_fails: bool) -> TestState {
    make_state_with_notifier(notify_fails).await.0
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn oneshot_json(
    state: TestState,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn employee_body(first: &str, last: &str, email: &str) -> Value {
    json!({ "first_name": first, "last_name": last, "email": email })
  }

  async fn create_employee(state: &TestState, first: &str, last: &str) -> Value {
    let (status, body) = oneshot_json(
      state.clone(),
      "POST",
      "/api/employees",
      Some(&basic("admin@example.com", "secret")),
      Some(employee_body(
        first,
        last,
        &format!("{}@example.com", first.to_lowercase()),
      )),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
  }

  // ── Directory ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn employee_list_is_public_and_searchable() {
    let state = make_state(false).await;
    create_employee(&state, "Sam", "Jones").await;
    create_employee(&state, "Mia", "Chen").await;

    let (status, body) =
      oneshot_json(state.clone(), "GET", "/api/employees", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, filtered) =
      oneshot_json(state, "GET", "/api/employees?search=chen", None, None).await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["first_name"], "Mia");
  }

  #[tokio::test]
  async fn create_requires_admin_credentials() {
    let state = make_state(false).await;
    let body = employee_body("Sam", "Jones", "sam@example.com");

    let (status, _) = oneshot_json(
      state.clone(),
      "POST",
      "/api/employees",
      None,
      Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = oneshot_json(
      state.clone(),
      "POST",
      "/api/employees",
      Some(&basic("admin@example.com", "wrong")),
      Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid account, no admin claim.
    let (status, _) = oneshot_json(
      state,
      "POST",
      "/api/employees",
      Some(&basic("staff@example.com", "secret")),
      Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn unauthorized_response_carries_challenge_header() {
    let state = make_state(false).await;
    let req = Request::builder()
      .method("POST")
      .uri("/api/employees")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(
        employee_body("Sam", "Jones", "sam@example.com").to_string(),
      ))
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn malformed_email_is_rejected_with_422() {
    let state = make_state(false).await;
    let (status, body) = oneshot_json(
      state,
      "POST",
      "/api/employees",
      Some(&basic("admin@example.com", "secret")),
      Some(employee_body("Sam", "Jones", "not-an-address")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("not-an-address"));
  }

  #[tokio::test]
  async fn update_and_delete_round_trip() {
    let state = make_state(false).await;
    let created = create_employee(&state, "Sam", "Jones").await;
    let id = created["id"].as_str().unwrap().to_string();
    let auth = basic("admin@example.com", "secret");

    let (status, updated) = oneshot_json(
      state.clone(),
      "PUT",
      &format!("/api/employees/{id}"),
      Some(&auth),
      Some(employee_body("Samuel", "Jones", "sam@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["first_name"], "Samuel");
    assert_eq!(updated["created_at"], created["created_at"]);

    let (status, _) = oneshot_json(
      state.clone(),
      "DELETE",
      &format!("/api/employees/{id}"),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = oneshot_json(
      state,
      "DELETE",
      &format!("/api/employees/{id}"),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Visits ──────────────────────────────────────────────────────────────────

  async fn check_in(state: &TestState, employee_id: &str, guests: Value) -> (StatusCode, Value) {
    oneshot_json(
      state.clone(),
      "POST",
      "/api/visits/check-in",
      None,
      Some(json!({
        "employee_id": employee_id,
        "company_name": "Acme",
        "guests": guests,
      })),
    )
    .await
  }

  #[tokio::test]
  async fn check_in_records_visit_and_notifies_host() {
    let (state, notifier) = make_state_with_notifier(false).await;
    let host = create_employee(&state, "Sam", "Jones").await;
    let host_id = host["id"].as_str().unwrap();

    let (status, body) =
      check_in(&state, host_id, json!(["Ana Lee", "Bob Roy"])).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notified"], true);
    assert!(body["warning"].is_null());
    assert_eq!(body["log"]["visitor_name"], "Ana Lee, Bob Roy");
    assert_eq!(body["log"]["employee_name"], "Sam Jones");
    assert_eq!(body["log"]["checked_out"], false);

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].employee_email, "sam@example.com");
    assert_eq!(sent[0].visitor_names, ["Ana Lee", "Bob Roy"]);
  }

  #[tokio::test]
  async fn check_in_purpose_is_persisted_on_the_log() {
    let state = make_state(false).await;
    let host = create_employee(&state, "Sam", "Jones").await;

    let (status, body) = oneshot_json(
      state.clone(),
      "POST",
      "/api/visits/check-in",
      None,
      Some(json!({
        "employee_id": host["id"],
        "purpose": "Interview",
        "guests": ["Ana Lee"],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["log"]["purpose"], "Interview");

    // Omitting the field stores no purpose.
    let (status, body) =
      check_in(&state, host["id"].as_str().unwrap(), json!(["Bob Roy"])).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["log"]["purpose"].is_null());
  }

  #[tokio::test]
  async fn check_in_for_unknown_host_is_404() {
    let state = make_state(false).await;
    let (status, _) = check_in(
      &state,
      &uuid::Uuid::new_v4().to_string(),
      json!(["Ana Lee"]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn check_in_with_blank_guest_is_422() {
    let state = make_state(false).await;
    let host = create_employee(&state, "Sam", "Jones").await;
    let (status, _) =
      check_in(&state, host["id"].as_str().unwrap(), json!(["  "])).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn notification_failure_still_records_the_visit() {
    let state = make_state(true).await;
    let host = create_employee(&state, "Sam", "Jones").await;

    let (status, body) =
      check_in(&state, host["id"].as_str().unwrap(), json!(["Ana Lee"])).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notified"], false);
    assert!(body["warning"].as_str().unwrap().contains("502"));

    // The visit is on the board despite the failed email.
    let (_, visits) = oneshot_json(state, "GET", "/api/visits", None, None).await;
    assert_eq!(visits.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn board_lists_checked_in_visitors_with_host_names() {
    let state = make_state(false).await;
    let host = create_employee(&state, "Sam", "Jones").await;
    let (_, created) =
      check_in(&state, host["id"].as_str().unwrap(), json!(["Ana Lee"])).await;
    let visit_id = created["log"]["id"].as_str().unwrap().to_string();

    let (status, visits) =
      oneshot_json(state.clone(), "GET", "/api/visits", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let visits = visits.as_array().unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0]["host_name"], "Sam Jones");

    // Check out and confirm the default (checked-in) view empties while the
    // full history keeps the record.
    let (status, out) = oneshot_json(
      state.clone(),
      "POST",
      &format!("/api/visits/{visit_id}/check-out"),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["checked_out"], true);
    assert!(out["check_out_time"].is_string());

    let (_, current) =
      oneshot_json(state.clone(), "GET", "/api/visits", None, None).await;
    assert!(current.as_array().unwrap().is_empty());

    let (_, all) =
      oneshot_json(state, "GET", "/api/visits?status=all", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn check_out_is_idempotent() {
    let state = make_state(false).await;
    let host = create_employee(&state, "Sam", "Jones").await;
    let (_, created) =
      check_in(&state, host["id"].as_str().unwrap(), json!(["Ana Lee"])).await;
    let visit_id = created["log"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/visits/{visit_id}/check-out");

    let (status, first) =
      oneshot_json(state.clone(), "POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = oneshot_json(state, "POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["check_out_time"], first["check_out_time"]);
  }

  #[tokio::test]
  async fn check_out_of_unknown_visit_is_404() {
    let state = make_state(false).await;
    let (status, _) = oneshot_json(
      state,
      "POST",
      &format!("/api/visits/{}/check-out", uuid::Uuid::new_v4()),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Preregistrations ────────────────────────────────────────────────────────

  async fn announce(
    state: &TestState,
    employee_id: &str,
    name: &str,
    arrival: &str,
  ) -> (StatusCode, Value) {
    oneshot_json(
      state.clone(),
      "POST",
      "/api/preregistrations",
      Some(&basic("admin@example.com", "secret")),
      Some(json!({
        "visitor_name": name,
        "company_name": "Acme",
        "employee_id": employee_id,
        "expected_arrival": arrival,
      })),
    )
    .await
  }

  #[tokio::test]
  async fn announcing_a_guest_requires_admin() {
    let state = make_state(false).await;
    let host = create_employee(&state, "Sam", "Jones").await;
    let body = json!({
      "visitor_name": "Ana Lee",
      "employee_id": host["id"],
      "expected_arrival": "2026-09-01T09:00:00Z",
    });

    let (status, _) = oneshot_json(
      state.clone(),
      "POST",
      "/api/preregistrations",
      None,
      Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = oneshot_json(
      state,
      "POST",
      "/api/preregistrations",
      Some(&basic("staff@example.com", "secret")),
      Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn announcing_validates_name_and_host() {
    let state = make_state(false).await;
    let host = create_employee(&state, "Sam", "Jones").await;
    let host_id = host["id"].as_str().unwrap();

    let (status, _) =
      announce(&state, host_id, "   ", "2026-09-01T09:00:00Z").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = announce(
      &state,
      &uuid::Uuid::new_v4().to_string(),
      "Ana Lee",
      "2026-09-01T09:00:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn pending_list_is_public_and_ordered_by_arrival() {
    let state = make_state(false).await;
    let host = create_employee(&state, "Sam", "Jones").await;
    let host_id = host["id"].as_str().unwrap();

    announce(&state, host_id, "Bob Roy", "2026-09-01T11:00:00Z").await;
    announce(&state, host_id, "Ana Lee", "2026-09-01T09:00:00Z").await;

    let (status, pending) =
      oneshot_json(state, "GET", "/api/preregistrations", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0]["visitor_name"], "Ana Lee");
    assert_eq!(pending[1]["visitor_name"], "Bob Roy");
    assert_eq!(pending[0]["status"], "pending");
  }

  #[tokio::test]
  async fn one_tap_check_in_reuses_the_check_in_pipeline() {
    let (state, notifier) = make_state_with_notifier(false).await;
    let host = create_employee(&state, "Sam", "Jones").await;
    let host_id = host["id"].as_str().unwrap();

    let (_, created) =
      announce(&state, host_id, "Ana Lee", "2026-09-01T09:00:00Z").await;
    let prereg_id = created["id"].as_str().unwrap().to_string();

    let (status, body) = oneshot_json(
      state.clone(),
      "POST",
      &format!("/api/preregistrations/{prereg_id}/check-in"),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["log"]["visitor_name"], "Ana Lee");
    assert_eq!(body["log"]["company_name"], "Acme");
    assert_eq!(body["log"]["employee_name"], "Sam Jones");
    assert_eq!(body["notified"], true);
    assert_eq!(body["preregistration"]["status"], "checked_in");

    {
      let sent = notifier.sent.lock().unwrap();
      assert_eq!(sent.len(), 1);
      assert_eq!(sent[0].employee_email, "sam@example.com");
      assert_eq!(sent[0].visitor_names, ["Ana Lee"]);
    }

    // The guest is on the board and off the pending list.
    let (_, visits) =
      oneshot_json(state.clone(), "GET", "/api/visits", None, None).await;
    assert_eq!(visits.as_array().unwrap().len(), 1);
    let (_, pending) =
      oneshot_json(state.clone(), "GET", "/api/preregistrations", None, None)
        .await;
    assert!(pending.as_array().unwrap().is_empty());

    // A second tap must not log a second visit.
    let (status, _) = oneshot_json(
      state.clone(),
      "POST",
      &format!("/api/preregistrations/{prereg_id}/check-in"),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (_, visits) = oneshot_json(state, "GET", "/api/visits", None, None).await;
    assert_eq!(visits.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn one_tap_check_in_of_unknown_announcement_is_404() {
    let state = make_state(false).await;
    let (status, _) = oneshot_json(
      state,
      "POST",
      &format!("/api/preregistrations/{}/check-in", uuid::Uuid::new_v4()),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn one_tap_check_in_with_deleted_host_is_404_and_stays_pending() {
    let state = make_state(false).await;
    let host = create_employee(&state, "Sam", "Jones").await;
    let host_id = host["id"].as_str().unwrap().to_string();

    let (_, created) =
      announce(&state, &host_id, "Ana Lee", "2026-09-01T09:00:00Z").await;
    let prereg_id = created["id"].as_str().unwrap().to_string();

    let (status, _) = oneshot_json(
      state.clone(),
      "DELETE",
      &format!("/api/employees/{host_id}"),
      Some(&basic("admin@example.com", "secret")),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = oneshot_json(
      state.clone(),
      "POST",
      &format!("/api/preregistrations/{prereg_id}/check-in"),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Nothing was logged and the announcement is still waiting.
    let (_, visits) =
      oneshot_json(state.clone(), "GET", "/api/visits", None, None).await;
    assert!(visits.as_array().unwrap().is_empty());
    let (_, pending) =
      oneshot_json(state, "GET", "/api/preregistrations", None, None).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
  }
}
