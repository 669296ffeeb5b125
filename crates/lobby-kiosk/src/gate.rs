//! The admin authorization gate.
//!
//! Guards the employee-directory management screens. On every change of
//! authentication identity the gate re-checks the `admin` claim with a
//! forced refresh and transitions through:
//! `NotAuthenticated → Checking → (Ready | PermissionDenied | Error)`.
//! While authorized, the gate tracks the live directory; on sign-out or
//! demotion the directory is cleared with the state change.

use std::sync::Arc;

use tokio::sync::watch;

use lobby_core::{
  auth::AuthProvider,
  employee::Employee,
  store::DirectoryStore,
};

/// What the directory-management screen is allowed to show.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryState {
  /// Nobody is signed in.
  NotAuthenticated,
  /// An identity appeared; the admin claim is being fetched.
  Checking,
  /// Authorized; carries the live employee list.
  Ready(Vec<Employee>),
  /// Signed in, but the token lacks the admin claim.
  PermissionDenied,
  /// The claims fetch itself failed. Distinct from a denial.
  Error(String),
}

impl DirectoryState {
  /// The employees this state permits showing. Everything but `Ready` is
  /// an empty list.
  pub fn employees(&self) -> &[Employee] {
    match self {
      Self::Ready(list) => list,
      _ => &[],
    }
  }
}

pub struct AdminGate<A, D> {
  auth:      Arc<A>,
  directory: Arc<D>,
}

impl<A, D> AdminGate<A, D>
where
  A: AuthProvider,
  D: DirectoryStore,
{
  pub fn new(auth: Arc<A>, directory: Arc<D>) -> Self {
    Self { auth, directory }
  }

  /// Run the gate, publishing state transitions on `state`.
  ///
  /// Returns when the auth provider or all state subscribers are gone.
  /// Subscriptions held here are dropped on every exit path.
  pub async fn run(self, state: watch::Sender<DirectoryState>) {
    let mut identities = self.auth.subscribe_identity();

    loop {
      let signed_in = identities.borrow_and_update().is_some();

      if !signed_in {
        state.send_replace(DirectoryState::NotAuthenticated);
        if identities.changed().await.is_err() {
          return;
        }
        continue;
      }

      state.send_replace(DirectoryState::Checking);
      let claims = self.auth.authorization_claims(true).await;

      let authorized = match claims {
        Ok(claims) if claims.admin => true,
        Ok(_) => {
          state.send_replace(DirectoryState::PermissionDenied);
          false
        }
        Err(e) => {
          tracing::warn!(error = %e, "admin claim refresh failed");
          state.send_replace(DirectoryState::Error(e.to_string()));
          false
        }
      };

      if !authorized {
        if identities.changed().await.is_err() {
          return;
        }
        continue;
      }

      // Authorized: mirror the live directory until the identity changes.
      let mut employees = self.directory.subscribe();
      loop {
        let list = employees.borrow_and_update().clone();
        state.send_replace(DirectoryState::Ready(list));

        tokio::select! {
          changed = identities.changed() => {
            if changed.is_err() {
              return;
            }
            break;
          }
          changed = employees.changed() => {
            if changed.is_err() {
              // Store went away; surface it rather than freezing.
              state.send_replace(DirectoryState::Error(
                "directory subscription closed".into(),
              ));
              if identities.changed().await.is_err() {
                return;
              }
              break;
            }
          }
        }
      }
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::Utc;
  use thiserror::Error;
  use tokio::sync::watch;
  use uuid::Uuid;

  use lobby_core::{
    auth::{Claims, Identity},
    employee::NewEmployee,
    store::LiveQuery,
  };

  use super::*;

  #[derive(Debug, Error)]
  #[error("auth backend offline")]
  struct AuthDown;

  /// Scriptable auth provider: identity pushed through a watch channel,
  /// claims answered from a fixed script.
  struct FakeAuth {
    identity: watch::Sender<Option<Identity>>,
    claims:   Mutex<Vec<Result<Claims, AuthDown>>>,
  }

  impl FakeAuth {
    fn new() -> Self {
      Self {
        identity: watch::Sender::new(None),
        claims:   Mutex::new(Vec::new()),
      }
    }

    fn push_claims(&self, result: Result<Claims, AuthDown>) {
      self.claims.lock().unwrap().push(result);
    }

    fn set_identity(&self, identity: Option<Identity>) {
      self.identity.send_replace(identity);
    }
  }

  impl AuthProvider for FakeAuth {
    type Error = AuthDown;

    async fn authenticate(
      &self,
      _email: &str,
      _password: &str,
    ) -> Result<Option<(Identity, Claims)>, AuthDown> {
      unimplemented!("not exercised by the gate")
    }

    async fn sign_in(
      &self,
      _email: &str,
      _password: &str,
    ) -> Result<Option<Identity>, AuthDown> {
      unimplemented!("not exercised by the gate")
    }

    fn sign_out(&self) -> bool {
      self.identity.send_replace(None).is_some()
    }

    fn identity(&self) -> Option<Identity> {
      self.identity.borrow().clone()
    }

    fn subscribe_identity(&self) -> watch::Receiver<Option<Identity>> {
      self.identity.subscribe()
    }

    async fn authorization_claims(&self, _force_refresh: bool) -> Result<Claims, AuthDown> {
      self
        .claims
        .lock()
        .unwrap()
        .pop()
        .unwrap_or(Ok(Claims { admin: false }))
    }
  }

  /// Directory fake: a watch channel and nothing else.
  struct FakeDirectory {
    employees: watch::Sender<Vec<Employee>>,
  }

  #[derive(Debug, Error)]
  #[error("directory offline")]
  struct DirDown;

  impl DirectoryStore for FakeDirectory {
    type Error = DirDown;

    fn subscribe(&self) -> LiveQuery<Employee> {
      self.employees.subscribe()
    }

    async fn get(&self, _id: Uuid) -> Result<Option<Employee>, DirDown> {
      unimplemented!("not exercised by the gate")
    }

    async fn add(&self, _input: NewEmployee) -> Result<Employee, DirDown> {
      unimplemented!("not exercised by the gate")
    }

    async fn update(&self, _id: Uuid, _input: NewEmployee) -> Result<Employee, DirDown> {
      unimplemented!("not exercised by the gate")
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DirDown> {
      unimplemented!("not exercised by the gate")
    }
  }

  fn sam() -> Employee {
    Employee {
      id:         Uuid::new_v4(),
      first_name: "Sam".into(),
      last_name:  "Jones".into(),
      email:      "sam@x.com".into(),
      title:      None,
      department: None,
      photo_url:  None,
      active:     true,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  fn identity() -> Identity {
    Identity {
      user_id: Uuid::new_v4(),
      email:   "admin@x.com".into(),
    }
  }

  async fn wait_for<F>(rx: &mut watch::Receiver<DirectoryState>, pred: F) -> DirectoryState
  where
    F: Fn(&DirectoryState) -> bool,
  {
    loop {
      {
        let current = rx.borrow_and_update();
        if pred(&current) {
          return current.clone();
        }
      }
      rx.changed().await.expect("gate alive");
    }
  }

  fn spawn_gate(
    auth: Arc<FakeAuth>,
    directory: Arc<FakeDirectory>,
  ) -> watch::Receiver<DirectoryState> {
    let state = watch::Sender::new(DirectoryState::NotAuthenticated);
    let rx = state.subscribe();
    tokio::spawn(AdminGate::new(auth, directory).run(state));
    rx
  }

  #[tokio::test]
  async fn admin_identity_reaches_ready_with_live_directory() {
    let auth = Arc::new(FakeAuth::new());
    let directory = Arc::new(FakeDirectory {
      employees: watch::Sender::new(vec![sam()]),
    });
    auth.push_claims(Ok(Claims { admin: true }));

    let mut rx = spawn_gate(Arc::clone(&auth), Arc::clone(&directory));
    auth.set_identity(Some(identity()));

    let state = wait_for(&mut rx, |s| matches!(s, DirectoryState::Ready(_))).await;
    assert_eq!(state.employees().len(), 1);

    // Directory mutation flows through while authorized.
    directory.employees.send_replace(Vec::new());
    let state =
      wait_for(&mut rx, |s| matches!(s, DirectoryState::Ready(l) if l.is_empty())).await;
    assert!(state.employees().is_empty());
  }

  #[tokio::test]
  async fn non_admin_identity_is_denied_with_empty_directory() {
    let auth = Arc::new(FakeAuth::new());
    let directory = Arc::new(FakeDirectory {
      // Directory has records; a denied viewer still sees none.
      employees: watch::Sender::new(vec![sam()]),
    });
    auth.push_claims(Ok(Claims { admin: false }));

    let mut rx = spawn_gate(Arc::clone(&auth), directory);
    auth.set_identity(Some(identity()));

    let state =
      wait_for(&mut rx, |s| matches!(s, DirectoryState::PermissionDenied)).await;
    assert!(state.employees().is_empty());
  }

  #[tokio::test]
  async fn claims_failure_is_an_error_state_not_a_denial() {
    let auth = Arc::new(FakeAuth::new());
    let directory = Arc::new(FakeDirectory {
      employees: watch::Sender::new(Vec::new()),
    });
    auth.push_claims(Err(AuthDown));

    let mut rx = spawn_gate(Arc::clone(&auth), directory);
    auth.set_identity(Some(identity()));

    let state = wait_for(&mut rx, |s| matches!(s, DirectoryState::Error(_))).await;
    assert!(matches!(state, DirectoryState::Error(_)));
  }

  #[tokio::test]
  async fn sign_out_returns_to_not_authenticated() {
    let auth = Arc::new(FakeAuth::new());
    let directory = Arc::new(FakeDirectory {
      employees: watch::Sender::new(Vec::new()),
    });
    auth.push_claims(Ok(Claims { admin: true }));

    let mut rx = spawn_gate(Arc::clone(&auth), directory);
    auth.set_identity(Some(identity()));
    wait_for(&mut rx, |s| matches!(s, DirectoryState::Ready(_))).await;

    auth.set_identity(None);
    wait_for(&mut rx, |s| matches!(s, DirectoryState::NotAuthenticated)).await;
  }
}
