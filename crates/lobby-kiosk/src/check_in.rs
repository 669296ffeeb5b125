//! The check-in workflow: turn a validated guest form into a durable
//! visitor log and notify the host.
//!
//! Ordering policy: the visit is logged unconditionally once validation
//! passes; notification is attempted afterwards, best-effort. A failed
//! notification surfaces as a warning on the outcome — the physical
//! visitor record is the safety-critical artifact, the email is not.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use thiserror::Error;

use lobby_core::{
  error::ValidationError,
  notify::{CheckInNotice, Notifier},
  store::VisitorLogStore,
  visit::{NewVisit, VisitorLog},
};

use crate::form::GuestForm;

// ─── Outcome and error ───────────────────────────────────────────────────────

/// What a completed check-in produced.
#[derive(Debug, Clone)]
pub struct CheckInOutcome {
  pub log: VisitorLog,
  /// Whether the host notification was delivered.
  pub notified: bool,
  /// Set when the visit was recorded but the notification leg failed.
  pub warning: Option<String>,
}

#[derive(Debug, Error)]
pub enum CheckInError<S> {
  /// A submit is already in flight; the duplicate was rejected.
  #[error("a check-in is already in progress")]
  Busy,

  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// The visitor-log write failed; nothing was recorded and the form
  /// should stay populated for a retry.
  #[error("failed to record visit: {0}")]
  Store(#[source] S),
}

// ─── Workflow ────────────────────────────────────────────────────────────────

/// Clears the busy flag on every exit path.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

pub struct CheckInWorkflow<V, N> {
  visits:   Arc<V>,
  notifier: Arc<N>,
  busy:     Arc<AtomicBool>,
}

impl<V, N> Clone for CheckInWorkflow<V, N> {
  fn clone(&self) -> Self {
    Self {
      visits:   Arc::clone(&self.visits),
      notifier: Arc::clone(&self.notifier),
      busy:     Arc::clone(&self.busy),
    }
  }
}

impl<V, N> CheckInWorkflow<V, N>
where
  V: VisitorLogStore,
  N: Notifier,
{
  pub fn new(visits: Arc<V>, notifier: Arc<N>) -> Self {
    Self {
      visits,
      notifier,
      busy: Arc::new(AtomicBool::new(false)),
    }
  }

  /// Whether a submit is currently in flight. Front ends disable the
  /// submit control while this is true.
  pub fn is_busy(&self) -> bool {
    self.busy.load(Ordering::Acquire)
  }

  /// Run the full check-in: validate, persist, notify.
  pub async fn submit(
    &self,
    form: &GuestForm,
  ) -> Result<CheckInOutcome, CheckInError<V::Error>> {
    // Re-entrancy guard: a second submit while one is in flight would
    // double-book the visit.
    if self
      .busy
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_err()
    {
      return Err(CheckInError::Busy);
    }
    let _guard = BusyGuard(Arc::clone(&self.busy));

    let input = form.to_input()?;

    let notice = CheckInNotice {
      employee_email:  input.employee.email.clone(),
      visitor_company: input.company.clone(),
      visitor_names:   input.guest_names.clone(),
    };

    let log = self
      .visits
      .check_in(NewVisit {
        visitor_name:  input.guest_names.join(", "),
        company_name:  (!input.company.is_empty()).then(|| input.company.clone()),
        purpose:       (!input.purpose.is_empty()).then(|| input.purpose.clone()),
        employee_id:   input.employee.id,
        employee_name: input.employee.display_name(),
      })
      .await
      .map_err(CheckInError::Store)?;

    match self.notifier.notify_check_in(&notice).await {
      Ok(()) => Ok(CheckInOutcome {
        log,
        notified: true,
        warning: None,
      }),
      Err(e) => {
        tracing::warn!(error = %e, "visit recorded but host notification failed");
        Ok(CheckInOutcome {
          log,
          notified: false,
          warning: Some(format!("host notification failed: {e}")),
        })
      }
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
