//! One-tap check-in for preregistered guests.
//!
//! The kiosk shows the pending announcements; tapping one funnels the
//! guest through the regular [`CheckInWorkflow`] (same log, same host
//! notification), then flips the announcement to checked-in so it leaves
//! the pending list. The flip happens only after the visit is durably
//! logged; if it fails the guest stays on the list and the tap can be
//! retried without losing the record.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use lobby_core::{
  notify::Notifier,
  prereg::Preregistration,
  store::{DirectoryStore, PreregistrationStore, VisitorLogStore},
};

use crate::{
  check_in::{CheckInError, CheckInOutcome, CheckInWorkflow},
  form::GuestForm,
};

// ─── Outcome and error ───────────────────────────────────────────────────────

/// What a completed one-tap check-in produced.
#[derive(Debug, Clone)]
pub struct PreregOutcome {
  pub check_in:        CheckInOutcome,
  /// The announcement, now checked in.
  pub preregistration: Preregistration,
}

#[derive(Debug, Error)]
pub enum PreregCheckInError<D, P, V> {
  #[error("preregistration not found: {0}")]
  NotFound(Uuid),

  /// A second tap on a guest who is already checked in. No new visit is
  /// logged.
  #[error("guest already checked in: {0}")]
  AlreadyCheckedIn(Uuid),

  /// The announced host is no longer in the directory.
  #[error("host employee not found: {0}")]
  UnknownHost(Uuid),

  #[error("directory lookup failed: {0}")]
  Directory(#[source] D),

  #[error("preregistration store error: {0}")]
  Prereg(#[source] P),

  #[error(transparent)]
  CheckIn(#[from] CheckInError<V>),
}

/// [`PreregCheckInError`] specialised to a single backend type.
pub type PreregError<S> = PreregCheckInError<
  <S as DirectoryStore>::Error,
  <S as PreregistrationStore>::Error,
  <S as VisitorLogStore>::Error,
>;

// ─── Workflow ────────────────────────────────────────────────────────────────

pub struct PreregWorkflow<S, N> {
  store:    Arc<S>,
  check_in: CheckInWorkflow<S, N>,
}

impl<S, N> Clone for PreregWorkflow<S, N> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      check_in: self.check_in.clone(),
    }
  }
}

impl<S, N> PreregWorkflow<S, N>
where
  S: DirectoryStore + PreregistrationStore + VisitorLogStore,
  N: Notifier,
{
  /// `check_in` shares the regular workflow's busy flag, so a one-tap
  /// check-in and a manual form submit cannot run concurrently.
  pub fn new(store: Arc<S>, check_in: CheckInWorkflow<S, N>) -> Self {
    Self { store, check_in }
  }

  /// Check in an announced guest: look up the announcement and its host,
  /// run the regular check-in, then mark the announcement checked in.
  pub async fn check_in_guest(
    &self,
    id: Uuid,
  ) -> Result<PreregOutcome, PreregError<S>> {
    let prereg = self
      .store
      .lookup(id)
      .await
      .map_err(PreregCheckInError::Prereg)?
      .ok_or(PreregCheckInError::NotFound(id))?;

    if !prereg.is_pending() {
      return Err(PreregCheckInError::AlreadyCheckedIn(id));
    }

    let host = self
      .store
      .get(prereg.employee_id)
      .await
      .map_err(PreregCheckInError::Directory)?
      .ok_or(PreregCheckInError::UnknownHost(prereg.employee_id))?;

    let mut form = GuestForm::new();
    form.select_employee(host);
    if let Some(company) = &prereg.company_name {
      form.set_company(company.clone());
    }
    let row = form.guests()[0].id;
    form.set_guest_name(row, prereg.visitor_name.clone());

    let outcome = self.check_in.submit(&form).await?;

    let updated = self
      .store
      .mark_checked_in(id)
      .await
      .map_err(PreregCheckInError::Prereg)?;

    Ok(PreregOutcome {
      check_in:        outcome,
      preregistration: updated,
    })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
