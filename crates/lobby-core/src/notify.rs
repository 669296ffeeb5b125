//! The host-notification contract.
//!
//! Check-in ends with a one-shot HTTP POST to a notification endpoint that
//! emails the host. The endpoint's wire format is fixed (camelCase keys);
//! the transport lives behind the [`Notifier`] trait so workflows can be
//! tested without a network.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The payload posted to the notification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInNotice {
  pub employee_email: String,
  /// May be blank — company name is never required at check-in.
  pub visitor_company: String,
  pub visitor_names:   Vec<String>,
}

/// Why a notification attempt failed. Carried as plain data so this crate
/// stays free of any HTTP client dependency.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
  /// The endpoint answered with a non-2xx status.
  #[error("notification endpoint returned HTTP {0}")]
  Status(u16),

  /// The endpoint could not be reached at all.
  #[error("notification request failed: {0}")]
  Network(String),
}

/// Delivers check-in notices to the host-notification endpoint.
///
/// Delivery is best-effort from the check-in workflow's point of view: a
/// failure here never rolls back the visitor log.
pub trait Notifier: Send + Sync {
  fn notify_check_in(
    &self,
    notice: &CheckInNotice,
  ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
