//! HTTP delivery of check-in notices.
//!
//! Posts the notice as JSON to the configured endpoint, retrying a bounded
//! number of times with doubling backoff. The caller decides what a final
//! failure means; here it is only reported.

use std::time::Duration;

use lobby_core::notify::{CheckInNotice, Notifier, NotifyError};
use reqwest::Client;

const DEFAULT_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// [`Notifier`] backed by a real HTTP client.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpNotifier {
  client:          Client,
  endpoint:        String,
  attempts:        u32,
  initial_backoff: Duration,
}

impl HttpNotifier {
  pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      client,
      endpoint: endpoint.into(),
      attempts: DEFAULT_ATTEMPTS,
      initial_backoff: DEFAULT_BACKOFF,
    })
  }

  /// Override the retry schedule. `attempts` is clamped to at least one.
  pub fn with_retries(mut self, attempts: u32, initial_backoff: Duration) -> Self {
    self.attempts = attempts.max(1);
    self.initial_backoff = initial_backoff;
    self
  }

  async fn post_once(&self, notice: &CheckInNotice) -> Result<(), NotifyError> {
    let resp = self
      .client
      .post(&self.endpoint)
      .json(notice)
      .send()
      .await
      .map_err(|e| NotifyError::Network(e.to_string()))?;

    let status = resp.status();
    if status.is_success() {
      Ok(())
    } else {
      Err(NotifyError::Status(status.as_u16()))
    }
  }
}

impl Notifier for HttpNotifier {
  async fn notify_check_in(&self, notice: &CheckInNotice) -> Result<(), NotifyError> {
    let mut backoff = self.initial_backoff;
    let mut last = NotifyError::Network("no attempt made".into());

    for attempt in 1..=self.attempts {
      match self.post_once(notice).await {
        Ok(()) => return Ok(()),
        Err(e) => {
          tracing::warn!(
            attempt,
            attempts = self.attempts,
            error = %e,
            "check-in notification attempt failed"
          );
          last = e;
        }
      }

      if attempt < self.attempts {
        tokio::time::sleep(backoff).await;
        backoff *= 2;
      }
    }

    Err(last)
  }
}
