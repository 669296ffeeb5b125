//! The hidden-admin tap gate.
//!
//! The welcome screen is one big tap target. A short burst of taps opens
//! the admin area; anything less navigates the guest forward once the
//! debounce window closes. The decision logic is an explicit state
//! machine fed with caller-supplied instants, so every transition is
//! testable without real time; [`drive`] is the async shell that owns the
//! timer.

use std::time::Duration;

use tokio::{
  sync::mpsc,
  time::{Instant, sleep_until},
};

/// Where a resolved tap burst sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
  Guest,
  Admin,
}

#[derive(Debug, Clone, Copy)]
enum TapState {
  Idle,
  Counting { taps: u32, deadline: Instant },
}

/// Debounced multi-tap detector.
#[derive(Debug, Clone)]
pub struct TapGate {
  threshold: u32,
  window:    Duration,
  state:     TapState,
}

impl Default for TapGate {
  /// Five taps within 300 ms, matching the kiosk's welcome screen.
  fn default() -> Self { Self::new(5, Duration::from_millis(300)) }
}

impl TapGate {
  pub fn new(threshold: u32, window: Duration) -> Self {
    Self {
      threshold: threshold.max(1),
      window,
      state: TapState::Idle,
    }
  }

  /// Register a tap. Every tap reschedules the guest-navigation deadline;
  /// reaching the threshold fires `Admin` and resets the counter.
  pub fn on_tap(&mut self, now: Instant) -> Option<NavTarget> {
    let taps = match self.state {
      TapState::Idle => 1,
      TapState::Counting { taps, .. } => taps + 1,
    };

    if taps >= self.threshold {
      self.state = TapState::Idle;
      return Some(NavTarget::Admin);
    }

    self.state = TapState::Counting {
      taps,
      deadline: now + self.window,
    };
    None
  }

  /// The pending guest-navigation deadline, if a burst is in progress.
  pub fn deadline(&self) -> Option<Instant> {
    match self.state {
      TapState::Idle => None,
      TapState::Counting { deadline, .. } => Some(deadline),
    }
  }

  /// Resolve an elapsed deadline. Fires `Guest` exactly once per burst;
  /// a deadline that has not elapsed yet (because a later tap moved it)
  /// is ignored.
  pub fn on_deadline(&mut self, now: Instant) -> Option<NavTarget> {
    match self.state {
      TapState::Counting { deadline, .. } if now >= deadline => {
        self.state = TapState::Idle;
        Some(NavTarget::Guest)
      }
      _ => None,
    }
  }

  #[cfg(test)]
  fn taps(&self) -> u32 {
    match self.state {
      TapState::Idle => 0,
      TapState::Counting { taps, .. } => taps,
    }
  }
}

/// Async shell: consume taps, emit navigation events.
///
/// Runs until the tap sender is dropped. The single-shot deferred task of
/// the original design becomes a `sleep_until` arm that is re-armed from
/// the state machine's deadline on every loop turn.
pub async fn drive(
  mut gate: TapGate,
  mut taps: mpsc::Receiver<()>,
  nav: mpsc::Sender<NavTarget>,
) {
  loop {
    let deadline = gate.deadline();
    let fired = tokio::select! {
      tap = taps.recv() => match tap {
        Some(()) => gate.on_tap(Instant::now()),
        None => return,
      },
      _ = async { sleep_until(deadline.unwrap_or_else(Instant::now)).await },
        if deadline.is_some() =>
      {
        gate.on_deadline(Instant::now())
      }
    };

    if let Some(target) = fired
      && nav.send(target).await.is_err()
    {
      return;
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
