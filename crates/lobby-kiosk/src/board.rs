//! Live visitor-board projection and employee search.
//!
//! UI state here is a pure function of the two live queries plus local
//! ephemeral input. Nothing is cached: every emission from either source
//! rebuilds the combined view from scratch.

use std::collections::HashMap;

use lobby_core::{
  employee::Employee,
  store::LiveQuery,
  visit::VisitorLog,
};
use tokio::sync::watch::error::RecvError;

/// Host name shown when a log references an employee the directory does
/// not (or no longer does) contain.
const UNKNOWN_HOST: &str = "Unknown";

/// One row of the visitor board: a log paired with its host's current
/// directory name.
#[derive(Debug, Clone)]
pub struct VisitorRow {
  pub log:       VisitorLog,
  pub host_name: String,
}

/// Pair every visitor log with its host's name via an id → name map,
/// defaulting to "Unknown" when the id is absent.
pub fn project(employees: &[Employee], logs: &[VisitorLog]) -> Vec<VisitorRow> {
  let names: HashMap<_, _> = employees
    .iter()
    .map(|e| (e.id, e.display_name()))
    .collect();

  logs
    .iter()
    .map(|log| VisitorRow {
      log:       log.clone(),
      host_name: names
        .get(&log.employee_id)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_HOST.to_owned()),
    })
    .collect()
}

/// Case-insensitive substring filter over first name, last name, or email.
/// An empty (or all-whitespace) query returns the unfiltered list.
pub fn filter_employees(employees: &[Employee], query: &str) -> Vec<Employee> {
  let query = query.trim().to_lowercase();
  if query.is_empty() {
    return employees.to_vec();
  }
  employees
    .iter()
    .filter(|e| {
      e.first_name.to_lowercase().contains(&query)
        || e.last_name.to_lowercase().contains(&query)
        || e.email.to_lowercase().contains(&query)
    })
    .cloned()
    .collect()
}

// ─── Combined feed ───────────────────────────────────────────────────────────

/// The two live queries behind a board screen, recombined on every
/// emission from either source.
///
/// Dropping the feed drops both receivers, which is the unsubscribe — the
/// teardown contract holds on all exit paths.
pub struct BoardFeed {
  employees: LiveQuery<Employee>,
  visits:    LiveQuery<VisitorLog>,
}

impl BoardFeed {
  pub fn new(employees: LiveQuery<Employee>, visits: LiveQuery<VisitorLog>) -> Self {
    Self { employees, visits }
  }

  /// Recompute the combined view from the latest snapshots.
  pub fn view(&mut self) -> Vec<VisitorRow> {
    let employees = self.employees.borrow_and_update().clone();
    let visits = self.visits.borrow_and_update().clone();
    project(&employees, &visits)
  }

  /// Wait until either source emits. Errors when the store is gone.
  pub async fn changed(&mut self) -> Result<(), RecvError> {
    tokio::select! {
      changed = self.employees.changed() => changed,
      changed = self.visits.changed() => changed,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
