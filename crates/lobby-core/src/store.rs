//! The `DirectoryStore` and `VisitorLogStore` traits.
//!
//! Implemented by storage backends (e.g. `lobby-store-sqlite`). Higher
//! layers (`lobby-kiosk`, `lobby-server`) depend on these abstractions,
//! not on any concrete backend.
//!
//! Both stores are *live*: alongside point reads they expose standing
//! subscriptions that push the full, freshly-ordered result set after every
//! mutation. A subscription is just a [`watch::Receiver`]; dropping it is
//! the unsubscribe, so teardown runs on every exit path, including error.

use std::future::Future;

use tokio::sync::watch;
use uuid::Uuid;

use crate::{
  employee::{Employee, NewEmployee},
  prereg::{NewPreregistration, Preregistration},
  visit::{NewVisit, VisitorLog},
};

/// A live query handle: holds the latest result set and wakes on change.
pub type LiveQuery<T> = watch::Receiver<Vec<T>>;

// ─── Directory ───────────────────────────────────────────────────────────────

/// The employee directory.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Live list of all employees, ordered by first name then last name.
  fn subscribe(&self) -> LiveQuery<Employee>;

  /// Retrieve an employee by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send + '_;

  /// Validate and persist a new employee. The id and timestamps are
  /// assigned by the store.
  fn add(
    &self,
    input: NewEmployee,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  /// Validate and overwrite every mutable field of an existing employee.
  /// `created_at` is preserved; `updated_at` is reassigned.
  fn update(
    &self,
    id: Uuid,
    input: NewEmployee,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  /// Remove an employee entirely. There is no soft-delete or tombstone.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Visitor log ─────────────────────────────────────────────────────────────

/// The visitor log: check-in events and their check-out updates.
pub trait VisitorLogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Live list of every visit, newest check-in first.
  fn subscribe_all(&self) -> LiveQuery<VisitorLog>;

  /// Live list of visitors currently on-site (not checked out), oldest
  /// check-in first.
  fn subscribe_checked_in(&self) -> LiveQuery<VisitorLog>;

  /// Retrieve a visit by id. Returns `None` if not found.
  fn find(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<VisitorLog>, Self::Error>> + Send + '_;

  /// Persist a new check-in. `check_in_time` is assigned by the store;
  /// the record starts with `checked_out == false`.
  fn check_in(
    &self,
    input: NewVisit,
  ) -> impl Future<Output = Result<VisitorLog, Self::Error>> + Send + '_;

  /// Mark a visit checked out, setting `check_out_time` (store clock) and
  /// `checked_out` together.
  ///
  /// Idempotent: checking out an already-checked-out visit returns the
  /// record unchanged and does not move its timestamp.
  fn check_out(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<VisitorLog, Self::Error>> + Send + '_;
}

// ─── Preregistrations ────────────────────────────────────────────────────────

/// Guests announced ahead of their visit.
///
/// Method names stay disjoint from the other store traits for the same
/// reason `VisitorLogStore` avoids `get`/`add`.
pub trait PreregistrationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Live list of guests still expected, earliest expected arrival first.
  fn subscribe_pending(&self) -> LiveQuery<Preregistration>;

  /// Retrieve a preregistration by id. Returns `None` if not found.
  fn lookup(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Preregistration>, Self::Error>> + Send + '_;

  /// Validate and persist a new announcement. The id is assigned by the
  /// store and the record starts pending.
  fn register(
    &self,
    input: NewPreregistration,
  ) -> impl Future<Output = Result<Preregistration, Self::Error>> + Send + '_;

  /// Flip a preregistration to checked-in, removing it from the pending
  /// list. Idempotent: an already-checked-in record is returned unchanged.
  fn mark_checked_in(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Preregistration, Self::Error>> + Send + '_;
}
