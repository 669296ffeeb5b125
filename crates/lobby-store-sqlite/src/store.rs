//! [`SqliteStore`] — the SQLite implementation of [`DirectoryStore`],
//! [`VisitorLogStore`], and [`PreregistrationStore`].

use std::{path::Path, sync::Arc};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tokio::sync::watch;
use uuid::Uuid;

use lobby_core::{
  employee::{Employee, NewEmployee},
  error::ValidationError,
  prereg::{NewPreregistration, PreregStatus, Preregistration},
  store::{DirectoryStore, LiveQuery, PreregistrationStore, VisitorLogStore},
  visit::{NewVisit, VisitorLog},
};

use crate::{
  auth::SqliteAuth,
  encode::{
    RawEmployee, RawPreregistration, RawVisit, encode_dt, encode_status,
    encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

const EMPLOYEE_COLS: &str =
  "id, first_name, last_name, email, title, department, photo_url, active, \
   created_at, updated_at";

const VISIT_COLS: &str =
  "id, visitor_name, company_name, purpose, employee_id, employee_name, \
   check_in_time, check_out_time, checked_out";

fn employee_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEmployee> {
  Ok(RawEmployee {
    id:         row.get(0)?,
    first_name: row.get(1)?,
    last_name:  row.get(2)?,
    email:      row.get(3)?,
    title:      row.get(4)?,
    department: row.get(5)?,
    photo_url:  row.get(6)?,
    active:     row.get(7)?,
    created_at: row.get(8)?,
    updated_at: row.get(9)?,
  })
}

fn visit_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawVisit> {
  Ok(RawVisit {
    id:             row.get(0)?,
    visitor_name:   row.get(1)?,
    company_name:   row.get(2)?,
    purpose:        row.get(3)?,
    employee_id:    row.get(4)?,
    employee_name:  row.get(5)?,
    check_in_time:  row.get(6)?,
    check_out_time: row.get(7)?,
    checked_out:    row.get(8)?,
  })
}

const PREREG_COLS: &str =
  "id, visitor_name, company_name, employee_id, expected_arrival, status";

fn prereg_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPreregistration> {
  Ok(RawPreregistration {
    id:               row.get(0)?,
    visitor_name:     row.get(1)?,
    company_name:     row.get(2)?,
    employee_id:      row.get(3)?,
    expected_arrival: row.get(4)?,
    status:           row.get(5)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Senders behind the live queries. Shared by every clone of the store so a
/// mutation through any handle wakes every subscriber.
struct Feeds {
  directory:  watch::Sender<Vec<Employee>>,
  all_visits: watch::Sender<Vec<VisitorLog>>,
  checked_in: watch::Sender<Vec<VisitorLog>>,
  pending:    watch::Sender<Vec<Preregistration>>,
}

/// A Lobby store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection and live-query channels are
/// reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  feeds: Arc<Feeds>,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation, and
  /// prime the live queries with the current table contents.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::with_connection(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::with_connection(conn).await
  }

  async fn with_connection(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let store = Self {
      conn,
      feeds: Arc::new(Feeds {
        directory:  watch::Sender::new(Vec::new()),
        all_visits: watch::Sender::new(Vec::new()),
        checked_in: watch::Sender::new(Vec::new()),
        pending:    watch::Sender::new(Vec::new()),
      }),
    };
    store.init_schema().await?;
    store.publish_directory().await?;
    store.publish_visits().await?;
    store.publish_pending().await?;
    Ok(store)
  }

  /// An [`lobby_core::auth::AuthProvider`] sharing this store's database.
  pub fn auth(&self) -> SqliteAuth { SqliteAuth::new(self.conn.clone()) }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Live-query plumbing ───────────────────────────────────────────────────

  async fn load_directory(&self) -> Result<Vec<Employee>> {
    let raws: Vec<RawEmployee> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EMPLOYEE_COLS} FROM employees
           ORDER BY first_name COLLATE NOCASE, last_name COLLATE NOCASE"
        ))?;
        let rows = stmt
          .query_map([], employee_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawEmployee::into_employee).collect()
  }

  async fn load_visits(&self, checked_in_only: bool) -> Result<Vec<VisitorLog>> {
    let raws: Vec<RawVisit> = self
      .conn
      .call(move |conn| {
        let sql = if checked_in_only {
          format!(
            "SELECT {VISIT_COLS} FROM visitor_logs
             WHERE checked_out = 0 ORDER BY check_in_time ASC"
          )
        } else {
          format!(
            "SELECT {VISIT_COLS} FROM visitor_logs
             ORDER BY check_in_time DESC"
          )
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], visit_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawVisit::into_visit).collect()
  }

  /// Re-run the directory query and push the snapshot to subscribers.
  async fn publish_directory(&self) -> Result<()> {
    let list = self.load_directory().await?;
    self.feeds.directory.send_replace(list);
    Ok(())
  }

  /// Re-run both visit queries and push the snapshots to subscribers.
  async fn publish_visits(&self) -> Result<()> {
    let all = self.load_visits(false).await?;
    let current = self.load_visits(true).await?;
    self.feeds.all_visits.send_replace(all);
    self.feeds.checked_in.send_replace(current);
    Ok(())
  }

  async fn load_pending(&self) -> Result<Vec<Preregistration>> {
    let raws: Vec<RawPreregistration> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PREREG_COLS} FROM preregistrations
           WHERE status = 'pending' ORDER BY expected_arrival ASC"
        ))?;
        let rows = stmt
          .query_map([], prereg_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws
      .into_iter()
      .map(RawPreregistration::into_preregistration)
      .collect()
  }

  /// Re-run the pending-preregistrations query and push the snapshot.
  async fn publish_pending(&self) -> Result<()> {
    let list = self.load_pending().await?;
    self.feeds.pending.send_replace(list);
    Ok(())
  }
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = Error;

  fn subscribe(&self) -> LiveQuery<Employee> {
    self.feeds.directory.subscribe()
  }

  async fn get(&self, id: Uuid) -> Result<Option<Employee>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawEmployee> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {EMPLOYEE_COLS} FROM employees WHERE id = ?1"),
              rusqlite::params![id_str],
              employee_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawEmployee::into_employee).transpose()
  }

  async fn add(&self, input: NewEmployee) -> Result<Employee> {
    input.validate()?;

    let now = Utc::now();
    let employee = Employee {
      id:         Uuid::new_v4(),
      first_name: input.first_name,
      last_name:  input.last_name,
      email:      input.email,
      title:      input.title,
      department: input.department,
      photo_url:  input.photo_url,
      active:     input.active,
      created_at: now,
      updated_at: now,
    };

    let e = employee.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO employees (
             id, first_name, last_name, email, title, department,
             photo_url, active, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            encode_uuid(e.id),
            e.first_name,
            e.last_name,
            e.email,
            e.title,
            e.department,
            e.photo_url,
            e.active,
            encode_dt(e.created_at),
            encode_dt(e.updated_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    self.publish_directory().await?;
    Ok(employee)
  }

  async fn update(&self, id: Uuid, input: NewEmployee) -> Result<Employee> {
    input.validate()?;

    let existing = self
      .get(id)
      .await?
      .ok_or(Error::EmployeeNotFound(id))?;

    let employee = Employee {
      id,
      first_name: input.first_name,
      last_name:  input.last_name,
      email:      input.email,
      title:      input.title,
      department: input.department,
      photo_url:  input.photo_url,
      active:     input.active,
      created_at: existing.created_at,
      updated_at: Utc::now(),
    };

    let e = employee.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE employees SET
             first_name = ?2, last_name = ?3, email = ?4, title = ?5,
             department = ?6, photo_url = ?7, active = ?8, updated_at = ?9
           WHERE id = ?1",
          rusqlite::params![
            encode_uuid(e.id),
            e.first_name,
            e.last_name,
            e.email,
            e.title,
            e.department,
            e.photo_url,
            e.active,
            encode_dt(e.updated_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    self.publish_directory().await?;
    Ok(employee)
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let affected: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM employees WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::EmployeeNotFound(id));
    }

    self.publish_directory().await?;
    Ok(())
  }
}

// ─── VisitorLogStore impl ────────────────────────────────────────────────────

impl VisitorLogStore for SqliteStore {
  type Error = Error;

  fn subscribe_all(&self) -> LiveQuery<VisitorLog> {
    self.feeds.all_visits.subscribe()
  }

  fn subscribe_checked_in(&self) -> LiveQuery<VisitorLog> {
    self.feeds.checked_in.subscribe()
  }

  async fn find(&self, id: Uuid) -> Result<Option<VisitorLog>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawVisit> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {VISIT_COLS} FROM visitor_logs WHERE id = ?1"),
              rusqlite::params![id_str],
              visit_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawVisit::into_visit).transpose()
  }

  async fn check_in(&self, input: NewVisit) -> Result<VisitorLog> {
    if input.visitor_name.trim().is_empty() {
      return Err(ValidationError::BlankGuestName.into());
    }

    let visit = VisitorLog {
      id:             Uuid::new_v4(),
      visitor_name:   input.visitor_name,
      company_name:   input.company_name,
      purpose:        input.purpose,
      employee_id:    input.employee_id,
      employee_name:  input.employee_name,
      check_in_time:  Utc::now(),
      check_out_time: None,
      checked_out:    false,
    };

    let v = visit.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO visitor_logs (
             id, visitor_name, company_name, purpose, employee_id,
             employee_name, check_in_time, check_out_time, checked_out
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, 0)",
          rusqlite::params![
            encode_uuid(v.id),
            v.visitor_name,
            v.company_name,
            v.purpose,
            encode_uuid(v.employee_id),
            v.employee_name,
            encode_dt(v.check_in_time),
          ],
        )?;
        Ok(())
      })
      .await?;

    self.publish_visits().await?;
    Ok(visit)
  }

  async fn check_out(&self, id: Uuid) -> Result<VisitorLog> {
    let mut visit = self
      .find(id)
      .await?
      .ok_or(Error::VisitNotFound(id))?;

    // Idempotent: a second check-out must not move the timestamp.
    if visit.checked_out {
      return Ok(visit);
    }

    let at = Utc::now();
    let id_str = encode_uuid(id);
    let at_str = encode_dt(at);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE visitor_logs
           SET check_out_time = ?2, checked_out = 1
           WHERE id = ?1",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    visit.check_out_time = Some(at);
    visit.checked_out = true;

    self.publish_visits().await?;
    Ok(visit)
  }
}

// ─── PreregistrationStore impl ───────────────────────────────────────────────

impl PreregistrationStore for SqliteStore {
  type Error = Error;

  fn subscribe_pending(&self) -> LiveQuery<Preregistration> {
    self.feeds.pending.subscribe()
  }

  async fn lookup(&self, id: Uuid) -> Result<Option<Preregistration>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawPreregistration> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PREREG_COLS} FROM preregistrations WHERE id = ?1"
              ),
              rusqlite::params![id_str],
              prereg_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawPreregistration::into_preregistration).transpose()
  }

  async fn register(&self, input: NewPreregistration) -> Result<Preregistration> {
    if input.visitor_name.trim().is_empty() {
      return Err(ValidationError::BlankGuestName.into());
    }

    let prereg = Preregistration {
      id:               Uuid::new_v4(),
      visitor_name:     input.visitor_name,
      company_name:     input.company_name,
      employee_id:      input.employee_id,
      expected_arrival: input.expected_arrival,
      status:           PreregStatus::Pending,
    };

    let p = prereg.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO preregistrations (
             id, visitor_name, company_name, employee_id,
             expected_arrival, status
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            encode_uuid(p.id),
            p.visitor_name,
            p.company_name,
            encode_uuid(p.employee_id),
            encode_dt(p.expected_arrival),
            encode_status(p.status),
          ],
        )?;
        Ok(())
      })
      .await?;

    self.publish_pending().await?;
    Ok(prereg)
  }

  async fn mark_checked_in(&self, id: Uuid) -> Result<Preregistration> {
    let mut prereg = self
      .lookup(id)
      .await?
      .ok_or(Error::PreregNotFound(id))?;

    if prereg.status == PreregStatus::CheckedIn {
      return Ok(prereg);
    }

    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE preregistrations SET status = 'checked_in' WHERE id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;

    prereg.status = PreregStatus::CheckedIn;

    self.publish_pending().await?;
    Ok(prereg)
  }
}
