//! SQL schema for the Lobby SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS employees (
    id          TEXT PRIMARY KEY,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    email       TEXT NOT NULL,
    title       TEXT,
    department  TEXT,
    photo_url   TEXT,
    active      INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC; store-assigned
    updated_at  TEXT NOT NULL
);

-- One row per check-in event. employee_name is denormalized and there is
-- deliberately no foreign key on employee_id: logs must survive later
-- directory edits and deletions.
CREATE TABLE IF NOT EXISTS visitor_logs (
    id             TEXT PRIMARY KEY,
    visitor_name   TEXT NOT NULL,
    company_name   TEXT,
    purpose        TEXT,
    employee_id    TEXT NOT NULL,
    employee_name  TEXT NOT NULL,
    check_in_time  TEXT NOT NULL,  -- ISO 8601 UTC; store-assigned
    check_out_time TEXT,
    checked_out    INTEGER NOT NULL DEFAULT 0,
    CHECK ((checked_out = 0) = (check_out_time IS NULL))
);

-- Guests announced ahead of arrival. Checked-in rows are kept, not
-- deleted, so the record of announced visits survives. No foreign key on
-- employee_id for the same reason as visitor_logs.
CREATE TABLE IF NOT EXISTS preregistrations (
    id               TEXT PRIMARY KEY,
    visitor_name     TEXT NOT NULL,
    company_name     TEXT,
    employee_id      TEXT NOT NULL,
    expected_arrival TEXT NOT NULL,  -- ISO 8601 UTC
    status           TEXT NOT NULL DEFAULT 'pending'
                     CHECK (status IN ('pending', 'checked_in'))
);

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    admin         INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS employees_name_idx    ON employees(first_name, last_name);
CREATE INDEX IF NOT EXISTS visits_checked_in_idx ON visitor_logs(checked_out, check_in_time);
CREATE INDEX IF NOT EXISTS prereg_pending_idx    ON preregistrations(status, expected_arrival);

PRAGMA user_version = 1;
";
