//! SQLite backend for the Lobby stores.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Live queries are push-based:
//! every mutation re-runs the ordered queries and publishes the fresh
//! result sets on `watch` channels, so subscribers always hold a complete
//! current snapshot rather than a diff.

mod auth;
mod encode;
mod schema;
mod store;

pub mod error;

pub use auth::SqliteAuth;
pub use error::{Error, Result};
pub use store::SqliteStore;
