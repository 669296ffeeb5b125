//! [`SqliteAuth`] — the SQLite-backed [`AuthProvider`].
//!
//! Accounts live in the `users` table with argon2 PHC password hashes. The
//! kiosk holds at most one signed-in identity at a time; changes are
//! published on a `watch` channel so the admin gate reacts without polling.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rusqlite::OptionalExtension as _;
use tokio::sync::watch;
use uuid::Uuid;

use lobby_core::auth::{AuthProvider, Claims, Identity};

use crate::{encode::encode_uuid, Error, Result};

#[derive(Clone)]
pub struct SqliteAuth {
  conn:     tokio_rusqlite::Connection,
  identity: Arc<watch::Sender<Option<Identity>>>,
}

struct UserRow {
  user_id:       String,
  email:         String,
  password_hash: String,
  admin:         bool,
}

impl SqliteAuth {
  pub fn new(conn: tokio_rusqlite::Connection) -> Self {
    Self {
      conn,
      identity: Arc::new(watch::Sender::new(None)),
    }
  }

  /// Hash a password into an argon2 PHC string.
  pub fn hash_password(password: &str) -> Result<String> {
    use argon2::password_hash::SaltString;
    use rand_core::OsRng;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map(|h| h.to_string())
      .map_err(|e| Error::PasswordHash(e.to_string()))
  }

  /// Create an account. Used by the server's bootstrap CLI and by tests.
  pub async fn add_user(
    &self,
    email: &str,
    password: &str,
    admin: bool,
  ) -> Result<Identity> {
    let identity = Identity {
      user_id: Uuid::new_v4(),
      email:   email.to_owned(),
    };
    let hash = Self::hash_password(password)?;

    let id_str = encode_uuid(identity.user_id);
    let email_owned = identity.email.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, email, password_hash, admin)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, email_owned, hash, admin],
        )?;
        Ok(())
      })
      .await?;

    Ok(identity)
  }

  async fn user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
    let email = email.to_owned();
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, email, password_hash, admin
               FROM users WHERE email = ?1",
              rusqlite::params![email],
              |row| {
                Ok(UserRow {
                  user_id:       row.get(0)?,
                  email:         row.get(1)?,
                  password_hash: row.get(2)?,
                  admin:         row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }
}

impl AuthProvider for SqliteAuth {
  type Error = Error;

  async fn authenticate(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Option<(Identity, Claims)>> {
    let Some(user) = self.user_by_email(email).await? else {
      return Ok(None);
    };

    let parsed = PasswordHash::new(&user.password_hash)
      .map_err(|e| Error::PasswordHash(e.to_string()))?;

    if Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_err()
    {
      tracing::debug!(email, "sign-in rejected: bad credentials");
      return Ok(None);
    }

    let identity = Identity {
      user_id: crate::encode::decode_uuid(&user.user_id)?,
      email:   user.email,
    };
    Ok(Some((identity, Claims { admin: user.admin })))
  }

  async fn sign_in(&self, email: &str, password: &str) -> Result<Option<Identity>> {
    match self.authenticate(email, password).await? {
      Some((identity, _claims)) => {
        self.identity.send_replace(Some(identity.clone()));
        Ok(Some(identity))
      }
      None => Ok(None),
    }
  }

  fn sign_out(&self) -> bool {
    self.identity.send_replace(None).is_some()
  }

  fn identity(&self) -> Option<Identity> {
    self.identity.borrow().clone()
  }

  fn subscribe_identity(&self) -> watch::Receiver<Option<Identity>> {
    self.identity.subscribe()
  }

  async fn authorization_claims(&self, _force_refresh: bool) -> Result<Claims> {
    // There is no token cache here — every read is a fresh read, so
    // `force_refresh` has nothing extra to do.
    let identity = self.identity().ok_or(Error::NotAuthenticated)?;

    let id_str = encode_uuid(identity.user_id);
    let admin: Option<bool> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT admin FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    match admin {
      Some(admin) => Ok(Claims { admin }),
      None => Err(Error::IdentityRevoked),
    }
  }
}
