//! User registry database operations

use chrono::Utc;
use rusqlite::OptionalExtension;

use super::super::{sqlite, Database, StoreError, StoreResult};
use crate::auth::password;
use crate::models::User;

impl Database {
    /// Register a new user. Fails with `Conflict` if the username or email
    /// is already taken (exact, case-sensitive match).
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<User> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();

        let username_taken: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
            [username],
            |row| row.get(0),
        )?;
        if username_taken {
            return Err(StoreError::conflict("username"));
        }

        let email_taken: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
            [email],
            |row| row.get(0),
        )?;
        if email_taken {
            return Err(StoreError::conflict("email"));
        }

        conn.execute(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            [username, email, password_hash, &now.to_rfc3339()],
        )?;

        let id = conn.last_insert_rowid();

        Ok(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
        })
    }

    /// Look up a user by exact username or email and verify the password.
    /// Fails with `Unauthorized` on no match or password mismatch - the
    /// error does not reveal which of the two failed.
    pub fn authenticate_user(&self, username_or_email: &str, password: &str) -> StoreResult<User> {
        let conn = self.conn.lock().unwrap();

        let user = conn
            .query_row(
                "SELECT id, username, email, password_hash, created_at
                 FROM users WHERE username = ?1 OR email = ?1",
                [username_or_email],
                Self::row_to_user,
            )
            .optional()?;

        match user {
            Some(user) if password::verify_password(password, &user.password_hash) => Ok(user),
            _ => Err(StoreError::Unauthorized),
        }
    }

    pub(crate) fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let created_at_str: String = row.get(4)?;

        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: sqlite::parse_timestamp(4, &created_at_str)?,
        })
    }
}
