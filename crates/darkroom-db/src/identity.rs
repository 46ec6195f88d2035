use rand::Rng;
use rand::distr::Alphanumeric;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use crate::{Database, StoreError, StoreResult};

const TOKEN_LEN: usize = 64;

impl Database {
    /// Resolve a username to its opaque identifier, creating the identity on
    /// first contact.
    ///
    /// Creation is guarded by the unique constraint on `username` with a
    /// conflict-then-reread policy: if another writer got there first, the
    /// insert is a no-op and the token it stored is returned.
    pub fn login(&self, username: &str) -> StoreResult<String> {
        self.with_conn_mut(|conn| {
            if let Some(token) = query_token(conn, username)? {
                return Ok(token);
            }

            let token = mint_token();
            conn.execute(
                "INSERT INTO users (username, token) VALUES (?1, ?2)
                 ON CONFLICT(username) DO NOTHING",
                params![username, token],
            )?;

            let stored = query_token(conn, username)?.ok_or(StoreError::NotFound)?;
            if stored == token {
                info!("Created identity for {}", username);
            }
            Ok(stored)
        })
    }

    pub fn user_exists(&self, username: &str) -> StoreResult<bool> {
        self.with_conn(|conn| user_exists(conn, username))
    }

    /// Resolve a bearer token to the owning username.
    ///
    /// Tokens are permanent and equal to the identity's opaque id; there is
    /// no expiry or revocation. A revocable-session model would replace this
    /// lookup alone.
    pub fn resolve_token(&self, token: &str) -> StoreResult<String> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT username FROM users WHERE token = ?1",
                [token],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StoreError::NotFound)
        })
    }

    /// Rename an identity. The opaque id is untouched, and every relation
    /// row referencing the old username (follows, bans, posts, likes,
    /// comments) is carried over by `ON UPDATE CASCADE` inside the same
    /// transaction.
    pub fn rename_user(&self, old: &str, new: &str) -> StoreResult<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if user_exists(&tx, new)? {
                return Err(StoreError::Conflict);
            }

            let updated = tx
                .execute(
                    "UPDATE users SET username = ?2 WHERE username = ?1",
                    params![old, new],
                )
                .map_err(|e| StoreError::from(e).constraint_as_conflict())?;
            if updated == 0 {
                return Err(StoreError::NotFound);
            }

            tx.commit()?;
            info!("Renamed {} -> {}", old, new);
            Ok(())
        })
    }
}

pub(crate) fn user_exists(conn: &Connection, username: &str) -> StoreResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
        [username],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn query_token(conn: &Connection, username: &str) -> StoreResult<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT token FROM users WHERE username = ?1",
            [username],
            |row| row.get(0),
        )
        .optional()?)
}

/// 64-character random alphanumeric identifier; doubles as the bearer token.
fn mint_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
