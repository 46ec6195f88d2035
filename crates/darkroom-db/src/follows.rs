use rusqlite::params;

use crate::bans::ban_exists;
use crate::identity::user_exists;
use crate::{Database, StoreError, StoreResult};

impl Database {
    /// Insert a follow edge. Idempotent: following someone twice is a no-op.
    ///
    /// The ban check runs inside the same transaction as the insert, so a
    /// follow can never slip in next to a committed ban.
    pub fn follow(&self, follower: &str, followed: &str) -> StoreResult<()> {
        if follower == followed {
            return Err(StoreError::InvalidArgument("cannot follow yourself"));
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if !user_exists(&tx, followed)? {
                return Err(StoreError::NotFound);
            }
            if ban_exists(&tx, follower, followed)? {
                return Err(StoreError::Blocked);
            }

            tx.execute(
                "INSERT INTO follows (follower, followed) VALUES (?1, ?2)
                 ON CONFLICT DO NOTHING",
                params![follower, followed],
            )?;

            tx.commit()?;
            Ok(())
        })
    }

    /// Remove a follow edge. Deleting an absent edge is not an error.
    pub fn unfollow(&self, follower: &str, followed: &str) -> StoreResult<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM follows WHERE follower = ?1 AND followed = ?2",
                params![follower, followed],
            )?;
            Ok(())
        })
    }

    /// Users that `username` follows, most recent edge first.
    pub fn list_following(&self, username: &str) -> StoreResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT followed FROM follows WHERE follower = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt
                .query_map([username], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Users that follow `username`, most recent edge first.
    pub fn list_followers(&self, username: &str) -> StoreResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT follower FROM follows WHERE followed = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt
                .query_map([username], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_followers(&self, username: &str) -> StoreResult<u64> {
        self.with_conn(|conn| {
            let n: u64 = conn.query_row(
                "SELECT COUNT(*) FROM follows WHERE followed = ?1",
                [username],
                |row| row.get(0),
            )?;
            Ok(n)
        })
    }

    pub fn count_following(&self, username: &str) -> StoreResult<u64> {
        self.with_conn(|conn| {
            let n: u64 = conn.query_row(
                "SELECT COUNT(*) FROM follows WHERE follower = ?1",
                [username],
                |row| row.get(0),
            )?;
            Ok(n)
        })
    }
}
