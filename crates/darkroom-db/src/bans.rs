use rusqlite::{Connection, params};
use tracing::info;

use crate::identity::user_exists;
use crate::{Database, StoreError, StoreResult};

impl Database {
    /// Apply a ban and sever every derived relationship between the pair, in
    /// one transaction:
    ///
    /// 1. insert the ban edge (a repeat ban by the same banner is a no-op),
    /// 2. drop follow edges in both directions,
    /// 3. drop likes crossing the pair in both directions,
    /// 4. drop comments crossing the pair in both directions.
    ///
    /// Any step failing rolls the whole unit back; a crash mid-cascade
    /// cannot leave a stale follow or like next to an active ban.
    pub fn ban(&self, banner: &str, banned: &str) -> StoreResult<()> {
        if banner == banned {
            return Err(StoreError::InvalidArgument("cannot ban yourself"));
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if !user_exists(&tx, banned)? {
                return Err(StoreError::NotFound);
            }

            tx.execute(
                "INSERT INTO bans (banner, banned) VALUES (?1, ?2)
                 ON CONFLICT DO NOTHING",
                params![banner, banned],
            )?;

            let follows_cut = tx.execute(
                "DELETE FROM follows
                 WHERE (follower = ?1 AND followed = ?2)
                    OR (follower = ?2 AND followed = ?1)",
                params![banner, banned],
            )?;

            let likes_cut = tx.execute(
                "DELETE FROM likes
                 WHERE (liker = ?1 AND post_id IN (SELECT id FROM posts WHERE author = ?2))
                    OR (liker = ?2 AND post_id IN (SELECT id FROM posts WHERE author = ?1))",
                params![banner, banned],
            )?;

            let comments_cut = tx.execute(
                "DELETE FROM comments
                 WHERE (author = ?1 AND post_id IN (SELECT id FROM posts WHERE author = ?2))
                    OR (author = ?2 AND post_id IN (SELECT id FROM posts WHERE author = ?1))",
                params![banner, banned],
            )?;

            tx.commit()?;
            info!(
                "{} banned {} (cut {} follows, {} likes, {} comments)",
                banner, banned, follows_cut, likes_cut, comments_cut
            );
            Ok(())
        })
    }

    /// Lift a ban. Removes only the (banner, banned) edge; relationships
    /// severed by the ban cascade stay gone. Idempotent.
    pub fn unban(&self, banner: &str, banned: &str) -> StoreResult<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM bans WHERE banner = ?1 AND banned = ?2",
                params![banner, banned],
            )?;
            Ok(())
        })
    }

    /// A ban edge in either direction blocks the pair.
    pub fn is_blocked(&self, a: &str, b: &str) -> StoreResult<bool> {
        self.with_conn(|conn| ban_exists(conn, a, b))
    }

    /// Users banned by `banner`, most recent ban first.
    pub fn list_banned(&self, banner: &str) -> StoreResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT banned FROM bans WHERE banner = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt
                .query_map([banner], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

pub(crate) fn ban_exists(conn: &Connection, a: &str, b: &str) -> StoreResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM bans
            WHERE (banner = ?1 AND banned = ?2)
               OR (banner = ?2 AND banned = ?1)
         )",
        params![a, b],
        |row| row.get(0),
    )?;
    Ok(exists)
}
