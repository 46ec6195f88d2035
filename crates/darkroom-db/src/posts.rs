use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::bans::ban_exists;
use crate::models::{CommentRow, PhotoRow};
use crate::{Database, StoreError, StoreResult};

const PHOTO_COLUMNS: &str = "p.id, p.author, p.created_at,
    (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments";

impl Database {
    // -- Photos --

    pub fn insert_photo(&self, id: &str, author: &str) -> StoreResult<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO posts (id, author) VALUES (?1, ?2)",
                params![id, author],
            )?;
            Ok(())
        })
    }

    pub fn get_photo(&self, id: &str) -> StoreResult<Option<PhotoRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {PHOTO_COLUMNS} FROM posts p WHERE p.id = ?1");
            Ok(conn
                .query_row(&sql, [id], photo_from_row)
                .optional()?)
        })
    }

    pub fn photo_author(&self, id: &str) -> StoreResult<Option<String>> {
        self.with_conn(|conn| photo_author(conn, id))
    }

    /// Delete a photo row. Likes and comments on it go via `ON DELETE
    /// CASCADE`. The caller is responsible for the blob on disk.
    pub fn delete_photo(&self, id: &str) -> StoreResult<()> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    /// All photos by one author, newest first.
    pub fn list_photos_by(&self, author: &str) -> StoreResult<Vec<PhotoRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {PHOTO_COLUMNS} FROM posts p WHERE p.author = ?1
                 ORDER BY p.created_at DESC, p.rowid DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([author], photo_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Photos posted by the users `username` follows, newest first.
    pub fn stream_for(&self, username: &str, limit: u32) -> StoreResult<Vec<PhotoRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {PHOTO_COLUMNS} FROM posts p
                 JOIN follows f ON f.followed = p.author
                 WHERE f.follower = ?1
                 ORDER BY p.created_at DESC, p.rowid DESC
                 LIMIT ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![username, limit], photo_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Likes --

    /// Like a photo. Idempotent; blocked pairs are rejected inside the same
    /// transaction that would insert the row.
    pub fn like_photo(&self, post_id: &str, liker: &str) -> StoreResult<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let author = photo_author(&tx, post_id)?.ok_or(StoreError::NotFound)?;
            if author != liker && ban_exists(&tx, liker, &author)? {
                return Err(StoreError::Blocked);
            }

            tx.execute(
                "INSERT INTO likes (post_id, liker) VALUES (?1, ?2)
                 ON CONFLICT DO NOTHING",
                params![post_id, liker],
            )?;

            tx.commit()?;
            Ok(())
        })
    }

    /// Remove a like. Deleting an absent like is not an error.
    pub fn unlike_photo(&self, post_id: &str, liker: &str) -> StoreResult<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM likes WHERE post_id = ?1 AND liker = ?2",
                params![post_id, liker],
            )?;
            Ok(())
        })
    }

    /// Users who liked a photo, most recent first.
    pub fn list_likes(&self, post_id: &str) -> StoreResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT liker FROM likes WHERE post_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt
                .query_map([post_id], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Comments --

    /// Insert a comment and return the stored row (the store assigns
    /// `created_at`).
    pub fn add_comment(
        &self,
        id: &str,
        post_id: &str,
        author: &str,
        body: &str,
    ) -> StoreResult<CommentRow> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let owner = photo_author(&tx, post_id)?.ok_or(StoreError::NotFound)?;
            if owner != author && ban_exists(&tx, author, &owner)? {
                return Err(StoreError::Blocked);
            }

            tx.execute(
                "INSERT INTO comments (id, post_id, author, body) VALUES (?1, ?2, ?3, ?4)",
                params![id, post_id, author, body],
            )?;
            let row = tx.query_row(
                "SELECT id, post_id, author, body, created_at FROM comments WHERE id = ?1",
                [id],
                comment_from_row,
            )?;

            tx.commit()?;
            Ok(row)
        })
    }

    pub fn get_comment(&self, id: &str) -> StoreResult<Option<CommentRow>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, post_id, author, body, created_at
                     FROM comments WHERE id = ?1",
                    [id],
                    comment_from_row,
                )
                .optional()?)
        })
    }

    pub fn delete_comment(&self, id: &str) -> StoreResult<()> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    /// Comments on a photo in conversation order (oldest first).
    pub fn list_comments(&self, post_id: &str) -> StoreResult<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, post_id, author, body, created_at
                 FROM comments WHERE post_id = ?1
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt
                .query_map([post_id], comment_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

}

fn photo_author(conn: &Connection, post_id: &str) -> StoreResult<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT author FROM posts WHERE id = ?1",
            [post_id],
            |row| row.get(0),
        )
        .optional()?)
}

fn photo_from_row(row: &Row<'_>) -> rusqlite::Result<PhotoRow> {
    Ok(PhotoRow {
        id: row.get(0)?,
        author: row.get(1)?,
        created_at: row.get(2)?,
        likes: row.get(3)?,
        comments: row.get(4)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        post_id: row.get(1)?,
        author: row.get(2)?,
        body: row.get(3)?,
        created_at: row.get(4)?,
    })
}
