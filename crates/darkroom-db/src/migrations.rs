use rusqlite::Connection;
use tracing::info;

use crate::StoreResult;

pub fn run(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                username    TEXT PRIMARY KEY,
                token       TEXT NOT NULL UNIQUE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE follows (
                follower    TEXT NOT NULL REFERENCES users(username)
                                ON UPDATE CASCADE ON DELETE CASCADE,
                followed    TEXT NOT NULL REFERENCES users(username)
                                ON UPDATE CASCADE ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (follower, followed),
                CHECK (follower <> followed)
            );

            CREATE INDEX idx_follows_followed
                ON follows(followed, created_at);

            CREATE TABLE bans (
                banner      TEXT NOT NULL REFERENCES users(username)
                                ON UPDATE CASCADE ON DELETE CASCADE,
                banned      TEXT NOT NULL REFERENCES users(username)
                                ON UPDATE CASCADE ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (banner, banned),
                CHECK (banner <> banned)
            );

            CREATE INDEX idx_bans_banned
                ON bans(banned);

            CREATE TABLE posts (
                id          TEXT PRIMARY KEY,
                author      TEXT NOT NULL REFERENCES users(username)
                                ON UPDATE CASCADE ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_posts_author
                ON posts(author, created_at);

            CREATE TABLE likes (
                post_id     TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                liker       TEXT NOT NULL REFERENCES users(username)
                                ON UPDATE CASCADE ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (post_id, liker)
            );

            CREATE TABLE comments (
                id          TEXT PRIMARY KEY,
                post_id     TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                author      TEXT NOT NULL REFERENCES users(username)
                                ON UPDATE CASCADE ON DELETE CASCADE,
                body        TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_comments_post
                ON comments(post_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    Ok(())
}
