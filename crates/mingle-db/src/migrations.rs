use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id               TEXT PRIMARY KEY,
            name             TEXT NOT NULL,
            email            TEXT NOT NULL UNIQUE,
            password         TEXT NOT NULL,
            profile_picture  TEXT,
            created_at       TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Friend lists are append-only and deliberately unconstrained:
        -- repeating a friend request appends duplicate rows, and expansion
        -- returns them in insertion order.
        CREATE TABLE IF NOT EXISTS friendships (
            user_id     TEXT NOT NULL,
            friend_id   TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_friendships_user
            ON friendships(user_id);

        -- author_id and tag user ids are not foreign keys: posts may
        -- reference users that were never created.
        CREATE TABLE IF NOT EXISTS posts (
            id          TEXT PRIMARY KEY,
            content     TEXT NOT NULL,
            image       TEXT,
            video       TEXT,
            author_id   TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_posts_author
            ON posts(author_id);

        CREATE TABLE IF NOT EXISTS post_tags (
            post_id     TEXT NOT NULL,
            user_id     TEXT NOT NULL,
            position    INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_post_tags_post
            ON post_tags(post_id);

        CREATE TABLE IF NOT EXISTS messages (
            id            TEXT PRIMARY KEY,
            sender_id     TEXT NOT NULL,
            recipient_id  TEXT NOT NULL,
            content       TEXT NOT NULL,
            created_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_messages_sender
            ON messages(sender_id);

        CREATE INDEX IF NOT EXISTS idx_messages_recipient
            ON messages(recipient_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
