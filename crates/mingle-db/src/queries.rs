use crate::Database;
use crate::models::{MessageRow, PostRow, PostTagRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, name: &str, email: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, email, password) VALUES (?1, ?2, ?3, ?4)",
                (id, name, email, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    /// Batch-fetch users by id, for relationship expansion. Result order is
    /// store-natural; callers that care about order re-key by id.
    pub fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<UserRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, name, email, password, profile_picture, created_at
                 FROM users WHERE id IN ({})",
                placeholders(ids.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(ids.iter()), user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Partial update: NULL arguments leave the stored column untouched.
    /// Returns the updated row, or None if the id matched nothing.
    /// The password column has no update path.
    pub fn update_profile(
        &self,
        id: &str,
        name: Option<&str>,
        email: Option<&str>,
        profile_picture: Option<&str>,
    ) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE users SET
                     name = COALESCE(?2, name),
                     email = COALESCE(?3, email),
                     profile_picture = COALESCE(?4, profile_picture)
                 WHERE id = ?1",
                rusqlite::params![id, name, email, profile_picture],
            )?;

            if updated == 0 {
                return Ok(None);
            }
            query_user(conn, "id", id)
        })
    }

    // -- Friendships --

    /// Append one direction of a friendship. No duplicate check: calling this
    /// twice for the same pair appends a second row.
    pub fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO friendships (user_id, friend_id) VALUES (?1, ?2)",
                (user_id, friend_id),
            )?;
            Ok(())
        })
    }

    pub fn get_friend_ids(&self, user_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT friend_id FROM friendships WHERE user_id = ?1 ORDER BY rowid",
            )?;
            let ids = stmt
                .query_map([user_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ids)
        })
    }

    /// The user's friend list expanded into full records, in insertion order,
    /// duplicates included.
    pub fn get_friends(&self, user_id: &str) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.id, u.name, u.email, u.password, u.profile_picture, u.created_at
                 FROM friendships f
                 JOIN users u ON u.id = f.friend_id
                 WHERE f.user_id = ?1
                 ORDER BY f.rowid",
            )?;
            let rows = stmt
                .query_map([user_id], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Posts --

    pub fn insert_post(
        &self,
        id: &str,
        content: &str,
        image: Option<&str>,
        video: Option<&str>,
        author_id: &str,
        tags: &[String],
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (id, content, image, video, author_id) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, content, image, video, author_id],
            )?;
            for (position, tag) in tags.iter().enumerate() {
                conn.execute(
                    "INSERT INTO post_tags (post_id, user_id, position) VALUES (?1, ?2, ?3)",
                    rusqlite::params![id, tag, position as i64],
                )?;
            }
            Ok(())
        })
    }

    pub fn get_post(&self, id: &str) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, content, image, video, author_id, created_at FROM posts WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], post_from_row).optional()?;
            Ok(row)
        })
    }

    /// All posts whose author is in the given id set, in store-natural order.
    pub fn get_posts_by_authors(&self, author_ids: &[String]) -> Result<Vec<PostRow>> {
        if author_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, content, image, video, author_id, created_at
                 FROM posts WHERE author_id IN ({})",
                placeholders(author_ids.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(author_ids.iter()), post_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Batch-fetch tag rows for a set of post ids, in tag order per post.
    pub fn get_tags_for_posts(&self, post_ids: &[String]) -> Result<Vec<PostTagRow>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT post_id, user_id FROM post_tags WHERE post_id IN ({})
                 ORDER BY post_id, position",
                placeholders(post_ids.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(post_ids.iter()), |row| {
                    Ok(PostTagRow {
                        post_id: row.get(0)?,
                        user_id: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Messages --

    pub fn insert_message(&self, id: &str, sender_id: &str, recipient_id: &str, content: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, sender_id, recipient_id, content) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, sender_id, recipient_id, content],
            )?;
            Ok(())
        })
    }

    pub fn get_message(&self, id: &str) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender_id, recipient_id, content, created_at
                 FROM messages WHERE id = ?1",
            )?;
            let row = stmt.query_row([id], message_from_row).optional()?;
            Ok(row)
        })
    }

    /// Every message where the user is sender or recipient, store-natural
    /// order. No conversation grouping.
    pub fn get_messages_for_user(&self, user_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender_id, recipient_id, content, created_at
                 FROM messages WHERE sender_id = ?1 OR recipient_id = ?1",
            )?;
            let rows = stmt
                .query_map([user_id], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{}", i)).collect::<Vec<_>>().join(", ")
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // column is always a literal from this module, never caller input
    let sql = format!(
        "SELECT id, name, email, password, profile_picture, created_at FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;
    let row = stmt.query_row([value], user_from_row).optional()?;
    Ok(row)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        profile_picture: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn post_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<PostRow, rusqlite::Error> {
    Ok(PostRow {
        id: row.get(0)?,
        content: row.get(1)?,
        image: row.get(2)?,
        video: row.get(3)?,
        author_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn message_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<MessageRow, rusqlite::Error> {
    Ok(MessageRow {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        recipient_id: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn add_user(db: &Database, id: &str, name: &str, email: &str) {
        db.create_user(id, name, email, "digest").unwrap();
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = db();
        add_user(&db, "u1", "Ada", "ada@example.com");
        let err = db.create_user("u2", "Imposter", "ada@example.com", "digest");
        assert!(err.is_err());

        // Exactly one record for that email survives.
        let row = db.get_user_by_email("ada@example.com").unwrap().unwrap();
        assert_eq!(row.id, "u1");
        assert_eq!(row.name, "Ada");
    }

    #[test]
    fn friendship_appends_preserve_order_and_duplicates() {
        let db = db();
        add_user(&db, "a", "A", "a@example.com");
        add_user(&db, "b", "B", "b@example.com");
        add_user(&db, "c", "C", "c@example.com");

        db.add_friend("a", "b").unwrap();
        db.add_friend("a", "c").unwrap();
        db.add_friend("a", "b").unwrap();

        let ids = db.get_friend_ids("a").unwrap();
        assert_eq!(ids, vec!["b", "c", "b"]);

        let friends = db.get_friends("a").unwrap();
        let names: Vec<_> = friends.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "B"]);
    }

    #[test]
    fn posts_filter_by_author_membership() {
        let db = db();
        db.insert_post("p1", "from b", None, None, "b", &[]).unwrap();
        db.insert_post("p2", "from c", None, None, "c", &[]).unwrap();
        db.insert_post("p3", "from d", None, None, "d", &[]).unwrap();

        let posts = db
            .get_posts_by_authors(&["b".into(), "c".into()])
            .unwrap();
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);

        assert!(db.get_posts_by_authors(&[]).unwrap().is_empty());
    }

    #[test]
    fn post_tags_keep_order() {
        let db = db();
        db.insert_post("p1", "hi", None, None, "a", &["x".into(), "y".into(), "z".into()])
            .unwrap();

        let tags = db.get_tags_for_posts(&["p1".into()]).unwrap();
        let ids: Vec<_> = tags.iter().map(|t| t.user_id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn messages_fetch_covers_both_directions() {
        let db = db();
        db.insert_message("m1", "a", "b", "hi").unwrap();
        db.insert_message("m2", "b", "a", "hello").unwrap();
        db.insert_message("m3", "b", "c", "not for a").unwrap();

        let msgs = db.get_messages_for_user("a").unwrap();
        let ids: Vec<_> = msgs.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn profile_update_is_partial() {
        let db = db();
        add_user(&db, "u1", "Ada", "ada@example.com");

        let row = db
            .update_profile("u1", Some("Ada Lovelace"), None, Some("pic.png"))
            .unwrap()
            .unwrap();
        assert_eq!(row.name, "Ada Lovelace");
        assert_eq!(row.email, "ada@example.com");
        assert_eq!(row.profile_picture.as_deref(), Some("pic.png"));
        assert_eq!(row.password, "digest");

        assert!(db.update_profile("missing", Some("x"), None, None).unwrap().is_none());
    }
}
