//! Database row types — these map directly to SQLite rows.
//! Distinct from mingle-types API models to keep the DB layer independent.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use mingle_types::models::{Message, Post, User};

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile_picture: Option<String>,
    pub created_at: String,
}

pub struct PostRow {
    pub id: String,
    pub content: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub author_id: String,
    pub created_at: String,
}

pub struct PostTagRow {
    pub post_id: String,
    pub user_id: String,
}

pub struct MessageRow {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    pub created_at: String,
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Try RFC 3339 first, then parse as naive UTC and convert.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}': {}", raw, e);
            DateTime::default()
        })
}

fn parse_id(raw: &str, what: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} id '{}': {}", what, raw, e);
        Uuid::default()
    })
}

impl UserRow {
    pub fn into_user(self) -> User {
        User {
            id: parse_id(&self.id, "user"),
            name: self.name,
            email: self.email,
            password: self.password,
            profile_picture: self.profile_picture,
            created_at: parse_timestamp(&self.created_at),
        }
    }
}

impl PostRow {
    pub fn into_post(self, tags: Vec<Uuid>) -> Post {
        Post {
            id: parse_id(&self.id, "post"),
            content: self.content,
            image: self.image,
            video: self.video,
            tags,
            author: parse_id(&self.author_id, "author"),
            created_at: parse_timestamp(&self.created_at),
        }
    }
}

impl MessageRow {
    pub fn into_message(self) -> Message {
        Message {
            id: parse_id(&self.id, "message"),
            sender: parse_id(&self.sender_id, "sender"),
            recipient: parse_id(&self.recipient_id, "recipient"),
            content: self.content,
            created_at: parse_timestamp(&self.created_at),
        }
    }
}
