use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user record as it goes over the wire.
///
/// `password` holds the argon2 digest and IS serialized in responses — the
/// wire contract returns the stored record verbatim. Never holds plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user with the `friends` identifier set expanded into full records.
/// Duplicates and insertion order in the friend list are preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithFriends {
    #[serde(flatten)]
    pub user: User,
    pub friends: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub content: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub tags: Vec<Uuid>,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A post with `author` and `tags` expanded into full user records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostExpanded {
    pub id: Uuid,
    pub content: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub tags: Vec<User>,
    pub author: Option<User>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender: Uuid,
    pub recipient: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A message with both parties expanded. Sender or recipient ids that no
/// longer resolve to a user come back as `None` rather than failing the fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageExpanded {
    pub id: Uuid,
    pub sender: Option<User>,
    pub recipient: Option<User>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
