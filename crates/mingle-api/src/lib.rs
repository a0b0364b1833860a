pub mod auth;
pub mod error;
pub mod friends;
pub mod messages;
pub mod posts;
pub mod profile;
pub mod token;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use mingle_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

/// The full API route table. Shared by the server binary and the
/// integration tests, which drive it without binding a socket.
///
/// No route is guarded by token verification: the token issued at login is
/// currently only consumed by clients.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/profile/{id}", put(profile::update_profile))
        .route("/api/profile/{id}", get(profile::get_profile))
        .route("/api/posts", post(posts::create_post))
        .route("/api/newsfeed/{user_id}", get(posts::news_feed))
        .route("/api/friend-request", post(friends::friend_request))
        .route("/api/messages", post(messages::send_message))
        .route("/api/messages/{user_id}", get(messages::get_messages))
        .with_state(state)
}
