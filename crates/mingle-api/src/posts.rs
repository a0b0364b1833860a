use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use anyhow::anyhow;
use tracing::error;
use uuid::Uuid;

use mingle_types::api::CreatePostRequest;
use mingle_types::models::{PostExpanded, User};

use crate::AppState;
use crate::error::ApiError;

pub async fn create_post(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = Uuid::new_v4();
    let tags: Vec<String> = req.tags.iter().map(Uuid::to_string).collect();

    // No validation that author or tags reference real users.
    state
        .db
        .insert_post(
            &post_id.to_string(),
            &req.content,
            req.image.as_deref(),
            req.video.as_deref(),
            &req.author.to_string(),
            &tags,
        )
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let post = state
        .db
        .get_post(&post_id.to_string())?
        .ok_or_else(|| ApiError::Internal(anyhow!("created post vanished: {}", post_id)))?
        .into_post(req.tags);

    Ok((StatusCode::CREATED, Json(post)))
}

/// All posts authored by the user's friends at query time, with author and
/// tags expanded. Store-natural order; no ranking or pagination.
pub async fn news_feed(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    // Run the whole multi-query read off the async runtime
    let db = state.clone();
    let (posts, tag_rows, users) = tokio::task::spawn_blocking(move || {
        db.db
            .get_user_by_id(&user_id)?
            .ok_or_else(|| anyhow!("User not found"))?;

        let friend_ids = db.db.get_friend_ids(&user_id)?;
        let posts = db.db.get_posts_by_authors(&friend_ids)?;

        let post_ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();
        let tag_rows = db.db.get_tags_for_posts(&post_ids)?;

        // One batch fetch covers authors and tagged users alike.
        let mut expand_ids: Vec<String> = posts.iter().map(|p| p.author_id.clone()).collect();
        expand_ids.extend(tag_rows.iter().map(|t| t.user_id.clone()));
        expand_ids.sort();
        expand_ids.dedup();
        let users = db.db.get_users_by_ids(&expand_ids)?;

        Ok::<_, anyhow::Error>((posts, tag_rows, users))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.into())
    })??;

    let users_by_id: HashMap<String, User> = users
        .into_iter()
        .map(|row| (row.id.clone(), row.into_user()))
        .collect();

    let mut tags_by_post: HashMap<String, Vec<User>> = HashMap::new();
    for tag in &tag_rows {
        // Tag ids that resolve to no user are dropped from the expansion.
        if let Some(user) = users_by_id.get(&tag.user_id) {
            tags_by_post.entry(tag.post_id.clone()).or_default().push(user.clone());
        }
    }

    let feed: Vec<PostExpanded> = posts
        .into_iter()
        .map(|row| {
            let author = users_by_id.get(&row.author_id).cloned();
            let tags = tags_by_post.remove(&row.id).unwrap_or_default();
            let post = row.into_post(vec![]);
            PostExpanded {
                id: post.id,
                content: post.content,
                image: post.image,
                video: post.video,
                tags,
                author,
                created_at: post.created_at,
            }
        })
        .collect();

    Ok(Json(feed))
}
