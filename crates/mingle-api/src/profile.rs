use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::error;

use mingle_types::api::UpdateProfileRequest;
use mingle_types::models::UserWithFriends;

use crate::AppState;
use crate::error::ApiError;

/// Update-and-return-new-value. Absent fields are left untouched; there is
/// no ownership check on the target id.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .update_profile(
            &id,
            req.name.as_deref(),
            req.email.as_deref(),
            req.profile_picture.as_deref(),
        )?
        .ok_or_else(ApiError::not_found)?;

    Ok(Json(row.into_user()))
}

/// Fetch a user with the friends relationship expanded into full records.
/// Any lookup failure, a malformed id included, reports "User not found".
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    // Run both blocking queries off the async runtime
    let db = state.clone();
    let (user, friends) = tokio::task::spawn_blocking(move || {
        let user = db.db.get_user_by_id(&id)?.ok_or_else(ApiError::not_found)?;
        let friends = db.db.get_friends(&id)?;
        Ok::<_, ApiError>((user, friends))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.into())
    })?
    .map_err(|_| ApiError::not_found())?;

    Ok(Json(UserWithFriends {
        user: user.into_user(),
        friends: friends.into_iter().map(|f| f.into_user()).collect(),
    }))
}
