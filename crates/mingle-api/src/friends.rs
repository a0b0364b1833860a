use axum::{Json, extract::State, response::IntoResponse};

use mingle_types::api::{FriendRequest, FriendRequestResponse};

use crate::AppState;
use crate::error::ApiError;

/// Friend requests are instantaneous and mutual: both users gain the other
/// immediately, with no pending state and no duplicate check. The two writes
/// below are independent; if the second fails the first is not rolled back.
pub async fn friend_request(
    State(state): State<AppState>,
    Json(req): Json<FriendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let sender_id = req.sender_id.to_string();
    let recipient_id = req.recipient_id.to_string();

    let sender = state.db.get_user_by_id(&sender_id)?;
    let recipient = state.db.get_user_by_id(&recipient_id)?;

    if sender.is_none() || recipient.is_none() {
        return Err(ApiError::not_found());
    }

    state.db.add_friend(&recipient_id, &sender_id)?;
    state.db.add_friend(&sender_id, &recipient_id)?;

    Ok(Json(FriendRequestResponse {
        message: "Friend request accepted".into(),
    }))
}
