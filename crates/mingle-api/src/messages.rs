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

use mingle_types::api::SendMessageRequest;
use mingle_types::models::{MessageExpanded, User};

use crate::AppState;
use crate::error::ApiError;

pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message_id = Uuid::new_v4();

    // No validation that sender or recipient exist.
    state
        .db
        .insert_message(
            &message_id.to_string(),
            &req.sender.to_string(),
            &req.recipient.to_string(),
            &req.content,
        )
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let message = state
        .db
        .get_message(&message_id.to_string())?
        .ok_or_else(|| ApiError::Internal(anyhow!("created message vanished: {}", message_id)))?
        .into_message();

    Ok((StatusCode::CREATED, Json(message)))
}

/// Every message where the user is sender or recipient, both parties
/// expanded, store-natural order.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    // Run both blocking queries off the async runtime
    let db = state.clone();
    let (rows, users) = tokio::task::spawn_blocking(move || {
        let rows = db.db.get_messages_for_user(&user_id)?;

        let mut party_ids: Vec<String> = rows
            .iter()
            .flat_map(|m| [m.sender_id.clone(), m.recipient_id.clone()])
            .collect();
        party_ids.sort();
        party_ids.dedup();
        let users = db.db.get_users_by_ids(&party_ids)?;

        Ok::<_, anyhow::Error>((rows, users))
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

    let messages: Vec<MessageExpanded> = rows
        .into_iter()
        .map(|row| {
            let sender = users_by_id.get(&row.sender_id).cloned();
            let recipient = users_by_id.get(&row.recipient_id).cloned();
            let message = row.into_message();
            MessageExpanded {
                id: message.id,
                sender,
                recipient,
                content: message.content,
                created_at: message.created_at,
            }
        })
        .collect();

    Ok(Json(messages))
}
