use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use anyhow::anyhow;
use uuid::Uuid;

use mingle_types::api::{LoginRequest, LoginResponse, RegisterRequest};

use crate::AppState;
use crate::error::ApiError;
use crate::token;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow!("password hashing failed: {}", e)))?
        .to_string();

    let user_id = Uuid::new_v4();

    // Any insert failure, the UNIQUE email violation included, is a client
    // error with the store's message passed through.
    state
        .db
        .create_user(&user_id.to_string(), &req.name, &req.email, &password_hash)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let user = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or_else(|| ApiError::Internal(anyhow!("created user vanished: {}", user_id)))?
        .into_user();

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Unknown email and wrong password are deliberately the same 401.
    let user = state
        .db
        .get_user_by_email(&req.email)?
        .ok_or(ApiError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| ApiError::Internal(anyhow!("stored digest unparseable: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let user = user.into_user();
    let token = token::issue(&state.jwt_secret, user.id)?;

    Ok(Json(LoginResponse { token, user }))
}
