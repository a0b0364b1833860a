use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use mingle_types::api::Claims;

/// Issue an HS256 token bound to the user id, valid for one hour.
pub fn issue(secret: &str, user_id: Uuid) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn verify(secret: &str, token: &str) -> anyhow::Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips() {
        let user_id = Uuid::new_v4();
        let token = issue("test-secret", user_id).unwrap();
        let claims = verify("test-secret", &token).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue("test-secret", Uuid::new_v4()).unwrap();
        assert!(verify("other-secret", &token).is_err());
    }
}
