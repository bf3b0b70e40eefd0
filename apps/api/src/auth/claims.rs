use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::Role;

pub const TOKEN_VALIDITY_HOURS: i64 = 24;

/// JWT payload: user id (hex) as subject, role for authorization, unix expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: i64,
}

/// Signs a bearer token for the given user, valid for [`TOKEN_VALIDITY_HOURS`].
pub fn issue_token(user_id: &ObjectId, role: Role, secret: &str) -> Result<String, AppError> {
    let exp = (Utc::now() + Duration::hours(TOKEN_VALIDITY_HOURS)).timestamp();
    let claims = Claims {
        sub: user_id.to_hex(),
        role,
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::Error::new(e)))
}

/// Verifies signature and expiry; any failure maps to 401.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_preserves_identity() {
        let id = ObjectId::new();
        let token = issue_token(&id, Role::CompanyHr, SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, id.to_hex());
        assert_eq!(claims.role, Role::CompanyHr);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = issue_token(&ObjectId::new(), Role::User, SECRET).unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.token", SECRET).is_err());
    }
}
