use axum::extract::FromRef;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use mongodb::bson::oid::ObjectId;

use crate::auth::claims::verify_token;
use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

/// Caller identity extracted from the `Authorization: Bearer` header.
/// Handlers take this as an argument; missing or invalid tokens reject the
/// request with 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub role: Role,
}

impl AuthUser {
    /// 403 unless the caller holds `role`.
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// 403 unless the caller owns the resource.
    pub fn require_owner(&self, owner: &ObjectId) -> Result<(), AppError> {
        if &self.user_id == owner {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims = verify_token(token, &state.config.jwt_secret)?;
        let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser {
            user_id,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role_mismatch_is_forbidden() {
        let auth = AuthUser {
            user_id: ObjectId::new(),
            role: Role::User,
        };
        assert!(matches!(
            auth.require_role(Role::CompanyHr),
            Err(AppError::Forbidden)
        ));
        assert!(auth.require_role(Role::User).is_ok());
    }

    #[test]
    fn test_require_owner_mismatch_is_forbidden() {
        let auth = AuthUser {
            user_id: ObjectId::new(),
            role: Role::User,
        };
        assert!(auth.require_owner(&auth.user_id.clone()).is_ok());
        assert!(matches!(
            auth.require_owner(&ObjectId::new()),
            Err(AppError::Forbidden)
        ));
    }
}
