//! Bearer-token identity resolution.
//!
//! The auth service that issues tokens lives outside this crate. This module
//! only verifies a token's signature and expiry and projects its claims into
//! a [`Principal`] that the rest of the crate can reason about. It never
//! issues or refreshes tokens.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::Role;

/// Claims encoded in the bearer token by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    role: Role,
    team_id: Option<Uuid>,
    exp: i64,
}

/// The authenticated caller, resolved from the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    pub team_id: Option<Uuid>,
}

impl Principal {
    /// Decode and verify a raw JWT against `secret`.
    ///
    /// Used directly by tests and by the extractor below.
    pub fn from_token(token: &str, secret: &str) -> Result<Self, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(Principal {
            user_id: data.claims.sub,
            role: data.claims.role,
            team_id: data.claims.team_id,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    crate::routes::AppState: axum::extract::FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized("Missing or malformed Authorization header"))?;

        let app_state = crate::routes::AppState::from_ref(state);
        Principal::from_token(bearer.token(), &app_state.jwt_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(role: Role, team_id: Option<Uuid>, secret: &str, exp_offset: i64) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            role,
            team_id,
            exp: chrono::Utc::now().timestamp() + exp_offset,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn test_valid_token_decodes_to_principal() {
        let secret = "test-secret";
        let team_id = Some(Uuid::new_v4());
        let token = token_for(Role::Support, team_id, secret, 3600);

        let principal = Principal::from_token(&token, secret).unwrap();
        assert_eq!(principal.role, Role::Support);
        assert_eq!(principal.team_id, team_id);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let secret = "test-secret";
        let token = token_for(Role::Citizen, None, secret, -3600);

        let result = Principal::from_token(&token, secret);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = token_for(Role::Manager, None, "secret-a", 3600);
        let result = Principal::from_token(&token, "secret-b");
        assert!(result.is_err());
    }
}
