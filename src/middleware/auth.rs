use axum::{
    extract::{FromRef, FromRequestParts},
    http::header,
};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    entity::users::{Entity as Users, Model as UserModel},
    error::AppError,
    state::AppState,
};

/// Canonical identity for a request, derived once by the extractor. Handlers
/// never re-decrypt tokens or re-load the user row.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub unique_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_type: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.user_type == "admin"
    }
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin access required"));
    }
    Ok(())
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::unauthenticated("Authorization token missing"))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::unauthenticated("Invalid Authorization header"))?;

        let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
        if token.is_empty() {
            return Err(AppError::unauthenticated("Authorization token missing"));
        }

        let claims = state.tokens.decode(token)?;

        let user = Users::find_by_id(claims.user_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        // The stored token is the only live session; logout clears it and
        // every login overwrites it, so an exact match is required.
        if user.session_token.as_deref() != Some(token) {
            return Err(AppError::unauthenticated("Invalid or expired token"));
        }

        Ok(auth_user_from(user))
    }
}

fn auth_user_from(user: UserModel) -> AuthUser {
    AuthUser {
        id: user.id,
        unique_id: user.unique_id,
        name: user.name,
        email: user.email,
        phone: user.phone,
        user_type: user.user_type,
    }
}
