use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{LoginRequest, LoginResponse, LogoutRequest, RegisterRequest, RegisterResponse},
    dto::users::UserProfile,
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    ids::display_code,
    response::{ApiResponse, Meta},
    state::AppState,
    token::Claims,
};

const USER_TYPES: [&str; 3] = ["customer", "admin", "vendor"];

pub async fn register(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<RegisterResponse>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    if !payload.email.contains('@') {
        return Err(AppError::validation("email is invalid"));
    }
    if payload.phone.trim().is_empty() {
        return Err(AppError::validation("phone is required"));
    }
    if payload.password.len() < 6 {
        return Err(AppError::validation("password must be at least 6 characters"));
    }
    let user_type = payload.user_type.unwrap_or_else(|| "customer".to_string());
    if !USER_TYPES.contains(&user_type.as_str()) {
        return Err(AppError::validation("user_type must be customer, admin or vendor"));
    }

    let email_taken = Users::find()
        .filter(UserCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?
        .is_some();
    if email_taken {
        return Err(AppError::conflict("Email is already registered"));
    }

    let phone_taken = Users::find()
        .filter(UserCol::Phone.eq(payload.phone.as_str()))
        .one(&state.orm)
        .await?
        .is_some();
    if phone_taken {
        return Err(AppError::conflict("Phone is already registered"));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();
    let unique_id = display_code("CUS", id);

    let user = UserActive {
        id: Set(id),
        unique_id: Set(unique_id),
        name: Set(payload.name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        password_hash: Set(password_hash),
        user_type: Set(user_type),
        session_token: Set(None),
        last_login_at: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "unique_id": user.unique_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "User registered successfully",
        RegisterResponse {
            unique_id: user.unique_id,
            user_type: user.user_type,
        },
        None,
    ))
}

pub async fn login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = Users::find()
        .filter(UserCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::unauthenticated("Invalid email or password"))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("stored password hash is invalid")))?;
    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::unauthenticated("Invalid email or password"));
    }

    let claims = Claims {
        user_id: user.id,
        unique_id: user.unique_id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        phone: user.phone.clone(),
        user_type: user.user_type.clone(),
        issued_at: Utc::now().timestamp(),
    };
    let token = state.tokens.encode(&claims)?;

    // Overwriting the stored token invalidates any previous session.
    let mut active: UserActive = user.into();
    active.session_token = Set(Some(token.clone()));
    active.last_login_at = Set(Some(Utc::now().into()));
    let user = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "unique_id": user.unique_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Login successful",
        LoginResponse {
            token,
            user: UserProfile::from(user),
        },
        Some(Meta::empty()),
    ))
}

pub async fn logout(
    state: &AppState,
    payload: LogoutRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let user = Users::find()
        .filter(UserCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let user_id = user.id;
    let mut active: UserActive = user.into();
    active.session_token = Set(None);
    active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user_id),
        "user_logout",
        Some("users"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Logged out successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
