use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::{
    dto::users::{UpdateProfileRequest, UserList, UserProfile},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    routes::params::UserListQuery,
    state::AppState,
};

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserProfile>> {
    let row = Users::find_by_id(user.id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(ApiResponse::success(
        "User details fetched successfully",
        UserProfile::from(row),
        None,
    ))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }

    let row = Users::find_by_id(user.id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let mut active: UserActive = row.into();
    active.name = Set(payload.name);
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Profile updated",
        UserProfile::from(updated),
        None,
    ))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(user_type) = query.user_type.as_ref().filter(|t| !t.is_empty()) {
        condition = condition.add(UserCol::UserType.eq(user_type.clone()));
    }

    let finder = Users::find()
        .filter(condition)
        .order_by_desc(UserCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(UserProfile::from)
        .collect();

    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_user(
    state: &AppState,
    user: &AuthUser,
    unique_id: &str,
) -> AppResult<ApiResponse<UserProfile>> {
    ensure_admin(user)?;

    let row = Users::find()
        .filter(UserCol::UniqueId.eq(unique_id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(ApiResponse::success("User", UserProfile::from(row), None))
}

pub async fn delete_user(
    state: &AppState,
    user: &AuthUser,
    unique_id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    // Admins cannot remove their own account.
    if user.unique_id == unique_id {
        return Err(AppError::validation("You cannot delete your own account"));
    }

    let row = Users::find()
        .filter(UserCol::UniqueId.eq(unique_id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Users::delete_by_id(row.id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        "User deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
