use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::reviews::{AdminReviewRequest, ReviewDto, ReviewList, SubmitReviewRequest},
    entity::reviews::{ActiveModel as ReviewActive, Column as ReviewCol, Entity as Reviews},
    error::{AppError, AppResult},
    ids::display_code,
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    services::product_service::find_product,
    state::AppState,
};

fn validate_rating(rating: i16) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::validation("rating must be between 1 and 5"));
    }
    Ok(())
}

/// One review per (product, user); resubmitting replaces the existing one.
pub async fn submit_review(
    state: &AppState,
    user: &AuthUser,
    payload: SubmitReviewRequest,
) -> AppResult<ApiResponse<ReviewDto>> {
    validate_rating(payload.rating)?;

    let product = find_product(state, &payload.product).await?;

    let existing = Reviews::find()
        .filter(ReviewCol::ProductId.eq(product.id))
        .filter(ReviewCol::UserId.eq(user.id))
        .one(&state.orm)
        .await?;

    let review = match existing {
        Some(review) => {
            let mut active: ReviewActive = review.into();
            active.title = Set(payload.title);
            active.description = Set(payload.description);
            active.rating = Set(payload.rating);
            active.updated_at = Set(Utc::now().into());
            active.update(&state.orm).await?
        }
        None => {
            let id = Uuid::new_v4();
            ReviewActive {
                id: Set(id),
                code: Set(display_code("RVW", id)),
                product_id: Set(product.id),
                user_id: Set(Some(user.id)),
                is_admin: Set(false),
                reviewer_name: Set(None),
                reviewer_email: Set(None),
                title: Set(payload.title),
                description: Set(payload.description),
                rating: Set(payload.rating),
                created_at: NotSet,
                updated_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    Ok(ApiResponse::success(
        "Review submitted successfully",
        ReviewDto::from(review),
        None,
    ))
}

/// Admin-authored reviews carry a free-form reviewer identity and are not
/// limited to one per product.
pub async fn admin_review(
    state: &AppState,
    user: &AuthUser,
    payload: AdminReviewRequest,
) -> AppResult<ApiResponse<ReviewDto>> {
    ensure_admin(user)?;
    validate_rating(payload.rating)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    if !payload.email.contains('@') {
        return Err(AppError::validation("email is invalid"));
    }

    let product = find_product(state, &payload.product).await?;

    let id = Uuid::new_v4();
    let review = ReviewActive {
        id: Set(id),
        code: Set(display_code("RVW", id)),
        product_id: Set(product.id),
        user_id: Set(None),
        is_admin: Set(true),
        reviewer_name: Set(Some(payload.name)),
        reviewer_email: Set(Some(payload.email)),
        title: Set(payload.title),
        description: Set(payload.description),
        rating: Set(payload.rating),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Review added successfully",
        ReviewDto::from(review),
        None,
    ))
}

pub async fn my_review(
    state: &AppState,
    user: &AuthUser,
    product_code: &str,
) -> AppResult<ApiResponse<ReviewDto>> {
    let product = find_product(state, product_code).await?;

    let review = Reviews::find()
        .filter(ReviewCol::ProductId.eq(product.id))
        .filter(ReviewCol::UserId.eq(user.id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Review not found"))?;

    Ok(ApiResponse::success(
        "Review fetched successfully",
        ReviewDto::from(review),
        None,
    ))
}

pub async fn list_for_product(
    state: &AppState,
    product_code: &str,
) -> AppResult<ApiResponse<ReviewList>> {
    let product = find_product(state, product_code).await?;

    let items: Vec<ReviewDto> = Reviews::find()
        .filter(ReviewCol::ProductId.eq(product.id))
        .order_by_desc(ReviewCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ReviewDto::from)
        .collect();

    Ok(ApiResponse::success(
        "Reviews fetched successfully",
        ReviewList {
            count: items.len(),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Users delete their own reviews; admins delete any.
pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    code: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let review = Reviews::find()
        .filter(ReviewCol::Code.eq(code))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Review not found"))?;

    if review.user_id != Some(user.id) && !user.is_admin() {
        return Err(AppError::forbidden("You cannot delete this review"));
    }

    Reviews::delete_by_id(review.id).exec(&state.orm).await?;

    Ok(ApiResponse::success(
        "Review deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
