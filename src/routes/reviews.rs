use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    dto::reviews::{AdminReviewRequest, ReviewDto, SubmitReviewRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::review_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct MyReviewQuery {
    /// Product display code.
    pub product: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_review))
        .route("/admin", post(admin_review))
        .route("/mine", get(my_review))
        .route("/{code}", delete(delete_review))
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = SubmitReviewRequest,
    responses(
        (status = 200, description = "Review submitted", body = ApiResponse<ReviewDto>),
        (status = 400, description = "Invalid rating"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Reviews"
)]
pub async fn submit_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SubmitReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewDto>>> {
    Ok(Json(
        review_service::submit_review(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/reviews/admin",
    request_body = AdminReviewRequest,
    responses(
        (status = 200, description = "Review added", body = ApiResponse<ReviewDto>),
        (status = 403, description = "Admin only"),
    ),
    tag = "Reviews"
)]
pub async fn admin_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AdminReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewDto>>> {
    Ok(Json(
        review_service::admin_review(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/reviews/mine",
    params(
        ("product" = String, Query, description = "Product display code"),
    ),
    responses(
        (status = 200, description = "Own review for the product", body = ApiResponse<ReviewDto>),
        (status = 404, description = "Review not found"),
    ),
    tag = "Reviews"
)]
pub async fn my_review(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MyReviewQuery>,
) -> AppResult<Json<ApiResponse<ReviewDto>>> {
    Ok(Json(
        review_service::my_review(&state, &user, &query.product).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{code}",
    params(
        ("code" = String, Path, description = "Review display code")
    ),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 403, description = "Not the review's author"),
        (status = 404, description = "Review not found"),
    ),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        review_service::delete_review(&state, &user, &code).await?,
    ))
}
