use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};

use crate::{
    dto::wishlist::{AddToWishlistRequest, WishlistList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::wishlist_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_to_wishlist))
        .route("/", get(wishlist))
        .route("/{code}", delete(remove_from_wishlist))
}

#[utoipa::path(
    post,
    path = "/api/wishlist",
    request_body = AddToWishlistRequest,
    responses(
        (status = 200, description = "Product added to wishlist", body = ApiResponse<WishlistList>),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product already in wishlist"),
    ),
    tag = "Wishlist"
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToWishlistRequest>,
) -> AppResult<Json<ApiResponse<WishlistList>>> {
    Ok(Json(
        wishlist_service::add_to_wishlist(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/wishlist",
    responses(
        (status = 200, description = "Wishlist contents", body = ApiResponse<WishlistList>),
    ),
    tag = "Wishlist"
)]
pub async fn wishlist(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<WishlistList>>> {
    Ok(Json(wishlist_service::list_wishlist(&state, &user).await?))
}

#[utoipa::path(
    delete,
    path = "/api/wishlist/{code}",
    params(
        ("code" = String, Path, description = "Product display code")
    ),
    responses(
        (status = 200, description = "Product removed from wishlist", body = ApiResponse<WishlistList>),
        (status = 404, description = "Product is not in the wishlist"),
    ),
    tag = "Wishlist"
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<WishlistList>>> {
    Ok(Json(
        wishlist_service::remove_from_wishlist(&state, &user, &code).await?,
    ))
}
