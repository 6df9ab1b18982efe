use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::addresses::{AddressDto, AddressList, AddressPayload},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::address_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_address))
        .route("/", get(list_addresses))
        .route("/{id}", put(update_address))
        .route("/{id}", delete(delete_address))
}

#[utoipa::path(
    post,
    path = "/api/addresses",
    request_body = AddressPayload,
    responses(
        (status = 200, description = "Address added", body = ApiResponse<AddressDto>),
    ),
    tag = "Addresses"
)]
pub async fn add_address(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddressPayload>,
) -> AppResult<Json<ApiResponse<AddressDto>>> {
    Ok(Json(
        address_service::add_address(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/addresses",
    responses(
        (status = 200, description = "Addresses", body = ApiResponse<AddressList>),
    ),
    tag = "Addresses"
)]
pub async fn list_addresses(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AddressList>>> {
    Ok(Json(address_service::list_addresses(&state, &user).await?))
}

#[utoipa::path(
    put,
    path = "/api/addresses/{id}",
    params(
        ("id" = Uuid, Path, description = "Address ID")
    ),
    request_body = AddressPayload,
    responses(
        (status = 200, description = "Address updated", body = ApiResponse<AddressDto>),
        (status = 404, description = "Address not found"),
    ),
    tag = "Addresses"
)]
pub async fn update_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddressPayload>,
) -> AppResult<Json<ApiResponse<AddressDto>>> {
    Ok(Json(
        address_service::update_address(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/addresses/{id}",
    params(
        ("id" = Uuid, Path, description = "Address ID")
    ),
    responses(
        (status = 200, description = "Address deleted"),
        (status = 404, description = "Address not found"),
    ),
    tag = "Addresses"
)]
pub async fn delete_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        address_service::delete_address(&state, &user, id).await?,
    ))
}
