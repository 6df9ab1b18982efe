use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    dto::orders::{
        Invoice, OrderDto, OrderList, OrderWithItems, PlaceOrderRequest, UpdateOrderStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(place_order))
        .route("/", get(my_orders))
        .route("/all", get(list_all_orders))
        .route("/{code}", get(get_order))
        .route("/{code}/status", put(update_order_status))
        .route("/{code}/invoice", get(invoice))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Insufficient stock or invalid payload"),
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    Ok(Json(
        order_service::place_order(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Own orders", body = ApiResponse<OrderList>),
    ),
    tag = "Orders"
)]
pub async fn my_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(order_service::my_orders(&state, &user).await?))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AllOrdersQuery {
    /// Narrow to one customer by their display code.
    pub user: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/orders/all",
    params(
        ("user" = Option<String>, Query, description = "Customer display code"),
    ),
    responses(
        (status = 200, description = "All orders", body = ApiResponse<OrderList>),
        (status = 403, description = "Admin only"),
    ),
    tag = "Orders"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AllOrdersQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(
        order_service::list_orders(&state, &user, query.user.as_deref()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/{code}",
    params(
        ("code" = String, Path, description = "Order display code")
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    Ok(Json(order_service::get_order(&state, &user, &code).await?))
}

#[utoipa::path(
    put,
    path = "/api/orders/{code}/status",
    params(
        ("code" = String, Path, description = "Order display code")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<OrderDto>),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Admin only"),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderDto>>> {
    Ok(Json(
        order_service::update_status(&state, &user, &code, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/{code}/invoice",
    params(
        ("code" = String, Path, description = "Order display code")
    ),
    responses(
        (status = 200, description = "Invoice", body = ApiResponse<Invoice>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn invoice(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<Invoice>>> {
    Ok(Json(order_service::invoice(&state, &user, &code).await?))
}
