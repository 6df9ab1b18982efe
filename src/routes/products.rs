use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};

use crate::{
    dto::products::{
        CreateProductRequest, ProductDto, ProductList, ProductWithStock, StockUpdateRequest,
        UpdateProductRequest,
    },
    dto::reviews::ReviewList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::ProductListQuery,
    services::{product_service, review_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/", get(list_products))
        .route("/{code}", get(get_product))
        .route("/{code}", put(update_product))
        .route("/{code}", delete(delete_product))
        .route("/{code}/stock", put(update_stock))
        .route("/{code}/reviews", get(list_reviews))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<ProductDto>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Category not found"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductDto>>> {
    Ok(Json(
        product_service::create_product(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("category" = Option<String>, Query, description = "Category display code"),
        ("sub_category" = Option<String>, Query, description = "Subcategory display code"),
        ("list_type" = Option<String>, Query, description = "Curated list name"),
    ),
    responses(
        (status = 200, description = "Products", body = ApiResponse<ProductList>),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    Ok(Json(product_service::list_products(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/products/{code}",
    params(
        ("code" = String, Path, description = "Product display code")
    ),
    responses(
        (status = 200, description = "Product with stock", body = ApiResponse<ProductWithStock>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<ProductWithStock>>> {
    Ok(Json(product_service::get_product(&state, &code).await?))
}

#[utoipa::path(
    put,
    path = "/api/products/{code}",
    params(
        ("code" = String, Path, description = "Product display code")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductDto>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductDto>>> {
    Ok(Json(
        product_service::update_product(&state, &user, &code, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/products/{code}",
    params(
        ("code" = String, Path, description = "Product display code")
    ),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        product_service::delete_product(&state, &user, &code).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/products/{code}/stock",
    params(
        ("code" = String, Path, description = "Product display code")
    ),
    request_body = StockUpdateRequest,
    responses(
        (status = 200, description = "Stock updated", body = ApiResponse<ProductWithStock>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn update_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
    Json(payload): Json<StockUpdateRequest>,
) -> AppResult<Json<ApiResponse<ProductWithStock>>> {
    Ok(Json(
        product_service::update_stock(&state, &user, &code, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/products/{code}/reviews",
    params(
        ("code" = String, Path, description = "Product display code")
    ),
    responses(
        (status = 200, description = "Reviews for the product", body = ApiResponse<ReviewList>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    Ok(Json(review_service::list_for_product(&state, &code).await?))
}
