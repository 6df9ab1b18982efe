use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};

use crate::{
    dto::catalog::{
        CategoryDto, CategoryList, CreateCategoryRequest, CreateSubCategoryRequest, SubCategoryDto,
        SubCategoryList, UpdateCategoryRequest, UpdateSubCategoryRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::SubCategoryListQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category))
        .route("/", get(list_categories))
        .route("/{code}", put(update_category))
        .route("/{code}", delete(delete_category))
}

pub fn subcategory_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subcategory))
        .route("/", get(list_subcategories))
        .route("/{code}", put(update_subcategory))
        .route("/{code}", delete(delete_subcategory))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<CategoryDto>),
        (status = 409, description = "Category already exists"),
    ),
    tag = "Catalog"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<CategoryDto>>> {
    Ok(Json(
        catalog_service::create_category(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories", body = ApiResponse<CategoryList>),
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    Ok(Json(catalog_service::list_categories(&state).await?))
}

#[utoipa::path(
    put,
    path = "/api/categories/{code}",
    params(
        ("code" = String, Path, description = "Category display code")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryDto>),
        (status = 404, description = "Category not found"),
    ),
    tag = "Catalog"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<CategoryDto>>> {
    Ok(Json(
        catalog_service::update_category(&state, &user, &code, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{code}",
    params(
        ("code" = String, Path, description = "Category display code")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found"),
    ),
    tag = "Catalog"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        catalog_service::delete_category(&state, &user, &code).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/subcategories",
    request_body = CreateSubCategoryRequest,
    responses(
        (status = 200, description = "Subcategory created", body = ApiResponse<SubCategoryDto>),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Subcategory already exists"),
    ),
    tag = "Catalog"
)]
pub async fn create_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSubCategoryRequest>,
) -> AppResult<Json<ApiResponse<SubCategoryDto>>> {
    Ok(Json(
        catalog_service::create_subcategory(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/subcategories",
    params(
        ("category" = Option<String>, Query, description = "Filter by category display code"),
    ),
    responses(
        (status = 200, description = "Subcategories", body = ApiResponse<SubCategoryList>),
    ),
    tag = "Catalog"
)]
pub async fn list_subcategories(
    State(state): State<AppState>,
    Query(query): Query<SubCategoryListQuery>,
) -> AppResult<Json<ApiResponse<SubCategoryList>>> {
    Ok(Json(
        catalog_service::list_subcategories(&state, query.category.as_deref()).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/subcategories/{code}",
    params(
        ("code" = String, Path, description = "Subcategory display code")
    ),
    request_body = UpdateSubCategoryRequest,
    responses(
        (status = 200, description = "Subcategory updated", body = ApiResponse<SubCategoryDto>),
        (status = 404, description = "Subcategory not found"),
    ),
    tag = "Catalog"
)]
pub async fn update_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
    Json(payload): Json<UpdateSubCategoryRequest>,
) -> AppResult<Json<ApiResponse<SubCategoryDto>>> {
    Ok(Json(
        catalog_service::update_subcategory(&state, &user, &code, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/subcategories/{code}",
    params(
        ("code" = String, Path, description = "Subcategory display code")
    ),
    responses(
        (status = 200, description = "Subcategory deleted"),
        (status = 404, description = "Subcategory not found"),
    ),
    tag = "Catalog"
)]
pub async fn delete_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        catalog_service::delete_subcategory(&state, &user, &code).await?,
    ))
}
