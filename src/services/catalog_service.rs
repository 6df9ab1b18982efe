use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::catalog::{
        CategoryDto, CategoryList, CreateCategoryRequest, CreateSubCategoryRequest, SubCategoryDto,
        SubCategoryList, UpdateCategoryRequest, UpdateSubCategoryRequest,
    },
    entity::categories::{ActiveModel as CategoryActive, Column as CatCol, Entity as Categories},
    entity::subcategories::{
        ActiveModel as SubCategoryActive, Column as SubCol, Entity as Subcategories,
    },
    error::{AppError, AppResult},
    ids::display_code,
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<CategoryDto>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }

    let exists = Categories::find()
        .filter(CatCol::Name.eq(payload.name.as_str()))
        .one(&state.orm)
        .await?
        .is_some();
    if exists {
        return Err(AppError::conflict("Category already exists"));
    }

    let id = Uuid::new_v4();
    let category = CategoryActive {
        id: Set(id),
        code: Set(display_code("CAT", id)),
        name: Set(payload.name),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "category_create",
        Some("categories"),
        Some(serde_json::json!({ "code": category.code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Category created successfully",
        CategoryDto::from(category),
        None,
    ))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .order_by_asc(CatCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(CategoryDto::from)
        .collect();

    Ok(ApiResponse::success(
        "Categories fetched successfully",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    code: &str,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<CategoryDto>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }

    let category = find_category(state, code).await?;
    let mut active: CategoryActive = category.into();
    active.name = Set(payload.name);
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Category updated successfully",
        CategoryDto::from(updated),
        None,
    ))
}

/// Deleting a category removes its subcategories in the same transaction.
/// Products keep their snapshotted category name; their FK blocks the delete
/// if any product still references the category.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    code: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let category = find_category(state, code).await?;

    let txn = state.orm.begin().await?;
    Subcategories::delete_many()
        .filter(SubCol::CategoryId.eq(category.id))
        .exec(&txn)
        .await?;
    Categories::delete_by_id(category.id).exec(&txn).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "category_delete",
        Some("categories"),
        Some(serde_json::json!({ "code": code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Category deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn create_subcategory(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSubCategoryRequest,
) -> AppResult<ApiResponse<SubCategoryDto>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }

    let category = find_category(state, &payload.category).await?;

    let exists = Subcategories::find()
        .filter(SubCol::CategoryId.eq(category.id))
        .filter(SubCol::Name.eq(payload.name.as_str()))
        .one(&state.orm)
        .await?
        .is_some();
    if exists {
        return Err(AppError::conflict("Subcategory already exists"));
    }

    let id = Uuid::new_v4();
    let subcategory = SubCategoryActive {
        id: Set(id),
        code: Set(display_code("SUB", id)),
        name: Set(payload.name),
        category_id: Set(category.id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Subcategory created successfully",
        SubCategoryDto::from(subcategory),
        None,
    ))
}

pub async fn list_subcategories(
    state: &AppState,
    category_code: Option<&str>,
) -> AppResult<ApiResponse<SubCategoryList>> {
    let mut finder = Subcategories::find().order_by_asc(SubCol::Name);
    if let Some(code) = category_code {
        let category = find_category(state, code).await?;
        finder = finder.filter(SubCol::CategoryId.eq(category.id));
    }

    let items = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(SubCategoryDto::from)
        .collect();

    Ok(ApiResponse::success(
        "Subcategories fetched successfully",
        SubCategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn update_subcategory(
    state: &AppState,
    user: &AuthUser,
    code: &str,
    payload: UpdateSubCategoryRequest,
) -> AppResult<ApiResponse<SubCategoryDto>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }

    let subcategory = find_subcategory(state, code).await?;
    let mut active: SubCategoryActive = subcategory.into();
    active.name = Set(payload.name);
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Subcategory updated successfully",
        SubCategoryDto::from(updated),
        None,
    ))
}

pub async fn delete_subcategory(
    state: &AppState,
    user: &AuthUser,
    code: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let subcategory = find_subcategory(state, code).await?;
    Subcategories::delete_by_id(subcategory.id)
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Subcategory deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub(crate) async fn find_category(
    state: &AppState,
    code: &str,
) -> AppResult<crate::entity::categories::Model> {
    Categories::find()
        .filter(CatCol::Code.eq(code))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))
}

pub(crate) async fn find_subcategory(
    state: &AppState,
    code: &str,
) -> AppResult<crate::entity::subcategories::Model> {
    Subcategories::find()
        .filter(SubCol::Code.eq(code))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Subcategory not found"))
}
