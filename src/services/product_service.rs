use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::{
        CreateProductRequest, ProductDto, ProductList, ProductWithStock, StockDto,
        StockUpdateRequest, UpdateProductRequest,
    },
    entity::product_quantities::{
        ActiveModel as StockActive, Column as StockCol, Entity as ProductQuantities,
    },
    entity::products::{ActiveModel as ProductActive, Column as ProductCol, Entity as Products},
    error::{AppError, AppResult},
    ids::display_code,
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    routes::params::ProductListQuery,
    services::catalog_service::{find_category, find_subcategory},
    services::inventory,
    state::AppState,
};

/// Object-storage keys become public URLs once, at write time.
fn image_urls(state: &AppState, keys: Vec<String>) -> Vec<String> {
    let base = state.config.asset_base_url.trim_end_matches('/');
    keys.into_iter()
        .map(|key| format!("{base}/{}", key.trim_start_matches('/')))
        .collect()
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<ProductDto>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    if payload.actual_price < 0 || payload.selling_price < 0 {
        return Err(AppError::validation("prices must not be negative"));
    }

    let category = find_category(state, &payload.category).await?;
    let subcategory = match payload.sub_category.as_deref() {
        Some(code) => {
            let sub = find_subcategory(state, code).await?;
            if sub.category_id != category.id {
                return Err(AppError::validation(
                    "Subcategory does not belong to the given category",
                ));
            }
            Some(sub)
        }
        None => None,
    };

    let images = image_urls(state, payload.images.unwrap_or_default());
    let id = Uuid::new_v4();
    let product = ProductActive {
        id: Set(id),
        code: Set(display_code("PRD", id)),
        name: Set(payload.name),
        brand: Set(payload.brand),
        category_id: Set(category.id),
        category_name: Set(category.name),
        sub_category_id: Set(subcategory.as_ref().map(|s| s.id)),
        sub_category_name: Set(subcategory.map(|s| s.name)),
        description: Set(payload.description),
        color: Set(payload.color),
        actual_price: Set(payload.actual_price),
        discount: Set(payload.discount.unwrap_or(0)),
        selling_price: Set(payload.selling_price),
        list_type: Set(payload.list_type),
        images: Set(serde_json::json!(images)),
        total_quantity: Set(0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "code": product.code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created successfully",
        ProductDto::from(product),
        None,
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    code: &str,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<ProductDto>> {
    ensure_admin(user)?;

    let product = find_product(state, code).await?;
    let mut active: ProductActive = product.into();

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        active.name = Set(name);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(Some(brand));
    }
    // Moving categories refreshes both denormalized name snapshots.
    if let Some(category_code) = payload.category {
        let category = find_category(state, &category_code).await?;
        active.category_id = Set(category.id);
        active.category_name = Set(category.name);
    }
    if let Some(sub_code) = payload.sub_category {
        let sub = find_subcategory(state, &sub_code).await?;
        active.sub_category_id = Set(Some(sub.id));
        active.sub_category_name = Set(Some(sub.name));
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(color) = payload.color {
        active.color = Set(Some(color));
    }
    if let Some(actual_price) = payload.actual_price {
        if actual_price < 0 {
            return Err(AppError::validation("actual_price must not be negative"));
        }
        active.actual_price = Set(actual_price);
    }
    if let Some(discount) = payload.discount {
        active.discount = Set(discount);
    }
    if let Some(selling_price) = payload.selling_price {
        if selling_price < 0 {
            return Err(AppError::validation("selling_price must not be negative"));
        }
        active.selling_price = Set(selling_price);
    }
    if let Some(list_type) = payload.list_type {
        active.list_type = Set(Some(list_type));
    }
    if let Some(images) = payload.images {
        active.images = Set(serde_json::json!(image_urls(state, images)));
    }

    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Product updated successfully",
        ProductDto::from(updated),
        None,
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    code: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let product = find_product(state, code).await?;

    let txn = state.orm.begin().await?;
    ProductQuantities::delete_many()
        .filter(StockCol::ProductId.eq(product.id))
        .exec(&txn)
        .await?;
    Products::delete_by_id(product.id).exec(&txn).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "code": code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn get_product(
    state: &AppState,
    code: &str,
) -> AppResult<ApiResponse<ProductWithStock>> {
    let product = find_product(state, code).await?;

    let stock = ProductQuantities::find()
        .filter(StockCol::ProductId.eq(product.id))
        .order_by_asc(StockCol::Size)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(StockDto::from)
        .collect();

    Ok(ApiResponse::success(
        "Product fetched successfully",
        ProductWithStock {
            product: ProductDto::from(product),
            stock,
        },
        None,
    ))
}

pub async fn list_products(
    state: &AppState,
    query: ProductListQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(category_code) = query.category.as_deref().filter(|c| !c.is_empty()) {
        let category = find_category(state, category_code).await?;
        condition = condition.add(ProductCol::CategoryId.eq(category.id));
    }
    if let Some(sub_code) = query.sub_category.as_deref().filter(|c| !c.is_empty()) {
        let sub = find_subcategory(state, sub_code).await?;
        condition = condition.add(ProductCol::SubCategoryId.eq(sub.id));
    }
    if let Some(list_type) = query.list_type.as_deref().filter(|t| !t.is_empty()) {
        condition = condition.add(ProductCol::ListType.eq(list_type));
    }

    let finder = Products::find()
        .filter(condition)
        .order_by_desc(ProductCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items: Vec<ProductDto> = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ProductDto::from)
        .collect();

    Ok(ApiResponse::success(
        "Products fetched successfully",
        ProductList {
            count: items.len(),
            items,
        },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Upserts one (product, size) stock row, then resyncs the cached total.
pub async fn update_stock(
    state: &AppState,
    user: &AuthUser,
    code: &str,
    payload: StockUpdateRequest,
) -> AppResult<ApiResponse<ProductWithStock>> {
    ensure_admin(user)?;
    if payload.size.trim().is_empty() {
        return Err(AppError::validation("size is required"));
    }
    if payload.quantity < 0 {
        return Err(AppError::validation("quantity must not be negative"));
    }

    let product = find_product(state, code).await?;

    let txn = state.orm.begin().await?;

    let existing = ProductQuantities::find()
        .filter(StockCol::ProductId.eq(product.id))
        .filter(StockCol::Size.eq(payload.size.as_str()))
        .one(&txn)
        .await?;

    match existing {
        Some(row) => {
            let mut active: StockActive = row.into();
            active.quantity = Set(payload.quantity);
            if let Some(unit) = payload.unit {
                active.unit = Set(Some(unit));
            }
            active.update(&txn).await?;
        }
        None => {
            StockActive {
                id: Set(Uuid::new_v4()),
                product_id: Set(product.id),
                size: Set(payload.size),
                unit: Set(payload.unit),
                quantity: Set(payload.quantity),
            }
            .insert(&txn)
            .await?;
        }
    }

    inventory::sync_total_quantity(&txn, product.id).await?;
    txn.commit().await?;

    get_product(state, code).await.map(|mut response| {
        response.message = "Stock updated successfully".to_string();
        response
    })
}

pub(crate) async fn find_product(
    state: &AppState,
    code: &str,
) -> AppResult<crate::entity::products::Model> {
    Products::find()
        .filter(ProductCol::Code.eq(code))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))
}
