use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::products::ProductDto,
    dto::wishlist::{AddToWishlistRequest, WishlistLine, WishlistList},
    entity::wishlist_items::{
        ActiveModel as WishlistActive, Column as WishCol, Entity as WishlistItems,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::product_service::find_product,
    state::AppState,
};

pub async fn add_to_wishlist(
    state: &AppState,
    user: &AuthUser,
    payload: AddToWishlistRequest,
) -> AppResult<ApiResponse<WishlistList>> {
    let product = find_product(state, &payload.product).await?;

    let exists = WishlistItems::find()
        .filter(WishCol::UserId.eq(user.id))
        .filter(WishCol::ProductId.eq(product.id))
        .one(&state.orm)
        .await?
        .is_some();
    if exists {
        return Err(AppError::conflict("Product already in wishlist"));
    }

    WishlistActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        product_id: Set(product.id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    list_wishlist(state, user).await.map(|mut response| {
        response.message = "Product added to wishlist".to_string();
        response
    })
}

pub async fn list_wishlist(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<WishlistList>> {
    let rows = WishlistItems::find()
        .filter(WishCol::UserId.eq(user.id))
        .order_by_desc(WishCol::CreatedAt)
        .find_also_related(crate::entity::Products)
        .all(&state.orm)
        .await?;

    let items: Vec<WishlistLine> = rows
        .into_iter()
        .filter_map(|(line, product)| {
            product.map(|product| WishlistLine {
                id: line.id,
                product: ProductDto::from(product),
                created_at: line.created_at.with_timezone(&chrono::Utc),
            })
        })
        .collect();

    Ok(ApiResponse::success(
        "Wishlist fetched successfully",
        WishlistList {
            count: items.len(),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_wishlist(
    state: &AppState,
    user: &AuthUser,
    product_code: &str,
) -> AppResult<ApiResponse<WishlistList>> {
    let product = find_product(state, product_code).await?;

    let result = WishlistItems::delete_many()
        .filter(WishCol::UserId.eq(user.id))
        .filter(WishCol::ProductId.eq(product.id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Product is not in the wishlist"));
    }

    list_wishlist(state, user).await.map(|mut response| {
        response.message = "Product removed from wishlist".to_string();
        response
    })
}
