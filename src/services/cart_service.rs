use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartLine, CartList},
    dto::products::ProductDto,
    entity::cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::product_service::find_product,
    state::AppState,
};

/// Adding a product already in the cart bumps the existing line's quantity.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartList>> {
    let quantity = payload.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::validation("quantity must be at least 1"));
    }

    let product = find_product(state, &payload.product).await?;

    let existing = CartItems::find()
        .filter(CartCol::UserId.eq(user.id))
        .filter(CartCol::ProductId.eq(product.id))
        .one(&state.orm)
        .await?;

    match existing {
        Some(line) => {
            let new_quantity = line.quantity + quantity;
            let mut active: CartActive = line.into();
            active.quantity = Set(new_quantity);
            active.update(&state.orm).await?;
        }
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.id),
                product_id: Set(product.id),
                quantity: Set(quantity),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?;
        }
    }

    list_cart(state, user).await.map(|mut response| {
        response.message = "Product added to cart".to_string();
        response
    })
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.id))
        .order_by_desc(CartCol::CreatedAt)
        .find_also_related(crate::entity::Products)
        .all(&state.orm)
        .await?;

    let items: Vec<CartLine> = rows
        .into_iter()
        .filter_map(|(line, product)| {
            product.map(|product| CartLine {
                id: line.id,
                quantity: line.quantity,
                product: ProductDto::from(product),
                created_at: line.created_at.with_timezone(&chrono::Utc),
            })
        })
        .collect();

    Ok(ApiResponse::success(
        "Cart fetched successfully",
        CartList {
            count: items.len(),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Removes the whole line regardless of its quantity.
pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_code: &str,
) -> AppResult<ApiResponse<CartList>> {
    let product = find_product(state, product_code).await?;

    let result = CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.id))
        .filter(CartCol::ProductId.eq(product.id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Product is not in the cart"));
    }

    list_cart(state, user).await.map(|mut response| {
        response.message = "Product removed from cart".to_string();
        response
    })
}
