use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::products::ProductDto;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToWishlistRequest {
    /// Product display code.
    pub product: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistLine {
    pub id: Uuid,
    pub product: ProductDto,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistList {
    pub count: usize,
    pub items: Vec<WishlistLine>,
}
