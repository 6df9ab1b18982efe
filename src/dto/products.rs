use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{product_quantities, products};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub brand: Option<String>,
    /// Category display code.
    pub category: String,
    /// Optional subcategory display code.
    pub sub_category: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    /// Prices in minor units (paise).
    pub actual_price: i64,
    pub discount: Option<i64>,
    pub selling_price: i64,
    pub list_type: Option<String>,
    /// Object-storage keys; public URLs are built from the asset base URL.
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub actual_price: Option<i64>,
    pub discount: Option<i64>,
    pub selling_price: Option<i64>,
    pub list_type: Option<String>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub brand: Option<String>,
    pub category_id: Uuid,
    pub category_name: String,
    pub sub_category_id: Option<Uuid>,
    pub sub_category_name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub actual_price: i64,
    pub discount: i64,
    pub selling_price: i64,
    pub list_type: Option<String>,
    pub images: Vec<String>,
    pub total_quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<products::Model> for ProductDto {
    fn from(model: products::Model) -> Self {
        let images = serde_json::from_value(model.images).unwrap_or_default();
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            brand: model.brand,
            category_id: model.category_id,
            category_name: model.category_name,
            sub_category_id: model.sub_category_id,
            sub_category_name: model.sub_category_name,
            description: model.description,
            color: model.color,
            actual_price: model.actual_price,
            discount: model.discount,
            selling_price: model.selling_price,
            list_type: model.list_type,
            images,
            total_quantity: model.total_quantity,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub count: usize,
    pub items: Vec<ProductDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockUpdateRequest {
    pub size: String,
    pub unit: Option<String>,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockDto {
    pub size: String,
    pub unit: Option<String>,
    pub quantity: i32,
}

impl From<product_quantities::Model> for StockDto {
    fn from(model: product_quantities::Model) -> Self {
        Self {
            size: model.size,
            unit: model.unit,
            quantity: model.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductWithStock {
    pub product: ProductDto,
    pub stock: Vec<StockDto>,
}
