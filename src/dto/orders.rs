use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{order_items, orders};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderAddress {
    pub building: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    /// home | work
    pub address_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    /// Product display code.
    pub product: String,
    pub size: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    /// Only "razorpay" is accepted.
    pub payment_mode: String,
    pub address: OrderAddress,
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDto {
    pub id: Uuid,
    pub code: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub address: OrderAddress,
    pub payment_mode: String,
    pub payment_status: String,
    pub order_status: String,
    pub total_amount: i64,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<orders::Model> for OrderDto {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            user_id: model.user_id,
            user_name: model.user_name,
            user_email: model.user_email,
            user_phone: model.user_phone,
            address: OrderAddress {
                building: model.address_building,
                line1: model.address_line1,
                line2: model.address_line2,
                city: model.city,
                district: model.district,
                state: model.state,
                pincode: model.pincode,
                address_type: model.address_type,
            },
            payment_mode: model.payment_mode,
            payment_status: model.payment_status,
            order_status: model.order_status,
            total_amount: model.total_amount,
            shipped_at: model.shipped_at.map(|dt| dt.with_timezone(&Utc)),
            delivered_at: model.delivered_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub size: String,
    pub quantity: i32,
    pub price: i64,
    pub total: i64,
}

impl From<order_items::Model> for OrderItemDto {
    fn from(model: order_items::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            size: model.size,
            quantity: model.quantity,
            price: model.price,
            total: model.total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: OrderDto,
    pub items: Vec<OrderItemDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderWithItems>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// CREATED | CONFIRMED | SHIPPED | DELIVERED | CANCELLED
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceLine {
    pub product_code: String,
    pub product_name: String,
    pub size: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub total_price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceAmounts {
    pub subtotal: i64,
    pub tax: i64,
    pub discount: i64,
    pub grand_total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoicePayment {
    pub gateway: String,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Invoice {
    pub invoice_no: String,
    pub order_code: String,
    pub order_date: DateTime<Utc>,
    pub order_status: String,
    pub payment_status: String,
    pub customer: InvoiceCustomer,
    pub billing_address: OrderAddress,
    pub items: Vec<InvoiceLine>,
    pub amounts: InvoiceAmounts,
    pub payment: InvoicePayment,
}
