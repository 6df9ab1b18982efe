use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{
        Invoice, InvoiceAmounts, InvoiceCustomer, InvoiceLine, InvoicePayment, OrderDto,
        OrderItemDto, OrderList, OrderWithItems, PlaceOrderRequest, UpdateOrderStatusRequest,
    },
    entity::order_items::{
        ActiveModel as OrderItemActive, Column as ItemCol, Entity as OrderItems,
    },
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    entity::product_quantities::{Column as StockCol, Entity as ProductQuantities},
    entity::products::{Column as ProductCol, Entity as Products},
    entity::transactions::{Column as TxnCol, Entity as Transactions},
    entity::users::{Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    ids::order_code,
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const ORDER_STATUSES: [&str; 5] =
    ["CREATED", "CONFIRMED", "SHIPPED", "DELIVERED", "CANCELLED"];

fn validate_order_status(status: &str) -> AppResult<()> {
    if !ORDER_STATUSES.contains(&status) {
        return Err(AppError::validation(format!(
            "status must be one of {}",
            ORDER_STATUSES.join(", ")
        )));
    }
    Ok(())
}

/// Places an order in a single transaction. Stock is locked and checked here
/// but only decremented once the payment is confirmed; the server recomputes
/// every amount from current selling prices.
pub async fn place_order(
    state: &AppState,
    user: &AuthUser,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if payload.payment_mode != "razorpay" {
        return Err(AppError::validation("payment_mode must be razorpay"));
    }
    if payload.items.is_empty() {
        return Err(AppError::validation("items must not be empty"));
    }
    for line in &payload.items {
        if line.quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }
        if line.size.trim().is_empty() {
            return Err(AppError::validation("size is required"));
        }
    }

    let txn = state.orm.begin().await?;

    let mut total_amount: i64 = 0;
    let mut resolved = Vec::with_capacity(payload.items.len());
    for line in &payload.items {
        let product = Products::find()
            .filter(ProductCol::Code.eq(line.product.as_str()))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Unknown product {}", line.product))
            })?;

        let stock = ProductQuantities::find()
            .filter(StockCol::ProductId.eq(product.id))
            .filter(StockCol::Size.eq(line.size.as_str()))
            .lock(LockType::Update)
            .one(&txn)
            .await?;

        let available = stock.map(|s| s.quantity).unwrap_or(0);
        if available < line.quantity {
            return Err(AppError::validation(format!(
                "Insufficient stock for {} ({})",
                product.code, line.size
            )));
        }

        total_amount += product.selling_price * i64::from(line.quantity);
        resolved.push((product, line));
    }

    let id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(id),
        code: Set(order_code(id)),
        user_id: Set(user.id),
        user_name: Set(user.name.clone()),
        user_email: Set(user.email.clone()),
        user_phone: Set(user.phone.clone()),
        address_building: Set(payload.address.building),
        address_line1: Set(payload.address.line1),
        address_line2: Set(payload.address.line2),
        city: Set(payload.address.city),
        district: Set(payload.address.district),
        state: Set(payload.address.state),
        pincode: Set(payload.address.pincode),
        address_type: Set(payload.address.address_type),
        payment_mode: Set(payload.payment_mode),
        payment_status: Set("PENDING".to_string()),
        order_status: Set("CREATED".to_string()),
        total_amount: Set(total_amount),
        shipped_at: Set(None),
        delivered_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(resolved.len());
    for (product, line) in resolved {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(product.id),
            size: Set(line.size.clone()),
            quantity: Set(line.quantity),
            price: Set(product.selling_price),
            total: Set(product.selling_price * i64::from(line.quantity)),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(OrderItemDto::from(item));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "order_place",
        Some("orders"),
        Some(serde_json::json!({ "code": order.code, "total_amount": total_amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order placed successfully",
        OrderWithItems {
            order: OrderDto::from(order),
            items,
        },
        None,
    ))
}

pub async fn my_orders(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    let rows = Orders::find()
        .filter(OrderCol::UserId.eq(user.id))
        .order_by_desc(OrderCol::CreatedAt)
        .find_with_related(OrderItems)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .map(|(order, items)| OrderWithItems {
            order: OrderDto::from(order),
            items: items.into_iter().map(OrderItemDto::from).collect(),
        })
        .collect();

    Ok(ApiResponse::success(
        "Orders fetched successfully",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

/// Admin listing, optionally narrowed to one customer by their display code.
pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    for_user: Option<&str>,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;

    let mut finder = Orders::find();
    if let Some(unique_id) = for_user {
        let target = Users::find()
            .filter(UserCol::UniqueId.eq(unique_id))
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        finder = finder.filter(OrderCol::UserId.eq(target.id));
    }

    let rows = finder
        .order_by_desc(OrderCol::CreatedAt)
        .find_with_related(OrderItems)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .map(|(order, items)| OrderWithItems {
            order: OrderDto::from(order),
            items: items.into_iter().map(OrderItemDto::from).collect(),
        })
        .collect();

    Ok(ApiResponse::success(
        "Orders fetched successfully",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    code: &str,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = find_order(state, code).await?;
    if order.user_id != user.id && !user.is_admin() {
        return Err(AppError::not_found("Order not found"));
    }

    let items = OrderItems::find()
        .filter(ItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItemDto::from)
        .collect();

    Ok(ApiResponse::success(
        "Order fetched successfully",
        OrderWithItems {
            order: OrderDto::from(order),
            items,
        },
        None,
    ))
}

pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    code: &str,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderDto>> {
    ensure_admin(user)?;
    validate_order_status(&payload.status)?;

    let order = find_order(state, code).await?;
    let mut active: OrderActive = order.into();
    match payload.status.as_str() {
        "SHIPPED" => active.shipped_at = Set(Some(Utc::now().into())),
        "DELIVERED" => active.delivered_at = Set(Some(Utc::now().into())),
        _ => {}
    }
    active.order_status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "code": updated.code, "status": updated.order_status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order status updated",
        OrderDto::from(updated),
        None,
    ))
}

pub async fn invoice(
    state: &AppState,
    user: &AuthUser,
    code: &str,
) -> AppResult<ApiResponse<Invoice>> {
    let order = find_order(state, code).await?;
    if order.user_id != user.id && !user.is_admin() {
        return Err(AppError::not_found("Order not found"));
    }

    let rows = OrderItems::find()
        .filter(ItemCol::OrderId.eq(order.id))
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let mut subtotal: i64 = 0;
    let items: Vec<InvoiceLine> = rows
        .into_iter()
        .map(|(item, product)| {
            subtotal += item.total;
            InvoiceLine {
                product_code: product
                    .as_ref()
                    .map(|p| p.code.clone())
                    .unwrap_or_default(),
                product_name: product.map(|p| p.name).unwrap_or_default(),
                size: item.size,
                quantity: item.quantity,
                unit_price: item.price,
                total_price: item.total,
            }
        })
        .collect();

    let latest_txn = Transactions::find()
        .filter(TxnCol::OrderId.eq(order.id))
        .order_by_desc(TxnCol::CreatedAt)
        .one(&state.orm)
        .await?;

    let payment = InvoicePayment {
        gateway: order.payment_mode.clone(),
        gateway_order_id: latest_txn.as_ref().map(|t| t.gateway_order_id.clone()),
        gateway_payment_id: latest_txn
            .as_ref()
            .and_then(|t| t.gateway_payment_id.clone()),
        status: order.payment_status.clone(),
        paid_at: latest_txn
            .filter(|t| t.status == "SUCCESS")
            .map(|t| t.updated_at.with_timezone(&Utc)),
    };

    let dto = OrderDto::from(order);
    let invoice = Invoice {
        invoice_no: format!("INV-{}", dto.code),
        order_code: dto.code.clone(),
        order_date: dto.created_at,
        order_status: dto.order_status.clone(),
        payment_status: dto.payment_status.clone(),
        customer: InvoiceCustomer {
            name: dto.user_name.clone(),
            email: dto.user_email.clone(),
            phone: dto.user_phone.clone(),
        },
        billing_address: dto.address.clone(),
        items,
        amounts: InvoiceAmounts {
            subtotal,
            tax: 0,
            discount: 0,
            grand_total: dto.total_amount,
        },
        payment,
    };

    Ok(ApiResponse::success(
        "Invoice generated successfully",
        invoice,
        None,
    ))
}

pub(crate) async fn find_order(
    state: &AppState,
    code: &str,
) -> AppResult<crate::entity::orders::Model> {
    Orders::find()
        .filter(OrderCol::Code.eq(code))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))
}

#[cfg(test)]
mod tests {
    use super::validate_order_status;

    #[test]
    fn known_statuses_accepted() {
        for status in ["CREATED", "CONFIRMED", "SHIPPED", "DELIVERED", "CANCELLED"] {
            assert!(validate_order_status(status).is_ok());
        }
    }

    #[test]
    fn unknown_statuses_rejected() {
        assert!(validate_order_status("shipped").is_err());
        assert!(validate_order_status("LOST").is_err());
        assert!(validate_order_status("").is_err());
    }
}
