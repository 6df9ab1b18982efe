use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::payments::{
        CheckoutPayload, CheckoutPrefill, CheckoutRequest, CreateGatewayOrderRequest,
        CreateGatewayOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse, WebhookEvent,
    },
    entity::order_items::{Column as ItemCol, Entity as OrderItems},
    entity::orders::{ActiveModel as OrderActive, Entity as Orders},
    entity::product_quantities::{
        ActiveModel as StockActive, Column as StockCol, Entity as ProductQuantities,
    },
    entity::transactions::{ActiveModel as TxnActive, Column as TxnCol, Entity as Transactions},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::{inventory, order_service::find_order},
    state::AppState,
};

const STORE_NAME: &str = "Storefront";

pub async fn create_gateway_order(
    state: &AppState,
    _user: &AuthUser,
    payload: CreateGatewayOrderRequest,
) -> AppResult<ApiResponse<CreateGatewayOrderResponse>> {
    if payload.amount < 1 {
        return Err(AppError::validation("amount must be at least 1"));
    }

    let receipt = Uuid::new_v4().to_string();
    let gateway_order = state
        .gateway
        .create_order(payload.amount, "INR", &receipt)
        .await?;

    Ok(ApiResponse::success(
        "Gateway order created",
        CreateGatewayOrderResponse {
            gateway_order_id: gateway_order.id,
            amount: gateway_order.amount,
            currency: gateway_order.currency,
        },
        None,
    ))
}

/// Creates a gateway order for a pending local order and hands back the
/// payload the checkout widget needs. The amount always comes from the stored
/// order, never from the client.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutPayload>> {
    let order = find_order(state, &payload.order).await?;
    if order.user_id != user.id {
        return Err(AppError::not_found("Order not found"));
    }
    if order.payment_status != "PENDING" {
        return Err(AppError::validation("Order is not awaiting payment"));
    }

    let gateway_order = state
        .gateway
        .create_order(order.total_amount, "INR", &order.code)
        .await?;

    TxnActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        user_id: Set(order.user_id),
        gateway_order_id: Set(gateway_order.id.clone()),
        gateway_payment_id: Set(None),
        gateway_signature: Set(None),
        amount: Set(order.total_amount),
        status: Set("CREATED".to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Checkout initialized",
        CheckoutPayload {
            key: state.gateway.key_id().to_string(),
            gateway_order_id: gateway_order.id,
            amount: order.total_amount,
            currency: gateway_order.currency,
            name: STORE_NAME.to_string(),
            prefill: CheckoutPrefill {
                name: order.user_name,
                email: order.user_email,
                contact: order.user_phone,
            },
            order_code: order.code,
        },
        None,
    ))
}

/// Client-side callback path: the signature must verify before anything is
/// touched; a bad signature never changes payment state.
pub async fn verify_payment(
    state: &AppState,
    user: &AuthUser,
    payload: VerifyPaymentRequest,
) -> AppResult<ApiResponse<VerifyPaymentResponse>> {
    state.gateway.verify_payment_signature(
        &payload.gateway_order_id,
        &payload.gateway_payment_id,
        &payload.gateway_signature,
    )?;

    let response = confirm_payment(
        state,
        &payload.gateway_order_id,
        Some(payload.gateway_payment_id),
        Some(payload.gateway_signature),
    )
    .await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "payment_verified",
        Some("transactions"),
        Some(serde_json::json!({ "order_code": response.order_code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment verified successfully",
        response,
        None,
    ))
}

/// Confirms a payment in a single transaction: the gateway transaction row
/// and the order are locked, every stock row is locked and decremented, and
/// the cached totals are resynced. Re-delivery of an already-confirmed
/// payment is a no-op.
pub async fn confirm_payment(
    state: &AppState,
    gateway_order_id: &str,
    gateway_payment_id: Option<String>,
    gateway_signature: Option<String>,
) -> AppResult<VerifyPaymentResponse> {
    let txn = state.orm.begin().await?;

    let gateway_txn = Transactions::find()
        .filter(TxnCol::GatewayOrderId.eq(gateway_order_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;

    let order = Orders::find_by_id(gateway_txn.order_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    if gateway_txn.status == "SUCCESS" {
        txn.commit().await?;
        return Ok(VerifyPaymentResponse {
            order_code: order.code,
            payment_status: order.payment_status,
            order_status: order.order_status,
        });
    }

    let items = OrderItems::find()
        .filter(ItemCol::OrderId.eq(order.id))
        .all(&txn)
        .await?;

    for item in &items {
        let stock = ProductQuantities::find()
            .filter(StockCol::ProductId.eq(item.product_id))
            .filter(StockCol::Size.eq(item.size.as_str()))
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .filter(|s| s.quantity >= item.quantity)
            .ok_or_else(|| {
                AppError::validation(format!("Insufficient stock for size {}", item.size))
            })?;

        let remaining = stock.quantity - item.quantity;
        let mut active: StockActive = stock.into();
        active.quantity = Set(remaining);
        active.update(&txn).await?;
    }
    for item in &items {
        inventory::sync_total_quantity(&txn, item.product_id).await?;
    }

    let mut txn_active: TxnActive = gateway_txn.into();
    txn_active.status = Set("SUCCESS".to_string());
    txn_active.gateway_payment_id = Set(gateway_payment_id);
    txn_active.gateway_signature = Set(gateway_signature);
    txn_active.updated_at = Set(Utc::now().into());
    txn_active.update(&txn).await?;

    let order_id = order.id;
    let mut order_active: OrderActive = order.into();
    order_active.payment_status = Set("SUCCESS".to_string());
    order_active.order_status = Set("CONFIRMED".to_string());
    order_active.updated_at = Set(Utc::now().into());
    let order = order_active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.orm,
        None,
        "payment_confirmed",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order_id, "code": order.code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(VerifyPaymentResponse {
        order_code: order.code,
        payment_status: order.payment_status,
        order_status: order.order_status,
    })
}

pub async fn mark_failed(state: &AppState, gateway_order_id: &str) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    let gateway_txn = Transactions::find()
        .filter(TxnCol::GatewayOrderId.eq(gateway_order_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;

    // A confirmed payment is never downgraded by a late failure event.
    if gateway_txn.status == "SUCCESS" {
        txn.commit().await?;
        return Ok(());
    }

    let order_id = gateway_txn.order_id;
    let mut txn_active: TxnActive = gateway_txn.into();
    txn_active.status = Set("FAILED".to_string());
    txn_active.updated_at = Set(Utc::now().into());
    txn_active.update(&txn).await?;

    let order = Orders::find_by_id(order_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    let mut order_active: OrderActive = order.into();
    order_active.payment_status = Set("FAILED".to_string());
    order_active.updated_at = Set(Utc::now().into());
    order_active.update(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Webhook entry point. The raw body must carry a valid HMAC signature; the
/// handler passes the header value and untouched bytes straight through.
pub async fn handle_webhook(
    state: &AppState,
    body: &[u8],
    signature: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.gateway.verify_webhook_signature(body, signature)?;

    let event: WebhookEvent = serde_json::from_slice(body)
        .map_err(|_| AppError::validation("Malformed webhook body"))?;

    let payment = &event.payload["payment"]["entity"];
    let gateway_order_id = payment["order_id"].as_str();
    let gateway_payment_id = payment["id"].as_str().map(|s| s.to_string());

    match event.event.as_str() {
        "payment.captured" => {
            let gateway_order_id = gateway_order_id
                .ok_or_else(|| AppError::validation("Webhook payload missing order_id"))?;
            confirm_payment(state, gateway_order_id, gateway_payment_id, None).await?;
        }
        "payment.failed" => {
            let gateway_order_id = gateway_order_id
                .ok_or_else(|| AppError::validation("Webhook payload missing order_id"))?;
            mark_failed(state, gateway_order_id).await?;
        }
        other => {
            tracing::debug!(event = other, "ignoring webhook event");
        }
    }

    Ok(ApiResponse::success(
        "Webhook processed",
        serde_json::json!({}),
        None,
    ))
}
