use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};

use crate::{
    dto::payments::{
        CheckoutPayload, CheckoutRequest, CreateGatewayOrderRequest, CreateGatewayOrderResponse,
        VerifyPaymentRequest, VerifyPaymentResponse,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order", post(create_gateway_order))
        .route("/checkout", post(checkout))
        .route("/verify", post(verify_payment))
        .route("/webhook", post(webhook))
}

#[utoipa::path(
    post,
    path = "/api/payments/order",
    request_body = CreateGatewayOrderRequest,
    responses(
        (status = 200, description = "Gateway order created", body = ApiResponse<CreateGatewayOrderResponse>),
        (status = 502, description = "Payment gateway error"),
    ),
    tag = "Payments"
)]
pub async fn create_gateway_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateGatewayOrderRequest>,
) -> AppResult<Json<ApiResponse<CreateGatewayOrderResponse>>> {
    Ok(Json(
        payment_service::create_gateway_order(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/payments/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout payload", body = ApiResponse<CheckoutPayload>),
        (status = 400, description = "Order is not awaiting payment"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Payments"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutPayload>>> {
    Ok(Json(
        payment_service::checkout(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/payments/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified", body = ApiResponse<VerifyPaymentResponse>),
        (status = 400, description = "Signature verification failed"),
    ),
    tag = "Payments"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<Json<ApiResponse<VerifyPaymentResponse>>> {
    Ok(Json(
        payment_service::verify_payment(&state, &user, payload).await?,
    ))
}

/// Unauthenticated but signature-gated; the body must stay raw bytes so the
/// HMAC is computed over exactly what the gateway sent.
#[utoipa::path(
    post,
    path = "/api/payments/webhook",
    request_body(content = Vec<u8>, content_type = "application/json"),
    responses(
        (status = 200, description = "Webhook processed"),
        (status = 401, description = "Missing or invalid signature"),
    ),
    tag = "Payments"
)]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let signature = headers
        .get("X-Razorpay-Signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthenticated("Missing webhook signature"))?;

    Ok(Json(
        payment_service::handle_webhook(&state, &body, signature).await?,
    ))
}
