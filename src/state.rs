use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, gateway::razorpay::RazorpayClient, token::TokenCodec};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub config: AppConfig,
    pub tokens: TokenCodec,
    pub gateway: RazorpayClient,
}
