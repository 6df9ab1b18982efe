use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Base64-encoded 32-byte key for the opaque session tokens.
    pub token_key: String,
    pub razorpay: RazorpayConfig,
    /// Public base URL prepended to stored image object keys.
    pub asset_base_url: String,
}

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
    pub base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let token_key = env::var("TOKEN_KEY")?;
        let razorpay = RazorpayConfig {
            key_id: env::var("RAZORPAY_KEY_ID")?,
            key_secret: env::var("RAZORPAY_KEY_SECRET")?,
            webhook_secret: env::var("RAZORPAY_WEBHOOK_SECRET")?,
            base_url: env::var("RAZORPAY_BASE_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com".to_string()),
        };
        let asset_base_url = env::var("ASSET_BASE_URL")
            .unwrap_or_else(|_| "https://assets.example.com".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            token_key,
            razorpay,
            asset_base_url,
        })
    }
}
