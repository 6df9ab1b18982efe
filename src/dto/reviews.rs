use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::reviews;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitReviewRequest {
    /// Product display code.
    pub product: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// 1..=5
    pub rating: i16,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminReviewRequest {
    pub product: String,
    pub name: String,
    pub email: String,
    pub rating: i16,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewDto {
    pub id: Uuid,
    pub code: String,
    pub product_id: Uuid,
    pub user_id: Option<Uuid>,
    pub is_admin: bool,
    pub reviewer_name: Option<String>,
    pub reviewer_email: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<reviews::Model> for ReviewDto {
    fn from(model: reviews::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            product_id: model.product_id,
            user_id: model.user_id,
            is_admin: model.is_admin,
            reviewer_name: model.reviewer_name,
            reviewer_email: model.reviewer_email,
            title: model.title,
            description: model.description,
            rating: model.rating,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub count: usize,
    pub items: Vec<ReviewDto>,
}
