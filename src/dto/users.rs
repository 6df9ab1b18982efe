use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::users;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    pub unique_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_type: String,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<users::Model> for UserProfile {
    fn from(model: users::Model) -> Self {
        Self {
            unique_id: model.unique_id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            user_type: model.user_type,
            last_login_at: model.last_login_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<UserProfile>,
}
