use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::addresses;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddressPayload {
    pub name: String,
    pub phone: String,
    pub building: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    pub landmark: Option<String>,
    /// home | work
    pub address_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressDto {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub building: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    pub landmark: Option<String>,
    pub address_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<addresses::Model> for AddressDto {
    fn from(model: addresses::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            phone: model.phone,
            building: model.building,
            line1: model.line1,
            line2: model.line2,
            city: model.city,
            district: model.district,
            state: model.state,
            pincode: model.pincode,
            landmark: model.landmark,
            address_type: model.address_type,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressList {
    pub items: Vec<AddressDto>,
}
