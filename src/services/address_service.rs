use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::addresses::{AddressDto, AddressList, AddressPayload},
    entity::addresses::{ActiveModel as AddressActive, Column as AddrCol, Entity as Addresses},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

const ADDRESS_TYPES: [&str; 2] = ["home", "work"];

fn validate_payload(payload: &AddressPayload) -> AppResult<()> {
    for (value, field) in [
        (&payload.name, "name"),
        (&payload.phone, "phone"),
        (&payload.building, "building"),
        (&payload.line1, "line1"),
        (&payload.city, "city"),
        (&payload.district, "district"),
        (&payload.state, "state"),
        (&payload.pincode, "pincode"),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::validation(format!("{field} is required")));
        }
    }
    if !ADDRESS_TYPES.contains(&payload.address_type.as_str()) {
        return Err(AppError::validation("address_type must be home or work"));
    }
    Ok(())
}

pub async fn add_address(
    state: &AppState,
    user: &AuthUser,
    payload: AddressPayload,
) -> AppResult<ApiResponse<AddressDto>> {
    validate_payload(&payload)?;

    let address = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        name: Set(payload.name),
        phone: Set(payload.phone),
        building: Set(payload.building),
        line1: Set(payload.line1),
        line2: Set(payload.line2),
        city: Set(payload.city),
        district: Set(payload.district),
        state: Set(payload.state),
        pincode: Set(payload.pincode),
        landmark: Set(payload.landmark),
        address_type: Set(payload.address_type),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Address added successfully",
        AddressDto::from(address),
        None,
    ))
}

pub async fn list_addresses(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AddressList>> {
    let items = Addresses::find()
        .filter(AddrCol::UserId.eq(user.id))
        .order_by_desc(AddrCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(AddressDto::from)
        .collect();

    Ok(ApiResponse::success(
        "Addresses fetched successfully",
        AddressList { items },
        Some(Meta::empty()),
    ))
}

pub async fn update_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AddressPayload,
) -> AppResult<ApiResponse<AddressDto>> {
    validate_payload(&payload)?;

    let address = Addresses::find()
        .filter(
            Condition::all()
                .add(AddrCol::Id.eq(id))
                .add(AddrCol::UserId.eq(user.id)),
        )
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Address not found"))?;

    let mut active: AddressActive = address.into();
    active.name = Set(payload.name);
    active.phone = Set(payload.phone);
    active.building = Set(payload.building);
    active.line1 = Set(payload.line1);
    active.line2 = Set(payload.line2);
    active.city = Set(payload.city);
    active.district = Set(payload.district);
    active.state = Set(payload.state);
    active.pincode = Set(payload.pincode);
    active.landmark = Set(payload.landmark);
    active.address_type = Set(payload.address_type);
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Address updated successfully",
        AddressDto::from(updated),
        None,
    ))
}

pub async fn delete_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Addresses::delete_many()
        .filter(
            Condition::all()
                .add(AddrCol::Id.eq(id))
                .add(AddrCol::UserId.eq(user.id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Address not found"));
    }

    Ok(ApiResponse::success(
        "Address deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
