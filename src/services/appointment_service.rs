use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::appointments::{AppointmentList, BookAppointmentRequest, UpdateAppointmentStatusRequest},
    entity::appointments::{
        ActiveModel as AppointmentActive, AppointmentStatus, Column as AppointmentCol,
        Entity as Appointments,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Appointment,
    response::{ApiResponse, Meta},
    routes::params::{AppointmentListQuery, Pagination, SortOrder},
    state::AppState,
    validation::{Email, Phone, non_empty},
};

pub async fn book_appointment(
    state: &AppState,
    user: &AuthUser,
    payload: BookAppointmentRequest,
) -> AppResult<ApiResponse<Appointment>> {
    let email = Email::parse(&payload.email)?;
    let phone = Phone::parse(&payload.phone)?;

    let active = AppointmentActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        firstname: Set(non_empty("firstname", &payload.firstname)?),
        lastname: Set(non_empty("lastname", &payload.lastname)?),
        email: Set(email.into_inner()),
        phone: Set(phone.into_inner()),
        address1: Set(non_empty("address1", &payload.address1)?),
        address2: Set(non_empty("address2", &payload.address2)?),
        city: Set(non_empty("city", &payload.city)?),
        district: Set(non_empty("district", &payload.district)?),
        time: Set(non_empty("time", &payload.time)?),
        wedding: Set(non_empty("wedding", &payload.wedding)?),
        type_mehendi: Set(non_empty("type_mehendi", &payload.type_mehendi)?),
        design: Set(non_empty("design", &payload.design)?),
        mehendi_on: Set(non_empty("mehendi_on", &payload.mehendi_on)?),
        mehendi_for: Set(non_empty("mehendi_for", &payload.mehendi_for)?),
        artist: Set(non_empty("artist", &payload.artist)?),
        appointment_type: Set(payload.appointment_type),
        status: Set(AppointmentStatus::Pending),
        created_at: Set(Utc::now().into()),
    };
    let appointment = active.insert(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "appointment_booked",
        "appointments",
        serde_json::json!({ "appointment_id": appointment.id }),
    )
    .await;

    Ok(ApiResponse::success("Appointment booked", appointment.into(), None))
}

pub async fn list_my_appointments(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<AppointmentList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Appointments::find()
        .filter(AppointmentCol::UserId.eq(user.user_id))
        .order_by_desc(AppointmentCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Appointment::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        AppointmentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn list_all_appointments(
    state: &AppState,
    user: &AuthUser,
    query: AppointmentListQuery,
) -> AppResult<ApiResponse<AppointmentList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(AppointmentCol::Status.eq(status));
    }

    let mut finder = Appointments::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(AppointmentCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(AppointmentCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Appointment::from)
        .collect();

    Ok(ApiResponse::success(
        "Appointments",
        AppointmentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Direct assignment; any status may follow any other.
pub async fn update_appointment_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateAppointmentStatusRequest,
) -> AppResult<ApiResponse<Appointment>> {
    ensure_admin(user)?;

    let appointment = Appointments::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let previous = appointment.status;
    let mut active: AppointmentActive = appointment.into();
    active.status = Set(payload.status);
    let appointment = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "appointment_status",
        "appointments",
        serde_json::json!({
            "appointment_id": appointment.id,
            "from": previous,
            "to": appointment.status,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Appointment status updated",
        appointment.into(),
        Some(Meta::empty()),
    ))
}
