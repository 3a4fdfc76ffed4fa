use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::appointments::{AppointmentList, BookAppointmentRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Appointment,
    response::ApiResponse,
    routes::params::Pagination,
    services::appointment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_my_appointments).post(book_appointment))
}

#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    request_body = BookAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked as PENDING", body = ApiResponse<Appointment>),
        (status = 400, description = "Invalid input")
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn book_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BookAppointmentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Appointment>>)> {
    let resp = appointment_service::book_appointment(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    params(Pagination),
    responses(
        (status = 200, description = "Caller's appointments, newest first", body = ApiResponse<AppointmentList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn list_my_appointments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<AppointmentList>>> {
    let resp = appointment_service::list_my_appointments(&state, &user, pagination).await?;
    Ok(Json(resp))
}
