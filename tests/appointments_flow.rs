mod common;

use uuid::Uuid;

use mehendi_api::{
    dto::appointments::{BookAppointmentRequest, UpdateAppointmentStatusRequest},
    entity::appointments::{AppointmentStatus, AppointmentType},
    error::AppError,
    middleware::auth::{ROLE_ADMIN, ROLE_USER},
    routes::params::{AppointmentListQuery, Pagination},
    services::appointment_service,
};

fn booking(artist: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        firstname: "Priya".into(),
        lastname: "Sharma".into(),
        email: "priya@example.com".into(),
        phone: "9123456780".into(),
        address1: "14 Lotus Street".into(),
        address2: "Near the temple".into(),
        city: "Jaipur".into(),
        district: "Jaipur".into(),
        time: "10:00".into(),
        wedding: "2026-12-01".into(),
        type_mehendi: "bridal".into(),
        design: "rajasthani".into(),
        mehendi_on: "hands and feet".into(),
        mehendi_for: "bride".into(),
        artist: artist.into(),
        appointment_type: AppointmentType::Individual,
    }
}

#[tokio::test]
async fn booking_starts_pending_and_admin_assigns_status() -> anyhow::Result<()> {
    let (state, _mailer) = common::setup_state().await?;
    let user = common::create_user(&state, "priya@example.com", ROLE_USER, true).await?;
    let admin = common::create_user(&state, "admin@example.com", ROLE_ADMIN, true).await?;

    let booked = appointment_service::book_appointment(&state, &user, booking("Neha"))
        .await?
        .into_data()
        .expect("appointment");
    assert_eq!(booked.status, AppointmentStatus::Pending);
    assert_eq!(booked.user_id, user.user_id);

    let mine = appointment_service::list_my_appointments(&state, &user, Pagination::default())
        .await?
        .into_data()
        .expect("list");
    assert_eq!(mine.items.len(), 1);

    let err = appointment_service::list_all_appointments(&state, &user, AppointmentListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // no transition rules: PENDING may jump straight to COMPLETED
    let completed = appointment_service::update_appointment_status(
        &state,
        &admin,
        booked.id,
        UpdateAppointmentStatusRequest {
            status: AppointmentStatus::Completed,
        },
    )
    .await?
    .into_data()
    .expect("appointment");
    assert_eq!(completed.status, AppointmentStatus::Completed);

    let filtered = appointment_service::list_all_appointments(
        &state,
        &admin,
        AppointmentListQuery {
            status: Some(AppointmentStatus::Pending),
            ..Default::default()
        },
    )
    .await?
    .into_data()
    .expect("list");
    assert!(filtered.items.is_empty());

    let all = appointment_service::list_all_appointments(&state, &admin, AppointmentListQuery::default())
        .await?;
    assert_eq!(all.meta.as_ref().and_then(|m| m.total), Some(1));
    Ok(())
}

#[tokio::test]
async fn status_update_errors() -> anyhow::Result<()> {
    let (state, _mailer) = common::setup_state().await?;
    let user = common::create_user(&state, "priya@example.com", ROLE_USER, true).await?;
    let admin = common::create_user(&state, "admin@example.com", ROLE_ADMIN, true).await?;

    let err = appointment_service::update_appointment_status(
        &state,
        &admin,
        Uuid::new_v4(),
        UpdateAppointmentStatusRequest {
            status: AppointmentStatus::Accepted,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let booked = appointment_service::book_appointment(&state, &user, booking("Neha"))
        .await?
        .into_data()
        .expect("appointment");
    let err = appointment_service::update_appointment_status(
        &state,
        &user,
        booked.id,
        UpdateAppointmentStatusRequest {
            status: AppointmentStatus::Accepted,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    Ok(())
}

#[tokio::test]
async fn booking_validates_contact_fields() -> anyhow::Result<()> {
    let (state, _mailer) = common::setup_state().await?;
    let user = common::create_user(&state, "priya@example.com", ROLE_USER, true).await?;

    let mut bad = booking("Neha");
    bad.phone = "abc".into();
    assert!(matches!(
        appointment_service::book_appointment(&state, &user, bad).await.unwrap_err(),
        AppError::Validation(_)
    ));

    let mut blank = booking("  ");
    blank.city = "Jaipur".into();
    assert!(matches!(
        appointment_service::book_appointment(&state, &user, blank).await.unwrap_err(),
        AppError::Validation(_)
    ));
    Ok(())
}
