use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::appointments::{AppointmentStatus, AppointmentType},
    models::Appointment,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BookAppointmentRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub district: String,
    pub time: String,
    pub wedding: String,
    pub type_mehendi: String,
    pub design: String,
    pub mehendi_on: String,
    pub mehendi_for: String,
    pub artist: String,
    #[serde(default)]
    pub appointment_type: AppointmentType,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentList {
    pub items: Vec<Appointment>,
}
