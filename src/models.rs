use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    appointments::{self, AppointmentStatus, AppointmentType},
    cart_items,
    otps::OtpPurpose,
    users,
};

/// A user as clients see it; carries no password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub verified: bool,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<users::Model> for UserProfile {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            fullname: model.fullname,
            email: model.email,
            phone: model.phone,
            address: model.address,
            verified: model.verified,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub product: String,
    pub quantity: i32,
    pub customized: Option<String>,
    pub content_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<cart_items::Model> for CartItem {
    fn from(model: cart_items::Model) -> Self {
        Self {
            id: model.id,
            product: model.product,
            quantity: model.quantity,
            customized: model.customized,
            content_message: model.content_message,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Proof that a code was issued. Never carries the code itself.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OtpHandle {
    pub email: String,
    pub purpose: OtpPurpose,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<appointments::Model> for Appointment {
    fn from(model: appointments::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            firstname: model.firstname,
            lastname: model.lastname,
            email: model.email,
            phone: model.phone,
            address1: model.address1,
            address2: model.address2,
            city: model.city,
            district: model.district,
            time: model.time,
            wedding: model.wedding,
            type_mehendi: model.type_mehendi,
            design: model.design,
            mehendi_on: model.mehendi_on,
            mehendi_for: model.mehendi_for,
            artist: model.artist,
            appointment_type: model.appointment_type,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
