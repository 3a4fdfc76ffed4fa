use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        appointments::{AppointmentList, BookAppointmentRequest, UpdateAppointmentStatusRequest},
        auth::{SendCodeRequest, SigninRequest, SigninResponse, SignupRequest, VerifyEmailRequest},
        cart::{CartItemRequest, CartList},
        password_reset::{CompleteResetRequest, RequestResetRequest, ResetCompleted},
        profile::UpdateProfileRequest,
    },
    entity::{
        appointments::{AppointmentStatus, AppointmentType},
        otps::OtpPurpose,
    },
    error::ErrorData,
    models::{Appointment, CartItem, OtpHandle, UserProfile},
    response::{ApiResponse, Meta},
    routes::{
        admin, appointments, auth, cart, email_verification, health, params, password_reset,
        profile,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signup,
        auth::signin,
        email_verification::send_code,
        email_verification::verify,
        password_reset::request_reset,
        password_reset::complete_reset,
        profile::get_profile,
        profile::update_profile,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        appointments::book_appointment,
        appointments::list_my_appointments,
        admin::list_all_appointments,
        admin::update_appointment_status
    ),
    components(
        schemas(
            UserProfile,
            CartItem,
            OtpHandle,
            OtpPurpose,
            Appointment,
            AppointmentStatus,
            AppointmentType,
            SignupRequest,
            SigninRequest,
            SigninResponse,
            SendCodeRequest,
            VerifyEmailRequest,
            RequestResetRequest,
            CompleteResetRequest,
            ResetCompleted,
            UpdateProfileRequest,
            CartItemRequest,
            CartList,
            BookAppointmentRequest,
            UpdateAppointmentStatusRequest,
            AppointmentList,
            params::Pagination,
            params::SortOrder,
            ErrorData,
            Meta,
            ApiResponse<UserProfile>,
            ApiResponse<CartList>,
            ApiResponse<AppointmentList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Signup and signin"),
        (name = "Email verification", description = "Email ownership codes"),
        (name = "Password reset", description = "OTP-gated password reset"),
        (name = "Profile", description = "Caller profile"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Appointments", description = "Appointment booking"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
