mod common;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use mehendi_api::{
    mailer::MemoryMailer,
    middleware::auth::{ROLE_USER, issue_token},
    routes::build_app,
    state::AppState,
};

async fn app() -> anyhow::Result<(Router, AppState, MemoryMailer)> {
    let (state, mailer) = common::setup_state().await?;
    Ok((build_app(state.clone()), state, mailer))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

#[tokio::test]
async fn cart_requires_a_bearer_token() -> anyhow::Result<()> {
    let (app, _state, _mailer) = app().await?;

    let (status, body) = send(&app, Method::GET, "/api/v1/user/cart", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"]["code"], "unauthorized");

    let (status, _) = send(&app, Method::GET, "/api/v1/user/cart", Some("Bearer not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/v1/user/cart", Some("Basic abc"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn signup_verify_signin_and_shop() -> anyhow::Result<()> {
    let (app, _state, mailer) = app().await?;
    let email = "kavya@example.com";

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/user/signup",
        None,
        Some(json!({
            "fullname": "Kavya Iyer",
            "email": email,
            "password": "peacock-motif",
            "phone": "9988776655"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["verified"], false);
    assert!(body["data"].get("password_hash").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/user/signin",
        None,
        Some(json!({ "email": email, "password": "peacock-motif" })),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["data"]["code"], "unverified");

    let code = mailer.last_code_for(email).expect("verification code");
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/email_verification/verify",
        None,
        Some(json!({ "email": email, "otp": code })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/user/signin",
        None,
        Some(json!({ "email": email, "password": "peacock-motif" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().expect("token").to_string();

    let (status, body) = send(&app, Method::GET, "/api/v1/user/profile", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], email);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/user/cart",
        Some(&token),
        Some(json!({ "product": "Arabic Design Kit", "quantity": 1, "customized": "Leaf border" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let item_id = body["data"]["id"].as_str().expect("id").to_string();

    let (status, body) = send(&app, Method::GET, "/api/v1/user/cart", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["items"][0]["product"], "Arabic Design Kit");
    assert_eq!(body["meta"]["total"], 1);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/user/cart/{}", Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["code"], "not_found");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/user/cart/{item_id}"),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn forgot_password_over_http() -> anyhow::Result<()> {
    let (app, state, mailer) = app().await?;
    let email = "forgetful@example.com";
    common::create_user(&state, email, ROLE_USER, true).await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/forgot_password",
        None,
        Some(json!({ "email": email })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["purpose"], "password_reset");
    assert!(body["data"].get("code").is_none());

    let code = mailer.last_code_for(email).expect("reset code");
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/forgot_password/reset",
        None,
        Some(json!({ "email": email, "otp": code, "newPassword": "tiny" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "weak_password");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/forgot_password/reset",
        None,
        Some(json!({ "email": email, "otp": code, "newPassword": "long-enough-now" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/forgot_password/reset",
        None,
        Some(json!({ "email": email, "otp": code, "newPassword": "long-enough-again" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "invalid_code");
    Ok(())
}

#[tokio::test]
async fn admin_routes_are_forbidden_to_customers() -> anyhow::Result<()> {
    let (app, state, _mailer) = app().await?;
    let user = common::create_user(&state, "shopper@example.com", ROLE_USER, true).await?;
    let token = format!(
        "Bearer {}",
        issue_token(&state.auth, user.user_id, &user.role)?
    );

    let (status, body) = send(&app, Method::GET, "/api/v1/admin/appointments", Some(&token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["data"]["code"], "forbidden");
    Ok(())
}

#[tokio::test]
async fn unknown_paths_and_request_ids() -> anyhow::Result<()> {
    let (app, _state, _mailer) = app().await?;

    let (status, body) = send(&app, Method::GET, "/api/v1/nowhere", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/api/v1/nowhere");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    Ok(())
}
