pub mod change_password;
pub mod forgot_password;
pub mod guard;
pub mod login;
pub mod profile;
pub mod register;
pub mod verify_email;
pub mod verify_otp;

use std::sync::Arc;
use axum::{Json, Router};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use serde::Serialize;
use crate::db;
use crate::utils::context::ServiceContext;
use crate::utils::errors::RoostError;
use guard::AuthAccount;

///
/// The envelope every plain endpoint responds with.
///
#[derive(Clone, Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: &str) -> Self {
        ApiMessage { success: true, message: message.to_string() }
    }

    pub fn failed(message: &str) -> Self {
        ApiMessage { success: false, message: message.to_string() }
    }
}

///
/// Wire every endpoint to its service module.
///
/// The handlers below only unpack the request and shape the response - all
/// the behaviour lives in the modules above, where tests can reach it
/// without an HTTP stack.
///
pub fn router(ctx: Arc<ServiceContext>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/user/create", post(create_user))
        .route("/api/user/login", post(login_user))
        .route("/api/user/change_password", post(change_password))
        .route("/api/user/forgot_password", post(forgot_password))
        .route("/api/user/verify_otp", post(verify_otp))
        .route("/api/user/verifyEmail/{token}", put(verify_email))
        .route("/api/user/profile/get", get(get_current_profile))
        .with_state(ctx)
}

async fn health(State(ctx): State<Arc<ServiceContext>>) -> Result<Json<ApiMessage>, RoostError> {
    db::mongo::ping(ctx.db()).await?;
    Ok(Json(ApiMessage::ok("OK")))
}

async fn create_user(State(ctx): State<Arc<ServiceContext>>, Json(request): Json<register::CreateUserRequest>)
    -> Result<(StatusCode, Json<ApiMessage>), RoostError> {

    let response = register::create_user(&ctx, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login_user(State(ctx): State<Arc<ServiceContext>>, Json(request): Json<login::LoginRequest>)
    -> Result<Json<login::LoginResponse>, RoostError> {

    Ok(Json(login::login_user(&ctx, request).await?))
}

async fn change_password(State(ctx): State<Arc<ServiceContext>>, Json(request): Json<change_password::ChangePasswordRequest>)
    -> Result<Json<ApiMessage>, RoostError> {

    Ok(Json(change_password::change_password(&ctx, request).await?))
}

async fn forgot_password(State(ctx): State<Arc<ServiceContext>>, Json(request): Json<forgot_password::ForgotPasswordRequest>)
    -> Result<Json<ApiMessage>, RoostError> {

    Ok(Json(forgot_password::forgot_password(&ctx, request).await?))
}

async fn verify_otp(State(ctx): State<Arc<ServiceContext>>, Json(request): Json<verify_otp::VerifyOtpRequest>)
    -> Result<Json<ApiMessage>, RoostError> {

    Ok(Json(verify_otp::verify_otp_and_set_password(&ctx, request).await?))
}

async fn verify_email(State(ctx): State<Arc<ServiceContext>>, Path(token): Path<String>)
    -> Result<Json<ApiMessage>, RoostError> {

    Ok(Json(verify_email::verify_email(&ctx, &token).await?))
}

async fn get_current_profile(AuthAccount(account): AuthAccount) -> Json<profile::ProfileResponse> {
    Json(profile::current_profile(&account))
}
