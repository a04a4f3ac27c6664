use bson::oid::ObjectId;
use serde::Deserialize;
use super::ApiMessage;
use crate::db;
use crate::model::{algorithm, token};
use crate::model::account::Account;
use crate::utils::context::ServiceContext;
use crate::utils::errors::{ErrorCode, RoostError};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: i64,
    pub password: String,
}

///
/// Create a new, unverified account.
///
/// The password must satisfy the credential policy and the email must not be
/// taken. A one-time verification token is issued and mailed - the mail is
/// best-effort, the account stands even if dispatch fails.
///
pub async fn create_user(ctx: &ServiceContext, request: CreateUserRequest) -> Result<ApiMessage, RoostError> {

    if request.first_name.trim().is_empty()
        || request.last_name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
        || request.phone == 0 {

        return Err(ErrorCode::MissingFields.with_msg("Please enter all fields!"))
    }

    ctx.policy().validate_pattern(&request.password)?;

    if db::account::load_by_email(&request.email, ctx.db()).await?.is_some() {
        return Err(ErrorCode::AccountAlreadyExists.with_msg("User already exists!"))
    }

    // Hashing is highly CPU-bound so perform it on the blocking thread pool,
    // not on the main event loop.
    let plain_text_password = request.password.clone();
    let phc = tokio::task::spawn_blocking(move || algorithm::hash_into_phc(&plain_text_password))
        .await
        .map_err(RoostError::from)??;

    let now = ctx.now();
    let (verification_token, token_hash) = token::generate_one_time_token();

    let account = Account {
        id: ObjectId::new(),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        email: request.email.clone(),
        phone: request.phone,
        password: phc.clone(),
        password_history: vec!(phc),
        password_last_changed: bson::DateTime::from_chrono(now),
        login_attempts: 0,
        lock_until: None,
        is_logged_in: false,
        is_admin: false,
        is_email_verified: false,
        email_verification_token: Some(token_hash),
        email_verification_token_expire: Some(bson::DateTime::from_chrono(now + ctx.policy().verification_expiry())),
        reset_password_otp: None,
        reset_password_expires: None,
    };

    db::account::insert(&account, ctx.db()).await?;

    // Account durability beats notification delivery - a failed dispatch is
    // logged and the 201 stands.
    let link = format!("{}/api/user/verifyEmail/{}", ctx.config().base_url, verification_token);
    let body = format!("Welcome to Roost! Follow this link to verify your email address: {}", link);

    if let Err(err) = ctx.email().send(&request.email, "Verify your email address", &body).await {
        tracing::warn!("Verification email to account {} failed: {}", account.id.to_hex(), err.message());
    }

    Ok(ApiMessage::ok("User created successfully!"))
}
