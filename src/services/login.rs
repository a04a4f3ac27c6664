use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::db;
use crate::model::{algorithm, token};
use crate::model::account::PublicProfile;
use crate::utils::context::ServiceContext;
use crate::utils::errors::{ErrorCode, RoostError};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user_data: PublicProfile,
}

///
/// Authenticate a user and issue a session token.
///
/// Checks run in a strict order: lock state first, then the credential, then
/// password age. A correct password never shortcuts an active lock, and an
/// expired password is only reported once the credential has matched.
///
pub async fn login_user(ctx: &ServiceContext, request: LoginRequest) -> Result<LoginResponse, RoostError> {

    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ErrorCode::MissingFields.with_msg("Please enter all fields!"))
    }

    let account = db::account::load_by_email(&request.email, ctx.db()).await?
        .ok_or_else(|| ErrorCode::AccountNotFound.with_msg("User does not exist!"))?;

    let now = ctx.now();

    if account.is_locked(now) {
        let lock_until = account.lock_until
            .map(|until| until.to_chrono())
            .unwrap_or(now);

        return Err(ErrorCode::AccountLocked
            .with_msg("Account is locked due to multiple failed login attempts.")
            .with_remaining_time(remaining_seconds(lock_until, now)))
    }

    if account.lock_until.is_some() {
        // The lock has lapsed. Clear it but leave the attempt counter - the
        // next failure escalates straight into the longer lock tier.
        db::account::clear_expired_lock(ctx, &account).await?;
    }

    let phc = account.password.clone();
    let plain_text_password = request.password.clone();
    let valid = tokio::task::spawn_blocking(move || algorithm::verify(&plain_text_password, &phc))
        .await
        .map_err(RoostError::from)??;

    if !valid {
        let updated = db::account::increment_login_attempts(ctx, &account).await?;

        if updated.login_attempts >= ctx.policy().lock_threshold() {
            let duration = ctx.policy().lock_duration_for(updated.login_attempts);
            db::account::apply_lock(ctx, &account, now + duration).await?;

            tracing::warn!("Account {} locked for {}s after {} failed logins",
                account.id.to_hex(),
                duration.num_seconds(),
                updated.login_attempts);

            return Err(ErrorCode::AccountLocked
                .with_msg("Account is locked due to multiple failed login attempts.")
                .with_remaining_time(duration.num_seconds()))
        }

        return Err(ErrorCode::PasswordNotMatch
            .with_msg("Incorrect password!")
            .with_remaining_attempts(ctx.policy().remaining_attempts(updated.login_attempts)))
    }

    if account.password_expired(now, ctx.policy().password_expiry_days) {
        // Reported only after the credential matched, so probing can't use
        // this response to confirm a password. No session, no counter reset.
        return Err(ErrorCode::PasswordExpired
            .with_msg("Password has expired. Please change your password."))
    }

    db::account::record_login_success(ctx, &account).await?;

    let token = token::issue_session(
        &account,
        now,
        ctx.policy().session_expiry_seconds,
        &ctx.config().jwt_secret)?;

    Ok(LoginResponse {
        success: true,
        message: "User logged in successfully!".to_string(),
        token,
        user_data: PublicProfile::from(&account),
    })
}

// Rounds up so a lock with 200ms left reports 1 second, not 0.
fn remaining_seconds(until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (until - now).num_milliseconds();
    (millis + 999) / 1000
}
