use serde::Deserialize;
use super::ApiMessage;
use crate::db;
use crate::model::algorithm;
use crate::utils::context::ServiceContext;
use crate::utils::errors::{ErrorCode, RoostError};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyOtpRequest {
    pub phone: i64,
    pub otp: u32,
    pub new_password: String,
}

///
/// Complete a password reset by presenting the OTP texted to the phone.
///
/// Correctness is checked before expiry, so a wrong-and-stale code reports
/// "Invalid OTP". The replacement password must pass the credential policy,
/// but the reuse check is skipped - the caller has already proven control of
/// the phone, not knowledge of any old password.
///
pub async fn verify_otp_and_set_password(ctx: &ServiceContext, request: VerifyOtpRequest) -> Result<ApiMessage, RoostError> {

    if request.phone == 0 || request.otp == 0 || request.new_password.is_empty() {
        return Err(ErrorCode::MissingFields.with_msg("Please enter all fields!"))
    }

    let account = db::account::load_by_phone(request.phone, ctx.db()).await?
        .ok_or_else(|| ErrorCode::PhoneNotRegistered.with_msg("User not found"))?;

    match account.reset_password_otp {
        Some(stored) if stored == request.otp => {},
        _ => return Err(ErrorCode::OtpNotMatch.with_msg("Invalid OTP")),
    }

    let expired = match account.reset_password_expires {
        Some(expires) => expires.to_chrono() < ctx.now(),
        None => true,
    };

    if expired {
        return Err(ErrorCode::OtpExpired.with_msg("OTP expired"))
    }

    ctx.policy().validate_pattern(&request.new_password)?;

    let new_password = request.new_password.clone();
    let phc = tokio::task::spawn_blocking(move || algorithm::hash_into_phc(&new_password))
        .await
        .map_err(RoostError::from)??;

    db::account::update_password(ctx, &account, &phc).await?;
    db::account::clear_reset_otp(ctx, &account).await?;

    Ok(ApiMessage::ok("Password reset successfully"))
}
