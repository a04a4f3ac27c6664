use serde::Deserialize;
use super::ApiMessage;
use crate::db;
use crate::model::token;
use crate::utils::context::ServiceContext;
use crate::utils::errors::{ErrorCode, RoostError};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub phone: i64,
}

///
/// Start a password reset by texting a 6-digit OTP to the registered phone.
///
pub async fn forgot_password(ctx: &ServiceContext, request: ForgotPasswordRequest) -> Result<ApiMessage, RoostError> {

    if request.phone == 0 {
        return Err(ErrorCode::MissingFields.with_msg("Please enter your phone number"))
    }

    let account = db::account::load_by_phone(request.phone, ctx.db()).await?
        .ok_or_else(|| ErrorCode::PhoneNotRegistered.with_msg("User not found"))?;

    let otp = token::generate_otp();
    let expires = ctx.now() + ctx.policy().otp_expiry();

    // Stored before dispatch. If the text never arrives the stale OTP is
    // harmless - a retry overwrites it.
    db::account::store_reset_otp(ctx, &account, otp, expires).await?;

    if !ctx.sms().send(account.phone, otp).await {
        return Err(ErrorCode::OtpSendFailure.with_msg("Error in sending OTP"))
    }

    Ok(ApiMessage::ok("OTP sent to your phone number"))
}
