use serde::Deserialize;
use super::ApiMessage;
use crate::db;
use crate::model::algorithm;
use crate::utils::context::ServiceContext;
use crate::utils::errors::{ErrorCode, RoostError};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub email: String,
    pub current_password: String,
    pub new_password: String,
}

///
/// Rotate a password after proving knowledge of the current one.
///
/// The new password must pass the credential policy and must not match any
/// hash in the retained history.
///
pub async fn change_password(ctx: &ServiceContext, request: ChangePasswordRequest) -> Result<ApiMessage, RoostError> {

    if request.email.trim().is_empty()
        || request.current_password.is_empty()
        || request.new_password.is_empty() {

        return Err(ErrorCode::MissingFields.with_msg("Please enter all fields!"))
    }

    ctx.policy().validate_pattern(&request.new_password)?;

    let account = db::account::load_by_email(&request.email, ctx.db()).await?
        .ok_or_else(|| ErrorCode::AccountNotFound.with_msg("User does not exist!"))?;

    let phc = account.password.clone();
    let current = request.current_password.clone();
    let valid = tokio::task::spawn_blocking(move || algorithm::verify(&current, &phc))
        .await
        .map_err(RoostError::from)??;

    if !valid {
        return Err(ErrorCode::CurrentPasswordNotMatch.with_msg("Current password is incorrect!"))
    }

    // One trip to the blocking pool covers both the history scan and the new
    // hash - each verify is as costly as a hash.
    let history = account.password_history.clone();
    let new_password = request.new_password.clone();
    let phc = tokio::task::spawn_blocking(move || {
            if algorithm::is_reused(&history, &new_password)? {
                return Err(ErrorCode::PasswordUsedBefore
                    .with_msg("New password cannot be one of your recent passwords!"))
            }
            algorithm::hash_into_phc(&new_password)
        })
        .await
        .map_err(RoostError::from)??;

    db::account::update_password(ctx, &account, &phc).await?;

    Ok(ApiMessage::ok("Password changed successfully!"))
}
