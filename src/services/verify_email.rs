use super::ApiMessage;
use crate::db;
use crate::model::token;
use crate::utils::context::ServiceContext;
use crate::utils::errors::RoostError;

///
/// Redeem an email verification token from the mailed link.
///
/// Redemption is atomic: the filter only matches an unexpired stored hash,
/// and the same update clears it. A second click, a stale link or a made-up
/// token all land in the same soft-failure branch.
///
pub async fn verify_email(ctx: &ServiceContext, presented_token: &str) -> Result<ApiMessage, RoostError> {

    let token_hash = token::hash_one_time_token(presented_token);

    match db::account::consume_verification_token(ctx, &token_hash).await? {
        Some(account) => {
            tracing::info!("Email verified for account {}", account.id.to_hex());
            Ok(ApiMessage::ok("Email verified successfully!"))
        },
        None => Ok(ApiMessage::failed("Invalid or expired token")),
    }
}
