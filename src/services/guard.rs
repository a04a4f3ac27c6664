use std::sync::Arc;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use bson::oid::ObjectId;
use crate::db;
use crate::model::account::Account;
use crate::model::token;
use crate::utils::context::ServiceContext;
use crate::utils::errors::{ErrorCode, RoostError};

///
/// Extractor that turns a Bearer token into the account it belongs to.
///
/// Handlers that take an AuthAccount are only reached with a signed,
/// unexpired session whose subject still exists.
///
pub struct AuthAccount(pub Account);

impl FromRequestParts<Arc<ServiceContext>> for AuthAccount {
    type Rejection = RoostError;

    async fn from_request_parts(parts: &mut Parts, ctx: &Arc<ServiceContext>) -> Result<Self, Self::Rejection> {

        let header = parts.headers.get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ErrorCode::NotAuthenticated.with_msg("Please login first"))?;

        let token = header.strip_prefix("Bearer ").map(str::trim).unwrap_or("");

        if token.is_empty() {
            return Err(ErrorCode::NotAuthenticated.with_msg("Please provide a token"))
        }

        let claims = token::verify_session(token, &ctx.config().jwt_secret)?;

        let id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ErrorCode::NotAuthenticated.with_msg("Not Authenticated!"))?;

        match db::account::load_by_id(&id, ctx.db()).await? {
            Some(account) => Ok(AuthAccount(account)),
            None => Err(ErrorCode::NotAuthenticated.with_msg("User not found")),
        }
    }
}
