use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use mongodb::{Collection, Database};
use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use crate::db::prelude::*;
use crate::model::account::{self, Account};
use crate::utils::context::ServiceContext;
use crate::utils::errors::{ErrorCode, RoostError};

fn accounts(db: &Database) -> Collection<Account> {
    db.collection::<Account>(ACCOUNTS)
}

pub async fn load_by_email(email: &str, db: &Database) -> Result<Option<Account>, RoostError> {
    Ok(accounts(db).find_one(doc!{ EMAIL: email }, None).await?)
}

pub async fn load_by_phone(phone: i64, db: &Database) -> Result<Option<Account>, RoostError> {
    Ok(accounts(db).find_one(doc!{ PHONE: phone }, None).await?)
}

pub async fn load_by_id(id: &ObjectId, db: &Database) -> Result<Option<Account>, RoostError> {
    Ok(accounts(db).find_one(doc!{ "_id": id }, None).await?)
}

///
/// Create the account. A duplicate email or phone trips the unique index and
/// surfaces as an already-exists failure.
///
pub async fn insert(account: &Account, db: &Database) -> Result<(), RoostError> {
    accounts(db).insert_one(account, None).await?;
    Ok(())
}

///
/// Atomically bump the failed login counter and return the updated account,
/// so concurrent failures against one account cannot lose increments.
///
pub async fn increment_login_attempts(ctx: &ServiceContext, account: &Account) -> Result<Account, RoostError> {

    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();

    match accounts(ctx.db())
        .find_one_and_update(
            doc!{ "_id": account.id },
            doc!{ "$inc": { LOGIN_ATTEMPTS: 1 } },
            options)
        .await? {

        Some(updated) => Ok(updated),
        None => Err(ErrorCode::AccountNotFound.with_msg("User does not exist!")),
    }
}

///
/// Set the lock expiry after the failure threshold has been reached.
///
pub async fn apply_lock(ctx: &ServiceContext, account: &Account, lock_until: DateTime<Utc>) -> Result<(), RoostError> {
    accounts(ctx.db())
        .update_one(
            doc!{ "_id": account.id },
            doc!{ "$set": { LOCK_UNTIL: bson::DateTime::from_chrono(lock_until) } },
            None)
        .await?;

    Ok(())
}

///
/// Remove an elapsed lock. The failed attempt counter is deliberately left
/// alone - only a successful login resets it.
///
pub async fn clear_expired_lock(ctx: &ServiceContext, account: &Account) -> Result<(), RoostError> {
    accounts(ctx.db())
        .update_one(
            doc!{ "_id": account.id },
            doc!{ "$unset": { LOCK_UNTIL: "" } },
            None)
        .await?;

    Ok(())
}

///
/// Clear the failure state and flag the session on a successful login.
///
pub async fn record_login_success(ctx: &ServiceContext, account: &Account) -> Result<(), RoostError> {
    accounts(ctx.db())
        .update_one(
            doc!{ "_id": account.id },
            doc!{
                "$set": { LOGIN_ATTEMPTS: 0, IS_LOGGED_IN: true },
                "$unset": { LOCK_UNTIL: "" },
            },
            None)
        .await?;

    Ok(())
}

///
/// Set a new password hash, prepend it to the bounded history and stamp the
/// change time.
///
pub async fn update_password(ctx: &ServiceContext, account: &Account, phc: &str) -> Result<(), RoostError> {

    let history = account::updated_history(
        &account.password_history,
        phc,
        ctx.policy().max_history_length);

    accounts(ctx.db())
        .update_one(
            doc!{ "_id": account.id },
            doc!{ "$set": {
                PASSWORD: phc,
                PASSWORD_HISTORY: history,
                PASSWORD_LAST_CHANGED: bson::DateTime::from_chrono(ctx.now()),
            }},
            None)
        .await?;

    Ok(())
}

///
/// Store a fresh reset OTP with its expiry - any prior OTP is overwritten so
/// at most one is live per account.
///
pub async fn store_reset_otp(ctx: &ServiceContext, account: &Account, otp: u32, expires: DateTime<Utc>) -> Result<(), RoostError> {
    accounts(ctx.db())
        .update_one(
            doc!{ "_id": account.id },
            doc!{ "$set": {
                RESET_PASSWORD_OTP: otp,
                RESET_PASSWORD_EXPIRES: bson::DateTime::from_chrono(expires),
            }},
            None)
        .await?;

    Ok(())
}

pub async fn clear_reset_otp(ctx: &ServiceContext, account: &Account) -> Result<(), RoostError> {
    accounts(ctx.db())
        .update_one(
            doc!{ "_id": account.id },
            doc!{ "$unset": { RESET_PASSWORD_OTP: "", RESET_PASSWORD_EXPIRES: "" } },
            None)
        .await?;

    Ok(())
}

///
/// Atomically consume an unexpired verification token: flip the verified
/// flag and clear the token fields so it cannot be replayed. Returns None
/// when no account holds a live token with this hash.
///
pub async fn consume_verification_token(ctx: &ServiceContext, token_hash: &str) -> Result<Option<Account>, RoostError> {

    let filter = doc!{
        EMAIL_VERIFICATION_TOKEN: token_hash,
        EMAIL_VERIFICATION_TOKEN_EXPIRE: { "$gt": bson::DateTime::from_chrono(ctx.now()) },
    };

    let update = doc!{
        "$set": { IS_EMAIL_VERIFIED: true },
        "$unset": { EMAIL_VERIFICATION_TOKEN: "", EMAIL_VERIFICATION_TOKEN_EXPIRE: "" },
    };

    Ok(accounts(ctx.db()).find_one_and_update(filter, update, None).await?)
}
