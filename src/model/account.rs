use bson::oid::ObjectId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

///
/// A registered user's persisted identity and security state.
///
/// Field names are camelCase on the wire to match the documents the store
/// has always held.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: i64,

    /// The current password as a PHC string.
    pub password: String,

    /// Prior password hashes, most-recent-first, capped at the policy's
    /// history length. Always contains the current hash at index 0.
    #[serde(default)]
    pub password_history: Vec<String>,
    pub password_last_changed: bson::DateTime,

    #[serde(default)]
    pub login_attempts: u32,
    #[serde(default)]
    pub lock_until: Option<bson::DateTime>,

    #[serde(default)]
    pub is_logged_in: bool,
    #[serde(default)]
    pub is_admin: bool,

    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub email_verification_token: Option<String>,
    #[serde(default)]
    pub email_verification_token_expire: Option<bson::DateTime>,

    #[serde(default)]
    pub reset_password_otp: Option<u32>,
    #[serde(default)]
    pub reset_password_expires: Option<bson::DateTime>,
}

impl Account {
    ///
    /// Whether the account is currently locked out.
    ///
    /// This is computed from the stored lock expiry rather than persisted as
    /// a flag, so it can never go stale.
    ///
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        match self.lock_until {
            Some(lock_until) => lock_until.to_chrono() > now,
            None => false,
        }
    }

    ///
    /// Whether the current password is past its rotation period and must be
    /// changed before a session can be issued.
    ///
    pub fn password_expired(&self, now: DateTime<Utc>, expiry_days: u32) -> bool {
        // Compare instants, not truncated whole days - the password expires
        // the moment the rotation period elapses.
        now > self.password_last_changed.to_chrono() + Duration::days(expiry_days as i64)
    }
}

///
/// Prepend the new hash to the history, evicting the oldest entry once the
/// cap is reached.
///
pub fn updated_history(history: &[String], new_phc: &str, max_history_length: u32) -> Vec<String> {
    let mut updated = Vec::with_capacity(max_history_length as usize);
    updated.push(new_phc.to_string());
    updated.extend(history.iter().take(max_history_length as usize - 1).cloned());
    updated
}

///
/// The fields of an account the API is allowed to return. The password and
/// its history never leave the service.
///
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: i64,
    pub is_admin: bool,
    pub is_email_verified: bool,
}

impl From<&Account> for PublicProfile {
    fn from(account: &Account) -> Self {
        PublicProfile {
            id: account.id.to_hex(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            phone: account.phone,
            is_admin: account.is_admin,
            is_email_verified: account.is_email_verified,
        }
    }
}
