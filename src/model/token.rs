use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use crate::model::account::Account;
use crate::utils;
use crate::utils::errors::{ErrorCode, RoostError};

///
/// Claims embedded in every session token.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Claims {
    /// Subject - the account's document id in hex.
    pub sub: String,
    /// Whether the account holds the admin role.
    pub admin: bool,
    /// Issued-at (UTC Unix timestamp).
    pub iat: i64,
    /// Expiry (UTC Unix timestamp).
    pub exp: i64,
}

///
/// Issue a signed HS256 session token for the account.
///
pub fn issue_session(account: &Account, now: DateTime<Utc>, expiry_seconds: u32, secret: &str)
    -> Result<String, RoostError> {

    let claims = Claims {
        sub: account.id.to_hex(),
        admin: account.is_admin,
        iat: now.timestamp(),
        exp: now.timestamp() + expiry_seconds as i64,
    };

    Ok(encode(
        &Header::default(), // HS256.
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()))?)
}

///
/// Verify a presented session token's signature and expiry and return the
/// claims. Every failure collapses into a single non-disclosing error.
///
pub fn verify_session(token: &str, secret: &str) -> Result<Claims, RoostError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default())
        .map_err(|_| ErrorCode::NotAuthenticated.with_msg("Not Authenticated!"))?;

    Ok(token_data.claims)
}

///
/// Generate a one-time token: a high-entropy random value whose plaintext is
/// sent to the user exactly once, while only the SHA-256 digest is stored.
///
/// Returns (plaintext, stored_hash).
///
pub fn generate_one_time_token() -> (String, String) {
    let plaintext = format!("{}{}", utils::generate_id(), utils::generate_id());
    let hash = hash_one_time_token(&plaintext);
    (plaintext, hash)
}

///
/// Re-hash a presented one-time token for lookup against the stored digest.
///
pub fn hash_one_time_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

///
/// Generate a random 6-digit OTP for the phone reset flow.
///
pub fn generate_otp() -> u32 {
    use rand::Rng;
    rand::thread_rng().gen_range(100_000..1_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    const SECRET: &str = "a-test-secret-long-enough-for-hmac";

    fn test_account() -> Account {
        Account {
            id: ObjectId::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: 5550001,
            password: "$argon2id$stub".to_string(),
            password_history: vec!(),
            password_last_changed: bson::DateTime::from_chrono(Utc::now()),
            login_attempts: 0,
            lock_until: None,
            is_logged_in: false,
            is_admin: true,
            is_email_verified: false,
            email_verification_token: None,
            email_verification_token_expire: None,
            reset_password_otp: None,
            reset_password_expires: None,
        }
    }

    #[test]
    fn test_issue_and_verify_session_roundtrip() {
        let account = test_account();
        let token = issue_session(&account, Utc::now(), 3600, SECRET).unwrap();

        let claims = verify_session(&token, SECRET).unwrap();
        assert_eq!(claims.sub, account.id.to_hex());
        assert_eq!(claims.admin, true);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_expired_session_is_rejected() {
        // Issue a token that expired well beyond the verifier's leeway.
        let account = test_account();
        let issued_at = Utc::now() - chrono::Duration::hours(2);
        let token = issue_session(&account, issued_at, 3600, SECRET).unwrap();

        let result = verify_session(&token, SECRET);
        assert_eq!(result.unwrap_err().error_code(), ErrorCode::NotAuthenticated);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let account = test_account();
        let token = issue_session(&account, Utc::now(), 3600, SECRET).unwrap();

        let result = verify_session(&token, "a-different-secret-entirely");
        assert_eq!(result.unwrap_err().error_code(), ErrorCode::NotAuthenticated);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let result = verify_session("not-a-jwt", SECRET);
        assert_eq!(result.unwrap_err().error_code(), ErrorCode::NotAuthenticated);
    }

    #[test]
    fn test_one_time_token_hash_is_stable() {
        let (plaintext, stored) = generate_one_time_token();

        assert_eq!(hash_one_time_token(&plaintext), stored);
        assert_eq!(stored.len(), 64); // SHA-256 hex.
        assert_ne!(plaintext, stored);
    }

    #[test]
    fn test_otp_is_always_six_digits() {
        for _ in 0..1000 {
            let otp = generate_otp();
            assert!(otp >= 100_000 && otp <= 999_999);
        }
    }
}
