use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use derive_more::Display;
use serde_json::json;
use tokio::task::JoinError;

///
/// Every failure the service can report. The numeric bands group related
/// failures: 05xx internal, 1xxx request validation, 20xx credential policy,
/// 21xx account/credential, 22xx OTP reset, 23xx session tokens.
///
#[derive(Clone, Copy, Debug, Display, PartialEq)]
pub enum ErrorCode {
    IOError                 = 0500,
    MongoDBError            = 0503,
    InvalidBSON             = 0504,
    InvalidJSON             = 0505,
    HashingError            = 0509,
    HashThreadingIssue      = 0510,
    TokenSigningError       = 0511,
    UnableToReadCredentials = 0512,
    MissingFields           = 1000,
    PasswordTooShort        = 2002,
    PasswordTooLong         = 2003,
    PasswordNeedsUppercase  = 2004,
    PasswordNeedsLowercase  = 2005,
    PasswordNeedsNumber     = 2006,
    PasswordNeedsSymbol     = 2007,
    PasswordUsedBefore      = 2012,
    AccountNotFound         = 2101,
    AccountAlreadyExists    = 2102,
    PasswordNotMatch        = 2103,
    PasswordExpired         = 2104,
    AccountLocked           = 2105,
    CurrentPasswordNotMatch = 2106,
    PhoneNotRegistered      = 2107,
    OtpNotMatch             = 2200,
    OtpExpired              = 2201,
    OtpSendFailure          = 2202,
    EmailSendFailure        = 2203,
    NotAuthenticated        = 2300,
}

impl ErrorCode {
    pub fn with_msg(&self, message: &str) -> RoostError {
        RoostError::new(*self, message)
    }
}

///
/// The service-wide error type. Carries an [ErrorCode], a human-readable
/// message and, for lockout responses, the timing hints legitimate users
/// need to self-diagnose.
///
#[derive(Clone, Debug, PartialEq)]
pub struct RoostError {
    error_code: ErrorCode,
    message: String,
    remaining_time: Option<i64>,
    remaining_attempts: Option<u32>,
}

impl RoostError {
    pub fn new(error_code: ErrorCode, message: &str) -> Self {
        RoostError {
            error_code,
            message: message.to_string(),
            remaining_time: None,
            remaining_attempts: None,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    ///
    /// Attach the number of seconds until an account lock expires.
    ///
    pub fn with_remaining_time(mut self, seconds: i64) -> Self {
        self.remaining_time = Some(seconds);
        self
    }

    ///
    /// Attach the number of failed attempts left before a lock is applied.
    ///
    pub fn with_remaining_attempts(mut self, attempts: u32) -> Self {
        self.remaining_attempts = Some(attempts);
        self
    }

    pub fn remaining_time(&self) -> Option<i64> {
        self.remaining_time
    }

    pub fn remaining_attempts(&self) -> Option<u32> {
        self.remaining_attempts
    }
}

impl From<mongodb::error::Error> for RoostError {
    fn from(error: mongodb::error::Error) -> Self {
        if crate::db::mongo::is_duplicate_err(&error) {
            return ErrorCode::AccountAlreadyExists.with_msg("User already exists!")
        }

        ErrorCode::MongoDBError.with_msg(&format!("MongoDB error: {}", error))
    }
}

impl From<bson::ser::Error> for RoostError {
    fn from(error: bson::ser::Error) -> Self {
        ErrorCode::InvalidBSON.with_msg(&format!("Unable to serialise BSON: {}", error))
    }
}

impl From<bson::de::Error> for RoostError {
    fn from(error: bson::de::Error) -> Self {
        ErrorCode::InvalidBSON.with_msg(&format!("Unable to deserialise BSON: {}", error))
    }
}

impl From<serde_json::Error> for RoostError {
    fn from(error: serde_json::Error) -> Self {
        ErrorCode::InvalidJSON.with_msg(&format!("Unable to convert to json: {}", error))
    }
}

impl From<argon2::password_hash::Error> for RoostError {
    fn from(error: argon2::password_hash::Error) -> Self {
        ErrorCode::HashingError.with_msg(&format!("Unable to hash password: {}", error))
    }
}

impl From<JoinError> for RoostError {
    fn from(error: JoinError) -> Self {
        ErrorCode::HashThreadingIssue.with_msg(&format!("Unable to hash: {}", error))
    }
}

impl From<jsonwebtoken::errors::Error> for RoostError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        ErrorCode::TokenSigningError.with_msg(&format!("Unable to sign token: {}", error))
    }
}

impl From<reqwest::Error> for RoostError {
    fn from(error: reqwest::Error) -> Self {
        ErrorCode::EmailSendFailure.with_msg(&format!("Unable to reach mail gateway: {}", error))
    }
}

impl From<std::io::Error> for RoostError {
    fn from(error: std::io::Error) -> Self {
        ErrorCode::IOError.with_msg(&format!("IO error: {}", error))
    }
}

///
/// Map an error code onto the HTTP status the API reports for it.
///
/// Note: guard failures and not-found-at-login deliberately return 400 rather
/// than 401/404 - the API does not disclose whether the account or the
/// credential was at fault.
///
pub fn status_for(error_code: ErrorCode) -> StatusCode {
    use ErrorCode::*;

    match error_code {
        IOError                 |
        MongoDBError            |
        InvalidBSON             |
        InvalidJSON             |
        HashingError            |
        HashThreadingIssue      |
        TokenSigningError       |
        EmailSendFailure        |
        UnableToReadCredentials => StatusCode::INTERNAL_SERVER_ERROR,

        PhoneNotRegistered => StatusCode::NOT_FOUND,

        AccountLocked   |
        PasswordExpired => StatusCode::FORBIDDEN,

        MissingFields           |
        PasswordTooShort        |
        PasswordTooLong         |
        PasswordNeedsUppercase  |
        PasswordNeedsLowercase  |
        PasswordNeedsNumber     |
        PasswordNeedsSymbol     |
        PasswordUsedBefore      |
        AccountNotFound         |
        AccountAlreadyExists    |
        PasswordNotMatch        |
        CurrentPasswordNotMatch |
        OtpNotMatch             |
        OtpExpired              |
        OtpSendFailure          |
        NotAuthenticated => StatusCode::BAD_REQUEST,
    }
}

///
/// Convert our internal error into a JSON HTTP response.
///
/// Internal failures are logged in full but redacted from the caller.
///
impl IntoResponse for RoostError {
    fn into_response(self) -> Response {
        let status = status_for(self.error_code);

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("{}: {}", self.error_code, self.message);
                String::from("Internal Server Error!")
            },
            _ => self.message,
        };

        let mut body = json!({ "success": false, "message": message });

        if let Some(remaining_time) = self.remaining_time {
            body["remainingTime"] = json!(remaining_time);
        }

        if let Some(remaining_attempts) = self.remaining_attempts {
            body["remainingAttempts"] = json!(remaining_attempts);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_and_expiry_failures_are_forbidden() {
        assert_eq!(status_for(ErrorCode::AccountLocked), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorCode::PasswordExpired), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_guard_failures_do_not_disclose() {
        // The auth guard reports 400 for every failure mode, matching the
        // non-disclosure behaviour of the login flow.
        assert_eq!(status_for(ErrorCode::NotAuthenticated), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::AccountNotFound), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::PasswordNotMatch), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_failures_are_redacted() {
        let error = ErrorCode::MongoDBError.with_msg("connection pool exhausted");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_hints_are_attached() {
        let error = ErrorCode::AccountLocked
            .with_msg("Account is locked due to multiple failed login attempts.")
            .with_remaining_time(15);

        assert_eq!(error.remaining_time(), Some(15));
        assert_eq!(error.remaining_attempts(), None);
    }
}
