pub mod account;
pub mod mongo;

pub mod prelude {
    // Collection names.
    pub const ACCOUNTS: &str = "Accounts";

    // Field names.
    pub const EMAIL:                           &str = "email";
    pub const PHONE:                           &str = "phone";
    pub const PASSWORD:                        &str = "password";
    pub const PASSWORD_HISTORY:                &str = "passwordHistory";
    pub const PASSWORD_LAST_CHANGED:           &str = "passwordLastChanged";
    pub const LOGIN_ATTEMPTS:                  &str = "loginAttempts";
    pub const LOCK_UNTIL:                      &str = "lockUntil";
    pub const IS_LOGGED_IN:                    &str = "isLoggedIn";
    pub const IS_EMAIL_VERIFIED:               &str = "isEmailVerified";
    pub const EMAIL_VERIFICATION_TOKEN:        &str = "emailVerificationToken";
    pub const EMAIL_VERIFICATION_TOKEN_EXPIRE: &str = "emailVerificationTokenExpire";
    pub const RESET_PASSWORD_OTP:              &str = "resetPasswordOtp";
    pub const RESET_PASSWORD_EXPIRES:          &str = "resetPasswordExpires";
}
