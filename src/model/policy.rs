use chrono::Duration;
use serde::{Deserialize, Serialize};
use crate::utils::errors::{ErrorCode, RoostError};

///
/// A threshold/duration pair - once an account's cumulative failed login
/// count reaches a tier, the tier's lock duration is applied.
///
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct LockoutTier {
    pub attempts: u32,
    pub lock_seconds: u32,
}

///
/// The credential and lockout policy applied to every account.
///
/// This is injected through the service context rather than read from
/// module-level constants so tests can run with compressed durations.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SecurityPolicy {
    pub min_length: u32,
    pub max_length: u32,
    pub allowed_symbols: String,
    pub max_history_length: u32,
    pub password_expiry_days: u32,
    pub lockout_tiers: Vec<LockoutTier>,
    pub otp_expiry_seconds: u32,
    pub verification_expiry_seconds: u32,
    pub session_expiry_seconds: u32,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        SecurityPolicy {
            min_length: 8,
            max_length: 20,
            allowed_symbols: String::from("@$!%*?&"),
            max_history_length: 5,
            password_expiry_days: 90,
            lockout_tiers: vec!(
                LockoutTier { attempts: 5,        lock_seconds: 15 },
                LockoutTier { attempts: 10,       lock_seconds: 60 },
                LockoutTier { attempts: 15,       lock_seconds: 5 * 60 },
                LockoutTier { attempts: u32::MAX, lock_seconds: 60 * 60 }),
            otp_expiry_seconds: 10 * 60,
            verification_expiry_seconds: 10 * 60,
            session_expiry_seconds: 60 * 60,
        }
    }
}

impl SecurityPolicy {
    ///
    /// Check the plain text password doesn't violate the credential policy.
    ///
    /// Reuse against the account's history is not checked here - that needs
    /// the stored hashes and is done separately.
    ///
    pub fn validate_pattern(&self, plain_text_password: &str) -> Result<(), RoostError> {

        if plain_text_password.chars().count() < self.min_length as usize {
            return Err(ErrorCode::PasswordTooShort
                .with_msg(&format!("passwords must be at least {} characters", self.min_length)))
        }

        if plain_text_password.chars().count() > self.max_length as usize {
            return Err(ErrorCode::PasswordTooLong
                .with_msg(&format!("passwords may not be more than {} characters", self.max_length)))
        }

        if !plain_text_password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ErrorCode::PasswordNeedsUppercase
                .with_msg("a password must contain at least 1 upper case letter"))
        }

        if !plain_text_password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(ErrorCode::PasswordNeedsLowercase
                .with_msg("a password must contain at least 1 lower case letter"))
        }

        if !plain_text_password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ErrorCode::PasswordNeedsNumber
                .with_msg("a password must contain at least 1 number"))
        }

        if !plain_text_password.chars().any(|c| self.allowed_symbols.contains(c)) {
            return Err(ErrorCode::PasswordNeedsSymbol
                .with_msg(&format!("a password must contain at least 1 symbol from {}", self.allowed_symbols)))
        }

        Ok(())
    }

    ///
    /// The lock duration for the given cumulative failed attempt count.
    ///
    /// Tiers are scanned in ascending threshold order and the first tier
    /// whose threshold is >= the total matches. The final tier is a
    /// catch-all so every total maps to a duration.
    ///
    pub fn lock_duration_for(&self, total_attempts: u32) -> Duration {
        for tier in &self.lockout_tiers {
            if total_attempts <= tier.attempts {
                return Duration::seconds(tier.lock_seconds as i64)
            }
        }

        // Unreachable while the final tier threshold is u32::MAX.
        Duration::seconds(0)
    }

    ///
    /// The failed attempt count at which a lock is first applied.
    ///
    /// Failures below this threshold are recorded but no lock is set.
    ///
    pub fn lock_threshold(&self) -> u32 {
        self.lockout_tiers.first().map(|tier| tier.attempts).unwrap_or(u32::MAX)
    }

    ///
    /// How many more failures the account can take before it is locked.
    ///
    pub fn remaining_attempts(&self, total_attempts: u32) -> u32 {
        self.lock_threshold().saturating_sub(total_attempts)
    }

    pub fn otp_expiry(&self) -> Duration {
        Duration::seconds(self.otp_expiry_seconds as i64)
    }

    pub fn verification_expiry(&self) -> Duration {
        Duration::seconds(self.verification_expiry_seconds as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a_compliant_password_is_accepted() {
        let policy = SecurityPolicy::default();
        assert!(policy.validate_pattern("Abcdef1!").is_ok());
    }

    #[test]
    fn test_each_character_class_is_required() {
        let policy = SecurityPolicy::default();

        // No upper case, number or symbol.
        assert_eq!(policy.validate_pattern("abcdefgh").unwrap_err().error_code(),
            ErrorCode::PasswordNeedsUppercase);

        assert_eq!(policy.validate_pattern("ABCDEF1!").unwrap_err().error_code(),
            ErrorCode::PasswordNeedsLowercase);

        assert_eq!(policy.validate_pattern("Abcdefg!").unwrap_err().error_code(),
            ErrorCode::PasswordNeedsNumber);

        assert_eq!(policy.validate_pattern("Abcdefg1").unwrap_err().error_code(),
            ErrorCode::PasswordNeedsSymbol);
    }

    #[test]
    fn test_length_bounds_are_enforced() {
        let policy = SecurityPolicy::default();

        // 7 characters - one short of the minimum.
        assert_eq!(policy.validate_pattern("Short1!").unwrap_err().error_code(),
            ErrorCode::PasswordTooShort);

        // Exactly 8 and exactly 20 are both fine.
        assert!(policy.validate_pattern("Abcdef1!").is_ok());
        assert!(policy.validate_pattern("Abcdefghijklmnop12!?").is_ok());

        // 21 characters.
        assert_eq!(policy.validate_pattern("Abcdefghijklmnopq12!?").unwrap_err().error_code(),
            ErrorCode::PasswordTooLong);
    }

    #[test]
    fn test_lock_durations_escalate_by_tier() {
        let policy = SecurityPolicy::default();

        assert_eq!(policy.lock_duration_for(1).num_seconds(), 15);
        assert_eq!(policy.lock_duration_for(5).num_seconds(), 15);
        assert_eq!(policy.lock_duration_for(6).num_seconds(), 60);
        assert_eq!(policy.lock_duration_for(10).num_seconds(), 60);
        assert_eq!(policy.lock_duration_for(11).num_seconds(), 300);
        assert_eq!(policy.lock_duration_for(15).num_seconds(), 300);
        assert_eq!(policy.lock_duration_for(16).num_seconds(), 3600);
        assert_eq!(policy.lock_duration_for(20).num_seconds(), 3600);
        assert_eq!(policy.lock_duration_for(10_000).num_seconds(), 3600);
    }

    #[test]
    fn test_lock_threshold_and_remaining_attempts() {
        let policy = SecurityPolicy::default();

        assert_eq!(policy.lock_threshold(), 5);
        assert_eq!(policy.remaining_attempts(3), 2);
        assert_eq!(policy.remaining_attempts(4), 1);
        assert_eq!(policy.remaining_attempts(5), 0);
        assert_eq!(policy.remaining_attempts(20), 0);
    }
}
