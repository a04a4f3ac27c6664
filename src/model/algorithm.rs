use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use crate::utils::errors::RoostError;

///
/// Hash the plain text password into a PHC string using Argon2id with a
/// per-account random salt.
///
/// This is CPU-bound and should be run on the blocking worker thread pool.
///
/// ref: https://github.com/P-H-C/phc-string-format/blob/master/phc-sf-spec.md
///
pub fn hash_into_phc(plain_text_password: &str) -> Result<String, RoostError> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default().hash_password(plain_text_password.as_bytes(), &salt)?;
    Ok(phc.to_string())
}

///
/// Validate if the plain_text_password matches the hashed password provided.
///
pub fn verify(plain_text_password: &str, phc: &str) -> Result<bool, RoostError> {
    let parsed_hash = PasswordHash::new(phc)?;

    match Argon2::default().verify_password(plain_text_password.as_bytes(), &parsed_hash) {
        Ok(())                                        => Ok(true),
        Err(argon2::password_hash::Error::Password)   => Ok(false),
        Err(other)                                    => Err(other.into()),
    }
}

///
/// Check whether the candidate password matches any hash in the history.
///
/// Every entry is checked - a match does not stop the scan, so the time
/// taken does not reveal which (if any) entry matched.
///
pub fn is_reused(history: &[String], candidate: &str) -> Result<bool, RoostError> {
    let mut reused = false;

    for phc in history {
        if verify(candidate, phc)? {
            reused = true;
        }
    }

    Ok(reused)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let phc = hash_into_phc("W!bbl321").unwrap();
        assert!(phc.starts_with("$argon2id$"));

        assert_eq!(verify("W!bbl321", &phc).unwrap(), true);
        assert_eq!(verify("Hello456!", &phc).unwrap(), false);
    }

    #[test]
    fn test_salts_make_hashes_unique() {
        let first = hash_into_phc("W!bbl321").unwrap();
        let second = hash_into_phc("W!bbl321").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_reuse_is_detected_anywhere_in_history() {
        let history = vec!(
            hash_into_phc("Newest1!").unwrap(),
            hash_into_phc("Middle2@").unwrap(),
            hash_into_phc("Oldest3$").unwrap());

        assert_eq!(is_reused(&history, "Middle2@").unwrap(), true);
        assert_eq!(is_reused(&history, "Oldest3$").unwrap(), true);
        assert_eq!(is_reused(&history, "Unused4%").unwrap(), false);
        assert_eq!(is_reused(&[], "Unused4%").unwrap(), false);
    }
}
