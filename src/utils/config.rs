use std::fmt::Write;
use std::env::VarError;
use config::ConfigError;
use serde::{Deserialize, Serialize};
use super::errors::RoostError;

///
/// The service configuration - initialised at start-up.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Configuration {
    pub address: String,                   // The address and port to host the server on.
    pub db_name: String,                   // The MongoDB name to use.
    pub mongo_uri: String,                 // The MongoDB connection URI.
    pub mongo_credentials: Option<String>, // Optional path to a secrets file holding username and password on separate lines.
    pub jwt_secret: String,                // The HMAC secret used to sign session tokens.
    pub base_url: String,                  // Public base url used to build email verification links.
    pub email_api_url: String,             // The outbound mail gateway endpoint.
    pub email_api_key: String,             // The mail gateway api key.
    pub email_from: String,                // The from address on outbound mail.
    pub sms_api_url: String,               // The outbound SMS gateway endpoint.
    pub sms_api_key: String,               // The SMS gateway api key.
}

impl Configuration {
    ///
    /// Load the service's configuration.
    ///
    pub fn from_env() -> Result<Configuration, ConfigError> {
        let mut cfg = config::Config::default();

        // Merge any environment variables with the same name as the struct fields.
        cfg.merge(config::Environment::new())?;

        // Set defaults for settings that were not specified.
        cfg.set_default("address", "0.0.0.0:3000")?;
        cfg.set_default("db_name", "Roost")?;
        cfg.set_default("mongo_uri", "mongodb://localhost:27017")?;
        cfg.set_default("mongo_credentials", None::<String>)?;
        cfg.set_default("jwt_secret", "insecure-development-secret")?;
        cfg.set_default("base_url", "http://localhost:3000")?;
        cfg.set_default("email_api_url", "https://api.managepoint.co/api/mail/send")?;
        cfg.set_default("email_api_key", "")?;
        cfg.set_default("email_from", "noreply@roost.local")?;
        cfg.set_default("sms_api_url", "https://api.managepoint.co/api/sms/send")?;
        cfg.set_default("sms_api_key", "")?;

        let config: Configuration = cfg.try_into()?;

        Ok(config)
    }

    ///
    /// Pretty-print the config - secrets are masked.
    ///
    pub fn fmt_console(&self) -> Result<String, RoostError> {
        // Serialise to JSON so we have fields to iterate.
        let values = serde_json::to_value(self)?;

        // Turn into a hashmap.
        let values = values.as_object().expect("No config props");

        // Sort by keys.
        let mut sorted: Vec<_> = values.iter().collect();
        sorted.sort_by_key(|a| a.0);

        let mut output = String::new();
        for (k, v) in sorted {
            match k.contains("secret") || k.contains("key") {
                true  => writeln!(&mut output, "{:>23}: ******", k).unwrap(),
                false => writeln!(&mut output, "{:>23}: {}", k, v).unwrap(),
            }
        }

        Ok(output)
    }
}

///
/// If the specified environment variable is not set for this process, set it to the default value specified.
///
pub fn default_env(key: &str, value: &str) {
    if let Err(VarError::NotPresent) = std::env::var(key) {
        std::env::set_var(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_are_masked_in_console_output() {
        let config = Configuration {
            address: "0.0.0.0:3000".to_string(),
            db_name: "Roost".to_string(),
            mongo_uri: "mongodb://localhost:27017".to_string(),
            mongo_credentials: None,
            jwt_secret: "super-secret".to_string(),
            base_url: "http://localhost:3000".to_string(),
            email_api_url: "https://mail.example.com".to_string(),
            email_api_key: "mail-key".to_string(),
            email_from: "noreply@roost.local".to_string(),
            sms_api_url: "https://sms.example.com".to_string(),
            sms_api_key: "sms-key".to_string(),
        };

        let output = config.fmt_console().unwrap();
        assert!(!output.contains("super-secret"));
        assert!(!output.contains("mail-key"));
        assert!(!output.contains("sms-key"));
        assert!(output.contains("mongodb://localhost:27017"));
    }
}
