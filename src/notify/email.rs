use async_trait::async_trait;
use serde_json::json;
use crate::notify::EmailSender;
use crate::utils::config::Configuration;
use crate::utils::errors::{ErrorCode, RoostError};

///
/// Sends mail through an HTTP mail gateway API.
///
pub struct HttpEmailSender {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpEmailSender {
    pub fn new(config: &Configuration) -> Self {
        HttpEmailSender {
            client: reqwest::Client::new(),
            api_url: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from: config.email_from.clone(),
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), RoostError> {

        let payload = json!({
            "apiKey": self.api_key,
            "from": self.from,
            "to": to,
            "subject": subject,
            "message": body,
        });

        let response = self.client.post(&self.api_url)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ErrorCode::EmailSendFailure
                .with_msg(&format!("Mail gateway returned {}", response.status())))
        }

        Ok(())
    }
}
