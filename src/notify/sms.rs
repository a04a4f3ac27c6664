use async_trait::async_trait;
use serde_json::json;
use crate::notify::SmsSender;
use crate::utils::config::Configuration;

///
/// Sends reset OTPs through an HTTP SMS gateway API.
///
pub struct HttpSmsSender {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpSmsSender {
    pub fn new(config: &Configuration) -> Self {
        HttpSmsSender {
            client: reqwest::Client::new(),
            api_url: config.sms_api_url.clone(),
            api_key: config.sms_api_key.clone(),
        }
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn send(&self, phone: i64, otp: u32) -> bool {

        let payload = json!({
            "apiKey": self.api_key,
            "to": phone,
            "message": format!("Your OTP is {}", otp),
        });

        match self.client.post(&self.api_url).json(&payload).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!("Error in sending OTP: {}", err);
                false
            },
        }
    }
}
