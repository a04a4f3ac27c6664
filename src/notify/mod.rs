pub mod email;
pub mod sms;

use async_trait::async_trait;
use crate::utils::errors::RoostError;

pub use email::HttpEmailSender;
pub use sms::HttpSmsSender;

///
/// Outbound email gateway. Callers decide whether a failure is fatal - the
/// registration flow treats verification mail as best-effort.
///
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), RoostError>;
}

///
/// Outbound SMS gateway for reset OTPs. Returns whether the message was
/// accepted - the forgot-password flow treats false as fatal.
///
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phone: i64, otp: u32) -> bool;
}

///
/// In-memory fakes for tests - they record every dispatch so assertions can
/// pull out the OTP or verification link that "went" to the user.
///
pub mod mock {
    use parking_lot::Mutex;
    use super::*;

    #[derive(Default)]
    pub struct MockEmailSender {
        pub sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl EmailSender for MockEmailSender {
        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), RoostError> {
            self.sent.lock().push((to.to_string(), subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    pub struct MockSmsSender {
        pub succeed: bool,
        pub sent: Mutex<Vec<(i64, u32)>>,
    }

    impl MockSmsSender {
        pub fn new(succeed: bool) -> Self {
            MockSmsSender { succeed, sent: Mutex::new(vec!()) }
        }

        pub fn last_otp(&self) -> Option<u32> {
            self.sent.lock().last().map(|(_, otp)| *otp)
        }
    }

    #[async_trait]
    impl SmsSender for MockSmsSender {
        async fn send(&self, phone: i64, otp: u32) -> bool {
            self.sent.lock().push((phone, otp));
            self.succeed
        }
    }
}
