use std::sync::Arc;
use chrono::{DateTime, Utc};
use mongodb::Database;
use parking_lot::RwLock;
use crate::model::policy::SecurityPolicy;
use crate::notify::{EmailSender, SmsSender};
use crate::utils::config::Configuration;
use crate::utils::time_provider::TimeProvider;

///
/// The context is available to every request handler and gives the flows
/// access to the DB, configuration, policy, clock and outbound gateways.
///
pub struct ServiceContext {
    db: Database,
    config: Configuration,
    policy: SecurityPolicy,
    time_provider: RwLock<TimeProvider>,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
}

impl ServiceContext {
    pub fn new(
        config: Configuration,
        db: Database,
        policy: SecurityPolicy,
        email: Arc<dyn EmailSender>,
        sms: Arc<dyn SmsSender>) -> Self {

        ServiceContext {
            db,
            config,
            policy,
            time_provider: RwLock::new(TimeProvider::default()),
            email,
            sms,
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn policy(&self) -> &SecurityPolicy {
        &self.policy
    }

    pub fn email(&self) -> &dyn EmailSender {
        self.email.as_ref()
    }

    pub fn sms(&self) -> &dyn SmsSender {
        self.sms.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.time_provider.read().now()
    }

    ///
    /// Set or clear the fixed time - tests use this to exercise lock and
    /// expiry windows without waiting them out.
    ///
    pub fn set_now(&self, now: Option<DateTime<Utc>>) {
        self.time_provider.write().fix(now);
    }
}
