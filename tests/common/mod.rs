#![allow(dead_code)] // Not every test binary uses every helper.

use std::sync::Arc;
use rand::Rng;
use roost::db::mongo;
use roost::model::policy::SecurityPolicy;
use roost::notify::mock::{MockEmailSender, MockSmsSender};
use roost::services::register::CreateUserRequest;
use roost::utils::config::Configuration;
use roost::utils::context::ServiceContext;

///
/// A service context wired to a throw-away MongoDB database and mock
/// notification gateways. Each call gets a fresh database so tests can run
/// in parallel without trampling each other.
///
pub struct TestContext {
    pub ctx: Arc<ServiceContext>,
    pub email: Arc<MockEmailSender>,
    pub sms: Arc<MockSmsSender>,
}

pub async fn start_roost() -> TestContext {
    start_roost_with_sms(true).await
}

pub async fn start_roost_with_sms(sms_succeeds: bool) -> TestContext {

    let config = Configuration {
        address: "127.0.0.1:0".to_string(),
        db_name: format!("Roost_Test_{}", uuid::Uuid::new_v4().simple()),
        mongo_uri: std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
        mongo_credentials: None,
        jwt_secret: "test-secret".to_string(),
        base_url: "http://localhost:3000".to_string(),
        email_api_url: String::new(),
        email_api_key: String::new(),
        email_from: "noreply@roost.local".to_string(),
        sms_api_url: String::new(),
        sms_api_key: String::new(),
    };

    let db = mongo::get_mongo_db("Roost_Test", &config).await
        .expect("Unable to connect to MongoDB");

    mongo::update_mongo(&db).await
        .expect("Unable to initialise the test database");

    let email = Arc::new(MockEmailSender::default());
    let sms = Arc::new(MockSmsSender::new(sms_succeeds));

    let ctx = Arc::new(ServiceContext::new(
        config,
        db,
        SecurityPolicy::default(),
        email.clone(),
        sms.clone()));

    TestContext { ctx, email, sms }
}

pub fn unique_email() -> String {
    format!("{}@example.com", uuid::Uuid::new_v4().simple())
}

pub fn unique_phone() -> i64 {
    rand::thread_rng().gen_range(10_000_000_000i64..100_000_000_000i64)
}

pub fn create_request(email: &str, phone: i64, password: &str) -> CreateUserRequest {
    CreateUserRequest {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        phone,
        password: password.to_string(),
    }
}
