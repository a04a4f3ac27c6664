pub mod db;
pub mod model;
pub mod notify;
pub mod services;
pub mod utils;

use db::mongo;
use tokio::signal;
use dotenv::dotenv;
use std::sync::Arc;
use model::policy::SecurityPolicy;
use notify::{HttpEmailSender, HttpSmsSender};
use utils::errors::RoostError;
use utils::context::ServiceContext;
use utils::config::{Configuration, self};
use tokio::sync::oneshot::{self};
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, Registry, util::SubscriberInitExt};

const APP_NAME: &str = "Roost";

///
/// Entry point to start the app.
///
pub async fn lib_main() -> Result<(), RoostError> {

    // Load any local dev settings as environment variables from a .env file.
    dotenv().ok();

    // Default log level to INFO if it's not specified.
    config::default_env("RUST_LOG", "INFO");

    // SIGINT/ctrl+c handling for graceful shutdown.
    let (signal_tx, signal_rx) = oneshot::channel();
    let _signal = tokio::spawn(wait_for_signal(signal_tx));

    // Load the service configuration into struct and initialise any lazy statics.
    let config = Configuration::from_env().expect("The service configuration is not correct");

    init_tracing();

    tracing::info!("{}\n{}", BANNER, config.fmt_console()?);

    // Create a MongoDB client and connect to it before proceeding.
    let db = mongo::get_mongo_db(APP_NAME, &config).await?;

    // Ensure the schema is in sync with the code.
    mongo::update_mongo(&db).await?;

    // Outbound gateways for verification mail and reset OTPs.
    let email = Arc::new(HttpEmailSender::new(&config));
    let sms = Arc::new(HttpSmsSender::new(&config));

    // The service context allows any handler access to shared stuff (database, policy, notification gateways, etc.).
    let ctx = Arc::new(ServiceContext::new(
        config.clone(),
        db,
        SecurityPolicy::default(),
        email,
        sms));

    let listener = tokio::net::TcpListener::bind(&config.address).await?;

    tracing::info!("{} listening on {}", APP_NAME, config.address);

    axum::serve(listener, services::router(ctx))
        .with_graceful_shutdown(async {
            signal_rx.await.ok();
            tracing::info!("Graceful shutdown");
        })
        .await?;

    Ok(())
}

///
/// Sends a oneshot signal when a SIGINT is received (Ctrl+C)
///
async fn wait_for_signal(tx: oneshot::Sender<()>) {
    let _ = signal::ctrl_c().await;
    tracing::info!("SIGINT received: shutting down");
    let _ = tx.send(());
}

///
/// Initialise tracing against the RUST_LOG env variable.
///
fn init_tracing() {
    if let Err(err) = Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env()) // Set the tracing level to match RUST_LOG env variable.
        .with(tracing_subscriber::fmt::layer().with_test_writer().with_ansi(true))
        .try_init() {
            tracing::info!("Tracing already initialised: {}", err.to_string()); // Allowed error here - tests call this fn repeatedly.
    }
}

const BANNER: &str = r#"
__________                        __
\______   \ ____   ____  _______/  |_
 |       _//  _ \ /  _ \/  ___/\   __\
 |    |   (  <_> |  <_> )___ \  |  |
 |____|_  /\____/ \____/____  > |__|
        \/                  \/
"#;
