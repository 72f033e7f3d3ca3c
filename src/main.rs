use std::io;

use anyhow::Context;
use pulsenova::configuration::Settings;
use pulsenova::startup::Application;
use pulsenova::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = get_subscriber("pulsenova".into(), "info".into(), io::stdout);
    init_subscriber(subscriber);

    // Retrieve settings
    let config = Settings::get_config().context("Failed to load configuration")?;

    // Prepare the application and run it until it stops
    let application = Application::build(config)?;
    tracing::info!(port = application.port(), "Accepting subscriptions");
    application.run_until_stopped().await?;

    Ok(())
}
