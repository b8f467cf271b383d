use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use timetable::api::SchedulerClient;
use timetable::config::ConsoleConfig;
use timetable::server::create_router;
use timetable::types::ConsoleState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ConsoleConfig::from_env().context("Failed to load configuration")?;
    info!(
        api_base_url = %config.api_base_url,
        request_timeout_secs = config.request_timeout_secs,
        "Loaded configuration"
    );

    let client = SchedulerClient::new(&config).context("Failed to create scheduler client")?;

    let address = config.listen_address();
    let state = Arc::new(ConsoleState { client, config });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
