use std::sync::Arc;

use bookpeckers_api::{
    api::{create_router, AppState},
    config::Config,
    services::OpenRouterClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookpeckers_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let client = OpenRouterClient::new(&config)?;
    tracing::info!(
        model = %config.model,
        request_timeout_secs = config.request_timeout_secs,
        analysis_timeout_secs = config.analysis_timeout_secs,
        "Completion client configured"
    );
    if config.analysis_timeout() >= config.request_timeout() {
        tracing::warn!(
            "ANALYSIS_TIMEOUT_SECS is not below REQUEST_TIMEOUT_SECS; the transport timeout bounds each analysis"
        );
    }

    let state = AppState::with_client(Arc::new(client), config.analysis_timeout());
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
