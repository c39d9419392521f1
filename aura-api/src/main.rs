use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use aura_api::{app, middleware::JwtIdentityVerifier, state::AppState};
use aura_core::repository::LedgerRepository;
use aura_order::{BookingOrchestrator, BookingRules};
use aura_store::{app_config::Config, open_store, AmadeusClient, KvLedgerRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aura_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Aura API on port {}", config.server.port);

    let store = open_store(&config.storage).await.context("Failed to open storage")?;
    let repo: Arc<dyn LedgerRepository> = Arc::new(KvLedgerRepository::new(store));

    let rules = BookingRules {
        starting_credits: config.business_rules.starting_credits,
        booking_delay: Duration::from_millis(config.business_rules.booking_delay_ms),
    };
    let orchestrator = BookingOrchestrator::load(repo.clone(), rules)
        .await
        .context("Failed to restore ledgers")?;

    let search = AmadeusClient::new(&config.amadeus, &config.search)?;
    let identity = JwtIdentityVerifier::new(&config.auth.jwt_secret);

    let app_state = AppState::build(
        Arc::new(orchestrator),
        Arc::new(search),
        Arc::new(identity),
        repo,
        &config.business_rules.default_currency,
    )
    .await?;

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
