use std::collections::HashMap;
use std::sync::Arc;

use aura_catalog::FlightFilterEngine;
use aura_core::currency;
use aura_core::identity::IdentityVerifier;
use aura_core::repository::{LedgerRepository, RepoError};
use aura_core::search::FlightSearchClient;
use aura_order::BookingOrchestrator;
use aura_shared::FlightSearchParams;
use tokio::sync::RwLock;

use crate::metrics::Metrics;

/// One user's search results and filters. Not persisted.
#[derive(Debug, Default)]
pub struct SearchSession {
    pub engine: FlightFilterEngine,
    /// Parameters of the last successful search
    pub params: Option<FlightSearchParams>,
}

impl SearchSession {
    /// Passengers on the last search, 1 when there was none.
    pub fn passenger_count(&self) -> u32 {
        self.params.as_ref().map(|p| p.adults).unwrap_or(1)
    }
}

/// Selected display currency per user, written through to the repository.
pub struct CurrencyPreferences {
    selected: RwLock<HashMap<String, String>>,
    repo: Arc<dyn LedgerRepository>,
}

impl CurrencyPreferences {
    pub async fn load(repo: Arc<dyn LedgerRepository>) -> Result<Self, RepoError> {
        let selected = repo.load_currency_preferences().await?;
        Ok(Self { selected: RwLock::new(selected), repo })
    }

    pub async fn get(&self, user_id: &str) -> Option<String> {
        self.selected.read().await.get(user_id).cloned()
    }

    pub async fn set(&self, user_id: &str, code: &str) -> Result<(), RepoError> {
        let mut selected = self.selected.write().await;
        let previous = selected.insert(user_id.to_string(), code.to_string());
        if let Err(e) = self.repo.save_currency_preferences(&selected).await {
            match previous {
                Some(prev) => selected.insert(user_id.to_string(), prev),
                None => selected.remove(user_id),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<BookingOrchestrator>,
    pub search: Arc<dyn FlightSearchClient>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub sessions: Arc<RwLock<HashMap<String, SearchSession>>>,
    pub preferences: Arc<CurrencyPreferences>,
    pub metrics: Arc<Metrics>,
    pub default_currency: String,
}

impl AppState {
    pub async fn build(
        orchestrator: Arc<BookingOrchestrator>,
        search: Arc<dyn FlightSearchClient>,
        identity: Arc<dyn IdentityVerifier>,
        repo: Arc<dyn LedgerRepository>,
        default_currency: &str,
    ) -> anyhow::Result<Self> {
        if !currency::is_supported(default_currency) {
            anyhow::bail!("unsupported default currency: {}", default_currency);
        }
        let preferences = CurrencyPreferences::load(repo)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load currency preferences: {}", e))?;

        Ok(Self {
            orchestrator,
            search,
            identity,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            preferences: Arc::new(preferences),
            metrics: Arc::new(Metrics::new()?),
            default_currency: default_currency.to_string(),
        })
    }

    /// The user's selected currency, or the configured default.
    pub async fn currency_for(&self, user_id: &str) -> String {
        self.preferences
            .get(user_id)
            .await
            .unwrap_or_else(|| self.default_currency.clone())
    }
}
