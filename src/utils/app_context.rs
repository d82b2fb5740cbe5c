//! Application context holding the chain connection.

use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use eyre::{Error, Result};
use url::Url;

use crate::config::Config;
use crate::pool::{PairLedger, PoolResolver, PoolSizer};

/// Everything a command needs to talk to the chain.
pub struct AppContext {
    /// Pool sizer over the configured factory and HTTP provider
    pub sizer: PoolSizer<PairLedger<RootProvider>>,
}

impl AppContext {
    /// Connects to the configured RPC endpoint.
    ///
    /// # Errors
    /// * If `NUDGE_RPC_URL` is not set or cannot be parsed
    pub fn new(config: &Config) -> Result<Self, Error> {
        let rpc_url = config
            .rpc_url
            .as_deref()
            .ok_or_else(|| Error::msg("NUDGE_RPC_URL must be set"))?;
        let url = Url::parse(rpc_url)?;
        let provider = ProviderBuilder::new().on_http(url);

        let mut ledger = PairLedger::new((*provider.root()).clone());
        if let Some(timeout) = config.rpc_timeout {
            ledger = ledger.with_timeout(timeout);
        }
        log::info!("Connected to {} for {}", url_host(rpc_url), config.factory);

        Ok(Self {
            sizer: PoolSizer::new(ledger, config.resolver(), config.fee.clone()),
        })
    }

    /// Resolver for offline commands that never touch the network.
    #[must_use]
    pub fn offline_resolver(config: &Config) -> PoolResolver {
        config.resolver()
    }
}

/// Host part of an RPC URL, so API keys in the path never reach the log.
fn url_host(rpc_url: &str) -> String {
    Url::parse(rpc_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "<unknown>".to_string())
}
