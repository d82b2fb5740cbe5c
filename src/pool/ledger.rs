//! Reading pool state from the chain.
//!
//! [`LedgerQuery`] is the only way the rest of the crate touches the network.
//! [`PairLedger`] implements it over any alloy [`Provider`]; tests use an
//! in-memory map instead.

use std::future::{Future, IntoFuture};
use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::sol;

use super::error::LedgerError;
use super::types::RawReserves;

sol!(
    #[sol(rpc)]
    interface IConstantProductPair {
        function token0() external view returns (address);
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function balanceOf(address owner) external view returns (uint256);
    }
);

/// Read access to constant-product pool contracts.
pub trait LedgerQuery {
    /// Current reserves of `pool`, in the pool's own `token0`/`token1` order.
    fn get_reserves(
        &self,
        pool: Address,
    ) -> impl Future<Output = Result<RawReserves, LedgerError>> + Send;

    /// The token the pool stores as `token0`.
    fn token0(&self, pool: Address) -> impl Future<Output = Result<Address, LedgerError>> + Send;

    /// Liquidity token balance of `holder` in `pool`.
    fn balance_of(
        &self,
        pool: Address,
        holder: Address,
    ) -> impl Future<Output = Result<U256, LedgerError>> + Send;
}

/// Error raised when a read exceeds the configured timeout.
#[derive(Debug, thiserror::Error)]
#[error("timed out after {0:?}")]
pub struct ReadTimeout(Duration);

/// [`LedgerQuery`] backed by an alloy provider.
#[derive(Clone, Debug)]
pub struct PairLedger<P> {
    /// Connection used for `eth_call`
    provider: P,
    /// Upper bound on a single read
    timeout: Option<Duration>,
}

impl<P: Provider + Clone> PairLedger<P> {
    /// Wraps a provider; reads are not time-limited.
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            timeout: None,
        }
    }

    /// Fails any read that takes longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Runs `read` under the configured timeout, mapping failures to [`LedgerError`].
    async fn bounded<T, E, F>(&self, pool: Address, read: F) -> Result<T, LedgerError>
    where
        F: IntoFuture<Output = Result<T, E>>,
        F::IntoFuture: Send,
        E: std::error::Error + Send + Sync + 'static,
    {
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, read).await {
                Ok(outcome) => outcome.map_err(|e| LedgerError::new(pool, e)),
                Err(_) => Err(LedgerError::new(pool, ReadTimeout(limit))),
            },
            None => read.await.map_err(|e| LedgerError::new(pool, e)),
        };
        if let Err(e) = &outcome {
            log::error!("ledger: {e}");
        }
        outcome
    }
}

impl<P: Provider + Clone> LedgerQuery for PairLedger<P> {
    async fn get_reserves(&self, pool: Address) -> Result<RawReserves, LedgerError> {
        let pair = IConstantProductPair::new(pool, &self.provider);
        let reserves = self.bounded(pool, pair.getReserves().call()).await?;
        let reserves = RawReserves {
            reserve0: U256::from(reserves.reserve0),
            reserve1: U256::from(reserves.reserve1),
        };
        log::debug!(
            "ledger: pool {pool} reserve0 {} reserve1 {}",
            reserves.reserve0,
            reserves.reserve1
        );
        Ok(reserves)
    }

    async fn token0(&self, pool: Address) -> Result<Address, LedgerError> {
        let pair = IConstantProductPair::new(pool, &self.provider);
        let token0 = self.bounded(pool, pair.token0().call()).await?._0;
        log::debug!("ledger: pool {pool} token0 {token0}");
        Ok(token0)
    }

    async fn balance_of(&self, pool: Address, holder: Address) -> Result<U256, LedgerError> {
        let pair = IConstantProductPair::new(pool, &self.provider);
        let balance = self.bounded(pool, pair.balanceOf(holder).call()).await?._0;
        log::debug!("ledger: pool {pool} balanceOf({holder}) {balance}");
        Ok(balance)
    }
}
