use std::collections::HashMap;
use std::io;

use alloy::primitives::{Address, U256};

use super::error::LedgerError;
use super::ledger::LedgerQuery;
use super::resolver::PoolResolver;
use super::sizing::PoolSizer;
use super::types::{AssetId, FeeRate, RawReserves};
use crate::utils::constants::FactoryPreset;

/// Address from a short hex string, left padded with zeros: `"A"` is `0x00..0a`.
#[allow(dead_code)]
pub fn address_from_str(hex: &str) -> Address {
    format!("{hex:0>40}").parse().unwrap()
}

/// Asset id from a short hex string, see [`address_from_str`].
#[allow(dead_code)]
pub fn asset(hex: &str) -> AssetId {
    AssetId::from(address_from_str(hex))
}

/// `whole * 10^18`
#[allow(dead_code)]
pub fn ether(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10).pow(U256::from(18))
}

/// Sizer over the PancakeSwap V2 factory with its default fee.
#[allow(dead_code)]
pub fn sizer<L: LedgerQuery>(ledger: L) -> PoolSizer<L> {
    let preset = FactoryPreset::PancakeV2;
    PoolSizer::new(
        ledger,
        PoolResolver::new(preset.factory(), preset.init_code_hash()),
        FeeRate::pancake_v2(),
    )
}

/// In-memory ledger keyed by pool address.
#[derive(Default, Debug)]
pub struct MemoryLedger {
    pools: HashMap<Address, (Address, RawReserves)>,
    balances: HashMap<(Address, Address), U256>,
}

#[allow(dead_code)]
impl MemoryLedger {
    pub fn with_pool(self, pool: Address, token0: Address, reserve0: u64, reserve1: u64) -> Self {
        self.with_pool_wide(pool, token0, U256::from(reserve0), U256::from(reserve1))
    }

    pub fn with_pool_wide(
        mut self,
        pool: Address,
        token0: Address,
        reserve0: U256,
        reserve1: U256,
    ) -> Self {
        self.pools.insert(
            pool,
            (token0, RawReserves { reserve0, reserve1 }),
        );
        self
    }

    pub fn with_balance(mut self, pool: Address, holder: Address, balance: u64) -> Self {
        self.balances.insert((pool, holder), U256::from(balance));
        self
    }

    fn pool(&self, pool: Address) -> Result<&(Address, RawReserves), LedgerError> {
        self.pools.get(&pool).ok_or_else(|| {
            LedgerError::new(pool, io::Error::new(io::ErrorKind::NotFound, "no such pool"))
        })
    }
}

impl LedgerQuery for MemoryLedger {
    async fn get_reserves(&self, pool: Address) -> Result<RawReserves, LedgerError> {
        self.pool(pool).map(|(_, reserves)| *reserves)
    }

    async fn token0(&self, pool: Address) -> Result<Address, LedgerError> {
        self.pool(pool).map(|(token0, _)| *token0)
    }

    async fn balance_of(&self, pool: Address, holder: Address) -> Result<U256, LedgerError> {
        Ok(self.balances.get(&(pool, holder)).copied().unwrap_or_default())
    }
}

/// Ledger whose every read fails, as if the node were unreachable.
#[derive(Debug)]
pub struct FailingLedger;

impl FailingLedger {
    fn refuse(pool: Address) -> LedgerError {
        LedgerError::new(
            pool,
            io::Error::new(io::ErrorKind::ConnectionRefused, "node unreachable"),
        )
    }
}

impl LedgerQuery for FailingLedger {
    async fn get_reserves(&self, pool: Address) -> Result<RawReserves, LedgerError> {
        Err(Self::refuse(pool))
    }

    async fn token0(&self, pool: Address) -> Result<Address, LedgerError> {
        Err(Self::refuse(pool))
    }

    async fn balance_of(&self, pool: Address, _holder: Address) -> Result<U256, LedgerError> {
        Err(Self::refuse(pool))
    }
}
