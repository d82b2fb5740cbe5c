//! Runtime configuration, read from the environment (and `.env` if present).
//!
//! | Variable                 | Meaning                                         |
//! |--------------------------|-------------------------------------------------|
//! | `NUDGE_RPC_URL`          | HTTP RPC endpoint, needed for ledger reads      |
//! | `NUDGE_RPC_TIMEOUT_SECS` | Upper bound on a single read                    |
//! | `NUDGE_PRESET`           | `uniswap-v2` or `pancake-v2` (default)          |
//! | `NUDGE_FACTORY`          | Factory address, overrides the preset           |
//! | `NUDGE_INIT_CODE_HASH`   | Pair creation code hash, overrides the preset   |
//! | `NUDGE_FEE_NUMERATOR`    | Fee factor numerator (default 100025)           |
//! | `NUDGE_FEE_DENOMINATOR`  | Fee factor denominator (default 100000)         |

use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::{Address, B256};
use eyre::{eyre, Result, WrapErr};

use crate::pool::{FeeRate, PoolResolver};
use crate::utils::constants::FactoryPreset;

/// Resolved configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP RPC endpoint
    pub rpc_url: Option<String>,
    /// Upper bound on a single ledger read
    pub rpc_timeout: Option<Duration>,
    /// Preset the factory defaults came from
    pub preset: FactoryPreset,
    /// Factory deploying the pools
    pub factory: Address,
    /// Pair creation code hash
    pub init_code_hash: B256,
    /// Input-side fee factor
    pub fee: FeeRate,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    /// * If a variable is set but cannot be parsed
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenv::dotenv() {
            log::debug!("config: no .env loaded ({e})");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    /// * If a variable is set but cannot be parsed
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let preset = match var("NUDGE_PRESET") {
            Some(value) => FactoryPreset::from_str(value.trim())?,
            None => FactoryPreset::PancakeV2,
        };
        let factory = parse_var(&var, "NUDGE_FACTORY")?.unwrap_or_else(|| preset.factory());
        let init_code_hash =
            parse_var(&var, "NUDGE_INIT_CODE_HASH")?.unwrap_or_else(|| preset.init_code_hash());

        let fee = match (
            parse_var::<u64>(&var, "NUDGE_FEE_NUMERATOR")?,
            parse_var::<u64>(&var, "NUDGE_FEE_DENOMINATOR")?,
        ) {
            (None, None) => FeeRate::default(),
            (numerator, denominator) => FeeRate::new(
                numerator.unwrap_or(100_025),
                denominator.unwrap_or(100_000),
            )
            .wrap_err("invalid NUDGE_FEE_NUMERATOR / NUDGE_FEE_DENOMINATOR")?,
        };

        let rpc_timeout = parse_var::<u64>(&var, "NUDGE_RPC_TIMEOUT_SECS")?.map(Duration::from_secs);

        Ok(Self {
            rpc_url: var("NUDGE_RPC_URL"),
            rpc_timeout,
            preset,
            factory,
            init_code_hash,
            fee,
        })
    }

    /// Switches to a preset's factory and init code hash.
    #[must_use]
    pub const fn with_preset(mut self, preset: FactoryPreset) -> Self {
        self.preset = preset;
        self.factory = preset.factory();
        self.init_code_hash = preset.init_code_hash();
        self
    }

    /// Resolver for the configured factory.
    #[must_use]
    pub const fn resolver(&self) -> PoolResolver {
        PoolResolver::new(self.factory, self.init_code_hash)
    }
}

/// Parses an optional variable, naming it in the error.
fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    var(name)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| eyre!("{name}: cannot parse {value:?}: {e}"))
        })
        .transpose()
}
