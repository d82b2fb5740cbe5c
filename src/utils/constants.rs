use std::fmt::{self, Display};
use std::str::FromStr;

use alloy::primitives::{address, b256, Address, B256};
use clap::ValueEnum;

/// Uniswap V2 factory on Ethereum mainnet
pub const UNISWAP_V2_FACTORY: Address = address!("0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f");
/// Hash of the Uniswap V2 pair creation code
pub const UNISWAP_V2_INIT_CODE_HASH: B256 =
    b256!("0x96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f");

/// PancakeSwap V2 factory on BNB Chain
pub const PANCAKE_V2_FACTORY: Address = address!("0xca143ce32fe78f1f7019d7d551a6402fc5350c73");
/// Hash of the PancakeSwap V2 pair creation code (`INIT_CODE_PAIR_HASH`)
pub const PANCAKE_V2_INIT_CODE_HASH: B256 =
    b256!("0x00fb7f630766e6a796048ea87d01acd3068e8ff67d078148a3fa3f4a84f69bd5");

/// Known factory deployments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FactoryPreset {
    /// Uniswap V2, Ethereum mainnet
    UniswapV2,
    /// PancakeSwap V2, BNB Chain
    PancakeV2,
}

impl FactoryPreset {
    /// Factory address.
    #[must_use]
    pub const fn factory(self) -> Address {
        match self {
            Self::UniswapV2 => UNISWAP_V2_FACTORY,
            Self::PancakeV2 => PANCAKE_V2_FACTORY,
        }
    }

    /// Pair creation code hash.
    #[must_use]
    pub const fn init_code_hash(self) -> B256 {
        match self {
            Self::UniswapV2 => UNISWAP_V2_INIT_CODE_HASH,
            Self::PancakeV2 => PANCAKE_V2_INIT_CODE_HASH,
        }
    }
}

impl Display for FactoryPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UniswapV2 => write!(f, "uniswap-v2"),
            Self::PancakeV2 => write!(f, "pancake-v2"),
        }
    }
}

impl FromStr for FactoryPreset {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true).map_err(|_| eyre::eyre!("unknown factory preset {s}"))
    }
}
