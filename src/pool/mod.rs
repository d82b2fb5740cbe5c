//! # Pool Module
//!
//! Deterministic pool resolution and swap sizing for constant-product pools.
//! Given two tokens it derives the pool address offline, reads and re-orders
//! the pool's reserves, and computes the input needed to move the pool's
//! price to a target.

/// Errors for resolution, ledger reads and sizing
pub mod error;
/// Reading pool state through a provider
pub mod ledger;
/// Arbitrary-precision arithmetic and integer square root
pub mod math;
/// Canonical ordering and `CREATE2` pool addresses
pub mod resolver;
/// Swap sizing against a target price
pub mod sizing;
/// Test helpers and utilities
#[cfg(test)]
mod test_helpers;
/// Asset, pool key, reserve and price types
pub mod types;

pub use error::{LedgerError, PoolError};
pub use ledger::{LedgerQuery, PairLedger};
pub use resolver::{
    canonical_reserves, pool_address, pool_key, reorder_for_caller, HashFn, Keccak256, PoolResolver,
};
pub use sizing::{reserves, swap_amount_to_reach_price, PoolSizer, SwapPlan};
pub use types::{AssetId, FeeRate, PoolKey, RawReserves, Reserves, TargetPrice};
