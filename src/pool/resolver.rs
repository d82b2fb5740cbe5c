//! Canonical pool ordering and deterministic pool address derivation.
//!
//! A constant-product factory deploys each pool with `CREATE2`, using the
//! hash of the two canonically ordered token addresses as salt. Knowing the
//! factory address and the hash of the pool's creation code is therefore
//! enough to compute any pool's address without asking the chain.

use alloy::primitives::{keccak256, Address, B256};

use super::error::PoolError;
use super::types::{AssetId, PoolKey, RawReserves, Reserves};

/// Marker byte that prefixes every `CREATE2` preimage.
const CREATE2_PREFIX: u8 = 0xff;

/// A 32-byte cryptographic hash over arbitrary bytes.
pub trait HashFn {
    /// Hashes `bytes`.
    fn hash(&self, bytes: &[u8]) -> B256;
}

/// Keccak-256, the hash the EVM uses for `CREATE2`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Keccak256;

impl HashFn for Keccak256 {
    fn hash(&self, bytes: &[u8]) -> B256 {
        keccak256(bytes)
    }
}

/// Canonical key for an unordered pair of assets.
///
/// # Errors
/// * `InvalidPoolKey` if both assets are the same
pub fn pool_key(asset_a: AssetId, asset_b: AssetId) -> Result<PoolKey, PoolError> {
    PoolKey::new(asset_a, asset_b)
}

/// `hash(low || high)`, each side packed as its raw 20 bytes.
pub fn pool_salt<H: HashFn + ?Sized>(key: &PoolKey, hasher: &H) -> B256 {
    let mut packed = [0u8; 40];
    packed[..20].copy_from_slice(key.low().address().as_slice());
    packed[20..].copy_from_slice(key.high().address().as_slice());
    hasher.hash(&packed)
}

/// Address the factory deploys the pool for `key` to.
///
/// Trailing 20 bytes of `hash(0xff || factory || salt || init_code_hash)`.
pub fn pool_address<H: HashFn + ?Sized>(
    factory: Address,
    key: &PoolKey,
    init_code_hash: B256,
    hasher: &H,
) -> Address {
    let salt = pool_salt(key, hasher);

    let mut preimage = [0u8; 85];
    preimage[0] = CREATE2_PREFIX;
    preimage[1..21].copy_from_slice(factory.as_slice());
    preimage[21..53].copy_from_slice(salt.as_slice());
    preimage[53..85].copy_from_slice(init_code_hash.as_slice());

    Address::from_slice(&hasher.hash(&preimage)[12..])
}

/// Re-aligns canonical `(low, high)` reserves to the caller's `(requested_a, requested_b)`.
///
/// # Errors
/// * `InvalidPoolKey` if the requested assets are not exactly the two sides of `key`
pub fn reorder_for_caller(
    key: &PoolKey,
    requested_a: AssetId,
    requested_b: AssetId,
    canonical: Reserves,
) -> Result<Reserves, PoolError> {
    if requested_a == key.low() && requested_b == key.high() {
        Ok(canonical)
    } else if requested_a == key.high() && requested_b == key.low() {
        Ok(canonical.swapped())
    } else {
        Err(PoolError::InvalidPoolKey(requested_a.address()))
    }
}

/// Puts ledger-ordered reserves into canonical `(low, high)` order.
///
/// `token0` is the asset the pool reports as its first token; `raw` holds
/// `(reserve0, reserve1)` in that order.
///
/// # Errors
/// * `LedgerOrderMismatch` if `token0` is neither side of `key`
pub fn canonical_reserves(
    key: &PoolKey,
    pool: Address,
    token0: Address,
    raw: RawReserves,
) -> Result<Reserves, PoolError> {
    let ledger_order = Reserves::new(raw.reserve0, raw.reserve1);
    if token0 == key.low().address() {
        Ok(ledger_order)
    } else if token0 == key.high().address() {
        Ok(ledger_order.swapped())
    } else {
        Err(PoolError::LedgerOrderMismatch {
            pool,
            reported: token0,
            expected: key.low().address(),
        })
    }
}

/// Fixed derivation inputs for one factory.
#[derive(Clone, Debug)]
pub struct PoolResolver<H = Keccak256> {
    /// Factory that deploys the pools
    factory: Address,
    /// Hash of the pool creation code
    init_code_hash: B256,
    /// Hash used for salt and address
    hasher: H,
}

impl PoolResolver<Keccak256> {
    /// Resolver using Keccak-256.
    #[must_use]
    pub const fn new(factory: Address, init_code_hash: B256) -> Self {
        Self::with_hasher(factory, init_code_hash, Keccak256)
    }
}

impl<H: HashFn> PoolResolver<H> {
    /// Resolver using a custom hash.
    pub const fn with_hasher(factory: Address, init_code_hash: B256, hasher: H) -> Self {
        Self {
            factory,
            init_code_hash,
            hasher,
        }
    }

    /// Factory address.
    #[must_use]
    pub const fn factory(&self) -> Address {
        self.factory
    }

    /// Pool creation code hash.
    #[must_use]
    pub const fn init_code_hash(&self) -> B256 {
        self.init_code_hash
    }

    /// Address of the pool for an already canonical key.
    #[must_use]
    pub fn address_for_key(&self, key: &PoolKey) -> Address {
        pool_address(self.factory, key, self.init_code_hash, &self.hasher)
    }

    /// Address of the pool trading `asset_a` against `asset_b`, in either order.
    ///
    /// # Errors
    /// * `InvalidPoolKey` if both assets are the same
    pub fn address_of(&self, asset_a: AssetId, asset_b: AssetId) -> Result<Address, PoolError> {
        Ok(self.address_for_key(&pool_key(asset_a, asset_b)?))
    }
}
