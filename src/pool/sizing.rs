//! Swap sizing for constant-product pools.
//!
//! Given reserves `a` and `b` with `a * b = k`, the tokenA reserve at which
//! one tokenB costs `p` tokenA satisfies `a' * a' = k * p`. Charging the fee
//! on the input side scales that by the fee factor, so the required input is
//!
//! ```text
//! isqrt(a * b * p * fee_num / (scale * fee_den)) - a
//! ```
//!
//! All products are taken at full precision before the single division.

use alloy::primitives::{Address, U256};
use num_bigint::BigUint;
use serde::Serialize;

use super::error::PoolError;
use super::ledger::LedgerQuery;
use super::math::{checked_div, from_u256, isqrt, to_u256};
use super::resolver::{
    canonical_reserves, pool_key, reorder_for_caller, HashFn, Keccak256, PoolResolver,
};
use super::types::{AssetId, FeeRate, Reserves, TargetPrice};

/// Basis points in one whole.
const BPS: u32 = 10_000;

/// Spot price of tokenB quoted in tokenA, `reserve_a * scale / reserve_b`.
///
/// # Errors
/// * `ZeroDivision` if `reserve_b` is zero
pub fn spot_price(reserve_a: U256, reserve_b: U256, scale: &BigUint) -> Result<BigUint, PoolError> {
    checked_div(
        &(from_u256(reserve_a) * scale),
        &from_u256(reserve_b),
        "reserve",
    )
}

/// Target price `bps` basis points above the current spot price.
///
/// # Errors
/// * `ZeroDivision` if a reserve or `scale` is zero
/// * `InvalidTargetPrice` if the result rounds to zero
pub fn target_above_spot(reserves: &Reserves, bps: u32, scale: BigUint) -> Result<TargetPrice, PoolError> {
    if reserves.reserve_a.is_zero() {
        return Err(PoolError::ZeroDivision("reserve"));
    }
    TargetPrice::from_ratio(
        from_u256(reserves.reserve_a) * (BigUint::from(BPS) + BigUint::from(bps)),
        from_u256(reserves.reserve_b) * BigUint::from(BPS),
        scale,
    )
}

/// Amount of tokenA to swap in so that tokenB ends up priced at `target`.
///
/// # Errors
/// * `ZeroDivision` if either reserve is zero
/// * `PriceAlreadyAtOrBeyondTarget` if `target` is not above the current spot price
/// * `Overflow` if the amount does not fit in 256 bits
pub fn swap_amount_to_reach_price(
    reserve_a: U256,
    reserve_b: U256,
    target: &TargetPrice,
    fee: &FeeRate,
) -> Result<U256, PoolError> {
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(PoolError::ZeroDivision("reserve"));
    }
    let a = from_u256(reserve_a);
    let b = from_u256(reserve_b);

    // target <= a / b, compared without rounding
    if target.value() * &b <= &a * target.scale() {
        return Err(already_at_target(reserve_a, reserve_b, target));
    }

    let radicand = checked_div(
        &(&a * &b * target.value() * fee.numerator()),
        &(target.scale() * fee.denominator()),
        "price scale",
    )?;
    let new_reserve_a = isqrt(&radicand);

    // A fee factor below one can pull the root back under the current reserve
    if new_reserve_a <= a {
        return Err(already_at_target(reserve_a, reserve_b, target));
    }
    to_u256(&(new_reserve_a - a))
}

/// Builds the "nothing to do" error with both prices in the target's scale.
fn already_at_target(reserve_a: U256, reserve_b: U256, target: &TargetPrice) -> PoolError {
    let spot = spot_price(reserve_a, reserve_b, target.scale())
        .map_or_else(|_| "undefined".to_string(), |spot| spot.to_string());
    PoolError::PriceAlreadyAtOrBeyondTarget {
        target: target.value().to_string(),
        spot,
    }
}

/// Reserves of `pool`, aligned to `(asset_a, asset_b)`.
///
/// The ledger reports `(reserve0, reserve1)` in its own `token0` order, so
/// `token0` is read alongside and the pair is first put into canonical
/// `(low, high)` order, then swapped when `asset_a` is the high side.
///
/// # Errors
/// * `InvalidPoolKey` if the assets are identical
/// * `LedgerQueryFailed` if either read fails
/// * `LedgerOrderMismatch` if the pool's `token0` is neither asset
pub async fn reserves<L: LedgerQuery + ?Sized>(
    ledger: &L,
    pool: Address,
    asset_a: AssetId,
    asset_b: AssetId,
) -> Result<Reserves, PoolError> {
    let key = pool_key(asset_a, asset_b)?;
    let (token0, raw) = tokio::try_join!(ledger.token0(pool), ledger.get_reserves(pool))?;
    let canonical = canonical_reserves(&key, pool, token0, raw)?;
    reorder_for_caller(&key, asset_a, asset_b, canonical)
}

/// Outcome of a sizing request.
#[derive(Clone, Debug, Serialize)]
pub struct SwapPlan {
    /// Pool the swap goes through
    pub pool: Address,
    /// Asset swapped in
    pub token_in: Address,
    /// Asset received
    pub token_out: Address,
    /// Reserves before the swap, aligned to `(token_in, token_out)`
    pub reserves: Reserves,
    /// Current price of `token_out` in `token_in`, fixed point
    pub spot_price: String,
    /// Requested price, fixed point
    pub target_price: String,
    /// Fixed-point scale of both prices
    pub price_scale: String,
    /// Required input amount
    pub amount_in: U256,
    /// `token_in` reserve after the swap
    pub new_reserve_in: U256,
}

/// Resolves pools, reads their reserves and sizes swaps against one factory.
#[derive(Clone, Debug)]
pub struct PoolSizer<L, H = Keccak256> {
    /// Source of pool state
    ledger: L,
    /// Pool address derivation
    resolver: PoolResolver<H>,
    /// Input-side fee factor
    fee: FeeRate,
}

impl<L: LedgerQuery, H: HashFn> PoolSizer<L, H> {
    /// Creates a sizer.
    pub const fn new(ledger: L, resolver: PoolResolver<H>, fee: FeeRate) -> Self {
        Self {
            ledger,
            resolver,
            fee,
        }
    }

    /// The pool address derivation in use.
    pub const fn resolver(&self) -> &PoolResolver<H> {
        &self.resolver
    }

    /// The ledger in use.
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Address of the pool for `asset_a`/`asset_b`.
    ///
    /// # Errors
    /// * `InvalidPoolKey` if the assets are identical
    pub fn pool_address(&self, asset_a: AssetId, asset_b: AssetId) -> Result<Address, PoolError> {
        self.resolver.address_of(asset_a, asset_b)
    }

    /// Reserves of the `asset_a`/`asset_b` pool, in the caller's order.
    ///
    /// # Errors
    /// * `InvalidPoolKey` if the assets are identical
    /// * `LedgerQueryFailed` if the read fails
    pub async fn reserves(&self, asset_a: AssetId, asset_b: AssetId) -> Result<Reserves, PoolError> {
        let pool = self.pool_address(asset_a, asset_b)?;
        reserves(&self.ledger, pool, asset_a, asset_b).await
    }

    /// Amount of `token_in` to swap so `token_out` ends up priced at `target`.
    ///
    /// # Errors
    /// * Any error of [`Self::reserves`] or [`swap_amount_to_reach_price`]
    pub async fn calculate_swap_amount(
        &self,
        token_in: AssetId,
        token_out: AssetId,
        target: &TargetPrice,
    ) -> Result<U256, PoolError> {
        let reserves = self.reserves(token_in, token_out).await?;
        swap_amount_to_reach_price(reserves.reserve_a, reserves.reserve_b, target, &self.fee)
    }

    /// Like [`Self::calculate_swap_amount`], returning the full picture.
    ///
    /// # Errors
    /// * Any error of [`Self::reserves`] or [`swap_amount_to_reach_price`]
    pub async fn plan(
        &self,
        token_in: AssetId,
        token_out: AssetId,
        target: &TargetPrice,
    ) -> Result<SwapPlan, PoolError> {
        let pool = self.pool_address(token_in, token_out)?;
        let reserves = reserves(&self.ledger, pool, token_in, token_out).await?;
        Self::plan_from(pool, token_in, token_out, reserves, target, &self.fee)
    }

    /// Sizes a swap that lifts the price of `token_out` by `bps` basis points.
    ///
    /// # Errors
    /// * Any error of [`Self::reserves`] or [`swap_amount_to_reach_price`]
    pub async fn plan_bump(
        &self,
        token_in: AssetId,
        token_out: AssetId,
        bps: u32,
        scale: BigUint,
    ) -> Result<SwapPlan, PoolError> {
        let pool = self.pool_address(token_in, token_out)?;
        let reserves = reserves(&self.ledger, pool, token_in, token_out).await?;
        let target = target_above_spot(&reserves, bps, scale)?;
        Self::plan_from(pool, token_in, token_out, reserves, &target, &self.fee)
    }

    /// Liquidity token balance of `holder` in the `asset_a`/`asset_b` pool.
    ///
    /// # Errors
    /// * `InvalidPoolKey` if the assets are identical
    /// * `LedgerQueryFailed` if the read fails
    pub async fn lp_balance(
        &self,
        asset_a: AssetId,
        asset_b: AssetId,
        holder: Address,
    ) -> Result<U256, PoolError> {
        let pool = self.pool_address(asset_a, asset_b)?;
        Ok(self.ledger.balance_of(pool, holder).await?)
    }

    /// Sizes the swap for already fetched reserves.
    fn plan_from(
        pool: Address,
        token_in: AssetId,
        token_out: AssetId,
        reserves: Reserves,
        target: &TargetPrice,
        fee: &FeeRate,
    ) -> Result<SwapPlan, PoolError> {
        let amount_in =
            swap_amount_to_reach_price(reserves.reserve_a, reserves.reserve_b, target, fee)?;
        let spot = spot_price(reserves.reserve_a, reserves.reserve_b, target.scale())?;
        Ok(SwapPlan {
            pool,
            token_in: token_in.address(),
            token_out: token_out.address(),
            reserves,
            spot_price: spot.to_string(),
            target_price: target.value().to_string(),
            price_scale: target.scale().to_string(),
            amount_in,
            new_reserve_in: reserves.reserve_a.checked_add(amount_in).ok_or(PoolError::Overflow)?,
        })
    }
}
