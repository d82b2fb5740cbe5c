use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use alloy::primitives::{Address, U256};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;

use super::error::PoolError;
use super::math::{checked_div, pow10};

/// Fixed-point scale used for prices unless stated otherwise (`10^18`).
pub const PRICE_DECIMALS: u32 = 18;

/// A 20-byte token or contract identifier.
///
/// Equality and ordering follow the canonical lowercase hex form. For fixed
/// width hex that is the same as comparing the raw big-endian bytes, which is
/// what the derived impls below do.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(Address);

impl AssetId {
    /// Wraps a raw address.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// The raw 20 bytes.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.0
    }

    /// Canonical lowercase `0x`-prefixed hex form.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("{:#x}", self.0)
    }
}

impl From<Address> for AssetId {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl From<AssetId> for Address {
    fn from(asset: AssetId) -> Self {
        asset.0
    }
}

/// Accepts hex with or without `0x`, in any letter case. Mixed-case input is
/// not checked against the EIP-55 checksum.
impl FromStr for AssetId {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        Address::from_str(&hex.to_ascii_lowercase())
            .map(Self)
            .map_err(|_| PoolError::InvalidAssetId(s.to_string()))
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({})", self.canonical())
    }
}

/// Canonically ordered pair of distinct assets identifying one pool.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PoolKey {
    /// The asset with the smaller canonical hex form
    low: AssetId,
    /// The asset with the larger canonical hex form
    high: AssetId,
}

impl PoolKey {
    /// Orders two assets canonically.
    ///
    /// # Errors
    /// * `InvalidPoolKey` if both assets are the same
    pub fn new(asset_a: AssetId, asset_b: AssetId) -> Result<Self, PoolError> {
        match asset_a.cmp(&asset_b) {
            Ordering::Less => Ok(Self {
                low: asset_a,
                high: asset_b,
            }),
            Ordering::Greater => Ok(Self {
                low: asset_b,
                high: asset_a,
            }),
            Ordering::Equal => Err(PoolError::InvalidPoolKey(asset_a.address())),
        }
    }

    /// The canonically smaller asset (the pool's `token0`).
    #[must_use]
    pub const fn low(&self) -> AssetId {
        self.low
    }

    /// The canonically larger asset (the pool's `token1`).
    #[must_use]
    pub const fn high(&self) -> AssetId {
        self.high
    }

    /// Whether `asset` is one side of this pool.
    #[must_use]
    pub fn contains(&self, asset: AssetId) -> bool {
        self.low == asset || self.high == asset
    }

    /// Whether `asset` is the low side of this pool.
    #[must_use]
    pub fn is_low(&self, asset: AssetId) -> bool {
        self.low == asset
    }
}

impl Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.low, self.high)
    }
}

/// Reserves as the ledger reports them, in the pool's own `token0`/`token1` order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RawReserves {
    /// Balance of the pool's `token0`
    pub reserve0: U256,
    /// Balance of the pool's `token1`
    pub reserve1: U256,
}

/// Two pool balances aligned to some pair of assets.
///
/// Whether the order is canonical or the caller's depends on who produced it;
/// see [`crate::pool::resolver::reorder_for_caller`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct Reserves {
    /// Balance of the first asset
    pub reserve_a: U256,
    /// Balance of the second asset
    pub reserve_b: U256,
}

impl Reserves {
    /// Builds reserves from two balances.
    #[must_use]
    pub const fn new(reserve_a: U256, reserve_b: U256) -> Self {
        Self {
            reserve_a,
            reserve_b,
        }
    }

    /// Same balances, sides exchanged.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            reserve_a: self.reserve_b,
            reserve_b: self.reserve_a,
        }
    }
}

/// Proportional fee charged on the input side of a swap.
///
/// The required input is scaled by `numerator / denominator`, so a factor
/// above one (e.g. `100025/100000`) makes the swap larger to cover the fee.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FeeRate {
    /// Scale factor numerator
    numerator: BigUint,
    /// Scale factor denominator
    denominator: BigUint,
}

impl FeeRate {
    /// Builds a fee rate.
    ///
    /// # Errors
    /// * `ZeroDivision` if `denominator` is zero
    /// * `InvalidFeeRate` if `numerator` is zero
    pub fn new(numerator: impl Into<BigUint>, denominator: impl Into<BigUint>) -> Result<Self, PoolError> {
        let numerator = numerator.into();
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(PoolError::ZeroDivision("fee denominator"));
        }
        if numerator.is_zero() {
            return Err(PoolError::InvalidFeeRate);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// The factor used by PancakeSwap V2 tooling: `100025 / 100000`.
    #[must_use]
    pub fn pancake_v2() -> Self {
        Self {
            numerator: BigUint::from(100_025u32),
            denominator: BigUint::from(100_000u32),
        }
    }

    /// Fee factor numerator.
    #[must_use]
    pub const fn numerator(&self) -> &BigUint {
        &self.numerator
    }

    /// Fee factor denominator.
    #[must_use]
    pub const fn denominator(&self) -> &BigUint {
        &self.denominator
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::pancake_v2()
    }
}

/// Desired post-swap price of tokenB quoted in tokenA, as a fixed-point value.
///
/// `value / scale` tokenA per tokenB. With `scale = 10^18`, a value of
/// `1010 * 10^18` means one tokenB should cost 1010 tokenA.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TargetPrice {
    /// Fixed-point price
    value: BigUint,
    /// Fixed-point scale
    scale: BigUint,
}

impl TargetPrice {
    /// Builds a target price in the given scale.
    ///
    /// # Errors
    /// * `ZeroDivision` if `scale` is zero
    /// * `InvalidTargetPrice` if `value` is zero
    pub fn new(value: impl Into<BigUint>, scale: impl Into<BigUint>) -> Result<Self, PoolError> {
        let value = value.into();
        let scale = scale.into();
        if scale.is_zero() {
            return Err(PoolError::ZeroDivision("price scale"));
        }
        if value.is_zero() {
            return Err(PoolError::InvalidTargetPrice);
        }
        Ok(Self { value, scale })
    }

    /// Builds a target price in the default `10^18` scale.
    ///
    /// # Errors
    /// * `InvalidTargetPrice` if `value` is zero
    pub fn with_default_scale(value: impl Into<BigUint>) -> Result<Self, PoolError> {
        Self::new(value, pow10(PRICE_DECIMALS))
    }

    /// `numerator / denominator` expressed in `scale`, rounded down.
    ///
    /// # Errors
    /// * `ZeroDivision` if `denominator` or `scale` is zero
    /// * `InvalidTargetPrice` if the scaled ratio rounds to zero
    pub fn from_ratio(
        numerator: impl Into<BigUint>,
        denominator: impl Into<BigUint>,
        scale: impl Into<BigUint>,
    ) -> Result<Self, PoolError> {
        let scale = scale.into();
        let value = checked_div(&(numerator.into() * &scale), &denominator.into(), "price ratio")?;
        Self::new(value, scale)
    }

    /// The fixed-point value.
    #[must_use]
    pub const fn value(&self) -> &BigUint {
        &self.value
    }

    /// The fixed-point scale.
    #[must_use]
    pub const fn scale(&self) -> &BigUint {
        &self.scale
    }
}

/// Parses a plain decimal such as `1010` or `0.0125` into the default scale.
impl FromStr for TargetPrice {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        let all_digits = |part: &str| part.bytes().all(|c| c.is_ascii_digit());
        if whole.is_empty() && fraction.is_empty()
            || !all_digits(whole)
            || !all_digits(fraction)
            || fraction.len() > PRICE_DECIMALS as usize
        {
            return Err(PoolError::InvalidTargetPrice);
        }

        let digits = format!("{whole}{fraction:0<width$}", width = PRICE_DECIMALS as usize);
        let value = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or(PoolError::InvalidTargetPrice)?;
        Self::with_default_scale(value)
    }
}

impl Display for TargetPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.scale)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pool::test_helpers::asset;

    #[test]
    fn test_parse_any_case() {
        let lower: AssetId = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".parse().unwrap();
        let mixed: AssetId = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().unwrap();
        let upper: AssetId = "C02AAA39B223FE8D0A0E5C4F27EAD9083C756CC2".parse().unwrap();
        assert_eq!(lower, mixed);
        assert_eq!(lower, upper);
        assert_eq!(
            mixed.to_string(),
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "0x", "0x1234", "not an address", "0xzz2aaa39b223fe8d0a0e5c4f27ead9083c756cc2"] {
            assert!(matches!(
                input.parse::<AssetId>(),
                Err(PoolError::InvalidAssetId(_))
            ));
        }
    }

    #[test]
    fn test_ordering_matches_lowercase_hex() {
        let ids = [
            asset("A"),
            asset("0f"),
            asset("F0"),
            asset("b1"),
            asset("1"),
            asset("ff00000000000000000000000000000000000001"),
        ];
        for a in &ids {
            for b in &ids {
                assert_eq!(a.cmp(b), a.canonical().cmp(&b.canonical()), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_pool_key_orders_and_rejects_self() {
        let a = asset("A");
        let b = asset("B");
        let key = PoolKey::new(b, a).unwrap();
        assert_eq!(key.low(), a);
        assert_eq!(key.high(), b);
        assert_eq!(key, PoolKey::new(a, b).unwrap());
        assert!(key.contains(a) && key.contains(b));
        assert!(key.is_low(a));
        assert!(!key.contains(asset("C")));

        assert!(matches!(
            PoolKey::new(a, a),
            Err(PoolError::InvalidPoolKey(addr)) if addr == a.address()
        ));
    }

    #[test]
    fn test_fee_rate_validation() {
        assert!(FeeRate::new(997u32, 1000u32).is_ok());
        assert!(matches!(
            FeeRate::new(1u32, 0u32),
            Err(PoolError::ZeroDivision(_))
        ));
        assert!(matches!(
            FeeRate::new(0u32, 1000u32),
            Err(PoolError::InvalidFeeRate)
        ));
        assert_eq!(FeeRate::default(), FeeRate::new(100_025u32, 100_000u32).unwrap());
    }

    #[test]
    fn test_target_price_validation() {
        assert!(matches!(
            TargetPrice::new(0u32, 1000u32),
            Err(PoolError::InvalidTargetPrice)
        ));
        assert!(matches!(
            TargetPrice::new(5u32, 0u32),
            Err(PoolError::ZeroDivision(_))
        ));

        let price = TargetPrice::from_ratio(101u32, 100u32, 1000u32).unwrap();
        assert_eq!(price.value(), &BigUint::from(1010u32));
        assert_eq!(price.scale(), &BigUint::from(1000u32));

        assert!(matches!(
            TargetPrice::from_ratio(1u32, 10_000u32, 1000u32),
            Err(PoolError::InvalidTargetPrice)
        ));
    }

    #[test]
    fn test_target_price_from_decimal() {
        let one = pow10(PRICE_DECIMALS);
        for (input, expected) in [
            ("1010", BigUint::from(1010u32) * &one),
            ("1010.5", BigUint::from(10_105u32) * &one / BigUint::from(10u32)),
            (".25", &one / BigUint::from(4u32)),
            ("0.000000000000000001", BigUint::from(1u32)),
            (" 7. ", BigUint::from(7u32) * &one),
        ] {
            let price: TargetPrice = input.parse().unwrap();
            assert_eq!(price.value(), &expected, "{input}");
            assert_eq!(price.scale(), &one);
        }

        for input in ["", ".", "abc", "1.2.3", "-1", "0", "0.0", "1.0000000000000000001"] {
            assert!(
                matches!(input.parse::<TargetPrice>(), Err(PoolError::InvalidTargetPrice)),
                "{input}"
            );
        }
    }
}
