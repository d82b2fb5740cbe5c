//! Arbitrary-precision unsigned arithmetic used by the sizing engine.
//!
//! Every value is a [`BigUint`], so intermediate products never truncate.
//! Subtraction and division are checked: they return a [`PoolError`] rather
//! than wrapping or dividing by zero.

use alloy::primitives::U256;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use super::error::PoolError;

/// Integer square root, `floor(sqrt(n))`, by Newton iteration.
///
/// Starts from `y = n`, `z = (n + 1) / 2` and stops as soon as the estimate
/// no longer decreases. The result `r` satisfies `r * r <= n < (r + 1) * (r + 1)`.
#[must_use]
pub fn isqrt(n: &BigUint) -> BigUint {
    let two = BigUint::from(2u8);
    let mut y = n.clone();
    let mut z = (n + BigUint::one()) / &two;
    while z < y {
        y = z.clone();
        z = (n / &z + &z) / &two;
    }
    y
}

/// `a - b`, failing instead of going negative.
///
/// # Errors
/// * `ArithmeticUnderflow` if `b > a`
pub fn checked_sub(a: &BigUint, b: &BigUint) -> Result<BigUint, PoolError> {
    if b > a {
        return Err(PoolError::ArithmeticUnderflow);
    }
    Ok(a - b)
}

/// `a / b` (floor), failing on a zero divisor.
///
/// `what` names the divisor in the error, e.g. `"reserve"`.
///
/// # Errors
/// * `ZeroDivision` if `b` is zero
pub fn checked_div(a: &BigUint, b: &BigUint, what: &'static str) -> Result<BigUint, PoolError> {
    if b.is_zero() {
        return Err(PoolError::ZeroDivision(what));
    }
    Ok(a / b)
}

/// Widens a ledger value into a [`BigUint`].
#[must_use]
pub fn from_u256(value: U256) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes::<32>())
}

/// Narrows a [`BigUint`] back into a ledger value.
///
/// # Errors
/// * `Overflow` if the value needs more than 256 bits
pub fn to_u256(value: &BigUint) -> Result<U256, PoolError> {
    if value.bits() > 256 {
        return Err(PoolError::Overflow);
    }
    Ok(U256::from_be_slice(&value.to_bytes_be()))
}

/// `10^exp` as a [`BigUint`].
#[must_use]
pub fn pow10(exp: u32) -> BigUint {
    num_traits::pow(BigUint::from(10u8), exp as usize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn big(s: &str) -> BigUint {
        BigUint::from_str(s).unwrap()
    }

    #[test]
    fn test_isqrt_bounds() {
        for n in [
            "0",
            "1",
            "2",
            "3",
            "4",
            "999999999999999999999",
            "100000000",
            "340282366920938463463374607431768211455",
        ] {
            let n = big(n);
            let r = isqrt(&n);
            let next = &r + BigUint::one();
            assert!(&r * &r <= n, "isqrt({n}) = {r} is too large");
            assert!(&next * &next > n, "isqrt({n}) = {r} is too small");
        }
    }

    #[test]
    fn test_isqrt_exact_values() {
        for (n, expected) in &[
            // n,         floor(sqrt(n))
            (0u64, 0u64),
            (1, 1),
            (2, 1),
            (3, 1),
            (4, 2),
            (15, 3),
            (16, 4),
            (10_000 * 10_000, 10_000),
        ] {
            assert_eq!(isqrt(&BigUint::from(*n)), BigUint::from(*expected));
        }
    }

    #[test]
    fn test_isqrt_monotonic() {
        let mut previous = BigUint::zero();
        for n in 0u32..2_000 {
            let r = isqrt(&BigUint::from(n));
            assert!(r >= previous);
            previous = r;
        }
    }

    #[test]
    fn test_isqrt_wide_value() {
        // (10^40 + 7)^2 still round-trips, well past 256 bits of input
        let root = pow10(40) + BigUint::from(7u8);
        let square = &root * &root;
        assert_eq!(isqrt(&square), root);
        assert_eq!(isqrt(&(&square - BigUint::one())), &root - BigUint::one());
    }

    #[test]
    fn test_isqrt_matches_num_integer() {
        use num_integer::Roots;

        for n in 0u32..=10_000 {
            let n = BigUint::from(n);
            assert_eq!(isqrt(&n), n.sqrt(), "n = {n}");
        }
        for _ in 0..200 {
            let n = BigUint::from(fastrand::u128(..)) * BigUint::from(fastrand::u128(..));
            assert_eq!(isqrt(&n), n.sqrt(), "n = {n}");
        }
    }

    #[test]
    fn test_checked_sub() {
        let five = BigUint::from(5u8);
        let three = BigUint::from(3u8);
        assert_eq!(checked_sub(&five, &three).unwrap(), BigUint::from(2u8));
        assert_eq!(checked_sub(&five, &five).unwrap(), BigUint::zero());
        assert!(matches!(
            checked_sub(&three, &five),
            Err(PoolError::ArithmeticUnderflow)
        ));
    }

    #[test]
    fn test_checked_div() {
        let ten = BigUint::from(10u8);
        assert_eq!(
            checked_div(&ten, &BigUint::from(3u8), "test").unwrap(),
            BigUint::from(3u8)
        );
        assert!(matches!(
            checked_div(&ten, &BigUint::zero(), "scale"),
            Err(PoolError::ZeroDivision("scale"))
        ));
    }

    #[test]
    fn test_u256_conversion() {
        let value = U256::from(123_456_789_u64) * U256::from(10).pow(U256::from(30));
        assert_eq!(to_u256(&from_u256(value)).unwrap(), value);
        assert_eq!(to_u256(&from_u256(U256::MAX)).unwrap(), U256::MAX);

        let too_wide = from_u256(U256::MAX) + BigUint::one();
        assert!(matches!(to_u256(&too_wide), Err(PoolError::Overflow)));
    }
}
