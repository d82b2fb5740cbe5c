use alloy::primitives::Address;
use thiserror::Error;

/// Boxed failure raised by a ledger backend (transport, decoding, timeout).
pub type BoxedLedgerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failed read against the ledger.
///
/// The underlying cause is carried unchanged so the caller can inspect it.
#[derive(Debug, Error)]
#[error("ledger read for pool {pool} failed: {source}")]
pub struct LedgerError {
    /// Pool the read was addressed to
    pub pool: Address,
    /// The backend failure
    #[source]
    pub source: BoxedLedgerError,
}

impl LedgerError {
    /// Wraps a backend failure for the given pool.
    pub fn new(pool: Address, source: impl Into<BoxedLedgerError>) -> Self {
        Self {
            pool,
            source: source.into(),
        }
    }
}

/// Errors produced while resolving pools and sizing swaps.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Both sides of the pair are the same asset
    #[error("invalid pool key: {0} cannot be paired with itself")]
    InvalidPoolKey(Address),

    /// The reserve read failed or timed out
    #[error(transparent)]
    LedgerQueryFailed(#[from] LedgerError),

    /// An unsigned subtraction would go negative
    #[error("arithmetic underflow")]
    ArithmeticUnderflow,

    /// The pool is already priced at or past the requested target
    #[error("price already at or beyond target: target {target}, spot {spot}")]
    PriceAlreadyAtOrBeyondTarget {
        /// Requested price, in the target's fixed-point scale
        target: String,
        /// Current spot price, in the same scale
        spot: String,
    },

    /// Division by a zero reserve, scale or fee denominator
    #[error("division by zero {0}")]
    ZeroDivision(&'static str),

    /// Fee numerator is zero
    #[error("invalid fee rate: numerator must be positive")]
    InvalidFeeRate,

    /// Target price is zero
    #[error("invalid target price: must be positive")]
    InvalidTargetPrice,

    /// Value does not fit in 256 bits
    #[error("value exceeds 256 bits")]
    Overflow,

    /// The ledger stores the pair in a different order than derived
    #[error("pool {pool} reports token0 {reported}, expected {expected}")]
    LedgerOrderMismatch {
        /// Pool that was checked
        pool: Address,
        /// Token the ledger reports as token0
        reported: Address,
        /// Canonical low asset of the key
        expected: Address,
    },

    /// Asset identifier could not be parsed
    #[error("invalid asset id: {0}")]
    InvalidAssetId(String),
}

impl PoolError {
    /// Whether this error means "no swap is needed" rather than a failure.
    #[must_use]
    pub const fn is_already_at_target(&self) -> bool {
        matches!(self, Self::PriceAlreadyAtOrBeyondTarget { .. })
    }
}
