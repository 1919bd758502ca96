use thiserror::Error;

use crate::receipt::Receipt;

/// Result alias used throughout the crate.
pub type Result<T, E = ErrorCode> = core::result::Result<T, E>;

/// The ErrorCode enum defines the failure contracts of every operation in the
/// liquidity book. Each variant corresponds to exactly one condition; all
/// errors are fatal to the current operation and leave the pool unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A swap still has input left and there is no adjacent bin to cross into.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Liquidity provisioning requires an odd bin count (one active bin plus
    /// an equal number of bins on each side).
    #[error("bin count must be odd")]
    EvenBinCount,

    /// Both input coins of a provisioning call carry zero value.
    #[error("no liquidity provided")]
    NoLiquidity,

    /// The receipt was issued by a different pool.
    #[error("receipt does not match this pool")]
    InvalidPoolId,

    /// A denominator or divisor of zero reached an arithmetic operation.
    #[error("division by zero")]
    DivideByZero,

    /// An integer cast, sum, or difference left the representable range.
    #[error("overflow")]
    Overflow,

    /// A pool cannot be created with a zero starting price.
    #[error("invalid starting price")]
    InvalidPrice,

    /// A coin split asked for more than the coin holds.
    #[error("insufficient coin balance")]
    InsufficientBalance,

    /// `destroy_zero` was called on a coin that still carries value.
    #[error("coin is not zero")]
    NonZeroCoin,
}

/// Error returned by [`crate::pool::Pool::withdraw`].
///
/// Withdrawal consumes its receipt, so a rejected withdrawal hands the
/// receipt back to the caller; dropping it would forfeit the deposit record.
#[derive(Debug, Error)]
#[error("{code}")]
pub struct WithdrawError {
    /// Why the withdrawal was rejected.
    pub code: ErrorCode,
    /// The untouched receipt, returned for a retry against the right pool.
    pub receipt: Receipt,
}
