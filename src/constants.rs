/// Liquidity Book protocol constants
///
/// This module defines the fundamental protocol parameters and boundaries that
/// govern every pool: the fixed-point scale shared by all prices, the basis
/// point denominator used for fees and bin steps, the protocol fee cap, and
/// the id assigned to the first bin of a new pool.
use primitive_types::U256;

/// Fixed-point scale: 10^18.
///
/// Every price mantissa is interpreted as `mantissa / SCALE`. A decimal scale
/// (rather than a binary split of units and fraction) keeps the bin step
/// factor `1 + k/10000` exactly representable, so price invariants hold
/// bit-for-bit across deposits, swaps and withdrawals.
pub const SCALE: U256 = U256([1_000_000_000_000_000_000u64, 0, 0, 0]);

/// `SCALE` as a bare `u64`, for building mantissas in integer arithmetic.
pub const SCALE_U64: u64 = 1_000_000_000_000_000_000;

/// Basis points denominator.
///
/// Fees and bin steps are quoted in ten-thousandths: a fee of 20 bps takes
/// 20/10_000 = 0.2% of the trade's input side.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Protocol-wide cap on the trading fee, in basis points (0.5%).
///
/// Pool creation clamps any requested fee to this value.
pub const MAX_FEE_BPS: u64 = 50;

/// Id of the bin created together with the pool.
///
/// Placed at the midpoint of the `u64` id space so arbitrarily many bins can
/// be added on either side before the id range over- or underflows.
pub const FIRST_BIN_ID: u64 = 1 << 63;
