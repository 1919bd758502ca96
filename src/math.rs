//! # liquidity_book::math
//!
//! High-precision unsigned fixed-point arithmetic for bin prices.
//!
//! ## Features
//! - `Fp`: a non-negative rational stored as a `U256` mantissa scaled by
//!   10^18, giving 18 decimal places of precision with exact decimal-price
//!   semantics.
//! - Every product and quotient is routed through a 512-bit intermediate
//!   (`U256::full_mul`) so no representable operand pair can overflow
//!   mid-computation.
//! - All rounding is toward zero. Deterministic truncation is what keeps the
//!   pool's conservation invariants exact; a silent switch to any other
//!   rounding mode shows up as off-by-one drift in the fee logs.
//!
//! ## Safety & determinism
//! - All operations are checked and return [`ErrorCode::Overflow`] or
//!   [`ErrorCode::DivideByZero`] instead of wrapping or panicking.
//! - There is no signed representation; subtraction is exposed only as the
//!   explicit [`Fp::abs_diff`].

use core::fmt;

use primitive_types::{U256, U512};
use serde::{Deserialize, Serialize};

use crate::constants::{SCALE, SCALE_U64};
use crate::errors::{ErrorCode, Result};

/// A non-negative fixed-point number with 18 decimal places, stored as a
/// 256-bit mantissa. The value is `mantissa / 10^18`.
///
/// Equality and ordering are exact on the mantissa; one unit of the mantissa
/// (one ULP) is the finest representable increment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fp(U256);

impl Fp {
    /// The additive identity.
    pub const ZERO: Fp = Fp(U256::zero());

    /// The multiplicative identity, `1.0`.
    pub const ONE: Fp = Fp(SCALE);

    /// Constructs a value directly from its mantissa.
    #[inline(always)]
    pub const fn from_mantissa(mantissa: U256) -> Self {
        Self(mantissa)
    }

    /// Constructs the value `n`, i.e. mantissa `n * 10^18`.
    #[inline(always)]
    pub fn from_int(n: u64) -> Self {
        Self(U256::from(n) * SCALE)
    }

    /// Constructs `n / d`, truncating to 18 decimal places.
    ///
    /// # Errors
    /// * `DivideByZero` - when `d == 0`
    #[inline]
    pub fn from_fraction(n: u64, d: u64) -> Result<Self> {
        if d == 0 {
            return Err(ErrorCode::DivideByZero);
        }
        Ok(Self(U256::from(n) * SCALE / U256::from(d)))
    }

    /// Returns the raw mantissa.
    #[inline(always)]
    pub const fn mantissa(self) -> U256 {
        self.0
    }

    #[inline(always)]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition on mantissas.
    #[inline(always)]
    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(ErrorCode::Overflow)
    }

    /// Absolute difference of the two values.
    ///
    /// There is no signed subtraction; callers that care about direction
    /// compare the operands first.
    #[inline(always)]
    pub fn abs_diff(self, rhs: Self) -> Self {
        if self.0 >= rhs.0 {
            Self(self.0 - rhs.0)
        } else {
            Self(rhs.0 - self.0)
        }
    }

    /// Checked multiplication: `⌊a·b / 10^18⌋`.
    ///
    /// The full 512-bit product is formed before the scale division, so the
    /// only failure mode is a quotient that does not fit back into 256 bits.
    #[inline(always)]
    pub fn checked_mul(self, rhs: Self) -> Result<Self> {
        let prod = self.0.full_mul(rhs.0) / U512::from(SCALE);
        U256::try_from(prod).map(Self).map_err(|_| ErrorCode::Overflow)
    }

    /// Checked division: `⌊a·10^18 / b⌋`.
    ///
    /// # Errors
    /// * `DivideByZero` - when `rhs` is zero
    /// * `Overflow` - when the quotient exceeds 256 bits
    #[inline(always)]
    pub fn checked_div(self, rhs: Self) -> Result<Self> {
        if rhs.0.is_zero() {
            return Err(ErrorCode::DivideByZero);
        }
        let num = self.0.full_mul(SCALE) / U512::from(rhs.0);
        U256::try_from(num).map(Self).map_err(|_| ErrorCode::Overflow)
    }

    /// Checked integer power by left-to-right repeated multiplication.
    ///
    /// `pow(a, 0) == 1`. Repeated multiplication (not binary exponentiation)
    /// fixes the truncation order, so `a.checked_pow(p + 1)` is always
    /// exactly `a.checked_pow(p)?.checked_mul(a)`.
    pub fn checked_pow(self, exp: u32) -> Result<Self> {
        let mut acc = Self::ONE;
        for _ in 0..exp {
            acc = acc.checked_mul(self)?;
        }
        Ok(acc)
    }

    /// Multiplies an integer amount by this value: `⌊mantissa·u / 10^18⌋`.
    ///
    /// This is the price conversion "how much `R` is `u` of `L` worth".
    ///
    /// # Errors
    /// * `Overflow` - when the result does not fit a `u64`
    #[inline(always)]
    pub fn mul_u64(self, u: u64) -> Result<u64> {
        let q = self.0.full_mul(U256::from(u)) / U512::from(SCALE);
        if q > U512::from(u64::MAX) {
            return Err(ErrorCode::Overflow);
        }
        Ok(q.low_u64())
    }

    /// Divides an integer amount by this value: `⌊u / self⌋`.
    ///
    /// This is the inverse price conversion "how much `L` corresponds to `u`
    /// of `R`".
    ///
    /// # Errors
    /// * `DivideByZero` - when the mantissa is zero
    /// * `Overflow` - when the result does not fit a `u64`
    #[inline(always)]
    pub fn div_u64(self, u: u64) -> Result<u64> {
        if self.0.is_zero() {
            return Err(ErrorCode::DivideByZero);
        }
        let q = U256::from(u).full_mul(SCALE) / U512::from(self.0);
        if q > U512::from(u64::MAX) {
            return Err(ErrorCode::Overflow);
        }
        Ok(q.low_u64())
    }

    /// Divides this value by an integer: mantissa `⌊mantissa / u⌋`.
    ///
    /// # Errors
    /// * `DivideByZero` - when `u == 0`
    #[inline(always)]
    pub fn div_by_u64(self, u: u64) -> Result<Self> {
        if u == 0 {
            return Err(ErrorCode::DivideByZero);
        }
        Ok(Self(self.0 / U256::from(u)))
    }

    /// Truncates to the integer part: `⌊mantissa / 10^18⌋`.
    ///
    /// # Errors
    /// * `Overflow` - when the integer part does not fit a `u64`
    #[inline(always)]
    pub fn truncate_to_u64(self) -> Result<u64> {
        let q = self.0 / SCALE;
        if q > U256::from(u64::MAX) {
            return Err(ErrorCode::Overflow);
        }
        Ok(q.low_u64())
    }

    /// Whether the two mantissas are within `ulps` units of each other.
    ///
    /// Truncating operations legitimately disagree by one ULP when composed
    /// in different orders; the arithmetic laws are stated up to this bound.
    #[inline]
    pub fn diff_within(self, other: Self, ulps: u64) -> bool {
        self.abs_diff(other).0 <= U256::from(ulps)
    }
}

impl fmt::Display for Fp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / SCALE;
        let frac = self.0 % SCALE;
        if frac.is_zero() {
            return write!(f, "{int}");
        }
        let digits = format!("{:0>width$}", frac.to_string(), width = decimals());
        write!(f, "{int}.{}", digits.trim_end_matches('0'))
    }
}

const fn decimals() -> usize {
    let mut n = 0;
    let mut s = SCALE_U64;
    while s > 1 {
        s /= 10;
        n += 1;
    }
    n
}
