//! # liquidity_book
//!
//! Core of a bin-based concentrated liquidity market maker. A pool exchanges
//! two assets, `L` (left) and `R` (right), through a discrete ladder of
//! price bins; each bin holds paired inventory at one fixed exchange rate,
//! and a trade consumes bins in order, crossing outward from the active bin
//! that tracks the current market price.
//!
//! ## Main components
//! - [`Fp`]: deterministic unsigned fixed-point arithmetic (256-bit mantissa,
//!   18 decimal places) used for every price and amount conversion.
//! - [`Bin`]: one price level with paired balances and time-ordered fee logs.
//! - [`Pool`]: the bin ladder, the active-bin pointer, and the reserves;
//!   carries the swap, provisioning, withdrawal, and sweep operations.
//! - [`Receipt`]: proof of deposit, consumed to withdraw principal plus the
//!   pro-rata share of fees generated after the deposit.
//!
//! ## Determinism
//! All monetary quantities are integers; prices round toward zero at every
//! step. The same operation sequence against the same pool state always
//! produces bit-identical results, which is what the conservation and fee
//! distribution invariants rest on.
//!
//! ## Scope
//! Custody, authentication, and scheduling live outside this crate: callers
//! hand in value as [`Coin`] handles and supply millisecond timestamps from
//! their own monotonic clock.
//!
//! ## Example
//!
//! ```
//! use liquidity_book::{Coin, Fp, Pool};
//!
//! struct Base;
//! struct Quote;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // 20 bps between bins, price 0.5, 20 bps trading fee
//! let price = Fp::from_fraction(1, 2)?;
//! let mut pool: Pool<Base, Quote> = Pool::new(20, price.mantissa(), 20)?;
//!
//! // fund five bins around the market price
//! let mut base = Coin::new(1_000_000_000);
//! let mut quote = Coin::new(1_000_000_000);
//! let receipt = pool.provide_liquidity_uniform(5, &mut base, &mut quote, 1_000)?;
//!
//! // trade against the book
//! let mut order = Coin::new(10_000_000);
//! let filled = pool.swap_ltr(&mut order, 2_000)?;
//! assert!(filled.value() > 0);
//!
//! // the provider leaves with principal plus the trade's fee
//! let (base_out, _quote_out) = pool.withdraw(receipt).map_err(|e| e.code)?;
//! assert!(base_out.value() > 1_000_000_000);
//! # Ok(())
//! # }
//! ```

pub mod bin;
pub mod coin;
pub mod constants;
pub mod errors;
pub mod math;
pub mod pool;
pub mod receipt;

mod provide;
mod swap;
mod withdraw;

pub use bin::{amount_as_l, Bin, FeeEntry};
pub use coin::Coin;
pub use errors::{ErrorCode, Result, WithdrawError};
pub use math::Fp;
pub use pool::Pool;
pub use receipt::{BinShare, Receipt};

#[cfg(test)]
mod property_based_test;

#[cfg(test)]
mod unit_test;
