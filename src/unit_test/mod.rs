//! Unit test suites, one module per subsystem, plus shared builders.

mod bin_test;

use crate::coin::Coin;
use crate::math::Fp;
use crate::pool::Pool;

/// Left-asset marker for test pools.
#[derive(Debug)]
pub struct Usd;
/// Right-asset marker for test pools.
#[derive(Debug)]
pub struct Eur;

pub type TestPool = Pool<Usd, Eur>;

/// Builds a pool with a fractional starting price.
pub fn pool_with(bin_step_bps: u64, price_n: u64, price_d: u64, fee_bps: u64) -> TestPool {
    let price = Fp::from_fraction(price_n, price_d).unwrap();
    Pool::new(bin_step_bps, price.mantissa(), fee_bps).unwrap()
}

/// The standard test pool: 20 bps step, price 0.5, 20 bps fee.
pub fn default_pool() -> TestPool {
    pool_with(20, 1, 2, 20)
}

pub fn coins(left: u64, right: u64) -> (Coin<Usd>, Coin<Eur>) {
    (Coin::new(left), Coin::new(right))
}

/// Deposits `(left, right)` into `bin_count` bins and asserts the coins were
/// fully consumed.
pub fn seed(
    pool: &mut TestPool,
    bin_count: u64,
    left: u64,
    right: u64,
    now_ms: u64,
) -> crate::receipt::Receipt {
    let (mut l, mut r) = coins(left, right);
    let receipt = pool
        .provide_liquidity_uniform(bin_count, &mut l, &mut r, now_ms)
        .unwrap();
    l.destroy_zero().unwrap();
    r.destroy_zero().unwrap();
    receipt
}
