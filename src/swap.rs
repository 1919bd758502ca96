//! The bin-walking swap engine.
//!
//! A swap fills against one bin at a time, starting from the active bin and
//! crossing outward: upward in id (rising price) for left-to-right trades,
//! downward for right-to-left. Each leg charges the trading fee on the input
//! side; a leg capped by the bin's inventory instead charges the fee on top
//! of the input that buys the deliverable output, by inverting the fee
//! equation. Fees stay in the bin and are logged per leg for later pro-rata
//! distribution.
//!
//! The walk is planned against immutable state and committed only when the
//! whole order can be filled, so a failed swap has no partial effects.

use tracing::debug;

use crate::coin::Coin;
use crate::constants::BPS_DENOMINATOR;
use crate::errors::{ErrorCode, Result};
use crate::math::Fp;
use crate::pool::Pool;

/// One planned fill against a single bin.
struct Leg {
    bin_id: u64,
    amount_in: u64,
    amount_out: u64,
    fee: u64,
    /// The bin's provided principal in left units at fee time; the pro-rata
    /// basis recorded with the fee entry.
    fee_basis_as_l: u64,
}

/// The fee charged on an ordinary leg: `⌊fee_rate · amount⌋` of the input.
#[inline]
fn input_fee(fee_rate: Fp, amount: u64) -> Result<u64> {
    fee_rate.mul_u64(amount)
}

/// The fee charged on a bin-capped leg, where `net_in` is fixed by the
/// deliverable output: the smallest `fee` with
/// `net_in + fee = ⌊net_in / keep_rate⌋`, i.e. the fee is charged on top so
/// the trader pays gross for exactly the output the bin can produce.
#[inline]
fn inverted_fee(keep_rate: Fp, net_in: u64) -> Result<u64> {
    keep_rate
        .div_u64(net_in)?
        .checked_sub(net_in)
        .ok_or(ErrorCode::Overflow)
}

impl<L, R> Pool<L, R> {
    /// Swaps the entire `coin_left` for right-asset output, walking bins
    /// upward from the active bin.
    ///
    /// On success `coin_left` is drained to zero and the accumulated output
    /// coin is returned; on failure the pool and `coin_left` are untouched.
    ///
    /// # Errors
    /// * `InsufficientLiquidity` - input remains and no bin exists above the
    ///   drained active bin
    /// * `Overflow` - an amount left the 64-bit range
    pub fn swap_ltr(&mut self, coin_left: &mut Coin<L>, now_ms: u64) -> Result<Coin<R>> {
        let fee_rate = Fp::from_fraction(self.fee_bps(), BPS_DENOMINATOR)?;
        let keep_rate = Fp::from_fraction(BPS_DENOMINATOR - self.fee_bps(), BPS_DENOMINATOR)?;

        let mut legs: Vec<Leg> = Vec::new();
        let mut active = self.active_bin_id();
        let mut remaining = coin_left.value();
        let mut out_total: u64 = 0;

        while remaining > 0 {
            let bin = self.bin(active).expect("active bin must exist");
            let price = bin.price();

            let mut fee = input_fee(fee_rate, remaining)?;
            let mut amount_in = remaining;
            let mut amount_out = price.mul_u64(remaining - fee)?;
            if amount_out > bin.balance_right() {
                amount_out = bin.balance_right();
                let net_in = price.div_u64(amount_out)?;
                fee = inverted_fee(keep_rate, net_in)?;
                amount_in = net_in.checked_add(fee).ok_or(ErrorCode::Overflow)?;
            }
            bin.balance_left()
                .checked_add(amount_in)
                .ok_or(ErrorCode::Overflow)?;
            out_total = out_total
                .checked_add(amount_out)
                .ok_or(ErrorCode::Overflow)?;
            remaining = remaining
                .checked_sub(amount_in)
                .ok_or(ErrorCode::Overflow)?;
            let drained = bin.balance_right() == amount_out;
            if amount_in > 0 || amount_out > 0 {
                legs.push(Leg {
                    bin_id: active,
                    amount_in,
                    amount_out,
                    fee,
                    fee_basis_as_l: bin.provided_as_l()?,
                });
            }
            if drained {
                let next = active.checked_add(1).ok_or(ErrorCode::Overflow)?;
                if self.contains_bin(next) {
                    active = next;
                } else if remaining > 0 {
                    return Err(ErrorCode::InsufficientLiquidity);
                }
            }
        }
        self.reserve_left
            .value()
            .checked_add(coin_left.value())
            .ok_or(ErrorCode::Overflow)?;

        // Commit.
        for leg in &legs {
            self.bins_mut()
                .get_mut(&leg.bin_id)
                .expect("planned bin exists")
                .apply_swap_ltr(
                    leg.amount_in,
                    leg.amount_out,
                    leg.fee,
                    now_ms,
                    leg.fee_basis_as_l,
                );
            debug!(
                bin = leg.bin_id,
                amount_in = leg.amount_in,
                amount_out = leg.amount_out,
                fee = leg.fee,
                "filled bin l->r"
            );
        }
        self.set_active_bin(active);
        self.reserve_left
            .join(coin_left.withdraw_all())
            .expect("validated in planning");
        Ok(self
            .reserve_right
            .split(out_total)
            .expect("reserves cover bin balances"))
    }

    /// Swaps the entire `coin_right` for left-asset output, walking bins
    /// downward from the active bin. Mirror of [`Pool::swap_ltr`]: output is
    /// `⌊input_after_fee / price⌋` and the active bin moves to lower ids as
    /// bins drain their left balance.
    ///
    /// # Errors
    /// * `InsufficientLiquidity` - input remains and no bin exists below the
    ///   drained active bin
    /// * `Overflow` - an amount left the 64-bit range
    pub fn swap_rtl(&mut self, coin_right: &mut Coin<R>, now_ms: u64) -> Result<Coin<L>> {
        let fee_rate = Fp::from_fraction(self.fee_bps(), BPS_DENOMINATOR)?;
        let keep_rate = Fp::from_fraction(BPS_DENOMINATOR - self.fee_bps(), BPS_DENOMINATOR)?;

        let mut legs: Vec<Leg> = Vec::new();
        let mut active = self.active_bin_id();
        let mut remaining = coin_right.value();
        let mut out_total: u64 = 0;

        while remaining > 0 {
            let bin = self.bin(active).expect("active bin must exist");
            let price = bin.price();

            let mut fee = input_fee(fee_rate, remaining)?;
            let mut amount_in = remaining;
            let mut amount_out = price.div_u64(remaining - fee)?;
            if amount_out > bin.balance_left() {
                amount_out = bin.balance_left();
                let net_in = price.mul_u64(amount_out)?;
                fee = inverted_fee(keep_rate, net_in)?;
                amount_in = net_in.checked_add(fee).ok_or(ErrorCode::Overflow)?;
            }
            bin.balance_right()
                .checked_add(amount_in)
                .ok_or(ErrorCode::Overflow)?;
            out_total = out_total
                .checked_add(amount_out)
                .ok_or(ErrorCode::Overflow)?;
            remaining = remaining
                .checked_sub(amount_in)
                .ok_or(ErrorCode::Overflow)?;
            let drained = bin.balance_left() == amount_out;
            if amount_in > 0 || amount_out > 0 {
                legs.push(Leg {
                    bin_id: active,
                    amount_in,
                    amount_out,
                    fee,
                    fee_basis_as_l: bin.provided_as_l()?,
                });
            }
            if drained {
                let next = active.checked_sub(1).ok_or(ErrorCode::Overflow)?;
                if self.contains_bin(next) {
                    active = next;
                } else if remaining > 0 {
                    return Err(ErrorCode::InsufficientLiquidity);
                }
            }
        }
        self.reserve_right
            .value()
            .checked_add(coin_right.value())
            .ok_or(ErrorCode::Overflow)?;

        // Commit.
        for leg in &legs {
            self.bins_mut()
                .get_mut(&leg.bin_id)
                .expect("planned bin exists")
                .apply_swap_rtl(
                    leg.amount_in,
                    leg.amount_out,
                    leg.fee,
                    now_ms,
                    leg.fee_basis_as_l,
                );
            debug!(
                bin = leg.bin_id,
                amount_in = leg.amount_in,
                amount_out = leg.amount_out,
                fee = leg.fee,
                "filled bin r->l"
            );
        }
        self.set_active_bin(active);
        self.reserve_right
            .join(coin_right.withdraw_all())
            .expect("validated in planning");
        Ok(self
            .reserve_left
            .split(out_total)
            .expect("reserves cover bin balances"))
    }
}
