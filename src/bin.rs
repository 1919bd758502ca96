//! Price bins.
//!
//! A bin is one discrete price level: a fixed exchange rate, paired
//! inventory, the running sum of principal attributed to liquidity
//! providers, and two time-ordered fee logs. Bins do not know about each
//! other; the pool owns the ordering and the swap engine walks it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorCode, Result};
use crate::math::Fp;

/// One fee collection event.
///
/// `amount` and `total_bin_size_as_l` are consumed in place as withdrawals
/// claim their share; the entry is removed as soon as either reaches zero.
/// Live entries therefore always satisfy `amount > 0` and
/// `total_bin_size_as_l > 0`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeEntry {
    /// Fee still unclaimed, in the collected asset's units.
    pub amount: u64,
    /// When the fee was generated.
    pub timestamp_ms: u64,
    /// The bin's total provided principal at that moment, expressed in
    /// left-asset units. Decremented as each claimant's share leaves the
    /// pro-rata basis.
    pub total_bin_size_as_l: u64,
}

/// A single price level of the book.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Bin {
    price: Fp,
    balance_left: u64,
    balance_right: u64,
    provided_left: u64,
    provided_right: u64,
    fee_log_left: VecDeque<FeeEntry>,
    fee_log_right: VecDeque<FeeEntry>,
}

/// Expresses a `(left, right)` holding in left-asset units at the given
/// price: `left + ⌊right / price⌋`.
///
/// This is the single axis on which deposits of any L/R mix are compared.
/// Note the floor: for prices above one the right-hand fraction compresses
/// toward zero, which under-weights right-heavy holdings. The formula is
/// kept for behavioral compatibility; see DESIGN.md.
pub fn amount_as_l(price: Fp, left: u64, right: u64) -> Result<u64> {
    let right_as_l = if right == 0 { 0 } else { price.div_u64(right)? };
    left.checked_add(right_as_l).ok_or(ErrorCode::Overflow)
}

impl Bin {
    /// Creates an empty bin at a fixed price.
    pub fn new(price: Fp) -> Self {
        Self {
            price,
            ..Self::default()
        }
    }

    /// The bin's exchange rate: one unit of `L` is worth `price` units of `R`.
    #[inline(always)]
    pub fn price(&self) -> Fp {
        self.price
    }

    #[inline(always)]
    pub fn balance_left(&self) -> u64 {
        self.balance_left
    }

    #[inline(always)]
    pub fn balance_right(&self) -> u64 {
        self.balance_right
    }

    /// Net principal currently attributed to providers, left side.
    #[inline(always)]
    pub fn provided_left(&self) -> u64 {
        self.provided_left
    }

    /// Net principal currently attributed to providers, right side.
    #[inline(always)]
    pub fn provided_right(&self) -> u64 {
        self.provided_right
    }

    /// Fees collected in `L`, oldest first.
    pub fn fee_log_left(&self) -> &VecDeque<FeeEntry> {
        &self.fee_log_left
    }

    /// Fees collected in `R`, oldest first.
    pub fn fee_log_right(&self) -> &VecDeque<FeeEntry> {
        &self.fee_log_right
    }

    /// The bin's total provided principal in left-asset units.
    pub fn provided_as_l(&self) -> Result<u64> {
        amount_as_l(self.price, self.provided_left, self.provided_right)
    }

    /// Whether the bin holds no inventory and no outstanding principal.
    /// Such a bin (unless active) is eligible for the empty-bin sweep.
    pub fn is_empty(&self) -> bool {
        self.balance_left == 0
            && self.balance_right == 0
            && self.provided_left == 0
            && self.provided_right == 0
    }

    /// Whether a deposit of `(left, right)` would fit the bin's balances.
    pub(crate) fn can_deposit(&self, left: u64, right: u64) -> bool {
        self.balance_left.checked_add(left).is_some()
            && self.balance_right.checked_add(right).is_some()
            && self.provided_left.checked_add(left).is_some()
            && self.provided_right.checked_add(right).is_some()
    }

    /// Adds provider inventory to both balances and provided sums.
    pub(crate) fn deposit(&mut self, left: u64, right: u64) -> Result<()> {
        self.balance_left = self
            .balance_left
            .checked_add(left)
            .ok_or(ErrorCode::Overflow)?;
        self.balance_right = self
            .balance_right
            .checked_add(right)
            .ok_or(ErrorCode::Overflow)?;
        self.provided_left = self
            .provided_left
            .checked_add(left)
            .ok_or(ErrorCode::Overflow)?;
        self.provided_right = self
            .provided_right
            .checked_add(right)
            .ok_or(ErrorCode::Overflow)?;
        Ok(())
    }

    /// Applies one left-to-right swap leg: input joins the left balance,
    /// output leaves the right balance, and a fee entry is appended.
    pub(crate) fn apply_swap_ltr(
        &mut self,
        amount_in: u64,
        amount_out: u64,
        fee: u64,
        now_ms: u64,
        fee_basis_as_l: u64,
    ) {
        self.balance_left = self
            .balance_left
            .checked_add(amount_in)
            .expect("validated in planning");
        self.balance_right = self
            .balance_right
            .checked_sub(amount_out)
            .expect("validated in planning");
        push_fee(&mut self.fee_log_left, fee, now_ms, fee_basis_as_l);
    }

    /// Mirror of [`Bin::apply_swap_ltr`] for right-to-left legs.
    pub(crate) fn apply_swap_rtl(
        &mut self,
        amount_in: u64,
        amount_out: u64,
        fee: u64,
        now_ms: u64,
        fee_basis_as_l: u64,
    ) {
        self.balance_right = self
            .balance_right
            .checked_add(amount_in)
            .expect("validated in planning");
        self.balance_left = self
            .balance_left
            .checked_sub(amount_out)
            .expect("validated in planning");
        push_fee(&mut self.fee_log_right, fee, now_ms, fee_basis_as_l);
    }

    /// Claims a depositor's pro-rata share of both fee logs.
    ///
    /// Returns `(earned_left, earned_right)`.
    pub(crate) fn accrue_fees(
        &mut self,
        share_as_l: u64,
        deposited_at_ms: u64,
    ) -> Result<(u64, u64)> {
        let left = accrue_from_log(&mut self.fee_log_left, share_as_l, deposited_at_ms)?;
        let right = accrue_from_log(&mut self.fee_log_right, share_as_l, deposited_at_ms)?;
        Ok((left, right))
    }

    /// Takes `amount` of the left asset, converting any shortfall to the
    /// right asset at the bin price. Returns `(taken_left, taken_right)`.
    ///
    /// A converted shortfall the right balance misses by one unit takes the
    /// whole remaining right balance; a miss of two or more takes nothing
    /// from the right side.
    pub(crate) fn take_left(&mut self, amount: u64) -> Result<(u64, u64)> {
        let taken = amount.min(self.balance_left);
        self.balance_left -= taken;
        let remainder = amount - taken;
        if remainder == 0 {
            return Ok((taken, 0));
        }
        let remainder_as_r = self.price.mul_u64(remainder)?;
        Ok((taken, self.take_converted_right(remainder_as_r)))
    }

    /// Mirror of [`Bin::take_left`]: takes `amount` of the right asset,
    /// converting any shortfall to the left asset.
    /// Returns `(taken_left, taken_right)`.
    pub(crate) fn take_right(&mut self, amount: u64) -> Result<(u64, u64)> {
        let taken = amount.min(self.balance_right);
        self.balance_right -= taken;
        let remainder = amount - taken;
        if remainder == 0 {
            return Ok((0, taken));
        }
        let remainder_as_l = self.price.div_u64(remainder)?;
        Ok((self.take_converted_left(remainder_as_l), taken))
    }

    fn take_converted_right(&mut self, wanted: u64) -> u64 {
        if wanted <= self.balance_right {
            self.balance_right -= wanted;
            wanted
        } else if wanted - self.balance_right <= 1 {
            std::mem::take(&mut self.balance_right)
        } else {
            0
        }
    }

    fn take_converted_left(&mut self, wanted: u64) -> u64 {
        if wanted <= self.balance_left {
            self.balance_left -= wanted;
            wanted
        } else if wanted - self.balance_left <= 1 {
            std::mem::take(&mut self.balance_left)
        } else {
            0
        }
    }

    /// Removes a depositor's principal from the provided sums.
    pub(crate) fn reduce_provided(&mut self, left: u64, right: u64) -> Result<()> {
        self.provided_left = self
            .provided_left
            .checked_sub(left)
            .ok_or(ErrorCode::Overflow)?;
        self.provided_right = self
            .provided_right
            .checked_sub(right)
            .ok_or(ErrorCode::Overflow)?;
        Ok(())
    }

    /// Empties both balances, returning `(left, right)`. Used when the last
    /// provider leaves and residual rounding dust belongs to them.
    pub(crate) fn drain_balances(&mut self) -> (u64, u64) {
        (
            std::mem::take(&mut self.balance_left),
            std::mem::take(&mut self.balance_right),
        )
    }
}

/// Appends a fee entry. Zero-amount or zero-basis entries are never stored:
/// there is nothing to claim from them and live entries must keep both
/// fields positive.
fn push_fee(log: &mut VecDeque<FeeEntry>, amount: u64, timestamp_ms: u64, total_bin_size_as_l: u64) {
    if amount == 0 || total_bin_size_as_l == 0 {
        return;
    }
    log.push_back(FeeEntry {
        amount,
        timestamp_ms,
        total_bin_size_as_l,
    });
}

/// Walks one fee log newest-to-oldest, claiming `⌊amount·share/total⌋` from
/// every entry minted at or after the claimant's deposit time.
///
/// Entries are mutated in place: the claimed amount and the claimant's share
/// of the basis leave the entry, and an entry whose amount or basis reaches
/// zero is removed. The scan stops at the first entry older than the
/// deposit, which is what makes fee eligibility non-retroactive.
fn accrue_from_log(
    log: &mut VecDeque<FeeEntry>,
    share_as_l: u64,
    deposited_at_ms: u64,
) -> Result<u64> {
    let mut earned_total: u64 = 0;
    let mut idx = log.len();
    while idx > 0 {
        idx -= 1;
        if log[idx].timestamp_ms < deposited_at_ms {
            break;
        }
        let entry = &mut log[idx];
        let earned = (u128::from(entry.amount) * u128::from(share_as_l)
            / u128::from(entry.total_bin_size_as_l)) as u64;
        entry.amount = entry
            .amount
            .checked_sub(earned)
            .ok_or(ErrorCode::Overflow)?;
        entry.total_bin_size_as_l = entry
            .total_bin_size_as_l
            .checked_sub(share_as_l)
            .ok_or(ErrorCode::Overflow)?;
        if entry.amount == 0 || entry.total_bin_size_as_l == 0 {
            let _ = log.remove(idx);
        }
        earned_total = earned_total
            .checked_add(earned)
            .ok_or(ErrorCode::Overflow)?;
    }
    Ok(earned_total)
}
