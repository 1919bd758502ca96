//! Liquidity withdrawal.
//!
//! Withdrawal consumes a receipt and pays out, per bin: the depositor's
//! pro-rata share of every fee generated at or after their deposit, then
//! the principal itself. A bin that traded heavily one way may hold mostly
//! the "wrong" asset, so a principal shortfall on one side is converted to
//! the other side at the bin price, tolerating at most one unit of rounding
//! shortfall.

use tracing::debug;

use crate::bin::amount_as_l;
use crate::coin::Coin;
use crate::errors::{ErrorCode, Result, WithdrawError};
use crate::pool::Pool;
use crate::receipt::Receipt;

impl<L, R> Pool<L, R> {
    /// Redeems a receipt for its principal plus accrued fees.
    ///
    /// The receipt is consumed on success. A rejected withdrawal hands it
    /// back inside the [`WithdrawError`] so the deposit record survives a
    /// wrong-pool attempt.
    ///
    /// # Errors
    /// * `InvalidPoolId` - the receipt was issued by a different pool
    /// * `Overflow` - a payout amount left the 64-bit range
    pub fn withdraw(&mut self, receipt: Receipt) -> Result<(Coin<L>, Coin<R>), WithdrawError> {
        if receipt.pool_id() != self.id() {
            return Err(WithdrawError {
                code: ErrorCode::InvalidPoolId,
                receipt,
            });
        }
        match self.withdraw_inner(&receipt) {
            Ok(out) => Ok(out),
            Err(code) => Err(WithdrawError { code, receipt }),
        }
    }

    fn withdraw_inner(&mut self, receipt: &Receipt) -> Result<(Coin<L>, Coin<R>)> {
        // Stage every mutation on a scratch copy of the bin map and commit
        // only a fully successful run; a failed withdrawal must leave no
        // partial effects.
        let mut bins = self.bins().clone();
        let mut out_left: u64 = 0;
        let mut out_right: u64 = 0;

        for share in receipt.liquidity() {
            let Some(bin) = bins.get_mut(&share.bin_id) else {
                // A receipt can only outlive its bin when the share is zero
                // on both sides; the sweep never removes a bin with
                // outstanding principal.
                continue;
            };
            let share_as_l = amount_as_l(bin.price(), share.left, share.right)?;
            let (fees_left, fees_right) =
                bin.accrue_fees(share_as_l, receipt.deposit_time_ms())?;

            let payout_left = share
                .left
                .checked_add(fees_left)
                .ok_or(ErrorCode::Overflow)?;
            let (l_from_left, r_from_left) = bin.take_left(payout_left)?;

            let payout_right = share
                .right
                .checked_add(fees_right)
                .ok_or(ErrorCode::Overflow)?;
            let (l_from_right, r_from_right) = bin.take_right(payout_right)?;

            bin.reduce_provided(share.left, share.right)?;
            let (l_residual, r_residual) =
                if bin.provided_left() == 0 && bin.provided_right() == 0 {
                    // Last provider out takes the rounding dust with them.
                    bin.drain_balances()
                } else {
                    (0, 0)
                };

            for amount in [l_from_left, l_from_right, l_residual] {
                out_left = out_left.checked_add(amount).ok_or(ErrorCode::Overflow)?;
            }
            for amount in [r_from_left, r_from_right, r_residual] {
                out_right = out_right.checked_add(amount).ok_or(ErrorCode::Overflow)?;
            }
        }

        self.reserve_left
            .value()
            .checked_sub(out_left)
            .ok_or(ErrorCode::Overflow)?;
        self.reserve_right
            .value()
            .checked_sub(out_right)
            .ok_or(ErrorCode::Overflow)?;

        // Commit.
        *self.bins_mut() = bins;
        let coin_left = self
            .reserve_left
            .split(out_left)
            .expect("validated against reserves");
        let coin_right = self
            .reserve_right
            .split(out_right)
            .expect("validated against reserves");
        debug!(
            pool = self.id(),
            out_left,
            out_right,
            "liquidity withdrawn"
        );
        Ok((coin_left, coin_right))
    }
}
