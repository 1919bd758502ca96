//! Uniform liquidity provisioning.
//!
//! A deposit spreads the caller's assets over an odd number of bins centered
//! on the active bin: left-asset allotments below it, right-asset allotments
//! above it, and both remainders into the active bin itself so that the
//! total provided equals the total input exactly.

use tracing::debug;

use crate::coin::Coin;
use crate::errors::{ErrorCode, Result};
use crate::math::Fp;
use crate::pool::Pool;
use crate::receipt::Receipt;

/// One bin's planned share of a deposit, resolved before any state changes.
struct PlannedDeposit {
    bin_id: u64,
    /// Price the bin gets if it has to be created.
    price: Fp,
    left: u64,
    right: u64,
}

impl<L, R> Pool<L, R> {
    /// Distributes `coin_left` and `coin_right` uniformly across `bin_count`
    /// bins around the active bin and returns the deposit receipt.
    ///
    /// With `half = (bin_count - 1) / 2`, each of the `half` bins below the
    /// active one receives `⌊left / (half + 1)⌋` of the left asset and each
    /// of the `half` bins above receives `⌊right / (half + 1)⌋` of the right
    /// asset; missing bins are created on the way out. The active bin then
    /// absorbs everything left in both coins, so rounding dust never leaks.
    ///
    /// Prices of created bins come from successive multiplication (above) or
    /// division (below) by the step factor, never from a power function, so
    /// a re-deposit into an existing price level reproduces the identical
    /// mantissa.
    ///
    /// On success both coins are drained to zero; on failure the pool and
    /// both coins are untouched.
    ///
    /// # Errors
    /// * `EvenBinCount` - `bin_count` is zero or even
    /// * `NoLiquidity` - both coins carry zero value
    /// * `Overflow` - a bin id or balance would leave the representable range
    /// * `InvalidPrice` - the downward walk truncated a price to zero
    pub fn provide_liquidity_uniform(
        &mut self,
        bin_count: u64,
        coin_left: &mut Coin<L>,
        coin_right: &mut Coin<R>,
        now_ms: u64,
    ) -> Result<Receipt> {
        if bin_count == 0 || bin_count % 2 == 0 {
            return Err(ErrorCode::EvenBinCount);
        }
        if coin_left.value() == 0 && coin_right.value() == 0 {
            return Err(ErrorCode::NoLiquidity);
        }
        let half = (bin_count - 1) / 2;
        let per_bin_left = coin_left.value() / (half + 1);
        let per_bin_right = coin_right.value() / (half + 1);
        let step = self.step_factor()?;
        let active_id = self.active_bin_id();
        let active_price = self.active_price();

        // The whole range must fit the id space before any bin is walked.
        active_id.checked_sub(half).ok_or(ErrorCode::Overflow)?;
        active_id.checked_add(half).ok_or(ErrorCode::Overflow)?;

        // Plan the outward walk before touching any state.
        let mut plan = Vec::new();
        let mut price_below = active_price;
        let mut price_above = active_price;
        for n in 1..=half {
            let below_id = active_id.checked_sub(n).ok_or(ErrorCode::Overflow)?;
            price_below = price_below.checked_div(step)?;
            if price_below.is_zero() {
                return Err(ErrorCode::InvalidPrice);
            }
            plan.push(PlannedDeposit {
                bin_id: below_id,
                price: price_below,
                left: per_bin_left,
                right: 0,
            });

            let above_id = active_id.checked_add(n).ok_or(ErrorCode::Overflow)?;
            price_above = price_above.checked_mul(step)?;
            plan.push(PlannedDeposit {
                bin_id: above_id,
                price: price_above,
                left: 0,
                right: per_bin_right,
            });
        }
        // The active bin takes what is left after the per-bin splits: one
        // full allotment per side plus the division dust.
        plan.push(PlannedDeposit {
            bin_id: active_id,
            price: active_price,
            left: coin_left.value() - per_bin_left * half,
            right: coin_right.value() - per_bin_right * half,
        });

        for d in &plan {
            if let Some(bin) = self.bin(d.bin_id) {
                if !bin.can_deposit(d.left, d.right) {
                    return Err(ErrorCode::Overflow);
                }
            }
        }
        self.reserve_left
            .value()
            .checked_add(coin_left.value())
            .ok_or(ErrorCode::Overflow)?;
        self.reserve_right
            .value()
            .checked_add(coin_right.value())
            .ok_or(ErrorCode::Overflow)?;

        // Commit.
        let mut receipt = Receipt::new(self.id(), now_ms);
        for d in plan {
            self.ensure_bin(d.bin_id, d.price);
            self.bins_mut()
                .get_mut(&d.bin_id)
                .expect("bin just ensured")
                .deposit(d.left, d.right)
                .expect("validated in planning");
            receipt.push(d.bin_id, d.left, d.right);
        }
        self.reserve_left
            .join(coin_left.withdraw_all())
            .expect("validated in planning");
        self.reserve_right
            .join(coin_right.withdraw_all())
            .expect("validated in planning");
        debug!(
            pool = self.id(),
            bins = receipt.liquidity().len(),
            at_ms = now_ms,
            "liquidity provided"
        );
        Ok(receipt)
    }
}
