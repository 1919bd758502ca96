//! Pool state.
//!
//! A pool owns an ordered map of bin id → [`Bin`], the pointer to the active
//! bin (the one at the current market price), the pool parameters, and the
//! two reserve coins backing every bin balance. Bin ids grow to the right
//! and shrink to the left of [`FIRST_BIN_ID`]; prices strictly increase with
//! bin id.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bin::Bin;
use crate::coin::Coin;
use crate::constants::{BPS_DENOMINATOR, FIRST_BIN_ID, MAX_FEE_BPS};
use crate::errors::{ErrorCode, Result};
use crate::math::Fp;

/// Issues process-unique pool ids. The id is what binds receipts to their
/// pool; restored pools keep the id they were serialized with.
static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// A liquidity book over the asset pair `(L, R)`.
///
/// The pool is the unit of exclusion: every mutating operation runs to
/// completion against it, and hosts embedding the pool in a multi-threaded
/// runtime must serialize those calls under one exclusive lock.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct Pool<L, R> {
    id: u64,
    bins: BTreeMap<u64, Bin>,
    active_bin_id: u64,
    bin_step_bps: u64,
    fee_bps: u64,
    pub(crate) reserve_left: Coin<L>,
    pub(crate) reserve_right: Coin<R>,
}

impl<L, R> Pool<L, R> {
    /// Creates a pool with a single empty bin at the starting price.
    ///
    /// The requested fee is clamped to [`MAX_FEE_BPS`].
    ///
    /// # Errors
    /// * `InvalidPrice` - when the starting price mantissa is zero; a zero
    ///   bin price would poison every later conversion
    pub fn new(bin_step_bps: u64, starting_price_mantissa: U256, fee_bps: u64) -> Result<Self> {
        if starting_price_mantissa.is_zero() {
            return Err(ErrorCode::InvalidPrice);
        }
        let price = Fp::from_mantissa(starting_price_mantissa);
        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        let mut bins = BTreeMap::new();
        bins.insert(FIRST_BIN_ID, Bin::new(price));
        let fee_bps = fee_bps.min(MAX_FEE_BPS);
        debug!(pool = id, bin_step_bps, fee_bps, price = %price, "pool created");
        Ok(Self {
            id,
            bins,
            active_bin_id: FIRST_BIN_ID,
            bin_step_bps,
            fee_bps,
            reserve_left: Coin::zero(),
            reserve_right: Coin::zero(),
        })
    }

    /// This pool's identity, as recorded in its receipts.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Id of the bin at the current market price.
    pub fn active_bin_id(&self) -> u64 {
        self.active_bin_id
    }

    /// Price of the active bin.
    pub fn active_price(&self) -> Fp {
        self.active_bin().price()
    }

    /// Trading fee in basis points of the input side.
    pub fn fee_bps(&self) -> u64 {
        self.fee_bps
    }

    /// Multiplicative gap between adjacent bin prices, in basis points.
    pub fn bin_step_bps(&self) -> u64 {
        self.bin_step_bps
    }

    /// Looks up a bin by id.
    pub fn bin(&self, id: u64) -> Option<&Bin> {
        self.bins.get(&id)
    }

    /// Number of bins currently in the map.
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Ids of all bins, in price order.
    pub fn bin_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.bins.keys().copied()
    }

    /// The bin at the current market price.
    ///
    /// The active bin always exists: it is created with the pool, the sweep
    /// skips it, and nothing else removes bins.
    pub fn active_bin(&self) -> &Bin {
        self.bins
            .get(&self.active_bin_id)
            .expect("active bin must exist")
    }

    pub(crate) fn bins(&self) -> &BTreeMap<u64, Bin> {
        &self.bins
    }

    pub(crate) fn bins_mut(&mut self) -> &mut BTreeMap<u64, Bin> {
        &mut self.bins
    }

    pub(crate) fn contains_bin(&self, id: u64) -> bool {
        self.bins.contains_key(&id)
    }

    /// Moves the active-bin pointer, but only onto a bin that exists.
    pub(crate) fn set_active_bin(&mut self, id: u64) {
        if self.bins.contains_key(&id) {
            self.active_bin_id = id;
        }
    }

    /// Inserts an empty bin at `id` unless one is already there.
    pub(crate) fn ensure_bin(&mut self, id: u64, price: Fp) {
        self.bins.entry(id).or_insert_with(|| Bin::new(price));
    }

    /// The step ratio `r = 1 + bin_step_bps / 10000`. Adjacent bin prices
    /// differ by exactly this factor.
    pub(crate) fn step_factor(&self) -> Result<Fp> {
        Fp::from_fraction(
            BPS_DENOMINATOR
                .checked_add(self.bin_step_bps)
                .ok_or(ErrorCode::Overflow)?,
            BPS_DENOMINATOR,
        )
    }

    /// Removes every non-active bin with zero balances and zero outstanding
    /// principal. Keeps the bin map bounded for long-lived pools; never runs
    /// inside a swap or withdrawal.
    pub fn clean_empty_bins(&mut self) {
        let active = self.active_bin_id;
        let before = self.bins.len();
        self.bins.retain(|&id, bin| id == active || !bin.is_empty());
        let removed = before - self.bins.len();
        if removed > 0 {
            debug!(pool = self.id, removed, "swept empty bins");
        }
    }
}
