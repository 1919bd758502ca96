//! Proof-of-deposit receipts.
//!
//! A receipt is the only artifact that grants withdrawal rights: it records
//! which pool was funded, when, and how much went into each bin. It is
//! intentionally opaque and non-clonable, and it is consumed by
//! [`crate::pool::Pool::withdraw`].

use serde::{Deserialize, Serialize};

/// One bin's portion of a deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinShare {
    /// The bin that received the deposit.
    pub bin_id: u64,
    /// Left-asset principal placed in that bin.
    pub left: u64,
    /// Right-asset principal placed in that bin.
    pub right: u64,
}

/// Immutable record of a liquidity deposit.
#[derive(Debug, Serialize, Deserialize)]
pub struct Receipt {
    pool_id: u64,
    deposit_time_ms: u64,
    liquidity: Vec<BinShare>,
}

impl Receipt {
    pub(crate) fn new(pool_id: u64, deposit_time_ms: u64) -> Self {
        Self {
            pool_id,
            deposit_time_ms,
            liquidity: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, bin_id: u64, left: u64, right: u64) {
        self.liquidity.push(BinShare {
            bin_id,
            left,
            right,
        });
    }

    /// The pool this receipt was issued by.
    pub fn pool_id(&self) -> u64 {
        self.pool_id
    }

    /// When the deposit happened. Fees generated before this instant are
    /// never paid to this receipt.
    pub fn deposit_time_ms(&self) -> u64 {
        self.deposit_time_ms
    }

    /// Per-bin deposit amounts, in the order they were placed.
    pub fn liquidity(&self) -> &[BinShare] {
        &self.liquidity
    }
}
