//! Value-carrying asset handles.
//!
//! The book core never touches custody; it moves value between opaque coin
//! handles. A [`Coin<T>`] is an amount tagged with a zero-sized marker type,
//! so a pool over `(Usd, Eur)` cannot accept a `Coin<Jpy>` — pair mixups are
//! compile errors rather than runtime checks.

use core::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorCode, Result};

/// An amount of the asset `T`.
///
/// Coins are linear values: they carry balance, cannot be cloned, and are
/// only created by [`Coin::new`] (at the custody boundary), by splitting an
/// existing coin, or as an empty [`Coin::zero`]. Dropping a non-zero coin
/// discards the value it represents, which is why [`Coin::destroy_zero`]
/// exists for the zero case.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct Coin<T> {
    amount: u64,
    #[serde(skip)]
    _asset: PhantomData<T>,
}

impl<T> Coin<T> {
    /// Mints a coin of the given amount.
    ///
    /// Custody of the underlying asset lives outside the core; this
    /// constructor is the boundary where an externally held amount enters
    /// the book's accounting.
    pub fn new(amount: u64) -> Self {
        Self {
            amount,
            _asset: PhantomData,
        }
    }

    /// An empty coin.
    pub fn zero() -> Self {
        Self::new(0)
    }

    /// The amount this coin carries.
    #[inline(always)]
    pub fn value(&self) -> u64 {
        self.amount
    }

    /// Splits `amount` off into a new coin, reducing this one.
    ///
    /// # Errors
    /// * `InsufficientBalance` - when `amount > self.value()`
    pub fn split(&mut self, amount: u64) -> Result<Self> {
        self.amount = self
            .amount
            .checked_sub(amount)
            .ok_or(ErrorCode::InsufficientBalance)?;
        Ok(Self::new(amount))
    }

    /// Absorbs `other` into this coin.
    ///
    /// # Errors
    /// * `Overflow` - when the combined amount exceeds `u64::MAX`
    pub fn join(&mut self, other: Self) -> Result<()> {
        self.amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(ErrorCode::Overflow)?;
        Ok(())
    }

    /// Takes the entire balance, leaving this coin empty.
    pub fn withdraw_all(&mut self) -> Self {
        let taken = self.amount;
        self.amount = 0;
        Self::new(taken)
    }

    /// Consumes an empty coin.
    ///
    /// # Errors
    /// * `NonZeroCoin` - when the coin still carries value
    pub fn destroy_zero(self) -> Result<()> {
        if self.amount != 0 {
            return Err(ErrorCode::NonZeroCoin);
        }
        Ok(())
    }
}
