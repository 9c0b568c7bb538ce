//! YT yield accrual
//!
//! Each (owner, maturity) position carries a checkpoint of the exchange rate
//! it was last settled at. When the rate rises from `last` to `r`, a YT
//! balance `y` earns `y * (r - last) / r` SY: the SY amount whose underlying
//! value equals the appreciation of `y` units of principal. The checkpoint
//! is a high-water mark, so a rate that falls and recovers pays nothing twice.

use crate::error::{StakiedError, StakiedResult};
use crate::math::{add, mul_div_floor};
use crate::types::BlockHeight;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldCheckpoint {
    pub last_rate: u64,
    pub last_accrual_block: BlockHeight,
    /// Settled but unclaimed SY
    pub accrued: u64,
    /// Lifetime SY paid out
    pub claimed: u64,
}

impl YieldCheckpoint {
    pub fn new(rate: u64, block: BlockHeight) -> Self {
        Self {
            last_rate: rate,
            last_accrual_block: block,
            accrued: 0,
            claimed: 0,
        }
    }

    fn increment(&self, yt_balance: u64, rate: u64) -> StakiedResult<u64> {
        if rate <= self.last_rate || yt_balance == 0 {
            return Ok(0);
        }
        mul_div_floor(yt_balance, rate - self.last_rate, rate)
    }

    /// Claimable amount if the position were settled at `rate`
    pub fn pending(&self, yt_balance: u64, rate: u64) -> StakiedResult<u64> {
        add(self.accrued, self.increment(yt_balance, rate)?)
    }

    /// Fold the appreciation since the last settlement into `accrued`.
    /// Must run before the YT balance changes.
    pub fn settle(&mut self, yt_balance: u64, rate: u64, block: BlockHeight) -> StakiedResult<()> {
        self.accrued = add(self.accrued, self.increment(yt_balance, rate)?)?;
        self.last_rate = self.last_rate.max(rate);
        self.last_accrual_block = block;
        Ok(())
    }

    /// Consume everything accrued; fails when there is nothing to pay
    pub fn take(&mut self) -> StakiedResult<u64> {
        if self.accrued == 0 {
            return Err(StakiedError::InvalidAmount);
        }
        let amount = self.accrued;
        self.claimed = add(self.claimed, amount)?;
        self.accrued = 0;
        Ok(amount)
    }
}
