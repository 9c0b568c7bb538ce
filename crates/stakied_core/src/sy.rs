//! SY Vault
//!
//! Wraps deposits of the base asset into SY at 1:1 and tracks the
//! owner-maintained exchange rate (underlying micro-units per 1 SY).

use crate::error::{StakiedError, StakiedResult};
use crate::ledger::BalanceLedger;
use crate::math::{mul_div_floor, SCALE};
use crate::types::{Address, BlockHeight, Context, Maturity};
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const SY_NAME: &str = "Stakied Standardized Yield";
pub const SY_SYMBOL: &str = "SY-stSTX";
pub const SY_DECIMALS: u8 = 6;

/// Exchange rate in effect from `block` onwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCheckpoint {
    pub block: BlockHeight,
    pub rate: u64,
}

/// Result of a redemption: SY burned and what it was worth in underlying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyRedemption {
    pub sy_burned: u64,
    pub underlying_value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyVault {
    owner: Address,
    exchange_rate: u64,
    balances: BalanceLedger<Address>,
    /// Ordered by block, one entry per block
    rate_history: Vec<RateCheckpoint>,
}

impl SyVault {
    /// Fresh vault at a 1:1 exchange rate
    pub fn new(owner: Address, genesis: BlockHeight) -> Self {
        Self {
            owner,
            exchange_rate: SCALE,
            balances: BalanceLedger::new(),
            rate_history: vec![RateCheckpoint { block: genesis, rate: SCALE }],
        }
    }

    pub fn name(&self) -> &'static str {
        SY_NAME
    }

    pub fn symbol(&self) -> &'static str {
        SY_SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        SY_DECIMALS
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.balances.balance_of(owner)
    }

    pub fn total_supply(&self) -> u64 {
        self.balances.total_supply()
    }

    pub fn exchange_rate(&self) -> u64 {
        self.exchange_rate
    }

    pub fn rate_history(&self) -> &[RateCheckpoint] {
        &self.rate_history
    }

    pub fn ledger(&self) -> &BalanceLedger<Address> {
        &self.balances
    }

    /// Underlying value of `amount` SY at the current rate
    pub fn underlying_value(&self, amount: u64) -> StakiedResult<u64> {
        mul_div_floor(amount, self.exchange_rate, SCALE)
    }

    /// Last rate checkpointed strictly before `maturity`.
    /// Falls back to the earliest retained rate when every update is at or
    /// after it.
    pub fn rate_before(&self, maturity: Maturity) -> u64 {
        self.rate_history
            .iter()
            .rev()
            .find(|c| c.block < maturity)
            .or_else(|| self.rate_history.first())
            .map_or(SCALE, |c| c.rate)
    }

    /// Drop checkpoints that no maturity at or after `horizon` can ask
    /// [`SyVault::rate_before`] for. The last rate before `horizon` is kept.
    pub(crate) fn prune_history(&mut self, horizon: Maturity) {
        let keep_from = self
            .rate_history
            .iter()
            .rposition(|c| c.block < horizon)
            .unwrap_or(0);
        self.rate_history.drain(..keep_from);
    }

    /// Rate YT of `maturity` accrues against at block `now`: the live rate
    /// before maturity, frozen at the last pre-maturity rate afterwards.
    pub fn accrual_rate(&self, maturity: Maturity, now: BlockHeight) -> u64 {
        if now < maturity {
            self.exchange_rate
        } else {
            self.rate_before(maturity)
        }
    }

    pub fn deposit(&mut self, ctx: &Context, amount: u64) -> StakiedResult<u64> {
        self.balances.mint(&ctx.caller, amount)?;
        debug!("sy deposit: {} +{}", ctx.caller, amount);
        Ok(amount)
    }

    pub fn redeem(&mut self, ctx: &Context, amount: u64) -> StakiedResult<SyRedemption> {
        if amount == 0 {
            return Err(StakiedError::InvalidAmount);
        }
        let underlying_value = self.underlying_value(amount)?;
        self.balances.burn(&ctx.caller, amount)?;
        debug!(
            "sy redeem: {} -{} (underlying {})",
            ctx.caller, amount, underlying_value
        );
        Ok(SyRedemption {
            sy_burned: amount,
            underlying_value,
        })
    }

    pub fn transfer(
        &mut self,
        ctx: &Context,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> StakiedResult<()> {
        if ctx.caller != *from {
            return Err(StakiedError::Unauthorized);
        }
        self.balances.transfer(from, to, amount)?;
        debug!("sy transfer: {} -> {} {}", from, to, amount);
        Ok(())
    }

    pub fn update_exchange_rate(&mut self, ctx: &Context, new_rate: u64) -> StakiedResult<()> {
        if ctx.caller != self.owner {
            return Err(StakiedError::Unauthorized);
        }
        if new_rate == 0 {
            return Err(StakiedError::InvalidAmount);
        }

        let checkpoint = RateCheckpoint {
            block: ctx.block_height,
            rate: new_rate,
        };
        match self.rate_history.last_mut() {
            Some(last) if last.block == ctx.block_height => *last = checkpoint,
            _ => self.rate_history.push(checkpoint),
        }
        info!(
            "sy exchange rate {} -> {} at block {}",
            self.exchange_rate, new_rate, ctx.block_height
        );
        self.exchange_rate = new_rate;
        Ok(())
    }

    // Internal movements on behalf of the splitter and the pools. No caller
    // check: the invoking operation has already authorized the holder.

    pub(crate) fn mint_to(&mut self, to: &Address, amount: u64) -> StakiedResult<()> {
        self.balances.mint(to, amount)
    }

    pub(crate) fn burn_from(&mut self, from: &Address, amount: u64) -> StakiedResult<()> {
        self.balances.burn(from, amount)
    }

    pub(crate) fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> StakiedResult<()> {
        self.balances.transfer(from, to, amount)
    }
}
