//! PT/YT Splitter
//!
//! Splits SY into principal (PT) and yield (YT) tokens per maturity.
//! Minting burns the SY and records it as backing; par redemption and
//! recombination re-mint it. Yield on YT is paid as freshly minted SY
//! according to [`crate::accrual`].

use crate::accrual::YieldCheckpoint;
use crate::error::{StakiedError, StakiedResult};
use crate::ledger::BalanceLedger;
use crate::math::{add, sub};
use crate::sy::SyVault;
use crate::types::{Address, BlockHeight, Context, Maturity};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All PT/YT state for one maturity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityBook {
    pub pt: BalanceLedger<Address>,
    pub yt: BalanceLedger<Address>,
    pub checkpoints: BTreeMap<Address, YieldCheckpoint>,
    /// SY burned by minting and not yet re-minted by redemption
    pub sy_backing: u64,
    /// Exchange rate YT accrues against once maturity is reached
    pub settlement_rate: Option<u64>,
}

impl MaturityBook {
    /// Rate the book accrues against at block `now`
    fn accrual_rate(&self, sy: &SyVault, maturity: Maturity, now: BlockHeight) -> u64 {
        match self.settlement_rate {
            Some(rate) if now >= maturity => rate,
            _ => sy.accrual_rate(maturity, now),
        }
    }

    fn settle(&mut self, owner: &Address, rate: u64, now: BlockHeight) -> StakiedResult<()> {
        let yt = self.yt.balance_of(owner);
        self.checkpoints
            .entry(*owner)
            .or_insert_with(|| YieldCheckpoint::new(rate, now))
            .settle(yt, rate, now)
    }

    /// Pay out everything settled for `owner`, nothing if there is none
    fn take_accrued(&mut self, owner: &Address) -> StakiedResult<u64> {
        match self.checkpoints.get_mut(owner) {
            Some(cp) if cp.accrued > 0 => cp.take(),
            _ => Ok(0),
        }
    }

    /// Forget the checkpoint of an owner with no YT and nothing owed
    fn prune(&mut self, owner: &Address) {
        let idle = self.yt.balance_of(owner) == 0
            && self.checkpoints.get(owner).map_or(true, |cp| cp.accrued == 0);
        if idle {
            self.checkpoints.remove(owner);
        }
    }

    fn release_backing(&mut self, amount: u64) -> StakiedResult<()> {
        self.sy_backing = sub(self.sy_backing, amount)?;
        Ok(())
    }
}

/// SY returned by a recombination: the principal plus the yield settled
/// on the position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recombination {
    pub sy_out: u64,
    pub yield_paid: u64,
}

/// PT and YT balances of one owner at one maturity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub pt: u64,
    pub yt: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtYtSplitter {
    books: BTreeMap<Maturity, MaturityBook>,
}

impl PtYtSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(&self, maturity: Maturity) -> Option<&MaturityBook> {
        self.books.get(&maturity)
    }

    pub fn books(&self) -> impl Iterator<Item = (Maturity, &MaturityBook)> {
        self.books.iter().map(|(m, b)| (*m, b))
    }

    fn book_mut(&mut self, maturity: Maturity) -> StakiedResult<&mut MaturityBook> {
        // nobody holds anything at a maturity that was never minted
        self.books
            .get_mut(&maturity)
            .ok_or(StakiedError::InsufficientBalance)
    }

    pub fn position(&self, owner: &Address, maturity: Maturity) -> Position {
        Position {
            pt: self.pt_balance(owner, maturity),
            yt: self.yt_balance(owner, maturity),
        }
    }

    pub fn pt_balance(&self, owner: &Address, maturity: Maturity) -> u64 {
        self.book(maturity).map_or(0, |b| b.pt.balance_of(owner))
    }

    pub fn yt_balance(&self, owner: &Address, maturity: Maturity) -> u64 {
        self.book(maturity).map_or(0, |b| b.yt.balance_of(owner))
    }

    pub fn pt_total_supply(&self, maturity: Maturity) -> u64 {
        self.book(maturity).map_or(0, |b| b.pt.total_supply())
    }

    pub fn yt_total_supply(&self, maturity: Maturity) -> u64 {
        self.book(maturity).map_or(0, |b| b.yt.total_supply())
    }

    pub fn sy_backing(&self, maturity: Maturity) -> u64 {
        self.book(maturity).map_or(0, |b| b.sy_backing)
    }

    pub fn checkpoint(&self, owner: &Address, maturity: Maturity) -> Option<&YieldCheckpoint> {
        self.book(maturity).and_then(|b| b.checkpoints.get(owner))
    }

    /// Freeze the accrual rate of every book whose maturity is at or
    /// before `now`
    pub(crate) fn settle_maturities(&mut self, sy: &SyVault, now: BlockHeight) {
        for (maturity, book) in self.books.range_mut(..=now) {
            if book.settlement_rate.is_none() {
                let rate = sy.rate_before(*maturity);
                debug!("maturity {} settles at rate {}", maturity, rate);
                book.settlement_rate = Some(rate);
            }
        }
    }

    /// Earliest maturity still accruing against the live rate history
    pub fn earliest_open_maturity(&self) -> Option<Maturity> {
        self.books
            .iter()
            .find(|(_, book)| book.settlement_rate.is_none())
            .map(|(m, _)| *m)
    }

    /// Yield `owner` could claim at block `now` without mutating anything
    pub fn claimable_yield(
        &self,
        sy: &SyVault,
        owner: &Address,
        maturity: Maturity,
        now: BlockHeight,
    ) -> StakiedResult<u64> {
        let Some(book) = self.book(maturity) else {
            return Ok(0);
        };
        let Some(cp) = book.checkpoints.get(owner) else {
            return Ok(0);
        };
        cp.pending(book.yt.balance_of(owner), book.accrual_rate(sy, maturity, now))
    }

    /// Burn `amount` SY from the caller and credit `amount` PT and YT
    pub fn mint_pt_yt(
        &mut self,
        sy: &mut SyVault,
        ctx: &Context,
        amount: u64,
        maturity: Maturity,
    ) -> StakiedResult<Position> {
        if maturity <= ctx.block_height {
            return Err(StakiedError::InvalidMaturity);
        }
        if amount == 0 {
            return Err(StakiedError::InvalidAmount);
        }

        sy.burn_from(&ctx.caller, amount)?;

        let book = self.books.entry(maturity).or_default();
        let rate = book.accrual_rate(sy, maturity, ctx.block_height);
        book.settle(&ctx.caller, rate, ctx.block_height)?;
        book.pt.mint(&ctx.caller, amount)?;
        book.yt.mint(&ctx.caller, amount)?;
        book.sy_backing = add(book.sy_backing, amount)?;

        debug!("mint pt/yt: {} {} @ {}", ctx.caller, amount, maturity);
        Ok(Position { pt: amount, yt: amount })
    }

    /// Par redemption of PT once `maturity` is reached
    pub fn redeem_matured_pt(
        &mut self,
        sy: &mut SyVault,
        ctx: &Context,
        amount: u64,
        maturity: Maturity,
    ) -> StakiedResult<u64> {
        if ctx.block_height < maturity {
            return Err(StakiedError::MaturityNotReached);
        }
        if amount == 0 {
            return Err(StakiedError::InvalidAmount);
        }

        let book = self.book_mut(maturity)?;
        book.pt.burn(&ctx.caller, amount)?;
        book.release_backing(amount)?;
        sy.mint_to(&ctx.caller, amount)?;

        debug!("redeem pt: {} {} @ {}", ctx.caller, amount, maturity);
        Ok(amount)
    }

    /// Recombine equal PT and YT back into SY, at any time. Yield settled
    /// on the position is paid out with the principal.
    pub fn redeem_pt_yt(
        &mut self,
        sy: &mut SyVault,
        ctx: &Context,
        amount: u64,
        maturity: Maturity,
    ) -> StakiedResult<Recombination> {
        if amount == 0 {
            return Err(StakiedError::InvalidAmount);
        }

        let book = self.book_mut(maturity)?;
        if book.pt.balance_of(&ctx.caller) < amount || book.yt.balance_of(&ctx.caller) < amount {
            return Err(StakiedError::InsufficientBalance);
        }

        let rate = book.accrual_rate(sy, maturity, ctx.block_height);
        book.settle(&ctx.caller, rate, ctx.block_height)?;
        book.pt.burn(&ctx.caller, amount)?;
        book.yt.burn(&ctx.caller, amount)?;
        book.release_backing(amount)?;
        let yield_paid = book.take_accrued(&ctx.caller)?;
        book.prune(&ctx.caller);

        sy.mint_to(&ctx.caller, add(amount, yield_paid)?)?;

        debug!(
            "recombine pt/yt: {} {} @ {} (yield {})",
            ctx.caller, amount, maturity, yield_paid
        );
        Ok(Recombination {
            sy_out: amount,
            yield_paid,
        })
    }

    /// Pay out everything accrued on the caller's YT as SY
    pub fn claim_yield(
        &mut self,
        sy: &mut SyVault,
        ctx: &Context,
        maturity: Maturity,
    ) -> StakiedResult<u64> {
        let book = self
            .books
            .get_mut(&maturity)
            .ok_or(StakiedError::InvalidAmount)?;
        if book.yt.balance_of(&ctx.caller) == 0 {
            return Err(StakiedError::InvalidAmount);
        }

        let rate = book.accrual_rate(sy, maturity, ctx.block_height);
        book.settle(&ctx.caller, rate, ctx.block_height)?;
        let amount = book
            .checkpoints
            .get_mut(&ctx.caller)
            .ok_or(StakiedError::InvalidAmount)?
            .take()?;
        sy.mint_to(&ctx.caller, amount)?;

        debug!("claim yield: {} {} @ {}", ctx.caller, amount, maturity);
        Ok(amount)
    }

    pub fn transfer_pt(
        &mut self,
        ctx: &Context,
        from: &Address,
        to: &Address,
        amount: u64,
        maturity: Maturity,
    ) -> StakiedResult<()> {
        if ctx.caller != *from {
            return Err(StakiedError::Unauthorized);
        }
        self.move_pt(from, to, amount, maturity)?;
        debug!("pt transfer: {} -> {} {} @ {}", from, to, amount, maturity);
        Ok(())
    }

    /// Unchecked-caller PT movement for pool custody
    pub(crate) fn move_pt(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u64,
        maturity: Maturity,
    ) -> StakiedResult<()> {
        if amount == 0 {
            return Err(StakiedError::InvalidAmount);
        }
        self.book_mut(maturity)?.pt.transfer(from, to, amount)
    }
}
