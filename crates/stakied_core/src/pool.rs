//! AMM Pool Engine
//!
//! One PT/SY pool per maturity. Reserves sit in the ordinary SY and PT
//! ledgers under the pool's custody address, so every pool movement is a
//! plain ledger transfer and the reserve counters mirror those balances.

use crate::curve::{
    quote_add_liquidity, quote_pt_for_sy, quote_remove_liquidity, quote_sy_for_pt, spot_price,
    CurveState, LiquidityQuote, SwapQuote, WithdrawQuote,
};
use crate::error::{StakiedError, StakiedResult};
use crate::ledger::BalanceLedger;
use crate::math::add;
use crate::params::ProtocolParams;
use crate::splitter::PtYtSplitter;
use crate::sy::SyVault;
use crate::time_factor::calculate_time_factor;
use crate::types::{Address, BlockHeight, Context, Maturity};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Token ledgers a pool operation moves balances through
pub struct Ledgers<'a> {
    pub sy: &'a mut SyVault,
    pub splitter: &'a mut PtYtSplitter,
}

/// Cumulative trading activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCounters {
    pub pt_volume: u64,
    pub sy_volume: u64,
    pub pt_fees: u64,
    pub sy_fees: u64,
    pub swap_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub maturity: Maturity,
    pub pt_reserve: u64,
    pub sy_reserve: u64,
    pub lp: BalanceLedger<Address>,
    pub created_at: BlockHeight,
    pub counters: PoolCounters,
}

impl Pool {
    pub fn custody(&self) -> Address {
        Address::pool_custody(self.maturity)
    }

    pub fn lp_supply(&self) -> u64 {
        self.lp.total_supply()
    }

    fn curve(&self, params: &ProtocolParams, now: BlockHeight) -> CurveState {
        CurveState {
            pt_reserve: self.pt_reserve,
            sy_reserve: self.sy_reserve,
            time_factor: calculate_time_factor(&params.time_curve(), self.maturity, now),
            fee_bps: params.swap_fee_bps,
            protocol_fee_share_bps: params.protocol_fee_share_bps,
            min_liquidity: params.min_liquidity,
        }
    }
}

/// Read-only snapshot of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub maturity: Maturity,
    pub pt_reserve: u64,
    pub sy_reserve: u64,
    pub lp_supply: u64,
    pub time_factor: u64,
    /// SY per PT, scaled by SCALE
    pub pt_price: u64,
    pub created_at: BlockHeight,
    pub counters: PoolCounters,
}

/// Which side of the pool a swap sells into it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    PtIn,
    SyIn,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEngine {
    pools: BTreeMap<Maturity, Pool>,
}

impl PoolEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(&self, maturity: Maturity) -> Option<&Pool> {
        self.pools.get(&maturity)
    }

    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.values()
    }

    fn existing(&self, maturity: Maturity) -> StakiedResult<&Pool> {
        self.pools
            .get(&maturity)
            .ok_or(StakiedError::PoolNotInitialized)
    }

    fn existing_mut(&mut self, maturity: Maturity) -> StakiedResult<&mut Pool> {
        self.pools
            .get_mut(&maturity)
            .ok_or(StakiedError::PoolNotInitialized)
    }

    pub fn reserves(&self, maturity: Maturity) -> StakiedResult<(u64, u64)> {
        let pool = self.existing(maturity)?;
        Ok((pool.pt_reserve, pool.sy_reserve))
    }

    pub fn lp_balance(&self, owner: &Address, maturity: Maturity) -> u64 {
        self.pool(maturity).map_or(0, |p| p.lp.balance_of(owner))
    }

    pub fn lp_supply(&self, maturity: Maturity) -> u64 {
        self.pool(maturity).map_or(0, Pool::lp_supply)
    }

    pub fn time_factor(
        &self,
        params: &ProtocolParams,
        maturity: Maturity,
        now: BlockHeight,
    ) -> u64 {
        calculate_time_factor(&params.time_curve(), maturity, now)
    }

    pub fn pool_stats(
        &self,
        params: &ProtocolParams,
        maturity: Maturity,
        now: BlockHeight,
    ) -> StakiedResult<PoolStats> {
        let pool = self.existing(maturity)?;
        let time_factor = self.time_factor(params, maturity, now);
        Ok(PoolStats {
            maturity,
            pt_reserve: pool.pt_reserve,
            sy_reserve: pool.sy_reserve,
            lp_supply: pool.lp_supply(),
            time_factor,
            pt_price: spot_price(pool.pt_reserve, pool.sy_reserve, time_factor)?,
            created_at: pool.created_at,
            counters: pool.counters,
        })
    }

    pub fn quote_swap_pt_for_sy(
        &self,
        params: &ProtocolParams,
        maturity: Maturity,
        pt_in: u64,
        now: BlockHeight,
    ) -> StakiedResult<SwapQuote> {
        quote_pt_for_sy(&self.existing(maturity)?.curve(params, now), pt_in)
    }

    pub fn quote_swap_sy_for_pt(
        &self,
        params: &ProtocolParams,
        maturity: Maturity,
        sy_in: u64,
        now: BlockHeight,
    ) -> StakiedResult<SwapQuote> {
        quote_sy_for_pt(&self.existing(maturity)?.curve(params, now), sy_in)
    }

    pub fn quote_add_liquidity(
        &self,
        maturity: Maturity,
        pt_in: u64,
        sy_in: u64,
    ) -> StakiedResult<LiquidityQuote> {
        let pool = self.existing(maturity)?;
        quote_add_liquidity(pool.pt_reserve, pool.sy_reserve, pool.lp_supply(), pt_in, sy_in)
    }

    /// Create the pool for `maturity`, seeding it from the caller.
    /// The initializer receives LP equal to the PT supplied.
    pub fn initialize_pool(
        &mut self,
        ledgers: Ledgers<'_>,
        params: &ProtocolParams,
        ctx: &Context,
        maturity: Maturity,
        pt_amount: u64,
        sy_amount: u64,
    ) -> StakiedResult<u64> {
        if self.pools.contains_key(&maturity) {
            return Err(StakiedError::PoolAlreadyExists);
        }
        if pt_amount == 0 || sy_amount == 0 {
            return Err(StakiedError::InvalidAmount);
        }
        if maturity <= ctx.block_height {
            return Err(StakiedError::InvalidMaturity);
        }
        // a pool seeded below the floor could never trade
        if pt_amount < params.min_liquidity || sy_amount < params.min_liquidity {
            return Err(StakiedError::InvalidAmount);
        }

        let custody = Address::pool_custody(maturity);
        ledgers
            .splitter
            .move_pt(&ctx.caller, &custody, pt_amount, maturity)?;
        ledgers.sy.move_balance(&ctx.caller, &custody, sy_amount)?;

        let mut lp = BalanceLedger::new();
        lp.mint(&ctx.caller, pt_amount)?;
        self.pools.insert(
            maturity,
            Pool {
                maturity,
                pt_reserve: pt_amount,
                sy_reserve: sy_amount,
                lp,
                created_at: ctx.block_height,
                counters: PoolCounters::default(),
            },
        );

        info!(
            "pool {} initialized by {}: pt={} sy={}",
            maturity, ctx.caller, pt_amount, sy_amount
        );
        Ok(pt_amount)
    }

    pub fn add_liquidity(
        &mut self,
        ledgers: Ledgers<'_>,
        ctx: &Context,
        maturity: Maturity,
        pt_in: u64,
        sy_in: u64,
        min_lp_out: u64,
    ) -> StakiedResult<LiquidityQuote> {
        let quote = self.quote_add_liquidity(maturity, pt_in, sy_in)?;
        if quote.lp_out < min_lp_out {
            return Err(StakiedError::SlippageExceeded);
        }

        let custody = Address::pool_custody(maturity);
        ledgers
            .splitter
            .move_pt(&ctx.caller, &custody, quote.pt_used, maturity)?;
        ledgers.sy.move_balance(&ctx.caller, &custody, quote.sy_used)?;

        let pool = self.existing_mut(maturity)?;
        pool.pt_reserve = add(pool.pt_reserve, quote.pt_used)?;
        pool.sy_reserve = add(pool.sy_reserve, quote.sy_used)?;
        pool.lp.mint(&ctx.caller, quote.lp_out)?;

        debug!(
            "add liquidity {}: {} pt={} sy={} lp={}",
            maturity, ctx.caller, quote.pt_used, quote.sy_used, quote.lp_out
        );
        Ok(quote)
    }

    pub fn remove_liquidity(
        &mut self,
        ledgers: Ledgers<'_>,
        params: &ProtocolParams,
        ctx: &Context,
        maturity: Maturity,
        lp_in: u64,
        min_pt_out: u64,
        min_sy_out: u64,
    ) -> StakiedResult<WithdrawQuote> {
        let pool = self.existing_mut(maturity)?;
        if lp_in == 0 {
            return Err(StakiedError::InvalidAmount);
        }
        if pool.lp.balance_of(&ctx.caller) < lp_in {
            return Err(StakiedError::InsufficientBalance);
        }

        let quote = quote_remove_liquidity(
            pool.pt_reserve,
            pool.sy_reserve,
            pool.lp_supply(),
            lp_in,
            params.min_liquidity,
        )?;
        if quote.pt_out < min_pt_out || quote.sy_out < min_sy_out {
            return Err(StakiedError::SlippageExceeded);
        }

        pool.lp.burn(&ctx.caller, lp_in)?;
        pool.pt_reserve -= quote.pt_out;
        pool.sy_reserve -= quote.sy_out;

        let custody = pool.custody();
        ledgers
            .splitter
            .move_pt(&custody, &ctx.caller, quote.pt_out, maturity)?;
        ledgers.sy.move_balance(&custody, &ctx.caller, quote.sy_out)?;

        debug!(
            "remove liquidity {}: {} lp={} pt={} sy={}",
            maturity, ctx.caller, lp_in, quote.pt_out, quote.sy_out
        );
        Ok(quote)
    }

    pub fn swap_pt_for_sy(
        &mut self,
        ledgers: Ledgers<'_>,
        params: &ProtocolParams,
        ctx: &Context,
        maturity: Maturity,
        pt_in: u64,
        min_sy_out: u64,
    ) -> StakiedResult<SwapQuote> {
        self.swap(ledgers, params, ctx, maturity, Side::PtIn, pt_in, min_sy_out)
    }

    pub fn swap_sy_for_pt(
        &mut self,
        ledgers: Ledgers<'_>,
        params: &ProtocolParams,
        ctx: &Context,
        maturity: Maturity,
        sy_in: u64,
        min_pt_out: u64,
    ) -> StakiedResult<SwapQuote> {
        self.swap(ledgers, params, ctx, maturity, Side::SyIn, sy_in, min_pt_out)
    }

    #[allow(clippy::too_many_arguments)]
    fn swap(
        &mut self,
        ledgers: Ledgers<'_>,
        params: &ProtocolParams,
        ctx: &Context,
        maturity: Maturity,
        side: Side,
        amount_in: u64,
        min_out: u64,
    ) -> StakiedResult<SwapQuote> {
        let pool = self.existing_mut(maturity)?;
        if amount_in == 0 {
            return Err(StakiedError::InvalidAmount);
        }

        let curve = pool.curve(params, ctx.block_height);
        let out_reserve = match side {
            Side::PtIn => curve.sy_reserve,
            Side::SyIn => curve.pt_reserve,
        };
        // more than the pool can ever deliver
        if min_out > CurveState::max_out(out_reserve, curve.min_liquidity) {
            return Err(StakiedError::SlippageExceeded);
        }

        let quote = match side {
            Side::PtIn => quote_pt_for_sy(&curve, amount_in)?,
            Side::SyIn => quote_sy_for_pt(&curve, amount_in)?,
        };
        if quote.amount_out < min_out {
            return Err(StakiedError::SlippageExceeded);
        }

        let custody = pool.custody();
        let to_pool = amount_in - quote.protocol_fee;
        match side {
            Side::PtIn => {
                let splitter = ledgers.splitter;
                splitter.move_pt(&ctx.caller, &custody, to_pool, maturity)?;
                if quote.protocol_fee > 0 {
                    let recipient = &params.fee_recipient;
                    splitter.move_pt(&ctx.caller, recipient, quote.protocol_fee, maturity)?;
                }
                ledgers.sy.move_balance(&custody, &ctx.caller, quote.amount_out)?;
                pool.counters.pt_volume = pool.counters.pt_volume.saturating_add(amount_in);
                pool.counters.pt_fees = pool.counters.pt_fees.saturating_add(quote.fee);
            }
            Side::SyIn => {
                let sy = ledgers.sy;
                sy.move_balance(&ctx.caller, &custody, to_pool)?;
                if quote.protocol_fee > 0 {
                    sy.move_balance(&ctx.caller, &params.fee_recipient, quote.protocol_fee)?;
                }
                ledgers
                    .splitter
                    .move_pt(&custody, &ctx.caller, quote.amount_out, maturity)?;
                pool.counters.sy_volume = pool.counters.sy_volume.saturating_add(amount_in);
                pool.counters.sy_fees = pool.counters.sy_fees.saturating_add(quote.fee);
            }
        }
        pool.pt_reserve = quote.new_pt_reserve;
        pool.sy_reserve = quote.new_sy_reserve;
        pool.counters.swap_count = pool.counters.swap_count.saturating_add(1);

        debug!(
            "swap {:?} {}: {} in={} out={} fee={}",
            side, maturity, ctx.caller, amount_in, quote.amount_out, quote.fee
        );
        Ok(quote)
    }
}
