//! Protocol facade and atomic command execution
//!
//! `Protocol` owns every component. Mutations go through [`Protocol::execute`]:
//! the command runs against a working copy and the copy replaces the
//! committed state only if the whole command succeeded.

use crate::curve::{LiquidityQuote, SwapQuote, WithdrawQuote};
use crate::error::{Module, StakiedResult};
use crate::params::{ParamsError, ProtocolParams};
use crate::pool::{Ledgers, PoolEngine, PoolStats};
use crate::splitter::{Position, PtYtSplitter, Recombination};
use crate::sy::{SyRedemption, SyVault};
use crate::types::{Address, BlockHeight, Context, Maturity};
use log::debug;
use serde::{Deserialize, Serialize};

/// Every state-changing operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Deposit {
        amount: u64,
    },
    Redeem {
        amount: u64,
    },
    TransferSy {
        from: Address,
        to: Address,
        amount: u64,
    },
    UpdateExchangeRate {
        rate: u64,
    },
    MintPtYt {
        amount: u64,
        maturity: Maturity,
    },
    RedeemMaturedPt {
        amount: u64,
        maturity: Maturity,
    },
    RedeemPtYt {
        amount: u64,
        maturity: Maturity,
    },
    ClaimYield {
        maturity: Maturity,
    },
    TransferPt {
        from: Address,
        to: Address,
        amount: u64,
        maturity: Maturity,
    },
    InitializePool {
        maturity: Maturity,
        pt_amount: u64,
        sy_amount: u64,
    },
    AddLiquidity {
        maturity: Maturity,
        pt_amount: u64,
        sy_amount: u64,
        min_lp_out: u64,
    },
    RemoveLiquidity {
        maturity: Maturity,
        lp_amount: u64,
        min_pt_out: u64,
        min_sy_out: u64,
    },
    SwapPtForSy {
        maturity: Maturity,
        pt_in: u64,
        min_sy_out: u64,
    },
    SwapSyForPt {
        maturity: Maturity,
        sy_in: u64,
        min_pt_out: u64,
    },
}

impl Command {
    /// Component owning the operation (selects the error code range)
    pub fn module(&self) -> Module {
        match self {
            Command::Deposit { .. }
            | Command::Redeem { .. }
            | Command::TransferSy { .. }
            | Command::UpdateExchangeRate { .. } => Module::SyVault,
            Command::MintPtYt { .. }
            | Command::RedeemMaturedPt { .. }
            | Command::RedeemPtYt { .. }
            | Command::ClaimYield { .. }
            | Command::TransferPt { .. } => Module::Splitter,
            Command::InitializePool { .. }
            | Command::AddLiquidity { .. }
            | Command::RemoveLiquidity { .. }
            | Command::SwapPtForSy { .. }
            | Command::SwapSyForPt { .. } => Module::Pool,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Deposit { .. } => "deposit",
            Command::Redeem { .. } => "redeem",
            Command::TransferSy { .. } => "transfer_sy",
            Command::UpdateExchangeRate { .. } => "update_exchange_rate",
            Command::MintPtYt { .. } => "mint_pt_yt",
            Command::RedeemMaturedPt { .. } => "redeem_matured_pt",
            Command::RedeemPtYt { .. } => "redeem_pt_yt",
            Command::ClaimYield { .. } => "claim_yield",
            Command::TransferPt { .. } => "transfer_pt",
            Command::InitializePool { .. } => "initialize_pool",
            Command::AddLiquidity { .. } => "add_liquidity",
            Command::RemoveLiquidity { .. } => "remove_liquidity",
            Command::SwapPtForSy { .. } => "swap_pt_for_sy",
            Command::SwapSyForPt { .. } => "swap_sy_for_pt",
        }
    }
}

/// Outcome of a committed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Receipt {
    Deposited { sy_minted: u64 },
    Redeemed(SyRedemption),
    Transferred { amount: u64 },
    RateUpdated { rate: u64 },
    Minted(Position),
    PtRedeemed { sy_out: u64 },
    Recombined(Recombination),
    YieldClaimed { sy_out: u64 },
    PoolInitialized { lp_minted: u64 },
    LiquidityAdded(LiquidityQuote),
    LiquidityRemoved(WithdrawQuote),
    Swapped(SwapQuote),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protocol {
    params: ProtocolParams,
    sy: SyVault,
    splitter: PtYtSplitter,
    pools: PoolEngine,
    /// Block height of the last committed command
    last_block: BlockHeight,
}

impl Protocol {
    /// Fresh protocol; `owner` is the exchange-rate updater
    pub fn genesis(
        owner: Address,
        params: ProtocolParams,
        block: BlockHeight,
    ) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self {
            params,
            sy: SyVault::new(owner, block),
            splitter: PtYtSplitter::new(),
            pools: PoolEngine::new(),
            last_block: block,
        })
    }

    /// Apply `command` atomically: on error nothing changes
    pub fn execute(&mut self, ctx: &Context, command: &Command) -> StakiedResult<Receipt> {
        let mut next = self.clone();
        next.settle_maturities(ctx.block_height);
        let receipt = next.apply(ctx, command)?;
        next.last_block = next.last_block.max(ctx.block_height);
        debug_assert_eq!(crate::invariants::check_invariants(&next), Ok(()));

        debug!(
            "{} by {} at {}: {:?}",
            command.name(),
            ctx.caller,
            ctx.block_height,
            receipt
        );
        *self = next;
        Ok(receipt)
    }

    /// Freeze the accrual rate of matured books and drop the rate history
    /// nothing can ask for any more
    fn settle_maturities(&mut self, now: BlockHeight) {
        self.splitter.settle_maturities(&self.sy, now);
        let next_block = now.saturating_add(1);
        let horizon = self
            .splitter
            .earliest_open_maturity()
            .map_or(next_block, |m| m.min(next_block));
        self.sy.prune_history(horizon);
    }

    fn apply(&mut self, ctx: &Context, command: &Command) -> StakiedResult<Receipt> {
        let Self {
            params,
            sy,
            splitter,
            pools,
            ..
        } = self;
        let ledgers = Ledgers { sy, splitter };

        let receipt = match *command {
            Command::Deposit { amount } => Receipt::Deposited {
                sy_minted: ledgers.sy.deposit(ctx, amount)?,
            },
            Command::Redeem { amount } => Receipt::Redeemed(ledgers.sy.redeem(ctx, amount)?),
            Command::TransferSy { from, to, amount } => {
                ledgers.sy.transfer(ctx, &from, &to, amount)?;
                Receipt::Transferred { amount }
            }
            Command::UpdateExchangeRate { rate } => {
                ledgers.sy.update_exchange_rate(ctx, rate)?;
                Receipt::RateUpdated { rate }
            }
            Command::MintPtYt { amount, maturity } => {
                Receipt::Minted(ledgers.splitter.mint_pt_yt(ledgers.sy, ctx, amount, maturity)?)
            }
            Command::RedeemMaturedPt { amount, maturity } => Receipt::PtRedeemed {
                sy_out: ledgers
                    .splitter
                    .redeem_matured_pt(ledgers.sy, ctx, amount, maturity)?,
            },
            Command::RedeemPtYt { amount, maturity } => Receipt::Recombined(
                ledgers
                    .splitter
                    .redeem_pt_yt(ledgers.sy, ctx, amount, maturity)?,
            ),
            Command::ClaimYield { maturity } => Receipt::YieldClaimed {
                sy_out: ledgers.splitter.claim_yield(ledgers.sy, ctx, maturity)?,
            },
            Command::TransferPt {
                from,
                to,
                amount,
                maturity,
            } => {
                ledgers
                    .splitter
                    .transfer_pt(ctx, &from, &to, amount, maturity)?;
                Receipt::Transferred { amount }
            }
            Command::InitializePool {
                maturity,
                pt_amount,
                sy_amount,
            } => Receipt::PoolInitialized {
                lp_minted: pools
                    .initialize_pool(ledgers, params, ctx, maturity, pt_amount, sy_amount)?,
            },
            Command::AddLiquidity {
                maturity,
                pt_amount,
                sy_amount,
                min_lp_out,
            } => Receipt::LiquidityAdded(pools.add_liquidity(
                ledgers, ctx, maturity, pt_amount, sy_amount, min_lp_out,
            )?),
            Command::RemoveLiquidity {
                maturity,
                lp_amount,
                min_pt_out,
                min_sy_out,
            } => Receipt::LiquidityRemoved(pools.remove_liquidity(
                ledgers, params, ctx, maturity, lp_amount, min_pt_out, min_sy_out,
            )?),
            Command::SwapPtForSy {
                maturity,
                pt_in,
                min_sy_out,
            } => Receipt::Swapped(
                pools.swap_pt_for_sy(ledgers, params, ctx, maturity, pt_in, min_sy_out)?,
            ),
            Command::SwapSyForPt {
                maturity,
                sy_in,
                min_pt_out,
            } => Receipt::Swapped(
                pools.swap_sy_for_pt(ledgers, params, ctx, maturity, sy_in, min_pt_out)?,
            ),
        };
        Ok(receipt)
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn sy(&self) -> &SyVault {
        &self.sy
    }

    pub fn splitter(&self) -> &PtYtSplitter {
        &self.splitter
    }

    pub fn pools(&self) -> &PoolEngine {
        &self.pools
    }

    pub fn last_block(&self) -> BlockHeight {
        self.last_block
    }

    // SY vault readers

    pub fn sy_balance(&self, owner: &Address) -> u64 {
        self.sy.balance_of(owner)
    }

    pub fn sy_total_supply(&self) -> u64 {
        self.sy.total_supply()
    }

    pub fn exchange_rate(&self) -> u64 {
        self.sy.exchange_rate()
    }

    // Splitter readers

    pub fn pt_balance(&self, owner: &Address, maturity: Maturity) -> u64 {
        self.splitter.pt_balance(owner, maturity)
    }

    pub fn yt_balance(&self, owner: &Address, maturity: Maturity) -> u64 {
        self.splitter.yt_balance(owner, maturity)
    }

    pub fn pt_total_supply(&self, maturity: Maturity) -> u64 {
        self.splitter.pt_total_supply(maturity)
    }

    pub fn yt_total_supply(&self, maturity: Maturity) -> u64 {
        self.splitter.yt_total_supply(maturity)
    }

    pub fn claimable_yield(
        &self,
        owner: &Address,
        maturity: Maturity,
        now: BlockHeight,
    ) -> StakiedResult<u64> {
        self.splitter.claimable_yield(&self.sy, owner, maturity, now)
    }

    // Pool readers

    pub fn time_factor(&self, maturity: Maturity, now: BlockHeight) -> u64 {
        self.pools.time_factor(&self.params, maturity, now)
    }

    pub fn quote_swap_pt_for_sy(
        &self,
        maturity: Maturity,
        pt_in: u64,
        now: BlockHeight,
    ) -> StakiedResult<SwapQuote> {
        self.pools
            .quote_swap_pt_for_sy(&self.params, maturity, pt_in, now)
    }

    pub fn quote_swap_sy_for_pt(
        &self,
        maturity: Maturity,
        sy_in: u64,
        now: BlockHeight,
    ) -> StakiedResult<SwapQuote> {
        self.pools
            .quote_swap_sy_for_pt(&self.params, maturity, sy_in, now)
    }

    pub fn quote_add_liquidity(
        &self,
        maturity: Maturity,
        pt_amount: u64,
        sy_amount: u64,
    ) -> StakiedResult<LiquidityQuote> {
        self.pools.quote_add_liquidity(maturity, pt_amount, sy_amount)
    }

    pub fn pool_stats(&self, maturity: Maturity, now: BlockHeight) -> StakiedResult<PoolStats> {
        self.pools.pool_stats(&self.params, maturity, now)
    }

    pub fn pool_reserves(&self, maturity: Maturity) -> StakiedResult<(u64, u64)> {
        self.pools.reserves(maturity)
    }

    pub fn lp_balance(&self, owner: &Address, maturity: Maturity) -> u64 {
        self.pools.lp_balance(owner, maturity)
    }
}
