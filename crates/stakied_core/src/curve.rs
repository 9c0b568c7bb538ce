//! Time-weighted constant product math (x·y=k)
//!
//! Swaps run on the plain constant product of the real reserves, with the
//! time factor `tf` valuing the PT side. Selling PT pays the constant
//! product output scaled down by `tf`; buying PT credits the SY input
//! scaled up by `1 / tf`. Both directions quote the same marginal price
//! `sy * tf / pt`, and at maturity `tf == SCALE` they reduce to the plain
//! curve. Reserves move by the real amounts only, so a round trip in
//! either order never returns more than it put in.
//!
//! Fees are taken on input. Outputs and scaled amounts round down.

use crate::error::{StakiedError, StakiedResult};
use crate::math::{
    apply_bps, mul_div_ceil, mul_div_floor, mul_div_floor_wide, net_of_fee, sub, to_u64, SCALE,
};
use serde::{Deserialize, Serialize};

/// Quote for a swap against the current reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub amount_in: u64,
    /// Amount delivered to the trader
    pub amount_out: u64,
    /// Total fee taken from `amount_in`
    pub fee: u64,
    /// Part of `fee` routed to the fee recipient instead of the pool
    pub protocol_fee: u64,
    /// Output per unit of input (scaled by SCALE)
    pub vwap_px: u64,
    pub new_pt_reserve: u64,
    pub new_sy_reserve: u64,
}

/// Add-liquidity preview: LP minted and the share of each deposit consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityQuote {
    pub lp_out: u64,
    pub pt_used: u64,
    pub sy_used: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawQuote {
    pub pt_out: u64,
    pub sy_out: u64,
}

/// Reserves and parameters a swap is quoted against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveState {
    pub pt_reserve: u64,
    pub sy_reserve: u64,
    pub time_factor: u64,
    pub fee_bps: u64,
    pub protocol_fee_share_bps: u64,
    pub min_liquidity: u64,
}

impl CurveState {
    fn check(&self, amount_in: u64) -> StakiedResult<()> {
        if self.pt_reserve == 0 || self.sy_reserve == 0 {
            return Err(StakiedError::InsufficientLiquidity);
        }
        if self.time_factor == 0 || self.time_factor > SCALE {
            return Err(StakiedError::InvalidAmount);
        }
        if amount_in == 0 {
            return Err(StakiedError::InvalidAmount);
        }
        Ok(())
    }

    fn fees(&self, amount_in: u64) -> StakiedResult<(u64, u64, u64)> {
        let net = net_of_fee(amount_in, self.fee_bps)?;
        let fee = amount_in - net;
        let protocol_fee = apply_bps(fee, self.protocol_fee_share_bps)?;
        Ok((net, fee, protocol_fee))
    }

    /// Largest output the reserve can pay without breaching the floor
    pub fn max_out(reserve: u64, min_liquidity: u64) -> u64 {
        reserve.saturating_sub(min_liquidity)
    }
}

/// Sell `pt_in` PT for SY.
///
/// ```text
/// net  = pt_in * (1 - fee)
/// out  = sy * net / (pt + net) * tf
/// ```
pub fn quote_pt_for_sy(state: &CurveState, pt_in: u64) -> StakiedResult<SwapQuote> {
    state.check(pt_in)?;
    let (net, fee, protocol_fee) = state.fees(pt_in)?;

    let denom = u128::from(state.pt_reserve) + u128::from(net);
    let plain = mul_div_floor_wide(u128::from(state.sy_reserve), u128::from(net), denom)?;
    let out = to_u64(mul_div_floor_wide(
        plain,
        u128::from(state.time_factor),
        u128::from(SCALE),
    )?)?;
    if out == 0 {
        return Err(StakiedError::InvalidAmount);
    }
    if out > CurveState::max_out(state.sy_reserve, state.min_liquidity) {
        return Err(StakiedError::InsufficientLiquidity);
    }

    let new_pt_reserve = state
        .pt_reserve
        .checked_add(pt_in - protocol_fee)
        .ok_or(StakiedError::InvalidAmount)?;
    Ok(SwapQuote {
        amount_in: pt_in,
        amount_out: out,
        fee,
        protocol_fee,
        vwap_px: mul_div_floor(out, SCALE, pt_in)?,
        new_pt_reserve,
        new_sy_reserve: state.sy_reserve - out,
    })
}

/// Buy PT with `sy_in` SY.
///
/// ```text
/// net  = sy_in * (1 - fee) / tf
/// out  = pt * net / (sy + net)
/// ```
pub fn quote_sy_for_pt(state: &CurveState, sy_in: u64) -> StakiedResult<SwapQuote> {
    state.check(sy_in)?;
    let (net, fee, protocol_fee) = state.fees(sy_in)?;

    let weighted = mul_div_floor_wide(
        u128::from(net),
        u128::from(SCALE),
        u128::from(state.time_factor),
    )?;
    let denom = u128::from(state.sy_reserve) + weighted;
    let out = to_u64(mul_div_floor_wide(u128::from(state.pt_reserve), weighted, denom)?)?;
    if out == 0 {
        return Err(StakiedError::InvalidAmount);
    }
    if out > CurveState::max_out(state.pt_reserve, state.min_liquidity) {
        return Err(StakiedError::InsufficientLiquidity);
    }

    let new_sy_reserve = state
        .sy_reserve
        .checked_add(sy_in - protocol_fee)
        .ok_or(StakiedError::InvalidAmount)?;
    Ok(SwapQuote {
        amount_in: sy_in,
        amount_out: out,
        fee,
        protocol_fee,
        vwap_px: mul_div_floor(out, SCALE, sy_in)?,
        new_pt_reserve: state.pt_reserve - out,
        new_sy_reserve,
    })
}

/// Price of 1 PT in SY (scaled by SCALE): `sy * tf / pt`
pub fn spot_price(pt_reserve: u64, sy_reserve: u64, time_factor: u64) -> StakiedResult<u64> {
    mul_div_floor(sy_reserve, time_factor, pt_reserve)
}

/// LP minted for a deposit, limited by the scarcer side. Only the amounts
/// matching the pool ratio are consumed; the rest stays with the caller.
pub fn quote_add_liquidity(
    pt_reserve: u64,
    sy_reserve: u64,
    lp_supply: u64,
    pt_in: u64,
    sy_in: u64,
) -> StakiedResult<LiquidityQuote> {
    if pt_in == 0 || sy_in == 0 {
        return Err(StakiedError::InvalidAmount);
    }
    if pt_reserve == 0 || sy_reserve == 0 || lp_supply == 0 {
        return Err(StakiedError::InsufficientLiquidity);
    }

    let lp_by_pt = mul_div_floor(pt_in, lp_supply, pt_reserve)?;
    let lp_by_sy = mul_div_floor(sy_in, lp_supply, sy_reserve)?;
    let lp_out = lp_by_pt.min(lp_by_sy);
    if lp_out == 0 {
        return Err(StakiedError::InvalidAmount);
    }

    // lp_out <= pt_in * S / R, so ceil(lp_out * R / S) <= pt_in
    Ok(LiquidityQuote {
        lp_out,
        pt_used: mul_div_ceil(lp_out, pt_reserve, lp_supply)?,
        sy_used: mul_div_ceil(lp_out, sy_reserve, lp_supply)?,
    })
}

/// Pro-rata share of both reserves for burning `lp_in`
pub fn quote_remove_liquidity(
    pt_reserve: u64,
    sy_reserve: u64,
    lp_supply: u64,
    lp_in: u64,
    min_liquidity: u64,
) -> StakiedResult<WithdrawQuote> {
    if lp_in == 0 {
        return Err(StakiedError::InvalidAmount);
    }
    if lp_in > lp_supply {
        return Err(StakiedError::InsufficientBalance);
    }

    let pt_out = mul_div_floor(lp_in, pt_reserve, lp_supply)?;
    let sy_out = mul_div_floor(lp_in, sy_reserve, lp_supply)?;
    if pt_out == 0 || sy_out == 0 {
        return Err(StakiedError::InvalidAmount);
    }
    if sub(pt_reserve, pt_out)? < min_liquidity || sub(sy_reserve, sy_out)? < min_liquidity {
        return Err(StakiedError::InsufficientLiquidity);
    }
    Ok(WithdrawQuote { pt_out, sy_out })
}
