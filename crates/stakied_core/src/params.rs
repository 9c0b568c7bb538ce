//! Protocol parameters

use crate::math::{BPS_SCALE, SCALE};
use crate::time_factor::TimeCurve;
use crate::types::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
    #[error("swap fee {0} bps must be below 10000")]
    SwapFee(u64),
    #[error("protocol fee share {0} bps exceeds 10000")]
    ProtocolFeeShare(u64),
    #[error("max time discount {0} must be below 1000000")]
    TimeDiscount(u64),
    #[error("time horizon must be at least one block")]
    ZeroHorizon,
    #[error("minimum liquidity must be positive")]
    ZeroMinLiquidity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParams {
    /// Swap fee charged on input, in basis points
    pub swap_fee_bps: u64,
    /// Share of each swap fee sent to `fee_recipient`, in basis points of the fee
    pub protocol_fee_share_bps: u64,
    pub fee_recipient: Address,
    /// PT discount far from maturity (SCALE = 100%)
    pub max_time_discount: u64,
    pub time_horizon_blocks: u64,
    /// Floor every pool reserve must stay at or above
    pub min_liquidity: u64,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        let curve = TimeCurve::default();
        Self {
            swap_fee_bps: 30,
            protocol_fee_share_bps: 0,
            fee_recipient: Address::default(),
            max_time_discount: curve.max_discount,
            time_horizon_blocks: curve.horizon_blocks,
            min_liquidity: 1_000,
        }
    }
}

impl ProtocolParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.swap_fee_bps >= BPS_SCALE {
            return Err(ParamsError::SwapFee(self.swap_fee_bps));
        }
        if self.protocol_fee_share_bps > BPS_SCALE {
            return Err(ParamsError::ProtocolFeeShare(self.protocol_fee_share_bps));
        }
        if self.max_time_discount >= SCALE {
            return Err(ParamsError::TimeDiscount(self.max_time_discount));
        }
        if self.time_horizon_blocks == 0 {
            return Err(ParamsError::ZeroHorizon);
        }
        if self.min_liquidity == 0 {
            return Err(ParamsError::ZeroMinLiquidity);
        }
        Ok(())
    }

    pub fn time_curve(&self) -> TimeCurve {
        TimeCurve {
            max_discount: self.max_time_discount,
            horizon_blocks: self.time_horizon_blocks,
        }
    }
}
