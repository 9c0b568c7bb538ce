//! State space sanitizer - bounds values for Kani exploration

use stakied_core::accrual::YieldCheckpoint;
use stakied_core::curve::CurveState;
use stakied_core::math::{BPS_SCALE, SCALE};
use stakied_core::time_factor::TimeCurve;

/// Bounds for tractable verification
pub const MAX_RESERVE: u64 = 1_000_000_000;
pub const MAX_TRADE: u64 = 100_000_000;
pub const MAX_MIN_LIQUIDITY: u64 = 10_000;
pub const MAX_HORIZON: u64 = 100_000;
/// Exchange rates stay within [SCALE / 2, 4 * SCALE]
pub const MIN_RATE: u64 = SCALE / 2;
pub const MAX_RATE: u64 = 4 * SCALE;

pub trait Sanitize {
    fn sanitize(self) -> Self;
}

fn clamp_nonzero(v: u64, max: u64) -> u64 {
    if v == 0 {
        1
    } else if v > max {
        v % max + 1
    } else {
        v
    }
}

impl Sanitize for CurveState {
    /// A pool the engine could actually hold: both reserves at or above the
    /// floor, a time factor in (0, SCALE] and fees below 100%
    fn sanitize(mut self) -> Self {
        self.min_liquidity = clamp_nonzero(self.min_liquidity, MAX_MIN_LIQUIDITY);
        self.pt_reserve = clamp_nonzero(self.pt_reserve, MAX_RESERVE).max(self.min_liquidity);
        self.sy_reserve = clamp_nonzero(self.sy_reserve, MAX_RESERVE).max(self.min_liquidity);
        self.time_factor = clamp_nonzero(self.time_factor, SCALE);
        self.fee_bps %= BPS_SCALE;
        self.protocol_fee_share_bps %= BPS_SCALE + 1;
        self
    }
}

impl Sanitize for TimeCurve {
    fn sanitize(mut self) -> Self {
        self.max_discount %= SCALE;
        self.horizon_blocks = clamp_nonzero(self.horizon_blocks, MAX_HORIZON);
        self
    }
}

impl Sanitize for YieldCheckpoint {
    fn sanitize(mut self) -> Self {
        self.last_rate = self.last_rate.clamp(MIN_RATE, MAX_RATE);
        self.accrued %= MAX_TRADE;
        self.claimed %= MAX_TRADE;
        self
    }
}
