//! Generators for arbitrary inputs (for Kani)

#[cfg(kani)]
use kani::any;
#[cfg(kani)]
use stakied_core::{accrual::YieldCheckpoint, curve::CurveState, time_factor::TimeCurve};

#[cfg(kani)]
use crate::sanitizer::Sanitize;

#[cfg(kani)]
pub fn any_curve() -> CurveState {
    CurveState {
        pt_reserve: any(),
        sy_reserve: any(),
        time_factor: any(),
        fee_bps: any(),
        protocol_fee_share_bps: any(),
        min_liquidity: any(),
    }
    .sanitize()
}

#[cfg(kani)]
pub fn any_time_curve() -> TimeCurve {
    TimeCurve {
        max_discount: any(),
        horizon_blocks: any(),
    }
    .sanitize()
}

#[cfg(kani)]
pub fn any_checkpoint() -> YieldCheckpoint {
    YieldCheckpoint {
        last_rate: any(),
        last_accrual_block: any(),
        accrued: any(),
        claimed: any(),
    }
    .sanitize()
}

/// Trade size in `1..=MAX_TRADE`
#[cfg(kani)]
pub fn any_trade() -> u64 {
    let raw: u64 = any();
    raw % crate::sanitizer::MAX_TRADE + 1
}
