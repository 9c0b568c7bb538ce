//! Checked fixed-point arithmetic - no unwrap, no panics
//!
//! Quantities are u64 micro-units (6 decimals). Intermediate products are
//! taken in u128; any result that does not fit back into u64, and any
//! division by zero, is reported as `InvalidAmount`.

use crate::error::{StakiedError, StakiedResult};

/// Fixed-point scale (1e6): one whole token, a par exchange rate, a time
/// factor of 1.0
pub const SCALE: u64 = 1_000_000;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Add u64, overflow is an out-of-range amount
pub fn add(a: u64, b: u64) -> StakiedResult<u64> {
    a.checked_add(b).ok_or(StakiedError::InvalidAmount)
}

/// Subtract u64, underflow is an out-of-range amount
pub fn sub(a: u64, b: u64) -> StakiedResult<u64> {
    a.checked_sub(b).ok_or(StakiedError::InvalidAmount)
}

fn narrow(x: u128) -> StakiedResult<u64> {
    u64::try_from(x).map_err(|_| StakiedError::InvalidAmount)
}

/// floor(a * b / d)
pub fn mul_div_floor(a: u64, b: u64, d: u64) -> StakiedResult<u64> {
    if d == 0 {
        return Err(StakiedError::InvalidAmount);
    }
    narrow(u128::from(a) * u128::from(b) / u128::from(d))
}

/// ceil(a * b / d)
pub fn mul_div_ceil(a: u64, b: u64, d: u64) -> StakiedResult<u64> {
    if d == 0 {
        return Err(StakiedError::InvalidAmount);
    }
    let n = u128::from(a) * u128::from(b);
    let d = u128::from(d);
    narrow((n + d - 1) / d)
}

/// floor(a * b / d) in u128, for time-weighted amounts that may exceed u64
pub fn mul_div_floor_wide(a: u128, b: u128, d: u128) -> StakiedResult<u128> {
    if d == 0 {
        return Err(StakiedError::InvalidAmount);
    }
    a.checked_mul(b)
        .map(|n| n / d)
        .ok_or(StakiedError::InvalidAmount)
}

/// Narrow a u128 result back into the u64 quantity domain
pub fn to_u64(x: u128) -> StakiedResult<u64> {
    narrow(x)
}

/// amount * bps / 10_000, rounded down
pub fn apply_bps(amount: u64, bps: u64) -> StakiedResult<u64> {
    mul_div_floor(amount, bps, BPS_SCALE)
}

/// Amount left after deducting a `fee_bps` fee, rounded down (fee rounds up)
pub fn net_of_fee(amount: u64, fee_bps: u64) -> StakiedResult<u64> {
    let keep = BPS_SCALE
        .checked_sub(fee_bps)
        .ok_or(StakiedError::InvalidAmount)?;
    mul_div_floor(amount, keep, BPS_SCALE)
}
