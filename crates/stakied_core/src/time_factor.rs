//! Time factor
//!
//! Linear decay from par: with `r` blocks remaining and horizon `H`,
//!
//! ```text
//! tf = SCALE - max_discount * min(r, H) / H
//! ```
//!
//! so PT trades at a discount of up to `max_discount` far from maturity,
//! the discount shrinks one step per block inside the horizon, and
//! `tf == SCALE` at and after maturity.

use crate::math::SCALE;
use crate::types::{BlockHeight, Maturity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeCurve {
    /// Discount at or beyond the horizon, on the SCALE; must be < SCALE
    pub max_discount: u64,
    /// Blocks over which the discount decays to zero
    pub horizon_blocks: u64,
}

impl Default for TimeCurve {
    fn default() -> Self {
        Self {
            max_discount: 50_000,
            horizon_blocks: 52_560,
        }
    }
}

/// Time factor for `maturity` observed at block `now`, in
/// `[SCALE - max_discount, SCALE]`.
///
/// Total: a zero horizon or an oversized discount degrade to par / the
/// smallest positive factor rather than failing.
pub fn calculate_time_factor(curve: &TimeCurve, maturity: Maturity, now: BlockHeight) -> u64 {
    if curve.horizon_blocks == 0 {
        return SCALE;
    }
    let remaining = maturity.saturating_sub(now).min(curve.horizon_blocks);
    let max_discount = curve.max_discount.min(SCALE - 1);

    // remaining <= horizon, so discount <= max_discount < SCALE
    let discount =
        u128::from(max_discount) * u128::from(remaining) / u128::from(curve.horizon_blocks);
    SCALE - discount as u64
}
