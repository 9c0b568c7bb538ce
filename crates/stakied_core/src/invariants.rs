//! Global invariant checks over a committed protocol state
//!
//! Total functions, no panics. Used by `Protocol::execute` in debug builds,
//! by the property tests and by the sequencer after replay.

use crate::protocol::Protocol;
use crate::types::{Address, Maturity};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("SY balances do not sum to total supply")]
    SySupply,
    #[error("PT balances at {0} do not sum to total supply")]
    PtSupply(Maturity),
    #[error("YT balances at {0} do not sum to total supply")]
    YtSupply(Maturity),
    #[error("PT supply at {0} differs from its SY backing")]
    Backing(Maturity),
    #[error("LP balances of pool {0} do not sum to LP supply")]
    LpSupply(Maturity),
    #[error("pool {0} has an empty reserve")]
    EmptyReserve(Maturity),
    #[error("pool {0} reserves exceed its custody balances")]
    Custody(Maturity),
}

/// Check every ledger, book and pool
pub fn check_invariants(protocol: &Protocol) -> Result<(), InvariantViolation> {
    let sy = protocol.sy().ledger();
    if sy.sum_of_balances() != u128::from(sy.total_supply()) {
        return Err(InvariantViolation::SySupply);
    }

    for (maturity, book) in protocol.splitter().books() {
        if book.pt.sum_of_balances() != u128::from(book.pt.total_supply()) {
            return Err(InvariantViolation::PtSupply(maturity));
        }
        if book.yt.sum_of_balances() != u128::from(book.yt.total_supply()) {
            return Err(InvariantViolation::YtSupply(maturity));
        }
        if book.pt.total_supply() != book.sy_backing {
            return Err(InvariantViolation::Backing(maturity));
        }
    }

    for pool in protocol.pools().pools() {
        let maturity = pool.maturity;
        if pool.lp.sum_of_balances() != u128::from(pool.lp_supply()) {
            return Err(InvariantViolation::LpSupply(maturity));
        }
        if pool.pt_reserve == 0 || pool.sy_reserve == 0 {
            return Err(InvariantViolation::EmptyReserve(maturity));
        }
        // donations to the custody address are allowed and stay locked
        let custody = Address::pool_custody(maturity);
        if protocol.pt_balance(&custody, maturity) < pool.pt_reserve
            || protocol.sy_balance(&custody) < pool.sy_reserve
        {
            return Err(InvariantViolation::Custody(maturity));
        }
    }
    Ok(())
}
