//! Kani safety proofs for pricing, liquidity and accrual

use kani::{any, assume};
use stakied_core::curve::{
    quote_add_liquidity, quote_pt_for_sy, quote_remove_liquidity, quote_sy_for_pt, CurveState,
};
use stakied_core::math::SCALE;
use stakied_core::time_factor::calculate_time_factor;

use crate::generators::*;
use crate::sanitizer::*;

/// Time factor stays in [SCALE - max_discount, SCALE] and is par at maturity
#[kani::proof]
fn time_factor_bounded() {
    let curve = any_time_curve();
    let maturity: u64 = any();
    let now: u64 = any();

    let tf = calculate_time_factor(&curve, maturity, now);
    kani::assert(tf <= SCALE, "time factor never exceeds par");
    kani::assert(tf >= SCALE - curve.max_discount, "discount never exceeds the maximum");
    if now >= maturity {
        kani::assert(tf == SCALE, "par at and after maturity");
    }
}

/// PT never gets cheaper as maturity approaches
#[kani::proof]
fn time_factor_monotone() {
    let curve = any_time_curve();
    let maturity: u64 = any();
    let earlier: u64 = any();
    let later: u64 = any();
    assume(earlier <= later);

    kani::assert(
        calculate_time_factor(&curve, maturity, earlier)
            <= calculate_time_factor(&curve, maturity, later),
        "time factor is non-decreasing in block height",
    );
}

/// Selling PT never drains SY below the floor and never shrinks k
#[kani::proof]
fn pt_for_sy_preserves_reserves() {
    let state = any_curve();
    let pt_in = any_trade();

    if let Ok(q) = quote_pt_for_sy(&state, pt_in) {
        kani::assert(q.amount_out > 0, "zero-output trades are rejected");
        kani::assert(q.new_sy_reserve >= state.min_liquidity, "SY reserve stays above the floor");
        kani::assert(
            q.new_sy_reserve + q.amount_out == state.sy_reserve,
            "SY leaves only as output",
        );
        kani::assert(q.protocol_fee <= q.fee && q.fee <= pt_in, "fees are part of the input");
        kani::assert(
            q.new_pt_reserve == state.pt_reserve + pt_in - q.protocol_fee,
            "PT input minus the protocol skim lands in the pool",
        );
        kani::assert(
            u128::from(q.new_pt_reserve) * u128::from(q.new_sy_reserve)
                >= u128::from(state.pt_reserve) * u128::from(state.sy_reserve),
            "k never decreases on a sale",
        );
    }
}

/// Buying PT never drains the real PT reserve below the floor
#[kani::proof]
fn sy_for_pt_preserves_reserves() {
    let state = any_curve();
    let sy_in = any_trade();

    if let Ok(q) = quote_sy_for_pt(&state, sy_in) {
        kani::assert(q.amount_out > 0, "zero-output trades are rejected");
        kani::assert(q.new_pt_reserve >= state.min_liquidity, "PT reserve stays above the floor");
        kani::assert(
            q.new_pt_reserve + q.amount_out == state.pt_reserve,
            "PT leaves only as output",
        );
        kani::assert(q.protocol_fee <= q.fee && q.fee <= sy_in, "fees are part of the input");
        kani::assert(
            q.new_sy_reserve == state.sy_reserve + sy_in - q.protocol_fee,
            "SY input minus the protocol skim lands in the pool",
        );
    }
}

/// Buying PT and selling it straight back never returns more SY
#[kani::proof]
fn buy_sell_round_trip_never_profits() {
    let state = any_curve();
    let sy_in = any_trade();

    if let Ok(buy) = quote_sy_for_pt(&state, sy_in) {
        let mid = CurveState {
            pt_reserve: buy.new_pt_reserve,
            sy_reserve: buy.new_sy_reserve,
            ..state
        };
        if let Ok(sell) = quote_pt_for_sy(&mid, buy.amount_out) {
            kani::assert(sell.amount_out <= sy_in, "round trip never profits");
        }
    }
}

/// Deposits never consume more than offered, and LP is never over-minted
#[kani::proof]
fn add_liquidity_is_conservative() {
    let state = any_curve();
    let lp_supply: u64 = any();
    assume(lp_supply > 0 && lp_supply <= MAX_RESERVE);
    let pt_in = any_trade();
    let sy_in = any_trade();

    let quote = quote_add_liquidity(state.pt_reserve, state.sy_reserve, lp_supply, pt_in, sy_in);
    if let Ok(q) = quote {
        kani::assert(q.pt_used <= pt_in && q.sy_used <= sy_in, "used amounts fit the deposit");
        kani::assert(
            u128::from(q.lp_out) * u128::from(state.pt_reserve)
                <= u128::from(q.pt_used) * u128::from(lp_supply),
            "LP share never exceeds the PT contributed",
        );
        kani::assert(
            u128::from(q.lp_out) * u128::from(state.sy_reserve)
                <= u128::from(q.sy_used) * u128::from(lp_supply),
            "LP share never exceeds the SY contributed",
        );
    }
}

/// Withdrawals are pro-rata rounded down and respect the floor
#[kani::proof]
fn remove_liquidity_is_conservative() {
    let state = any_curve();
    let lp_supply: u64 = any();
    assume(lp_supply > 0 && lp_supply <= MAX_RESERVE);
    let lp_in: u64 = any();

    if let Ok(q) = quote_remove_liquidity(
        state.pt_reserve,
        state.sy_reserve,
        lp_supply,
        lp_in,
        state.min_liquidity,
    ) {
        kani::assert(lp_in <= lp_supply, "cannot burn more LP than exists");
        kani::assert(
            u128::from(q.pt_out) * u128::from(lp_supply)
                <= u128::from(lp_in) * u128::from(state.pt_reserve),
            "PT out is at most the pro-rata share",
        );
        kani::assert(
            u128::from(q.sy_out) * u128::from(lp_supply)
                <= u128::from(lp_in) * u128::from(state.sy_reserve),
            "SY out is at most the pro-rata share",
        );
        kani::assert(state.pt_reserve - q.pt_out >= state.min_liquidity, "PT floor holds");
        kani::assert(state.sy_reserve - q.sy_out >= state.min_liquidity, "SY floor holds");
    }
}

/// Settled yield is bounded by the appreciation of the YT balance
#[kani::proof]
fn accrual_bounded_by_appreciation() {
    let mut cp = any_checkpoint();
    let yt: u64 = any();
    assume(yt <= MAX_TRADE);
    let rate: u64 = any();
    assume(rate >= MIN_RATE && rate <= MAX_RATE);

    let last = cp.last_rate;
    let before = cp.accrued;
    if cp.settle(yt, rate, 1).is_ok() {
        let gained = u128::from(cp.accrued - before);
        if rate <= last {
            kani::assert(gained == 0, "no yield without a new high");
        } else {
            kani::assert(
                gained * u128::from(rate) <= u128::from(yt) * u128::from(rate - last),
                "yield never exceeds the value gained",
            );
        }
        kani::assert(cp.last_rate >= last, "checkpoint is a high-water mark");
    }
}

/// Settling twice at the same rate pays once
#[kani::proof]
fn accrual_no_double_count() {
    let mut cp = any_checkpoint();
    let yt: u64 = any();
    assume(yt <= MAX_TRADE);
    let rate: u64 = any();
    assume(rate >= MIN_RATE && rate <= MAX_RATE);

    if cp.settle(yt, rate, 1).is_ok() {
        let once = cp.accrued;
        kani::assert(cp.pending(yt, rate) == Ok(once), "preview matches settled state");
        if cp.settle(yt, rate, 2).is_ok() {
            kani::assert(cp.accrued == once, "second settlement adds nothing");
        }
    }
}
