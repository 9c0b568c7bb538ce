//! Concrete Kani proofs
//! Fixed scenarios that pin exact outputs before the symbolic proofs.

use stakied_core::curve::{quote_pt_for_sy, CurveState};
use stakied_core::splitter::Recombination;
use stakied_core::math::SCALE;
use stakied_core::time_factor::{calculate_time_factor, TimeCurve};
use stakied_core::{Address, Command, Context, Protocol, ProtocolParams, Receipt};

fn par_pool() -> CurveState {
    CurveState {
        pt_reserve: 1_000_000,
        sy_reserve: 1_000_000,
        time_factor: SCALE,
        fee_bps: 30,
        protocol_fee_share_bps: 0,
        min_liquidity: 1_000,
    }
}

/// 100k PT into a 1M/1M pool at par
#[kani::proof]
fn concrete_swap_at_par() {
    let q = quote_pt_for_sy(&par_pool(), 100_000).unwrap();
    assert_eq!(q.fee, 300);
    assert_eq!(q.amount_out, 90_661);
    assert_eq!(q.new_pt_reserve, 1_100_000);
    assert_eq!(q.new_sy_reserve, 1_000_000 - 90_661);
}

/// Default curve: full discount beyond the horizon, par at maturity
#[kani::proof]
fn concrete_time_factor() {
    let curve = TimeCurve::default();
    assert_eq!(calculate_time_factor(&curve, 100_000, 0), SCALE - 50_000);
    assert_eq!(calculate_time_factor(&curve, 100, 100), SCALE);
}

/// Mint then recombine returns the SY exactly
#[kani::proof]
#[kani::unwind(4)]
fn concrete_mint_recombine() {
    let alice = Address::new([2u8; 32]);
    let mut p = Protocol::genesis(Address::new([1u8; 32]), ProtocolParams::default(), 0).unwrap();
    let ctx = Context::new(alice, 1);

    p.execute(&ctx, &Command::Deposit { amount: 500 }).unwrap();
    p.execute(&ctx, &Command::MintPtYt { amount: 500, maturity: 10 })
        .unwrap();
    assert_eq!(p.sy_balance(&alice), 0);
    assert_eq!(
        p.execute(&ctx, &Command::RedeemPtYt { amount: 500, maturity: 10 }),
        Ok(Receipt::Recombined(Recombination { sy_out: 500, yield_paid: 0 }))
    );
    assert_eq!(p.sy_balance(&alice), 500);
    assert_eq!(p.pt_total_supply(10), 0);
}
