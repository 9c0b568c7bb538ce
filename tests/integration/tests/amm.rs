//! PT/SY pool scenarios

use stakied_core::curve::{LiquidityQuote, WithdrawQuote};
use stakied_core::math::SCALE;
use stakied_core::{Command, Receipt};
use stakied_integration_tests::{Simnet, WALLET_1, WALLET_2, WALLET_3};

const MATURITY: u64 = 1_000;

fn seeded() -> Simnet {
    let mut net = Simnet::new();
    assert_eq!(net.setup_pool(WALLET_1, MATURITY, 1_000_000, 1_000_000), 1_000_000);
    net
}

fn init(maturity: u64, pt_amount: u64, sy_amount: u64) -> Command {
    Command::InitializePool { maturity, pt_amount, sy_amount }
}

fn sell(pt_in: u64, min_sy_out: u64) -> Command {
    Command::SwapPtForSy { maturity: MATURITY, pt_in, min_sy_out }
}

fn buy(sy_in: u64, min_pt_out: u64) -> Command {
    Command::SwapSyForPt { maturity: MATURITY, sy_in, min_pt_out }
}

fn add(amount: u64, min_lp_out: u64) -> Command {
    Command::AddLiquidity {
        maturity: MATURITY,
        pt_amount: amount,
        sy_amount: amount,
        min_lp_out,
    }
}

fn remove(lp_amount: u64, min_out: u64) -> Command {
    Command::RemoveLiquidity {
        maturity: MATURITY,
        lp_amount,
        min_pt_out: min_out,
        min_sy_out: min_out,
    }
}

#[test]
fn test_initialize_pool() {
    let net = seeded();
    let state = net.state();
    assert_eq!(state.pool_reserves(MATURITY), Ok((1_000_000, 1_000_000)));
    assert_eq!(state.lp_balance(&WALLET_1, MATURITY), 1_000_000);

    let stats = state.pool_stats(MATURITY, net.slot()).unwrap();
    assert_eq!(stats.lp_supply, 1_000_000);
    assert!(stats.time_factor < SCALE);
    assert!(stats.pt_price < SCALE, "PT trades at a discount before maturity");
}

#[test]
fn test_initialize_twice_rejected() {
    let mut net = seeded();
    net.deposit(WALLET_1, 2_000_000);
    net.mint_pt_yt(WALLET_1, 1_000_000, MATURITY);
    assert_eq!(net.call_code(WALLET_1, init(MATURITY, 1_000_000, 1_000_000)), Err(307));
}

#[test]
fn test_initialize_with_zero_pt_rejected() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 2_000_000);
    assert_eq!(net.call_code(WALLET_1, init(MATURITY, 0, 1_000_000)), Err(302));
}

#[test]
fn test_initialize_past_maturity_rejected() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 2_000_000);
    net.mint_pt_yt(WALLET_1, 1_000_000, 500);
    net.mine_empty_blocks(600);
    assert_eq!(net.call_code(WALLET_1, init(500, 1_000_000, 1_000_000)), Err(309));
}

#[test]
fn test_initialize_without_pt_reports_pool_code() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 2_000_000);
    assert_eq!(net.call_code(WALLET_1, init(MATURITY, 1_000_000, 1_000_000)), Err(303));
}

#[test]
fn test_swap_pt_for_sy() {
    let mut net = seeded();
    net.deposit(WALLET_2, 500_000);
    net.mint_pt_yt(WALLET_2, 500_000, MATURITY);

    let quote = net.state().quote_swap_pt_for_sy(MATURITY, 100_000, net.slot()).unwrap();
    let receipt = net.call_code(WALLET_2, sell(100_000, 90_000)).unwrap();
    let Receipt::Swapped(swap) = receipt else {
        panic!("unexpected receipt {:?}", receipt);
    };
    assert_eq!(swap, quote);
    assert!(swap.amount_out >= 90_000 && swap.amount_out < 100_000);

    let state = net.state();
    assert_eq!(state.pt_balance(&WALLET_2, MATURITY), 400_000);
    assert_eq!(state.sy_balance(&WALLET_2), swap.amount_out);
    assert_eq!(state.pool_reserves(MATURITY), Ok((1_100_000, 1_000_000 - swap.amount_out)));
    let stats = state.pool_stats(MATURITY, net.slot()).unwrap();
    assert_eq!(stats.counters.swap_count, 1);
    assert_eq!(stats.counters.pt_volume, 100_000);
    assert_eq!(stats.counters.pt_fees, swap.fee);
}

#[test]
fn test_pt_sale_lowers_pt_price() {
    let mut net = seeded();
    net.deposit(WALLET_2, 100_000);
    net.mint_pt_yt(WALLET_2, 100_000, MATURITY);
    let before = net.state().pool_stats(MATURITY, net.slot()).unwrap();

    assert!(matches!(net.call(WALLET_2, sell(100_000, 1)), Ok(Receipt::Swapped(_))));
    // same block height, so only the reserves moved the price
    let after = net.state().pool_stats(MATURITY, net.slot() - 1).unwrap();
    assert!(after.pt_price < before.pt_price);
}

#[test]
fn test_swap_slippage_exceeded() {
    let mut net = seeded();
    assert_eq!(net.call_code(WALLET_1, sell(100_000, 99_999)), Err(305));
}

#[test]
fn test_swap_zero_amount_rejected() {
    let mut net = seeded();
    assert_eq!(net.call_code(WALLET_1, sell(0, 0)), Err(302));
}

#[test]
fn test_swap_without_pool_rejected() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 100_000);
    assert_eq!(net.call_code(WALLET_1, buy(1_000, 0)), Err(306));
}

#[test]
fn test_swap_sy_for_pt() {
    let mut net = seeded();
    net.deposit(WALLET_3, 100_000);
    let Receipt::Swapped(swap) = net.call_code(WALLET_3, buy(100_000, 1)).unwrap() else {
        panic!("expected a swap receipt");
    };
    // discounted PT: more than the constant-product amount, still below the input
    assert!(swap.amount_out > 90_661 && swap.amount_out < 100_000);

    let state = net.state();
    assert_eq!(state.pt_balance(&WALLET_3, MATURITY), swap.amount_out);
    assert_eq!(state.sy_balance(&WALLET_3), 0);
    assert_eq!(state.pool_reserves(MATURITY), Ok((1_000_000 - swap.amount_out, 1_100_000)));
}

#[test]
fn test_add_and_remove_liquidity() {
    let mut net = seeded();
    net.deposit(WALLET_2, 200_000);
    net.mint_pt_yt(WALLET_2, 100_000, MATURITY);

    assert_eq!(net.call_code(WALLET_2, add(100_000, 100_001)), Err(305));
    assert_eq!(
        net.call_code(WALLET_2, add(100_000, 100_000)),
        Ok(Receipt::LiquidityAdded(LiquidityQuote {
            lp_out: 100_000,
            pt_used: 100_000,
            sy_used: 100_000,
        }))
    );
    assert_eq!(net.state().lp_balance(&WALLET_2, MATURITY), 100_000);

    assert_eq!(net.call_code(WALLET_2, remove(100_001, 0)), Err(303));
    assert_eq!(
        net.call_code(WALLET_2, remove(50_000, 50_000)),
        Ok(Receipt::LiquidityRemoved(WithdrawQuote { pt_out: 50_000, sy_out: 50_000 }))
    );
    let state = net.state();
    assert_eq!(state.pool_reserves(MATURITY), Ok((1_050_000, 1_050_000)));
    assert_eq!(state.pt_balance(&WALLET_2, MATURITY), 50_000);
    assert_eq!(state.sy_balance(&WALLET_2), 50_000);
}

#[test]
fn test_full_withdrawal_hits_reserve_floor() {
    let mut net = seeded();
    assert_eq!(net.call_code(WALLET_1, remove(1_000_000, 0)), Err(304));
    // everything above the floor can still leave
    assert!(net.call_code(WALLET_1, remove(999_000, 0)).is_ok());
    assert_eq!(net.state().pool_reserves(MATURITY), Ok((1_000, 1_000)));
}

#[test]
fn test_time_factor_reaches_par_at_maturity() {
    let mut net = seeded();
    let early = net.state().time_factor(MATURITY, net.slot());
    net.mine_empty_blocks(MATURITY);
    let state = net.state();
    assert!(early < SCALE);
    assert_eq!(state.time_factor(MATURITY, net.slot()), SCALE);
    assert_eq!(state.pool_stats(MATURITY, net.slot()).unwrap().pt_price, SCALE);
}
