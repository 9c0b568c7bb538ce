//! PT/YT splitter scenarios

use stakied_core::splitter::{Position, Recombination};
use stakied_core::{Command, Receipt};
use stakied_integration_tests::{Simnet, DEPLOYER, WALLET_1, WALLET_2};

#[test]
fn test_zero_balances_initially() {
    let net = Simnet::new();
    let state = net.state();
    assert_eq!(state.pt_balance(&WALLET_1, 1_000), 0);
    assert_eq!(state.yt_balance(&WALLET_1, 1_000), 0);
    assert_eq!(state.claimable_yield(&WALLET_1, 1_000, net.slot()), Ok(0));
}

#[test]
fn test_mint_credits_equal_pt_and_yt() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 1_000_000);
    assert_eq!(
        net.call_code(WALLET_1, Command::MintPtYt { amount: 1_000_000, maturity: 10_000 }),
        Ok(Receipt::Minted(Position { pt: 1_000_000, yt: 1_000_000 }))
    );
    let state = net.state();
    assert_eq!(state.pt_balance(&WALLET_1, 10_000), 1_000_000);
    assert_eq!(state.yt_balance(&WALLET_1, 10_000), 1_000_000);
    assert_eq!(state.sy_balance(&WALLET_1), 0);
    assert_eq!(state.splitter().sy_backing(10_000), 1_000_000);
}

#[test]
fn test_mint_rejections() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 1_000_000);
    // past maturity
    assert_eq!(
        net.call_code(WALLET_1, Command::MintPtYt { amount: 1_000_000, maturity: 1 }),
        Err(206)
    );
    assert_eq!(
        net.call_code(WALLET_1, Command::MintPtYt { amount: 0, maturity: 10_000 }),
        Err(202)
    );
    assert_eq!(
        net.call_code(WALLET_1, Command::MintPtYt { amount: 1_000_001, maturity: 10_000 }),
        Err(203)
    );
}

#[test]
fn test_redeem_pt_after_maturity() {
    let mut net = Simnet::new();
    let maturity = 100;
    net.deposit(WALLET_1, 1_000_000);
    net.mint_pt_yt(WALLET_1, 1_000_000, maturity);
    net.mine_empty_blocks(maturity + 10);

    assert_eq!(
        net.call_code(WALLET_1, Command::RedeemMaturedPt { amount: 500_000, maturity }),
        Ok(Receipt::PtRedeemed { sy_out: 500_000 })
    );
    let state = net.state();
    assert_eq!(state.pt_balance(&WALLET_1, maturity), 500_000);
    assert_eq!(state.sy_balance(&WALLET_1), 500_000);
    // YT is untouched by PT redemption
    assert_eq!(state.yt_balance(&WALLET_1, maturity), 1_000_000);
}

#[test]
fn test_redeem_pt_before_maturity_rejected() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 1_000_000);
    net.mint_pt_yt(WALLET_1, 1_000_000, 10_000);
    assert_eq!(
        net.call_code(WALLET_1, Command::RedeemMaturedPt { amount: 500_000, maturity: 10_000 }),
        Err(204)
    );
}

#[test]
fn test_redeem_pt_without_balance_rejected() {
    let mut net = Simnet::new();
    net.mine_empty_blocks(110);
    assert_eq!(
        net.call_code(WALLET_1, Command::RedeemMaturedPt { amount: 500_000, maturity: 100 }),
        Err(203)
    );
}

#[test]
fn test_recombine_before_maturity() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 1_000_000);
    net.mint_pt_yt(WALLET_1, 1_000_000, 10_000);
    // sold half the PT
    net.call(
        WALLET_1,
        Command::TransferPt { from: WALLET_1, to: WALLET_2, amount: 500_000, maturity: 10_000 },
    )
    .unwrap();

    assert_eq!(
        net.call_code(WALLET_1, Command::RedeemPtYt { amount: 500_001, maturity: 10_000 }),
        Err(203)
    );
    assert_eq!(
        net.call_code(WALLET_1, Command::RedeemPtYt { amount: 500_000, maturity: 10_000 }),
        Ok(Receipt::Recombined(Recombination { sy_out: 500_000, yield_paid: 0 }))
    );
    let state = net.state();
    assert_eq!(state.sy_balance(&WALLET_1), 500_000);
    assert_eq!(state.yt_balance(&WALLET_1, 10_000), 500_000);
    assert_eq!(state.pt_total_supply(10_000), 500_000);
    assert_eq!(state.yt_total_supply(10_000), 500_000);
}

#[test]
fn test_yield_claim_after_rate_rise() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 1_000_000);
    net.mint_pt_yt(WALLET_1, 1_000_000, 10_000);

    // nothing accrued yet
    assert_eq!(net.call_code(WALLET_1, Command::ClaimYield { maturity: 10_000 }), Err(202));

    net.call(DEPLOYER, Command::UpdateExchangeRate { rate: 1_100_000 })
        .unwrap();
    assert_eq!(net.state().claimable_yield(&WALLET_1, 10_000, net.slot()), Ok(90_909));
    assert_eq!(
        net.call_code(WALLET_1, Command::ClaimYield { maturity: 10_000 }),
        Ok(Receipt::YieldClaimed { sy_out: 90_909 })
    );
    assert_eq!(net.state().sy_balance(&WALLET_1), 90_909);
    assert_eq!(net.call_code(WALLET_1, Command::ClaimYield { maturity: 10_000 }), Err(202));
}

#[test]
fn test_yield_follows_yt_not_pt() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 1_000_000);
    net.mint_pt_yt(WALLET_1, 1_000_000, 10_000);
    net.call(
        WALLET_1,
        Command::TransferPt { from: WALLET_1, to: WALLET_2, amount: 1_000_000, maturity: 10_000 },
    )
    .unwrap();
    net.call(DEPLOYER, Command::UpdateExchangeRate { rate: 1_100_000 })
        .unwrap();

    assert_eq!(net.call_code(WALLET_2, Command::ClaimYield { maturity: 10_000 }), Err(202));
    assert_eq!(
        net.call_code(WALLET_1, Command::ClaimYield { maturity: 10_000 }),
        Ok(Receipt::YieldClaimed { sy_out: 90_909 })
    );
}

#[test]
fn test_recombining_all_yt_pays_yield_and_ends_claims() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 1_000_000);
    net.mint_pt_yt(WALLET_1, 1_000_000, 100_000);
    net.call(DEPLOYER, Command::UpdateExchangeRate { rate: 1_100_000 })
        .unwrap();

    assert_eq!(
        net.call_code(WALLET_1, Command::RedeemPtYt { amount: 1_000_000, maturity: 100_000 }),
        Ok(Receipt::Recombined(Recombination { sy_out: 1_000_000, yield_paid: 90_909 }))
    );
    assert_eq!(net.call_code(WALLET_1, Command::ClaimYield { maturity: 100_000 }), Err(202));

    let state = net.state();
    assert_eq!(state.sy_balance(&WALLET_1), 1_090_909);
    assert_eq!(state.splitter().checkpoint(&WALLET_1, 100_000), None);
}
