//! Deposit-to-redemption lifecycle across every component

use proptest::prelude::*;
use stakied_core::invariants::check_invariants;
use stakied_core::{Command, ProtocolParams, Receipt};
use stakied_integration_tests::{Simnet, DEPLOYER, WALLET_1, WALLET_2, WALLET_3};

const MATURITY: u64 = 200;

fn assert_consistent(net: &Simnet) {
    assert_eq!(check_invariants(&net.state()), Ok(()));
}

#[test]
fn test_full_deposit_to_redemption_cycle() {
    let mut net = Simnet::new();

    // LP seeds the market
    net.setup_pool(WALLET_1, MATURITY, 2_000_000, 2_000_000);
    assert_consistent(&net);

    // fixed-rate buyer: SY in, discounted PT out
    net.deposit(WALLET_2, 500_000);
    let Ok(Receipt::Swapped(buy)) = net.call(
        WALLET_2,
        Command::SwapSyForPt { maturity: MATURITY, sy_in: 500_000, min_pt_out: 390_000 },
    ) else {
        panic!("PT purchase failed");
    };
    assert!(buy.amount_out > 390_000 && buy.amount_out < 500_000);
    assert_consistent(&net);

    // yield seller keeps YT and sells PT
    net.deposit(WALLET_3, 1_000_000);
    net.mint_pt_yt(WALLET_3, 1_000_000, MATURITY);
    let Ok(Receipt::Swapped(sell)) = net.call(
        WALLET_3,
        Command::SwapPtForSy { maturity: MATURITY, pt_in: 300_000, min_sy_out: 1 },
    ) else {
        panic!("PT sale failed");
    };
    assert_consistent(&net);

    // staking rewards arrive twice before maturity, once after
    net.call(DEPLOYER, Command::UpdateExchangeRate { rate: 1_050_000 })
        .unwrap();
    net.call(DEPLOYER, Command::UpdateExchangeRate { rate: 1_100_000 })
        .unwrap();
    net.mine_empty_blocks(MATURITY);
    net.call(DEPLOYER, Command::UpdateExchangeRate { rate: 1_200_000 })
        .unwrap();

    // accrual froze at the last pre-maturity rate: 1M * 0.1 / 1.1
    let state = net.state();
    assert_eq!(state.claimable_yield(&WALLET_3, MATURITY, net.slot()), Ok(90_909));
    assert_eq!(
        net.call(WALLET_3, Command::ClaimYield { maturity: MATURITY }),
        Ok(Receipt::YieldClaimed { sy_out: 90_909 })
    );

    // PT holders redeem at par
    let pt_bought = buy.amount_out;
    assert_eq!(
        net.call(WALLET_2, Command::RedeemMaturedPt { amount: pt_bought, maturity: MATURITY }),
        Ok(Receipt::PtRedeemed { sy_out: pt_bought })
    );
    assert_eq!(
        net.call(WALLET_3, Command::RedeemMaturedPt { amount: 700_000, maturity: MATURITY }),
        Ok(Receipt::PtRedeemed { sy_out: 700_000 })
    );
    assert_consistent(&net);

    let state = net.state();
    assert_eq!(state.sy_balance(&WALLET_2), pt_bought);
    assert_eq!(state.sy_balance(&WALLET_3), sell.amount_out + 90_909 + 700_000);
    assert_eq!(state.pt_balance(&WALLET_3, MATURITY), 0);
    assert_eq!(state.yt_balance(&WALLET_3, MATURITY), 1_000_000);

    // LP withdraws half and redeems the PT it got back
    let lp = state.lp_balance(&WALLET_1, MATURITY);
    let Ok(Receipt::LiquidityRemoved(out)) = net.call(
        WALLET_1,
        Command::RemoveLiquidity {
            maturity: MATURITY,
            lp_amount: lp / 2,
            min_pt_out: 0,
            min_sy_out: 0,
        },
    ) else {
        panic!("withdrawal failed");
    };
    assert_eq!(
        net.call(WALLET_1, Command::RedeemMaturedPt { amount: out.pt_out, maturity: MATURITY }),
        Ok(Receipt::PtRedeemed { sy_out: out.pt_out })
    );
    assert_consistent(&net);

    // every outstanding PT is still fully backed
    let state = net.state();
    assert_eq!(
        state.splitter().sy_backing(MATURITY),
        state.pt_total_supply(MATURITY)
    );
}

#[test]
fn test_rejected_instruction_leaves_account_untouched() {
    let mut net = Simnet::new();
    net.setup_pool(WALLET_1, MATURITY, 1_000_000, 1_000_000);
    let before = net.account_data().to_vec();

    assert!(net
        .call(WALLET_2, Command::SwapSyForPt { maturity: MATURITY, sy_in: 10_000, min_pt_out: 0 })
        .is_err());
    assert!(net
        .call(WALLET_1, Command::InitializePool { maturity: MATURITY, pt_amount: 1, sy_amount: 1 })
        .is_err());
    assert_eq!(net.account_data(), &before[..]);
}

#[test]
fn test_protocol_fee_goes_to_recipient() {
    let params = ProtocolParams {
        protocol_fee_share_bps: 5_000,
        fee_recipient: DEPLOYER,
        ..ProtocolParams::default()
    };
    let mut net = Simnet::with_params(params);
    net.setup_pool(WALLET_1, MATURITY, 1_000_000, 1_000_000);
    net.deposit(WALLET_2, 100_000);

    let Ok(Receipt::Swapped(swap)) = net.call(
        WALLET_2,
        Command::SwapSyForPt { maturity: MATURITY, sy_in: 100_000, min_pt_out: 0 },
    ) else {
        panic!("swap failed");
    };
    // 30 bps of 100_000, half skimmed
    assert_eq!(swap.fee, 300);
    assert_eq!(swap.protocol_fee, 150);

    let state = net.state();
    assert_eq!(state.sy_balance(&DEPLOYER), 150);
    assert_eq!(state.pool_reserves(MATURITY).unwrap().1, 1_099_850);
    assert_consistent(&net);
}

fn step() -> impl Strategy<Value = (u8, u64)> {
    (0u8..6, 1u64..400_000)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Random traffic through the instruction path never breaks the books
    #[test]
    fn prop_books_balance_through_program(steps in prop::collection::vec(step(), 1..40)) {
        let mut net = Simnet::new();
        net.setup_pool(WALLET_1, MATURITY, 1_000_000, 1_000_000);
        net.deposit(WALLET_2, 2_000_000);
        net.mint_pt_yt(WALLET_2, 1_000_000, MATURITY);

        for (kind, amount) in steps {
            let command = match kind {
                0 => Command::SwapPtForSy { maturity: MATURITY, pt_in: amount, min_sy_out: 0 },
                1 => Command::SwapSyForPt { maturity: MATURITY, sy_in: amount, min_pt_out: 0 },
                2 => Command::AddLiquidity {
                    maturity: MATURITY,
                    pt_amount: amount,
                    sy_amount: amount,
                    min_lp_out: 0,
                },
                3 => Command::RemoveLiquidity {
                    maturity: MATURITY,
                    lp_amount: amount,
                    min_pt_out: 0,
                    min_sy_out: 0,
                },
                4 => Command::RedeemPtYt { maturity: MATURITY, amount },
                _ => Command::ClaimYield { maturity: MATURITY },
            };
            let before = net.account_data().to_vec();
            if net.call(WALLET_2, command).is_err() {
                prop_assert_eq!(net.account_data(), &before[..]);
            }
            prop_assert_eq!(check_invariants(&net.state()), Ok(()));
        }
    }
}
