//! SY vault scenarios

use stakied_core::sy::SyRedemption;
use stakied_core::{Command, Receipt};
use stakied_integration_tests::{Simnet, DEPLOYER, WALLET_1, WALLET_2};

#[test]
fn test_metadata_and_empty_state() {
    let net = Simnet::new();
    let state = net.state();
    assert_eq!(state.sy().name(), "Stakied Standardized Yield");
    assert_eq!(state.sy().symbol(), "SY-stSTX");
    assert_eq!(state.sy().decimals(), 6);
    assert_eq!(state.sy().owner(), DEPLOYER);
    assert_eq!(state.sy_balance(&WALLET_1), 0);
    assert_eq!(state.sy_total_supply(), 0);
    assert_eq!(state.exchange_rate(), 1_000_000);
}

#[test]
fn test_deposit_mints_one_to_one() {
    let mut net = Simnet::new();
    assert_eq!(
        net.call_code(WALLET_1, Command::Deposit { amount: 1_000_000 }),
        Ok(Receipt::Deposited { sy_minted: 1_000_000 })
    );
    let state = net.state();
    assert_eq!(state.sy_balance(&WALLET_1), 1_000_000);
    assert_eq!(state.sy_total_supply(), 1_000_000);
}

#[test]
fn test_deposits_accumulate() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 500_000);
    assert_eq!(
        net.call_code(WALLET_1, Command::Deposit { amount: 300_000 }),
        Ok(Receipt::Deposited { sy_minted: 300_000 })
    );
    assert_eq!(net.state().sy_balance(&WALLET_1), 800_000);
}

#[test]
fn test_zero_deposit_rejected() {
    let mut net = Simnet::new();
    assert_eq!(net.call_code(WALLET_1, Command::Deposit { amount: 0 }), Err(102));
}

#[test]
fn test_transfer_without_balance_rejected() {
    let mut net = Simnet::new();
    assert_eq!(
        net.call_code(
            WALLET_1,
            Command::TransferSy { from: WALLET_1, to: WALLET_2, amount: 1_000 }
        ),
        Err(103)
    );
}

#[test]
fn test_transfer_on_behalf_of_another_rejected() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 5_000);
    assert_eq!(
        net.call_code(
            WALLET_2,
            Command::TransferSy { from: WALLET_1, to: WALLET_2, amount: 1_000 }
        ),
        Err(101)
    );
    assert_eq!(
        net.call_code(
            WALLET_1,
            Command::TransferSy { from: WALLET_1, to: WALLET_2, amount: 1_000 }
        ),
        Ok(Receipt::Transferred { amount: 1_000 })
    );
    let state = net.state();
    assert_eq!(state.sy_balance(&WALLET_1), 4_000);
    assert_eq!(state.sy_balance(&WALLET_2), 1_000);
    assert_eq!(state.sy_total_supply(), 5_000);
}

#[test]
fn test_only_owner_updates_rate() {
    let mut net = Simnet::new();
    assert_eq!(
        net.call_code(WALLET_1, Command::UpdateExchangeRate { rate: 1_100_000 }),
        Err(101)
    );
    assert_eq!(
        net.call_code(DEPLOYER, Command::UpdateExchangeRate { rate: 1_100_000 }),
        Ok(Receipt::RateUpdated { rate: 1_100_000 })
    );
    assert_eq!(net.state().exchange_rate(), 1_100_000);
}

#[test]
fn test_redeem_reports_underlying_at_current_rate() {
    let mut net = Simnet::new();
    net.deposit(WALLET_1, 1_000_000);
    net.call(DEPLOYER, Command::UpdateExchangeRate { rate: 1_100_000 })
        .unwrap();

    assert_eq!(
        net.call_code(WALLET_1, Command::Redeem { amount: 500_000 }),
        Ok(Receipt::Redeemed(SyRedemption {
            sy_burned: 500_000,
            underlying_value: 550_000,
        }))
    );
    assert_eq!(net.call_code(WALLET_1, Command::Redeem { amount: 500_001 }), Err(103));
    assert_eq!(net.state().sy_total_supply(), 500_000);
}
