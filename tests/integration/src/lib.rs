//! Stakied Integration Tests
//!
//! `Simnet` drives the protocol the way a cluster would: every call is packed
//! into instruction bytes, decoded by the program codec and applied to an
//! in-memory state account at the current slot. Read-only queries decode the
//! account back into a `Protocol`.

use pinocchio::program_error::ProgramError;
use stakied_core::{Address, BlockHeight, Command, Protocol, ProtocolParams, Receipt};
use stakied_program::{processor, state, StakiedInstruction};

pub use stakied_core;

/// Space reserved for the serialized protocol in the test state account
pub const STATE_ACCOUNT_SIZE: usize = 64 * 1024;

pub const DEPLOYER: Address = Address::new([1u8; 32]);
pub const WALLET_1: Address = Address::new([11u8; 32]);
pub const WALLET_2: Address = Address::new([12u8; 32]);
pub const WALLET_3: Address = Address::new([13u8; 32]);

pub struct Simnet {
    account: Vec<u8>,
    slot: BlockHeight,
}

impl Simnet {
    /// Fresh deployment with default parameters, owned by `DEPLOYER`
    pub fn new() -> Self {
        Self::with_params(ProtocolParams::default())
    }

    pub fn with_params(params: ProtocolParams) -> Self {
        let mut net = Self {
            account: vec![0u8; STATE_ACCOUNT_SIZE],
            slot: 1,
        };
        net.send(DEPLOYER, &StakiedInstruction::Initialize(params))
            .expect("initialize state account");
        net
    }

    pub fn slot(&self) -> BlockHeight {
        self.slot
    }

    pub fn mine_empty_blocks(&mut self, count: u64) {
        self.slot += count;
    }

    /// Run `command` signed by `caller`, then advance one block
    pub fn call(&mut self, caller: Address, command: Command) -> Result<Receipt, ProgramError> {
        let receipt = self.send(caller, &StakiedInstruction::Execute(command))?;
        Ok(receipt.expect("commands always produce a receipt"))
    }

    /// Like [`Simnet::call`], reducing a rejection to its custom error code
    pub fn call_code(&mut self, caller: Address, command: Command) -> Result<Receipt, u32> {
        self.call(caller, command).map_err(|err| match err {
            ProgramError::Custom(code) => code,
            other => panic!("expected a custom error code, got {:?}", other),
        })
    }

    fn send(
        &mut self,
        caller: Address,
        ix: &StakiedInstruction,
    ) -> Result<Option<Receipt>, ProgramError> {
        let bytes = ix.pack();
        let decoded = StakiedInstruction::unpack(&bytes)?;
        assert_eq!(&decoded, ix, "instruction codec must be lossless");

        let outcome = processor::apply(&mut self.account, caller.to_bytes(), self.slot, &decoded);
        self.slot += 1;
        outcome
    }

    /// Committed protocol state as stored in the account
    pub fn state(&self) -> Protocol {
        state::load_protocol(&self.account).expect("state account holds a protocol")
    }

    pub fn account_data(&self) -> &[u8] {
        &self.account
    }

    // Common setup steps

    pub fn deposit(&mut self, who: Address, amount: u64) {
        self.call(who, Command::Deposit { amount })
            .expect("deposit");
    }

    pub fn mint_pt_yt(&mut self, who: Address, amount: u64, maturity: u64) {
        self.call(who, Command::MintPtYt { amount, maturity })
            .expect("mint");
    }

    /// Deposit, mint and seed a pool of `pt`/`sy` at `maturity`
    pub fn setup_pool(&mut self, who: Address, maturity: u64, pt: u64, sy: u64) -> u64 {
        self.deposit(who, pt + sy);
        self.mint_pt_yt(who, pt, maturity);
        match self.call(
            who,
            Command::InitializePool {
                maturity,
                pt_amount: pt,
                sy_amount: sy,
            },
        ) {
            Ok(Receipt::PoolInitialized { lp_minted }) => lp_minted,
            other => panic!("initialize pool failed: {:?}", other),
        }
    }
}

impl Default for Simnet {
    fn default() -> Self {
        Self::new()
    }
}
