//! Stakied on-chain program
//!
//! Thin host adapter around `stakied_core`: one program-owned state account
//! holds the whole protocol, every instruction is decoded into a core
//! `Command` and executed with the runtime slot as block height and the
//! signer as caller.
//!
//! ## Instructions
//!
//! - **Initialize** (0): write a fresh protocol into the state account; the
//!   signer becomes the exchange-rate owner
//! - **Commands** (1..=14): deposit, redeem, transfer SY, update exchange
//!   rate, mint PT/YT, redeem matured PT, recombine, claim yield, transfer
//!   PT, initialize pool, add/remove liquidity, swap PT→SY, swap SY→PT
//!
//! ## Accounts (all instructions)
//!
//! 0. `[writable]` Protocol state account (owned by this program)
//! 1. `[signer]` Caller
//!
//! ## State account layout
//!
//! ```text
//! magic: [u8; 8]       - "STKDPROT"
//! version: u8          - currently 0
//! _padding: [u8; 7]
//! authority: Pubkey    - protocol owner
//! blob_len: u64        - length of the bincode-encoded protocol
//! blob: [u8]           - Protocol state
//! ```

pub mod instruction;
pub mod processor;
pub mod state;

#[cfg(feature = "bpf-entrypoint")]
mod entrypoint;

pub use instruction::StakiedInstruction;
pub use state::{StateHeader, HEADER_SIZE};

pinocchio_pubkey::declare_id!("CeBCdr2hWWZH3gqSukn2dVCxrngjPqv5bbTVkyknz5HM");
