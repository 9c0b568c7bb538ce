//! Stakied yield tokenization core
//!
//! Pure state machine for the SY vault, the PT/YT splitter and the
//! maturity-scoped PT/SY pools. No host dependencies: the caller supplies
//! the block height and the signer through [`Context`].
//!
//! Every public operation runs through [`Protocol::execute`], which applies
//! the command to a working copy and commits only on success, so a failed
//! operation never leaves partial state behind.

pub mod accrual;
pub mod curve;
pub mod error;
pub mod invariants;
pub mod ledger;
pub mod math;
pub mod params;
pub mod pool;
pub mod protocol;
pub mod splitter;
pub mod sy;
pub mod time_factor;
pub mod types;

pub use error::*;
pub use params::ProtocolParams;
pub use protocol::{Command, Protocol, Receipt};
pub use types::*;
