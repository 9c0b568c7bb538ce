//! Instruction processing
//!
//! Account validation lives in [`process`]; the state transitions operate
//! on the raw account bytes so they can be driven without a runtime.

use crate::instruction::StakiedInstruction;
use crate::state::{load_protocol, store_protocol, StateHeader};
use pinocchio::{
    account_info::AccountInfo,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvars::{clock::Clock, Sysvar},
    ProgramResult,
};
use stakied_core::{Address, Command, Context, Protocol, ProtocolParams, Receipt, StakiedError};

/// Custom program error carrying the module-scoped code of `err`
pub fn rejection(err: StakiedError, command: &Command) -> ProgramError {
    ProgramError::Custom(err.code(command.module()))
}

/// Validate accounts, then run `ix` against the state account
///
/// Accounts:
/// 0. `[writable]` Protocol state account
/// 1. `[signer]` Caller
pub fn process(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    ix: &StakiedInstruction,
) -> ProgramResult {
    let [state_account, caller_account, ..] = accounts else {
        msg!("Error: Instruction requires 2 accounts");
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    if !caller_account.is_signer() {
        msg!("Error: Caller must be signer");
        return Err(ProgramError::MissingRequiredSignature);
    }
    if !state_account.is_writable() {
        msg!("Error: State account must be writable");
        return Err(ProgramError::InvalidAccountData);
    }
    if !state_account.is_owned_by(program_id) {
        msg!("Error: State account not owned by program");
        return Err(ProgramError::IncorrectProgramId);
    }

    let slot = Clock::get()?.slot;
    let caller = *caller_account.key();
    let mut data = state_account.try_borrow_mut_data()?;

    if let Some(receipt) = apply(&mut data, caller, slot, ix)? {
        log_receipt(&receipt);
    }
    Ok(())
}

/// Run a decoded instruction against raw state bytes. Initialization has
/// no receipt.
pub fn apply(
    data: &mut [u8],
    caller: Pubkey,
    slot: u64,
    ix: &StakiedInstruction,
) -> Result<Option<Receipt>, ProgramError> {
    match ix {
        StakiedInstruction::Initialize(params) => {
            initialize(data, caller, slot, *params).map(|()| None)
        }
        StakiedInstruction::Execute(command) => execute(data, caller, slot, command).map(Some),
    }
}

/// Write a genesis protocol owned by `owner` into an empty account
pub fn initialize(
    data: &mut [u8],
    owner: Pubkey,
    slot: u64,
    params: ProtocolParams,
) -> ProgramResult {
    if StateHeader::is_initialized(data) {
        msg!("Error: State account already initialized");
        return Err(ProgramError::AccountAlreadyInitialized);
    }
    let protocol = Protocol::genesis(Address::new(owner), params, slot).map_err(|_| {
        msg!("Error: Invalid protocol parameters");
        ProgramError::InvalidArgument
    })?;
    store_protocol(data, owner, &protocol)?;

    msg!("Protocol initialized");
    Ok(())
}

/// Execute one command for `caller` at `slot`, persisting only on success
pub fn execute(
    data: &mut [u8],
    caller: Pubkey,
    slot: u64,
    command: &Command,
) -> Result<Receipt, ProgramError> {
    let header = StateHeader::read(data)?;
    let mut protocol = load_protocol(data)?;

    let ctx = Context::new(Address::new(caller), slot);
    let receipt = protocol.execute(&ctx, command).map_err(|err| {
        msg!("Error: {} rejected: {}", command.name(), err);
        rejection(err, command)
    })?;

    store_protocol(data, header.authority, &protocol)?;
    Ok(receipt)
}

fn log_receipt(receipt: &Receipt) {
    match receipt {
        Receipt::Swapped(q) => msg!("Swapped {} for {}", q.amount_in, q.amount_out),
        Receipt::PoolInitialized { lp_minted } => msg!("Pool initialized, lp {}", lp_minted),
        Receipt::YieldClaimed { sy_out } => msg!("Yield claimed {}", sy_out),
        Receipt::Recombined(r) => msg!("Recombined {}, yield {}", r.sy_out, r.yield_paid),
        _ => msg!("Command executed"),
    }
}
