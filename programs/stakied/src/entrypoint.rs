//! Stakied program entrypoint

use pinocchio::{account_info::AccountInfo, entrypoint, msg, pubkey::Pubkey, ProgramResult};

use crate::instruction::StakiedInstruction;
use crate::processor::process;

entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = StakiedInstruction::unpack(instruction_data).map_err(|err| {
        msg!("Error: Malformed instruction data");
        err
    })?;

    msg!("Instruction: {}", instruction.name());
    process(program_id, accounts, &instruction)
}
