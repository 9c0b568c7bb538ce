//! Instruction encoding
//!
//! Layout: one discriminator byte followed by little-endian fixed-width
//! fields. Addresses are 32 raw bytes.
//!
//! | tag | instruction          | fields                                   |
//! |-----|----------------------|------------------------------------------|
//! | 0   | Initialize           | fee, share, recipient, discount, horizon, floor |
//! | 1   | Deposit              | amount                                   |
//! | 2   | Redeem               | amount                                   |
//! | 3   | TransferSy           | from, to, amount                         |
//! | 4   | UpdateExchangeRate   | rate                                     |
//! | 5   | MintPtYt             | amount, maturity                         |
//! | 6   | RedeemMaturedPt      | amount, maturity                         |
//! | 7   | RedeemPtYt           | amount, maturity                         |
//! | 8   | ClaimYield           | maturity                                 |
//! | 9   | TransferPt           | from, to, amount, maturity               |
//! | 10  | InitializePool       | maturity, pt, sy                         |
//! | 11  | AddLiquidity         | maturity, pt, sy, min lp                 |
//! | 12  | RemoveLiquidity      | maturity, lp, min pt, min sy             |
//! | 13  | SwapPtForSy          | maturity, pt in, min sy out              |
//! | 14  | SwapSyForPt          | maturity, sy in, min pt out              |

use pinocchio::program_error::ProgramError;
use stakied_core::{Address, Command, ProtocolParams};

pub const INITIALIZE: u8 = 0;

/// Decoded instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakiedInstruction {
    Initialize(ProtocolParams),
    Execute(Command),
}

/// Sequential little-endian reader with bounds checking
pub struct InstructionReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> InstructionReader<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Read a fixed-size byte array and advance
    #[inline]
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], ProgramError> {
        let end = self
            .offset
            .checked_add(N)
            .ok_or(ProgramError::InvalidInstructionData)?;
        let bytes = self
            .data
            .get(self.offset..end)
            .ok_or(ProgramError::InvalidInstructionData)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.offset = end;
        Ok(out)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, ProgramError> {
        Ok(self.read_bytes::<1>()?[0])
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, ProgramError> {
        self.read_bytes::<8>().map(u64::from_le_bytes)
    }

    #[inline]
    pub fn read_address(&mut self) -> Result<Address, ProgramError> {
        self.read_bytes::<32>().map(Address::new)
    }

    /// Fail if any bytes are left unread
    #[inline]
    pub fn finish(&self) -> Result<(), ProgramError> {
        if self.remaining() != 0 {
            return Err(ProgramError::InvalidInstructionData);
        }
        Ok(())
    }
}

/// Little-endian writer, the inverse of [`InstructionReader`]
#[derive(Default)]
pub struct InstructionWriter {
    buf: Vec<u8>,
}

impl InstructionWriter {
    pub fn new(tag: u8) -> Self {
        Self { buf: vec![tag] }
    }

    pub fn u64(mut self, value: u64) -> Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn address(mut self, value: &Address) -> Self {
        self.buf.extend_from_slice(&value.0);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Discriminator of a command
pub fn command_tag(command: &Command) -> u8 {
    match command {
        Command::Deposit { .. } => 1,
        Command::Redeem { .. } => 2,
        Command::TransferSy { .. } => 3,
        Command::UpdateExchangeRate { .. } => 4,
        Command::MintPtYt { .. } => 5,
        Command::RedeemMaturedPt { .. } => 6,
        Command::RedeemPtYt { .. } => 7,
        Command::ClaimYield { .. } => 8,
        Command::TransferPt { .. } => 9,
        Command::InitializePool { .. } => 10,
        Command::AddLiquidity { .. } => 11,
        Command::RemoveLiquidity { .. } => 12,
        Command::SwapPtForSy { .. } => 13,
        Command::SwapSyForPt { .. } => 14,
    }
}

impl StakiedInstruction {
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let mut r = InstructionReader::new(data);
        let tag = r.read_u8()?;

        let ix = match tag {
            INITIALIZE => StakiedInstruction::Initialize(ProtocolParams {
                swap_fee_bps: r.read_u64()?,
                protocol_fee_share_bps: r.read_u64()?,
                fee_recipient: r.read_address()?,
                max_time_discount: r.read_u64()?,
                time_horizon_blocks: r.read_u64()?,
                min_liquidity: r.read_u64()?,
            }),
            1 => Self::Execute(Command::Deposit { amount: r.read_u64()? }),
            2 => Self::Execute(Command::Redeem { amount: r.read_u64()? }),
            3 => Self::Execute(Command::TransferSy {
                from: r.read_address()?,
                to: r.read_address()?,
                amount: r.read_u64()?,
            }),
            4 => Self::Execute(Command::UpdateExchangeRate { rate: r.read_u64()? }),
            5 => Self::Execute(Command::MintPtYt {
                amount: r.read_u64()?,
                maturity: r.read_u64()?,
            }),
            6 => Self::Execute(Command::RedeemMaturedPt {
                amount: r.read_u64()?,
                maturity: r.read_u64()?,
            }),
            7 => Self::Execute(Command::RedeemPtYt {
                amount: r.read_u64()?,
                maturity: r.read_u64()?,
            }),
            8 => Self::Execute(Command::ClaimYield { maturity: r.read_u64()? }),
            9 => Self::Execute(Command::TransferPt {
                from: r.read_address()?,
                to: r.read_address()?,
                amount: r.read_u64()?,
                maturity: r.read_u64()?,
            }),
            10 => Self::Execute(Command::InitializePool {
                maturity: r.read_u64()?,
                pt_amount: r.read_u64()?,
                sy_amount: r.read_u64()?,
            }),
            11 => Self::Execute(Command::AddLiquidity {
                maturity: r.read_u64()?,
                pt_amount: r.read_u64()?,
                sy_amount: r.read_u64()?,
                min_lp_out: r.read_u64()?,
            }),
            12 => Self::Execute(Command::RemoveLiquidity {
                maturity: r.read_u64()?,
                lp_amount: r.read_u64()?,
                min_pt_out: r.read_u64()?,
                min_sy_out: r.read_u64()?,
            }),
            13 => Self::Execute(Command::SwapPtForSy {
                maturity: r.read_u64()?,
                pt_in: r.read_u64()?,
                min_sy_out: r.read_u64()?,
            }),
            14 => Self::Execute(Command::SwapSyForPt {
                maturity: r.read_u64()?,
                sy_in: r.read_u64()?,
                min_pt_out: r.read_u64()?,
            }),
            _ => return Err(ProgramError::InvalidInstructionData),
        };
        r.finish()?;
        Ok(ix)
    }

    pub fn pack(&self) -> Vec<u8> {
        match self {
            StakiedInstruction::Initialize(p) => InstructionWriter::new(INITIALIZE)
                .u64(p.swap_fee_bps)
                .u64(p.protocol_fee_share_bps)
                .address(&p.fee_recipient)
                .u64(p.max_time_discount)
                .u64(p.time_horizon_blocks)
                .u64(p.min_liquidity)
                .finish(),
            StakiedInstruction::Execute(cmd) => pack_command(cmd),
        }
    }

    /// Name for program logs
    pub fn name(&self) -> &'static str {
        match self {
            StakiedInstruction::Initialize(_) => "initialize",
            StakiedInstruction::Execute(cmd) => cmd.name(),
        }
    }
}

fn pack_command(cmd: &Command) -> Vec<u8> {
    let w = InstructionWriter::new(command_tag(cmd));
    let w = match *cmd {
        Command::Deposit { amount } | Command::Redeem { amount } => w.u64(amount),
        Command::TransferSy { from, to, amount } => w.address(&from).address(&to).u64(amount),
        Command::UpdateExchangeRate { rate } => w.u64(rate),
        Command::MintPtYt { amount, maturity }
        | Command::RedeemMaturedPt { amount, maturity }
        | Command::RedeemPtYt { amount, maturity } => w.u64(amount).u64(maturity),
        Command::ClaimYield { maturity } => w.u64(maturity),
        Command::TransferPt {
            from,
            to,
            amount,
            maturity,
        } => w.address(&from).address(&to).u64(amount).u64(maturity),
        Command::InitializePool {
            maturity,
            pt_amount,
            sy_amount,
        } => w.u64(maturity).u64(pt_amount).u64(sy_amount),
        Command::AddLiquidity {
            maturity,
            pt_amount,
            sy_amount,
            min_lp_out,
        } => w.u64(maturity).u64(pt_amount).u64(sy_amount).u64(min_lp_out),
        Command::RemoveLiquidity {
            maturity,
            lp_amount,
            min_pt_out,
            min_sy_out,
        } => w.u64(maturity).u64(lp_amount).u64(min_pt_out).u64(min_sy_out),
        Command::SwapPtForSy {
            maturity,
            pt_in: amount_in,
            min_sy_out: min_out,
        }
        | Command::SwapSyForPt {
            maturity,
            sy_in: amount_in,
            min_pt_out: min_out,
        } => w.u64(maturity).u64(amount_in).u64(min_out),
    };
    w.finish()
}
