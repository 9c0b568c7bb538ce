//! Protocol state account
//!
//! Fixed header followed by the bincode-encoded `Protocol`. The account
//! is allocated by the client with room for the blob to grow; a blob that
//! no longer fits fails the instruction with `AccountDataTooSmall`.

use crate::instruction::InstructionReader;
use pinocchio::{program_error::ProgramError, pubkey::Pubkey};
use stakied_core::Protocol;

/// magic (8) + version (1) + padding (7) + authority (32) + blob_len (8)
pub const HEADER_SIZE: usize = 56;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHeader {
    pub version: u8,
    /// Protocol owner (exchange-rate updater)
    pub authority: Pubkey,
    pub blob_len: u64,
}

impl StateHeader {
    pub const MAGIC: &'static [u8; 8] = b"STKDPROT";
    pub const VERSION: u8 = 0;

    pub fn new(authority: Pubkey, blob_len: u64) -> Self {
        Self {
            version: Self::VERSION,
            authority,
            blob_len,
        }
    }

    /// True if `data` starts with a header written by this program
    pub fn is_initialized(data: &[u8]) -> bool {
        data.len() >= HEADER_SIZE && &data[..8] == Self::MAGIC
    }

    pub fn read(data: &[u8]) -> Result<Self, ProgramError> {
        let header = data
            .get(..HEADER_SIZE)
            .ok_or(ProgramError::AccountDataTooSmall)?;
        let mut r = InstructionReader::new(header);
        let magic = r
            .read_bytes::<8>()
            .map_err(|_| ProgramError::InvalidAccountData)?;
        if &magic != Self::MAGIC {
            return Err(ProgramError::UninitializedAccount);
        }
        let version = r.read_u8().map_err(|_| ProgramError::InvalidAccountData)?;
        if version != Self::VERSION {
            return Err(ProgramError::InvalidAccountData);
        }
        r.read_bytes::<7>()
            .map_err(|_| ProgramError::InvalidAccountData)?;
        let authority = r
            .read_bytes::<32>()
            .map_err(|_| ProgramError::InvalidAccountData)?;
        let blob_len = r.read_u64().map_err(|_| ProgramError::InvalidAccountData)?;
        Ok(Self {
            version,
            authority,
            blob_len,
        })
    }

    pub fn write(&self, data: &mut [u8]) -> Result<(), ProgramError> {
        let header = data
            .get_mut(..HEADER_SIZE)
            .ok_or(ProgramError::AccountDataTooSmall)?;
        header[..8].copy_from_slice(Self::MAGIC);
        header[8] = self.version;
        header[9..16].fill(0);
        header[16..48].copy_from_slice(&self.authority);
        header[48..56].copy_from_slice(&self.blob_len.to_le_bytes());
        Ok(())
    }
}

/// Decode the protocol stored in an initialized account
pub fn load_protocol(data: &[u8]) -> Result<Protocol, ProgramError> {
    let header = StateHeader::read(data)?;
    let len = usize::try_from(header.blob_len).map_err(|_| ProgramError::InvalidAccountData)?;
    let end = HEADER_SIZE
        .checked_add(len)
        .ok_or(ProgramError::InvalidAccountData)?;
    let blob = data
        .get(HEADER_SIZE..end)
        .ok_or(ProgramError::InvalidAccountData)?;
    bincode::deserialize(blob).map_err(|_| ProgramError::InvalidAccountData)
}

/// Encode `protocol` into the account, rewriting the header
pub fn store_protocol(
    data: &mut [u8],
    authority: Pubkey,
    protocol: &Protocol,
) -> Result<(), ProgramError> {
    let blob = bincode::serialize(protocol).map_err(|_| ProgramError::InvalidAccountData)?;
    let end = HEADER_SIZE
        .checked_add(blob.len())
        .ok_or(ProgramError::AccountDataTooSmall)?;
    data.get_mut(HEADER_SIZE..end)
        .ok_or(ProgramError::AccountDataTooSmall)?
        .copy_from_slice(&blob);
    StateHeader::new(authority, blob.len() as u64).write(data)
}
