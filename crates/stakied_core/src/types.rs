//! Identity, clock and execution context

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Logical clock value (host block height / slot)
pub type BlockHeight = u64;

/// Block height after which PT redeems at par and YT stops accruing
pub type Maturity = u64;

/// Seed prefix for pool custody addresses
const POOL_CUSTODY_SEED: &[u8; 12] = b"stakied-pool";

/// 32-byte account identity, base58 in human-readable formats
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Address holding the reserves of the pool for `maturity`.
    /// Layout: seed (12) + zero padding (12) + maturity LE (8).
    pub fn pool_custody(maturity: Maturity) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..POOL_CUSTODY_SEED.len()].copy_from_slice(POOL_CUSTODY_SEED);
        bytes[24..].copy_from_slice(&maturity.to_le_bytes());
        Self(bytes)
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("invalid base58: {0}")]
    Base58(String),
    #[error("expected 32 bytes, got {0}")]
    Length(usize),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressParseError::Base58(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressParseError::Length(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Self)
        }
    }
}

/// Host-supplied execution context for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    /// Authenticated signer of the operation
    pub caller: Address,
    /// Current block height; monotonic across operations
    pub block_height: BlockHeight,
}

impl Context {
    pub const fn new(caller: Address, block_height: BlockHeight) -> Self {
        Self { caller, block_height }
    }
}
