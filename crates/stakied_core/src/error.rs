//! Error taxonomy and module-scoped error codes

use thiserror::Error;

/// Result alias for engine operations
pub type StakiedResult<T> = Result<T, StakiedError>;

/// Rejection reasons. A rejected operation leaves state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StakiedError {
    #[error("amount is zero or out of range")]
    InvalidAmount,
    #[error("maturity is not valid for this operation")]
    InvalidMaturity,
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("pool cannot cover this trade without breaching its reserve floor")]
    InsufficientLiquidity,
    #[error("output is below the caller minimum")]
    SlippageExceeded,
    #[error("no pool exists for this maturity")]
    PoolNotInitialized,
    #[error("a pool already exists for this maturity")]
    PoolAlreadyExists,
    #[error("maturity has not been reached")]
    MaturityNotReached,
    #[error("caller is not authorized")]
    Unauthorized,
}

/// Component owning an operation; selects the error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    SyVault,
    Splitter,
    Pool,
}

impl Module {
    pub const fn base(self) -> u32 {
        match self {
            Module::SyVault => 100,
            Module::Splitter => 200,
            Module::Pool => 300,
        }
    }
}

impl StakiedError {
    const fn offset(self) -> u32 {
        match self {
            StakiedError::Unauthorized => 1,
            StakiedError::InvalidAmount => 2,
            StakiedError::InsufficientBalance => 3,
            StakiedError::InsufficientLiquidity => 4,
            StakiedError::SlippageExceeded => 5,
            StakiedError::PoolNotInitialized => 6,
            StakiedError::PoolAlreadyExists => 7,
            StakiedError::MaturityNotReached => 8,
            StakiedError::InvalidMaturity => 9,
        }
    }

    /// Wire code of this error when raised by an operation of `module`
    /// (e.g. 103 for an SY transfer, 303 for a pool LP withdrawal).
    pub const fn code(self, module: Module) -> u32 {
        match (module, self) {
            (Module::Splitter, StakiedError::MaturityNotReached) => 204,
            (Module::Splitter, StakiedError::InvalidMaturity) => 206,
            // swapped with the two above to keep splitter codes unique
            (Module::Splitter, StakiedError::InsufficientLiquidity) => 208,
            (Module::Splitter, StakiedError::PoolNotInitialized) => 209,
            _ => module.base() + self.offset(),
        }
    }

    /// Inverse of [`StakiedError::code`].
    pub fn from_code(code: u32) -> Option<(Module, Self)> {
        const ALL: [StakiedError; 9] = [
            StakiedError::Unauthorized,
            StakiedError::InvalidAmount,
            StakiedError::InsufficientBalance,
            StakiedError::InsufficientLiquidity,
            StakiedError::SlippageExceeded,
            StakiedError::PoolNotInitialized,
            StakiedError::PoolAlreadyExists,
            StakiedError::MaturityNotReached,
            StakiedError::InvalidMaturity,
        ];
        [Module::SyVault, Module::Splitter, Module::Pool]
            .into_iter()
            .flat_map(|module| ALL.into_iter().map(move |err| (module, err)))
            .find(|(module, err)| err.code(*module) == code)
    }
}
