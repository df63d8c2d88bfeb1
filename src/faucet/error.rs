use thiserror::Error;

/// Why moving funds in or out of the faucet did not happen.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("payout of {needed} exceeds held balance of {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("balance overflow")]
    Overflow,

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Rejections of a faucet operation. A rejected operation leaves no trace on the faucet state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FaucetError {
    #[error("Not owner")]
    NotOwner,

    #[error("Paused")]
    Paused,

    /// `retry_after` is the number of seconds until the account may claim again.
    #[error("Wait before claiming again")]
    CooldownActive { retry_after: u64 },

    #[error("Faucet dry, donate!")]
    InsufficientFunds,

    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
}

impl FaucetError {
    /// Stable machine-readable code, used by the HTTP layer.
    pub fn code(&self) -> &'static str {
        match self {
            FaucetError::NotOwner => "NOT_OWNER",
            FaucetError::Paused => "PAUSED",
            FaucetError::CooldownActive { .. } => "COOLDOWN_ACTIVE",
            FaucetError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            FaucetError::TransferFailed(_) => "TRANSFER_FAILED",
        }
    }
}
