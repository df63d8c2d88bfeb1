pub mod error;
pub mod event;
pub mod ledger;
pub mod model;
pub mod transfer;

pub use error::{FaucetError, TransferError};
pub use event::FaucetEvent;
pub use ledger::ClaimLedger;
pub use model::{CallContext, DripConfig, Faucet};
pub use transfer::Transfers;

/// Default payout per claim: 0.01 native units.
pub const DEFAULT_DRIP_AMOUNT: u128 = 10_000_000_000_000_000;

/// Default wait between two claims of the same account (1 hour).
pub const DEFAULT_COOLDOWN_SECS: u64 = 3_600;

/// Below this held balance the faucet pays half a drip: 0.5 native units.
pub const DEFAULT_MIN_BALANCE: u128 = 500_000_000_000_000_000;
