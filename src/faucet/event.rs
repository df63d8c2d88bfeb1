use serde::Serialize;

use crate::wallet::Address;

/// Observable outcome of a successful faucet operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum FaucetEvent {
    TokensClaimed {
        account: Address,
        amount: u128,
    },
    /// Emitted before `TokensClaimed` when the faucet pays half a drip.
    DripAdjusted {
        new_payout: u128,
    },
    DonationReceived {
        account: Address,
        amount: u128,
    },
    ConfigUpdated {
        drip_amount: u128,
        cooldown_time: u64,
        min_balance: u128,
    },
    Paused {
        paused: bool,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

impl FaucetEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FaucetEvent::TokensClaimed { .. } => "TokensClaimed",
            FaucetEvent::DripAdjusted { .. } => "DripAdjusted",
            FaucetEvent::DonationReceived { .. } => "DonationReceived",
            FaucetEvent::ConfigUpdated { .. } => "ConfigUpdated",
            FaucetEvent::Paused { .. } => "Paused",
            FaucetEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}
