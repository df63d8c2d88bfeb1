use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use super::runtime::{EventRecord, Runtime};
use crate::wallet::Address;

/// Shared application state: the faucet runtime plus host policy.
pub struct AppState {
    pub runtime: Mutex<Runtime>,
    /// Accepted distance between a request's `issued_at` and the host clock.
    pub signature_ttl_secs: u64,
    pub dev_mint: bool,
}

impl AppState {
    pub fn new(runtime: Runtime, signature_ttl_secs: u64, dev_mint: bool) -> Self {
        Self {
            runtime: Mutex::new(runtime),
            signature_ttl_secs,
            dev_mint,
        }
    }
}

/* ---------- Faucet API Models ---------- */

/// Claims carry no parameters; the body is an empty object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountRequest {
    pub amount: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseRequest {
    pub paused: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerRequest {
    pub new_owner: Address,
}

#[derive(Serialize)]
pub struct FaucetStatusResponse {
    pub owner: Address,
    pub paused: bool,
    pub drip_amount: u128,
    pub cooldown_time: u64,
    pub min_balance: u128,
    pub balance: u128,
    /// What a claim would pay right now.
    pub current_payout: u128,
    pub claimants: usize,
}

#[derive(Serialize)]
pub struct ClaimStatusResponse {
    pub address: Address,
    pub last_claim: Option<u64>,
    pub next_claim_at: Option<u64>,
    pub cooldown_remaining: u64,
    pub now: u64,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub size: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Deserialize)]
pub struct EventsQuery {
    pub limit: Option<usize>,
}

/* ---------- Accounts API Models (dev) ---------- */

#[derive(Deserialize)]
pub struct MintRequest {
    pub address: Address,
    pub amount: u128,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: Address,
    pub balance: u128,
}
