use log::{info, warn};
use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

use super::auth::{ReplayGuard, Signed};
use super::error::ApiError;
use crate::accounts::Accounts;
use crate::clock::Clock;
use crate::faucet::{CallContext, DripConfig, Faucet, FaucetError, FaucetEvent};
use crate::units::format_ether;
use crate::wallet::Address;

/// Oldest entries are dropped once the event log reaches this size.
pub const MAX_EVENT_LOG: usize = 10_000;

/// One emitted event as kept in the host's log.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub receipt_id: String,
    pub timestamp: u64,
    pub event: FaucetEvent,
}

/// Result of a successful state-changing request.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub receipt_id: String,
    pub timestamp: u64,
    pub events: Vec<FaucetEvent>,
}

/// Everything the faucet runs against: its own state, requester funds,
/// time, replay memory and the event log. Kept behind one mutex so every
/// operation runs alone.
#[derive(Debug)]
pub struct Runtime {
    pub faucet: Faucet,
    pub accounts: Accounts,
    pub clock: Clock,
    pub replay: ReplayGuard,
    pub events: VecDeque<EventRecord>,
}

impl Runtime {
    /// Deploy the faucet with `deployer` as owner, then move `initial_funds`
    /// (minted to the deployer first) into it.
    pub fn deploy(
        deployer: Address,
        config: DripConfig,
        initial_funds: u128,
    ) -> Result<Self, FaucetError> {
        let mut rt = Self {
            faucet: Faucet::new(deployer, config),
            accounts: Accounts::new(),
            clock: Clock::new(),
            replay: ReplayGuard::new(),
            events: VecDeque::new(),
        };
        if initial_funds > 0 {
            let ctx = CallContext::new(deployer, rt.clock.now());
            rt.accounts.mint(deployer, initial_funds)?;
            rt.faucet.receive(&ctx, initial_funds, &mut rt.accounts)?;
        }
        info!(
            "faucet deployed: owner={} drip={} cooldown={}s min_balance={} balance={}",
            deployer,
            format_ether(config.drip_amount),
            config.cooldown_time,
            format_ether(config.min_balance),
            format_ether(rt.faucet.balance()),
        );
        Ok(rt)
    }

    /// Authorize `call`, run `op` against the faucet at a single clock reading,
    /// and log its events. The envelope is spent only when `op` succeeds.
    pub fn execute<T, F>(
        &mut self,
        action: &'static str,
        call: &Signed<T>,
        ttl_secs: u64,
        op: F,
    ) -> Result<Receipt, ApiError>
    where
        T: Serialize,
        F: FnOnce(
            &mut Faucet,
            &mut Accounts,
            &CallContext,
            &T,
        ) -> Result<Vec<FaucetEvent>, FaucetError>,
    {
        let now = self.clock.now();
        let auth = call
            .authorize(action, now, ttl_secs, &self.replay)
            .inspect_err(|e| warn!("{action}: rejected request: {e}"))?;
        let caller = auth.caller;
        let ctx = CallContext::new(caller, now);

        match op(&mut self.faucet, &mut self.accounts, &ctx, &call.body) {
            Ok(events) => {
                self.replay.admit(&auth, now, ttl_secs);
                Ok(self.record(now, events))
            }
            Err(e) => {
                warn!("{action} by {caller} failed: {e}");
                Err(e.into())
            }
        }
    }

    fn record(&mut self, now: u64, events: Vec<FaucetEvent>) -> Receipt {
        let receipt_id = Uuid::new_v4().to_string();
        for event in &events {
            info!("[{}] {}: {:?}", receipt_id, event.name(), event);
            if self.events.len() >= MAX_EVENT_LOG {
                self.events.pop_front();
            }
            self.events.push_back(EventRecord {
                receipt_id: receipt_id.clone(),
                timestamp: now,
                event: event.clone(),
            });
        }
        Receipt {
            receipt_id,
            timestamp: now,
            events,
        }
    }
}
