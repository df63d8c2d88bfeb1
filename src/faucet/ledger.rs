use std::collections::HashMap;

use crate::wallet::Address;

/// Last successful claim time (unix seconds) per account.
/// Entries are created on an account's first claim and never removed.
#[derive(Debug, Default)]
pub struct ClaimLedger {
    map: HashMap<Address, u64>,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn last_claim(&self, account: &Address) -> Option<u64> {
        self.map.get(account).copied()
    }

    /// Record a claim at `now`. The stored time never moves backwards.
    pub fn record(&mut self, account: Address, now: u64) {
        let entry = self.map.entry(account).or_insert(now);
        *entry = (*entry).max(now);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
