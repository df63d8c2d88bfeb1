use std::collections::HashMap;

use crate::faucet::{TransferError, Transfers};
use crate::wallet::Address;

/// Native balances of the accounts that talk to the faucet.
/// The faucet's own funds are not tracked here.
#[derive(Debug, Default)]
pub struct Accounts {
    map: HashMap<Address, u128>,
}

impl Accounts {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.map.get(account).copied().unwrap_or(0)
    }

    /// Credit `amount` to `account` out of thin air (dev funding).
    pub fn mint(&mut self, account: Address, amount: u128) -> Result<u128, TransferError> {
        let new_balance = self
            .balance_of(&account)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        self.map.insert(account, new_balance);
        Ok(new_balance)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Transfers for Accounts {
    fn pay(&mut self, to: &Address, amount: u128) -> Result<(), TransferError> {
        self.mint(*to, amount).map(|_| ())
    }

    fn collect(&mut self, from: &Address, amount: u128) -> Result<(), TransferError> {
        let available = self.balance_of(from);
        let remaining = available.checked_sub(amount).ok_or_else(|| {
            TransferError::Rejected(format!(
                "sender holds {available}, cannot send {amount}"
            ))
        })?;
        if remaining == 0 {
            self.map.remove(from);
        } else {
            self.map.insert(*from, remaining);
        }
        Ok(())
    }
}
