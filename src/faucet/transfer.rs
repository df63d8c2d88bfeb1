use super::error::TransferError;
use crate::wallet::Address;

/// Funds movement between the faucet and the outside world.
///
/// Implementations must be all-or-nothing: on `Err` nothing moved.
pub trait Transfers {
    /// Send `amount` from the faucet to `to`.
    fn pay(&mut self, to: &Address, amount: u128) -> Result<(), TransferError>;

    /// Take `amount` from `from` into the faucet.
    fn collect(&mut self, from: &Address, amount: u128) -> Result<(), TransferError>;
}
