use serde::{Deserialize, Serialize};

use super::error::{FaucetError, TransferError};
use super::event::FaucetEvent;
use super::ledger::ClaimLedger;
use super::transfer::Transfers;
use crate::wallet::Address;

/// Who is calling and when. Supplied by the host for every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    /// Unix seconds, read once per operation.
    pub now: u64,
}

impl CallContext {
    pub fn new(caller: Address, now: u64) -> Self {
        Self { caller, now }
    }
}

/// Payout policy, replaced as a whole by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DripConfig {
    /// Base payout per claim, in smallest units.
    pub drip_amount: u128,
    /// Seconds an account waits between two claims.
    pub cooldown_time: u64,
    /// Held balance under which only half a drip is paid.
    pub min_balance: u128,
}

impl Default for DripConfig {
    fn default() -> Self {
        use super::{DEFAULT_COOLDOWN_SECS, DEFAULT_DRIP_AMOUNT, DEFAULT_MIN_BALANCE};
        Self {
            drip_amount: DEFAULT_DRIP_AMOUNT,
            cooldown_time: DEFAULT_COOLDOWN_SECS,
            min_balance: DEFAULT_MIN_BALANCE,
        }
    }
}

/// The faucet state machine: configuration, owner, pause flag, claim ledger and held funds.
///
/// Every operation checks everything that can fail before it touches state,
/// so an `Err` always leaves the faucet exactly as it was.
#[derive(Debug)]
pub struct Faucet {
    config: DripConfig,
    owner: Address,
    paused: bool,
    ledger: ClaimLedger,
    balance: u128,
}

impl Faucet {
    /// Deploy a new faucet. The deployer becomes the owner; funds arrive separately.
    pub fn new(deployer: Address, config: DripConfig) -> Self {
        Self {
            config,
            owner: deployer,
            paused: false,
            ledger: ClaimLedger::new(),
            balance: 0,
        }
    }

    pub fn config(&self) -> DripConfig {
        self.config
    }

    pub fn drip_amount(&self) -> u128 {
        self.config.drip_amount
    }

    pub fn cooldown_time(&self) -> u64 {
        self.config.cooldown_time
    }

    pub fn min_balance(&self) -> u128 {
        self.config.min_balance
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn balance(&self) -> u128 {
        self.balance
    }

    pub fn last_claim(&self, account: &Address) -> Option<u64> {
        self.ledger.last_claim(account)
    }

    /// Earliest time at which `account` clears the cooldown, if it ever claimed.
    pub fn next_claim_at(&self, account: &Address) -> Option<u64> {
        self.ledger
            .last_claim(account)
            .map(|last| last.saturating_add(self.config.cooldown_time))
    }

    pub fn claimants(&self) -> usize {
        self.ledger.len()
    }

    /// Payout for a claim made while the faucet holds `balance`.
    /// Strictly below `min_balance` the drip is halved (floor).
    pub fn payout_for(&self, balance: u128) -> u128 {
        if balance < self.config.min_balance {
            self.config.drip_amount / 2
        } else {
            self.config.drip_amount
        }
    }

    /// Pay a drip to the caller.
    ///
    /// Checks, in order: pause flag, caller cooldown, empty faucet. The payout
    /// is not clamped to the held balance: if it exceeds what the faucet holds
    /// the claim fails with `TransferFailed`.
    pub fn claim<T: Transfers + ?Sized>(
        &mut self,
        ctx: &CallContext,
        transfers: &mut T,
    ) -> Result<Vec<FaucetEvent>, FaucetError> {
        if self.paused {
            return Err(FaucetError::Paused);
        }

        if let Some(last) = self.ledger.last_claim(&ctx.caller) {
            let elapsed = ctx.now.saturating_sub(last);
            if elapsed < self.config.cooldown_time {
                return Err(FaucetError::CooldownActive {
                    retry_after: self.config.cooldown_time - elapsed,
                });
            }
        }

        if self.balance == 0 {
            return Err(FaucetError::InsufficientFunds);
        }

        let payout = self.payout_for(self.balance);
        let mut events = Vec::with_capacity(2);
        if self.balance < self.config.min_balance {
            events.push(FaucetEvent::DripAdjusted { new_payout: payout });
        }

        let remaining = self
            .balance
            .checked_sub(payout)
            .ok_or(TransferError::InsufficientBalance {
                needed: payout,
                available: self.balance,
            })?;
        transfers.pay(&ctx.caller, payout)?;

        self.balance = remaining;
        self.ledger.record(ctx.caller, ctx.now);
        events.push(FaucetEvent::TokensClaimed {
            account: ctx.caller,
            amount: payout,
        });
        Ok(events)
    }

    /// Accept a donation from the caller.
    pub fn donate<T: Transfers + ?Sized>(
        &mut self,
        ctx: &CallContext,
        amount: u128,
        transfers: &mut T,
    ) -> Result<Vec<FaucetEvent>, FaucetError> {
        self.take_in(ctx, amount, transfers)?;
        Ok(vec![FaucetEvent::DonationReceived {
            account: ctx.caller,
            amount,
        }])
    }

    /// Plain inbound transfer: funds the faucet without emitting anything.
    pub fn receive<T: Transfers + ?Sized>(
        &mut self,
        ctx: &CallContext,
        amount: u128,
        transfers: &mut T,
    ) -> Result<Vec<FaucetEvent>, FaucetError> {
        self.take_in(ctx, amount, transfers)?;
        Ok(Vec::new())
    }

    fn take_in<T: Transfers + ?Sized>(
        &mut self,
        ctx: &CallContext,
        amount: u128,
        transfers: &mut T,
    ) -> Result<(), FaucetError> {
        let new_balance = self
            .balance
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        transfers.collect(&ctx.caller, amount)?;
        self.balance = new_balance;
        Ok(())
    }

    /// Replace the whole payout policy. No bounds are enforced on the new values.
    pub fn update_config(
        &mut self,
        ctx: &CallContext,
        config: DripConfig,
    ) -> Result<Vec<FaucetEvent>, FaucetError> {
        self.only_owner(ctx)?;
        self.config = config;
        Ok(vec![FaucetEvent::ConfigUpdated {
            drip_amount: config.drip_amount,
            cooldown_time: config.cooldown_time,
            min_balance: config.min_balance,
        }])
    }

    /// Set the pause flag. Setting the current value again still emits `Paused`.
    pub fn set_paused(
        &mut self,
        ctx: &CallContext,
        paused: bool,
    ) -> Result<Vec<FaucetEvent>, FaucetError> {
        self.only_owner(ctx)?;
        self.paused = paused;
        Ok(vec![FaucetEvent::Paused { paused }])
    }

    /// Hand ownership to `new_owner`. The null address is accepted.
    pub fn transfer_ownership(
        &mut self,
        ctx: &CallContext,
        new_owner: Address,
    ) -> Result<Vec<FaucetEvent>, FaucetError> {
        self.only_owner(ctx)?;
        let previous_owner = self.owner;
        self.owner = new_owner;
        Ok(vec![FaucetEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        }])
    }

    fn only_owner(&self, ctx: &CallContext) -> Result<(), FaucetError> {
        if ctx.caller != self.owner {
            return Err(FaucetError::NotOwner);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::parse_ether;

    /// Records payouts; refuses them when `reject` is set.
    #[derive(Default)]
    struct Host {
        paid: Vec<(Address, u128)>,
        collected: Vec<(Address, u128)>,
        reject: bool,
    }

    impl Transfers for Host {
        fn pay(&mut self, to: &Address, amount: u128) -> Result<(), TransferError> {
            if self.reject {
                return Err(TransferError::Rejected("recipient refuses funds".into()));
            }
            self.paid.push((*to, amount));
            Ok(())
        }

        fn collect(&mut self, from: &Address, amount: u128) -> Result<(), TransferError> {
            self.collected.push((*from, amount));
            Ok(())
        }
    }

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 33];
        bytes[0] = 0x02;
        bytes[32] = n;
        Address::from_bytes(bytes)
    }

    fn eth(s: &str) -> u128 {
        parse_ether(s).unwrap()
    }

    const T0: u64 = 1_700_000_000;

    fn owner() -> Address {
        addr(1)
    }
    fn user1() -> Address {
        addr(2)
    }
    fn user2() -> Address {
        addr(3)
    }

    /// drip=0.1, cooldown=60, minBalance=1.0, funded with `funds`.
    fn deploy(funds: &str) -> (Faucet, Host) {
        let mut faucet = Faucet::new(
            owner(),
            DripConfig {
                drip_amount: eth("0.1"),
                cooldown_time: 60,
                min_balance: eth("1"),
            },
        );
        let mut host = Host::default();
        let amount = eth(funds);
        if amount > 0 {
            let events = faucet
                .receive(&CallContext::new(owner(), T0), amount, &mut host)
                .unwrap();
            assert!(events.is_empty());
        }
        (faucet, host)
    }

    #[test]
    fn deploys_with_configuration_and_deployer_as_owner() {
        let (faucet, _) = deploy("5");
        assert_eq!(faucet.drip_amount(), eth("0.1"));
        assert_eq!(faucet.cooldown_time(), 60);
        assert_eq!(faucet.min_balance(), eth("1"));
        assert_eq!(faucet.owner(), owner());
        assert!(!faucet.is_paused());
        assert_eq!(faucet.balance(), eth("5"));
    }

    #[test]
    fn first_claim_pays_full_drip() {
        let (mut faucet, mut host) = deploy("5");
        let events = faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();
        assert_eq!(
            events,
            vec![FaucetEvent::TokensClaimed {
                account: user1(),
                amount: eth("0.1"),
            }]
        );
        assert_eq!(host.paid, vec![(user1(), eth("0.1"))]);
        assert_eq!(faucet.balance(), eth("4.9"));
        assert_eq!(faucet.last_claim(&user1()), Some(T0));
        assert_eq!(faucet.next_claim_at(&user1()), Some(T0 + 60));
    }

    #[test]
    fn second_claim_within_cooldown_is_rejected() {
        let (mut faucet, mut host) = deploy("5");
        faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();

        let err = faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap_err();
        assert_eq!(err, FaucetError::CooldownActive { retry_after: 60 });

        let err = faucet
            .claim(&CallContext::new(user1(), T0 + 59), &mut host)
            .unwrap_err();
        assert_eq!(err, FaucetError::CooldownActive { retry_after: 1 });
        assert_eq!(faucet.balance(), eth("4.9"));
    }

    #[test]
    fn claim_allowed_exactly_at_cooldown_boundary() {
        let (mut faucet, mut host) = deploy("5");
        faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();
        faucet
            .claim(&CallContext::new(user1(), T0 + 60), &mut host)
            .unwrap();
        assert_eq!(faucet.last_claim(&user1()), Some(T0 + 60));
        assert_eq!(host.paid.len(), 2);
    }

    #[test]
    fn cooldown_is_per_account() {
        let (mut faucet, mut host) = deploy("5");
        faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();
        faucet
            .claim(&CallContext::new(user2(), T0), &mut host)
            .unwrap();
        assert_eq!(faucet.claimants(), 2);
    }

    #[test]
    fn below_min_balance_pays_half_drip_and_announces_it_first() {
        let (mut faucet, mut host) = deploy("0.999999999999999999");
        let events = faucet
            .claim(&CallContext::new(user2(), T0), &mut host)
            .unwrap();
        assert_eq!(
            events,
            vec![
                FaucetEvent::DripAdjusted {
                    new_payout: eth("0.05"),
                },
                FaucetEvent::TokensClaimed {
                    account: user2(),
                    amount: eth("0.05"),
                },
            ]
        );
        assert_eq!(host.paid, vec![(user2(), eth("0.05"))]);
    }

    #[test]
    fn balance_equal_to_min_balance_pays_full_drip() {
        let (mut faucet, mut host) = deploy("1");
        let events = faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            FaucetEvent::TokensClaimed { amount, .. } if amount == eth("0.1")
        ));
    }

    #[test]
    fn odd_drip_is_floored_when_halved() {
        let mut faucet = Faucet::new(
            owner(),
            DripConfig {
                drip_amount: 7,
                cooldown_time: 0,
                min_balance: 1_000,
            },
        );
        let mut host = Host::default();
        faucet
            .receive(&CallContext::new(owner(), T0), 100, &mut host)
            .unwrap();
        assert_eq!(faucet.payout_for(100), 3);
        faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();
        assert_eq!(faucet.balance(), 97);
    }

    #[test]
    fn empty_faucet_is_dry() {
        let (mut faucet, mut host) = deploy("0");
        let err = faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap_err();
        assert_eq!(err, FaucetError::InsufficientFunds);
        assert_eq!(err.to_string(), "Faucet dry, donate!");
        assert_eq!(faucet.last_claim(&user1()), None);
    }

    #[test]
    fn payout_above_held_balance_fails_and_rolls_back() {
        let (mut faucet, mut host) = deploy("0.000000000000000001");
        let err = faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap_err();
        assert_eq!(
            err,
            FaucetError::TransferFailed(TransferError::InsufficientBalance {
                needed: eth("0.05"),
                available: 1,
            })
        );
        assert_eq!(faucet.balance(), 1);
        assert_eq!(faucet.last_claim(&user1()), None);
        assert!(host.paid.is_empty());
    }

    #[test]
    fn rejected_payout_leaves_no_ledger_entry() {
        let (mut faucet, mut host) = deploy("5");
        host.reject = true;
        let err = faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap_err();
        assert!(matches!(
            err,
            FaucetError::TransferFailed(TransferError::Rejected(_))
        ));
        assert_eq!(faucet.last_claim(&user1()), None);
        assert_eq!(faucet.balance(), eth("5"));

        // a later claim is not blocked by the failed one
        host.reject = false;
        faucet
            .claim(&CallContext::new(user1(), T0 + 1), &mut host)
            .unwrap();
    }

    #[test]
    fn pause_blocks_claims_until_lifted() {
        let (mut faucet, mut host) = deploy("5");
        let ctx = CallContext::new(owner(), T0);

        assert_eq!(
            faucet.set_paused(&ctx, true).unwrap(),
            vec![FaucetEvent::Paused { paused: true }]
        );
        let err = faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap_err();
        assert_eq!(err, FaucetError::Paused);

        assert_eq!(
            faucet.set_paused(&ctx, false).unwrap(),
            vec![FaucetEvent::Paused { paused: false }]
        );
        faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();
    }

    #[test]
    fn pause_is_checked_before_cooldown_and_funds() {
        let (mut faucet, mut host) = deploy("0");
        faucet
            .set_paused(&CallContext::new(owner(), T0), true)
            .unwrap();
        let err = faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap_err();
        assert_eq!(err, FaucetError::Paused);
    }

    #[test]
    fn pause_does_not_gate_donations_or_config() {
        let (mut faucet, mut host) = deploy("5");
        let ctx = CallContext::new(owner(), T0);
        faucet.set_paused(&ctx, true).unwrap();
        faucet
            .donate(&CallContext::new(user1(), T0), eth("1"), &mut host)
            .unwrap();
        faucet.update_config(&ctx, DripConfig::default()).unwrap();
        assert_eq!(faucet.balance(), eth("6"));
    }

    #[test]
    fn set_paused_is_idempotent() {
        let (mut faucet, _) = deploy("5");
        let ctx = CallContext::new(owner(), T0);
        faucet.set_paused(&ctx, true).unwrap();
        assert_eq!(
            faucet.set_paused(&ctx, true).unwrap(),
            vec![FaucetEvent::Paused { paused: true }]
        );
        assert!(faucet.is_paused());
    }

    #[test]
    fn owner_only_operations_reject_strangers() {
        let (mut faucet, _) = deploy("5");
        let ctx = CallContext::new(user1(), T0);
        assert_eq!(
            faucet.update_config(
                &ctx,
                DripConfig {
                    drip_amount: 1,
                    cooldown_time: 1,
                    min_balance: 1,
                }
            ),
            Err(FaucetError::NotOwner)
        );
        assert_eq!(faucet.set_paused(&ctx, true), Err(FaucetError::NotOwner));
        assert_eq!(
            faucet.transfer_ownership(&ctx, user1()),
            Err(FaucetError::NotOwner)
        );
        assert_eq!(faucet.config(), deploy("0").0.config());
        assert!(!faucet.is_paused());
        assert_eq!(faucet.owner(), owner());
    }

    #[test]
    fn update_config_replaces_all_three_values() {
        let (mut faucet, _) = deploy("5");
        let new = DripConfig {
            drip_amount: eth("0.2"),
            cooldown_time: 120,
            min_balance: eth("2"),
        };
        let events = faucet
            .update_config(&CallContext::new(owner(), T0), new)
            .unwrap();
        assert_eq!(
            events,
            vec![FaucetEvent::ConfigUpdated {
                drip_amount: eth("0.2"),
                cooldown_time: 120,
                min_balance: eth("2"),
            }]
        );
        assert_eq!(faucet.drip_amount(), eth("0.2"));
        assert_eq!(faucet.cooldown_time(), 120);
        assert_eq!(faucet.min_balance(), eth("2"));
    }

    #[test]
    fn update_config_accepts_zero_values() {
        let (mut faucet, mut host) = deploy("5");
        let zero = DripConfig {
            drip_amount: 0,
            cooldown_time: 0,
            min_balance: 0,
        };
        faucet
            .update_config(&CallContext::new(owner(), T0), zero)
            .unwrap();
        assert_eq!(faucet.config(), zero);

        let events = faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();
        assert_eq!(
            events,
            vec![FaucetEvent::TokensClaimed {
                account: user1(),
                amount: 0,
            }]
        );
        assert_eq!(faucet.balance(), eth("5"));
    }

    #[test]
    fn new_cooldown_applies_to_existing_entries() {
        let (mut faucet, mut host) = deploy("5");
        faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();
        let mut cfg = faucet.config();
        cfg.cooldown_time = 10;
        faucet
            .update_config(&CallContext::new(owner(), T0), cfg)
            .unwrap();
        faucet
            .claim(&CallContext::new(user1(), T0 + 10), &mut host)
            .unwrap();
    }

    #[test]
    fn ownership_transfer_moves_privileges() {
        let (mut faucet, _) = deploy("5");
        let events = faucet
            .transfer_ownership(&CallContext::new(owner(), T0), user2())
            .unwrap();
        assert_eq!(
            events,
            vec![FaucetEvent::OwnershipTransferred {
                previous_owner: owner(),
                new_owner: user2(),
            }]
        );
        assert_eq!(faucet.owner(), user2());

        let old = CallContext::new(owner(), T0);
        assert_eq!(faucet.set_paused(&old, true), Err(FaucetError::NotOwner));
        assert_eq!(
            faucet.update_config(&old, DripConfig::default()),
            Err(FaucetError::NotOwner)
        );

        let new = CallContext::new(user2(), T0);
        faucet.set_paused(&new, true).unwrap();
        faucet.update_config(&new, DripConfig::default()).unwrap();
        assert!(faucet.is_paused());
    }

    #[test]
    fn ownership_may_go_to_null_address() {
        let (mut faucet, _) = deploy("5");
        faucet
            .transfer_ownership(&CallContext::new(owner(), T0), Address::ZERO)
            .unwrap();
        assert_eq!(faucet.owner(), Address::ZERO);
        assert_eq!(
            faucet.set_paused(&CallContext::new(owner(), T0), true),
            Err(FaucetError::NotOwner)
        );
    }

    #[test]
    fn donation_increases_balance_and_is_announced() {
        let (mut faucet, mut host) = deploy("5");
        let events = faucet
            .donate(&CallContext::new(user1(), T0), eth("1"), &mut host)
            .unwrap();
        assert_eq!(
            events,
            vec![FaucetEvent::DonationReceived {
                account: user1(),
                amount: eth("1"),
            }]
        );
        assert_eq!(faucet.balance(), eth("6"));
        assert_eq!(host.collected.last(), Some(&(user1(), eth("1"))));
    }

    #[test]
    fn zero_donation_still_emits() {
        let (mut faucet, mut host) = deploy("5");
        let events = faucet
            .donate(&CallContext::new(user1(), T0), 0, &mut host)
            .unwrap();
        assert_eq!(
            events,
            vec![FaucetEvent::DonationReceived {
                account: user1(),
                amount: 0,
            }]
        );
        assert_eq!(faucet.balance(), eth("5"));
    }

    #[test]
    fn donation_overflow_is_a_failed_transfer() {
        let (mut faucet, mut host) = deploy("5");
        let err = faucet
            .donate(&CallContext::new(user1(), T0), u128::MAX, &mut host)
            .unwrap_err();
        assert_eq!(err, FaucetError::TransferFailed(TransferError::Overflow));
        assert_eq!(faucet.balance(), eth("5"));
        assert_eq!(host.collected.len(), 1); // only the initial funding
    }

    #[test]
    fn draining_to_zero_then_refunding() {
        let mut faucet = Faucet::new(
            owner(),
            DripConfig {
                drip_amount: 10,
                cooldown_time: 0,
                min_balance: 0,
            },
        );
        let mut host = Host::default();
        faucet
            .receive(&CallContext::new(owner(), T0), 20, &mut host)
            .unwrap();
        faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();
        faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();
        assert_eq!(faucet.balance(), 0);
        assert_eq!(
            faucet.claim(&CallContext::new(user1(), T0), &mut host),
            Err(FaucetError::InsufficientFunds)
        );
        faucet
            .donate(&CallContext::new(user2(), T0), 10, &mut host)
            .unwrap();
        faucet
            .claim(&CallContext::new(user1(), T0), &mut host)
            .unwrap();
    }
}
