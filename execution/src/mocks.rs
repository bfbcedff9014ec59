use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    Signer,
};
use commonware_math::algebra::Random;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};

use crate::{Ledger, LedgerError, RandomnessAdapter, RequestId};

/// Creates an account keypair for Ed25519 signatures used by players and operators
pub fn create_account_keypair(seed: u64) -> (PrivateKey, PublicKey) {
    let mut rng = StdRng::seed_from_u64(seed);
    let private = PrivateKey::random(&mut rng);
    let public = private.public_key();
    (private, public)
}

/// In-memory token ledger: account balances plus the engine's custody.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    balances: BTreeMap<PublicKey, u64>,
    custody: u64,
    frozen: BTreeSet<PublicKey>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `account` out of thin air.
    pub fn fund(&mut self, account: &PublicKey, amount: u64) {
        *self.balances.entry(account.clone()).or_default() += amount;
    }

    pub fn balance(&self, account: &PublicKey) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Amount held on behalf of the engine.
    pub fn custody(&self) -> u64 {
        self.custody
    }

    /// Sum of every balance plus custody.
    pub fn supply(&self) -> u128 {
        self.balances.values().map(|balance| *balance as u128).sum::<u128>() + self.custody as u128
    }

    /// Reject every transfer touching `account` until [`MemoryLedger::unfreeze`].
    pub fn freeze(&mut self, account: &PublicKey) {
        self.frozen.insert(account.clone());
    }

    pub fn unfreeze(&mut self, account: &PublicKey) {
        self.frozen.remove(account);
    }

    fn ensure_not_frozen(&self, account: &PublicKey) -> Result<(), LedgerError> {
        if self.frozen.contains(account) {
            return Err(LedgerError::Rejected(format!("account {account} is frozen")));
        }
        Ok(())
    }
}

impl Ledger for MemoryLedger {
    fn transfer_in(&mut self, payer: &PublicKey, amount: u64) -> Result<(), LedgerError> {
        self.ensure_not_frozen(payer)?;
        let available = self.balance(payer);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.balances.insert(payer.clone(), available - amount);
        self.custody += amount;
        Ok(())
    }

    fn transfer_out(&mut self, payee: &PublicKey, amount: u64) -> Result<(), LedgerError> {
        self.ensure_not_frozen(payee)?;
        if self.custody < amount {
            return Err(LedgerError::InsufficientCustody {
                needed: amount,
                available: self.custody,
            });
        }
        self.custody -= amount;
        *self.balances.entry(payee.clone()).or_default() += amount;
        Ok(())
    }
}

/// Oracle answering every request with the same raw value.
///
/// In auto mode requests are fulfilled as soon as they are issued; in manual mode they wait
/// for [`FixedRandomness::fulfill_all`].
#[derive(Clone, Debug)]
pub struct FixedRandomness {
    value: u64,
    auto_fulfill: bool,
    next_request: RequestId,
    requests: BTreeMap<RequestId, Option<u64>>,
}

impl FixedRandomness {
    pub fn new(value: u64) -> Self {
        Self {
            value,
            auto_fulfill: true,
            next_request: 1,
            requests: BTreeMap::new(),
        }
    }

    pub fn manual(value: u64) -> Self {
        Self {
            auto_fulfill: false,
            ..Self::new(value)
        }
    }

    /// Value used for requests fulfilled from now on.
    pub fn set_value(&mut self, value: u64) {
        self.value = value;
    }

    pub fn fulfill_all(&mut self) {
        for result in self.requests.values_mut() {
            result.get_or_insert(self.value);
        }
    }
}

impl RandomnessAdapter for FixedRandomness {
    fn request(&mut self) -> RequestId {
        let request = self.next_request;
        self.next_request += 1;
        let result = self.auto_fulfill.then_some(self.value);
        self.requests.insert(request, result);
        request
    }

    fn is_fulfilled(&self, request: RequestId) -> bool {
        self.result(request).is_some()
    }

    fn result(&self, request: RequestId) -> Option<u64> {
        self.requests.get(&request).copied().flatten()
    }
}

/// Deterministic VRF stand-in: request `n` resolves to `12345 * n % 10000 + 10000`.
#[derive(Clone, Debug)]
pub struct SequentialRandomness {
    next_request: RequestId,
}

impl SequentialRandomness {
    pub fn new() -> Self {
        Self { next_request: 1 }
    }

    pub fn value_for(request: RequestId) -> u64 {
        12_345 * request % 10_000 + 10_000
    }
}

impl Default for SequentialRandomness {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomnessAdapter for SequentialRandomness {
    fn request(&mut self) -> RequestId {
        let request = self.next_request;
        self.next_request += 1;
        request
    }

    fn is_fulfilled(&self, request: RequestId) -> bool {
        request > 0 && request < self.next_request
    }

    fn result(&self, request: RequestId) -> Option<u64> {
        self.is_fulfilled(request)
            .then(|| Self::value_for(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_ledger_moves_funds_through_custody() {
        let (_, alice) = create_account_keypair(1);
        let (_, bob) = create_account_keypair(2);
        let mut ledger = MemoryLedger::new();
        ledger.fund(&alice, 100);

        ledger.transfer_in(&alice, 60).unwrap();
        assert_eq!(ledger.balance(&alice), 40);
        assert_eq!(ledger.custody(), 60);

        ledger.transfer_out(&bob, 25).unwrap();
        assert_eq!(ledger.balance(&bob), 25);
        assert_eq!(ledger.custody(), 35);
        assert_eq!(ledger.supply(), 100);
    }

    #[test]
    fn memory_ledger_failures_leave_balances_untouched() {
        let (_, alice) = create_account_keypair(1);
        let mut ledger = MemoryLedger::new();
        ledger.fund(&alice, 10);

        assert_eq!(
            ledger.transfer_in(&alice, 11),
            Err(LedgerError::InsufficientBalance {
                needed: 11,
                available: 10
            })
        );
        assert_eq!(
            ledger.transfer_out(&alice, 1),
            Err(LedgerError::InsufficientCustody {
                needed: 1,
                available: 0
            })
        );

        ledger.freeze(&alice);
        assert!(matches!(
            ledger.transfer_in(&alice, 1),
            Err(LedgerError::Rejected(_))
        ));
        ledger.unfreeze(&alice);
        assert!(ledger.transfer_in(&alice, 1).is_ok());
        assert_eq!(ledger.balance(&alice), 9);
    }

    #[test]
    fn fixed_randomness_manual_mode_waits_for_fulfillment() {
        let mut oracle = FixedRandomness::manual(11_975);
        let request = oracle.request();
        assert!(!oracle.is_fulfilled(request));
        oracle.fulfill_all();
        assert_eq!(oracle.result(request), Some(11_975));

        oracle.set_value(12_000);
        assert_eq!(oracle.result(request), Some(11_975));
    }

    #[test]
    fn sequential_randomness_follows_formula() {
        let mut oracle = SequentialRandomness::new();
        assert_eq!(oracle.result(1), None);
        let first = oracle.request();
        let second = oracle.request();
        assert_eq!(oracle.result(first), Some(12_345));
        assert_eq!(oracle.result(second), Some(14_690));
    }
}
