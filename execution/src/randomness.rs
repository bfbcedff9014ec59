//! Randomness oracle interface.
//!
//! Drawing is a two-phase dependency: closing a round issues [`RandomnessAdapter::request`],
//! and the round can only be drawn once the adapter reports the request fulfilled. Nothing
//! blocks while waiting; the draw fails fast until the result is available.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// Identifier of one randomness request.
pub type RequestId = u64;

pub trait RandomnessAdapter {
    /// Issue a new request. The result is not available until the request is fulfilled.
    fn request(&mut self) -> RequestId;

    /// Whether `request` has a result. Idempotent.
    fn is_fulfilled(&self, request: RequestId) -> bool;

    /// The raw random value for `request`, once fulfilled.
    fn result(&self, request: RequestId) -> Option<u64>;
}

/// Seeded oracle that fulfills requests on demand.
///
/// Results come from a single ChaCha20 stream in fulfillment order, so the same seed and
/// the same sequence of calls always yield the same draws.
#[derive(Clone, Debug)]
pub struct ChaChaOracle {
    rng: ChaCha20Rng,
    next_request: RequestId,
    requests: BTreeMap<RequestId, Option<u64>>,
}

impl ChaChaOracle {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            next_request: 1,
            requests: BTreeMap::new(),
        }
    }

    /// Fulfill `request`. Returns `false` if it is unknown or already fulfilled.
    pub fn fulfill(&mut self, request: RequestId) -> bool {
        let Some(slot) = self.requests.get_mut(&request) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        let value = self.rng.next_u64();
        *slot = Some(value);
        debug!(request, value, "randomness fulfilled");
        true
    }

    /// Fulfill every outstanding request, oldest first. Returns how many were fulfilled.
    pub fn fulfill_pending(&mut self) -> usize {
        let pending: Vec<RequestId> = self
            .requests
            .iter()
            .filter(|(_, result)| result.is_none())
            .map(|(request, _)| *request)
            .collect();
        pending
            .into_iter()
            .filter(|request| self.fulfill(*request))
            .count()
    }

    pub fn pending(&self) -> usize {
        self.requests.values().filter(|result| result.is_none()).count()
    }
}

impl RandomnessAdapter for ChaChaOracle {
    fn request(&mut self) -> RequestId {
        let request = self.next_request;
        self.next_request += 1;
        self.requests.insert(request, None);
        request
    }

    fn is_fulfilled(&self, request: RequestId) -> bool {
        matches!(self.requests.get(&request), Some(Some(_)))
    }

    fn result(&self, request: RequestId) -> Option<u64> {
        self.requests.get(&request).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_not_fulfilled_until_fulfill() {
        let mut oracle = ChaChaOracle::new(7);
        let request = oracle.request();
        assert!(!oracle.is_fulfilled(request));
        assert_eq!(oracle.result(request), None);
        assert_eq!(oracle.pending(), 1);

        assert!(oracle.fulfill(request));
        assert!(oracle.is_fulfilled(request));
        assert!(oracle.result(request).is_some());
        assert_eq!(oracle.pending(), 0);
    }

    #[test]
    fn fulfill_is_idempotent() {
        let mut oracle = ChaChaOracle::new(7);
        let request = oracle.request();
        assert!(oracle.fulfill(request));
        let first = oracle.result(request);
        assert!(!oracle.fulfill(request));
        assert_eq!(oracle.result(request), first);
        assert!(!oracle.fulfill(request + 1));
    }

    #[test]
    fn same_seed_yields_same_results() {
        let mut a = ChaChaOracle::new(42);
        let mut b = ChaChaOracle::new(42);
        for _ in 0..3 {
            a.request();
            b.request();
        }
        assert_eq!(a.fulfill_pending(), 3);
        assert_eq!(b.fulfill_pending(), 3);
        for request in 1..=3 {
            assert_eq!(a.result(request), b.result(request));
        }
    }
}
