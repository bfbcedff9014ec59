//! Round lifecycle and claim engine.
//!
//! [`Lottery`] owns every round, ticket, and histogram. Operations are split by concern:
//! operator transitions live in `admin`, ticket sales in `purchase`, payouts in `claim`, and
//! read-only queries in `views`. Each mutating call takes an [`Origin`], validates everything
//! up front, moves funds through the [`Ledger`], and only then commits state and returns the
//! [`Event`]s it produced.

use commonware_cryptography::ed25519::PublicKey;
use luckybox_types::lottery::{Event, Round, RoundStatus, Ticket};
use std::collections::BTreeMap;
use tracing::warn;

use crate::{
    BracketHistogram, ConfigError, Ledger, LotteryConfig, LotteryError, RandomnessAdapter,
    RequestId,
};

mod admin;
mod claim;
mod purchase;
mod views;


pub use views::WalletTicket;

/// Caller of a mutating operation and the clock it runs at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Origin {
    pub account: PublicKey,
    /// Seconds.
    pub now: u64,
}

impl Origin {
    pub fn new(account: PublicKey, now: u64) -> Self {
        Self { account, now }
    }
}

pub struct Lottery<R: RandomnessAdapter, L: Ledger> {
    config: LotteryConfig,
    operator: PublicKey,
    treasury: PublicKey,

    current_round_id: u64,
    current_ticket_id: u64,
    pending_injection_next_lottery: u64,
    all_pending_rewards: u64,

    rounds: BTreeMap<u64, Round>,
    tickets: BTreeMap<u64, Ticket>,
    histograms: BTreeMap<u64, BracketHistogram>,
    wallets: BTreeMap<(PublicKey, u64), Vec<u64>>,
    requests: BTreeMap<u64, RequestId>,

    randomness: R,
    ledger: L,
}

impl<R: RandomnessAdapter, L: Ledger> Lottery<R, L> {
    pub fn new(
        config: LotteryConfig,
        operator: PublicKey,
        treasury: PublicKey,
        randomness: R,
        ledger: L,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            operator,
            treasury,
            current_round_id: 0,
            current_ticket_id: luckybox_types::lottery::FIRST_TICKET_ID,
            pending_injection_next_lottery: 0,
            all_pending_rewards: 0,
            rounds: BTreeMap::new(),
            tickets: BTreeMap::new(),
            histograms: BTreeMap::new(),
            wallets: BTreeMap::new(),
            requests: BTreeMap::new(),
            randomness,
            ledger,
        })
    }

    pub fn randomness(&self) -> &R {
        &self.randomness
    }

    pub fn randomness_mut(&mut self) -> &mut R {
        &mut self.randomness
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    fn ensure_operator(&self, origin: &Origin) -> Result<(), LotteryError> {
        if origin.account != self.operator {
            warn!(caller = %origin.account, "rejected operator call");
            return Err(LotteryError::Unauthorized);
        }
        Ok(())
    }

    /// Status of the most recently started round (`Pending` before the first one).
    fn latest_status(&self) -> RoundStatus {
        self.rounds
            .get(&self.current_round_id)
            .map(|round| round.status)
            .unwrap_or_default()
    }

    fn round_with_status(
        &self,
        round_id: u64,
        status: RoundStatus,
    ) -> Option<&Round> {
        self.rounds
            .get(&round_id)
            .filter(|round| round.status == status)
    }
}
