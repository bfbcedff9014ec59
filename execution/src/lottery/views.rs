use super::*;

use crate::{
    numbers::{matches_at, validate_bracket},
    pricing::batch_price,
};

/// One of a wallet's tickets, as returned by [`Lottery::wallet_tickets`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletTicket {
    pub id: u64,
    pub number: u32,
    pub claimed: bool,
}

impl<R: RandomnessAdapter, L: Ledger> Lottery<R, L> {
    /// Round `round_id`, or `Round::default()` if it was never started.
    pub fn round(&self, round_id: u64) -> Round {
        self.rounds.get(&round_id).cloned().unwrap_or_default()
    }

    /// Up to `size` rounds with id `>= cursor`, and the cursor to continue from.
    pub fn rounds(&self, cursor: u64, size: usize) -> (Vec<Round>, u64) {
        let page: Vec<Round> = self
            .rounds
            .range(cursor..)
            .take(size)
            .map(|(_, round)| round.clone())
            .collect();
        let next = page.last().map_or(cursor, |round| round.id + 1);
        (page, next)
    }

    pub fn wallet_ticket_ids(&self, owner: &PublicKey, round_id: u64) -> Vec<u64> {
        self.wallets
            .get(&(owner.clone(), round_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Page of `owner`'s tickets in `round_id`, starting at position `cursor` of the wallet.
    pub fn wallet_tickets(
        &self,
        owner: &PublicKey,
        round_id: u64,
        cursor: usize,
        size: usize,
    ) -> (Vec<WalletTicket>, usize) {
        let Some(ids) = self.wallets.get(&(owner.clone(), round_id)) else {
            return (Vec::new(), cursor);
        };
        let page: Vec<WalletTicket> = ids
            .iter()
            .skip(cursor)
            .take(size)
            .filter_map(|id| {
                self.tickets.get(id).map(|ticket| WalletTicket {
                    id: *id,
                    number: ticket.number,
                    claimed: ticket.claimed,
                })
            })
            .collect();
        let next = cursor + page.len();
        (page, next)
    }

    pub fn ticket(&self, ticket_id: u64) -> Option<&Ticket> {
        self.tickets.get(&ticket_id)
    }

    /// Number and claimed flag of each ticket, `None` for ids never issued.
    pub fn ticket_numbers(&self, ticket_ids: &[u64]) -> Vec<Option<(u32, bool)>> {
        ticket_ids
            .iter()
            .map(|id| self.tickets.get(id).map(|ticket| (ticket.number, ticket.claimed)))
            .collect()
    }

    /// What `ticket_id` would be paid at `bracket`, ignoring whether it was already claimed.
    /// Zero when the round is not claimable or the ticket does not win there.
    pub fn reward_for_ticket(&self, round_id: u64, ticket_id: u64, bracket: u8) -> u64 {
        let Some(round) = self.round_with_status(round_id, RoundStatus::Claimable) else {
            return 0;
        };
        let Ok(bracket) = validate_bracket(bracket) else {
            return 0;
        };
        if !round.contains_ticket(ticket_id) {
            return 0;
        }
        match self.tickets.get(&ticket_id) {
            Some(ticket) if matches_at(ticket.number, round.final_number, bracket) => {
                round.reward_per_ticket(bracket)
            }
            _ => 0,
        }
    }

    /// Cost of `count` tickets in the current round.
    pub fn calculate_total_price(&self, count: usize) -> Result<u64, LotteryError> {
        let ticket_price = self
            .rounds
            .get(&self.current_round_id)
            .map_or(0, |round| round.ticket_price);
        batch_price(ticket_price, count, self.config.max_tickets_per_batch)
    }

    pub fn current_round_id(&self) -> u64 {
        self.current_round_id
    }

    /// Id the next sold ticket will get.
    pub fn current_ticket_id(&self) -> u64 {
        self.current_ticket_id
    }

    pub fn pending_injection_next_lottery(&self) -> u64 {
        self.pending_injection_next_lottery
    }

    pub fn all_pending_rewards(&self) -> u64 {
        self.all_pending_rewards
    }

    pub fn max_tickets_per_batch(&self) -> u32 {
        self.config.max_tickets_per_batch
    }

    pub fn config(&self) -> &LotteryConfig {
        &self.config
    }

    pub fn treasury(&self) -> &PublicKey {
        &self.treasury
    }

    pub fn operator(&self) -> &PublicKey {
        &self.operator
    }
}
