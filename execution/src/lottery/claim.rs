use super::*;
use std::collections::BTreeSet;
use tracing::debug;

use crate::numbers::{highest_matching_bracket, matches_at, validate_bracket};

impl<R: RandomnessAdapter, L: Ledger> Lottery<R, L> {
    pub fn claim_ticket(
        &mut self,
        origin: &Origin,
        round_id: u64,
        ticket_id: u64,
        bracket: u8,
    ) -> Result<Vec<Event>, LotteryError> {
        self.claim_tickets(origin, round_id, &[ticket_id], &[bracket])
    }

    /// Claim each `ticket_ids[i]` at exactly `brackets[i]`.
    ///
    /// Every entry is checked before anything is paid; one bad entry rejects the batch.
    pub fn claim_tickets(
        &mut self,
        origin: &Origin,
        round_id: u64,
        ticket_ids: &[u64],
        brackets: &[u8],
    ) -> Result<Vec<Event>, LotteryError> {
        if ticket_ids.len() != brackets.len() {
            return Err(LotteryError::LengthMismatch {
                tickets: ticket_ids.len(),
                brackets: brackets.len(),
            });
        }
        if ticket_ids.is_empty() {
            return Err(LotteryError::NoTickets);
        }
        let round = self
            .round_with_status(round_id, RoundStatus::Claimable)
            .ok_or(LotteryError::NotClaimable { round_id })?;

        let mut seen = BTreeSet::new();
        let mut claims = Vec::with_capacity(ticket_ids.len());
        for (ticket_id, bracket) in ticket_ids.iter().copied().zip(brackets.iter().copied()) {
            if !round.contains_ticket(ticket_id) {
                return Err(LotteryError::TicketOutOfRange {
                    ticket_id,
                    first: round.first_ticket_id,
                    next: round.first_ticket_id_next_round,
                });
            }
            let bracket = validate_bracket(bracket)?;
            let ticket = self
                .tickets
                .get(&ticket_id)
                .filter(|ticket| ticket.owner == origin.account && !ticket.claimed)
                .filter(|_| seen.insert(ticket_id))
                .ok_or(LotteryError::NotOwnerOrAlreadyClaimed { ticket_id })?;
            if !matches_at(ticket.number, round.final_number, bracket) || !round.pays_at(bracket) {
                return Err(LotteryError::NoPrize { ticket_id, bracket });
            }
            claims.push((ticket_id, round.reward_per_ticket(bracket)));
        }

        self.pay_claims(origin, round_id, claims)
    }

    /// Claim every unclaimed ticket the caller holds in `round_id`, each at the highest
    /// paying bracket with matching digits. Tickets that win nothing are skipped.
    pub fn claim_all_tickets(&mut self, origin: &Origin, round_id: u64) -> Result<Vec<Event>, LotteryError> {
        let round = self
            .round_with_status(round_id, RoundStatus::Claimable)
            .ok_or(LotteryError::NotClaimable { round_id })?;
        let Some(owned) = self.wallets.get(&(origin.account.clone(), round_id)) else {
            return Ok(Vec::new());
        };

        let claims: Vec<(u64, u64)> = owned
            .iter()
            .filter_map(|ticket_id| {
                let ticket = self.tickets.get(ticket_id).filter(|ticket| !ticket.claimed)?;
                let bracket = highest_matching_bracket(ticket.number, round.final_number, |bracket| {
                    round.pays_at(bracket)
                })?;
                Some((*ticket_id, round.reward_per_ticket(bracket)))
            })
            .collect();
        if claims.is_empty() {
            debug!(round_id, claimer = %origin.account, "nothing to claim");
            return Ok(Vec::new());
        }

        self.pay_claims(origin, round_id, claims)
    }

    /// Pay validated `(ticket_id, reward)` pairs with a single transfer, then mark them claimed.
    fn pay_claims(
        &mut self,
        origin: &Origin,
        round_id: u64,
        claims: Vec<(u64, u64)>,
    ) -> Result<Vec<Event>, LotteryError> {
        let amount = claims
            .iter()
            .try_fold(0u64, |total, (_, reward)| total.checked_add(*reward))
            .ok_or(LotteryError::Overflow)?;
        let round = self
            .rounds
            .get(&round_id)
            .ok_or(LotteryError::NotClaimable { round_id })?;
        let pending_rewards = round
            .pending_rewards
            .checked_sub(amount)
            .ok_or(LotteryError::Overflow)?;
        let all_pending_rewards = self
            .all_pending_rewards
            .checked_sub(amount)
            .ok_or(LotteryError::Overflow)?;

        if amount > 0 {
            self.ledger.transfer_out(&origin.account, amount)?;
        }

        for (ticket_id, _) in &claims {
            if let Some(ticket) = self.tickets.get_mut(ticket_id) {
                ticket.claimed = true;
            }
        }
        if let Some(round) = self.rounds.get_mut(&round_id) {
            round.pending_rewards = pending_rewards;
        }
        self.all_pending_rewards = all_pending_rewards;
        debug!(
            round_id,
            claimer = %origin.account,
            count = claims.len(),
            amount,
            "tickets claimed"
        );

        Ok(vec![Event::TicketsClaimed {
            claimer: origin.account.clone(),
            round_id,
            count: claims.len() as u32,
            amount,
        }])
    }
}
