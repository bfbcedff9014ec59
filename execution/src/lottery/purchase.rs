use super::*;
use tracing::debug;

use crate::{numbers::validate_ticket_number, pricing::batch_price};

impl<R: RandomnessAdapter, L: Ledger> Lottery<R, L> {
    /// Buy one ticket per entry of `numbers` in the current round.
    ///
    /// The batch is all-or-nothing: a single invalid number rejects the whole purchase.
    pub fn buy_tickets(&mut self, origin: &Origin, numbers: &[u32]) -> Result<Vec<Event>, LotteryError> {
        let round_id = self.current_round_id;
        let round = self
            .round_with_status(round_id, RoundStatus::Open)
            .filter(|round| origin.now < round.end_time)
            .ok_or(LotteryError::RoundNotOpen)?;
        let cost = batch_price(round.ticket_price, numbers.len(), self.config.max_tickets_per_batch)?;
        for number in numbers {
            validate_ticket_number(*number)?;
        }
        let amount_collected = round
            .amount_collected
            .checked_add(cost)
            .ok_or(LotteryError::Overflow)?;
        let first_ticket_id = self.current_ticket_id;
        let next_ticket_id = first_ticket_id
            .checked_add(numbers.len() as u64)
            .ok_or(LotteryError::Overflow)?;

        self.ledger.transfer_in(&origin.account, cost)?;

        let histogram = self.histograms.entry(round_id).or_default();
        let wallet = self
            .wallets
            .entry((origin.account.clone(), round_id))
            .or_default();
        for (ticket_id, number) in (first_ticket_id..next_ticket_id).zip(numbers) {
            self.tickets
                .insert(ticket_id, Ticket::new(*number, origin.account.clone()));
            histogram.record(*number);
            wallet.push(ticket_id);
        }
        self.current_ticket_id = next_ticket_id;
        if let Some(round) = self.rounds.get_mut(&round_id) {
            round.amount_collected = amount_collected;
        }
        debug!(
            round_id,
            buyer = %origin.account,
            count = numbers.len(),
            cost,
            first_ticket_id,
            "tickets purchased"
        );

        Ok(vec![Event::TicketsPurchased {
            buyer: origin.account.clone(),
            round_id,
            first_ticket_id,
            count: numbers.len() as u32,
            cost,
        }])
    }
}
