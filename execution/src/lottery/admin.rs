use super::*;
use luckybox_types::lottery::{BASIS_POINTS, BRACKET_COUNT, DISCOUNT_DIVISOR};
use tracing::info;

use crate::{numbers::normalize_final_number, settlement::settle};

impl<R: RandomnessAdapter, L: Ledger> Lottery<R, L> {
    // === Round lifecycle ===

    pub fn start_round(
        &mut self,
        origin: &Origin,
        end_time: u64,
        ticket_price: u64,
        rewards_breakdown: [u16; BRACKET_COUNT],
        treasury_fee_bps: u16,
    ) -> Result<Vec<Event>, LotteryError> {
        self.ensure_operator(origin)?;
        if self.latest_status() == RoundStatus::Open {
            return Err(LotteryError::RoundAlreadyOpen {
                round_id: self.current_round_id,
            });
        }
        if end_time <= origin.now {
            return Err(LotteryError::InvalidEndTime {
                now: origin.now,
                end_time,
            });
        }
        if ticket_price == 0 {
            return Err(LotteryError::InvalidTicketPrice);
        }
        let total: u64 = rewards_breakdown.iter().map(|share| *share as u64).sum();
        if total > BASIS_POINTS {
            return Err(LotteryError::RewardBreakdownTooHigh { total });
        }
        if treasury_fee_bps > self.config.max_treasury_fee_bps {
            return Err(LotteryError::TreasuryFeeTooHigh {
                fee: treasury_fee_bps,
                max: self.config.max_treasury_fee_bps,
            });
        }
        let round_id = self
            .current_round_id
            .checked_add(1)
            .ok_or(LotteryError::Overflow)?;

        let injected_amount = std::mem::take(&mut self.pending_injection_next_lottery);
        let round = Round {
            id: round_id,
            status: RoundStatus::Open,
            start_time: origin.now,
            end_time,
            ticket_price,
            rewards_breakdown,
            treasury_fee_bps,
            first_ticket_id: self.current_ticket_id,
            first_ticket_id_next_round: self.current_ticket_id,
            amount_collected: injected_amount,
            ..Default::default()
        };
        self.rounds.insert(round_id, round);
        self.current_round_id = round_id;
        info!(
            round_id,
            end_time, ticket_price, injected_amount, "round opened"
        );

        Ok(vec![Event::RoundOpened {
            round_id,
            start_time: origin.now,
            end_time,
            ticket_price,
            rewards_breakdown,
            treasury_fee_bps,
            first_ticket_id: self.current_ticket_id,
            injected_amount,
        }])
    }

    /// Close an elapsed round and request its random number.
    pub fn close_round(&mut self, origin: &Origin, round_id: u64) -> Result<Vec<Event>, LotteryError> {
        self.close(origin, round_id, false)
    }

    /// Close an open round before its end time.
    pub fn force_close_round(
        &mut self,
        origin: &Origin,
        round_id: u64,
    ) -> Result<Vec<Event>, LotteryError> {
        self.close(origin, round_id, true)
    }

    fn close(&mut self, origin: &Origin, round_id: u64, force: bool) -> Result<Vec<Event>, LotteryError> {
        self.ensure_operator(origin)?;
        let elapsed = self
            .round_with_status(round_id, RoundStatus::Open)
            .is_some_and(|round| force || origin.now >= round.end_time);
        if !elapsed {
            return Err(LotteryError::RoundNotOpenOrNotElapsed { round_id });
        }

        let request_id = self.randomness.request();
        let first_ticket_id_next_round = self.current_ticket_id;
        let Some(round) = self.rounds.get_mut(&round_id) else {
            return Err(LotteryError::RoundNotOpenOrNotElapsed { round_id });
        };
        round.status = RoundStatus::Closed;
        round.first_ticket_id_next_round = first_ticket_id_next_round;
        self.requests.insert(round_id, request_id);
        info!(round_id, request_id, force, first_ticket_id_next_round, "round closed");

        Ok(vec![Event::RoundClosed {
            round_id,
            first_ticket_id_next_round,
            request_id,
        }])
    }

    /// Settle a closed round from its fulfilled random number.
    ///
    /// The treasury fee is paid out immediately. Rollover seeds the next round when
    /// `auto_inject` is set and goes to the treasury otherwise.
    pub fn draw_final_number_and_make_claimable(
        &mut self,
        origin: &Origin,
        round_id: u64,
        auto_inject: bool,
    ) -> Result<Vec<Event>, LotteryError> {
        self.ensure_operator(origin)?;
        let round = self
            .round_with_status(round_id, RoundStatus::Closed)
            .ok_or(LotteryError::RoundNotClosed { round_id })?;
        let raw = self
            .requests
            .get(&round_id)
            .filter(|request| self.randomness.is_fulfilled(**request))
            .and_then(|request| self.randomness.result(*request))
            .ok_or(LotteryError::RandomnessNotReady { round_id })?;
        let final_number = normalize_final_number(raw);

        let empty = BracketHistogram::default();
        let histogram = self.histograms.get(&round_id).unwrap_or(&empty);
        let settlement = settle(
            final_number,
            round.amount_collected,
            &round.rewards_breakdown,
            round.treasury_fee_bps,
            histogram,
        )?;
        let total_rewards = settlement.total_rewards();
        let all_pending_rewards = self
            .all_pending_rewards
            .checked_add(total_rewards)
            .ok_or(LotteryError::Overflow)?;
        let (pending_injection, treasury_payout) = if auto_inject {
            (
                self.pending_injection_next_lottery
                    .checked_add(settlement.rollover_amount)
                    .ok_or(LotteryError::Overflow)?,
                settlement.treasury_amount,
            )
        } else {
            (
                self.pending_injection_next_lottery,
                settlement.treasury_amount + settlement.rollover_amount,
            )
        };

        if treasury_payout > 0 {
            self.ledger.transfer_out(&self.treasury, treasury_payout)?;
        }

        let Some(round) = self.rounds.get_mut(&round_id) else {
            return Err(LotteryError::RoundNotClosed { round_id });
        };
        round.final_number = final_number;
        round.winners_per_bracket = settlement.winners_per_bracket;
        round.rewards_per_bracket = settlement.rewards_per_bracket;
        round.pending_rewards = total_rewards;
        round.status = RoundStatus::Claimable;
        self.requests.remove(&round_id);
        self.all_pending_rewards = all_pending_rewards;
        self.pending_injection_next_lottery = pending_injection;
        info!(
            round_id,
            final_number,
            winning_tickets = settlement.winning_tickets(),
            treasury_payout,
            rollover = settlement.rollover_amount,
            auto_inject,
            "round claimable"
        );

        Ok(vec![Event::NumberDrawn {
            round_id,
            final_number,
            winning_tickets: settlement.winning_tickets(),
            treasury_amount: settlement.treasury_amount,
            rollover_amount: settlement.rollover_amount,
        }])
    }

    /// Add operator funds to the current round's pool.
    pub fn inject_funds(&mut self, origin: &Origin, amount: u64) -> Result<Vec<Event>, LotteryError> {
        self.ensure_operator(origin)?;
        let round_id = self.current_round_id;
        let round = self
            .rounds
            .get(&round_id)
            .filter(|round| matches!(round.status, RoundStatus::Open | RoundStatus::Closed))
            .ok_or(LotteryError::RoundNotOpen)?;
        if amount == 0 {
            return Err(LotteryError::InvalidAmount);
        }
        let amount_collected = round
            .amount_collected
            .checked_add(amount)
            .ok_or(LotteryError::Overflow)?;

        self.ledger.transfer_in(&origin.account, amount)?;

        if let Some(round) = self.rounds.get_mut(&round_id) {
            round.amount_collected = amount_collected;
        }
        info!(round_id, amount, "funds injected");
        Ok(vec![Event::FundsInjected { round_id, amount }])
    }

    // === Operator settings ===

    pub fn set_max_tickets_per_batch(
        &mut self,
        origin: &Origin,
        max: u32,
    ) -> Result<Vec<Event>, LotteryError> {
        self.ensure_operator(origin)?;
        if max == 0 || max as u64 > DISCOUNT_DIVISOR {
            return Err(LotteryError::InvalidMaxTicketsPerBatch {
                got: max,
                max: DISCOUNT_DIVISOR,
            });
        }
        self.config.max_tickets_per_batch = max;
        info!(max, "max tickets per batch updated");
        Ok(vec![Event::MaxTicketsPerBatchUpdated { max }])
    }

    pub fn set_treasury(&mut self, origin: &Origin, treasury: PublicKey) -> Result<Vec<Event>, LotteryError> {
        self.ensure_operator(origin)?;
        self.treasury = treasury.clone();
        info!(%treasury, "treasury updated");
        Ok(vec![Event::TreasuryUpdated { treasury }])
    }

    /// Swap the randomness source. Refused while any round is waiting on the current one.
    pub fn change_randomness_adapter(
        &mut self,
        origin: &Origin,
        randomness: R,
    ) -> Result<Vec<Event>, LotteryError> {
        self.ensure_operator(origin)?;
        if matches!(self.latest_status(), RoundStatus::Open | RoundStatus::Closed) {
            return Err(LotteryError::RoundNotSettled {
                round_id: self.current_round_id,
            });
        }
        if let Some(round_id) = self.requests.keys().next() {
            return Err(LotteryError::RoundNotSettled { round_id: *round_id });
        }
        self.randomness = randomness;
        info!("randomness adapter changed");
        Ok(vec![Event::RandomnessAdapterChanged])
    }
}
