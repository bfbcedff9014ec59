use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use thiserror::Error as ThisError;

use super::{
    read_u16_array, read_u64_array, write_u16_array, write_u64_array, BASIS_POINTS, BRACKET_COUNT,
};

/// Lifecycle of a round. Only ever advances forward.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoundStatus {
    #[default]
    Pending = 0,
    Open = 1,
    Closed = 2,
    Claimable = 3,
}

impl TryFrom<u8> for RoundStatus {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RoundStatus::Pending),
            1 => Ok(RoundStatus::Open),
            2 => Ok(RoundStatus::Closed),
            3 => Ok(RoundStatus::Claimable),
            _ => Err(()),
        }
    }
}

impl Write for RoundStatus {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for RoundStatus {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        RoundStatus::try_from(value).map_err(|_| Error::InvalidEnum(value))
    }
}

impl EncodeSize for RoundStatus {
    fn encode_size(&self) -> usize {
        u8::SIZE
    }
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum RoundInvariantError {
    #[error("rewards breakdown too high (total={total}, max={max})")]
    BreakdownTooHigh { total: u64, max: u64 },
    #[error("treasury fee out of range (got={got}, max={max})")]
    TreasuryFeeOutOfRange { got: u16, max: u64 },
    #[error("end time must follow start time (start={start}, end={end})")]
    EndBeforeStart { start: u64, end: u64 },
    #[error("ticket range is inverted (first={first}, next={next})")]
    InvertedTicketRange { first: u64, next: u64 },
    #[error("pending rewards exceed distributed rewards (pending={pending}, distributed={distributed})")]
    PendingExceedsRewards { pending: u64, distributed: u64 },
    #[error("bracket {bracket} has rewards but no winners")]
    RewardsWithoutWinners { bracket: usize },
}

/// One lottery cycle.
///
/// A round that was never started is `Round::default()`: `Pending` with every field zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Round {
    pub id: u64,
    pub status: RoundStatus,
    pub start_time: u64,
    pub end_time: u64,
    pub ticket_price: u64,
    /// Share of the prize pool per bracket, in basis points.
    pub rewards_breakdown: [u16; BRACKET_COUNT],
    pub treasury_fee_bps: u16,
    /// First ticket id sold in this round (inclusive).
    pub first_ticket_id: u64,
    /// First ticket id of the next round (exclusive bound for this round). Fixed at close.
    pub first_ticket_id_next_round: u64,
    pub amount_collected: u64,
    /// Drawn number in `[MIN_TICKET_NUMBER, MAX_TICKET_NUMBER]`, zero until the draw.
    pub final_number: u32,
    /// Tickets whose digits match the drawn number at each bracket.
    pub winners_per_bracket: [u64; BRACKET_COUNT],
    /// Total amount distributable to each bracket's winners.
    pub rewards_per_bracket: [u64; BRACKET_COUNT],
    /// Amount still owed to unclaimed winning tickets.
    pub pending_rewards: u64,
}

impl Round {
    pub fn breakdown_total(&self) -> u64 {
        self.rewards_breakdown.iter().map(|share| *share as u64).sum()
    }

    /// Whether `ticket_id` was sold in this round.
    ///
    /// The upper bound is only known once the round is closed.
    pub fn contains_ticket(&self, ticket_id: u64) -> bool {
        ticket_id >= self.first_ticket_id && ticket_id < self.first_ticket_id_next_round
    }

    /// Amount paid to each winning ticket of `bracket` (zero for inactive brackets).
    pub fn reward_per_ticket(&self, bracket: usize) -> u64 {
        match (
            self.winners_per_bracket.get(bracket),
            self.rewards_per_bracket.get(bracket),
        ) {
            (Some(&winners), Some(&rewards)) if winners > 0 => rewards / winners,
            _ => 0,
        }
    }

    /// Whether a winning ticket of `bracket` is paid anything.
    pub fn pays_at(&self, bracket: usize) -> bool {
        self.reward_per_ticket(bracket) > 0
    }

    pub fn total_rewards(&self) -> u64 {
        self.rewards_per_bracket.iter().sum()
    }

    pub fn validate_invariants(&self) -> Result<(), RoundInvariantError> {
        let total = self.breakdown_total();
        if total > BASIS_POINTS {
            return Err(RoundInvariantError::BreakdownTooHigh {
                total,
                max: BASIS_POINTS,
            });
        }
        if self.treasury_fee_bps as u64 > BASIS_POINTS {
            return Err(RoundInvariantError::TreasuryFeeOutOfRange {
                got: self.treasury_fee_bps,
                max: BASIS_POINTS,
            });
        }
        if self.status != RoundStatus::Pending && self.end_time <= self.start_time {
            return Err(RoundInvariantError::EndBeforeStart {
                start: self.start_time,
                end: self.end_time,
            });
        }
        if self.status >= RoundStatus::Closed
            && self.first_ticket_id_next_round < self.first_ticket_id
        {
            return Err(RoundInvariantError::InvertedTicketRange {
                first: self.first_ticket_id,
                next: self.first_ticket_id_next_round,
            });
        }
        for bracket in 0..BRACKET_COUNT {
            if self.winners_per_bracket[bracket] == 0 && self.rewards_per_bracket[bracket] > 0 {
                return Err(RoundInvariantError::RewardsWithoutWinners { bracket });
            }
        }
        let distributed = self.total_rewards();
        if self.pending_rewards > distributed {
            return Err(RoundInvariantError::PendingExceedsRewards {
                pending: self.pending_rewards,
                distributed,
            });
        }
        Ok(())
    }
}

impl Write for Round {
    fn write(&self, writer: &mut impl BufMut) {
        self.id.write(writer);
        self.status.write(writer);
        self.start_time.write(writer);
        self.end_time.write(writer);
        self.ticket_price.write(writer);
        write_u16_array(&self.rewards_breakdown, writer);
        self.treasury_fee_bps.write(writer);
        self.first_ticket_id.write(writer);
        self.first_ticket_id_next_round.write(writer);
        self.amount_collected.write(writer);
        self.final_number.write(writer);
        write_u64_array(&self.winners_per_bracket, writer);
        write_u64_array(&self.rewards_per_bracket, writer);
        self.pending_rewards.write(writer);
    }
}

impl Read for Round {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let round = Self {
            id: u64::read(reader)?,
            status: RoundStatus::read(reader)?,
            start_time: u64::read(reader)?,
            end_time: u64::read(reader)?,
            ticket_price: u64::read(reader)?,
            rewards_breakdown: read_u16_array(reader)?,
            treasury_fee_bps: u16::read(reader)?,
            first_ticket_id: u64::read(reader)?,
            first_ticket_id_next_round: u64::read(reader)?,
            amount_collected: u64::read(reader)?,
            final_number: u32::read(reader)?,
            winners_per_bracket: read_u64_array(reader)?,
            rewards_per_bracket: read_u64_array(reader)?,
            pending_rewards: u64::read(reader)?,
        };
        round
            .validate_invariants()
            .map_err(|_| Error::Invalid("Round", "invariant violated"))?;
        Ok(round)
    }
}

impl EncodeSize for Round {
    fn encode_size(&self) -> usize {
        self.id.encode_size()
            + self.status.encode_size()
            + self.start_time.encode_size()
            + self.end_time.encode_size()
            + self.ticket_price.encode_size()
            + BRACKET_COUNT * u16::SIZE
            + self.treasury_fee_bps.encode_size()
            + self.first_ticket_id.encode_size()
            + self.first_ticket_id_next_round.encode_size()
            + self.amount_collected.encode_size()
            + self.final_number.encode_size()
            + 2 * BRACKET_COUNT * u64::SIZE
            + self.pending_rewards.encode_size()
    }
}
