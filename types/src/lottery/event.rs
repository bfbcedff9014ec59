use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use commonware_cryptography::ed25519::PublicKey;

use super::{read_u16_array, write_u16_array, BRACKET_COUNT};

/// Outcome of a successful engine operation.
///
/// Each mutating call returns the events it produced, in order. The encoding is stable so
/// a journal of events can be replayed for audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    RoundOpened {
        round_id: u64,
        start_time: u64,
        end_time: u64,
        ticket_price: u64,
        rewards_breakdown: [u16; BRACKET_COUNT],
        treasury_fee_bps: u16,
        first_ticket_id: u64,
        /// Rollover carried into this round from earlier rounds.
        injected_amount: u64,
    },
    TicketsPurchased {
        buyer: PublicKey,
        round_id: u64,
        first_ticket_id: u64,
        count: u32,
        cost: u64,
    },
    FundsInjected {
        round_id: u64,
        amount: u64,
    },
    RoundClosed {
        round_id: u64,
        first_ticket_id_next_round: u64,
        request_id: u64,
    },
    NumberDrawn {
        round_id: u64,
        final_number: u32,
        /// Distinct tickets matching at least the last digit.
        winning_tickets: u64,
        treasury_amount: u64,
        rollover_amount: u64,
    },
    TicketsClaimed {
        claimer: PublicKey,
        round_id: u64,
        count: u32,
        amount: u64,
    },
    MaxTicketsPerBatchUpdated {
        max: u32,
    },
    TreasuryUpdated {
        treasury: PublicKey,
    },
    RandomnessAdapterChanged,
}

impl Write for Event {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::RoundOpened {
                round_id,
                start_time,
                end_time,
                ticket_price,
                rewards_breakdown,
                treasury_fee_bps,
                first_ticket_id,
                injected_amount,
            } => {
                0u8.write(writer);
                round_id.write(writer);
                start_time.write(writer);
                end_time.write(writer);
                ticket_price.write(writer);
                write_u16_array(rewards_breakdown, writer);
                treasury_fee_bps.write(writer);
                first_ticket_id.write(writer);
                injected_amount.write(writer);
            }
            Self::TicketsPurchased {
                buyer,
                round_id,
                first_ticket_id,
                count,
                cost,
            } => {
                1u8.write(writer);
                buyer.write(writer);
                round_id.write(writer);
                first_ticket_id.write(writer);
                count.write(writer);
                cost.write(writer);
            }
            Self::FundsInjected { round_id, amount } => {
                2u8.write(writer);
                round_id.write(writer);
                amount.write(writer);
            }
            Self::RoundClosed {
                round_id,
                first_ticket_id_next_round,
                request_id,
            } => {
                3u8.write(writer);
                round_id.write(writer);
                first_ticket_id_next_round.write(writer);
                request_id.write(writer);
            }
            Self::NumberDrawn {
                round_id,
                final_number,
                winning_tickets,
                treasury_amount,
                rollover_amount,
            } => {
                4u8.write(writer);
                round_id.write(writer);
                final_number.write(writer);
                winning_tickets.write(writer);
                treasury_amount.write(writer);
                rollover_amount.write(writer);
            }
            Self::TicketsClaimed {
                claimer,
                round_id,
                count,
                amount,
            } => {
                5u8.write(writer);
                claimer.write(writer);
                round_id.write(writer);
                count.write(writer);
                amount.write(writer);
            }
            Self::MaxTicketsPerBatchUpdated { max } => {
                6u8.write(writer);
                max.write(writer);
            }
            Self::TreasuryUpdated { treasury } => {
                7u8.write(writer);
                treasury.write(writer);
            }
            Self::RandomnessAdapterChanged => 8u8.write(writer),
        }
    }
}

impl Read for Event {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        let event = match kind {
            0 => Self::RoundOpened {
                round_id: u64::read(reader)?,
                start_time: u64::read(reader)?,
                end_time: u64::read(reader)?,
                ticket_price: u64::read(reader)?,
                rewards_breakdown: read_u16_array(reader)?,
                treasury_fee_bps: u16::read(reader)?,
                first_ticket_id: u64::read(reader)?,
                injected_amount: u64::read(reader)?,
            },
            1 => Self::TicketsPurchased {
                buyer: PublicKey::read(reader)?,
                round_id: u64::read(reader)?,
                first_ticket_id: u64::read(reader)?,
                count: u32::read(reader)?,
                cost: u64::read(reader)?,
            },
            2 => Self::FundsInjected {
                round_id: u64::read(reader)?,
                amount: u64::read(reader)?,
            },
            3 => Self::RoundClosed {
                round_id: u64::read(reader)?,
                first_ticket_id_next_round: u64::read(reader)?,
                request_id: u64::read(reader)?,
            },
            4 => Self::NumberDrawn {
                round_id: u64::read(reader)?,
                final_number: u32::read(reader)?,
                winning_tickets: u64::read(reader)?,
                treasury_amount: u64::read(reader)?,
                rollover_amount: u64::read(reader)?,
            },
            5 => Self::TicketsClaimed {
                claimer: PublicKey::read(reader)?,
                round_id: u64::read(reader)?,
                count: u32::read(reader)?,
                amount: u64::read(reader)?,
            },
            6 => Self::MaxTicketsPerBatchUpdated {
                max: u32::read(reader)?,
            },
            7 => Self::TreasuryUpdated {
                treasury: PublicKey::read(reader)?,
            },
            8 => Self::RandomnessAdapterChanged,
            _ => return Err(Error::InvalidEnum(kind)),
        };
        Ok(event)
    }
}

impl EncodeSize for Event {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::RoundOpened { .. } => {
                    4 * u64::SIZE + BRACKET_COUNT * u16::SIZE + u16::SIZE + 2 * u64::SIZE
                }
                Self::TicketsPurchased { buyer, .. } => {
                    buyer.encode_size() + 2 * u64::SIZE + u32::SIZE + u64::SIZE
                }
                Self::FundsInjected { .. } => 2 * u64::SIZE,
                Self::RoundClosed { .. } => 3 * u64::SIZE,
                Self::NumberDrawn { .. } => u64::SIZE + u32::SIZE + 3 * u64::SIZE,
                Self::TicketsClaimed { claimer, .. } => {
                    claimer.encode_size() + u64::SIZE + u32::SIZE + u64::SIZE
                }
                Self::MaxTicketsPerBatchUpdated { .. } => u32::SIZE,
                Self::TreasuryUpdated { treasury } => treasury.encode_size(),
                Self::RandomnessAdapterChanged => 0,
            }
    }
}
