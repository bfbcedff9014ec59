use thiserror::Error;

use crate::ledger::LedgerError;

/// Reasons an engine operation is rejected.
///
/// Every operation validates before it moves funds or mutates state, so a returned error
/// means nothing changed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LotteryError {
    #[error("ticket number is outside range: {number}")]
    InvalidTicketNumber { number: u32 },
    #[error("no tickets are being bought")]
    EmptyPurchase,
    #[error("too many tickets (requested={requested}, max={max})")]
    BatchTooLarge { requested: usize, max: u32 },
    #[error("round not open")]
    RoundNotOpen,
    #[error("round {round_id} is not open or has not elapsed")]
    RoundNotOpenOrNotElapsed { round_id: u64 },
    #[error("randomness for round {round_id} is not ready")]
    RandomnessNotReady { round_id: u64 },
    #[error("round {round_id} is not claimable")]
    NotClaimable { round_id: u64 },
    #[error("ticket {ticket_id} is outside round range [{first}, {next})")]
    TicketOutOfRange { ticket_id: u64, first: u64, next: u64 },
    #[error("not the ticket owner or already claimed: {ticket_id}")]
    NotOwnerOrAlreadyClaimed { ticket_id: u64 },
    #[error("no prize for ticket {ticket_id} at bracket {bracket}")]
    NoPrize { ticket_id: u64, bracket: usize },
    #[error("not same length (tickets={tickets}, brackets={brackets})")]
    LengthMismatch { tickets: usize, brackets: usize },
    #[error("caller is not the operator")]
    Unauthorized,
    #[error("rewards breakdown too high (total={total})")]
    RewardBreakdownTooHigh { total: u64 },
    #[error("round {round_id} is already open")]
    RoundAlreadyOpen { round_id: u64 },
    #[error("round {round_id} is not closed")]
    RoundNotClosed { round_id: u64 },
    #[error("round {round_id} has not been settled")]
    RoundNotSettled { round_id: u64 },
    #[error("end time must be after start (now={now}, end={end_time})")]
    InvalidEndTime { now: u64, end_time: u64 },
    #[error("ticket price must be > 0")]
    InvalidTicketPrice,
    #[error("treasury fee too high (got={fee}, max={max})")]
    TreasuryFeeTooHigh { fee: u16, max: u16 },
    #[error("bracket out of range: {bracket}")]
    InvalidBracket { bracket: usize },
    #[error("amount must be > 0")]
    InvalidAmount,
    #[error("max tickets per batch out of range (got={got}, max={max})")]
    InvalidMaxTicketsPerBatch { got: u32, max: u64 },
    #[error("no tickets to claim")]
    NoTickets,
    #[error("arithmetic overflow")]
    Overflow,
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),
}
