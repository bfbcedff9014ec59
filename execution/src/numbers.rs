//! Ticket number validation and bracket keys.
//!
//! A ticket number is `1dddd`: the leading `1` is a marker and the four trailing digits are
//! the payload. Bracket `b` compares the last `b + 1` payload digits, so a ticket wins at
//! bracket `b` iff `bridge(ticket, b) == bridge(final_number, b)`.

use luckybox_types::lottery::{BRACKET_COUNT, MAX_TICKET_NUMBER, MIN_TICKET_NUMBER, PAYLOAD_DIGITS};

use crate::LotteryError;

/// `10^(b + 1)` for each bracket.
const BRACKET_MODULI: [u32; BRACKET_COUNT] = [10, 100, 1_000, 10_000];

/// Key of `number` at `bracket`: its last `bracket + 1` digits.
///
/// `bracket` must be below [`BRACKET_COUNT`]; see [`validate_bracket`].
pub fn bridge(number: u32, bracket: usize) -> u32 {
    number % BRACKET_MODULI[bracket]
}

/// Whether `ticket` and `final_number` agree on the digits compared at `bracket`.
pub fn matches_at(ticket: u32, final_number: u32, bracket: usize) -> bool {
    bridge(ticket, bracket) == bridge(final_number, bracket)
}

pub fn validate_ticket_number(number: u32) -> Result<u32, LotteryError> {
    if !(MIN_TICKET_NUMBER..=MAX_TICKET_NUMBER).contains(&number) {
        return Err(LotteryError::InvalidTicketNumber { number });
    }
    Ok(number)
}

pub fn validate_bracket(bracket: u8) -> Result<usize, LotteryError> {
    let bracket = bracket as usize;
    if bracket >= BRACKET_COUNT {
        return Err(LotteryError::InvalidBracket { bracket });
    }
    Ok(bracket)
}

/// Map a raw oracle result into the ticket number range.
pub fn normalize_final_number(raw: u64) -> u32 {
    let payload_space = 10u64.pow(PAYLOAD_DIGITS);
    MIN_TICKET_NUMBER + (raw % payload_space) as u32
}

/// Highest bracket accepted by `eligible` at which `ticket` matches `final_number`, if any.
pub fn highest_matching_bracket(
    ticket: u32,
    final_number: u32,
    eligible: impl Fn(usize) -> bool,
) -> Option<usize> {
    (0..BRACKET_COUNT)
        .rev()
        .find(|bracket| eligible(*bracket) && matches_at(ticket, final_number, *bracket))
}
