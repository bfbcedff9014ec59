/// Smallest valid ticket number. The leading `1` is a fixed marker digit.
pub const MIN_TICKET_NUMBER: u32 = 10_000;

/// Largest valid ticket number.
pub const MAX_TICKET_NUMBER: u32 = 19_999;

/// Number of payload digits that can be matched against the drawn number.
pub const PAYLOAD_DIGITS: u32 = 4;

/// Number of reward brackets (match the last 1, 2, 3 or 4 digits).
pub const BRACKET_COUNT: usize = 4;

/// Basis-point denominator (100%).
pub const BASIS_POINTS: u64 = 10_000;

/// Bulk purchase discount divisor: each extra ticket in a batch lowers the average price by ~1/98.
pub const DISCOUNT_DIVISOR: u64 = 98;

/// Tickets a single purchase may contain unless the operator changes it.
pub const DEFAULT_MAX_TICKETS_PER_BATCH: u32 = 10;

/// Upper bound on the treasury fee a round may be started with, unless configured otherwise.
pub const DEFAULT_MAX_TREASURY_FEE_BPS: u16 = 3_000;

/// Ticket id assigned to the very first ticket ever sold.
pub const FIRST_TICKET_ID: u64 = 0;
