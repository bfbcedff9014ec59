//! Lottery domain types.
//!
//! Defines round/ticket/event state and constants used by the execution layer and the
//! simulator.

mod codec;
mod constants;
mod event;
mod round;
mod ticket;

pub use codec::{read_u16_array, read_u64_array, write_u16_array, write_u64_array};
pub use constants::*;
pub use event::*;
pub use round::*;
pub use ticket::*;
