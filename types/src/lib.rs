//! Common types used throughout luckybox.
//!
//! Defines the lottery data model (rounds, tickets, events), protocol constants, and their
//! canonical binary encodings.

pub mod lottery;

pub use lottery::*;
