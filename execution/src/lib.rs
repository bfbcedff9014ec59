//! LuckyBox execution layer.
//!
//! This crate contains the lottery engine ([`Lottery`]): ticket pricing, bracket settlement,
//! the round state machine, and claims. Token custody and randomness are external and reached
//! through the [`Ledger`] and [`RandomnessAdapter`] traits.
//!
//! ## Determinism requirements
//! - Do not read wall-clock time inside the engine; callers pass `now` in [`Origin`].
//! - Randomness only enters through a fulfilled [`RandomnessAdapter`] request.
//! - Only ordered collections are used, so views and settlement never depend on hash order.
//!
//! ## Accounting invariant
//! Every unit taken in is either paid to the treasury, owed to a winning ticket
//! (`all_pending_rewards`), held for the next round (`pending_injection_next_lottery`), or
//! part of a round that has not been drawn yet.
//!
//! ## Minimal round (example)
//! ```rust,ignore
//! # #[cfg(feature = "mocks")]
//! # {
//! use luckybox_execution::{mocks::{create_account_keypair, FixedRandomness, MemoryLedger}, *};
//!
//! let (_, operator) = create_account_keypair(0);
//! let (_, player) = create_account_keypair(1);
//! let mut ledger = MemoryLedger::new();
//! ledger.fund(&player, 1_000_000_000);
//! let mut lottery = Lottery::new(
//!     LotteryConfig::default(),
//!     operator.clone(),
//!     operator.clone(),
//!     FixedRandomness::new(11_975),
//!     ledger,
//! )?;
//! lottery.start_round(&Origin::new(operator.clone(), 0), 100, 10_000_000, [1_000, 2_000, 3_000, 4_000], 0)?;
//! lottery.buy_tickets(&Origin::new(player.clone(), 1), &[11_975])?;
//! lottery.close_round(&Origin::new(operator.clone(), 100), 1)?;
//! lottery.draw_final_number_and_make_claimable(&Origin::new(operator, 100), 1, true)?;
//! lottery.claim_all_tickets(&Origin::new(player, 101), 1)?;
//! # }
//! ```

mod config;
mod error;
mod ledger;
mod lottery;
pub mod numbers;
pub mod pricing;
mod randomness;
pub mod settlement;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use config::{ConfigError, LotteryConfig};
pub use error::LotteryError;
pub use ledger::{Ledger, LedgerError};
pub use lottery::{Lottery, Origin, WalletTicket};
pub use randomness::{ChaChaOracle, RandomnessAdapter, RequestId};
pub use settlement::{settle, BracketHistogram, Settlement};
