//! Draw settlement.
//!
//! Turns one drawn number and the per-bracket ticket histograms of a round into a reward
//! table. Brackets are visited from the strictest (3) down to the loosest (0):
//! - a bracket with winners keeps its share of the pool plus anything carried down to it,
//!   split evenly across its winners;
//! - a bracket without winners carries its share down to the next bracket;
//! - whatever no bracket could pay (carry past bracket 0, division remainders, the part of
//!   the pool the breakdown does not allocate) is rollover.
//!
//! Every unit is accounted for:
//! `treasury + Σ rewards_per_bracket + rollover == amount_collected`.

use luckybox_types::lottery::{BASIS_POINTS, BRACKET_COUNT};
use std::collections::BTreeMap;

use crate::numbers::bridge;
use crate::LotteryError;

/// Ticket counts keyed by bracket key, one table per bracket.
///
/// Built incrementally as tickets are sold so settlement never scans tickets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BracketHistogram {
    counts: [BTreeMap<u32, u64>; BRACKET_COUNT],
}

impl BracketHistogram {
    pub fn record(&mut self, number: u32) {
        for (bracket, counts) in self.counts.iter_mut().enumerate() {
            *counts.entry(bridge(number, bracket)).or_default() += 1;
        }
    }

    pub fn count(&self, bracket: usize, key: u32) -> u64 {
        self.counts[bracket].get(&key).copied().unwrap_or(0)
    }

    /// Tickets matching `final_number` at `bracket`.
    pub fn winners(&self, final_number: u32, bracket: usize) -> u64 {
        self.count(bracket, bridge(final_number, bracket))
    }
}

/// Result of settling one round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settlement {
    pub final_number: u32,
    pub treasury_amount: u64,
    pub winners_per_bracket: [u64; BRACKET_COUNT],
    /// Amount payable per bracket; always a multiple of the bracket's winner count.
    pub rewards_per_bracket: [u64; BRACKET_COUNT],
    pub rollover_amount: u64,
}

impl Settlement {
    pub fn total_rewards(&self) -> u64 {
        self.rewards_per_bracket.iter().sum()
    }

    /// Distinct winning tickets. Any ticket that matches at some bracket matches at bracket 0.
    pub fn winning_tickets(&self) -> u64 {
        self.winners_per_bracket[0]
    }
}

pub fn settle(
    final_number: u32,
    amount_collected: u64,
    rewards_breakdown: &[u16; BRACKET_COUNT],
    treasury_fee_bps: u16,
    histogram: &BracketHistogram,
) -> Result<Settlement, LotteryError> {
    let breakdown_total: u64 = rewards_breakdown.iter().map(|share| *share as u64).sum();
    if breakdown_total > BASIS_POINTS {
        return Err(LotteryError::RewardBreakdownTooHigh {
            total: breakdown_total,
        });
    }
    if treasury_fee_bps as u64 > BASIS_POINTS {
        return Err(LotteryError::TreasuryFeeTooHigh {
            fee: treasury_fee_bps,
            max: BASIS_POINTS as u16,
        });
    }

    let bps = BASIS_POINTS as u128;
    let collected = amount_collected as u128;
    let treasury = collected * treasury_fee_bps as u128 / bps;
    let pool = collected - treasury;

    let mut settlement = Settlement {
        final_number,
        treasury_amount: treasury as u64,
        ..Default::default()
    };
    let mut allocated = 0u128;
    let mut carry = 0u128;
    let mut rollover = 0u128;
    for bracket in (0..BRACKET_COUNT).rev() {
        let share = pool * rewards_breakdown[bracket] as u128 / bps;
        allocated += share;
        let amount = share + carry;
        let winners = histogram.winners(final_number, bracket);
        if winners == 0 {
            carry = amount;
            continue;
        }
        carry = 0;
        let paid = amount / winners as u128 * winners as u128;
        settlement.winners_per_bracket[bracket] = winners;
        settlement.rewards_per_bracket[bracket] = paid as u64;
        rollover += amount - paid;
    }
    rollover += carry + (pool - allocated);
    settlement.rollover_amount = rollover as u64;

    debug_assert_eq!(
        treasury + settlement.total_rewards() as u128 + rollover,
        collected,
        "settlement must account for every unit collected"
    );
    Ok(settlement)
}
