//! Multi-round driver for the luckybox engine.
//!
//! Runs a [`Lottery`] backed by an in-memory ledger and a seeded [`ChaChaOracle`] through a
//! configured number of rounds. Players pick ticket counts and numbers from a seeded RNG, so
//! one seed always replays the same simulation.

use bytes::Buf;
use commonware_codec::{Encode, ReadExt};
use commonware_cryptography::ed25519::PublicKey;
use commonware_utils::hex;
use luckybox_execution::{
    mocks::{create_account_keypair, MemoryLedger},
    ChaChaOracle, LedgerError, Lottery, LotteryConfig, LotteryError, Origin,
};
use luckybox_types::lottery::{Event, BASIS_POINTS, BRACKET_COUNT, MAX_TICKET_NUMBER, MIN_TICKET_NUMBER};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, str::FromStr};
use thiserror::Error;
use tracing::{debug, info, Level};

/// Key seeds reserved for the engine's own accounts; players start after them.
const OPERATOR_KEY_SEED: u64 = 0;
const TREASURY_KEY_SEED: u64 = 1;
const PLAYER_KEY_SEED_OFFSET: u64 = 100;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_rounds() -> u64 {
    3
}

fn default_players() -> usize {
    8
}

fn default_initial_balance() -> u64 {
    1_000_000_000_000
}

fn default_round_length_secs() -> u64 {
    4 * 60 * 60
}

fn default_ticket_price() -> u64 {
    10_000_000
}

fn default_rewards_breakdown() -> [u16; BRACKET_COUNT] {
    [250, 375, 625, 8_750]
}

fn default_treasury_fee_bps() -> u16 {
    2_000
}

fn default_auto_inject() -> bool {
    true
}

fn default_max_tickets_per_player() -> u32 {
    10
}

/// Simulation parameters, as read from YAML.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,

    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_rounds")]
    pub rounds: u64,
    #[serde(default = "default_players")]
    pub players: usize,
    #[serde(default = "default_initial_balance")]
    pub initial_balance: u64,

    #[serde(default = "default_round_length_secs")]
    pub round_length_secs: u64,
    #[serde(default = "default_ticket_price")]
    pub ticket_price: u64,
    #[serde(default = "default_rewards_breakdown")]
    pub rewards_breakdown: [u16; BRACKET_COUNT],
    #[serde(default = "default_treasury_fee_bps")]
    pub treasury_fee_bps: u16,
    #[serde(default = "default_auto_inject")]
    pub auto_inject: bool,

    #[serde(default)]
    pub min_tickets_per_player: u32,
    #[serde(default = "default_max_tickets_per_player")]
    pub max_tickets_per_player: u32,

    /// Where to write the encoded event journal, if anywhere.
    #[serde(default)]
    pub journal: Option<PathBuf>,

    #[serde(default)]
    pub lottery: LotteryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            seed: 0,
            rounds: default_rounds(),
            players: default_players(),
            initial_balance: default_initial_balance(),
            round_length_secs: default_round_length_secs(),
            ticket_price: default_ticket_price(),
            rewards_breakdown: default_rewards_breakdown(),
            treasury_fee_bps: default_treasury_fee_bps(),
            auto_inject: default_auto_inject(),
            min_tickets_per_player: 0,
            max_tickets_per_player: default_max_tickets_per_player(),
            journal: None,
            lottery: LotteryConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("ticket range is inverted (min={min}, max={max})")]
    InvertedTicketRange { min: u32, max: u32 },
    #[error("rewards breakdown too high (total={total})")]
    BreakdownTooHigh { total: u64 },
    #[error("treasury fee too high (got={fee}, max={max})")]
    TreasuryFeeTooHigh { fee: u16, max: u16 },
    #[error("lottery: {0}")]
    Lottery(#[from] luckybox_execution::ConfigError),
}

/// [`Config`] after validation.
#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    pub log_level: Level,
    pub json_logs: bool,
    pub seed: u64,
    pub rounds: u64,
    pub players: usize,
    pub initial_balance: u64,
    pub round_length_secs: u64,
    pub ticket_price: u64,
    pub rewards_breakdown: [u16; BRACKET_COUNT],
    pub treasury_fee_bps: u16,
    pub auto_inject: bool,
    pub min_tickets_per_player: u32,
    pub max_tickets_per_player: u32,
    pub journal: Option<PathBuf>,
    pub lottery: LotteryConfig,
}

fn ensure_nonzero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidNonZero { field, value });
    }
    Ok(())
}

impl Config {
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let log_level = Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
            value: self.log_level.clone(),
        })?;
        ensure_nonzero("rounds", self.rounds)?;
        ensure_nonzero("players", self.players as u64)?;
        ensure_nonzero("round_length_secs", self.round_length_secs)?;
        ensure_nonzero("ticket_price", self.ticket_price)?;
        if self.min_tickets_per_player > self.max_tickets_per_player {
            return Err(ConfigError::InvertedTicketRange {
                min: self.min_tickets_per_player,
                max: self.max_tickets_per_player,
            });
        }
        let total: u64 = self.rewards_breakdown.iter().map(|share| *share as u64).sum();
        if total > BASIS_POINTS {
            return Err(ConfigError::BreakdownTooHigh { total });
        }
        self.lottery.validate()?;
        if self.treasury_fee_bps > self.lottery.max_treasury_fee_bps {
            return Err(ConfigError::TreasuryFeeTooHigh {
                fee: self.treasury_fee_bps,
                max: self.lottery.max_treasury_fee_bps,
            });
        }

        Ok(ValidatedConfig {
            log_level,
            json_logs: self.json_logs,
            seed: self.seed,
            rounds: self.rounds,
            players: self.players,
            initial_balance: self.initial_balance,
            round_length_secs: self.round_length_secs,
            ticket_price: self.ticket_price,
            rewards_breakdown: self.rewards_breakdown,
            treasury_fee_bps: self.treasury_fee_bps,
            auto_inject: self.auto_inject,
            min_tickets_per_player: self.min_tickets_per_player,
            max_tickets_per_player: self.max_tickets_per_player,
            journal: self.journal,
            lottery: self.lottery,
        })
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("engine: {0}")]
    Lottery(#[from] LotteryError),
    #[error("engine config: {0}")]
    Config(#[from] luckybox_execution::ConfigError),
    #[error("randomness request for round {round_id} was never issued")]
    MissingRequest { round_id: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub id: u64,
    pub final_number: u32,
    pub tickets_sold: u64,
    pub amount_collected: u64,
    pub treasury_amount: u64,
    pub rollover_amount: u64,
    pub winners_per_bracket: [u64; BRACKET_COUNT],
    pub rewards_per_bracket: [u64; BRACKET_COUNT],
    /// Paid out to players through claims.
    pub claimed: u64,
    /// Left unclaimed after every player claimed at their best bracket.
    pub unclaimed: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub account: String,
    pub tickets: u64,
    pub balance: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub seed: u64,
    pub rounds: Vec<RoundSummary>,
    pub players: Vec<PlayerSummary>,
    pub treasury_balance: u64,
    pub custody: u64,
    pub all_pending_rewards: u64,
    pub pending_injection_next_lottery: u64,
    pub total_supply: u128,
    #[serde(skip)]
    pub events: Vec<Event>,
}

/// Concatenated encodings of `events`.
pub fn encode_journal(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .flat_map(|event| event.encode().to_vec())
        .collect()
}

/// Decode a journal written by [`encode_journal`].
pub fn decode_journal(mut bytes: &[u8]) -> Result<Vec<Event>, commonware_codec::Error> {
    let mut events = Vec::new();
    while bytes.has_remaining() {
        events.push(Event::read(&mut bytes)?);
    }
    Ok(events)
}

fn account_key(index: usize) -> PublicKey {
    create_account_keypair(PLAYER_KEY_SEED_OFFSET + index as u64).1
}

pub fn run(config: &ValidatedConfig) -> Result<Summary, SimulationError> {
    let (_, operator) = create_account_keypair(OPERATOR_KEY_SEED);
    let (_, treasury) = create_account_keypair(TREASURY_KEY_SEED);
    let players: Vec<PublicKey> = (0..config.players).map(account_key).collect();

    let mut ledger = MemoryLedger::new();
    for player in &players {
        ledger.fund(player, config.initial_balance);
    }
    let total_supply = ledger.supply();
    let mut lottery = Lottery::new(
        config.lottery.clone(),
        operator.clone(),
        treasury.clone(),
        ChaChaOracle::new(config.seed),
        ledger,
    )?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut tickets_bought = vec![0u64; players.len()];
    let mut events = Vec::new();
    let mut rounds = Vec::new();
    let mut now = 0u64;

    for _ in 0..config.rounds {
        let end_time = now + config.round_length_secs;
        events.extend(lottery.start_round(
            &Origin::new(operator.clone(), now),
            end_time,
            config.ticket_price,
            config.rewards_breakdown,
            config.treasury_fee_bps,
        )?);
        let round_id = lottery.current_round_id();

        for (index, player) in players.iter().enumerate() {
            let count = rng.gen_range(config.min_tickets_per_player..=config.max_tickets_per_player);
            let numbers: Vec<u32> = (0..count)
                .map(|_| rng.gen_range(MIN_TICKET_NUMBER..=MAX_TICKET_NUMBER))
                .collect();
            let batch = lottery.max_tickets_per_batch() as usize;
            for chunk in numbers.chunks(batch) {
                match lottery.buy_tickets(&Origin::new(player.clone(), now), chunk) {
                    Ok(purchased) => {
                        tickets_bought[index] += chunk.len() as u64;
                        events.extend(purchased);
                    }
                    Err(LotteryError::Ledger(LedgerError::InsufficientBalance { .. })) => {
                        debug!(round_id, player = index, "player out of funds");
                        break;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }

        now = end_time;
        let operator_origin = Origin::new(operator.clone(), now);
        let closed = lottery.close_round(&operator_origin, round_id)?;
        let request = closed
            .iter()
            .find_map(|event| match event {
                Event::RoundClosed { request_id, .. } => Some(*request_id),
                _ => None,
            })
            .ok_or(SimulationError::MissingRequest { round_id })?;
        events.extend(closed);
        lottery.randomness_mut().fulfill(request);

        let drawn =
            lottery.draw_final_number_and_make_claimable(&operator_origin, round_id, config.auto_inject)?;
        let (treasury_amount, rollover_amount) = drawn
            .iter()
            .find_map(|event| match event {
                Event::NumberDrawn {
                    treasury_amount,
                    rollover_amount,
                    ..
                } => Some((*treasury_amount, *rollover_amount)),
                _ => None,
            })
            .unwrap_or_default();
        events.extend(drawn);

        let mut claimed = 0u64;
        for player in &players {
            for event in lottery.claim_all_tickets(&Origin::new(player.clone(), now), round_id)? {
                if let Event::TicketsClaimed { amount, .. } = event {
                    claimed += amount;
                }
                events.push(event);
            }
        }

        let round = lottery.round(round_id);
        info!(
            round_id,
            final_number = round.final_number,
            collected = round.amount_collected,
            claimed,
            "round simulated"
        );
        rounds.push(RoundSummary {
            id: round_id,
            final_number: round.final_number,
            tickets_sold: round.first_ticket_id_next_round - round.first_ticket_id,
            amount_collected: round.amount_collected,
            treasury_amount,
            rollover_amount,
            winners_per_bracket: round.winners_per_bracket,
            rewards_per_bracket: round.rewards_per_bracket,
            claimed,
            unclaimed: round.pending_rewards,
        });
        now += 1;
    }

    let ledger = lottery.ledger();
    let players = players
        .iter()
        .zip(tickets_bought)
        .map(|(player, tickets)| PlayerSummary {
            account: hex(player.as_ref()),
            tickets,
            balance: ledger.balance(player),
        })
        .collect();
    Ok(Summary {
        seed: config.seed,
        rounds,
        players,
        treasury_balance: ledger.balance(&treasury),
        custody: ledger.custody(),
        all_pending_rewards: lottery.all_pending_rewards(),
        pending_injection_next_lottery: lottery.pending_injection_next_lottery(),
        total_supply,
        events,
    })
}
