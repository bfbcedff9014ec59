use luckybox_types::lottery::{
    BASIS_POINTS, DEFAULT_MAX_TICKETS_PER_BATCH, DEFAULT_MAX_TREASURY_FEE_BPS, DISCOUNT_DIVISOR,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_max_tickets_per_batch() -> u32 {
    DEFAULT_MAX_TICKETS_PER_BATCH
}

fn default_max_treasury_fee_bps() -> u16 {
    DEFAULT_MAX_TREASURY_FEE_BPS
}

/// Engine limits fixed at construction. `max_tickets_per_batch` can later be changed by the operator.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LotteryConfig {
    #[serde(default = "default_max_tickets_per_batch")]
    pub max_tickets_per_batch: u32,
    /// Ceiling on the treasury fee any round may be started with.
    #[serde(default = "default_max_treasury_fee_bps")]
    pub max_treasury_fee_bps: u16,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            max_tickets_per_batch: default_max_tickets_per_batch(),
            max_treasury_fee_bps: default_max_treasury_fee_bps(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be in {min}..={max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

fn ensure_in_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl LotteryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_in_range(
            "max_tickets_per_batch",
            self.max_tickets_per_batch as u64,
            1,
            DISCOUNT_DIVISOR,
        )?;
        ensure_in_range(
            "max_treasury_fee_bps",
            self.max_treasury_fee_bps as u64,
            0,
            BASIS_POINTS,
        )?;
        Ok(())
    }
}
