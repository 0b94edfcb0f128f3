use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SimulationError;

/// Per-period signal produced upstream: 1 = bullish, 0 = not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Bullish,
    Neutral,
}

impl Signal {
    /// Map the raw binary value from the feature pipeline onto a signal.
    /// Anything outside {0, 1} is a precondition violation.
    pub fn from_binary(value: i64) -> Result<Self, SimulationError> {
        match value {
            1 => Ok(Signal::Bullish),
            0 => Ok(Signal::Neutral),
            other => Err(SimulationError::InvalidSignal { value: other }),
        }
    }

    pub fn as_binary(self) -> u8 {
        match self {
            Signal::Bullish => 1,
            Signal::Neutral => 0,
        }
    }

    pub fn is_bullish(self) -> bool {
        matches!(self, Signal::Bullish)
    }
}

/// One row of the per-instrument time series consumed by the simulator.
///
/// Field names are a contract with the upstream feature pipeline; renaming
/// requires a mapping layer there, not logic changes here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedSignalRecord {
    pub instrument_id: String,
    pub timestamp: DateTime<Utc>,
    /// Adjusted close; must be positive and finite.
    pub price: f64,
    pub signal: Signal,
    /// Optional fundamental indicator (e.g. return on equity).
    #[serde(default)]
    pub fundamental_indicator: Option<f64>,
}

/// The transient state of an active trade, owned exclusively by the
/// simulator between entry and exit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenPosition {
    pub entry_timestamp: DateTime<Utc>,
    pub entry_price: f64,
    /// Fixed-risk sizing; the baseline variant does not size positions.
    pub position_size: Option<f64>,
    /// Fundamental indicator captured at entry (risk-managed variant).
    pub entry_fundamental: Option<f64>,
    /// Starts at 1 on the entry record, incremented once per record held.
    pub periods_held: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    #[serde(rename = "stop_loss/take_profit")]
    StopLossTakeProfit,
    #[serde(rename = "fundamentals_change")]
    FundamentalsChange,
    #[serde(rename = "max_hold_period")]
    MaxHoldPeriod,
    #[serde(rename = "signal_change")]
    SignalChange,
    #[serde(rename = "end_of_data")]
    EndOfData,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::StopLossTakeProfit => "stop_loss/take_profit",
            ExitReason::FundamentalsChange => "fundamentals_change",
            ExitReason::MaxHoldPeriod => "max_hold_period",
            ExitReason::SignalChange => "signal_change",
            ExitReason::EndOfData => "end_of_data",
        }
    }
}

impl FromStr for ExitReason {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stop_loss/take_profit" => Ok(ExitReason::StopLossTakeProfit),
            "fundamentals_change" => Ok(ExitReason::FundamentalsChange),
            "max_hold_period" => Ok(ExitReason::MaxHoldPeriod),
            "signal_change" => Ok(ExitReason::SignalChange),
            "end_of_data" => Ok(ExitReason::EndOfData),
            other => Err(anyhow!("Unknown exit reason '{}'", other)),
        }
    }
}

/// A completed round trip, immutable once emitted.
///
/// `net_return` is `exit_price / entry_price - 1` minus round-trip friction
/// (transaction cost plus slippage, charged once per side). The risk-managed
/// variant additionally records sizing, the hold counter and the exit reason;
/// those fields stay `None` for baseline runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub instrument_id: String,
    pub entry_timestamp: DateTime<Utc>,
    pub exit_timestamp: DateTime<Utc>,
    pub net_return: f64,
    #[serde(default)]
    pub position_size: Option<f64>,
    #[serde(default)]
    pub periods_held: Option<u32>,
    #[serde(default)]
    pub exit_reason: Option<ExitReason>,
}
