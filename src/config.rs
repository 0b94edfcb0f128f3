use crate::param_utils::{get_param, get_param_clamped, get_u32_param_min};
use anyhow::{anyhow, Result};
use log::warn;
use serde_json::Value;
use std::collections::HashMap;

/// Round-trip friction model shared by both simulator variants.
///
/// `transaction_cost` and `slippage` are per-side rates; a completed trade is
/// charged both once on entry and once on exit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostModel {
    pub transaction_cost: f64,
    pub slippage: f64,
}

impl CostModel {
    pub fn new(transaction_cost: f64, slippage: f64) -> Self {
        Self {
            transaction_cost,
            slippage,
        }
    }

    /// Create a cost model from a parameter map
    pub fn from_parameters(parameters: &HashMap<String, f64>) -> Self {
        Self {
            transaction_cost: get_param_clamped(parameters, "transactionCost", 0.0, 0.0, 1.0),
            slippage: get_param_clamped(parameters, "slippage", 0.0, 0.0, 1.0),
        }
    }

    /// Total friction charged on a completed trade (entry side plus exit side).
    pub fn round_trip_friction(&self) -> f64 {
        2.0 * (self.transaction_cost + self.slippage)
    }
}

/// Configuration for the risk-managed simulator variant
#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    pub cost: CostModel,
    /// Exit threshold on unrealized return; expected negative.
    pub stop_loss: f64,
    /// Exit threshold on unrealized return; expected positive.
    pub take_profit: f64,
    /// Backstop so a position cannot be held indefinitely.
    pub max_hold_periods: u32,
    /// Currency amount risked per trade, used for fixed-risk sizing.
    pub risk_per_trade: f64,
    /// Accepted but not consulted by the core logic; reserved for
    /// portfolio-level sizing.
    pub account_balance: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            cost: CostModel::default(),
            stop_loss: -0.05,
            take_profit: 0.10,
            max_hold_periods: 4,
            risk_per_trade: 1000.0,
            account_balance: 100000.0,
        }
    }
}

impl RiskConfig {
    /// Create a risk configuration from a parameter map
    pub fn from_parameters(parameters: &HashMap<String, f64>) -> Self {
        Self {
            cost: CostModel::from_parameters(parameters),
            stop_loss: get_param(parameters, "stopLoss", -0.05),
            take_profit: get_param(parameters, "takeProfit", 0.10),
            max_hold_periods: get_u32_param_min(parameters, "maxHoldPeriods", 4, 1),
            risk_per_trade: get_param(parameters, "riskPerTrade", 1000.0),
            account_balance: get_param(parameters, "accountBalance", 100000.0),
        }
    }
}

fn normalize_parameter_map(raw: HashMap<String, Value>) -> HashMap<String, f64> {
    let mut cleaned = HashMap::with_capacity(raw.len());

    for (key, value) in raw.into_iter() {
        if let Some(num) = value.as_f64() {
            if num.is_finite() {
                cleaned.insert(key, num);
            } else {
                warn!(
                    "Skipping parameter `{}` due to non-finite numeric value {}",
                    key, value
                );
            }
            continue;
        }

        if let Some(text) = value.as_str() {
            match text.trim().parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => {
                    cleaned.insert(key, parsed);
                }
                _ => {
                    warn!(
                        "Skipping parameter `{}` due to non-numeric string value `{}`",
                        key, text
                    );
                }
            }
            continue;
        }

        if let Some(boolean) = value.as_bool() {
            cleaned.insert(key, if boolean { 1.0 } else { 0.0 });
            continue;
        }

        warn!("Skipping parameter `{}` due to unsupported value {}", key, value);
    }

    cleaned
}

/// Parse a JSON object of simulation parameters into the flat numeric map
/// consumed by [`CostModel::from_parameters`] and [`RiskConfig::from_parameters`].
pub fn parse_parameter_map_from_json(json: &str) -> Result<HashMap<String, f64>> {
    let raw: HashMap<String, Value> =
        serde_json::from_str(json).map_err(|error| anyhow!("Invalid parameter JSON: {}", error))?;
    Ok(normalize_parameter_map(raw))
}
