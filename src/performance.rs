use crate::models::{ClosedTrade, ExitReason};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Aggregate statistics over a list of closed trades.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub avg_return: f64,
    pub median_return: f64,
    pub return_std_dev: f64,
    pub best_return: f64,
    pub worst_return: f64,
    /// Average hold periods over trades that recorded them (risk-managed runs).
    pub avg_periods_held: f64,
    pub exit_reasons: HashMap<ExitReason, usize>,
}

pub struct PerformanceCalculator;

impl PerformanceCalculator {
    pub fn summarize(trades: &[ClosedTrade]) -> PerformanceSummary {
        let returns: Vec<f64> = trades
            .iter()
            .map(|trade| trade.net_return)
            .filter(|value| value.is_finite())
            .collect();

        let total_trades = trades.len();
        let winning_trades = returns.iter().filter(|&&value| value > 0.0).count();
        let losing_trades = returns.iter().filter(|&&value| value < 0.0).count();
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64
        } else {
            0.0
        };

        let (avg_return, return_std_dev) = if returns.is_empty() {
            (0.0, 0.0)
        } else {
            let mean = returns.clone().mean();
            let std_dev = if returns.len() > 1 {
                returns.clone().std_dev()
            } else {
                0.0
            };
            (mean, std_dev)
        };

        let best_return = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let best_return = if best_return.is_finite() { best_return } else { 0.0 };
        let worst_return = returns.iter().copied().fold(f64::INFINITY, f64::min);
        let worst_return = if worst_return.is_finite() { worst_return } else { 0.0 };

        let hold_periods: Vec<f64> = trades
            .iter()
            .filter_map(|trade| trade.periods_held)
            .map(|periods| periods as f64)
            .collect();
        let avg_periods_held = Self::average(&hold_periods);

        let mut exit_reasons: HashMap<ExitReason, usize> = HashMap::new();
        for trade in trades {
            if let Some(reason) = trade.exit_reason {
                *exit_reasons.entry(reason).or_insert(0) += 1;
            }
        }

        PerformanceSummary {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            avg_return,
            median_return: Self::median(&returns),
            return_std_dev,
            best_return,
            worst_return,
            avg_periods_held,
            exit_reasons,
        }
    }

    fn average(values: &[f64]) -> f64 {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    fn median(values: &[f64]) -> f64 {
        let mut sorted: Vec<f64> = values.to_vec();
        if sorted.is_empty() {
            return 0.0;
        }

        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }
}
