use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Market-capitalization bucket with inclusive lower bounds:
/// Mega >= $200B, Big >= $10B, Mid >= $2B, Small >= $250M, Micro >= $50M,
/// everything below is Nano.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketCapCategory {
    Mega,
    Big,
    Mid,
    Small,
    Micro,
    Nano,
}

/// Buckets kept by default when screening the tradable universe.
pub const DEFAULT_TRADABLE_CATEGORIES: [MarketCapCategory; 5] = [
    MarketCapCategory::Mega,
    MarketCapCategory::Big,
    MarketCapCategory::Mid,
    MarketCapCategory::Small,
    MarketCapCategory::Micro,
];

impl MarketCapCategory {
    pub fn categorize(market_cap: f64) -> Self {
        if market_cap >= 200_000_000_000.0 {
            MarketCapCategory::Mega
        } else if market_cap >= 10_000_000_000.0 {
            MarketCapCategory::Big
        } else if market_cap >= 2_000_000_000.0 {
            MarketCapCategory::Mid
        } else if market_cap >= 250_000_000.0 {
            MarketCapCategory::Small
        } else if market_cap >= 50_000_000.0 {
            MarketCapCategory::Micro
        } else {
            MarketCapCategory::Nano
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCapCategory::Mega => "Mega-cap",
            MarketCapCategory::Big => "Big-cap",
            MarketCapCategory::Mid => "Mid-cap",
            MarketCapCategory::Small => "Small-cap",
            MarketCapCategory::Micro => "Micro-cap",
            MarketCapCategory::Nano => "Nano-cap",
        }
    }
}

impl FromStr for MarketCapCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Mega-cap" => Ok(MarketCapCategory::Mega),
            "Big-cap" => Ok(MarketCapCategory::Big),
            "Mid-cap" => Ok(MarketCapCategory::Mid),
            "Small-cap" => Ok(MarketCapCategory::Small),
            "Micro-cap" => Ok(MarketCapCategory::Micro),
            "Nano-cap" => Ok(MarketCapCategory::Nano),
            other => Err(anyhow!("Unknown market cap category '{}'", other)),
        }
    }
}

/// Linearly interpolated quantile over an ascending-sorted slice
/// (the same definition pandas uses for `quantile`).
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let fraction = position - lower as f64;
        sorted[lower] + fraction * (sorted[upper] - sorted[lower])
    }
}

/// Cap values below the lower quantile and above the upper quantile.
///
/// Quantiles are computed over the finite values only; non-finite entries
/// pass through unchanged. An input with no finite values comes back as-is.
pub fn winsorize(values: &[f64], lower_quantile: f64, upper_quantile: f64) -> Vec<f64> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return values.to_vec();
    }
    finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let lower_bound = quantile(&finite, lower_quantile);
    let upper_bound = quantile(&finite, upper_quantile);

    values
        .iter()
        .map(|&value| {
            if value.is_finite() {
                value.clamp(lower_bound, upper_bound)
            } else {
                value
            }
        })
        .collect()
}
