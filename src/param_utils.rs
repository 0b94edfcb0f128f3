use std::collections::HashMap;

/// Get a parameter value with a default fallback
pub fn get_param(params: &HashMap<String, f64>, key: &str, default: f64) -> f64 {
    params.get(key).copied().unwrap_or(default)
}

/// Extract a parameter as f64, clamped to a range with finite checks
pub fn get_param_clamped(
    params: &HashMap<String, f64>,
    key: &str,
    default: f64,
    min: f64,
    max: f64,
) -> f64 {
    let raw = params.get(key).copied().unwrap_or(default);
    if !raw.is_finite() {
        return default;
    }
    raw.clamp(min, max)
}

/// Get a parameter as u32 with a minimum value
pub fn get_u32_param_min(params: &HashMap<String, f64>, key: &str, default: u32, min: u32) -> u32 {
    params
        .get(key)
        .copied()
        .filter(|v| v.is_finite())
        .map(|v| v.round().max(min as f64) as u32)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_get_param_defaults() {
        let map = params(&[("slippage", 0.002)]);
        assert_eq!(get_param(&map, "slippage", 0.0), 0.002);
        assert_eq!(get_param(&map, "transactionCost", 0.001), 0.001);
    }

    #[test]
    fn test_get_param_clamped_rejects_non_finite() {
        let map = params(&[("transactionCost", f64::NAN), ("slippage", -0.5)]);
        assert_eq!(get_param_clamped(&map, "transactionCost", 0.0, 0.0, 1.0), 0.0);
        assert_eq!(get_param_clamped(&map, "slippage", 0.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_get_u32_param_min_rounds_and_floors() {
        let map = params(&[("maxHoldPeriods", 2.6), ("zero", 0.0)]);
        assert_eq!(get_u32_param_min(&map, "maxHoldPeriods", 4, 1), 3);
        assert_eq!(get_u32_param_min(&map, "zero", 4, 1), 1);
        assert_eq!(get_u32_param_min(&map, "missing", 4, 1), 4);
    }
}
