use crate::config::{CostModel, RiskConfig};
use crate::error::SimulationError;
use crate::models::{ClosedTrade, ExitReason, OpenPosition, PricedSignalRecord, Signal};
use crate::sizing::position_size;
use chrono::{DateTime, Utc};

/// Tagged position state: at most one open position exists at any point.
/// Using an explicit state instead of a nullable field means every exit path
/// drops the whole position, hold counter included.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PositionState {
    Flat,
    Long(OpenPosition),
}

fn validate_record(
    record: &PricedSignalRecord,
    index: usize,
    instrument_id: &str,
    previous_timestamp: Option<DateTime<Utc>>,
) -> Result<(), SimulationError> {
    if record.instrument_id != instrument_id {
        return Err(SimulationError::InstrumentMismatch {
            index,
            expected: instrument_id.to_string(),
            found: record.instrument_id.clone(),
        });
    }
    if !record.price.is_finite() || record.price <= 0.0 {
        return Err(SimulationError::InvalidPrice {
            instrument_id: instrument_id.to_string(),
            index,
            price: record.price,
        });
    }
    if let Some(previous) = previous_timestamp {
        if record.timestamp < previous {
            return Err(SimulationError::TimestampOrder {
                instrument_id: instrument_id.to_string(),
                index,
                previous,
                current: record.timestamp,
            });
        }
    }
    Ok(())
}

fn close_position(
    instrument_id: &str,
    position: &OpenPosition,
    exit_price: f64,
    exit_timestamp: DateTime<Utc>,
    friction: f64,
    exit_reason: Option<ExitReason>,
) -> ClosedTrade {
    // Risk-managed closes always carry a reason; baseline closes never do,
    // and omit the hold counter along with it.
    ClosedTrade {
        instrument_id: instrument_id.to_string(),
        entry_timestamp: position.entry_timestamp,
        exit_timestamp,
        net_return: exit_price / position.entry_price - 1.0 - friction,
        position_size: position.position_size,
        periods_held: exit_reason.map(|_| position.periods_held),
        exit_reason,
    }
}

/// Baseline simulation: buy when the signal turns bullish while flat, sell
/// when it turns neutral, force-close any position left open at the end of
/// the data.
///
/// Records must be a single instrument's sequence in non-decreasing timestamp
/// order with positive prices; malformed input fails fast without emitting a
/// partial trade list.
pub fn simulate_baseline(
    records: &[PricedSignalRecord],
    cost: &CostModel,
) -> Result<Vec<ClosedTrade>, SimulationError> {
    let friction = cost.round_trip_friction();
    let mut trades = Vec::new();
    let Some(first) = records.first() else {
        return Ok(trades);
    };
    let instrument_id = first.instrument_id.as_str();
    let mut state = PositionState::Flat;
    let mut previous_timestamp = None;

    for (index, record) in records.iter().enumerate() {
        validate_record(record, index, instrument_id, previous_timestamp)?;
        previous_timestamp = Some(record.timestamp);

        state = match state {
            PositionState::Flat => {
                if record.signal.is_bullish() {
                    PositionState::Long(OpenPosition {
                        entry_timestamp: record.timestamp,
                        entry_price: record.price,
                        position_size: None,
                        entry_fundamental: None,
                        periods_held: 1,
                    })
                } else {
                    PositionState::Flat
                }
            }
            PositionState::Long(mut position) => {
                position.periods_held += 1;
                if record.signal.is_bullish() {
                    PositionState::Long(position)
                } else {
                    trades.push(close_position(
                        instrument_id,
                        &position,
                        record.price,
                        record.timestamp,
                        friction,
                        None,
                    ));
                    PositionState::Flat
                }
            }
        };
    }

    if let PositionState::Long(position) = state {
        let last = records.last().expect("records are not empty while a position is open");
        trades.push(close_position(
            instrument_id,
            &position,
            last.price,
            last.timestamp,
            friction,
            None,
        ));
    }

    Ok(trades)
}

/// Exit checks for the risk-managed variant, in fixed priority order.
/// Risk limits dominate the discretionary checks so downside is bounded
/// before signal or fundamentals logic is consulted; max-hold is a backstop
/// after those so a position cannot be held indefinitely.
fn risk_exit_reason(
    position: &OpenPosition,
    record: &PricedSignalRecord,
    config: &RiskConfig,
) -> Option<ExitReason> {
    let unrealized = record.price / position.entry_price - 1.0;
    if unrealized <= config.stop_loss || unrealized >= config.take_profit {
        return Some(ExitReason::StopLossTakeProfit);
    }

    // A >= 20% deterioration of the fundamental indicator while the signal is
    // still bullish. Requires both the entry and current values; a missing
    // reading on either side disables this check for the position.
    if record.signal.is_bullish() {
        if let (Some(entry), Some(current)) =
            (position.entry_fundamental, record.fundamental_indicator)
        {
            if current < 0.8 * entry {
                return Some(ExitReason::FundamentalsChange);
            }
        }
    }

    if position.periods_held >= config.max_hold_periods {
        return Some(ExitReason::MaxHoldPeriod);
    }

    if !record.signal.is_bullish() {
        return Some(ExitReason::SignalChange);
    }

    None
}

/// Risk-managed simulation: the same two-state skeleton as
/// [`simulate_baseline`], with fixed-risk position sizing on entry and exit
/// conditions evaluated in priority order on every record held. A position
/// still open after the last record is force-closed with reason
/// `end_of_data`.
pub fn simulate_risk_managed(
    records: &[PricedSignalRecord],
    config: &RiskConfig,
) -> Result<Vec<ClosedTrade>, SimulationError> {
    let friction = config.cost.round_trip_friction();
    let mut trades = Vec::new();
    let Some(first) = records.first() else {
        return Ok(trades);
    };
    let instrument_id = first.instrument_id.as_str();
    let mut state = PositionState::Flat;
    let mut previous_timestamp = None;

    for (index, record) in records.iter().enumerate() {
        validate_record(record, index, instrument_id, previous_timestamp)?;
        previous_timestamp = Some(record.timestamp);

        state = match state {
            PositionState::Flat => {
                if record.signal.is_bullish() {
                    PositionState::Long(OpenPosition {
                        entry_timestamp: record.timestamp,
                        entry_price: record.price,
                        position_size: Some(position_size(
                            record.price,
                            config.stop_loss,
                            config.risk_per_trade,
                        )),
                        entry_fundamental: record.fundamental_indicator,
                        periods_held: 1,
                    })
                } else {
                    PositionState::Flat
                }
            }
            PositionState::Long(mut position) => {
                position.periods_held += 1;
                match risk_exit_reason(&position, record, config) {
                    Some(reason) => {
                        trades.push(close_position(
                            instrument_id,
                            &position,
                            record.price,
                            record.timestamp,
                            friction,
                            Some(reason),
                        ));
                        PositionState::Flat
                    }
                    None => PositionState::Long(position),
                }
            }
        };
    }

    if let PositionState::Long(position) = state {
        let last = records.last().expect("records are not empty while a position is open");
        trades.push(close_position(
            instrument_id,
            &position,
            last.price,
            last.timestamp,
            friction,
            Some(ExitReason::EndOfData),
        ));
    }

    Ok(trades)
}
