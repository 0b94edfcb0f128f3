use chrono::{DateTime, Utc};
use thiserror::Error;

/// Precondition violations in the input record stream.
///
/// The simulator is defined only for well-formed input; malformed data fails
/// fast instead of producing a distorted trade list. There is no repair or
/// retry path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("record {index} for {instrument_id} has non-positive or non-finite price {price}")]
    InvalidPrice {
        instrument_id: String,
        index: usize,
        price: f64,
    },

    #[error(
        "record {index} for {instrument_id} moves backwards in time ({current} before {previous})"
    )]
    TimestampOrder {
        instrument_id: String,
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    #[error("record {index} belongs to {found}, expected a sequence for {expected}")]
    InstrumentMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("signal value {value} is not binary")]
    InvalidSignal { value: i64 },
}
