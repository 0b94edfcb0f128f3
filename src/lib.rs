//! Trade simulation engine for equity strategy research.
//!
//! The upstream feature pipeline produces, per tradable instrument, a
//! time-ordered sequence of [`models::PricedSignalRecord`]s; this crate turns
//! that stream into discrete [`models::ClosedTrade`]s via a two-state
//! (flat/long) simulator. Two policy variants share the event loop:
//! [`simulator::simulate_baseline`] exits only on a signal flip, while
//! [`simulator::simulate_risk_managed`] layers stop-loss/take-profit,
//! fundamentals-deterioration and maximum-hold exits on top, with fixed-risk
//! position sizing. [`batch::run_batch`] fans the simulation out across
//! instruments with per-instrument failure isolation.

pub mod batch;
pub mod config;
pub mod error;
pub mod feature_utils;
pub mod models;
pub mod param_utils;
pub mod performance;
pub mod simulator;
pub mod sizing;

pub use batch::{run_batch, InstrumentRun, SimulationVariant};
pub use config::{CostModel, RiskConfig};
pub use error::SimulationError;
pub use models::{ClosedTrade, ExitReason, OpenPosition, PricedSignalRecord, Signal};
pub use simulator::{simulate_baseline, simulate_risk_managed};
pub use sizing::position_size;
