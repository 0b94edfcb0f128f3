use crate::config::{CostModel, RiskConfig};
use crate::error::SimulationError;
use crate::models::{ClosedTrade, PricedSignalRecord};
use crate::simulator::{simulate_baseline, simulate_risk_managed};
use log::warn;
use rayon::prelude::*;
use std::collections::HashMap;

/// Which simulator to run for every instrument in a batch.
#[derive(Debug, Clone)]
pub enum SimulationVariant {
    Baseline(CostModel),
    RiskManaged(RiskConfig),
}

/// Outcome of one instrument's simulation. A failed instrument carries its
/// error here instead of aborting the rest of the batch.
#[derive(Debug)]
pub struct InstrumentRun {
    pub instrument_id: String,
    pub outcome: Result<Vec<ClosedTrade>, SimulationError>,
}

/// Run one simulation per instrument over a mixed record stream.
///
/// Records are grouped by instrument in first-seen order and the groups are
/// simulated in parallel; instrument runs share no mutable state, so the only
/// coordination is collecting the results. Results come back in the same
/// first-seen instrument order. Per-instrument preconditions (timestamp
/// order, positive prices) are still checked inside the simulator; a
/// violation fails that instrument's run only.
pub fn run_batch(records: &[PricedSignalRecord], variant: &SimulationVariant) -> Vec<InstrumentRun> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<PricedSignalRecord>> = HashMap::new();
    for record in records {
        groups
            .entry(record.instrument_id.clone())
            .or_insert_with(|| {
                order.push(record.instrument_id.clone());
                Vec::new()
            })
            .push(record.clone());
    }

    order
        .into_par_iter()
        .map(|instrument_id| {
            let instrument_records = groups
                .get(&instrument_id)
                .expect("every grouped instrument has records");
            let outcome = match variant {
                SimulationVariant::Baseline(cost) => simulate_baseline(instrument_records, cost),
                SimulationVariant::RiskManaged(config) => {
                    simulate_risk_managed(instrument_records, config)
                }
            };
            if let Err(error) = &outcome {
                warn!("Simulation failed for {}: {}", instrument_id, error);
            }
            InstrumentRun {
                instrument_id,
                outcome,
            }
        })
        .collect()
}
