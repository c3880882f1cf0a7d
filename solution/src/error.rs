use model::base_types::{Cost, EdgeIdx, EventIdx, FlowValue};
use thiserror::Error;

/// A flow that contradicts what the solver promised. Never expected in correct code; the message
/// carries everything needed to reproduce the failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("flow is defined for {observed} edges but the network has {expected}")]
    FlowVectorLength { expected: usize, observed: usize },

    #[error("flow {observed} on edge {edge} violates its bounds [{lower}, {}]", fmt_upper(.upper))]
    FlowOutOfBounds {
        edge: EdgeIdx,
        lower: FlowValue,
        upper: Option<FlowValue>,
        observed: FlowValue,
    },

    #[error("net outflow {observed} at {event} differs from its supply {supply}")]
    ConservationViolated {
        event: EventIdx,
        supply: FlowValue,
        observed: FlowValue,
    },

    #[error("accumulated cost {accumulated} differs from recomputed cost {recomputed}")]
    CostMismatch { accumulated: Cost, recomputed: Cost },

    #[error("residual network contains a negative cycle through node {node}")]
    NegativeResidualCycle { node: usize },

    #[error("vehicle duty starting at {start} gets stuck at {event}")]
    DutyDecompositionStuck { start: EventIdx, event: EventIdx },
}

fn fmt_upper(upper: &Option<FlowValue>) -> String {
    match upper {
        Some(upper) => upper.to_string(),
        None => "inf".to_string(),
    }
}
