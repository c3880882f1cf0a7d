use model::base_types::{Cost, FlowValue};
use model::error::MalformedTimetable;
use solution::error::InvariantViolation;
use thiserror::Error;

use crate::flow_problem::NodeId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("arc {arc} ({tail} -> {head}) is invalid: endpoints must be below {number_of_nodes} and the lower bound ({lower}) non-negative")]
    InvalidArc {
        arc: usize,
        tail: NodeId,
        head: NodeId,
        lower: FlowValue,
        number_of_nodes: usize,
    },

    #[error("arc {arc} has negative cost {cost} and no upper bound; the problem is unbounded")]
    UnboundedNegativeCost { arc: usize, cost: Cost },

    #[error("arc costs are too large: routing {required} units could overflow the cost type")]
    CostOverflow { required: FlowValue },

    #[error(transparent)]
    Malformed(#[from] MalformedTimetable),

    #[error("solver produced an invalid flow: {0}")]
    Invariant(#[from] InvariantViolation),
}
