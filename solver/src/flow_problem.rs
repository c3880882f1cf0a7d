use model::base_types::{Cost, EdgeIdx, EventIdx, FlowValue};
use solution::error::InvariantViolation;

pub type NodeId = usize;

/// Directed arc with bounds `[lower, upper]` (None = unbounded) and cost per unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowArc {
    pub tail: NodeId,
    pub head: NodeId,
    pub lower: FlowValue,
    pub upper: Option<FlowValue>,
    pub cost: Cost,
}

impl FlowArc {
    pub fn admits(&self, flow: FlowValue) -> bool {
        self.lower <= flow && self.upper.map_or(true, |upper| flow <= upper)
    }
}

/// A min-cost-flow instance with lower bounds. The supply of a node is its required net outflow
/// (outflow - inflow), so sources have positive supply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowProblem {
    supplies: Vec<FlowValue>,
    arcs: Vec<FlowArc>,
}

// static functions
impl FlowProblem {
    /// `number_of_nodes` nodes, all with supply 0 and no arcs.
    pub fn new(number_of_nodes: usize) -> FlowProblem {
        FlowProblem {
            supplies: vec![0; number_of_nodes],
            arcs: Vec::new(),
        }
    }

    pub fn with_supplies(supplies: Vec<FlowValue>) -> FlowProblem {
        FlowProblem {
            supplies,
            arcs: Vec::new(),
        }
    }
}

// methods
impl FlowProblem {
    pub fn add_arc(
        &mut self,
        tail: NodeId,
        head: NodeId,
        lower: FlowValue,
        upper: Option<FlowValue>,
        cost: Cost,
    ) -> usize {
        self.arcs.push(FlowArc {
            tail,
            head,
            lower,
            upper,
            cost,
        });
        self.arcs.len() - 1
    }

    pub fn set_upper(&mut self, arc: usize, upper: Option<FlowValue>) {
        self.arcs[arc].upper = upper;
    }

    pub fn supply(&self, node: NodeId) -> FlowValue {
        self.supplies[node]
    }

    pub fn supplies(&self) -> &[FlowValue] {
        &self.supplies
    }

    pub fn arc(&self, arc: usize) -> &FlowArc {
        &self.arcs[arc]
    }

    pub fn arcs(&self) -> impl Iterator<Item = &FlowArc> + '_ {
        self.arcs.iter()
    }

    pub fn number_of_nodes(&self) -> usize {
        self.supplies.len()
    }

    pub fn number_of_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn cost_of(&self, flows: &[FlowValue]) -> Cost {
        self.arcs
            .iter()
            .zip(flows.iter())
            .map(|(arc, flow)| arc.cost * flow)
            .sum()
    }

    /// Checks bounds and conservation of `flows`. Arcs and nodes are reported as edges and events
    /// with the same index.
    pub fn verify(&self, flows: &[FlowValue]) -> Result<(), InvariantViolation> {
        if flows.len() != self.arcs.len() {
            return Err(InvariantViolation::FlowVectorLength {
                expected: self.arcs.len(),
                observed: flows.len(),
            });
        }

        let mut net_outflow: Vec<FlowValue> = vec![0; self.supplies.len()];
        for (i, (arc, &flow)) in self.arcs.iter().zip(flows.iter()).enumerate() {
            if !arc.admits(flow) {
                return Err(InvariantViolation::FlowOutOfBounds {
                    edge: EdgeIdx::from_usize(i),
                    lower: arc.lower,
                    upper: arc.upper,
                    observed: flow,
                });
            }
            net_outflow[arc.tail] += flow;
            net_outflow[arc.head] -= flow;
        }

        for (node, (&observed, &supply)) in net_outflow.iter().zip(self.supplies.iter()).enumerate()
        {
            if observed != supply {
                return Err(InvariantViolation::ConservationViolated {
                    event: EventIdx::from_usize(node),
                    supply,
                    observed,
                });
            }
        }
        Ok(())
    }
}
