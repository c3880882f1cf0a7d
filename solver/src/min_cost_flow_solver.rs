
use std::fmt;
use std::sync::Arc;
use std::time;

use itertools::Itertools;
use model::base_types::{Cost, EdgeIdx, EventIdx, FlowValue};
use model::network::edges::EdgeKind;
use model::network::EventNetwork;
use solution::error::InvariantViolation;
use solution::Circulation;
use tracing::info;

use crate::error::SolverError;
use crate::flow_problem::FlowProblem;
use crate::min_cost_flow::{solve_flow_problem, FlowOutcome, InfeasibleReason};
use crate::options::SolverOptions;

/// An optimal circulation of the event network and its cost in fixed-point units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    circulation: Circulation,
    total_cost: Cost,
}

impl Solution {
    pub fn circulation(&self) -> &Circulation {
        &self.circulation
    }

    pub fn total_cost(&self) -> Cost {
        self.total_cost
    }
}

/// Why no circulation exists, in terms of the timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfeasibleNetwork {
    /// services needing more units than a service may run with
    pub crossed_services: Vec<String>,
    /// events where units could not be supplied or absorbed
    pub unmet_events: Vec<EventIdx>,
    /// total supply if the events' supplies do not cancel out
    pub unbalanced_supply: Option<FlowValue>,
}

impl fmt::Display for InfeasibleNetwork {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.crossed_services.is_empty() {
            writeln!(
                f,
                "services requiring more than the maximal number of units: {}",
                self.crossed_services.join(", ")
            )?;
        }
        if !self.unmet_events.is_empty() {
            writeln!(
                f,
                "events that cannot be supplied with units: {}",
                self.unmet_events.iter().join(", ")
            )?;
        }
        if let Some(total) = self.unbalanced_supply {
            writeln!(f, "event supplies add up to {}", total)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Feasible(Solution),
    Infeasible(InfeasibleNetwork),
    /// stopped by the iteration limit or cancellation; feasibility unknown
    Interrupted,
}

pub struct MinCostFlowSolver {
    network: Arc<EventNetwork>,
    options: SolverOptions,
}

// static functions
impl MinCostFlowSolver {
    pub fn initialize(network: Arc<EventNetwork>) -> Self {
        Self {
            network,
            options: SolverOptions::default(),
        }
    }
}

// methods
impl MinCostFlowSolver {
    pub fn with_options(self, options: SolverOptions) -> Self {
        Self { options, ..self }
    }

    pub fn solve(&self) -> Result<SolveOutcome, SolverError> {
        let start_time_creating_problem = time::Instant::now();
        let problem = self.flow_problem();
        info!(
            "1) creating min-cost-flow problem - done ({:0.2}sec)",
            start_time_creating_problem.elapsed().as_secs_f32()
        );

        let start_time_computing_min_cost_flow = time::Instant::now();
        let outcome = solve_flow_problem(&problem, &self.options)?;
        info!(
            "2) computing min-cost-flow in network with {} events and {} edges - done ({:0.2}sec)",
            problem.number_of_nodes(),
            problem.number_of_arcs(),
            start_time_computing_min_cost_flow.elapsed().as_secs_f32()
        );

        match outcome {
            FlowOutcome::Optimal { flows, cost } => {
                let circulation = Circulation::new(flows);
                circulation.verify(&self.network)?;
                let recomputed = circulation.total_cost(&self.network);
                if recomputed != cost {
                    return Err(InvariantViolation::CostMismatch {
                        accumulated: cost,
                        recomputed,
                    }
                    .into());
                }
                Ok(SolveOutcome::Feasible(Solution {
                    circulation,
                    total_cost: cost,
                }))
            }
            FlowOutcome::Infeasible(reason) => {
                Ok(SolveOutcome::Infeasible(self.explain_infeasibility(reason)))
            }
            FlowOutcome::Interrupted { .. } => Ok(SolveOutcome::Interrupted),
        }
    }

    /// events become nodes and edges become arcs, both keeping their index
    fn flow_problem(&self) -> FlowProblem {
        let nw = &self.network;
        let mut problem = FlowProblem::with_supplies(nw.events().map(|e| e.supply()).collect());
        for edge in nw.edges() {
            problem.add_arc(
                edge.tail().idx(),
                edge.head().idx(),
                edge.lower(),
                edge.upper(),
                edge.cost(),
            );
        }
        problem
    }

    fn explain_infeasibility(&self, reason: InfeasibleReason) -> InfeasibleNetwork {
        let nw = &self.network;
        let mut infeasible = InfeasibleNetwork {
            crossed_services: Vec::new(),
            unmet_events: Vec::new(),
            unbalanced_supply: None,
        };
        match reason {
            InfeasibleReason::BoundsCrossed { arcs } => {
                infeasible.crossed_services = arcs
                    .into_iter()
                    .filter_map(|arc| match nw.edge(EdgeIdx::from_usize(arc)).kind() {
                        EdgeKind::Trip(service) => Some(nw.service_id(service).to_string()),
                        _ => None,
                    })
                    .collect();
            }
            InfeasibleReason::UnmetSupply { nodes } => {
                infeasible.unmet_events = nodes.into_iter().map(EventIdx::from_usize).collect();
            }
            InfeasibleReason::UnbalancedSupply { total } => {
                infeasible.unbalanced_supply = Some(total);
            }
        }
        infeasible
    }
}
