
use model::base_types::{Cost, FlowValue};
use solution::error::InvariantViolation;
use tracing::debug;

use crate::error::SolverError;
use crate::flow_problem::{FlowProblem, NodeId};
use crate::options::SolverOptions;
use crate::residual_network::{ResidualArc, ResidualNetwork};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfeasibleReason {
    /// arcs whose lower bound exceeds their upper bound
    BoundsCrossed { arcs: Vec<usize> },
    /// the supplies add up to `total` instead of 0
    UnbalancedSupply { total: FlowValue },
    /// nodes whose supply (after moving lower bounds into the supplies) could not be routed
    UnmetSupply { nodes: Vec<NodeId> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Optimal { flows: Vec<FlowValue>, cost: Cost },
    Infeasible(InfeasibleReason),
    /// The iteration limit or cancellation flag stopped the solve. Says nothing about
    /// feasibility.
    Interrupted { augmentations: usize },
}

/// Computes a min-cost flow that respects all lower and upper bounds and meets every supply,
/// using successive shortest augmenting paths.
///
/// Lower bounds are moved into the supplies, arcs with negative cost start saturated, and a super
/// source and super sink connect the resulting imbalances. The first path search is Bellman-Ford,
/// later ones are Dijkstra on reduced costs.
pub fn solve_flow_problem(
    problem: &FlowProblem,
    options: &SolverOptions,
) -> Result<FlowOutcome, SolverError> {
    let n = problem.number_of_nodes();

    for (i, arc) in problem.arcs().enumerate() {
        if arc.tail >= n || arc.head >= n || arc.lower < 0 {
            return Err(SolverError::InvalidArc {
                arc: i,
                tail: arc.tail,
                head: arc.head,
                lower: arc.lower,
                number_of_nodes: n,
            });
        }
    }

    let crossed: Vec<usize> = problem
        .arcs()
        .enumerate()
        .filter(|(_, arc)| arc.upper.map_or(false, |upper| upper < arc.lower))
        .map(|(i, _)| i)
        .collect();
    if !crossed.is_empty() {
        return Ok(FlowOutcome::Infeasible(InfeasibleReason::BoundsCrossed {
            arcs: crossed,
        }));
    }

    let total: FlowValue = problem.supplies().iter().sum();
    if total != 0 {
        return Ok(FlowOutcome::Infeasible(
            InfeasibleReason::UnbalancedSupply { total },
        ));
    }

    if let Some((i, arc)) = problem
        .arcs()
        .enumerate()
        .find(|(_, arc)| arc.cost < 0 && arc.upper.is_none())
    {
        return Err(SolverError::UnboundedNegativeCost {
            arc: i,
            cost: arc.cost,
        });
    }

    // 1) initial flow: lower bound, or upper bound for negative costs
    let mut balances: Vec<FlowValue> = problem.supplies().to_vec();
    let initial_flows: Vec<FlowValue> = problem
        .arcs()
        .map(|arc| {
            let flow = if arc.cost < 0 {
                arc.upper.unwrap_or(arc.lower)
            } else {
                arc.lower
            };
            balances[arc.tail] -= flow;
            balances[arc.head] += flow;
            flow
        })
        .collect();
    let required: FlowValue = balances.iter().filter(|&&b| b > 0).sum();

    // Every augmentation moves at most `required` units over an arc, so path costs, distances
    // and potentials stay within `bound`. The margin covers sums along paths of n + 2 nodes.
    let bound = problem
        .arcs()
        .try_fold(0 as Cost, |bound, arc| {
            arc.cost
                .checked_abs()?
                .checked_mul(required.max(1))?
                .checked_add(bound)
        })
        .and_then(|bound| bound.checked_mul(n as Cost + 2));
    let fixed_cost = problem
        .arcs()
        .zip(initial_flows.iter())
        .try_fold(0 as Cost, |total, (arc, &flow)| {
            flow.checked_mul(arc.cost)?.checked_add(total)
        });
    let fixed_cost = match (bound, fixed_cost) {
        (Some(_), Some(fixed_cost)) => fixed_cost,
        _ => return Err(SolverError::CostOverflow { required }),
    };

    // 2) residual network with super source and super sink
    let source = n;
    let sink = n + 1;
    let mut residual = ResidualNetwork::new(n + 2);
    let forward_arcs: Vec<ResidualArc> = problem
        .arcs()
        .zip(initial_flows.iter())
        .map(|(arc, &flow)| {
            let upper = arc.upper.unwrap_or(arc.lower + required);
            residual.add_arc(
                arc.tail,
                arc.head,
                upper - flow,
                flow - arc.lower,
                arc.cost,
            )
        })
        .collect();
    let mut terminal_arcs: Vec<(NodeId, ResidualArc)> = Vec::new();
    for (node, &balance) in balances.iter().enumerate() {
        if balance > 0 {
            terminal_arcs.push((node, residual.add_arc(source, node, balance, 0, 0)));
        } else if balance < 0 {
            terminal_arcs.push((node, residual.add_arc(node, sink, -balance, 0, 0)));
        }
    }

    // 3) successive shortest paths
    let mut potentials: Vec<Cost> = vec![0; n + 2];
    let mut pushed: FlowValue = 0;
    let mut path_cost: Cost = 0;
    let mut augmentations: usize = 0;
    while pushed < required {
        if options.should_stop(augmentations) {
            debug!(
                "solve interrupted after {} augmentations ({} of {} units routed)",
                augmentations, pushed, required
            );
            return Ok(FlowOutcome::Interrupted { augmentations });
        }

        let tree = if augmentations == 0 {
            residual.bellman_ford(source)?
        } else {
            residual.dijkstra(source, &potentials)
        };
        if tree.distances[sink].is_none() {
            break;
        }

        let farthest = tree.distances.iter().flatten().max().copied().unwrap_or(0);
        for (potential, distance) in potentials.iter_mut().zip(tree.distances.iter()) {
            // unreached nodes stay unreached, their potential is never read again
            *potential = potential.saturating_add(distance.unwrap_or(farthest));
        }

        let path = residual.path_to(&tree, sink);
        let bottleneck = path
            .iter()
            .map(|&arc| residual.capacity(arc))
            .min()
            .unwrap_or(0)
            .min(required - pushed);
        for &arc in path.iter() {
            residual.push(arc, bottleneck);
            path_cost += bottleneck * residual.cost(arc);
        }
        pushed += bottleneck;
        augmentations += 1;
    }
    debug!(
        "{} of {} units routed in {} augmentations",
        pushed, required, augmentations
    );

    if pushed < required {
        let nodes = terminal_arcs
            .iter()
            .filter(|(_, arc)| residual.capacity(*arc) > 0)
            .map(|(node, _)| *node)
            .collect();
        return Ok(FlowOutcome::Infeasible(InfeasibleReason::UnmetSupply {
            nodes,
        }));
    }

    // 4) flow = lower bound + what the reverse residual arc holds
    let flows: Vec<FlowValue> = problem
        .arcs()
        .zip(forward_arcs.iter())
        .map(|(arc, &forward)| arc.lower + residual.capacity(forward ^ 1))
        .collect();

    problem.verify(&flows)?;
    let cost = fixed_cost + path_cost;
    let recomputed = problem.cost_of(&flows);
    if cost != recomputed {
        return Err(InvariantViolation::CostMismatch {
            accumulated: cost,
            recomputed,
        }
        .into());
    }

    Ok(FlowOutcome::Optimal { flows, cost })
}
