use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use model::base_types::{Cost, FlowValue};
use solution::error::InvariantViolation;

use crate::flow_problem::NodeId;

pub(crate) type ResidualArc = usize;

/// Distances (None = unreachable) and the arc each reached node was entered by.
pub(crate) struct ShortestPathTree {
    pub distances: Vec<Option<Cost>>,
    pub predecessors: Vec<Option<ResidualArc>>,
}

/// Residual graph for successive shortest paths. Every arc `a` is stored next to its reverse
/// `a ^ 1`; pushing flow on one frees the same capacity on the other.
pub(crate) struct ResidualNetwork {
    heads: Vec<NodeId>,
    capacities: Vec<FlowValue>,
    costs: Vec<Cost>,
    adjacency: Vec<Vec<ResidualArc>>,
}

impl ResidualNetwork {
    pub fn new(number_of_nodes: usize) -> ResidualNetwork {
        ResidualNetwork {
            heads: Vec::new(),
            capacities: Vec::new(),
            costs: Vec::new(),
            adjacency: vec![Vec::new(); number_of_nodes],
        }
    }

    /// Adds `tail -> head` with `capacity` and its reverse with `reverse_capacity`; returns the
    /// forward arc.
    pub fn add_arc(
        &mut self,
        tail: NodeId,
        head: NodeId,
        capacity: FlowValue,
        reverse_capacity: FlowValue,
        cost: Cost,
    ) -> ResidualArc {
        let forward = self.heads.len();
        self.heads.push(head);
        self.capacities.push(capacity);
        self.costs.push(cost);
        self.adjacency[tail].push(forward);

        self.heads.push(tail);
        self.capacities.push(reverse_capacity);
        self.costs.push(-cost);
        self.adjacency[head].push(forward + 1);
        forward
    }

    pub fn number_of_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn capacity(&self, arc: ResidualArc) -> FlowValue {
        self.capacities[arc]
    }

    pub fn cost(&self, arc: ResidualArc) -> Cost {
        self.costs[arc]
    }

    pub fn tail(&self, arc: ResidualArc) -> NodeId {
        self.heads[arc ^ 1]
    }

    pub fn push(&mut self, arc: ResidualArc, amount: FlowValue) {
        self.capacities[arc] -= amount;
        self.capacities[arc ^ 1] += amount;
    }

    /// arcs from `source` to `target` following the tree, in path order
    pub fn path_to(&self, tree: &ShortestPathTree, target: NodeId) -> Vec<ResidualArc> {
        let mut path = Vec::new();
        let mut node = target;
        while let Some(arc) = tree.predecessors[node] {
            path.push(arc);
            node = self.tail(arc);
        }
        path.reverse();
        path
    }

    /// Queue-based Bellman-Ford (SPFA) over arcs with positive capacity; tolerates negative
    /// costs and reports a negative cycle as an invariant violation.
    pub fn bellman_ford(&self, source: NodeId) -> Result<ShortestPathTree, InvariantViolation> {
        let n = self.number_of_nodes();
        let mut distances: Vec<Option<Cost>> = vec![None; n];
        let mut predecessors: Vec<Option<ResidualArc>> = vec![None; n];
        let mut in_queue = vec![false; n];
        let mut relaxations = vec![0usize; n];
        let mut queue = VecDeque::new();

        distances[source] = Some(0);
        queue.push_back(source);
        in_queue[source] = true;

        while let Some(node) = queue.pop_front() {
            in_queue[node] = false;
            let Some(dist) = distances[node] else {
                continue;
            };
            for &arc in self.adjacency[node].iter() {
                if self.capacities[arc] <= 0 {
                    continue;
                }
                let head = self.heads[arc];
                let candidate = dist + self.costs[arc];
                if distances[head].map_or(true, |d| candidate < d) {
                    distances[head] = Some(candidate);
                    predecessors[head] = Some(arc);
                    relaxations[head] += 1;
                    if relaxations[head] > n {
                        return Err(InvariantViolation::NegativeResidualCycle { node: head });
                    }
                    if !in_queue[head] {
                        in_queue[head] = true;
                        queue.push_back(head);
                    }
                }
            }
        }
        Ok(ShortestPathTree {
            distances,
            predecessors,
        })
    }

    /// Dijkstra on reduced costs `cost + potential[tail] - potential[head]`, which must be
    /// non-negative on every arc with positive capacity. Distances are reduced distances.
    pub fn dijkstra(&self, source: NodeId, potentials: &[Cost]) -> ShortestPathTree {
        let n = self.number_of_nodes();
        let mut distances: Vec<Option<Cost>> = vec![None; n];
        let mut predecessors: Vec<Option<ResidualArc>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();

        distances[source] = Some(0);
        heap.push(Reverse((0, source)));

        while let Some(Reverse((dist, node))) = heap.pop() {
            if settled[node] {
                continue;
            }
            settled[node] = true;
            for &arc in self.adjacency[node].iter() {
                if self.capacities[arc] <= 0 {
                    continue;
                }
                let head = self.heads[arc];
                if settled[head] {
                    continue;
                }
                let candidate = dist + self.costs[arc] + potentials[node] - potentials[head];
                if distances[head].map_or(true, |d| candidate < d) {
                    distances[head] = Some(candidate);
                    predecessors[head] = Some(arc);
                    heap.push(Reverse((candidate, head)));
                }
            }
        }
        ShortestPathTree {
            distances,
            predecessors,
        }
    }
}
