use model::base_types::{Cost, EdgeIdx, EventIdx, FlowValue};
use model::network::EventNetwork;

use crate::error::InvariantViolation;

/// Integer flow on every edge of an [`EventNetwork`], indexed by [`EdgeIdx`].
/// The network itself is never mutated; a circulation is a separate artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circulation {
    flows: Vec<FlowValue>,
}

// static functions
impl Circulation {
    pub fn new(flows: Vec<FlowValue>) -> Circulation {
        Circulation { flows }
    }

    pub fn zero(network: &EventNetwork) -> Circulation {
        Circulation {
            flows: vec![0; network.number_of_edges()],
        }
    }
}

// methods
impl Circulation {
    pub fn flow(&self, edge: EdgeIdx) -> FlowValue {
        self.flows[edge.idx()]
    }

    pub fn set(&mut self, edge: EdgeIdx, value: FlowValue) {
        self.flows[edge.idx()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeIdx, FlowValue)> + '_ {
        self.flows
            .iter()
            .enumerate()
            .map(|(i, f)| (EdgeIdx::from_usize(i), *f))
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn total_cost(&self, network: &EventNetwork) -> Cost {
        network
            .edges()
            .map(|edge| edge.cost() * self.flow(edge.idx()))
            .sum()
    }

    /// outflow - inflow at the event
    pub fn net_outflow(&self, network: &EventNetwork, event: EventIdx) -> FlowValue {
        let out_flow: FlowValue = network.outgoing(event).map(|e| self.flow(e)).sum();
        let in_flow: FlowValue = network.incoming(event).map(|e| self.flow(e)).sum();
        out_flow - in_flow
    }

    /// Checks that
    /// * the flow is defined for all edges,
    /// * every edge satisfies `lower <= flow <= upper`,
    /// * every event's net outflow equals its supply.
    pub fn verify(&self, network: &EventNetwork) -> Result<(), InvariantViolation> {
        if self.flows.len() != network.number_of_edges() {
            return Err(InvariantViolation::FlowVectorLength {
                expected: network.number_of_edges(),
                observed: self.flows.len(),
            });
        }

        if let Some(edge) = network.edges().find(|e| !e.admits(self.flow(e.idx()))) {
            return Err(InvariantViolation::FlowOutOfBounds {
                edge: edge.idx(),
                lower: edge.lower(),
                upper: edge.upper(),
                observed: self.flow(edge.idx()),
            });
        }

        for event in network.events() {
            let observed = self.net_outflow(network, event.idx());
            if observed != event.supply() {
                return Err(InvariantViolation::ConservationViolated {
                    event: event.idx(),
                    supply: event.supply(),
                    observed,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::{toy_network, toy_optimal_circulation};

    #[test]
    fn optimal_toy_circulation_is_valid() {
        let network = toy_network();
        let circulation = toy_optimal_circulation();

        assert_eq!(circulation.verify(&network), Ok(()));
        assert_eq!(circulation.total_cost(&network), 5000);
    }

    #[test]
    fn flow_below_lower_bound_is_reported() {
        let network = toy_network();
        let mut circulation = toy_optimal_circulation();
        circulation.set(EdgeIdx::from_usize(2), 2);

        assert_eq!(
            circulation.verify(&network),
            Err(InvariantViolation::FlowOutOfBounds {
                edge: EdgeIdx::from_usize(2),
                lower: 3,
                upper: Some(3),
                observed: 2
            })
        );
    }

    #[test]
    fn broken_conservation_is_reported() {
        let network = toy_network();
        let mut circulation = toy_optimal_circulation();
        // one more unit parks at Retiro without anything feeding it
        circulation.set(EdgeIdx::from_usize(7), 6);

        assert!(matches!(
            circulation.verify(&network),
            Err(InvariantViolation::ConservationViolated { .. })
        ));
    }

    #[test]
    fn partial_flow_is_reported() {
        let network = toy_network();
        let circulation = Circulation::new(vec![2, 2]);

        assert_eq!(
            circulation.verify(&network),
            Err(InvariantViolation::FlowVectorLength {
                expected: 12,
                observed: 2
            })
        );
        assert!(Circulation::zero(&network).verify(&network).is_err());
    }
}
