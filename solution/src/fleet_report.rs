use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use model::base_types::{Cost, EdgeIdx, FlowValue, ServiceIdx, StationIdx, VehicleCount};
use model::network::EventNetwork;
use tracing::debug;

use crate::error::InvariantViolation;
use crate::Circulation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAssignment {
    pub service: ServiceIdx,
    pub required_units: VehicleCount,
    pub assigned_units: VehicleCount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvernightParking {
    pub station: StationIdx,
    pub units: VehicleCount,
    pub cost: Cost,
}

/// The work of one unit between two overnight stays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleDuty {
    pub start_station: StationIdx,
    pub overnight_station: StationIdx,
    pub services: Vec<ServiceIdx>,
    start_edge: EdgeIdx,
    overnight_edge: EdgeIdx,
}

/// Duties (indices into [`FleetReport::duties`]) that one unit runs on consecutive days before
/// it is back at the start of the first duty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    pub duties: Vec<usize>,
}

impl Rotation {
    pub fn days(&self) -> usize {
        self.duties.len()
    }
}

/// Fleet size and vehicle flow read back from a solved circulation.
///
/// The fleet size counts units (flow over all overnight edges); the parking cost is the
/// fixed-point monetary objective. The two numbers are kept apart.
pub struct FleetReport {
    fleet_size: VehicleCount,
    parking_cost: Cost,
    services: Vec<ServiceAssignment>,
    overnight: Vec<OvernightParking>,
    duties: Vec<VehicleDuty>,
    rotations: Vec<Rotation>,
    network: Arc<EventNetwork>,
}

// methods
impl FleetReport {
    pub fn fleet_size(&self) -> VehicleCount {
        self.fleet_size
    }

    /// in fixed-point cost units
    pub fn parking_cost(&self) -> Cost {
        self.parking_cost
    }

    /// in the instance's currency
    pub fn parking_cost_unscaled(&self) -> f64 {
        self.network.config().unscaled_cost(self.parking_cost)
    }

    pub fn services(&self) -> &[ServiceAssignment] {
        &self.services
    }

    pub fn overnight(&self) -> &[OvernightParking] {
        &self.overnight
    }

    pub fn duties(&self) -> &[VehicleDuty] {
        &self.duties
    }

    pub fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }

    pub fn network(&self) -> Arc<EventNetwork> {
        self.network.clone()
    }

    pub fn units_parked_at(&self, station: StationIdx) -> VehicleCount {
        self.overnight
            .iter()
            .find(|p| p.station == station)
            .map_or(0, |p| p.units)
    }

    pub fn print(&self) {
        let nw = &self.network;
        println!(
            "fleet size: {} units, parking cost: {}",
            self.fleet_size,
            self.parking_cost_unscaled()
        );
        for parking in self.overnight.iter() {
            println!(
                "  {}: {} units overnight",
                nw.station_name(parking.station),
                parking.units
            );
        }
        for (i, rotation) in self.rotations.iter().enumerate() {
            println!("  rotation {} ({} days):", i, rotation.days());
            for &d in rotation.duties.iter() {
                let duty = &self.duties[d];
                println!(
                    "    {} -> [{}] -> overnight at {}",
                    nw.station_name(duty.start_station),
                    duty.services.iter().map(|&s| nw.service_id(s)).join(", "),
                    nw.station_name(duty.overnight_station)
                );
            }
        }
    }
}

// static functions
impl FleetReport {
    pub fn extract(
        network: Arc<EventNetwork>,
        circulation: &Circulation,
    ) -> Result<FleetReport, InvariantViolation> {
        circulation.verify(&network)?;

        let timetable = network.timetable();
        let services = timetable
            .services()
            .map(|service| {
                let edge = network.edge(network.trip_edge(service.idx()));
                let flow = circulation.flow(edge.idx());
                if flow < service.required_units() as FlowValue || !edge.admits(flow) {
                    return Err(InvariantViolation::FlowOutOfBounds {
                        edge: edge.idx(),
                        lower: edge.lower(),
                        upper: edge.upper(),
                        observed: flow,
                    });
                }
                Ok(ServiceAssignment {
                    service: service.idx(),
                    required_units: service.required_units(),
                    assigned_units: flow as VehicleCount,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let overnight: Vec<OvernightParking> = network
            .overnight_edges()
            .map(|e| {
                let edge = network.edge(e);
                let station = network.event(edge.head()).station();
                OvernightParking {
                    station,
                    units: circulation.flow(e) as VehicleCount,
                    cost: circulation.flow(e) * edge.cost(),
                }
            })
            .collect();

        let fleet_size = overnight.iter().map(|p| p.units).sum();
        let parking_cost = overnight.iter().map(|p| p.cost).sum();

        let duties = decompose_into_duties(&network, circulation)?;
        let rotations = chain_into_rotations(&duties);
        debug!(
            "{} duties chained into {} rotations",
            duties.len(),
            rotations.len()
        );

        Ok(FleetReport {
            fleet_size,
            parking_cost,
            services,
            overnight,
            duties,
            rotations,
            network,
        })
    }
}

/// Splits the circulation into one path per unit of overnight flow. Each path starts at the
/// head of an overnight edge, follows flow-carrying trip and transfer edges (trips first) and
/// ends on the overnight edge where the unit parks.
fn decompose_into_duties(
    network: &EventNetwork,
    circulation: &Circulation,
) -> Result<Vec<VehicleDuty>, InvariantViolation> {
    let mut remaining = circulation.clone();
    let mut duties = Vec::new();

    for start_edge in network.overnight_edges() {
        let start = network.edge(start_edge).head();
        for _ in 0..circulation.flow(start_edge) {
            let mut current = start;
            let mut services = Vec::new();
            let overnight_edge = loop {
                let next = network
                    .outgoing(current)
                    .filter(|&e| !network.edge(e).is_overnight() && remaining.flow(e) > 0)
                    .min_by_key(|&e| (!network.edge(e).is_trip(), e));
                if let Some(e) = next {
                    remaining.set(e, remaining.flow(e) - 1);
                    if network.edge(e).is_trip() {
                        services.push(network.event(current).service());
                    }
                    current = network.edge(e).head();
                    continue;
                }
                match network
                    .outgoing(current)
                    .find(|&e| network.edge(e).is_overnight() && remaining.flow(e) > 0)
                {
                    Some(e) => {
                        remaining.set(e, remaining.flow(e) - 1);
                        break e;
                    }
                    None => {
                        return Err(InvariantViolation::DutyDecompositionStuck {
                            start,
                            event: current,
                        })
                    }
                }
            };
            duties.push(VehicleDuty {
                start_station: network.event(start).station(),
                overnight_station: network.event(current).station(),
                services,
                start_edge,
                overnight_edge,
            });
        }
    }
    Ok(duties)
}

/// A unit that parks on an overnight edge takes one of the duties leaving from that edge the
/// next day; following these links until the first duty repeats gives a rotation.
fn chain_into_rotations(duties: &[VehicleDuty]) -> Vec<Rotation> {
    let mut leaving: HashMap<EdgeIdx, Vec<usize>> = HashMap::new();
    for (i, duty) in duties.iter().enumerate().rev() {
        leaving.entry(duty.start_edge).or_default().push(i);
    }
    let successor: Vec<usize> = duties
        .iter()
        .map(|duty| {
            leaving
                .get_mut(&duty.overnight_edge)
                .and_then(|candidates| candidates.pop())
                .unwrap_or_default()
        })
        .collect();

    let mut visited = vec![false; duties.len()];
    let mut rotations = Vec::new();
    for first in 0..duties.len() {
        if visited[first] {
            continue;
        }
        let mut rotation = Vec::new();
        let mut d = first;
        while !visited[d] {
            visited[d] = true;
            rotation.push(d);
            d = successor[d];
        }
        rotations.push(Rotation { duties: rotation });
    }
    rotations
}

#[cfg(test)]
mod tests;
