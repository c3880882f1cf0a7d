pub mod edges;
pub mod events;

use edges::{Edge, EdgeKind};
use events::{Event, EventRole};

use crate::base_types::{Cost, EdgeIdx, EventIdx, FlowValue, ServiceIdx, StationIdx};
use crate::config::Config;
use crate::error::MalformedTimetable;
use crate::timetable::Timetable;

use itertools::Itertools;
use std::fmt;
use std::sync::Arc;
use std::time as stdtime;
use tracing::{debug, info};

/// Time-expanded network of a timetable: one node per departure and arrival, one trip edge per
/// service, and per station a chain of transfer edges closed by an overnight edge.
///
/// Within a station the events are ordered by time; ties are broken by service id (ascending)
/// and then departure before arrival.
pub struct EventNetwork {
    events: Vec<Event>,
    edges: Vec<Edge>,

    station_chains: Vec<Vec<EventIdx>>,
    trip_edges: Vec<EdgeIdx>,
    overnight_edges: Vec<Option<EdgeIdx>>,

    outgoing: Vec<Vec<EdgeIdx>>,
    incoming: Vec<Vec<EdgeIdx>>,

    timetable: Arc<Timetable>,
    config: Arc<Config>,
}

// methods
impl EventNetwork {
    pub fn timetable(&self) -> Arc<Timetable> {
        self.timetable.clone()
    }

    pub fn config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub fn event(&self, idx: EventIdx) -> &Event {
        &self.events[idx.idx()]
    }

    pub fn edge(&self, idx: EdgeIdx) -> &Edge {
        &self.edges[idx.idx()]
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    pub fn number_of_events(&self) -> usize {
        self.events.len()
    }

    pub fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn outgoing(&self, event: EventIdx) -> impl Iterator<Item = EdgeIdx> + '_ {
        self.outgoing[event.idx()].iter().copied()
    }

    pub fn incoming(&self, event: EventIdx) -> impl Iterator<Item = EdgeIdx> + '_ {
        self.incoming[event.idx()].iter().copied()
    }

    /// events of the station in chain order
    pub fn station_chain(&self, station: StationIdx) -> &[EventIdx] {
        &self.station_chains[station.idx()]
    }

    pub fn trip_edge(&self, service: ServiceIdx) -> EdgeIdx {
        self.trip_edges[service.idx()]
    }

    pub fn trip_edges(&self) -> impl Iterator<Item = EdgeIdx> + '_ {
        self.trip_edges.iter().copied()
    }

    /// None if the station has fewer than two events
    pub fn overnight_edge(&self, station: StationIdx) -> Option<EdgeIdx> {
        self.overnight_edges[station.idx()]
    }

    pub fn overnight_edges(&self) -> impl Iterator<Item = EdgeIdx> + '_ {
        self.overnight_edges.iter().flatten().copied()
    }

    pub fn station_name(&self, station: StationIdx) -> &str {
        self.timetable.stations().name(station)
    }

    pub fn service_id(&self, service: ServiceIdx) -> &str {
        self.timetable.service(service).id()
    }
}

// static functions
impl EventNetwork {
    pub fn build(
        timetable: Arc<Timetable>,
        config: Arc<Config>,
    ) -> Result<EventNetwork, MalformedTimetable> {
        let start_time = stdtime::Instant::now();
        let number_of_stations = timetable.stations().len();

        if let Some((station, _)) = config
            .overnight_capacities()
            .find(|(station, _)| station.idx() >= number_of_stations)
        {
            return Err(MalformedTimetable::UnknownParameterStation(
                station.to_string(),
            ));
        }

        let max_units = timetable.rolling_stock().max_units() as FlowValue;
        let overnight_costs = overnight_costs_in_fixed_point(&timetable, &config)?;

        let mut events: Vec<Event> = Vec::with_capacity(2 * timetable.number_of_services());
        let mut edges: Vec<Edge> = Vec::new();
        let mut trip_edges: Vec<EdgeIdx> = Vec::with_capacity(timetable.number_of_services());

        // 1) events and trip edges
        for service in timetable.services() {
            let departure = Event::new(
                service.idx(),
                EventRole::Departure,
                service.departure().station(),
                service.departure().time(),
                0,
            );
            let arrival = Event::new(
                service.idx(),
                EventRole::Arrival,
                service.arrival().station(),
                service.arrival().time(),
                0,
            );

            let trip_edge = EdgeIdx::from_usize(edges.len());
            edges.push(Edge::new(
                trip_edge,
                EdgeKind::Trip(service.idx()),
                departure.idx(),
                arrival.idx(),
                service.required_units() as FlowValue,
                Some(max_units),
                0,
            ));
            trip_edges.push(trip_edge);
            events.push(departure);
            events.push(arrival);
        }

        // 2) chains of events per station
        let mut station_chains: Vec<Vec<EventIdx>> = vec![Vec::new(); number_of_stations];
        for event in events.iter().sorted_by_key(|e| (e.time(), e.service(), e.role())) {
            station_chains[event.station().idx()].push(event.idx());
        }

        // 3) transfer edges and 4) overnight edges
        let mut overnight_edges: Vec<Option<EdgeIdx>> = vec![None; number_of_stations];
        for station in timetable.stations().iter() {
            let chain = &station_chains[station.idx()];

            for (&tail, &head) in chain.iter().tuple_windows() {
                edges.push(Edge::new(
                    EdgeIdx::from_usize(edges.len()),
                    EdgeKind::Transfer(station),
                    tail,
                    head,
                    0,
                    None,
                    0,
                ));
            }

            if chain.len() < 2 {
                debug!(
                    "station {} has {} event(s); no overnight edge created",
                    timetable.stations().name(station),
                    chain.len()
                );
                continue;
            }

            let overnight_edge = EdgeIdx::from_usize(edges.len());
            let cost: Cost = overnight_costs[station.idx()];
            edges.push(Edge::new(
                overnight_edge,
                EdgeKind::Overnight(station),
                chain[chain.len() - 1],
                chain[0],
                0,
                config
                    .overnight_capacity(station)
                    .map(|capacity| capacity as FlowValue),
                cost,
            ));
            overnight_edges[station.idx()] = Some(overnight_edge);
        }

        let mut outgoing: Vec<Vec<EdgeIdx>> = vec![Vec::new(); events.len()];
        let mut incoming: Vec<Vec<EdgeIdx>> = vec![Vec::new(); events.len()];
        for edge in edges.iter() {
            outgoing[edge.tail().idx()].push(edge.idx());
            incoming[edge.head().idx()].push(edge.idx());
        }

        info!(
            "event network with {} events and {} edges built ({:0.2}sec)",
            events.len(),
            edges.len(),
            start_time.elapsed().as_secs_f32()
        );

        Ok(EventNetwork {
            events,
            edges,
            station_chains,
            trip_edges,
            overnight_edges,
            outgoing,
            incoming,
            timetable,
            config,
        })
    }
}

/// Overnight cost per station in fixed-point units. Parking every unit the trips can carry, at
/// every station, must stay below `Cost::MAX / (number of events + 2)`: the solver's path costs
/// and potentials are bounded by that product.
fn overnight_costs_in_fixed_point(
    timetable: &Timetable,
    config: &Config,
) -> Result<Vec<Cost>, MalformedTimetable> {
    let number_of_services = timetable.number_of_services() as Cost;
    let total_units = number_of_services * timetable.rolling_stock().max_units() as FlowValue;
    let cost_limit = Cost::MAX / (2 * number_of_services + 2);

    let mut total_parking_cost: Cost = 0;
    timetable
        .stations()
        .iter()
        .map(|station| {
            let cost = timetable.overnight_cost(station);
            let out_of_range = || MalformedTimetable::OvernightCostOutOfRange {
                station: timetable.stations().name(station).to_string(),
                cost,
                cost_scale: config.cost_scale(),
            };
            let scaled = config.scaled_cost(cost).ok_or_else(out_of_range)?;
            total_parking_cost = scaled
                .checked_mul(total_units)
                .and_then(|parking_cost| parking_cost.checked_add(total_parking_cost))
                .filter(|&parking_cost| parking_cost <= cost_limit)
                .ok_or_else(out_of_range)?;
            Ok(scaled)
        })
        .collect()
}

impl fmt::Display for EventNetwork {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "EventNetwork with {} events and {} edges:",
            self.events.len(),
            self.edges.len()
        )?;
        for edge in self.edges.iter() {
            writeln!(
                f,
                "\t{} -> {}: {}",
                self.event(edge.tail()),
                self.event(edge.head()),
                edge
            )?;
        }
        Ok(())
    }
}
