use std::{collections::HashMap, fs::File, io::Read, sync::Arc};

use model::{
    config::Config,
    json_serialisation::load_event_network_from_json,
    network::EventNetwork,
    stations::Stations,
    timetable::{RollingStockInfo, ServiceDraft, Timetable},
};

use crate::Circulation;

const TOY_INSTANCE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources/toy_instance.json");

/// (id, origin, departure time, destination, arrival time, passenger demand)
pub type ServiceSpec<'a> = (&'a str, &'a str, i64, &'a str, i64, i64);

/// Retiro-Tigre instance with four services; optimum is 5 units, all parked at Retiro.
pub fn toy_network() -> Arc<EventNetwork> {
    let mut file = File::open(TOY_INSTANCE).unwrap();
    let mut input_data = String::new();
    file.read_to_string(&mut input_data).unwrap();
    let input_data: serde_json::Value = serde_json::from_str(&input_data).unwrap();
    load_event_network_from_json(input_data).unwrap()
}

/// the unique optimal circulation of [`toy_network`] (flows in edge order)
pub fn toy_optimal_circulation() -> Circulation {
    Circulation::new(vec![
        2, 2, 3, 3, // trips 1-4
        3, 0, 2, // Retiro transfers
        5, // Retiro overnight
        2, 0, 3, // Tigre transfers
        0, // Tigre overnight
    ])
}

/// builds an event network from a compact description; panics on malformed input.
pub fn build_network(
    stations: &[(&str, f64)],
    unit_capacity: u32,
    max_units: u32,
    services: &[ServiceSpec],
    config: Config,
) -> Arc<EventNetwork> {
    let station_names = Stations::new(stations.iter().map(|(s, _)| s.to_string()).collect())
        .unwrap();
    let overnight_costs: HashMap<String, f64> = stations
        .iter()
        .map(|(s, c)| (s.to_string(), *c))
        .collect();
    let drafts = services
        .iter()
        .map(|(id, origin, dep, destination, arr, demand)| ServiceDraft {
            id: id.to_string(),
            stops: vec![(origin.to_string(), *dep), (destination.to_string(), *arr)],
            demand: vec![*demand],
        })
        .collect();
    let timetable = Timetable::new(
        station_names,
        RollingStockInfo::new(unit_capacity, max_units).unwrap(),
        &overnight_costs,
        drafts,
    )
    .unwrap();
    Arc::new(EventNetwork::build(Arc::new(timetable), Arc::new(config)).unwrap())
}
