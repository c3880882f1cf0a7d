use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::base_types::{Cost, StationIdx, VehicleCount};
use crate::config::{Config, DEFAULT_COST_SCALE};
use crate::error::MalformedTimetable;
use crate::network::EventNetwork;
use crate::stations::Stations;
use crate::timetable::{RollingStockInfo, ServiceDraft, Timetable};

type Integer = u32;

#[derive(Serialize, Deserialize, Debug)]
struct RsInfo {
    capacity: Integer,
    max_rs: Integer,
}

#[derive(Serialize, Deserialize, Debug)]
struct Stop {
    station: String,
    time: i64,
}

#[derive(Serialize, Deserialize, Debug)]
struct Service {
    stops: Vec<Stop>,
    demand: Vec<i64>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Parameters {
    #[serde(default = "default_cost_scale")]
    cost_scale: Cost,
    #[serde(default)]
    overnight_capacity: HashMap<String, VehicleCount>,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            cost_scale: DEFAULT_COST_SCALE,
            overnight_capacity: HashMap::new(),
        }
    }
}

fn default_cost_scale() -> Cost {
    DEFAULT_COST_SCALE
}

/// services in document order; a repeated id is kept as a second entry so that it can be
/// rejected instead of overwriting the first one
#[derive(Debug)]
struct Services(Vec<(String, Service)>);

impl<'de> Deserialize<'de> for Services {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ServicesVisitor;

        impl<'de> Visitor<'de> for ServicesVisitor {
            type Value = Services;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map from service id to service")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Services, A::Error> {
                let mut services = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Service>()? {
                    services.push(entry);
                }
                Ok(Services(services))
            }
        }

        deserializer.deserialize_map(ServicesVisitor)
    }
}

#[derive(Deserialize, Debug)]
struct JsonInput {
    stations: Vec<String>,
    rs_info: RsInfo,
    cost_per_unit: HashMap<String, f64>,
    services: Services,
    #[serde(default)]
    parameters: Parameters,
}

/// Loads an instance that was already parsed into a json value. A json value cannot hold two
/// services with the same id; use [`load_timetable_from_str`] to have those rejected.
pub fn load_timetable_from_json(
    input_data: serde_json::Value,
) -> Result<(Arc<Timetable>, Arc<Config>), MalformedTimetable> {
    let json_input: JsonInput = serde_json::from_value(input_data)
        .map_err(|e| MalformedTimetable::InvalidDocument(e.to_string()))?;
    create_timetable(json_input)
}

/// Loads an instance from json text.
pub fn load_timetable_from_str(
    input_data: &str,
) -> Result<(Arc<Timetable>, Arc<Config>), MalformedTimetable> {
    let json_input: JsonInput = serde_json::from_str(input_data)
        .map_err(|e| MalformedTimetable::InvalidDocument(e.to_string()))?;
    create_timetable(json_input)
}

pub fn load_event_network_from_json(
    input_data: serde_json::Value,
) -> Result<Arc<EventNetwork>, MalformedTimetable> {
    let (timetable, config) = load_timetable_from_json(input_data)?;
    Ok(Arc::new(EventNetwork::build(timetable, config)?))
}

fn create_timetable(
    json_input: JsonInput,
) -> Result<(Arc<Timetable>, Arc<Config>), MalformedTimetable> {
    let stations = Stations::new(json_input.stations)?;
    let config = create_config(&json_input.parameters, &stations)?;
    let rolling_stock =
        RollingStockInfo::new(json_input.rs_info.capacity, json_input.rs_info.max_rs)?;

    let drafts = json_input
        .services
        .0
        .into_iter()
        .map(|(id, service)| ServiceDraft {
            id,
            stops: service
                .stops
                .into_iter()
                .map(|stop| (stop.station, stop.time))
                .collect(),
            demand: service.demand,
        })
        .collect();

    let timetable = Timetable::new(
        stations,
        rolling_stock,
        &json_input.cost_per_unit,
        drafts,
    )?;

    Ok((Arc::new(timetable), Arc::new(config)))
}

fn create_config(
    parameters: &Parameters,
    stations: &Stations,
) -> Result<Config, MalformedTimetable> {
    let overnight_capacities = parameters
        .overnight_capacity
        .iter()
        .map(|(name, capacity)| {
            stations
                .get(name)
                .map(|station| (station, *capacity))
                .ok_or_else(|| MalformedTimetable::UnknownParameterStation(name.clone()))
        })
        .collect::<Result<HashMap<StationIdx, VehicleCount>, MalformedTimetable>>()?;
    Config::new(parameters.cost_scale, overnight_capacities)
}

#[cfg(test)]
mod tests;
