use std::collections::HashSet;
use std::io;

use anyhow::{bail, Context};
use serde::Deserialize;

pub const DEFAULT_STATIONS: [&str; 2] = ["Retiro", "Tigre"];
pub const DEFAULT_CAPACITY: u32 = 200;
pub const DEFAULT_MAX_UNITS: u32 = 6;

/// one row of a timetable csv; columns are read by position
#[derive(Debug, Deserialize)]
struct ServiceRecord {
    service_id: String,
    dep_time: i64,
    dep_station: String,
    dep_type: String,
    arr_time: i64,
    arr_station: String,
    arr_type: String,
    demand: i64,
}

/// Turns a timetable csv (first row is a header and is skipped) into an instance json. Every
/// station gets an overnight cost of 1.0.
pub fn convert_csv_to_json(
    reader: impl io::Read,
    stations: &[String],
    capacity: u32,
    max_units: u32,
) -> anyhow::Result<serde_json::Value> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let known_stations: HashSet<&str> = stations.iter().map(String::as_str).collect();
    let mut services = serde_json::Map::new();
    for (line, result) in csv_reader.records().enumerate() {
        // header is line 1
        let line = line + 2;
        let record = result.with_context(|| format!("cannot read line {}", line))?;
        let service: ServiceRecord = record
            .deserialize(None)
            .with_context(|| format!("malformed service on line {}", line))?;

        for station in [&service.dep_station, &service.arr_station] {
            if !known_stations.contains(station.as_str()) {
                bail!("unknown station {} on line {}", station, line);
            }
        }
        if services.contains_key(&service.service_id) {
            bail!("service {} appears twice (line {})", service.service_id, line);
        }

        services.insert(
            service.service_id.clone(),
            serde_json::json!({
                "stops": [
                    {"time": service.dep_time, "station": service.dep_station, "type": service.dep_type},
                    {"time": service.arr_time, "station": service.arr_station, "type": service.arr_type},
                ],
                "demand": [service.demand],
            }),
        );
    }

    let cost_per_unit: serde_json::Map<String, serde_json::Value> = stations
        .iter()
        .map(|station| (station.clone(), serde_json::json!(1.0)))
        .collect();

    Ok(serde_json::json!({
        "services": services,
        "stations": stations,
        "cost_per_unit": cost_per_unit,
        "rs_info": {"capacity": capacity, "max_rs": max_units},
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::json_serialisation::load_event_network_from_json;

    const TIMETABLE: &str = "\
id,dep_time,dep_station,dep_type,arr_time,arr_station,arr_type,demand
1,360,Retiro,D,420,Tigre,A,150
2,450,Tigre,D,510,Retiro,A,90
";

    fn default_stations() -> Vec<String> {
        DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn csv_rows_become_services() {
        // ACT
        let json = convert_csv_to_json(
            TIMETABLE.as_bytes(),
            &default_stations(),
            DEFAULT_CAPACITY,
            DEFAULT_MAX_UNITS,
        )
        .unwrap();

        // ASSERT
        assert_eq!(json["stations"], serde_json::json!(["Retiro", "Tigre"]));
        assert_eq!(json["rs_info"]["capacity"], 200);
        assert_eq!(json["rs_info"]["max_rs"], 6);
        assert_eq!(json["cost_per_unit"]["Tigre"], 1.0);
        assert_eq!(json["services"]["2"]["stops"][0]["station"], "Tigre");
        assert_eq!(json["services"]["2"]["stops"][1]["time"], 510);
        assert_eq!(json["services"]["1"]["demand"], serde_json::json!([150]));

        let network = load_event_network_from_json(json).unwrap();
        assert_eq!(network.number_of_events(), 4);
    }

    #[test]
    fn unknown_station_is_rejected() {
        let result = convert_csv_to_json(
            TIMETABLE.as_bytes(),
            &["Retiro".to_string()],
            DEFAULT_CAPACITY,
            DEFAULT_MAX_UNITS,
        );

        let message = result.unwrap_err().to_string();
        assert!(message.contains("unknown station Tigre on line 2"));
    }

    #[test]
    fn malformed_rows_name_their_line() {
        let input = TIMETABLE.replace("450", "soon");

        let result = convert_csv_to_json(
            input.as_bytes(),
            &default_stations(),
            DEFAULT_CAPACITY,
            DEFAULT_MAX_UNITS,
        );

        assert_eq!(
            result.unwrap_err().to_string(),
            "malformed service on line 3"
        );
    }

    #[test]
    fn duplicate_service_ids_are_rejected() {
        let input = format!("{}1,600,Retiro,D,660,Tigre,A,10\n", TIMETABLE);

        let result = convert_csv_to_json(
            input.as_bytes(),
            &default_stations(),
            DEFAULT_CAPACITY,
            DEFAULT_MAX_UNITS,
        );

        assert!(result.is_err());
    }
}
