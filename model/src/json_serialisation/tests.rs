use std::{fs::File, io::Read};

use crate::{
    base_types::{EdgeIdx, ServiceIdx, StationIdx},
    error::MalformedTimetable,
    json_serialisation::{
        load_event_network_from_json, load_timetable_from_json, load_timetable_from_str,
    },
    network::edges::EdgeKind,
};

fn read_json(path: &str) -> serde_json::Value {
    let mut file = File::open(path).unwrap();
    let mut input_data = String::new();
    file.read_to_string(&mut input_data).unwrap();
    serde_json::from_str(&input_data).unwrap()
}

#[test]
fn test_load_toy_instance() {
    // ACT
    let (timetable, config) = load_timetable_from_json(read_json("resources/toy_instance.json"))
        .unwrap();

    // ASSERT
    let stations = timetable.stations();
    assert_eq!(stations.len(), 2);
    assert_eq!(stations.get("Retiro"), Some(StationIdx::from(0)));
    assert_eq!(stations.get("Tigre"), Some(StationIdx::from(1)));
    assert_eq!(timetable.overnight_cost(StationIdx::from(1)), 1.5);

    assert_eq!(timetable.rolling_stock().capacity(), 100);
    assert_eq!(timetable.rolling_stock().max_units(), 3);
    assert_eq!(timetable.number_of_services(), 4);

    let service_3 = timetable.find_service("3").unwrap();
    assert_eq!(service_3.idx(), ServiceIdx::from(2));
    assert_eq!(service_3.departure().station(), StationIdx::from(0));
    assert_eq!(service_3.departure().time(), 480);
    assert_eq!(service_3.arrival().station(), StationIdx::from(1));
    assert_eq!(service_3.arrival().time(), 540);
    assert_eq!(service_3.demand(), 250);
    assert_eq!(service_3.required_units(), 3);

    assert_eq!(config.cost_scale(), 1000);
    assert_eq!(config.overnight_capacity(StationIdx::from(0)), None);
}

#[test]
fn test_load_parameters() {
    // ACT
    let network =
        load_event_network_from_json(read_json("resources/restricted_instance.json")).unwrap();

    // ASSERT
    let config = network.config();
    assert_eq!(config.cost_scale(), 100);
    assert_eq!(config.overnight_capacity(StationIdx::from(0)), Some(4));
    assert_eq!(config.overnight_capacity(StationIdx::from(1)), None);

    let retiro_overnight = network.edge(network.overnight_edge(StationIdx::from(0)).unwrap());
    assert_eq!(retiro_overnight.kind(), EdgeKind::Overnight(StationIdx::from(0)));
    assert_eq!(retiro_overnight.upper(), Some(4));
    assert_eq!(retiro_overnight.cost(), 100);

    let tigre_overnight = network.edge(network.overnight_edge(StationIdx::from(1)).unwrap());
    assert_eq!(tigre_overnight.upper(), None);
    assert_eq!(tigre_overnight.cost(), 150);
    assert_eq!(network.edge(EdgeIdx::from_usize(0)).upper(), Some(3));
}

#[test]
fn missing_field_is_malformed() {
    let input = serde_json::json!({
        "stations": ["Retiro", "Tigre"],
        "cost_per_unit": {"Retiro": 1.0, "Tigre": 1.0},
        "services": {}
    });
    assert!(matches!(
        load_timetable_from_json(input),
        Err(MalformedTimetable::InvalidDocument(_))
    ));
}

#[test]
fn unknown_station_in_service_is_malformed() {
    let input = serde_json::json!({
        "stations": ["Retiro", "Tigre"],
        "rs_info": {"capacity": 100, "max_rs": 2},
        "cost_per_unit": {"Retiro": 1.0, "Tigre": 1.0},
        "services": {
            "1": {"stops": [{"station": "Retiro", "time": 10}, {"station": "Victoria", "time": 20}], "demand": [10]}
        }
    });
    assert_eq!(
        load_timetable_from_json(input).map(|_| ()),
        Err(MalformedTimetable::UnknownStation {
            service: "1".to_string(),
            station: "Victoria".to_string()
        })
    );
}

#[test]
fn single_stop_service_is_malformed() {
    let input = serde_json::json!({
        "stations": ["Retiro", "Tigre"],
        "rs_info": {"capacity": 100, "max_rs": 2},
        "cost_per_unit": {"Retiro": 1.0, "Tigre": 1.0},
        "services": {
            "1": {"stops": [{"station": "Retiro", "time": 10}], "demand": [10]}
        }
    });
    assert_eq!(
        load_timetable_from_json(input).map(|_| ()),
        Err(MalformedTimetable::WrongStopCount {
            service: "1".to_string(),
            count: 1
        })
    );
}

#[test]
fn negative_demand_is_malformed() {
    let input = serde_json::json!({
        "stations": ["Retiro", "Tigre"],
        "rs_info": {"capacity": 100, "max_rs": 2},
        "cost_per_unit": {"Retiro": 1.0, "Tigre": 1.0},
        "services": {
            "1": {"stops": [{"station": "Retiro", "time": 10}, {"station": "Tigre", "time": 20}], "demand": [-10]}
        }
    });
    assert_eq!(
        load_timetable_from_json(input).map(|_| ()),
        Err(MalformedTimetable::NegativeDemand {
            service: "1".to_string(),
            demand: -10
        })
    );
}

#[test]
fn overnight_capacity_for_unknown_station_is_malformed() {
    let input = serde_json::json!({
        "stations": ["Retiro", "Tigre"],
        "rs_info": {"capacity": 100, "max_rs": 2},
        "cost_per_unit": {"Retiro": 1.0, "Tigre": 1.0},
        "services": {},
        "parameters": {"overnight_capacity": {"Victoria": 3}}
    });
    assert_eq!(
        load_timetable_from_json(input).map(|_| ()),
        Err(MalformedTimetable::UnknownParameterStation(
            "Victoria".to_string()
        ))
    );
}

#[test]
fn service_declared_twice_is_malformed() {
    // ARRANGE
    let input = r#"{
        "stations": ["Retiro", "Tigre"],
        "rs_info": {"capacity": 100, "max_rs": 3},
        "cost_per_unit": {"Retiro": 1.0, "Tigre": 1.0},
        "services": {
            "1": {"stops": [{"station": "Retiro", "time": 360}, {"station": "Tigre", "time": 420}], "demand": [150]},
            "1": {"stops": [{"station": "Tigre", "time": 450}, {"station": "Retiro", "time": 510}], "demand": [90]}
        }
    }"#;

    // ACT
    let result = load_timetable_from_str(input);

    // ASSERT
    assert_eq!(
        result.err(),
        Some(MalformedTimetable::DuplicateService("1".to_string()))
    );
}

#[test]
fn text_and_value_loading_agree() {
    let mut file = File::open("resources/toy_instance.json").unwrap();
    let mut input_data = String::new();
    file.read_to_string(&mut input_data).unwrap();

    let (from_text, _) = load_timetable_from_str(&input_data).unwrap();
    let (from_value, _) =
        load_timetable_from_json(serde_json::from_str(&input_data).unwrap()).unwrap();

    assert_eq!(from_text, from_value);
}
