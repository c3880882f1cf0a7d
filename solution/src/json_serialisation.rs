use itertools::Itertools;
use model::network::{edges::EdgeKind, EventNetwork};
use serde::{Deserialize, Serialize};

use crate::{Circulation, FleetReport};

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonServiceAssignment {
    id: String,
    origin: String,
    destination: String,
    departure_time: u32,
    arrival_time: u32,
    demand: u32,
    required_units: u32,
    assigned_units: u32,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonOvernightParking {
    station: String,
    units: u32,
    cost: f64,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonDuty {
    start_station: String,
    overnight_station: String,
    services: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
enum JsonEdgeKind {
    Trip,
    Transfer,
    Overnight,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonEdge {
    kind: JsonEdgeKind,
    tail: String,
    head: String,
    lower: i64,
    upper: Option<i64>,
    cost: i64,
    flow: i64,
}

/// Fleet size, parking cost, per-service units, overnight parking, duties and rotations.
/// Rotations refer to duties by their position in the "duties" list.
pub fn report_to_json(report: &FleetReport) -> serde_json::Value {
    let nw = report.network();
    let timetable = nw.timetable();
    let config = nw.config();

    let services: Vec<JsonServiceAssignment> = report
        .services()
        .iter()
        .map(|assignment| {
            let service = timetable.service(assignment.service);
            JsonServiceAssignment {
                id: service.id().to_string(),
                origin: nw.station_name(service.departure().station()).to_string(),
                destination: nw.station_name(service.arrival().station()).to_string(),
                departure_time: service.departure().time(),
                arrival_time: service.arrival().time(),
                demand: service.demand(),
                required_units: assignment.required_units,
                assigned_units: assignment.assigned_units,
            }
        })
        .collect();

    let overnight: Vec<JsonOvernightParking> = report
        .overnight()
        .iter()
        .map(|parking| JsonOvernightParking {
            station: nw.station_name(parking.station).to_string(),
            units: parking.units,
            cost: config.unscaled_cost(parking.cost),
        })
        .collect();

    let duties: Vec<JsonDuty> = report
        .duties()
        .iter()
        .map(|duty| JsonDuty {
            start_station: nw.station_name(duty.start_station).to_string(),
            overnight_station: nw.station_name(duty.overnight_station).to_string(),
            services: duty
                .services
                .iter()
                .map(|&s| nw.service_id(s).to_string())
                .collect(),
        })
        .collect();

    let rotations = report
        .rotations()
        .iter()
        .map(|rotation| rotation.duties.clone())
        .collect_vec();

    serde_json::json!({
        "fleetSize": report.fleet_size(),
        "parkingCost": report.parking_cost_unscaled(),
        "services": services,
        "overnight": overnight,
        "duties": duties,
        "rotations": rotations,
    })
}

/// every edge of the network with its bounds, fixed-point cost and flow
pub fn edges_to_json(network: &EventNetwork, circulation: &Circulation) -> serde_json::Value {
    let edges: Vec<JsonEdge> = network
        .edges()
        .map(|edge| JsonEdge {
            kind: match edge.kind() {
                EdgeKind::Trip(_) => JsonEdgeKind::Trip,
                EdgeKind::Transfer(_) => JsonEdgeKind::Transfer,
                EdgeKind::Overnight(_) => JsonEdgeKind::Overnight,
            },
            tail: network.event(edge.tail()).to_string(),
            head: network.event(edge.head()).to_string(),
            lower: edge.lower(),
            upper: edge.upper(),
            cost: edge.cost(),
            flow: circulation.flow(edge.idx()),
        })
        .collect();
    serde_json::json!(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::{toy_network, toy_optimal_circulation};

    #[test]
    fn toy_report_as_json() {
        // ARRANGE
        let network = toy_network();
        let circulation = toy_optimal_circulation();
        let report = FleetReport::extract(network.clone(), &circulation).unwrap();

        // ACT
        let json = report_to_json(&report);
        let edges = edges_to_json(&network, &circulation);

        // ASSERT
        assert_eq!(json["fleetSize"], 5);
        assert_eq!(json["parkingCost"], 5.0);
        assert_eq!(json["services"][1]["id"], "2");
        assert_eq!(json["services"][1]["origin"], "Tigre");
        assert_eq!(json["services"][1]["requiredUnits"], 1);
        assert_eq!(json["services"][1]["assignedUnits"], 2);
        assert_eq!(json["overnight"][0]["station"], "Retiro");
        assert_eq!(json["overnight"][0]["units"], 5);
        assert_eq!(json["overnight"][1]["units"], 0);
        assert_eq!(json["duties"][0]["services"], serde_json::json!(["1", "2"]));
        assert_eq!(json["rotations"].as_array().unwrap().len(), 5);

        assert_eq!(edges.as_array().unwrap().len(), 12);
        assert_eq!(edges[7]["kind"], "overnight");
        assert_eq!(edges[7]["upper"], serde_json::Value::Null);
        assert_eq!(edges[7]["cost"], 1000);
        assert_eq!(edges[7]["flow"], 5);
        assert_eq!(edges[0]["tail"], "0_D@360");
    }
}
