pub mod instance_converter;
pub mod logging;

use std::sync::Arc;
use std::time as stdtime;

use anyhow::Context;
use model::base_types::VehicleCount;
use model::config::Config;
use model::error::MalformedTimetable;
use model::json_serialisation::load_timetable_from_str;
use model::network::EventNetwork;
use model::timetable::Timetable;
use solution::json_serialisation::{edges_to_json, report_to_json};
use solution::FleetReport;
use solver::sensitivity::{sweep_overnight_capacity, SweepResult};
use solver::{MinCostFlowSolver, SolveOutcome, SolverOptions};
use tracing::info;

/// Loads the instance (json text), applies the overnight capacity overrides (station name, capacity), solves
/// and returns the output json. Prints the result to stdout.
pub fn run(
    input_data: &str,
    overnight_capacities: &[(String, VehicleCount)],
    options: SolverOptions,
) -> anyhow::Result<serde_json::Value> {
    let start_time = stdtime::Instant::now();
    let (timetable, config) =
        load_timetable_from_str(input_data).context("cannot load instance")?;
    let config = override_capacities(&timetable, &config, overnight_capacities)?;
    let network = Arc::new(EventNetwork::build(timetable, Arc::new(config))?);

    let outcome = MinCostFlowSolver::initialize(network.clone())
        .with_options(options)
        .solve()?;

    let mut output = serde_json::Map::new();
    let status = match outcome {
        SolveOutcome::Feasible(solution) => {
            let report = FleetReport::extract(network.clone(), solution.circulation())?;
            println!("\n*** Solved ***\n");
            report.print();
            if let serde_json::Value::Object(report_json) = report_to_json(&report) {
                output.extend(report_json);
            }
            output.insert(
                "edges".to_string(),
                edges_to_json(&network, solution.circulation()),
            );
            "optimal"
        }
        SolveOutcome::Infeasible(infeasible) => {
            println!("\n*** Infeasible ***\n");
            print!("{}", infeasible);
            output.insert(
                "crossedServices".to_string(),
                serde_json::json!(infeasible.crossed_services),
            );
            output.insert(
                "unmetEvents".to_string(),
                serde_json::json!(infeasible
                    .unmet_events
                    .iter()
                    .map(|&e| network.event(e).to_string())
                    .collect::<Vec<_>>()),
            );
            "infeasible"
        }
        SolveOutcome::Interrupted => {
            println!("\n*** Interrupted (feasibility unknown) ***");
            "interrupted"
        }
    };

    let runtime_duration = start_time.elapsed();
    println!("\nrunning time: {:0.2}sec", runtime_duration.as_secs_f32());

    let mut json = serde_json::Map::new();
    json.insert(
        "info".to_string(),
        serde_json::json!({
            "runningTime": format!("{:0.2}sec", runtime_duration.as_secs_f32()),
            "numberOfThreads": rayon::current_num_threads(),
        }),
    );
    json.insert("status".to_string(), serde_json::json!(status));
    json.extend(output);
    Ok(serde_json::Value::Object(json))
}

/// Solves the instance for every overnight capacity `0..=max_capacity` of one station and returns
/// the results as json. Prints one line per capacity.
pub fn sweep(
    input_data: &str,
    station_name: &str,
    max_capacity: VehicleCount,
    options: SolverOptions,
) -> anyhow::Result<serde_json::Value> {
    let start_time = stdtime::Instant::now();
    let (timetable, config) =
        load_timetable_from_str(input_data).context("cannot load instance")?;
    let station = timetable
        .stations()
        .get(station_name)
        .ok_or_else(|| MalformedTimetable::UnknownParameterStation(station_name.to_string()))?;

    let points =
        sweep_overnight_capacity(timetable, &config, station, max_capacity, &options)?;

    println!("\novernight capacity of {}:", station_name);
    let json_points: Vec<serde_json::Value> = points
        .iter()
        .map(|point| match point.result {
            SweepResult::Feasible {
                fleet_size,
                total_cost,
            } => {
                let cost = config.unscaled_cost(total_cost);
                println!(
                    "  {:>4}: fleet size {}, cost {}",
                    point.capacity, fleet_size, cost
                );
                serde_json::json!({
                    "capacity": point.capacity,
                    "status": "optimal",
                    "fleetSize": fleet_size,
                    "totalCost": cost,
                })
            }
            SweepResult::Infeasible => {
                println!("  {:>4}: infeasible", point.capacity);
                serde_json::json!({"capacity": point.capacity, "status": "infeasible"})
            }
            SweepResult::Interrupted => {
                println!("  {:>4}: interrupted", point.capacity);
                serde_json::json!({"capacity": point.capacity, "status": "interrupted"})
            }
        })
        .collect();

    let runtime_duration = start_time.elapsed();
    info!(
        "sweep over {} capacities done ({:0.2}sec)",
        points.len(),
        runtime_duration.as_secs_f32()
    );

    Ok(serde_json::json!({
        "info": {
            "runningTime": format!("{:0.2}sec", runtime_duration.as_secs_f32()),
            "numberOfThreads": rayon::current_num_threads(),
        },
        "station": station_name,
        "points": json_points,
    }))
}

fn override_capacities(
    timetable: &Timetable,
    config: &Config,
    overnight_capacities: &[(String, VehicleCount)],
) -> Result<Config, MalformedTimetable> {
    overnight_capacities
        .iter()
        .try_fold(config.clone(), |config, (name, capacity)| {
            let station = timetable
                .stations()
                .get(name)
                .ok_or_else(|| MalformedTimetable::UnknownParameterStation(name.clone()))?;
            Ok(config.with_overnight_capacity(station, Some(*capacity)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs::File, io::Read};

    fn toy_instance() -> String {
        let mut file = File::open("resources/toy_instance.json").unwrap();
        let mut input_data = String::new();
        file.read_to_string(&mut input_data).unwrap();
        input_data
    }

    #[test]
    fn toy_instance_output() {
        // ACT
        let output = run(&toy_instance(), &[], SolverOptions::default()).unwrap();

        // ASSERT
        let keys: Vec<&String> = output.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec![
                "info",
                "status",
                "fleetSize",
                "parkingCost",
                "services",
                "overnight",
                "duties",
                "rotations",
                "edges"
            ]
        );
        assert_eq!(output["status"], "optimal");
        assert_eq!(output["fleetSize"], 5);
        assert_eq!(output["parkingCost"], 5.0);
    }

    #[test]
    fn capacity_override_can_make_the_instance_infeasible() {
        let output = run(
            &toy_instance(),
            &[("Retiro".to_string(), 4)],
            SolverOptions::default(),
        )
        .unwrap();

        assert_eq!(output["status"], "infeasible");
        assert!(!output["unmetEvents"].as_array().unwrap().is_empty());
    }

    #[test]
    fn override_for_unknown_station_fails() {
        let result = run(
            &toy_instance(),
            &[("Constitucion".to_string(), 4)],
            SolverOptions::default(),
        );

        let error = result.unwrap_err();
        assert_eq!(
            error.downcast_ref::<MalformedTimetable>(),
            Some(&MalformedTimetable::UnknownParameterStation(
                "Constitucion".to_string()
            ))
        );
    }

    #[test]
    fn service_declared_twice_is_not_silently_dropped() {
        let input = toy_instance().replacen("\"2\":", "\"1\":", 1);

        let error = run(&input, &[], SolverOptions::default()).unwrap_err();

        assert_eq!(
            error.downcast_ref::<MalformedTimetable>(),
            Some(&MalformedTimetable::DuplicateService("1".to_string()))
        );
    }

    #[test]
    fn zero_augmentations_report_interruption() {
        let output = run(
            &toy_instance(),
            &[],
            SolverOptions::default().with_max_augmentations(0),
        )
        .unwrap();

        assert_eq!(output["status"], "interrupted");
    }

    #[test]
    fn sweep_reports_every_capacity() {
        let output = sweep(&toy_instance(), "Retiro", 5, SolverOptions::default()).unwrap();

        let points = output["points"].as_array().unwrap();
        assert_eq!(points.len(), 6);
        assert_eq!(points[4]["status"], "infeasible");
        assert_eq!(points[5]["status"], "optimal");
        assert_eq!(points[5]["fleetSize"], 5);
        assert_eq!(points[5]["totalCost"], 5.0);
    }
}
