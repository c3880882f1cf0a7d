use std::sync::Arc;

use model::base_types::{Cost, StationIdx, VehicleCount};
use model::config::Config;
use model::error::MalformedTimetable;
use model::network::EventNetwork;
use model::timetable::Timetable;
use rayon::prelude::*;
use solution::FleetReport;
use tracing::info;

use crate::error::SolverError;
use crate::min_cost_flow_solver::{MinCostFlowSolver, SolveOutcome};
use crate::options::SolverOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepResult {
    Feasible {
        fleet_size: VehicleCount,
        total_cost: Cost,
    },
    Infeasible,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPoint {
    pub capacity: VehicleCount,
    pub result: SweepResult,
}

/// Solves the timetable once for every overnight capacity `0..=max_capacity` of `station`, in
/// parallel. Each run builds its own config and network; all other settings come from `config`.
/// Points are returned in increasing capacity.
pub fn sweep_overnight_capacity(
    timetable: Arc<Timetable>,
    config: &Config,
    station: StationIdx,
    max_capacity: VehicleCount,
    options: &SolverOptions,
) -> Result<Vec<SweepPoint>, SolverError> {
    if station.idx() >= timetable.stations().len() {
        return Err(MalformedTimetable::UnknownParameterStation(station.to_string()).into());
    }

    let points = (0..=max_capacity)
        .into_par_iter()
        .map(|capacity| -> Result<SweepPoint, SolverError> {
            let config = Arc::new(config.with_overnight_capacity(station, Some(capacity)));
            let network = Arc::new(EventNetwork::build(timetable.clone(), config)?);
            let outcome = MinCostFlowSolver::initialize(network.clone())
                .with_options(options.clone())
                .solve()?;
            let result = match outcome {
                SolveOutcome::Feasible(solution) => {
                    let report = FleetReport::extract(network, solution.circulation())?;
                    SweepResult::Feasible {
                        fleet_size: report.fleet_size(),
                        total_cost: solution.total_cost(),
                    }
                }
                SolveOutcome::Infeasible(_) => SweepResult::Infeasible,
                SolveOutcome::Interrupted => SweepResult::Interrupted,
            };
            Ok(SweepPoint { capacity, result })
        })
        .collect::<Result<Vec<SweepPoint>, SolverError>>()?;

    info!(
        "overnight capacity of {} swept from 0 to {} on {} threads",
        timetable.stations().name(station),
        max_capacity,
        rayon::current_num_threads()
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::json_serialisation::load_timetable_from_json;
    use std::{fs::File, io::Read};

    fn toy_timetable() -> (Arc<Timetable>, Arc<Config>) {
        let mut file = File::open("resources/toy_instance.json").unwrap();
        let mut input_data = String::new();
        file.read_to_string(&mut input_data).unwrap();
        load_timetable_from_json(serde_json::from_str(&input_data).unwrap()).unwrap()
    }

    #[test]
    fn retiro_needs_room_for_five_units() {
        // ARRANGE
        let (timetable, config) = toy_timetable();

        // ACT
        let points = sweep_overnight_capacity(
            timetable,
            &config,
            StationIdx::from(0),
            7,
            &SolverOptions::default(),
        )
        .unwrap();

        // ASSERT
        let capacities: Vec<VehicleCount> = points.iter().map(|p| p.capacity).collect();
        assert_eq!(capacities, (0..=7).collect::<Vec<_>>());
        for point in points.iter() {
            if point.capacity < 5 {
                assert_eq!(point.result, SweepResult::Infeasible);
            } else {
                assert_eq!(
                    point.result,
                    SweepResult::Feasible {
                        fleet_size: 5,
                        total_cost: 5000
                    }
                );
            }
        }
    }

    #[test]
    fn cost_does_not_grow_with_capacity() {
        let (timetable, config) = toy_timetable();

        let points = sweep_overnight_capacity(
            timetable,
            &config,
            StationIdx::from(1),
            3,
            &SolverOptions::default(),
        )
        .unwrap();

        let costs: Vec<Option<Cost>> = points
            .iter()
            .map(|p| match p.result {
                SweepResult::Feasible { total_cost, .. } => Some(total_cost),
                _ => None,
            })
            .collect();
        for (smaller, larger) in costs.iter().zip(costs.iter().skip(1)) {
            if let Some(smaller) = smaller {
                assert!(larger.map_or(false, |l| l <= *smaller));
            }
        }
    }

    #[test]
    fn unknown_station_is_rejected() {
        let (timetable, config) = toy_timetable();

        let result = sweep_overnight_capacity(
            timetable,
            &config,
            StationIdx::from(9),
            3,
            &SolverOptions::default(),
        );

        assert!(matches!(
            result,
            Err(SolverError::Malformed(
                MalformedTimetable::UnknownParameterStation(_)
            ))
        ));
    }
}
