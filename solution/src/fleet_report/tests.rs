use model::base_types::{EdgeIdx, ServiceIdx, StationIdx};
use model::config::Config;

use crate::error::InvariantViolation;
use crate::test_utilities::{build_network, toy_network, toy_optimal_circulation};
use crate::{Circulation, FleetReport};

#[test]
fn toy_report_counts_five_units_parked_at_retiro() {
    // ARRANGE
    let network = toy_network();
    let circulation = toy_optimal_circulation();

    // ACT
    let report = FleetReport::extract(network, &circulation).unwrap();

    // ASSERT
    assert_eq!(report.fleet_size(), 5);
    assert_eq!(report.parking_cost(), 5000);
    assert_eq!(report.parking_cost_unscaled(), 5.0);
    assert_eq!(report.units_parked_at(StationIdx::from(0)), 5);
    assert_eq!(report.units_parked_at(StationIdx::from(1)), 0);

    let assigned: Vec<(u32, u32)> = report
        .services()
        .iter()
        .map(|s| (s.required_units, s.assigned_units))
        .collect();
    assert_eq!(assigned, vec![(2, 2), (1, 2), (3, 3), (2, 3)]);
}

#[test]
fn toy_duties_run_there_and_back() {
    let network = toy_network();
    let report = FleetReport::extract(network, &toy_optimal_circulation()).unwrap();

    let first_pair = vec![ServiceIdx::from(0), ServiceIdx::from(1)];
    let second_pair = vec![ServiceIdx::from(2), ServiceIdx::from(3)];

    assert_eq!(report.duties().len(), 5);
    assert_eq!(
        report
            .duties()
            .iter()
            .filter(|d| d.services == first_pair)
            .count(),
        2
    );
    assert_eq!(
        report
            .duties()
            .iter()
            .filter(|d| d.services == second_pair)
            .count(),
        3
    );
    assert!(report.duties().iter().all(|d| {
        d.start_station == StationIdx::from(0) && d.overnight_station == StationIdx::from(0)
    }));

    // every unit is back at Retiro in the evening, so each rotation lasts one day
    assert_eq!(report.rotations().len(), 5);
    assert!(report.rotations().iter().all(|r| r.days() == 1));
}

#[test]
fn units_swapping_ends_of_the_line_form_a_two_day_rotation() {
    // ARRANGE
    // one unit runs Retiro -> Tigre in the evening, the other Tigre -> Retiro in the morning
    let network = build_network(
        &[("Retiro", 1.0), ("Tigre", 1.5)],
        100,
        1,
        &[
            ("1", "Retiro", 100, "Tigre", 200, 50),
            ("2", "Tigre", 50, "Retiro", 150, 50),
        ],
        Config::default(),
    );
    // both units run their trip and park at the other end; transfers stay empty
    let retiro_overnight = network.overnight_edge(StationIdx::from(0)).unwrap();
    let tigre_overnight = network.overnight_edge(StationIdx::from(1)).unwrap();
    let mut circulation = Circulation::zero(&network);
    for e in network.trip_edges() {
        circulation.set(e, 1);
    }
    circulation.set(retiro_overnight, 1);
    circulation.set(tigre_overnight, 1);

    // ACT
    let report = FleetReport::extract(network.clone(), &circulation).unwrap();

    // ASSERT
    assert_eq!(report.fleet_size(), 2);
    assert_eq!(report.parking_cost_unscaled(), 2.5);
    assert_eq!(report.rotations().len(), 1);
    assert_eq!(report.rotations()[0].days(), 2);
    let services: Vec<&Vec<ServiceIdx>> = report.duties().iter().map(|d| &d.services).collect();
    assert_eq!(
        services,
        vec![&vec![ServiceIdx::from(0)], &vec![ServiceIdx::from(1)]]
    );
    assert!(report
        .duties()
        .iter()
        .all(|d| d.start_station != d.overnight_station));
}

#[test]
fn circulation_with_broken_conservation_is_rejected() {
    let network = toy_network();
    let mut circulation = toy_optimal_circulation();
    circulation.set(EdgeIdx::from_usize(4), 2);

    let result = FleetReport::extract(network, &circulation);

    assert!(matches!(
        result,
        Err(InvariantViolation::ConservationViolated { .. })
    ));
}
