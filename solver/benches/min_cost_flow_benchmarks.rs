use criterion::{criterion_group, criterion_main, Criterion};
use model::config::Config;
use solution::test_utilities::build_network;
use solver::MinCostFlowSolver;

/// A shuttle between two stations running every 10 ticks in both directions for a whole day.
pub fn min_cost_flow_benchmarks(c: &mut Criterion) {
    let ids: Vec<String> = (0..200).map(|i| format!("{:03}", i)).collect();
    let services: Vec<_> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let departure = 10 * (i as i64 / 2);
            let (origin, destination) = if i % 2 == 0 {
                ("North", "South")
            } else {
                ("South", "North")
            };
            (
                id.as_str(),
                origin,
                departure,
                destination,
                departure + 45,
                (i as i64 * 37) % 400,
            )
        })
        .collect();
    let network = build_network(
        &[("North", 1.0), ("South", 1.2)],
        100,
        4,
        &services,
        Config::default(),
    );

    c.bench_function("solve_shuttle_timetable", |b| {
        b.iter(|| {
            MinCostFlowSolver::initialize(network.clone())
                .solve()
                .unwrap();
        })
    });
}

criterion_group!(benches, min_cost_flow_benchmarks);
criterion_main!(benches);
