use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use dev_utils::get_example_scenario;
use range_raptor::request::{Leg, McCostParams, Optimization, Profile, Request, SearchParams, TuningParameters};
use range_raptor::{route, Optimizations};

fn mc_raptor_benchmark(c: &mut Criterion) {
    let (network, start, start_time, end) = get_example_scenario();
    let tuning = TuningParameters::default();
    let request = Request {
        profile: Profile::MultiCriteria,
        search_forward: true,
        search_params: SearchParams {
            earliest_departure_time: start_time,
            latest_arrival_time: start_time + 4 * 3600,
            search_window_seconds: 3600,
            board_slack_seconds: 60,
            access_legs: vec![Leg { stop: start, duration_seconds: 0, cost: None }],
            egress_legs: vec![Leg { stop: end, duration_seconds: 0, cost: None }],
            number_of_additional_transfers: 1,
        },
        optimizations: Optimizations::new([Optimization::TransfersStopFilter, Optimization::ParetoCheckAgainstDestination]),
        mc_cost_params: McCostParams::default(),
    };

    c.bench_function("McRaptor", |b| b.iter(|| route(black_box(&network), black_box(&request), black_box(&tuning))));
}

criterion_group!(benches, mc_raptor_benchmark);
criterion_main!(benches);
