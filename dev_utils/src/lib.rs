//! Synthetic example data for the benchmarks and ad-hoc runs: a small
//! star-shaped network (one shared hub stop, several outbound lines)
//! implementing `TransitDataProvider` directly, in place of the teacher's
//! GTFS-backed fixture — ingestion from an external schedule format is
//! out of scope for this crate (`spec.md` §1), so benches exercise the
//! core against data built in memory instead.

use range_raptor::ids::{PatternIndex, StopIndex, Timestamp, TripOrder, TripRef};
use range_raptor::transit_data::{TransferLeg, TransitDataProvider};

struct PatternData {
    stops: Vec<StopIndex>,
    num_trips: usize,
    headway: Timestamp,
    base_departure: Timestamp,
    hop: Timestamp,
    dwell: Timestamp,
}

impl PatternData {
    fn departure(&self, trip: TripOrder, pos: usize) -> Timestamp {
        self.base_departure + trip as Timestamp * self.headway + pos as Timestamp * (self.hop + self.dwell)
    }

    fn arrival(&self, trip: TripOrder, pos: usize) -> Timestamp {
        self.departure(trip, pos) + self.hop
    }
}

/// A star network: stop 0 is a shared hub every line passes through first;
/// each line then runs outward through its own stretch of stops. Transfers
/// are offered between the first stop past the hub on every pair of lines,
/// so a pareto-optimal route may legitimately prefer switching lines over
/// riding one further.
pub struct SyntheticNetwork {
    num_stops: usize,
    patterns: Vec<PatternData>,
    transfers: Vec<Vec<TransferLeg>>,
}

impl TransitDataProvider for SyntheticNetwork {
    type TripMeta = ();

    fn num_stops(&self) -> usize {
        self.num_stops
    }

    fn patterns_touching<'a>(&'a self, stops: &'a [StopIndex]) -> Box<dyn Iterator<Item = PatternIndex> + 'a> {
        Box::new((0..self.patterns.len() as PatternIndex).filter(move |&p| {
            self.patterns[p as usize].stops.iter().any(|candidate| stops.contains(candidate))
        }))
    }

    fn transfers_from(&self, stop: StopIndex) -> &[TransferLeg] {
        &self.transfers[stop as usize]
    }

    fn is_trip_in_service(&self, _trip: TripRef) -> bool {
        true
    }

    fn pattern_stops(&self, pattern: PatternIndex) -> &[StopIndex] {
        &self.patterns[pattern as usize].stops
    }

    fn num_trips(&self, pattern: PatternIndex) -> usize {
        self.patterns[pattern as usize].num_trips
    }

    fn trip_arrival(&self, pattern: PatternIndex, trip: TripOrder, pos: usize) -> Timestamp {
        self.patterns[pattern as usize].arrival(trip, pos)
    }

    fn trip_departure(&self, pattern: PatternIndex, trip: TripOrder, pos: usize) -> Timestamp {
        self.patterns[pattern as usize].departure(trip, pos)
    }

    fn trip_meta(&self, _pattern: PatternIndex, _trip: TripOrder) {}
}

/// Builds a star network with `num_lines` outbound lines of `stops_per_line`
/// stops each, all sharing hub stop 0. Every line runs `trips_per_line`
/// trips at `headway_seconds` headway, `hop_seconds` between consecutive
/// stops plus `dwell_seconds` dwell.
pub fn build_grid_network(
    num_lines: usize,
    stops_per_line: usize,
    headway_seconds: Timestamp,
    hop_seconds: Timestamp,
    dwell_seconds: Timestamp,
    trips_per_line: usize,
) -> SyntheticNetwork {
    let mut num_stops: usize = 1;
    let mut patterns = Vec::with_capacity(num_lines);

    for line in 0..num_lines {
        let mut stops = vec![0];
        for _ in 0..stops_per_line {
            stops.push(num_stops as StopIndex);
            num_stops += 1;
        }
        patterns.push(PatternData {
            stops,
            num_trips: trips_per_line,
            headway: headway_seconds,
            // Stagger each line's first departure so lines don't all board
            // in perfect lockstep at the hub.
            base_departure: line as Timestamp * 97,
            hop: hop_seconds,
            dwell: dwell_seconds,
        });
    }

    let mut transfers = vec![Vec::new(); num_stops];
    for line in 0..num_lines {
        let stop = patterns[line].stops[1];
        for other in 0..num_lines {
            if other == line {
                continue;
            }
            let other_stop = patterns[other].stops[1];
            transfers[stop as usize].push(TransferLeg { to_stop: other_stop, duration_seconds: 180, cost: None });
        }
    }

    SyntheticNetwork { num_stops, patterns, transfers }
}

pub fn build_example_network() -> SyntheticNetwork {
    build_grid_network(4, 12, 300, 120, 60, 50)
}

pub fn get_example_start_time() -> Timestamp {
    8 * 3600
}

pub fn get_example_scenario() -> (SyntheticNetwork, StopIndex, Timestamp, StopIndex) {
    let network = build_example_network();
    let start: StopIndex = 0;
    let start_time = get_example_start_time();
    let end = (network.num_stops() - 1) as StopIndex;
    (network, start, start_time, end)
}
