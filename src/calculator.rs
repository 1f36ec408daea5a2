//! The directional transit calculator (§4.3): encapsulates every place the
//! forward and reverse searches differ so the rest of the engine
//! (worker, strategies, state) is written once and stays direction-agnostic.
//!
//! Grounded in the teacher's `raptor_query` trip-search loop (`raptor.rs`):
//! the same "scan trips from the current index backwards, stop once the
//! departure is too early" logic here, generalized to both directions and
//! exposed as a trait so the worker never special-cases direction.

use crate::ids::{PatternIndex, Timestamp, TripOrder, TripRef, FORWARD_UNREACHED, REVERSE_UNREACHED};
use crate::transit_data::TransitDataProvider;

/// Number of trips scanned linearly before falling back to binary search
/// (§4.3, §6 `scheduledTripBinarySearchThreshold`).
pub const DEFAULT_BINARY_SEARCH_THRESHOLD: usize = 50;

/// Outcome of a trip search at one stop position: the found trip plus the
/// time it was found at (board departure time, or alight arrival time).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripSearchResult {
    pub trip: TripOrder,
    pub time: Timestamp,
}

/// The direction-specific half of the algorithm (§4.3 table). Forward and
/// reverse both implement this identically in shape; only the arithmetic
/// and iteration order differ.
pub trait TransitCalculator {
    fn plus(&self, t: Timestamp, d: Timestamp) -> Timestamp;
    fn minus(&self, t: Timestamp, d: Timestamp) -> Timestamp;

    /// `true` iff `a` is a strict improvement over `b`.
    fn is_better(&self, a: Timestamp, b: Timestamp) -> bool;

    fn unreached_time(&self) -> Timestamp;

    fn earliest_board_time(&self, board_slack: Timestamp, stop_arrival_time: Timestamp) -> Timestamp;

    /// Time a passenger is considered to alight/board at `pos` on `trip`:
    /// the trip's arrival time forward, or departure time plus board slack
    /// in reverse (§4.3 table).
    fn alight_time<TD: TransitDataProvider>(
        &self,
        data: &TD,
        board_slack: Timestamp,
        pattern: PatternIndex,
        trip: TripOrder,
        pos: usize,
    ) -> Timestamp;

    /// Iterate departure minutes for the range-raptor window, latest to
    /// earliest (forward) or earliest to latest (reverse) — §4.5's "depart
    /// later first" packing relies on this order.
    fn minute_iterator(
        &self,
        earliest_departure_or_latest_arrival: Timestamp,
        window_seconds: Timestamp,
        step_seconds: Timestamp,
    ) -> Box<dyn Iterator<Item = Timestamp>>;

    /// Stop-position indices of a pattern in the order this direction
    /// walks them: ascending forward, descending reverse.
    fn stop_position_iterator(&self, num_stops: usize) -> Box<dyn Iterator<Item = usize>>;

    /// Find the best boardable (forward) or alightable (reverse) trip at
    /// `pos` on `pattern`, no earlier/later than `time`, bounded above by
    /// `upper_bound_trip` (the trip currently held, if any — a later
    /// search never needs to look past it). `exact` requires equality
    /// rather than "at least as good", used only in round 1 (§4.3).
    /// Trips failing `TransitDataProvider::is_trip_in_service` (§4.1
    /// calendar filtering) are skipped as candidates. `threshold` is the
    /// linear-scan/binary-search cutoff (§6
    /// `scheduledTripBinarySearchThreshold`).
    fn trip_search<TD: TransitDataProvider>(
        &self,
        data: &TD,
        pattern: PatternIndex,
        pos: usize,
        time: Timestamp,
        upper_bound_trip: Option<TripOrder>,
        exact: bool,
        threshold: usize,
    ) -> Option<TripSearchResult>;
}

/// Forward calculator: time increases, board after arriving plus slack,
/// minutes iterate from the end of the window down to the earliest
/// departure.
pub struct ForwardCalculator;

impl TransitCalculator for ForwardCalculator {
    fn plus(&self, t: Timestamp, d: Timestamp) -> Timestamp {
        t + d
    }

    fn minus(&self, t: Timestamp, d: Timestamp) -> Timestamp {
        t - d
    }

    fn is_better(&self, a: Timestamp, b: Timestamp) -> bool {
        a < b
    }

    fn unreached_time(&self) -> Timestamp {
        FORWARD_UNREACHED
    }

    fn earliest_board_time(&self, board_slack: Timestamp, stop_arrival_time: Timestamp) -> Timestamp {
        stop_arrival_time + board_slack
    }

    fn alight_time<TD: TransitDataProvider>(
        &self,
        data: &TD,
        _board_slack: Timestamp,
        pattern: PatternIndex,
        trip: TripOrder,
        pos: usize,
    ) -> Timestamp {
        data.trip_arrival(pattern, trip, pos)
    }

    fn minute_iterator(
        &self,
        earliest_departure: Timestamp,
        window_seconds: Timestamp,
        step_seconds: Timestamp,
    ) -> Box<dyn Iterator<Item = Timestamp>> {
        let last = earliest_departure + window_seconds;
        let step = step_seconds.max(1);
        let n = ((last - earliest_departure) / step) as i64;
        Box::new((0..=n).rev().map(move |i| earliest_departure + i * step))
    }

    fn stop_position_iterator(&self, num_stops: usize) -> Box<dyn Iterator<Item = usize>> {
        Box::new(0..num_stops)
    }

    fn trip_search<TD: TransitDataProvider>(
        &self,
        data: &TD,
        pattern: PatternIndex,
        pos: usize,
        time: Timestamp,
        upper_bound_trip: Option<TripOrder>,
        exact: bool,
        threshold: usize,
    ) -> Option<TripSearchResult> {
        board_search(data, pattern, pos, time, upper_bound_trip, exact, threshold)
    }
}

/// Reverse calculator: time decreases as the search proceeds, alighting
/// happens before arriving minus slack, minutes iterate from the earliest
/// latest-arrival bound up to the window end.
pub struct ReverseCalculator;

impl TransitCalculator for ReverseCalculator {
    fn plus(&self, t: Timestamp, d: Timestamp) -> Timestamp {
        t - d
    }

    fn minus(&self, t: Timestamp, d: Timestamp) -> Timestamp {
        t + d
    }

    fn is_better(&self, a: Timestamp, b: Timestamp) -> bool {
        a > b
    }

    fn unreached_time(&self) -> Timestamp {
        REVERSE_UNREACHED
    }

    fn earliest_board_time(&self, _board_slack: Timestamp, stop_arrival_time: Timestamp) -> Timestamp {
        stop_arrival_time
    }

    fn alight_time<TD: TransitDataProvider>(
        &self,
        data: &TD,
        board_slack: Timestamp,
        pattern: PatternIndex,
        trip: TripOrder,
        pos: usize,
    ) -> Timestamp {
        data.trip_departure(pattern, trip, pos) + board_slack
    }

    fn minute_iterator(
        &self,
        latest_arrival: Timestamp,
        window_seconds: Timestamp,
        step_seconds: Timestamp,
    ) -> Box<dyn Iterator<Item = Timestamp>> {
        let first = latest_arrival - window_seconds;
        let step = step_seconds.max(1);
        let n = ((latest_arrival - first) / step) as i64;
        Box::new((0..=n).rev().map(move |i| latest_arrival - i * step))
    }

    fn stop_position_iterator(&self, num_stops: usize) -> Box<dyn Iterator<Item = usize>> {
        Box::new((0..num_stops).rev())
    }

    fn trip_search<TD: TransitDataProvider>(
        &self,
        data: &TD,
        pattern: PatternIndex,
        pos: usize,
        time: Timestamp,
        upper_bound_trip: Option<TripOrder>,
        exact: bool,
        threshold: usize,
    ) -> Option<TripSearchResult> {
        alight_search(data, pattern, pos, time, upper_bound_trip, exact, threshold)
    }
}

/// Earliest in-service trip at `pos` on `pattern` departing at or after
/// `time` (strict `>=`, Design Note §9's board-slack-equality decision),
/// bounded by `upper_bound_trip` exclusive when given. Linear scan below
/// `threshold` trips, binary search above — the teacher's `raptor.rs`
/// reverse linear scan, generalized to also support binary search for
/// large patterns.
///
/// A trip failing `is_trip_in_service` (§4.1 calendar filtering) is
/// skipped in favor of the next-best one: since trips are sorted by
/// departure, every trip from the binary search's landing point onward
/// still matches `time` in non-exact mode, so scanning forward from
/// there until an in-service trip is found (or the match condition lapses)
/// preserves the same asymptotic cost.
fn board_search<TD: TransitDataProvider>(
    data: &TD,
    pattern: PatternIndex,
    pos: usize,
    time: Timestamp,
    upper_bound_trip: Option<TripOrder>,
    exact: bool,
    threshold: usize,
) -> Option<TripSearchResult> {
    let num_trips = data.num_trips(pattern);
    let bound = upper_bound_trip.map(|t| t as usize).unwrap_or(num_trips);
    if bound == 0 {
        return None;
    }

    let matches = |departure: Timestamp| if exact { departure == time } else { departure >= time };

    let start = if bound <= threshold {
        (0..bound).find(|&trip| matches(data.trip_departure(pattern, trip as TripOrder, pos)))
    } else {
        // Trips within a pattern are sorted by departure (§3 invariant),
        // so binary search for the first trip whose departure is >= time.
        let mut lo = 0usize;
        let mut hi = bound;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let departure = data.trip_departure(pattern, mid as TripOrder, pos);
            if departure >= time {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        if lo >= bound || !matches(data.trip_departure(pattern, lo as TripOrder, pos)) {
            None
        } else {
            Some(lo)
        }
    };

    let mut trip = start?;
    while trip < bound {
        let departure = data.trip_departure(pattern, trip as TripOrder, pos);
        if !matches(departure) {
            return None;
        }
        if data.is_trip_in_service(TripRef::new(pattern, trip as TripOrder)) {
            return Some(TripSearchResult { trip: trip as TripOrder, time: departure });
        }
        trip += 1;
    }
    None
}

/// Latest in-service trip at `pos` on `pattern` arriving at or before
/// `time` (used by the reverse calculator, which walks the search
/// backwards in time), with the same linear/binary-search split,
/// exact-match variant and calendar-filtering skip-forward as
/// `board_search`. `upper_bound_trip` here bounds the search from *below*
/// (exclusive), since in reverse the trip index only ever increases as the
/// search progresses.
fn alight_search<TD: TransitDataProvider>(
    data: &TD,
    pattern: PatternIndex,
    pos: usize,
    time: Timestamp,
    upper_bound_trip: Option<TripOrder>,
    exact: bool,
    threshold: usize,
) -> Option<TripSearchResult> {
    let num_trips = data.num_trips(pattern);
    let lower = upper_bound_trip.map(|t| t as usize + 1).unwrap_or(0);
    if lower >= num_trips {
        return None;
    }

    let matches = |arrival: Timestamp| if exact { arrival == time } else { arrival <= time };

    let start = if num_trips - lower <= threshold {
        (lower..num_trips).rev().find(|&trip| matches(data.trip_arrival(pattern, trip as TripOrder, pos)))
    } else {
        let mut lo = lower;
        let mut hi = num_trips;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let arrival = data.trip_arrival(pattern, mid as TripOrder, pos);
            if arrival <= time {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo == lower {
            None
        } else {
            let found = lo - 1;
            if matches(data.trip_arrival(pattern, found as TripOrder, pos)) {
                Some(found)
            } else {
                None
            }
        }
    };

    let mut trip = start?;
    loop {
        let arrival = data.trip_arrival(pattern, trip as TripOrder, pos);
        if !matches(arrival) {
            return None;
        }
        if data.is_trip_in_service(TripRef::new(pattern, trip as TripOrder)) {
            return Some(TripSearchResult { trip: trip as TripOrder, time: arrival });
        }
        if trip == lower {
            return None;
        }
        trip -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TripRef;

    // A single pattern, `num_trips` trips, each departing/arriving `pos`
    // at `base + trip_idx * headway` (forward-sorted, as the §3 invariant
    // requires).
    struct FixturePattern {
        num_trips: usize,
        headway: Timestamp,
        base_departure: Timestamp,
        base_arrival: Timestamp,
        out_of_service: Vec<TripOrder>,
    }

    impl TransitDataProvider for FixturePattern {
        type TripMeta = ();

        fn num_stops(&self) -> usize {
            2
        }

        fn patterns_touching<'a>(
            &'a self,
            _stops: &'a [crate::ids::StopIndex],
        ) -> Box<dyn Iterator<Item = PatternIndex> + 'a> {
            Box::new(std::iter::once(0))
        }

        fn transfers_from(&self, _stop: crate::ids::StopIndex) -> &[crate::transit_data::TransferLeg] {
            &[]
        }

        fn is_trip_in_service(&self, trip: TripRef) -> bool {
            !self.out_of_service.contains(&trip.trip)
        }

        fn pattern_stops(&self, _pattern: PatternIndex) -> &[crate::ids::StopIndex] {
            &[0, 1]
        }

        fn num_trips(&self, _pattern: PatternIndex) -> usize {
            self.num_trips
        }

        fn trip_arrival(&self, _pattern: PatternIndex, trip: TripOrder, _pos: usize) -> Timestamp {
            self.base_arrival + trip as Timestamp * self.headway
        }

        fn trip_departure(&self, _pattern: PatternIndex, trip: TripOrder, _pos: usize) -> Timestamp {
            self.base_departure + trip as Timestamp * self.headway
        }

        fn trip_meta(&self, _pattern: PatternIndex, _trip: TripOrder) {}
    }

    // Testable property 4 (spec.md §8): increasing the earliest-board-time
    // argument never returns an earlier trip.
    #[test]
    fn trip_search_monotonic_in_board_time() {
        let data =
            FixturePattern { num_trips: 200, headway: 60, base_departure: 0, base_arrival: 600, out_of_service: Vec::new() };
        let mut last_departure = Timestamp::MIN;
        for minute in 0..300 {
            let time = minute * 30;
            if let Some(found) = board_search(&data, 0, 0, time, None, false, DEFAULT_BINARY_SEARCH_THRESHOLD) {
                assert!(found.time >= last_departure);
                last_departure = found.time;
            }
        }
    }

    #[test]
    fn board_search_linear_and_binary_agree() {
        let small =
            FixturePattern { num_trips: 10, headway: 60, base_departure: 0, base_arrival: 600, out_of_service: Vec::new() };
        let large =
            FixturePattern { num_trips: 200, headway: 60, base_departure: 0, base_arrival: 600, out_of_service: Vec::new() };
        // Same relative query against a pattern below and above the
        // linear/binary threshold should find "the same logical trip"
        // (index 5, since both start departures at 0 with a 60s headway).
        let small_hit = board_search(&small, 0, 0, 301, None, false, DEFAULT_BINARY_SEARCH_THRESHOLD).unwrap();
        let large_hit = board_search(&large, 0, 0, 301, None, false, DEFAULT_BINARY_SEARCH_THRESHOLD).unwrap();
        assert_eq!(small_hit.trip, 6);
        assert_eq!(large_hit.trip, 6);
    }

    #[test]
    fn exact_match_requires_equality() {
        let data =
            FixturePattern { num_trips: 10, headway: 60, base_departure: 0, base_arrival: 600, out_of_service: Vec::new() };
        assert!(board_search(&data, 0, 0, 301, None, true, DEFAULT_BINARY_SEARCH_THRESHOLD).is_none());
        assert!(board_search(&data, 0, 0, 300, None, true, DEFAULT_BINARY_SEARCH_THRESHOLD).is_some());
    }

    #[test]
    fn alight_search_respects_lower_bound() {
        let data =
            FixturePattern { num_trips: 10, headway: 60, base_departure: 0, base_arrival: 600, out_of_service: Vec::new() };
        let found = alight_search(&data, 0, 0, 10_000, Some(3), false, DEFAULT_BINARY_SEARCH_THRESHOLD).unwrap();
        assert!(found.trip > 3);
    }

    // Calendar filtering (§4.1 `isTripInService`): a trip failing the
    // calendar predicate is skipped in favor of the next-best in-service
    // one, in both the linear-scan and binary-search regimes.
    #[test]
    fn board_search_skips_out_of_service_trip_linear() {
        let data = FixturePattern {
            num_trips: 10,
            headway: 60,
            base_departure: 0,
            base_arrival: 600,
            out_of_service: vec![5],
        };
        let found = board_search(&data, 0, 0, 300, None, false, DEFAULT_BINARY_SEARCH_THRESHOLD).unwrap();
        assert_eq!(found.trip, 6);
    }

    #[test]
    fn board_search_skips_out_of_service_trip_binary() {
        let data = FixturePattern {
            num_trips: 200,
            headway: 60,
            base_departure: 0,
            base_arrival: 600,
            out_of_service: vec![5],
        };
        let found = board_search(&data, 0, 0, 300, None, false, DEFAULT_BINARY_SEARCH_THRESHOLD).unwrap();
        assert_eq!(found.trip, 6);
    }

    #[test]
    fn alight_search_skips_out_of_service_trip() {
        let data = FixturePattern {
            num_trips: 10,
            headway: 60,
            base_departure: 0,
            base_arrival: 600,
            out_of_service: vec![5],
        };
        let found = alight_search(&data, 0, 0, 900, None, false, DEFAULT_BINARY_SEARCH_THRESHOLD).unwrap();
        assert_eq!(found.trip, 4);
    }
}
