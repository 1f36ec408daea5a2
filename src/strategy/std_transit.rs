//! StdTransit (§4.6): the standard single-best-per-stop route-selection
//! strategy, grounded in the teacher's `raptor.rs` trip-tracking loop
//! (`current_trip`/`boarding_stop` carried across a pattern's stop scan),
//! generalized behind `StandardState`/`TransitCalculator` so it works for
//! either direction.

use crate::calculator::TransitCalculator;
use crate::ids::{PatternIndex, RoundIndex, StopIndex, Timestamp, TripOrder};
use crate::state::StandardState;
use crate::strategy::RoutingStrategy;
use crate::transit_data::TransitDataProvider;

pub struct StdTransit<'s, C: TransitCalculator> {
    calculator: C,
    state: &'s mut StandardState<C>,
    board_slack: Timestamp,
    round: RoundIndex,
    /// Round 1 only: require the board time to equal the iteration
    /// departure exactly, rather than "at least as good" (§4.3's "exact
    /// match" variant — "so the engine does not invent extra wait at the
    /// origin").
    exact_origin_board: bool,
    threshold: usize,
    on_trip: Option<TripOrder>,
    on_trip_board_stop: StopIndex,
    on_trip_board_time: Timestamp,
}

impl<'s, C: TransitCalculator + Clone> StdTransit<'s, C> {
    pub fn new(
        calculator: C,
        state: &'s mut StandardState<C>,
        board_slack: Timestamp,
        round: RoundIndex,
        exact_origin_board: bool,
        threshold: usize,
    ) -> Self {
        Self {
            calculator,
            state,
            board_slack,
            round,
            exact_origin_board,
            threshold,
            on_trip: None,
            on_trip_board_stop: 0,
            on_trip_board_time: 0,
        }
    }
}

impl<'s, TD: TransitDataProvider, C: TransitCalculator + Clone> RoutingStrategy<TD> for StdTransit<'s, C> {
    fn prepare_for_transit(&mut self, _data: &TD, _pattern: PatternIndex) {
        self.on_trip = None;
    }

    fn route_transit_at_stop(&mut self, data: &TD, pattern: PatternIndex, pos: usize) {
        let stop = data.pattern_stops(pattern)[pos];

        // 1. Alight the trip currently held, if any.
        if let Some(trip) = self.on_trip {
            let alight_time = self.calculator.alight_time(data, self.board_slack, pattern, trip, pos);
            self.state.transit_to_stop(
                self.round,
                stop,
                alight_time,
                self.on_trip_board_stop,
                self.on_trip_board_time,
                pattern,
                trip,
                None,
            );
        }

        // 2. Try to improve boarding from this stop, if it was reached in
        // the previous round (`view(round - 1, stop)` is Some iff that
        // round actually wrote an entry for it, which is exactly "touched
        // in previous round", §4.4.1).
        if let Some(prev) = self.state.view(self.round - 1, stop) {
            let earliest = self.calculator.earliest_board_time(self.board_slack, prev.arrival_time);
            let exact = self.exact_origin_board && self.round == 1;
            if let Some(found) = self.calculator.trip_search(data, pattern, pos, earliest, self.on_trip, exact, self.threshold) {
                self.on_trip = Some(found.trip);
                self.on_trip_board_stop = stop;
                self.on_trip_board_time = found.time;
            }
        }
    }
}
