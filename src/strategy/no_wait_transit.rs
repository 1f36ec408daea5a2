//! NoWaitTransit (§4.6): the heuristic route-selection strategy used only
//! by the forward/reverse pre-passes (§4.7). Identical in shape to
//! `StdTransit`, but it boards "as if" no wait ever occurred — the board
//! time recorded is `earliestBoardTime`, not the trip's actual departure —
//! and a running time-shift corrects alight times back to what an actual
//! trip would produce. This yields an optimistic travel-duration lower
//! bound; it never writes a path-reconstructible state.

use crate::calculator::TransitCalculator;
use crate::ids::{PatternIndex, Timestamp, TripOrder};
use crate::state::BestTimesOnlyState;
use crate::strategy::RoutingStrategy;
use crate::transit_data::TransitDataProvider;

pub struct NoWaitTransit<'s, C: TransitCalculator> {
    calculator: C,
    state: &'s mut BestTimesOnlyState<C>,
    board_slack: Timestamp,
    threshold: usize,
    on_trip: Option<TripOrder>,
    on_trip_transfers: u32,
    /// `actualDeparture - earliestBoardTime` at the moment this trip was
    /// boarded (§4.6): subtracted from every alight time computed while
    /// this trip is held, so the recorded duration excludes the wait the
    /// passenger would actually experience.
    on_trip_time_shift: Timestamp,
}

impl<'s, C: TransitCalculator + Clone> NoWaitTransit<'s, C> {
    pub fn new(calculator: C, state: &'s mut BestTimesOnlyState<C>, board_slack: Timestamp, threshold: usize) -> Self {
        Self {
            calculator,
            state,
            board_slack,
            threshold,
            on_trip: None,
            on_trip_transfers: 0,
            on_trip_time_shift: 0,
        }
    }
}

impl<'s, TD: TransitDataProvider, C: TransitCalculator + Clone> RoutingStrategy<TD> for NoWaitTransit<'s, C> {
    fn prepare_for_transit(&mut self, _data: &TD, _pattern: PatternIndex) {
        self.on_trip = None;
        self.on_trip_time_shift = 0;
    }

    fn route_transit_at_stop(&mut self, data: &TD, pattern: PatternIndex, pos: usize) {
        let stop = data.pattern_stops(pattern)[pos];

        if let Some(trip) = self.on_trip {
            let actual_alight = self.calculator.alight_time(data, self.board_slack, pattern, trip, pos);
            let shifted = self.calculator.minus(actual_alight, self.on_trip_time_shift);
            self.state.improve(stop, shifted, self.on_trip_transfers);
        }

        if self.state.is_reached(stop) {
            let best = self.state.best_time(stop);
            let earliest = self.calculator.earliest_board_time(self.board_slack, best);
            if let Some(found) = self.calculator.trip_search(data, pattern, pos, earliest, self.on_trip, false, self.threshold) {
                self.on_trip = Some(found.trip);
                self.on_trip_transfers = self.state.best_transfers(stop) + 1;
                self.on_trip_time_shift = self.calculator.minus(found.time, earliest);
            }
        }
    }
}
