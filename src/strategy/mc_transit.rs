//! McTransit (§4.6): the multi-criteria route-selection strategy. Unlike
//! `StdTransit`'s single carried-trip, a pattern may be boarded from
//! several mutually non-dominated prior arrivals at once, so this
//! strategy tracks a small set of concurrently-held boardings (one per
//! distinct trip actually found) and, at every subsequent stop position,
//! both alights every boarding it holds and looks for new ones.
//!
//! Grounded in the teacher's `raptor.rs` trip-tracking loop, generalized
//! from "at most one on-trip" to "a handful of on-trips, one per pareto
//! class reached so far" — the shape McRAPTOR needs per Jonas Sorgenfrei /
//! Morten Storm Hansen's round-based multi-criteria variant this spec's
//! §4.6 describes.

use crate::calculator::TransitCalculator;
use crate::ids::{Cost, PatternIndex, RoundIndex, StopIndex, Timestamp, TripOrder};
use crate::request::McCostParams;
use crate::state::MultiCriteriaState;
use crate::strategy::RoutingStrategy;
use crate::transit_data::TransitDataProvider;
use crate::arrival::{ArrivalRef, ArrivedBy, StopArrival};

struct ActiveBoarding {
    trip: TripOrder,
    board_stop: StopIndex,
    board_time: Timestamp,
    /// Cumulative cost of the journey up to and including the board (§4.6:
    /// "each arrival stores its cumulative cost so only the delta is
    /// computed per new edge").
    cost_at_board: Cost,
    previous: ArrivalRef,
}

pub struct McTransit<'s, C: TransitCalculator + Clone> {
    calculator: C,
    state: &'s mut MultiCriteriaState<C>,
    board_slack: Timestamp,
    round: RoundIndex,
    cost_params: McCostParams,
    threshold: usize,
    boardings: Vec<ActiveBoarding>,
}

impl<'s, C: TransitCalculator + Clone + 'static> McTransit<'s, C> {
    pub fn new(
        calculator: C,
        state: &'s mut MultiCriteriaState<C>,
        board_slack: Timestamp,
        round: RoundIndex,
        cost_params: McCostParams,
        threshold: usize,
    ) -> Self {
        Self { calculator, state, board_slack, round, cost_params, threshold, boardings: Vec::new() }
    }
}

impl<'s, TD: TransitDataProvider, C: TransitCalculator + Clone + 'static> RoutingStrategy<TD> for McTransit<'s, C> {
    fn prepare_for_transit(&mut self, _data: &TD, _pattern: PatternIndex) {
        self.boardings.clear();
    }

    fn route_transit_at_stop(&mut self, data: &TD, pattern: PatternIndex, pos: usize) {
        let stop = data.pattern_stops(pattern)[pos];

        // 1. Alight every boarding currently held.
        for boarding in &self.boardings {
            let arrival_time = self.calculator.alight_time(data, self.board_slack, pattern, boarding.trip, pos);
            let in_vehicle = (arrival_time - boarding.board_time).abs() as Cost;
            let cost = boarding.cost_at_board + in_vehicle;
            let candidate = StopArrival {
                round: self.round,
                stop,
                arrival_time,
                departure_time: arrival_time,
                previous: boarding.previous,
                arrived_by: ArrivedBy::Transit {
                    board_stop: boarding.board_stop,
                    board_time: boarding.board_time,
                    pattern,
                    trip: boarding.trip,
                },
                cost: Some(cost),
            };
            self.state.add(candidate);
        }

        // 2. Try to board a new trip from every pareto-optimal arrival the
        // previous round reached at this stop.
        let previous_round = self.round - 1;
        let candidates: Vec<(ArrivalRef, StopArrival)> = self
            .state
            .arrivals_with_ref(stop)
            .filter(|(_, arrival)| arrival.round == previous_round)
            .map(|(r, a)| (r, *a))
            .collect();

        for (arrival_ref, arrival) in candidates {
            let earliest = self.calculator.earliest_board_time(self.board_slack, arrival.arrival_time);
            // No upper bound: unlike `StdTransit`'s single carried trip,
            // several boardings may be held at once here, so an earlier
            // arrival could still find a trip later than one already held.
            if let Some(found) = self.calculator.trip_search(data, pattern, pos, earliest, None, false, self.threshold) {
                if self.boardings.iter().any(|b| b.trip == found.trip) {
                    continue;
                }
                let wait = (found.time - earliest).abs();
                let cost_at_board = arrival.cost.unwrap_or(0.0) + self.cost_params.board_and_wait_cost(wait);
                self.boardings.push(ActiveBoarding {
                    trip: found.trip,
                    board_stop: stop,
                    board_time: found.time,
                    cost_at_board,
                    previous: arrival_ref,
                });
            }
        }
    }
}
