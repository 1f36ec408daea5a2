//! The Standard backing state (§4.4.1): one best-time record per round per
//! stop, plus a pointwise-best-overall `BestTimes` used to decide which
//! stops seed the next round's pattern scan.
//!
//! Grounded in the teacher's `raptor.rs` `tau`/`tau_star` arrays (`tau[p][i]`
//! = best time at stop `p` with `i` trips, `tau_star[p]` = best overall),
//! generalized to the spec's named transitions and to either search
//! direction via the injected `TransitCalculator`.

use fixedbitset::FixedBitSet;

use crate::arrival::{ArrivalRef, ArrivedBy, StopArrival};
use crate::calculator::TransitCalculator;
use crate::ids::{Cost, PatternIndex, RoundIndex, StopIndex, Timestamp, TripOrder};
use crate::transit_data::TransferLeg;

#[derive(Debug, Clone, Copy)]
struct StandardEntry {
    arrival_time: Timestamp,
    departure_time: Timestamp,
    arrived_by: ArrivedBy,
    previous: ArrivalRef,
    cost: Option<Cost>,
}

/// Pointwise-best arrival time across all rounds, and the set of stops
/// whose best time improved in the round currently being built (§4.4.1).
pub struct BestTimes {
    best: Vec<Timestamp>,
    touched: FixedBitSet,
    unreached: Timestamp,
}

impl BestTimes {
    fn new(num_stops: usize, unreached: Timestamp) -> Self {
        Self { best: vec![unreached; num_stops], touched: FixedBitSet::with_capacity(num_stops), unreached }
    }

    pub fn get(&self, stop: StopIndex) -> Timestamp {
        self.best[stop as usize]
    }

    pub fn touched_stops(&self) -> Vec<StopIndex> {
        self.touched.ones().map(|i| i as StopIndex).collect()
    }

    pub fn has_any_touched(&self) -> bool {
        self.touched.count_ones(..) > 0
    }

    fn clear_touched(&mut self) {
        self.touched.clear();
    }

    fn improve(&mut self, stop: StopIndex, time: Timestamp, is_better: impl Fn(Timestamp, Timestamp) -> bool) -> bool {
        let idx = stop as usize;
        if self.best[idx] == self.unreached || is_better(time, self.best[idx]) {
            self.best[idx] = time;
            self.touched.insert(idx);
            true
        } else {
            false
        }
    }
}

/// Per-round, per-stop best-time records (§4.4.1), allocated once per
/// request at `(max_rounds + 1) x num_stops` capacity — round 0 holds the
/// access arrivals, rounds `1..=max_rounds` the transit/transfer rounds.
pub struct StandardState<C> {
    calculator: C,
    num_stops: usize,
    max_rounds: usize,
    rounds: Vec<Vec<Option<StandardEntry>>>,
    best_times: BestTimes,
}

impl<C: TransitCalculator> StandardState<C> {
    pub fn new(calculator: C, num_stops: usize, max_rounds: usize) -> Self {
        let unreached = calculator.unreached_time();
        Self {
            calculator,
            num_stops,
            max_rounds,
            rounds: (0..=max_rounds).map(|_| vec![None; num_stops]).collect(),
            best_times: BestTimes::new(num_stops, unreached),
        }
    }

    pub fn best_times(&self) -> &BestTimes {
        &self.best_times
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Clears every round's entries and the best-times table, for reuse
    /// across range-raptor iterations (only the per-stop arrays are kept
    /// allocated; the resets themselves are `O(rounds * stops)`).
    pub fn reset(&mut self) {
        for round in &mut self.rounds {
            round.iter_mut().for_each(|e| *e = None);
        }
        self.best_times = BestTimes::new(self.num_stops, self.calculator.unreached_time());
    }

    fn is_better(&self, a: Timestamp, b: Timestamp) -> bool {
        self.calculator.is_better(a, b)
    }

    /// Round 0 only: seed an access arrival. `access_duration` is used only
    /// to recover the iteration departure time for path assembly
    /// (`departure_time = time - access_duration` in the calculator's
    /// direction-aware arithmetic); the state does not otherwise need it.
    pub fn set_initial(&mut self, stop: StopIndex, time: Timestamp, access_duration: Timestamp, cost: Option<Cost>) {
        self.rounds[0][stop as usize] = Some(StandardEntry {
            arrival_time: time,
            departure_time: self.calculator.minus(time, access_duration),
            arrived_by: ArrivedBy::Access,
            previous: None,
            cost,
        });
        self.best_times.improve(stop, time, |a, b| self.calculator.is_better(a, b));
    }

    /// Accepted iff `alight_time` beats both the pointwise best-overall
    /// and the previous round's best at `stop` (the second guard prevents
    /// degenerate same-round reboardings, §4.4.1).
    pub fn transit_to_stop(
        &mut self,
        round: RoundIndex,
        stop: StopIndex,
        alight_time: Timestamp,
        board_stop: StopIndex,
        board_time: Timestamp,
        pattern: PatternIndex,
        trip: TripOrder,
        cost: Option<Cost>,
    ) -> bool {
        let prev_round_best = self.rounds[round as usize - 1][stop as usize]
            .map(|e| e.arrival_time)
            .unwrap_or(self.calculator.unreached_time());

        let beats_overall = self.best_times.get(stop) == self.calculator.unreached_time()
            || self.is_better(alight_time, self.best_times.get(stop));
        let beats_prev_round =
            prev_round_best == self.calculator.unreached_time() || self.is_better(alight_time, prev_round_best);

        if !(beats_overall && beats_prev_round) {
            return false;
        }

        self.rounds[round as usize][stop as usize] = Some(StandardEntry {
            arrival_time: alight_time,
            departure_time: alight_time,
            arrived_by: ArrivedBy::Transit { board_stop, board_time, pattern, trip },
            // Boarding reads `prevRound.best[boardStop]` (§4.4.1), so the
            // back-link must point at that same round's entry, not
            // whatever the current round may separately have written for
            // `board_stop` via another pattern.
            previous: Some((round - 1, board_stop)),
            cost,
        });
        self.best_times.improve(stop, alight_time, |a, b| self.calculator.is_better(a, b));
        true
    }

    /// Accepted iff `arrival_time` beats the pointwise best-overall at the
    /// transfer's destination stop (§4.4.1).
    pub fn transfer_to_stop(
        &mut self,
        round: RoundIndex,
        from_stop: StopIndex,
        arrival_time: Timestamp,
        leg: TransferLeg,
    ) -> bool {
        let to_stop = leg.to_stop;
        let beats_overall = self.best_times.get(to_stop) == self.calculator.unreached_time()
            || self.is_better(arrival_time, self.best_times.get(to_stop));
        if !beats_overall {
            return false;
        }

        self.rounds[round as usize][to_stop as usize] = Some(StandardEntry {
            arrival_time,
            departure_time: arrival_time,
            arrived_by: ArrivedBy::Transfer { from_stop },
            // Transfers run after this round's transit expansion (§4.5),
            // so `from_stop`'s entry for this same round is already final.
            previous: Some((round, from_stop)),
            cost: leg.cost,
        });
        self.best_times.improve(to_stop, arrival_time, |a, b| self.calculator.is_better(a, b));
        true
    }

    pub fn clear_round_touched(&mut self) {
        self.best_times.clear_touched();
    }

    /// Materializes the full view for `(round, stop)`, following one
    /// `previous` link (§3: `arrivalTime` must equal `previous.arrivalTime`
    /// plus the leg duration, which the transition functions above
    /// maintain at insertion time).
    pub fn view(&self, round: RoundIndex, stop: StopIndex) -> Option<StopArrival> {
        let entry = self.rounds[round as usize][stop as usize]?;
        Some(StopArrival {
            round,
            stop,
            arrival_time: entry.arrival_time,
            departure_time: entry.departure_time,
            previous: entry.previous,
            arrived_by: entry.arrived_by,
            cost: entry.cost,
        })
    }

    pub fn view_by_ref(&self, arrival_ref: ArrivalRef) -> Option<StopArrival> {
        let (round, stop) = arrival_ref?;
        self.view(round, stop)
    }
}

impl<C: TransitCalculator> crate::path::StopArrivalLookup for StandardState<C> {
    fn resolve(&self, arrival: &StopArrival) -> Option<StopArrival> {
        self.view_by_ref(arrival.previous)
    }
}
