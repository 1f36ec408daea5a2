//! Path assembly (§4.8): back-links from a destination arrival through a
//! stop-arrival state's `previous` chain into a `Path` of legs, plus the
//! pareto set of final paths (`DestinationArrivalPaths`) that the worker's
//! output is drawn from.
//!
//! Grounded in the teacher's `Journey::from_tau`/`from_tau_bag`
//! (`journey.rs`): the same "walk back through parent pointers, collect
//! legs, then reverse" shape, generalized to read from either state
//! backend via `StopArrivalLookup` and to run in both directions via the
//! injected `TransitCalculator`.

use crate::arrival::{ArrivedBy, StopArrival};
use crate::calculator::TransitCalculator;
use crate::ids::{Cost, PatternIndex, StopIndex, Timestamp, TripOrder};
use crate::pareto::{DominanceResult, ParetoComparator, ParetoSetWithMarker};
use crate::state::CostRelaxation;

/// One leg of an assembled path (§3 `Path`).
#[derive(Debug, Clone, PartialEq)]
pub enum Leg {
    Access { stop: StopIndex, duration_seconds: Timestamp },
    Transit {
        board_stop: StopIndex,
        board_time: Timestamp,
        alight_stop: StopIndex,
        alight_time: Timestamp,
        pattern: PatternIndex,
        trip: TripOrder,
    },
    Transfer { from_stop: StopIndex, to_stop: StopIndex, duration_seconds: Timestamp },
    Egress { stop: StopIndex, duration_seconds: Timestamp },
}

/// An assembled journey: access leg, alternating transit/transfer legs,
/// egress leg, plus the totals path-ranking reads (§3 `Path`, §4.8).
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub legs: Vec<Leg>,
    pub departure_time: Timestamp,
    pub arrival_time: Timestamp,
    pub duration_seconds: Timestamp,
    pub number_of_transfers: u32,
    pub cost: Option<Cost>,
}

/// Something path assembly can walk back through: the read-only slice of
/// a stop-arrival state's transitions a `view`/`view_by_ref` pair exposes.
/// Implemented by `StandardState` directly; the Mc backend resolves a
/// `previous` link by re-reading the owning per-stop pareto set.
pub trait StopArrivalLookup {
    fn resolve(&self, arrival: &StopArrival) -> Option<StopArrival>;
}

/// Walks a terminal stop-arrival's `previous` chain back to its round-0
/// seed and assembles a `Path` (§4.8).
///
/// `forward` selects which side of the journey `terminal` and `seed_leg`
/// describe: when `true`, `terminal` is the egress-side arrival (the
/// chain's seed, round 0, is the true access leg); when `false`, the
/// search ran backward from the destination, so `terminal` is the
/// access-side arrival reached last and the chain's seed is the egress
/// leg. In both cases the walk (`terminal` -> ... -> round 0) proceeds in
/// order of *decreasing* round, which is chronological order for a
/// reverse search and anti-chronological for a forward one — hence the
/// conditional final reversal below (§4.3's "path mapper" row).
///
/// Board/alight semantics are swapped for the reverse direction: what the
/// reverse calculator recorded as `board_stop`/`board_time` on a
/// `Transit` arrival is, in real wall-clock terms, where the passenger
/// alighted, and `current.stop`/`current.arrival_time` is where they
/// boarded (§4.3).
pub fn assemble_path<L: StopArrivalLookup, C: TransitCalculator>(
    lookup: &L,
    calculator: &C,
    forward: bool,
    terminal_stop: StopIndex,
    terminal_arrival: &StopArrival,
    terminal_leg_duration_seconds: Timestamp,
) -> Path {
    let mut legs = Vec::new();
    let mut current = *terminal_arrival;
    let seed_arrival;

    loop {
        match current.arrived_by {
            ArrivedBy::Access => {
                seed_arrival = current;
                break;
            }
            ArrivedBy::Transit { board_stop, board_time, pattern, trip } => {
                let leg = if forward {
                    Leg::Transit {
                        board_stop,
                        board_time,
                        alight_stop: current.stop,
                        alight_time: current.arrival_time,
                        pattern,
                        trip,
                    }
                } else {
                    Leg::Transit {
                        board_stop: current.stop,
                        board_time: current.arrival_time,
                        alight_stop: board_stop,
                        alight_time: board_time,
                        pattern,
                        trip,
                    }
                };
                legs.push(leg);
                current = lookup.resolve(&current).expect("transit arrival missing predecessor");
            }
            ArrivedBy::Transfer { from_stop } => {
                let duration = (current.arrival_time - current.departure_time).abs();
                let leg = if forward {
                    Leg::Transfer { from_stop, to_stop: current.stop, duration_seconds: duration }
                } else {
                    Leg::Transfer { from_stop: current.stop, to_stop: from_stop, duration_seconds: duration }
                };
                legs.push(leg);
                current = lookup.resolve(&current).expect("transfer arrival missing predecessor");
            }
        }
    }

    if forward {
        legs.reverse();
        legs.insert(0, Leg::Access { stop: seed_arrival.stop, duration_seconds: (seed_arrival.arrival_time - seed_arrival.departure_time).abs() });
        legs.push(Leg::Egress { stop: terminal_stop, duration_seconds: terminal_leg_duration_seconds });
    } else {
        legs.insert(0, Leg::Access { stop: terminal_stop, duration_seconds: terminal_leg_duration_seconds });
        legs.push(Leg::Egress {
            stop: seed_arrival.stop,
            duration_seconds: (seed_arrival.arrival_time - seed_arrival.departure_time).abs(),
        });
    }

    let (departure_time, arrival_time) = if forward {
        (seed_arrival.departure_time, calculator.plus(terminal_arrival.arrival_time, terminal_leg_duration_seconds))
    } else {
        (calculator.minus(terminal_arrival.arrival_time, terminal_leg_duration_seconds), seed_arrival.departure_time)
    };

    let duration_seconds = (arrival_time - departure_time).abs();
    let number_of_transfers = legs.iter().filter(|l| matches!(l, Leg::Transit { .. })).count().saturating_sub(1) as u32;

    Path { legs, departure_time, arrival_time, duration_seconds, number_of_transfers, cost: terminal_arrival.cost }
}

/// Pareto comparator for final paths, keyed on `(endTime, numberOfTransfers,
/// totalTravelDuration, optionally cost with relaxation)` (§4.8).
struct PathComparator {
    forward: bool,
    cost_relaxation: CostRelaxation,
}

impl ParetoComparator<Path> for PathComparator {
    fn compare(&self, candidate: &Path, existing: &Path) -> DominanceResult {
        let end = |p: &Path| if self.forward { p.arrival_time } else { p.departure_time };
        let (c_end, e_end) = (end(candidate), end(existing));
        let (candidate_better_end, existing_better_end) =
            if self.forward { (c_end < e_end, e_end < c_end) } else { (c_end > e_end, e_end > c_end) };

        let candidate_better_transfers = candidate.number_of_transfers < existing.number_of_transfers;
        let existing_better_transfers = existing.number_of_transfers < candidate.number_of_transfers;

        let candidate_better_duration = candidate.duration_seconds < existing.duration_seconds;
        let existing_better_duration = existing.duration_seconds < candidate.duration_seconds;

        let (c_cost, e_cost) = (candidate.cost.unwrap_or(0.0), existing.cost.unwrap_or(0.0));
        let candidate_better_cost = c_cost < e_cost && !self.cost_relaxation.within(e_cost, c_cost);
        let existing_better_cost = e_cost < c_cost && !self.cost_relaxation.within(c_cost, e_cost);

        DominanceResult::new(
            candidate_better_end || candidate_better_transfers || candidate_better_duration || candidate_better_cost,
            existing_better_end || existing_better_transfers || existing_better_duration || existing_better_cost,
        )
    }
}

/// The destination pareto set path assembly feeds and the worker reads
/// its final result from (§4.8).
pub struct DestinationArrivalPaths {
    set: ParetoSetWithMarker<Path, PathComparator>,
}

impl DestinationArrivalPaths {
    pub fn new(forward: bool, cost_relaxation: CostRelaxation) -> Self {
        Self { set: ParetoSetWithMarker::new(PathComparator { forward, cost_relaxation }) }
    }

    pub fn add(&mut self, path: Path) -> bool {
        self.set.add(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.set.iter()
    }

    pub fn into_vec(self) -> Vec<Path> {
        self.set.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::ForwardCalculator;
    use crate::ids::RoundIndex;
    use std::collections::HashMap;

    // A trivial in-memory arena keyed by (round, stop) mirroring what
    // `StandardState::view_by_ref` would look up, used to exercise
    // `assemble_path` without spinning up a full state backend.
    struct Arena(HashMap<(RoundIndex, StopIndex), StopArrival>);

    impl StopArrivalLookup for Arena {
        fn resolve(&self, arrival: &StopArrival) -> Option<StopArrival> {
            let (round, stop) = arrival.previous?;
            self.0.get(&(round, stop)).copied()
        }
    }

    #[test]
    fn forward_two_stop_single_trip() {
        // Matches scenario S1: access A at 08:00, board/alight A->B
        // 08:00-08:10, egress at B with 0s.
        let access = StopArrival::access(0, 28_800, 28_800, None);
        let mut arena = HashMap::new();
        arena.insert((0, 0), access);
        let egress_arrival = StopArrival {
            round: 1,
            stop: 1,
            arrival_time: 29_400,
            departure_time: 29_400,
            previous: Some((0, 0)),
            arrived_by: ArrivedBy::Transit { board_stop: 0, board_time: 28_800, pattern: 0, trip: 0 },
            cost: None,
        };
        let arena = Arena(arena);

        let path = assemble_path(&arena, &ForwardCalculator, true, 1, &egress_arrival, 0);
        assert_eq!(path.departure_time, 28_800);
        assert_eq!(path.arrival_time, 29_400);
        assert_eq!(path.duration_seconds, 600);
        assert_eq!(path.number_of_transfers, 0);
        assert!(matches!(path.legs.first(), Some(Leg::Access { stop: 0, .. })));
        assert!(matches!(path.legs.last(), Some(Leg::Egress { stop: 1, .. })));
    }
}
