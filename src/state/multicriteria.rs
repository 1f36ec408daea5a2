//! The Multi-Criteria backing state (§4.4.2): a `ParetoSetWithMarker` of
//! `StopArrival` per stop, ordered on `(arrivalTime, round, cost)`. The
//! destination-side pareto set (§4.4.2, §4.8) is `path::DestinationArrivalPaths`
//! instead — it compares `Path`, not `StopArrival`, since only it walks the
//! `previous` chain to completion.
//!
//! Grounded in the teacher's `multicriteria::Bag` (labels keyed on
//! arrival time and cost), generalized to the spec's full
//! `(arrivalTime, round, cost)` key — the round is part of the identity
//! so that trading a later arrival for fewer transfers can survive
//! dominance, which a `Bag` keyed only on (time, cost) cannot express.

use crate::arrival::StopArrival;
use crate::calculator::TransitCalculator;
use crate::ids::{Cost, StopIndex};
use crate::pareto::{DominanceResult, ParetoComparator, ParetoSetWithMarker};

/// Compares two `StopArrival`s on `(arrivalTime, round, cost)`, using the
/// injected calculator's `is_better` for the direction-sensitive arrival
/// time axis. Round and cost are always minimized.
pub struct StopArrivalComparator<C> {
    pub calculator: C,
    /// Multiplicative/additive slack applied to the cost axis only (§4.2
    /// "relaxed comparisons" are used solely for the destination-cost
    /// criterion per spec.md).
    pub cost_relaxation: CostRelaxation,
}

#[derive(Debug, Clone, Copy)]
pub struct CostRelaxation {
    pub factor: Cost,
    pub delta: Cost,
}

impl CostRelaxation {
    pub const NONE: CostRelaxation = CostRelaxation { factor: 1.0, delta: 0.0 };

    /// `true` iff `a` is still "as good as `b`" once `b` is relaxed by
    /// this slack: `a <= factor * b + delta`.
    pub(crate) fn within(&self, a: Cost, b: Cost) -> bool {
        a <= self.factor * b + self.delta
    }
}

impl<C: TransitCalculator> ParetoComparator<StopArrival> for StopArrivalComparator<C> {
    fn compare(&self, candidate: &StopArrival, existing: &StopArrival) -> DominanceResult {
        let candidate_better_time = self.calculator.is_better(candidate.arrival_time, existing.arrival_time);
        let existing_better_time = self.calculator.is_better(existing.arrival_time, candidate.arrival_time);

        let candidate_better_round = candidate.round < existing.round;
        let existing_better_round = existing.round < candidate.round;

        let (candidate_cost, existing_cost) = (candidate.cost.unwrap_or(0.0), existing.cost.unwrap_or(0.0));
        let candidate_better_cost =
            candidate_cost < existing_cost && !self.cost_relaxation.within(existing_cost, candidate_cost);
        let existing_better_cost =
            existing_cost < candidate_cost && !self.cost_relaxation.within(candidate_cost, existing_cost);

        DominanceResult::new(
            candidate_better_time || candidate_better_round || candidate_better_cost,
            existing_better_time || existing_better_round || existing_better_cost,
        )
    }
}

/// Adapts a `StopArrival` comparator to compare `(arena_idx, StopArrival)`
/// pairs on the `StopArrival` half only — the arena index is identity,
/// never a dominance criterion.
struct IndexedComparator<C>(C);

impl<C: ParetoComparator<StopArrival>> ParetoComparator<(u32, StopArrival)> for IndexedComparator<C> {
    fn compare(&self, candidate: &(u32, StopArrival), existing: &(u32, StopArrival)) -> DominanceResult {
        self.0.compare(&candidate.1, &existing.1)
    }
}

/// Per-stop multi-criteria arrivals (§4.4.2).
///
/// Each per-stop set stores `(arena_idx, StopArrival)` rather than the
/// arrival alone: a pareto drop removes an arrival from the *live
/// frontier* a stop's later expansions scan, but §3's Lifecycles clause
/// ("Round N state is not destroyed when round N+1 begins; back-links
/// reach into it") still requires any arrival that was ever handed out as
/// someone's `previous` link to stay resolvable. `arena` is the
/// append-only log that survives drops; `ArrivalRef`'s second field is
/// this backend's arena index (opaque to `StopArrivalLookup` callers).
pub struct MultiCriteriaState<C: TransitCalculator + Clone> {
    calculator: C,
    arena: Vec<StopArrival>,
    per_stop: Vec<ParetoSetWithMarker<(u32, StopArrival), IndexedComparator<StopArrivalComparator<C>>>>,
}

impl<C: TransitCalculator + Clone + 'static> MultiCriteriaState<C> {
    /// `cost_relaxation` (§4.2, §8 S4) is applied to the per-stop frontier's
    /// cost axis identically to the destination path set's — a request's
    /// `McCostParams::relax_cost_at_destination` is the single source for
    /// both, so a near-optimal-cost journey is never pruned mid-search only
    /// to have its final path accepted, or vice versa.
    pub fn new(calculator: C, num_stops: usize, cost_relaxation: CostRelaxation) -> Self {
        let per_stop = (0..num_stops)
            .map(|_| {
                ParetoSetWithMarker::new(IndexedComparator(StopArrivalComparator {
                    calculator: calculator.clone(),
                    cost_relaxation,
                }))
            })
            .collect();
        Self { calculator, arena: Vec::new(), per_stop }
    }

    pub fn set_initial(
        &mut self,
        stop: StopIndex,
        time: crate::ids::Timestamp,
        access_duration: crate::ids::Timestamp,
        cost: Option<Cost>,
    ) {
        let departure_time = self.calculator.minus(time, access_duration);
        self.add(StopArrival::access(stop, time, departure_time, cost));
    }

    /// Proposes a new arrival at `candidate.stop`; the per-stop pareto set
    /// absorbs or rejects it (§4.4.2). Always logged to the arena first so
    /// a later arrival that captured this one as its `previous` (between
    /// proposal and any subsequent drop) can still resolve it. Returns
    /// whether the candidate was accepted into the live frontier.
    pub fn add(&mut self, candidate: StopArrival) -> bool {
        let idx = self.arena.len() as u32;
        self.arena.push(candidate);
        let stop = candidate.stop as usize;
        self.per_stop[stop].add((idx, candidate))
    }

    pub fn arrivals_at(&self, stop: StopIndex) -> impl Iterator<Item = &StopArrival> {
        self.per_stop[stop as usize].iter().map(|(_, a)| a)
    }

    /// Like `arrivals_at`, but pairs each arrival with the `ArrivalRef` a
    /// new candidate should use as `previous` if it boards from this one.
    pub fn arrivals_with_ref(&self, stop: StopIndex) -> impl Iterator<Item = (crate::arrival::ArrivalRef, &StopArrival)> {
        self.per_stop[stop as usize].iter().map(|(idx, a)| (Some((a.round, *idx)), a))
    }

    pub fn marker_at(&self, stop: StopIndex) -> u64 {
        self.per_stop[stop as usize].marker()
    }

    pub fn since_with_ref(
        &self,
        stop: StopIndex,
        marker: u64,
    ) -> impl Iterator<Item = (crate::arrival::ArrivalRef, &StopArrival)> {
        self.per_stop[stop as usize].since(marker).map(|(idx, a)| (Some((a.round, *idx)), a))
    }

    pub fn is_better(&self, a: crate::ids::Timestamp, b: crate::ids::Timestamp) -> bool {
        self.calculator.is_better(a, b)
    }
}

impl<C: TransitCalculator + Clone> crate::path::StopArrivalLookup for MultiCriteriaState<C> {
    fn resolve(&self, arrival: &StopArrival) -> Option<StopArrival> {
        let (_, idx) = arrival.previous?;
        self.arena.get(idx as usize).copied()
    }
}
