//! External interfaces (§6): the request/tuning-parameter pair callers
//! build, the optimization flags, and the debug listener contract. No
//! wire format is mandated — these are plain Rust structs/enums,
//! following the teacher's style of configuring a search with plain
//! function arguments (`Network::new`, `raptor_query`) rather than a
//! builder-macro crate.

use crate::ids::{Cost, StopIndex, Timestamp};

/// Which routing strategy/state-backend combination to run (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Standard,
    NoWaitStd,
    BestTime,
    NoWaitBestTime,
    MultiCriteria,
}

/// An optional optimization a caller may enable (§6, §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Optimization {
    /// Run the forward/reverse heuristic pre-passes concurrently (§4.7,
    /// §5) instead of sequentially.
    Parallel,
    /// Drop stops from a pattern's per-round scan whose combined
    /// heuristic transfer lower bound exceeds the budget (§4.7).
    TransfersStopFilter,
    /// Skip a candidate stop-arrival when its destination-cost projection
    /// is already dominated by every existing destination arrival (§4.7).
    ParetoCheckAgainstDestination,
}

/// Which optimizations are active for one request. A small fixed set, so
/// a `Vec` (checked with `.contains`) is simpler than a bitflags crate —
/// matching Design Note §9's "no dynamic dispatch beyond the two named
/// seams" spirit of keeping auxiliary config plain.
#[derive(Debug, Clone, Default)]
pub struct Optimizations(Vec<Optimization>);

impl Optimizations {
    pub fn new(flags: impl IntoIterator<Item = Optimization>) -> Self {
        Self(flags.into_iter().collect())
    }

    pub fn has(&self, flag: Optimization) -> bool {
        self.0.contains(&flag)
    }
}

/// An access or egress leg as supplied in a request (§3, §6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub stop: StopIndex,
    pub duration_seconds: Timestamp,
    pub cost: Option<Cost>,
}

/// Time-window and leg parameters for one request (§6).
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub earliest_departure_time: Timestamp,
    pub latest_arrival_time: Timestamp,
    pub search_window_seconds: Timestamp,
    pub board_slack_seconds: Timestamp,
    pub access_legs: Vec<Leg>,
    pub egress_legs: Vec<Leg>,
    pub number_of_additional_transfers: u32,
}

/// Generalized-cost coefficients for the multi-criteria profile (§4.6,
/// §6). Units are seconds for reluctance-weighted axes, since §9's open
/// question resolves wait reluctance as "a factor applied to seconds of
/// wait" — walk reluctance is defined identically, applied to access,
/// egress, and transfer legs.
#[derive(Debug, Clone, Copy)]
pub struct McCostParams {
    pub board_cost: Cost,
    pub wait_reluctance: Cost,
    pub walk_reluctance: Cost,
    /// Multiplicative slack applied to the destination-cost criterion only
    /// (§4.2 "relaxed comparisons", §8 scenario S4's `relaxCostAtDestination`):
    /// a candidate destination cost `a` is kept alongside an existing one
    /// `b` whenever `a <= relax_cost_at_destination * b`, even if `a` would
    /// otherwise be dominated on cost alone. `1.0` (the default) is the
    /// strict comparator; `1.10` keeps paths within 10% of the cheapest.
    pub relax_cost_at_destination: Cost,
}

impl Default for McCostParams {
    fn default() -> Self {
        Self { board_cost: 0.0, wait_reluctance: 1.0, walk_reluctance: 1.0, relax_cost_at_destination: 1.0 }
    }
}

impl McCostParams {
    /// The boarding half of a transit leg's cost: a fixed boarding cost
    /// plus wait time (seconds between the previous alight/access and
    /// this board) weighted by `wait_reluctance` (§4.6). Charged once, at
    /// the moment a trip is boarded.
    pub fn board_and_wait_cost(&self, wait_seconds: Timestamp) -> Cost {
        self.board_cost + (wait_seconds.max(0) as Cost) * self.wait_reluctance
    }

    /// Cost of one walking leg (access, egress, or transfer): its
    /// duration weighted by `walk_reluctance` (§4.6).
    pub fn walk_leg_cost(&self, duration_seconds: Timestamp) -> Cost {
        (duration_seconds.max(0) as Cost) * self.walk_reluctance
    }

    /// The `CostRelaxation` this request's `relax_cost_at_destination`
    /// describes, applied to both the per-stop multi-criteria comparator
    /// and the destination path comparator (§4.2, §4.8).
    pub fn cost_relaxation(&self) -> crate::state::CostRelaxation {
        crate::state::CostRelaxation { factor: self.relax_cost_at_destination, delta: 0.0 }
    }
}

/// A full routing request (§6).
#[derive(Debug, Clone)]
pub struct Request {
    pub profile: Profile,
    pub search_forward: bool,
    pub search_params: SearchParams,
    pub optimizations: Optimizations,
    pub mc_cost_params: McCostParams,
}

/// Process-wide tuning knobs, re-readable per request (§6).
#[derive(Debug, Clone, Copy)]
pub struct TuningParameters {
    pub max_number_of_transfers: u32,
    pub scheduled_trip_binary_search_threshold: usize,
    pub iteration_departure_step_seconds: Timestamp,
    pub search_thread_pool_size: Option<usize>,
}

impl Default for TuningParameters {
    fn default() -> Self {
        Self {
            max_number_of_transfers: 12,
            scheduled_trip_binary_search_threshold: crate::calculator::DEFAULT_BINARY_SEARCH_THRESHOLD,
            iteration_departure_step_seconds: 60,
            search_thread_pool_size: None,
        }
    }
}

/// Reason a stop-arrival was rejected or dropped (§6 debug interface).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugReason {
    DominatedByExisting,
    EquivalentToExisting,
    DominatesExisting,
}

/// Per-request listener set receiving accept/reject/drop events for a
/// configured stop set and/or path (§6). A fixed list of function
/// references gathered at request-build time (Design Note §9) — no
/// dynamic registration on the hot path.
pub trait DebugListener {
    fn accept(&mut self, arrival: &crate::arrival::StopArrival, iteration_departure_time: Timestamp) {
        let _ = (arrival, iteration_departure_time);
    }
    fn reject(&mut self, arrival: &crate::arrival::StopArrival, reason: DebugReason) {
        let _ = (arrival, reason);
    }
    fn drop(&mut self, arrival: &crate::arrival::StopArrival, reason: DebugReason) {
        let _ = (arrival, reason);
    }
}

/// A listener that does nothing; the default when a request supplies no
/// debug subscriber.
pub struct NoopDebugListener;

impl DebugListener for NoopDebugListener {}

impl DebugListener for () {}
