//! Range-Raptor: a round-based, pareto-optimal public-transit journey
//! planner. The core is direction- and profile-agnostic; callers supply a
//! `TransitDataProvider` adapter over their own schedule data and a
//! `Request` describing the search, and get back either a set of
//! pareto-optimal `Path`s or, for the lighter profiles, best-time bounds.

pub mod arrival;
pub mod calculator;
pub mod error;
pub mod heuristics;
pub mod ids;
pub mod pareto;
pub mod path;
pub mod request;
pub mod state;
pub mod strategy;
pub mod transit_data;
pub mod worker;

pub use arrival::{ArrivedBy, StopArrival};
pub use error::{AdapterError, RaptorError, RequestError};
pub use path::{Leg, Path};
pub use request::{
    DebugListener, DebugReason, Leg as RequestLeg, McCostParams, NoopDebugListener, Optimization, Optimizations, Profile, Request,
    SearchParams, TuningParameters,
};
pub use transit_data::TransitDataProvider;
pub use worker::{BestTimesResult, CancelToken, WorkerLifecycle};

use crate::calculator::{ForwardCalculator, ReverseCalculator};
use crate::request::DebugListener;

/// Either shape a request can come back as (§6): a pareto-optimal path
/// set for the path-producing profiles, or best-time/transfer bounds for
/// the two profiles that never reconstruct a path.
#[derive(Debug, Clone)]
pub enum RouteOutput {
    Paths(Vec<Path>),
    BestTimes(BestTimesResult),
}

/// Runs one request to completion with no cancellation and no lifecycle
/// subscriber — the common case.
pub fn route<TD: TransitDataProvider>(
    data: &TD,
    request: &Request,
    tuning: &TuningParameters,
) -> Result<RouteOutput, RaptorError> {
    route_with(data, request, tuning, &(), &mut (), &mut ())
}

/// Runs one request, reporting lifecycle events to `lifecycle`, accept
/// events to `debug`, and checking `cancel` once per range-raptor
/// iteration (§5, §6, §7, Design Note §9). Dispatches on `request.profile`
/// to the matching worker entry point and on `request.search_forward` to
/// the matching `TransitCalculator`.
///
/// Only accepted stop-arrivals are reported to `debug`: the pareto set's
/// `add` only reports whether a candidate survived, not which existing
/// elements it rejected or displaced, so `DebugListener::reject`/`drop`
/// are never called from here.
pub fn route_with<TD: TransitDataProvider>(
    data: &TD,
    request: &Request,
    tuning: &TuningParameters,
    cancel: &impl CancelToken,
    lifecycle: &mut impl WorkerLifecycle,
    debug: &mut impl DebugListener,
) -> Result<RouteOutput, RaptorError> {
    let forward = request.search_forward;

    match request.profile {
        Profile::Standard => {
            let paths = if forward {
                worker::route_standard(data, ForwardCalculator, request, tuning, true, true, cancel, lifecycle, debug)?
            } else {
                worker::route_standard(data, ReverseCalculator, request, tuning, false, true, cancel, lifecycle, debug)?
            };
            Ok(RouteOutput::Paths(paths))
        }
        Profile::NoWaitStd => {
            let paths = if forward {
                worker::route_standard(data, ForwardCalculator, request, tuning, true, false, cancel, lifecycle, debug)?
            } else {
                worker::route_standard(data, ReverseCalculator, request, tuning, false, false, cancel, lifecycle, debug)?
            };
            Ok(RouteOutput::Paths(paths))
        }
        Profile::BestTime | Profile::NoWaitBestTime => {
            let result = if forward {
                worker::route_best_times(data, ForwardCalculator, request, tuning, true, cancel)?
            } else {
                worker::route_best_times(data, ReverseCalculator, request, tuning, false, cancel)?
            };
            Ok(RouteOutput::BestTimes(result))
        }
        Profile::MultiCriteria => {
            let paths = if forward {
                worker::route_multi_criteria(data, ForwardCalculator, request, tuning, true, cancel, lifecycle, debug)?
            } else {
                worker::route_multi_criteria(data, ReverseCalculator, request, tuning, false, cancel, lifecycle, debug)?
            };
            Ok(RouteOutput::Paths(paths))
        }
    }
}
