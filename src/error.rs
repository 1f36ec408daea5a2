//! Error taxonomy (`spec.md` §7), split by when the failure can occur:
//! request validation happens synchronously before any state is
//! allocated, so it gets its own type distinct from adapter-contract
//! violations discovered once the search is running.

use thiserror::Error;

/// Fails request validation at the edge of the core, before any round
/// state is allocated (§7: "Invalid request").
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    #[error("no access legs supplied")]
    EmptyAccessLegs,
    #[error("no egress legs supplied")]
    EmptyEgressLegs,
    #[error("search window must be positive, got {0}")]
    NonPositiveWindow(i64),
    #[error("earliest departure time {earliest} is not before latest arrival time {latest}")]
    ContradictoryTimeBounds { earliest: i64, latest: i64 },
    #[error("access leg references stop {0} out of range")]
    AccessStopOutOfRange(u32),
    #[error("egress leg references stop {0} out of range")]
    EgressStopOutOfRange(u32),
}

/// A violation of the `TransitDataProvider` contract (§4.1, §7). Fatal:
/// the worker stops and no partial results are returned.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("pattern {pattern} has trips out of departure order at stop position {pos}")]
    TripsNotSorted { pattern: u32, pos: usize },
    #[error("transfer from stop {from} targets out-of-range stop {to}")]
    TransferOutOfRange { from: u32, to: u32 },
    #[error("calendar predicate panicked for trip in pattern {pattern}, order {order}")]
    CalendarPredicateFailed { pattern: u32, order: u32 },
}

/// Top-level error returned by a routing request.
#[derive(Error, Debug)]
pub enum RaptorError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}
