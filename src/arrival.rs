//! The stop-arrival view (§3): the record that every state backend
//! (standard, multi-criteria, best-times-only) ultimately produces, and
//! that path assembly walks through `previous` to reconstruct a `Path`.
//!
//! `previous` is an arena index rather than a pointer (Design Note §9):
//! state owns per-round arrays, `StopArrival` only borrows into them, so
//! ownership stays trivial and the chain can never outlive the state that
//! produced it.

use crate::ids::{Cost, PatternIndex, RoundIndex, StopIndex, Timestamp, TripOrder};

/// How a stop was reached, mirroring `spec.md` §3's `arrivedBy` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivedBy {
    Access,
    Transit { board_stop: StopIndex, board_time: Timestamp, pattern: PatternIndex, trip: TripOrder },
    Transfer { from_stop: StopIndex },
}

/// An index into a round's arrival arena. `None` terminates the chain at
/// an access arrival (round 0).
pub type ArrivalRef = Option<(RoundIndex, u32)>;

/// A stop-arrival record. Cheap to copy; the expensive back-chain lives in
/// the arena the state backend owns.
#[derive(Debug, Clone, Copy)]
pub struct StopArrival {
    pub round: RoundIndex,
    pub stop: StopIndex,
    pub arrival_time: Timestamp,
    pub departure_time: Timestamp,
    pub previous: ArrivalRef,
    pub arrived_by: ArrivedBy,
    pub cost: Option<Cost>,
}

impl StopArrival {
    /// `departure_time` here is the *iteration* departure time the access
    /// leg started from (i.e. `arrival_time` with the access duration
    /// subtracted back out), not the arrival time itself — path assembly
    /// recovers the access leg's duration from the difference between the
    /// two (`path.rs`).
    pub fn access(stop: StopIndex, arrival_time: Timestamp, departure_time: Timestamp, cost: Option<Cost>) -> Self {
        Self {
            round: 0,
            stop,
            arrival_time,
            departure_time,
            previous: None,
            arrived_by: ArrivedBy::Access,
            cost,
        }
    }
}
