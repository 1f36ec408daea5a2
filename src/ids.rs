//! Index types shared by every component. Kept as plain integer aliases
//! rather than newtypes, matching the teacher's `StopIndex`/`RouteIndex`
//! convention: the core never needs to distinguish "a stop index" from
//! "any other u32" at the type level, only at the API boundary.

/// Seconds since midnight of the service day. Signed so the reverse
/// calculator can represent `unreachedTime() = -infinity` and so
/// boarding-slack/time arithmetic never needs saturating adds.
pub type Timestamp = i64;

/// Sentinel used by the forward calculator for "never reached".
pub const FORWARD_UNREACHED: Timestamp = Timestamp::MAX;
/// Sentinel used by the reverse calculator for "never reached".
pub const REVERSE_UNREACHED: Timestamp = Timestamp::MIN;

pub type StopIndex = u32;
pub type PatternIndex = u32;
pub type TripOrder = u32;
pub type RoundIndex = u32;

/// Generalized cost unit (§4.6). `f32` matches the teacher's
/// `PathfindingCost`.
pub type Cost = f32;

/// Opaque reference to one scheduled trip: a pattern plus the trip's
/// position within that pattern, mirroring the teacher's
/// `GlobalTripIndex { route_idx, trip_order }` renamed to this spec's
/// pattern/trip vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripRef {
    pub pattern: PatternIndex,
    pub trip: TripOrder,
}

impl TripRef {
    pub fn new(pattern: PatternIndex, trip: TripOrder) -> Self {
        Self { pattern, trip }
    }
}
