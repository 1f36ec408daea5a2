//! The transit-data adapter (§4.1): an opaque, read-only view of patterns,
//! trips, transfers and calendar membership. The core never mutates it and
//! assumes no ordering beyond what this trait states.
//!
//! Grounded in the teacher's `Network`/`Route`/`StopTime` index scheme
//! (`route_stops_idx`/`stop_times_idx` offsets into flat arrays), but
//! generalized behind a trait instead of baked into one GTFS-backed struct:
//! ingestion is out of scope for this crate (`spec.md` §1), so the adapter
//! is the seam a caller's GTFS/OSM loader plugs into.

use crate::error::AdapterError;
use crate::ids::{Cost, PatternIndex, StopIndex, Timestamp, TripOrder};

/// A precomputed off-vehicle walk between two stops (§3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferLeg {
    pub to_stop: StopIndex,
    pub duration_seconds: Timestamp,
    pub cost: Option<Cost>,
}

/// A pre-computed off-network segment from the true origin to a stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessLeg {
    pub stop: StopIndex,
    pub duration_seconds: Timestamp,
    pub cost: Option<Cost>,
}

/// A pre-computed off-network segment from a stop to the true destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EgressLeg {
    pub stop: StopIndex,
    pub duration_seconds: Timestamp,
    pub cost: Option<Cost>,
}

/// Read-only contract the core consumes. `TripMeta` is opaque debug
/// metadata (§3) threaded through `StopArrival`/`Path` but never
/// inspected by the core itself.
///
/// Not object-safe by design: per Design Note §9 the only two allowed
/// dynamic-dispatch seams are the directional calculator and the routing
/// strategy, so implementations are monomorphized as a generic parameter
/// on the worker rather than boxed.
pub trait TransitDataProvider {
    type TripMeta: Clone;

    fn num_stops(&self) -> usize;

    /// Patterns containing any of `stops`. The caller (the worker) tracks
    /// which stops changed in the previous round; this adapter does not
    /// need to remember that itself.
    fn patterns_touching<'a>(
        &'a self,
        stops: &'a [StopIndex],
    ) -> Box<dyn Iterator<Item = PatternIndex> + 'a>;

    fn transfers_from(&self, stop: StopIndex) -> &[TransferLeg];

    fn is_trip_in_service(&self, trip: crate::ids::TripRef) -> bool;

    /// Ordered stop sequence of `pattern`. Invariant (§3): the same
    /// sequence for every trip of the pattern.
    fn pattern_stops(&self, pattern: PatternIndex) -> &[StopIndex];

    fn num_trips(&self, pattern: PatternIndex) -> usize;

    /// Arrival time of `trip` at the `pos`-th stop of its pattern.
    fn trip_arrival(&self, pattern: PatternIndex, trip: TripOrder, pos: usize) -> Timestamp;

    /// Departure time of `trip` at the `pos`-th stop of its pattern.
    fn trip_departure(&self, pattern: PatternIndex, trip: TripOrder, pos: usize) -> Timestamp;

    fn trip_meta(&self, pattern: PatternIndex, trip: TripOrder) -> Self::TripMeta;
}

/// Cheap structural check run once per request (§7): every transfer
/// target must name a stop the adapter actually has. O(stops + edges), so
/// it is safe to run on the hot path unlike `validate_trip_order` below.
pub fn validate_transfers<TD: TransitDataProvider>(data: &TD) -> Result<(), AdapterError> {
    let num_stops = data.num_stops() as StopIndex;
    for from in 0..num_stops {
        for transfer in data.transfers_from(from) {
            if transfer.to_stop >= num_stops {
                return Err(AdapterError::TransferOutOfRange { from: from as u32, to: transfer.to_stop });
            }
        }
    }
    Ok(())
}

/// Verifies one pattern's trips are sorted by departure time at every
/// stop position (§3, §4.1) — the invariant `calculator::board_search`'s
/// binary-search branch relies on. O(trips * stops) per pattern, so this
/// is meant to run once per adapter build/reload rather than per request;
/// `route`/`route_with` never call it.
pub fn validate_trip_order<TD: TransitDataProvider>(data: &TD, pattern: PatternIndex) -> Result<(), AdapterError> {
    let stops = data.pattern_stops(pattern);
    let num_trips = data.num_trips(pattern);
    for pos in 0..stops.len() {
        let mut prev: Option<Timestamp> = None;
        for trip in 0..num_trips {
            let departure = data.trip_departure(pattern, trip as TripOrder, pos);
            if let Some(p) = prev {
                if departure < p {
                    return Err(AdapterError::TripsNotSorted { pattern: pattern as u32, pos });
                }
            }
            prev = Some(departure);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Toy {
        transfers: Vec<TransferLeg>,
        departures: Vec<Timestamp>,
    }

    impl TransitDataProvider for Toy {
        type TripMeta = ();
        fn num_stops(&self) -> usize {
            2
        }
        fn patterns_touching<'a>(&'a self, _stops: &'a [StopIndex]) -> Box<dyn Iterator<Item = PatternIndex> + 'a> {
            Box::new(std::iter::once(0))
        }
        fn transfers_from(&self, _stop: StopIndex) -> &[TransferLeg] {
            &self.transfers
        }
        fn is_trip_in_service(&self, _trip: crate::ids::TripRef) -> bool {
            true
        }
        fn pattern_stops(&self, _pattern: PatternIndex) -> &[StopIndex] {
            &[0, 1]
        }
        fn num_trips(&self, _pattern: PatternIndex) -> usize {
            self.departures.len()
        }
        fn trip_arrival(&self, _pattern: PatternIndex, trip: TripOrder, _pos: usize) -> Timestamp {
            self.departures[trip as usize] + 100
        }
        fn trip_departure(&self, _pattern: PatternIndex, trip: TripOrder, _pos: usize) -> Timestamp {
            self.departures[trip as usize]
        }
        fn trip_meta(&self, _pattern: PatternIndex, _trip: TripOrder) {}
    }

    #[test]
    fn validate_transfers_accepts_in_range_targets() {
        let data = Toy { transfers: vec![TransferLeg { to_stop: 1, duration_seconds: 60, cost: None }], departures: vec![0] };
        assert!(validate_transfers(&data).is_ok());
    }

    #[test]
    fn validate_transfers_rejects_out_of_range_target() {
        let data = Toy { transfers: vec![TransferLeg { to_stop: 5, duration_seconds: 60, cost: None }], departures: vec![0] };
        let err = validate_transfers(&data).unwrap_err();
        assert!(matches!(err, AdapterError::TransferOutOfRange { from: 0, to: 5 }));
    }

    #[test]
    fn validate_trip_order_accepts_sorted_departures() {
        let data = Toy { transfers: Vec::new(), departures: vec![0, 60, 120] };
        assert!(validate_trip_order(&data, 0).is_ok());
    }

    #[test]
    fn validate_trip_order_rejects_unsorted_departures() {
        let data = Toy { transfers: Vec::new(), departures: vec![0, 120, 60] };
        let err = validate_trip_order(&data, 0).unwrap_err();
        assert!(matches!(err, AdapterError::TripsNotSorted { pattern: 0, pos: 0 }));
    }
}
