//! Routing strategies (§4.6): the one polymorphic axis, alongside the
//! directional calculator, that the worker is allowed to dispatch on
//! (Design Note §9). Each strategy "given a pattern, explores its stops";
//! the worker drives the outer loop and leaves all per-pattern logic here.

pub mod mc_transit;
pub mod no_wait_transit;
pub mod std_transit;

pub use mc_transit::McTransit;
pub use no_wait_transit::NoWaitTransit;
pub use std_transit::StdTransit;

use crate::ids::PatternIndex;
use crate::transit_data::TransitDataProvider;

/// Given a pattern, explore its stops (§4.6). `prepare_for_transit` resets
/// any per-pattern scan state (the strategy is reused across every pattern
/// touched in a round); `route_transit_at_stop` is then called once per
/// stop position, in the order the calculator's `stop_position_iterator`
/// dictates.
pub trait RoutingStrategy<TD: TransitDataProvider> {
    fn prepare_for_transit(&mut self, data: &TD, pattern: PatternIndex);
    fn route_transit_at_stop(&mut self, data: &TD, pattern: PatternIndex, pos: usize);
}
