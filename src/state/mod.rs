//! Stop-arrival state (§4.4): the three backing implementations named in
//! the spec, each behind its own module.

pub mod best_times;
pub mod multicriteria;
pub mod standard;

pub use best_times::BestTimesOnlyState;
pub use multicriteria::{CostRelaxation, MultiCriteriaState};
pub use standard::{BestTimes, StandardState};
