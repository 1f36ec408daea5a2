//! Best-times-only state (§4.4.3): used exclusively by the heuristic
//! pre-passes. Stores one minimum arrival time per stop and the minimum
//! transfer count seen, no back-links — heuristics only ever need a lower
//! bound vector, never a reconstructible path.

use crate::calculator::TransitCalculator;
use crate::ids::{StopIndex, Timestamp};

pub struct BestTimesOnlyState<C> {
    calculator: C,
    best_time: Vec<Timestamp>,
    best_transfers: Vec<u32>,
    touched: Vec<StopIndex>,
}

impl<C: TransitCalculator> BestTimesOnlyState<C> {
    pub fn new(calculator: C, num_stops: usize) -> Self {
        let unreached = calculator.unreached_time();
        Self {
            calculator,
            best_time: vec![unreached; num_stops],
            best_transfers: vec![u32::MAX; num_stops],
            touched: Vec::new(),
        }
    }

    pub fn set_initial(&mut self, stop: StopIndex, time: Timestamp) {
        self.best_time[stop as usize] = time;
        self.best_transfers[stop as usize] = 0;
        self.touched.push(stop);
    }

    /// Accepted iff `time` beats the current best at `stop`. Returns
    /// whether it was accepted.
    pub fn improve(&mut self, stop: StopIndex, time: Timestamp, transfers: u32) -> bool {
        let idx = stop as usize;
        let unreached = self.calculator.unreached_time();
        let improved = self.best_time[idx] == unreached || self.calculator.is_better(time, self.best_time[idx]);
        if improved {
            self.best_time[idx] = time;
            self.best_transfers[idx] = self.best_transfers[idx].min(transfers);
            self.touched.push(stop);
            true
        } else {
            false
        }
    }

    /// Stops touched since the last `clear_touched` call (the round-scoped
    /// view `NoWaitTransit`'s board check needs — mirrors `BestTimes`'s
    /// touched bitset in the standard backend).
    pub fn touched_stops(&self) -> &[StopIndex] {
        &self.touched
    }

    pub fn has_any_touched(&self) -> bool {
        !self.touched.is_empty()
    }

    pub fn clear_touched(&mut self) {
        self.touched.clear();
    }

    pub fn best_time(&self, stop: StopIndex) -> Timestamp {
        self.best_time[stop as usize]
    }

    pub fn best_transfers(&self, stop: StopIndex) -> u32 {
        self.best_transfers[stop as usize]
    }

    /// Lower-bound travel duration from the search root to `stop`: the
    /// difference between the recorded best time and the root's start
    /// time. The caller passes the root time since this state does not
    /// track it itself (it may be reused across several access stops with
    /// different start times, e.g. the reverse pass from several egress
    /// stops at once).
    pub fn travel_duration(&self, stop: StopIndex, root_time: Timestamp) -> Option<Timestamp> {
        let best = self.best_time(stop);
        if best == self.calculator.unreached_time() {
            None
        } else {
            Some((best - root_time).abs())
        }
    }

    pub fn is_reached(&self, stop: StopIndex) -> bool {
        self.best_time(stop) != self.calculator.unreached_time()
    }
}
