//! The pareto set primitive (§4.2). Generic over a comparator that reports
//! dominance on *both* sides independently, so mutual dominance (each
//! element better on a different criterion) is representable — a plain
//! `Ordering`-returning comparator cannot express that, per Design Note §9.
//!
//! Grounded in the teacher's `multicriteria::Bag` (`dominates`/`retain`),
//! generalized from the fixed (arrival_time, cost) pair to an arbitrary
//! comparator and given the accept/reject/drop event stream and marker
//! support `spec.md` asks for.

/// Result of comparing a candidate against an existing element.
///
/// `new_has_better` / `existing_has_better` are independent: both `true`
/// is mutual dominance (both retained), both `false` means the two are
/// equivalent (the candidate is rejected as a duplicate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DominanceResult {
    pub new_has_better: bool,
    pub existing_has_better: bool,
}

impl DominanceResult {
    pub const fn new(new_has_better: bool, existing_has_better: bool) -> Self {
        Self { new_has_better, existing_has_better }
    }

    /// `existing` strictly dominates the candidate: reject it outright.
    fn existing_dominates(self) -> bool {
        self.existing_has_better && !self.new_has_better
    }

    /// The candidate strictly dominates `existing`: drop `existing`.
    fn new_dominates(self) -> bool {
        self.new_has_better && !self.existing_has_better
    }

    /// Neither side has a better criterion: the two are equivalent.
    fn equivalent(self) -> bool {
        !self.new_has_better && !self.existing_has_better
    }
}

/// Compares a candidate against an existing retained element.
///
/// Implementations may apply slack on any criterion (`a <= f*b + delta`,
/// §4.2 "Relaxed comparisons") — the relaxation only ever loosens what
/// counts as "existing has a better criterion", so it can only grow the
/// retained set relative to the strict comparator, never shrink it.
pub trait ParetoComparator<T> {
    fn compare(&self, candidate: &T, existing: &T) -> DominanceResult;
}

/// Why an element was rejected or dropped, passed to listener hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParetoEvent {
    /// The candidate was dominated by an existing element and rejected.
    Rejected,
    /// The candidate was equivalent to an existing element and rejected.
    Equivalent,
    /// An existing element was dropped because the candidate dominates it.
    Dropped,
}

/// A generic pareto-optimal set: retains exactly the elements not
/// dominated (under `C`) by any other retained element.
pub struct ParetoSet<T, C> {
    elements: Vec<T>,
    comparator: C,
    listeners: Vec<Box<dyn FnMut(&T, ParetoEvent)>>,
}

impl<T, C: ParetoComparator<T>> ParetoSet<T, C> {
    pub fn new(comparator: C) -> Self {
        Self { elements: Vec::new(), comparator, listeners: Vec::new() }
    }

    pub fn with_listener(mut self, listener: impl FnMut(&T, ParetoEvent) + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    fn notify(&mut self, element: &T, event: ParetoEvent) {
        for listener in &mut self.listeners {
            listener(element, event);
        }
    }

    /// Insertion semantics (§4.2):
    /// - if any existing element dominates the candidate, reject it;
    /// - if the candidate is equivalent to an existing element, reject it;
    /// - otherwise insert it and drop every existing element it dominates
    ///   (mutual-dominance pairs are never dropped).
    ///
    /// Returns `true` iff the set changed.
    pub fn add(&mut self, candidate: T) -> bool {
        let mut to_drop = Vec::new();
        for (i, existing) in self.elements.iter().enumerate() {
            let result = self.comparator.compare(&candidate, existing);
            if result.existing_dominates() {
                self.notify(&candidate, ParetoEvent::Rejected);
                return false;
            }
            if result.equivalent() {
                self.notify(&candidate, ParetoEvent::Equivalent);
                return false;
            }
            if result.new_dominates() {
                to_drop.push(i);
            }
        }

        for &i in to_drop.iter().rev() {
            let dropped = self.elements.remove(i);
            self.notify(&dropped, ParetoEvent::Dropped);
        }

        self.elements.push(candidate);
        true
    }
}

impl<T, C: ParetoComparator<T> + Default> Default for ParetoSet<T, C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

/// A `ParetoSet` that also tracks a monotonic marker so a caller can
/// iterate "elements added since the marker" (§4.2) — used so round N can
/// iterate exactly the stop-arrivals newly added in round N-1 without
/// rescanning the whole per-stop set.
///
/// Kept as its own small duplicate of `ParetoSet`'s insertion logic
/// (rather than wrapping it) because a later drop can remove an element
/// from the *middle* of the vector, which would shift a plain vector-index
/// marker out from under elements added before it. Each retained element
/// instead carries the insertion sequence number it was added with, so
/// `since(marker)` is a filter on that number, not on position.
pub struct ParetoSetWithMarker<T, C> {
    elements: Vec<(u64, T)>,
    comparator: C,
    next_seq: u64,
    listeners: Vec<Box<dyn FnMut(&T, ParetoEvent)>>,
}

impl<T, C: ParetoComparator<T>> ParetoSetWithMarker<T, C> {
    pub fn new(comparator: C) -> Self {
        Self { elements: Vec::new(), comparator, next_seq: 0, listeners: Vec::new() }
    }

    pub fn with_listener(mut self, listener: impl FnMut(&T, ParetoEvent) + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter().map(|(_, t)| t)
    }

    pub fn as_slice_with_seq(&self) -> &[(u64, T)] {
        &self.elements
    }

    fn notify(&mut self, element: &T, event: ParetoEvent) {
        for listener in &mut self.listeners {
            listener(element, event);
        }
    }

    /// Same semantics as `ParetoSet::add`.
    pub fn add(&mut self, candidate: T) -> bool {
        let mut to_drop = Vec::new();
        for (i, (_, existing)) in self.elements.iter().enumerate() {
            let result = self.comparator.compare(&candidate, existing);
            if result.existing_dominates() {
                self.notify(&candidate, ParetoEvent::Rejected);
                return false;
            }
            if result.equivalent() {
                self.notify(&candidate, ParetoEvent::Equivalent);
                return false;
            }
            if result.new_dominates() {
                to_drop.push(i);
            }
        }

        for &i in to_drop.iter().rev() {
            let (_, dropped) = self.elements.remove(i);
            self.notify(&dropped, ParetoEvent::Dropped);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.elements.push((seq, candidate));
        true
    }

    /// A marker identifying "everything inserted up to and including this
    /// call". `since(marker)` yields elements inserted strictly after it,
    /// regardless of any drops that happened to elements before it.
    pub fn marker(&self) -> u64 {
        self.next_seq
    }

    pub fn since(&self, marker: u64) -> impl Iterator<Item = &T> {
        self.elements.iter().filter(move |(seq, _)| *seq >= marker).map(|(_, t)| t)
    }
}
