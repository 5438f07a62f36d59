//! Priority-ordered interval scheduling with tolerated overlap
//!
//! Intervals are visited from highest to lowest priority (ties keep input
//! order). An interval is accepted unless it overlaps an already accepted
//! one by more than `max_ratio` of the shorter of the two.

/// Half-open interval with a priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
    pub priority: u32,
}

impl Interval {
    pub fn new(start: usize, end: usize, priority: u32) -> Self {
        Self {
            start,
            end,
            priority,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the shared range
    #[inline]
    pub fn overlap(&self, other: &Interval) -> usize {
        self.end
            .min(other.end)
            .saturating_sub(self.start.max(other.start))
    }

    /// Shared length divided by the shorter length
    pub fn overlap_ratio(&self, other: &Interval) -> f64 {
        let shorter = self.len().min(other.len());
        if shorter == 0 {
            return 0.0;
        }
        self.overlap(other) as f64 / shorter as f64
    }
}

/// Indices of accepted intervals, in acceptance (priority) order
///
/// Empty intervals are never accepted.
pub fn schedule(intervals: &[Interval], max_ratio: f64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    order.sort_by(|&a, &b| intervals[b].priority.cmp(&intervals[a].priority));

    let mut accepted: Vec<usize> = Vec::new();
    for idx in order {
        let candidate = &intervals[idx];
        if candidate.is_empty() {
            continue;
        }
        let conflicts = accepted
            .iter()
            .any(|&other| candidate.overlap_ratio(&intervals[other]) > max_ratio);
        if !conflicts {
            accepted.push(idx);
        }
    }
    accepted
}
