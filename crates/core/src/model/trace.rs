use std::borrow::Cow;
use std::ops::Range;

use super::TimeRange;

/// An ordered sequence of timestamped events, queryable by index or by time.
///
/// Implementations guarantee that [`Trace::event_time`] is non-decreasing in
/// the index. Equal timestamps are allowed; their order is the (stable)
/// order in which they were ingested. Every query below relies on this for
/// its binary search.
pub trait Trace: Send + Sync {
    fn num_events(&self) -> usize;

    /// Timestamp of event `idx` in seconds, or `0.0` if `idx` is out of range.
    fn event_time(&self, idx: usize) -> f64;

    /// Text of event `idx`. With `full` the whole source line is returned;
    /// otherwise the leading timestamp field is stripped. `None` for an
    /// out-of-range index or a line with no detail text.
    fn event_text(&self, idx: usize, full: bool) -> Option<Cow<'_, str>>;

    /// Neighbours of the partition point of `t`: the last event strictly
    /// before `t` and the first event at or after `t`. Either side is `None`
    /// at the array boundary.
    fn find_events(&self, t: f64) -> (Option<usize>, Option<usize>) {
        let count = self.num_events();
        let split = partition(self, |time| time < t);
        (split.checked_sub(1), (split < count).then_some(split))
    }

    /// The event whose timestamp is closest to `t`. Ties at the midpoint of
    /// two neighbours go to the right one.
    fn find_nearest_event(&self, t: f64) -> Option<usize> {
        match self.find_events(t) {
            (None, right) => right,
            (left, None) => left,
            (Some(left), Some(right)) => {
                let mid = (self.event_time(left) + self.event_time(right)) / 2.0;
                Some(if t < mid { left } else { right })
            }
        }
    }

    /// Indices of all events with `begin <= time <= end`. The bounds may be
    /// given in either order. `None` when no event falls in the range.
    fn events_in_range(&self, begin: f64, end: f64) -> Option<Range<usize>> {
        let range = TimeRange::new(begin, end).fix();
        let first = partition(self, |time| time < range.begin);
        let past_last = partition(self, |time| time <= range.end);
        (first < past_last).then_some(first..past_last)
    }

    /// Timestamps of the first and last event.
    fn time_bounds(&self) -> Option<TimeRange<f64>> {
        let last = self.num_events().checked_sub(1)?;
        Some(TimeRange::new(self.event_time(0), self.event_time(last)))
    }
}

/// Number of events between two inclusive neighbour indices as returned by
/// [`Trace::find_events`]; zero if either side is missing or they cross.
pub fn index_span_len(left: Option<usize>, right: Option<usize>) -> usize {
    match (left, right) {
        (Some(l), Some(r)) if l <= r => r - l + 1,
        _ => 0,
    }
}

/// First index for which `pred(event_time)` is false.
fn partition<T: Trace + ?Sized>(trace: &T, pred: impl Fn(f64) -> bool) -> usize {
    let mut left = 0;
    let mut right = trace.num_events();
    while left < right {
        let mid = left + (right - left) / 2;
        if pred(trace.event_time(mid)) {
            left = mid + 1;
        } else {
            right = mid;
        }
    }
    left
}
