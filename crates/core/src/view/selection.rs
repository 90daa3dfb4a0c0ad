use std::borrow::Cow;
use std::ops::Range;

use tracelane_protocol::Color;

use crate::model::{Lane, TimeRange};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Idle,
    /// Primary button held since a press on the lanes.
    Dragging,
    Committed,
}

/// Lanes covered by a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LaneSpan {
    /// No lane constraint.
    #[default]
    All,
    /// Inclusive lane index range; bounds may be in either order.
    Lanes(TimeRange<usize>),
}

impl LaneSpan {
    pub fn single(lane: usize) -> Self {
        LaneSpan::Lanes(TimeRange::new(lane, lane))
    }

    pub fn fix(self) -> Self {
        match self {
            LaneSpan::All => LaneSpan::All,
            LaneSpan::Lanes(range) => LaneSpan::Lanes(range.fix()),
        }
    }

    pub fn contains(&self, lane: usize) -> bool {
        match self {
            LaneSpan::All => true,
            LaneSpan::Lanes(range) => range.contains(lane),
        }
    }

    /// Lane indices covered, clipped to `lane_count`.
    pub fn indices(&self, lane_count: usize) -> Range<usize> {
        match self.fix() {
            LaneSpan::All => 0..lane_count,
            LaneSpan::Lanes(range) => {
                range.begin.min(lane_count)..range.end.saturating_add(1).min(lane_count)
            }
        }
    }
}

/// The user's time/lane selection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Selection {
    pub state: SelectionState,
    /// Raw drag range; `begin` is where the drag started.
    pub time: TimeRange<f64>,
    pub lanes: LaneSpan,
    /// False until the pointer moves after the press.
    pub has_selection: bool,
}

impl Selection {
    pub fn start(&mut self, t: f64, lanes: LaneSpan) {
        self.state = SelectionState::Dragging;
        self.time.set(t, t);
        self.lanes = lanes;
        self.has_selection = false;
    }

    /// Extend the drag to time `t` and, for a lane-bound selection, to
    /// `lane` when the pointer is over one.
    pub fn extend(&mut self, t: f64, lane: Option<usize>) {
        self.has_selection = true;
        self.time.end = t;
        if let LaneSpan::Lanes(range) = &mut self.lanes
            && let Some(lane) = lane
        {
            range.end = lane;
        }
    }

    pub fn finish(&mut self) {
        if self.state == SelectionState::Dragging {
            self.state = if self.has_selection {
                SelectionState::Committed
            } else {
                SelectionState::Idle
            };
        }
    }

    pub fn clear(&mut self) {
        *self = Selection::default();
    }
}

/// The event closest to the pointer, if within hover distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hover {
    pub lane: usize,
    pub event: usize,
}

/// One row of the selected-event list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedEvent {
    pub time: f64,
    pub text: String,
    pub color: Color,
    pub lane: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectedEvents {
    /// Every selected event, sorted by time.
    Events(Vec<ListedEvent>),
    /// More events than the list cap; only the total is known.
    TooMany(usize),
}

impl Default for SelectedEvents {
    fn default() -> Self {
        SelectedEvents::Events(Vec::new())
    }
}

impl SelectedEvents {
    pub fn total(&self) -> usize {
        match self {
            SelectedEvents::Events(events) => events.len(),
            SelectedEvents::TooMany(total) => *total,
        }
    }

    /// Display lines: the full event text per event, or a single summary.
    pub fn lines(&self) -> Vec<String> {
        match self {
            SelectedEvents::Events(events) => events.iter().map(|e| e.text.clone()).collect(),
            SelectedEvents::TooMany(total) => vec![format!("Selected {total} events")],
        }
    }
}

/// Collect the events of `lanes[lane_indices]` within the closed interval
/// `time`. Once the running count exceeds `cap`, text enumeration stops and
/// only the total is reported.
pub fn collect_selected_events(
    lanes: &[Lane],
    lane_indices: Range<usize>,
    time: TimeRange<f64>,
    cap: usize,
) -> SelectedEvents {
    let time = time.fix();
    let mut events = Vec::new();
    let mut total = 0usize;

    for lane_idx in lane_indices {
        let Some(lane) = lanes.get(lane_idx) else {
            break;
        };
        let Some(range) = lane.trace.events_in_range(time.begin, time.end) else {
            continue;
        };
        total += range.len();
        if total > cap {
            continue;
        }
        events.extend(range.map(|idx| ListedEvent {
            time: lane.trace.event_time(idx),
            text: lane
                .trace
                .event_text(idx, true)
                .map(Cow::into_owned)
                .unwrap_or_default(),
            color: lane.color,
            lane: lane_idx,
        }));
    }

    if total > cap {
        return SelectedEvents::TooMany(total);
    }
    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    SelectedEvents::Events(events)
}
