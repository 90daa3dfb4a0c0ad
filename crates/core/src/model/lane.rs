use std::fmt;
use std::sync::Arc;

use tracelane_protocol::{Color, SharedStr};

use super::Trace;

/// Hue step between consecutive lanes, in degrees.
const LANE_HUE_STEP: u32 = 35;

/// A lane is the fundamental layout primitive: a horizontal strip
/// displaying the events of one trace.
#[derive(Clone)]
pub struct Lane {
    /// The `LANE_ID` token the lane was grouped by.
    pub key: SharedStr,
    /// Display name; starts as the key and may be renamed.
    pub name: SharedStr,
    pub color: Color,
    pub collapsed: bool,
    pub trace: Arc<dyn Trace>,
}

impl Lane {
    pub fn new(key: impl Into<SharedStr>, color: Color, trace: Arc<dyn Trace>) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            color,
            collapsed: false,
            trace,
        }
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn rename(&mut self, name: impl Into<SharedStr>) {
        self.name = name.into();
    }
}

impl fmt::Debug for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lane")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("collapsed", &self.collapsed)
            .field("events", &self.trace.num_events())
            .finish_non_exhaustive()
    }
}

/// Colour for the lane created `index`-th.
pub fn lane_color(index: usize) -> Color {
    let hue = (index as u64 * u64::from(LANE_HUE_STEP)) % 255;
    Color::from_hsv(hue as f32, 1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::trace::tests::VecTrace;

    #[test]
    fn new_lane_is_named_after_key() {
        let mut lane = Lane::new("cpu0", lane_color(0), Arc::new(VecTrace(vec![1.0])));
        assert_eq!(lane.name, "cpu0");
        lane.rename("Worker");
        assert_eq!(lane.name, "Worker");
        assert_eq!(lane.key, "cpu0");
    }

    #[test]
    fn collapse_toggles() {
        let mut lane = Lane::new("a", Color::WHITE, Arc::new(VecTrace(Vec::new())));
        assert!(!lane.collapsed);
        lane.toggle_collapsed();
        assert!(lane.collapsed);
        lane.set_collapsed(false);
        assert!(!lane.collapsed);
    }

    #[test]
    fn colors_step_around_the_wheel() {
        assert_eq!(lane_color(0), Color::from_hsv(0.0, 1.0, 1.0));
        assert_eq!(lane_color(1), Color::from_hsv(35.0, 1.0, 1.0));
        // (8 * 35) % 255 == 25
        assert_eq!(lane_color(8), Color::from_hsv(25.0, 1.0, 1.0));
    }
}
