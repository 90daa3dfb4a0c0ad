use serde::{Deserialize, Serialize};

use crate::model::TimeRange;

/// The visible time window, the vertical scroll offset and the pixel width
/// of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub time: TimeRange<f64>,
    pub scroll_y: f64,
    pub width_px: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            time: TimeRange::new(0.0, 1.0),
            scroll_y: 0.0,
            width_px: 1.0,
        }
    }
}

impl Viewport {
    fn width(&self) -> f64 {
        self.width_px.max(1.0)
    }

    pub fn time_per_px(&self) -> f64 {
        self.time.delta() / self.width()
    }

    /// X coordinate of absolute time `t`.
    pub fn abs_time_to_coord(&self, t: f64) -> f64 {
        ((t - self.time.begin) / self.time.delta()) * self.width()
    }

    /// Absolute time at X coordinate `c`.
    pub fn coord_to_abs_time(&self, c: f64) -> f64 {
        self.time.begin + c * self.time_per_px()
    }

    /// Zoom in by `scale` (zoom out for `scale < 1`) keeping the midpoint.
    pub fn zoom_by(&mut self, scale: f64) {
        if scale <= 0.0 || !scale.is_finite() {
            return;
        }
        let mid = self.time.midpoint();
        let half = self.time.delta() / 2.0;
        self.time.set(mid - half / scale, mid + half / scale);
    }

    /// Multiply the window span by `span_scale` around `anchor`, then shift
    /// it by `shift` seconds.
    pub fn zoom_around(&mut self, anchor: f64, span_scale: f64, shift: f64) {
        let begin = anchor - (anchor - self.time.begin) * span_scale + shift;
        let end = anchor + (self.time.end - anchor) * span_scale + shift;
        self.time.set(begin, end);
    }

    /// Widen the window by `amount` seconds, split between the two edges so
    /// that the point at `anchor_frac` of the width stays put.
    pub fn stretch(&mut self, amount: f64, anchor_frac: f64) {
        self.time.begin -= amount * anchor_frac;
        self.time.end += amount * (1.0 - anchor_frac);
    }

    /// Move the window by `dt` seconds.
    pub fn pan_by(&mut self, dt: f64) {
        self.time.begin += dt;
        self.time.end += dt;
    }

    /// Show `bounds` with `padding` times its span added on each side and
    /// reset the vertical scroll. A single instant gets a one second window
    /// centred on it.
    pub fn fit(&mut self, bounds: TimeRange<f64>, padding: f64) {
        let bounds = bounds.fix();
        if bounds.delta() > 0.0 {
            let pad = bounds.delta() * padding;
            self.time.set(bounds.begin - pad, bounds.end + pad);
        } else {
            self.time.set(bounds.begin - 0.5, bounds.begin + 0.5);
        }
        self.scroll_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            time: TimeRange::new(10.0, 20.0),
            scroll_y: 0.0,
            width_px: 100.0,
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn coords_map_linearly() {
        let vp = viewport();
        assert_close(vp.abs_time_to_coord(15.0), 50.0);
        assert_close(vp.coord_to_abs_time(25.0), 12.5);
        assert_close(vp.coord_to_abs_time(vp.abs_time_to_coord(17.3)), 17.3);
    }

    #[test]
    fn zoom_is_reversible_and_keeps_midpoint() {
        for scale in [0.5, 1.3, 4.0] {
            let mut vp = viewport();
            vp.zoom_by(scale);
            assert_close(vp.time.midpoint(), 15.0);
            assert_close(vp.time.delta(), 10.0 / scale);
            vp.zoom_by(1.0 / scale);
            assert_close(vp.time.begin, 10.0);
            assert_close(vp.time.end, 20.0);
        }
    }

    #[test]
    fn zoom_around_keeps_anchor_in_place() {
        let mut vp = viewport();
        let anchor = vp.coord_to_abs_time(20.0);
        vp.zoom_around(anchor, 0.5, 0.0);
        assert_close(vp.abs_time_to_coord(anchor), 20.0);
        assert_close(vp.time.delta(), 5.0);
    }

    #[test]
    fn stretch_and_pan() {
        let mut vp = viewport();
        vp.stretch(4.0, 0.25);
        assert_close(vp.time.begin, 9.0);
        assert_close(vp.time.end, 23.0);
        vp.pan_by(-1.0);
        assert_close(vp.time.begin, 8.0);
    }

    #[test]
    fn fit_pads_and_resets_scroll() {
        let mut vp = viewport();
        vp.scroll_y = 40.0;
        vp.fit(TimeRange::new(4.0, 2.0), 0.5);
        assert_eq!(vp.time, TimeRange::new(1.0, 5.0));
        assert_eq!(vp.scroll_y, 0.0);
    }

    #[test]
    fn fit_to_single_instant_opens_unit_window() {
        let mut vp = viewport();
        vp.fit(TimeRange::new(3.0, 3.0), 0.5);
        assert_eq!(vp.time, TimeRange::new(2.5, 3.5));
        assert_close(vp.abs_time_to_coord(3.0), 50.0);
        vp.zoom_by(0.5);
        assert_close(vp.time.delta(), 2.0);
    }

    #[test]
    fn zero_width_surface_does_not_divide_by_zero() {
        let vp = Viewport {
            width_px: 0.0,
            ..viewport()
        };
        assert!(vp.time_per_px().is_finite());
    }
}
