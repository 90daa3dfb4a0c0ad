//! Adaptive density rendering of one lane's events.
//!
//! The pixel span is halved until it holds at most one event or is narrower
//! than two pixels. A single event becomes a 1 px mark at its exact column;
//! a narrow span with many events becomes one mark whose alpha grows with
//! the event count. Each split costs one binary search, so drawing never
//! enumerates the events themselves.

use tracelane_protocol::{Color, Rect, RenderCommand};

use crate::model::{Lane, TimeRange, Trace, index_span_len};

/// A filled column range produced by the density pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityMark {
    pub x: i64,
    pub w: i64,
    /// Events represented by this mark.
    pub count: usize,
}

struct Span {
    x: i64,
    w: i64,
    time_left: f64,
    time_right: f64,
    first: Option<usize>,
    last: Option<usize>,
    depth: u32,
}

/// Density marks for the events of `trace` in `[time.begin, time.end)`,
/// drawn into columns `[x, x + w)`, left to right.
pub fn density_marks(trace: &dyn Trace, x: i64, w: i64, time: TimeRange<f64>) -> Vec<DensityMark> {
    let mut marks = Vec::new();
    walk(trace, x, w, time, |mark, _depth| marks.push(mark));
    marks
}

/// Core of [`density_marks`]; `emit` also receives the split depth.
fn walk(
    trace: &dyn Trace,
    x: i64,
    w: i64,
    time: TimeRange<f64>,
    mut emit: impl FnMut(DensityMark, u32),
) {
    if w <= 0 || time.delta() <= 0.0 {
        return;
    }
    let (first, last) = visible_events(trace, time);

    let mut stack = vec![Span {
        x,
        w,
        time_left: time.begin,
        time_right: time.end,
        first,
        last,
        depth: 0,
    }];

    while let Some(span) = stack.pop() {
        let count = index_span_len(span.first, span.last);
        if count == 0 {
            continue;
        }

        if count == 1 {
            let Some(idx) = span.first else { continue };
            let px_per_time = span.w as f64 / (span.time_right - span.time_left);
            let ex = span.x + ((trace.event_time(idx) - span.time_left) * px_per_time) as i64;
            emit(DensityMark { x: ex, w: 1, count: 1 }, span.depth);
        } else if span.w >= 2 {
            let time_per_px = (span.time_right - span.time_left) / span.w as f64;
            let mid = span.x + span.w / 2;
            let left_w = mid - span.x;
            let right_w = span.x + span.w - mid;
            let time_mid = span.time_left + left_w as f64 * time_per_px;
            let (left_of_mid, right_of_mid) = trace.find_events(time_mid);

            // Right half first so the left half is popped next.
            stack.push(Span {
                x: mid,
                w: right_w,
                time_left: time_mid,
                time_right: span.time_right,
                first: right_of_mid,
                last: span.last,
                depth: span.depth + 1,
            });
            stack.push(Span {
                x: span.x,
                w: left_w,
                time_left: span.time_left,
                time_right: time_mid,
                first: span.first,
                last: left_of_mid,
                depth: span.depth + 1,
            });
        } else {
            emit(
                DensityMark {
                    x: span.x,
                    w: span.w,
                    count,
                },
                span.depth,
            );
        }
    }
}

/// First event at or after `time.begin` and last event before `time.end`.
pub fn visible_events(trace: &dyn Trace, time: TimeRange<f64>) -> (Option<usize>, Option<usize>) {
    let (_, first) = trace.find_events(time.begin);
    let (last, _) = trace.find_events(time.end);
    (first, last)
}

/// Alpha boost per event, scaled so sparse views stay dim and dense views
/// saturate.
pub fn intensity(width_px: f64, events_visible: usize, factor: f64) -> f64 {
    let ratio = if events_visible == 0 {
        1.0
    } else {
        width_px / events_visible as f64
    };
    ratio * factor
}

/// Alpha of a mark covering `count` events.
pub fn mark_alpha(count: usize, intensity: f64) -> f64 {
    (0.5 + intensity * count as f64 * 0.5).clamp(0.5, 1.0)
}

/// Render the events of `lane` visible in `time` into `rect`.
pub fn render_density(
    lane: &Lane,
    rect: Rect,
    time: TimeRange<f64>,
    intensity_factor: f64,
) -> Vec<RenderCommand> {
    let trace = lane.trace.as_ref();
    let (first, last) = visible_events(trace, time);
    let scale = intensity(rect.w, index_span_len(first, last), intensity_factor);

    density_marks(trace, rect.x as i64, rect.w as i64, time)
        .into_iter()
        .map(|mark| {
            let alpha = mark_alpha(mark.count, scale);
            RenderCommand::fill(
                Rect::new(mark.x as f64, rect.y, mark.w as f64, rect.h),
                lane_mark_color(lane.color, alpha),
            )
        })
        .collect()
}

fn lane_mark_color(color: Color, alpha: f64) -> Color {
    color.with_alpha(alpha as f32)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracelane_protocol::Paint;

    use super::*;
    use crate::model::trace::tests::VecTrace;

    fn uniform(n: usize, span: f64) -> VecTrace {
        VecTrace((0..n).map(|i| span * i as f64 / n as f64).collect())
    }

    #[test]
    fn leaf_counts_sum_to_visible_events() {
        for n in [0, 1, 2, 7, 100, 5_000] {
            let trace = uniform(n, 10.0);
            let marks = density_marks(&trace, 0, 640, TimeRange::new(0.0, 10.0));
            let total: usize = marks.iter().map(|m| m.count).sum();
            assert_eq!(total, n, "n={n}");
        }
    }

    #[test]
    fn marks_are_emitted_left_to_right_within_bounds() {
        let trace = uniform(1_000, 1.0);
        let marks = density_marks(&trace, 10, 300, TimeRange::new(0.0, 1.0));
        assert!(marks.windows(2).all(|w| w[0].x <= w[1].x));
        assert!(marks.iter().all(|m| m.x >= 10 && m.x + m.w <= 310));
    }

    #[test]
    fn split_depth_is_logarithmic() {
        let trace = uniform(100_000, 1.0);
        let width = 1_024;
        let mut max_depth = 0;
        walk(&trace, 0, width, TimeRange::new(0.0, 1.0), |_, depth| {
            max_depth = max_depth.max(depth);
        });
        assert!(max_depth <= 10, "depth={max_depth}");
    }

    #[test]
    fn single_event_marks_its_column() {
        let trace = VecTrace(vec![2.5]);
        let marks = density_marks(&trace, 0, 100, TimeRange::new(0.0, 10.0));
        assert_eq!(marks, [DensityMark { x: 25, w: 1, count: 1 }]);
    }

    #[test]
    fn events_outside_the_window_are_ignored() {
        let trace = VecTrace(vec![-1.0, 1.0, 11.0]);
        let marks = density_marks(&trace, 0, 100, TimeRange::new(0.0, 10.0));
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].x, 10);
    }

    #[test]
    fn coincident_events_collapse_into_one_mark() {
        let trace = VecTrace(vec![5.0; 8]);
        let marks = density_marks(&trace, 0, 64, TimeRange::new(0.0, 10.0));
        assert_eq!(marks, [DensityMark { x: 32, w: 1, count: 8 }]);
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(mark_alpha(1, 0.0), 0.5);
        assert_eq!(mark_alpha(1_000, 1.0), 1.0);
        assert!((mark_alpha(2, 0.3) - 0.8).abs() < 1e-12);
        assert_eq!(intensity(100.0, 0, 0.3), 0.3);
        assert!((intensity(100.0, 50, 0.3) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn renders_fills_in_lane_color() {
        let lane = Lane::new("a", Color::rgb(1.0, 0.0, 0.0), Arc::new(VecTrace(vec![1.0, 2.0])));
        let cmds = render_density(&lane, Rect::new(0.0, 30.0, 100.0, 38.0), TimeRange::new(0.0, 10.0), 0.3);
        assert_eq!(cmds.len(), 2);
        for cmd in cmds {
            let RenderCommand::FillRect { rect, paint, .. } = cmd else {
                panic!("expected fills");
            };
            assert_eq!(rect.y, 30.0);
            assert_eq!(rect.h, 38.0);
            let Paint::Rgba(color) = paint else {
                panic!("expected lane colour");
            };
            assert_eq!(color.r, 1.0);
            assert_eq!(color.a, 1.0);
        }
    }
}
