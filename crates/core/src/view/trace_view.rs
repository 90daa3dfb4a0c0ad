use std::borrow::Cow;
use std::ops::Range;

use tracelane_protocol::{
    KeyCode, Modifiers, Point, PointerButton, PointerButtons, RenderCommand, SharedStr,
};

use super::selection::{
    Hover, LaneSpan, SelectedEvents, Selection, SelectionState, collect_selected_events,
};
use super::viewport::Viewport;
use crate::config::ViewConfig;
use crate::model::{Lane, TimeRange, lanes_time_bounds};
use crate::views::frame::render_frame;

/// Wheel delta of one notch.
const WHEEL_NOTCH: f64 = 120.0;

/// What an input call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputResponse {
    pub redraw: bool,
    pub selection_changed: bool,
    pub hover_changed: bool,
    /// The host should ask for a new name for this lane and pass it to
    /// [`TraceView::rename_lane`].
    pub rename_lane: Option<usize>,
}

impl InputResponse {
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }
}

/// A multi-lane timeline view session: lanes, viewport, selection, hover.
///
/// The host owns one `TraceView`, feeds it toolkit-independent input and
/// draws the commands returned by [`TraceView::render`].
pub struct TraceView {
    config: ViewConfig,
    lanes: Vec<Lane>,
    viewport: Viewport,
    height_px: f64,
    selection: Selection,
    selected: SelectedEvents,
    hover: Option<Hover>,
    cursor_time: f64,
    last_pointer: Point,
    press_pointer: Point,
}

impl TraceView {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            lanes: Vec::new(),
            viewport: Viewport::default(),
            height_px: 0.0,
            selection: Selection::default(),
            selected: SelectedEvents::default(),
            hover: None,
            cursor_time: 0.0,
            last_pointer: Point::new(0.0, 0.0),
            press_pointer: Point::new(0.0, 0.0),
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Replace every lane at once. Selection and hover refer to the old
    /// lanes and are dropped.
    pub fn set_lanes(&mut self, lanes: Vec<Lane>) {
        self.lanes = lanes;
        self.selection.clear();
        self.selected = SelectedEvents::default();
        self.hover = None;
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane(&self, idx: usize) -> Option<&Lane> {
        self.lanes.get(idx)
    }

    pub fn lane_mut(&mut self, idx: usize) -> Option<&mut Lane> {
        self.lanes.get_mut(idx)
    }

    pub fn rename_lane(&mut self, idx: usize, name: impl Into<SharedStr>) -> bool {
        match self.lanes.get_mut(idx) {
            Some(lane) => {
                lane.rename(name);
                true
            }
            None => false,
        }
    }

    pub fn resize(&mut self, width_px: f64, height_px: f64) {
        self.viewport.width_px = width_px;
        self.height_px = height_px;
    }

    pub fn height_px(&self) -> f64 {
        self.height_px
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn cursor_time(&self) -> f64 {
        self.cursor_time
    }

    pub fn lane_height(&self, lane: &Lane) -> f64 {
        self.config.lane_height_for(lane.collapsed)
    }

    /// Top Y and height of lane `idx` on screen.
    pub fn lane_coords(&self, idx: usize) -> Option<(f64, f64)> {
        let lane = self.lanes.get(idx)?;
        let y: f64 = self.config.lane_y_begin
            + self.lanes[..idx]
                .iter()
                .map(|l| self.lane_height(l))
                .sum::<f64>();
        Some((y - self.viewport.scroll_y, self.lane_height(lane)))
    }

    /// Lane under screen Y coordinate `y`.
    pub fn lane_for_coord(&self, y: f64) -> Option<usize> {
        let y = y + self.viewport.scroll_y;
        let mut top = self.config.lane_y_begin;
        for (idx, lane) in self.lanes.iter().enumerate() {
            let bottom = top + self.lane_height(lane);
            if y >= top && y < bottom {
                return Some(idx);
            }
            top = bottom;
        }
        None
    }

    pub fn zoom_by(&mut self, scale: f64) {
        self.viewport.zoom_by(scale);
    }

    /// Fit the window to every event of every lane, padded on both sides.
    /// Without events the window is left as is.
    pub fn zoom_all(&mut self) {
        self.viewport.scroll_y = 0.0;
        if let Some(bounds) = lanes_time_bounds(&self.lanes) {
            self.viewport.fit(bounds, self.config.zoom_all_padding);
        }
    }

    /// Fit the window to the selected time range, slightly zoomed out.
    pub fn zoom_to_selection(&mut self) {
        if self.selection.has_selection && self.selection.time.begin != self.selection.time.end {
            self.viewport.time = self.selection.time.fix();
            self.viewport.zoom_by(self.config.zoom_to_selection_scale);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.update_selected_events();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection
    }

    /// Selected time range in ascending order, if anything is selected.
    pub fn selected_time_range(&self) -> Option<TimeRange<f64>> {
        self.selection
            .has_selection
            .then(|| self.selection.time.fix())
    }

    pub fn selected_lane_range(&self) -> LaneSpan {
        self.selection.lanes.fix()
    }

    /// Indices of the selected lanes that exist.
    pub fn selected_lane_indices(&self) -> Range<usize> {
        self.selection.lanes.indices(self.lanes.len())
    }

    pub fn selected_events(&self) -> &SelectedEvents {
        &self.selected
    }

    pub fn hover(&self) -> Option<Hover> {
        self.hover
    }

    /// Full text of the hovered event.
    pub fn hover_text(&self) -> Option<String> {
        let hover = self.hover?;
        let lane = self.lanes.get(hover.lane)?;
        lane.trace
            .event_text(hover.event, true)
            .map(Cow::into_owned)
    }

    /// Remove the selected lanes.
    pub fn remove_selected_lanes(&mut self) {
        let range = self.selected_lane_indices();
        let lanes = std::mem::take(&mut self.lanes);
        self.lanes = lanes
            .into_iter()
            .enumerate()
            .filter_map(|(idx, lane)| (!range.contains(&idx)).then_some(lane))
            .collect();
        self.hover = None;
        self.clear_selection();
    }

    /// Keep only the selected lanes and zoom to fit them.
    pub fn keep_selected_lanes(&mut self) {
        let range = self.selected_lane_indices();
        let lanes = std::mem::take(&mut self.lanes);
        self.lanes = lanes
            .into_iter()
            .skip(range.start)
            .take(range.len())
            .collect();
        self.hover = None;
        self.clear_selection();
        self.zoom_all();
    }

    pub fn render(&self) -> Vec<RenderCommand> {
        render_frame(self)
    }

    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> InputResponse {
        let pos = Point::new(x, y);
        self.press_pointer = pos;
        self.last_pointer = pos;

        match button {
            PointerButton::Middle if modifiers.shift => {
                self.zoom_to_selection();
                InputResponse::redraw()
            }
            PointerButton::Primary => {
                let lane = self.lane_for_coord(y);
                if x < self.config.collapse_zone_width {
                    match lane.and_then(|idx| self.lanes.get_mut(idx)) {
                        Some(lane) => {
                            lane.toggle_collapsed();
                            InputResponse::redraw()
                        }
                        None => InputResponse::default(),
                    }
                } else if x < self.config.rename_zone_width {
                    InputResponse {
                        rename_lane: lane,
                        ..InputResponse::default()
                    }
                } else {
                    let span = match lane {
                        Some(idx) if !modifiers.alt => LaneSpan::single(idx),
                        _ => LaneSpan::All,
                    };
                    self.selection
                        .start(self.viewport.coord_to_abs_time(x), span);
                    self.update_selected_events();
                    InputResponse {
                        redraw: true,
                        selection_changed: true,
                        ..InputResponse::default()
                    }
                }
            }
            _ => InputResponse::default(),
        }
    }

    pub fn pointer_move(
        &mut self,
        x: f64,
        y: f64,
        buttons: PointerButtons,
        modifiers: Modifiers,
    ) -> InputResponse {
        let mut response = InputResponse::redraw();
        let time_per_px = self.viewport.time_per_px();
        let time_at_cursor = self.viewport.coord_to_abs_time(x);
        let over_lane = self.lane_for_coord(y);
        let last = self.last_pointer;
        self.last_pointer = Point::new(x, y);
        self.cursor_time = time_at_cursor;

        if buttons.secondary {
            if modifiers.shift {
                let amount = (y - last.y) * time_per_px * self.config.mouse_zoom_factor;
                let anchor = self.press_pointer.x / self.viewport.width_px.max(1.0);
                self.viewport.stretch(amount, anchor);
            } else {
                self.viewport.pan_by(-(x - last.x) * time_per_px);
            }
        } else if buttons.primary && self.selection.state == SelectionState::Dragging {
            self.selection.extend(time_at_cursor, over_lane);
            self.update_selected_events();
            response.selection_changed = true;
        }

        let previous = self.hover;
        self.hover = over_lane.and_then(|lane| self.hover_candidate(lane, x));
        response.hover_changed = previous != self.hover;
        response
    }

    pub fn pointer_up(&mut self) -> InputResponse {
        let before = self.selection.state;
        self.selection.finish();
        InputResponse {
            redraw: before != self.selection.state,
            ..InputResponse::default()
        }
    }

    /// Zoom around the last pointer position; with Shift scroll the lanes
    /// instead. A horizontal delta pans.
    pub fn wheel(&mut self, delta_x: f64, delta_y: f64, modifiers: Modifiers) -> InputResponse {
        let time_per_px = self.viewport.time_per_px();
        let anchor = self.viewport.coord_to_abs_time(self.last_pointer.x);

        let mut scale = 1.0;
        if modifiers.shift {
            self.viewport.scroll_y = (self.viewport.scroll_y + delta_y).max(0.0);
        } else {
            scale = self.config.wheel_zoom_factor.powf(-delta_y / WHEEL_NOTCH);
        }
        self.viewport
            .zoom_around(anchor, scale, delta_x * time_per_px);
        InputResponse::redraw()
    }

    pub fn key(&mut self, code: KeyCode, modifiers: Modifiers) -> InputResponse {
        match code {
            KeyCode::Char(c) if c.eq_ignore_ascii_case(&'z') => {
                if modifiers.shift || c.is_ascii_uppercase() {
                    self.zoom_all();
                } else {
                    self.zoom_to_selection();
                }
                InputResponse::redraw()
            }
            KeyCode::Char(c) if c.eq_ignore_ascii_case(&'x') => {
                if !self.selection.has_selection {
                    return InputResponse::default();
                }
                if modifiers.shift || c.is_ascii_uppercase() {
                    self.keep_selected_lanes();
                } else {
                    self.remove_selected_lanes();
                }
                InputResponse {
                    redraw: true,
                    selection_changed: true,
                    hover_changed: true,
                    rename_lane: None,
                }
            }
            KeyCode::Plus => {
                self.zoom_by(self.config.key_zoom_factor);
                InputResponse::redraw()
            }
            KeyCode::Minus => {
                self.zoom_by(1.0 / self.config.key_zoom_factor);
                InputResponse::redraw()
            }
            KeyCode::Escape => {
                self.clear_selection();
                InputResponse {
                    redraw: true,
                    selection_changed: true,
                    ..InputResponse::default()
                }
            }
            KeyCode::Char(_) => InputResponse::default(),
        }
    }

    /// Nearest event of `lane_idx` to screen X `x`, if close enough.
    fn hover_candidate(&self, lane_idx: usize, x: f64) -> Option<Hover> {
        let lane = self.lanes.get(lane_idx)?;
        let t = self.viewport.coord_to_abs_time(x);
        let event = lane.trace.find_nearest_event(t)?;
        let event_x = self
            .viewport
            .abs_time_to_coord(lane.trace.event_time(event))
            .trunc();
        ((event_x - x).abs() <= self.config.hover_distance_px).then_some(Hover {
            lane: lane_idx,
            event,
        })
    }

    fn update_selected_events(&mut self) {
        self.selected = if self.selection.has_selection {
            collect_selected_events(
                &self.lanes,
                self.selected_lane_indices(),
                self.selection.time,
                self.config.max_list_events,
            )
        } else {
            SelectedEvents::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracelane_protocol::{Color, Paint};

    use super::*;
    use crate::model::trace::tests::VecTrace;

    /// Three lanes at y 20..70, 70..120, 120..170 over 0..100 s on 100 px.
    fn view() -> TraceView {
        let mut view = TraceView::new(ViewConfig::default());
        view.set_lanes(vec![
            Lane::new("a", Color::WHITE, Arc::new(VecTrace(vec![10.0, 20.0, 30.0]))),
            Lane::new("b", Color::WHITE, Arc::new(VecTrace(vec![15.0, 25.0]))),
            Lane::new("c", Color::WHITE, Arc::new(VecTrace(vec![50.0]))),
        ]);
        view.resize(100.0, 200.0);
        view.viewport_mut().time = TimeRange::new(0.0, 100.0);
        view
    }

    fn drag(view: &mut TraceView, from: (f64, f64), to: (f64, f64), modifiers: Modifiers) {
        view.pointer_down(from.0, from.1, PointerButton::Primary, modifiers);
        view.pointer_move(to.0, to.1, PointerButtons::only(PointerButton::Primary), modifiers);
        view.pointer_up();
    }

    #[test]
    fn lane_geometry_follows_collapse_state() {
        let mut view = view();
        assert_eq!(view.lane_for_coord(10.0), None);
        assert_eq!(view.lane_for_coord(20.0), Some(0));
        assert_eq!(view.lane_for_coord(125.0), Some(2));
        assert_eq!(view.lane_for_coord(170.0), None);

        view.lane_mut(0).unwrap().set_collapsed(true);
        assert_eq!(view.lane_coords(1), Some((40.0, 50.0)));
        assert_eq!(view.lane_for_coord(45.0), Some(1));

        view.viewport_mut().scroll_y = 20.0;
        assert_eq!(view.lane_coords(0), Some((0.0, 20.0)));
        assert_eq!(view.lane_for_coord(0.0), Some(0));
    }

    #[test]
    fn drag_selects_time_and_lanes() {
        let mut view = view();
        drag(&mut view, (40.0, 30.0), (12.0, 80.0), Modifiers::NONE);

        assert_eq!(view.selection().state, SelectionState::Committed);
        assert_eq!(view.selected_time_range(), Some(TimeRange::new(12.0, 40.0)));
        assert_eq!(view.selected_lane_range(), LaneSpan::Lanes(TimeRange::new(0, 1)));
        let SelectedEvents::Events(events) = view.selected_events() else {
            panic!("expected list");
        };
        let times: Vec<f64> = events.iter().map(|e| e.time).collect();
        assert_eq!(times, [15.0, 20.0, 25.0, 30.0]);
    }

    #[test]
    fn alt_or_off_lane_press_selects_all_lanes() {
        let mut view = view();
        drag(&mut view, (45.0, 30.0), (55.0, 30.0), Modifiers::ALT);
        assert_eq!(view.selected_lane_range(), LaneSpan::All);
        assert_eq!(view.selected_events().total(), 1);

        drag(&mut view, (45.0, 5.0), (55.0, 30.0), Modifiers::NONE);
        assert_eq!(view.selected_lane_range(), LaneSpan::All);
    }

    #[test]
    fn drag_off_lanes_keeps_end_lane() {
        let mut view = view();
        view.pointer_down(50.0, 30.0, PointerButton::Primary, Modifiers::NONE);
        let held = PointerButtons::only(PointerButton::Primary);
        view.pointer_move(60.0, 130.0, held, Modifiers::NONE);
        view.pointer_move(70.0, 190.0, held, Modifiers::NONE);
        assert_eq!(view.selected_lane_range(), LaneSpan::Lanes(TimeRange::new(0, 2)));
    }

    #[test]
    fn click_without_drag_leaves_no_selection() {
        let mut view = view();
        view.pointer_down(50.0, 30.0, PointerButton::Primary, Modifiers::NONE);
        view.pointer_up();
        assert!(!view.has_selection());
        assert_eq!(view.selection().state, SelectionState::Idle);
        assert_eq!(view.selected_time_range(), None);
    }

    #[test]
    fn over_cap_selection_reports_total() {
        let mut view = TraceView::new(ViewConfig {
            max_list_events: 2,
            ..ViewConfig::default()
        });
        view.set_lanes(vec![Lane::new(
            "a",
            Color::WHITE,
            Arc::new(VecTrace(vec![1.0, 2.0, 3.0])),
        )]);
        view.resize(100.0, 100.0);
        view.viewport_mut().time = TimeRange::new(-10.0, 10.0);
        drag(&mut view, (41.0, 30.0), (99.0, 30.0), Modifiers::ALT);
        assert_eq!(view.selected_events(), &SelectedEvents::TooMany(3));
    }

    #[test]
    fn header_zones_toggle_and_rename() {
        let mut view = view();
        let response = view.pointer_down(5.0, 30.0, PointerButton::Primary, Modifiers::NONE);
        assert!(response.redraw);
        assert!(view.lane(0).unwrap().collapsed);

        let response = view.pointer_down(25.0, 30.0, PointerButton::Primary, Modifiers::NONE);
        assert_eq!(response.rename_lane, Some(0));
        assert!(view.rename_lane(0, "Worker"));
        assert_eq!(view.lane(0).unwrap().name, "Worker");
        assert!(!view.rename_lane(9, "nope"));
    }

    #[test]
    fn hover_snaps_within_distance() {
        let mut view = view();
        let response = view.pointer_move(18.0, 30.0, PointerButtons::NONE, Modifiers::NONE);
        assert!(response.hover_changed);
        assert_eq!(view.hover(), Some(Hover { lane: 0, event: 1 }));
        assert_eq!(view.hover_text().as_deref(), Some("event 1"));

        // 50 px from lane c's only event.
        view.pointer_move(0.0, 130.0, PointerButtons::NONE, Modifiers::NONE);
        assert_eq!(view.hover(), None);

        view.pointer_move(18.0, 5.0, PointerButtons::NONE, Modifiers::NONE);
        assert_eq!(view.hover(), None);
    }

    #[test]
    fn zoom_all_pads_event_span() {
        let mut view = view();
        view.viewport_mut().scroll_y = 30.0;
        view.zoom_all();
        assert_eq!(view.viewport().time, TimeRange::new(-10.0, 70.0));
        assert_eq!(view.viewport().scroll_y, 0.0);
    }

    #[test]
    fn zoom_all_without_events_keeps_window() {
        let mut view = TraceView::new(ViewConfig::default());
        view.zoom_all();
        assert_eq!(view.viewport().time, TimeRange::new(0.0, 1.0));
    }

    #[test]
    fn zoom_to_selection_needs_nonzero_width() {
        let mut view = view();
        view.zoom_to_selection();
        assert_eq!(view.viewport().time, TimeRange::new(0.0, 100.0));

        drag(&mut view, (60.0, 30.0), (40.0, 30.0), Modifiers::NONE);
        view.key(KeyCode::Char('z'), Modifiers::NONE);
        let time = view.viewport().time;
        assert!((time.midpoint() - 50.0).abs() < 1e-9);
        assert!((time.delta() - 20.0 / 0.9).abs() < 1e-9);
    }

    #[test]
    fn secondary_drag_pans() {
        let mut view = view();
        view.pointer_down(50.0, 30.0, PointerButton::Secondary, Modifiers::NONE);
        view.pointer_move(40.0, 30.0, PointerButtons::only(PointerButton::Secondary), Modifiers::NONE);
        assert_eq!(view.viewport().time, TimeRange::new(10.0, 110.0));
    }

    #[test]
    fn shift_secondary_drag_stretches_around_press() {
        let mut view = view();
        let held = PointerButtons::only(PointerButton::Secondary);
        view.pointer_down(50.0, 30.0, PointerButton::Secondary, Modifiers::SHIFT);
        view.pointer_move(50.0, 40.0, held, Modifiers::SHIFT);
        // 10 px down at 1 s/px, times the mouse zoom factor, split evenly.
        assert_eq!(view.viewport().time, TimeRange::new(-22.5, 122.5));
    }

    #[test]
    fn shift_middle_press_zooms_to_selection() {
        let mut view = view();
        drag(&mut view, (45.0, 30.0), (55.0, 30.0), Modifiers::NONE);
        let response = view.pointer_down(70.0, 30.0, PointerButton::Middle, Modifiers::SHIFT);
        assert!(response.redraw);
        let time = view.viewport().time;
        assert!((time.midpoint() - 50.0).abs() < 1e-9);
        assert!((time.delta() - 10.0 / 0.9).abs() < 1e-9);
        assert!(view.has_selection());

        // Without Shift the middle button does nothing.
        let before = view.viewport().time;
        view.pointer_down(10.0, 30.0, PointerButton::Middle, Modifiers::NONE);
        assert_eq!(view.viewport().time, before);
    }

    #[test]
    fn zoom_all_on_single_timestamp_keeps_usable_window() {
        let mut view = TraceView::new(ViewConfig::default());
        let red = Color::rgb(1.0, 0.0, 0.0);
        view.set_lanes(vec![Lane::new("a", red, Arc::new(VecTrace(vec![1.0])))]);
        view.resize(800.0, 200.0);
        view.zoom_all();

        let time = view.viewport().time;
        assert_eq!(time, TimeRange::new(0.5, 1.5));
        assert!((view.viewport().abs_time_to_coord(1.0) - 400.0).abs() < 1e-9);

        let marks = view
            .render()
            .iter()
            .filter(|c| matches!(
                c,
                RenderCommand::FillRect { rect, paint: Paint::Rgba(color), .. }
                    if rect.x == 400.0 && color.r == 1.0 && color.g == 0.0
            ))
            .count();
        assert_eq!(marks, 1);

        view.zoom_by(1.0 / 1.3);
        view.zoom_by(1.0 / 1.3);
        assert!(view.viewport().time.delta() > 1.0);
    }

    #[test]
    fn wheel_zooms_around_pointer() {
        let mut view = view();
        view.pointer_move(25.0, 5.0, PointerButtons::NONE, Modifiers::NONE);
        view.wheel(0.0, 120.0, Modifiers::NONE);
        let vp = view.viewport();
        assert!((vp.abs_time_to_coord(25.0) - 25.0).abs() < 1e-9);
        assert!((vp.time.delta() - 100.0 / 1.5).abs() < 1e-9);

        view.wheel(0.0, 40.0, Modifiers::SHIFT);
        assert_eq!(view.viewport().scroll_y, 40.0);
    }

    #[test]
    fn x_removes_or_keeps_selected_lanes() {
        let mut view = view();
        drag(&mut view, (45.0, 30.0), (55.0, 80.0), Modifiers::NONE);
        view.key(KeyCode::Char('x'), Modifiers::NONE);
        let keys: Vec<&str> = view.lanes().iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, ["c"]);
        assert!(!view.has_selection());

        let mut view = self::view();
        drag(&mut view, (45.0, 80.0), (55.0, 130.0), Modifiers::NONE);
        view.key(KeyCode::Char('X'), Modifiers::NONE);
        let keys: Vec<&str> = view.lanes().iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, ["b", "c"]);
        assert_eq!(view.viewport().time, TimeRange::new(-2.5, 67.5));
    }

    #[test]
    fn plus_minus_and_escape() {
        let mut view = view();
        view.key(KeyCode::Plus, Modifiers::NONE);
        assert!((view.viewport().time.delta() - 100.0 / 1.3).abs() < 1e-9);
        view.key(KeyCode::Minus, Modifiers::NONE);
        assert!((view.viewport().time.delta() - 100.0).abs() < 1e-9);

        drag(&mut view, (45.0, 30.0), (55.0, 30.0), Modifiers::NONE);
        assert!(view.has_selection());
        let response = view.key(KeyCode::Escape, Modifiers::NONE);
        assert!(response.selection_changed);
        assert!(!view.has_selection());
        assert_eq!(view.selected_events().total(), 0);
    }

    #[test]
    fn set_lanes_drops_selection() {
        let mut view = view();
        drag(&mut view, (45.0, 30.0), (55.0, 30.0), Modifiers::NONE);
        view.set_lanes(Vec::new());
        assert!(!view.has_selection());
        assert_eq!(view.hover(), None);
    }
}
