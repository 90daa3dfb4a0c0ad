use tracelane_protocol::{
    LineStyle, Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken,
};

use super::density::render_density;
use super::time_grid::render_time_grid;
use crate::format::time_to_string;
use crate::model::Lane;
use crate::view::{LaneSpan, TraceView};

/// Approximate glyph advance as a fraction of the font size.
const CHAR_WIDTH_EM: f64 = 0.6;
const HOVER_OUTSET: f64 = 2.0;
const HOVER_OUTLINE_DARKEN: f32 = 1.7;
const INFO_INSET: f64 = 3.0;

/// Render one complete frame of `view`, back to front: background, lane
/// strips, time grid, selection band, cursor, lane events with hover
/// highlight and labels, and the info text.
pub fn render_frame(view: &TraceView) -> Vec<RenderCommand> {
    let width = view.viewport().width_px;
    let height = view.height_px();
    let mut commands = Vec::with_capacity(256);

    commands.push(RenderCommand::fill(
        Rect::new(0.0, 0.0, width, height),
        ThemeToken::Background,
    ));
    render_lane_backgrounds(view, width, &mut commands);
    commands.extend(render_time_grid(
        view.viewport(),
        height,
        view.config().min_grid_size,
    ));
    render_selection(view, height, &mut commands);

    let cursor_x = view.viewport().abs_time_to_coord(view.cursor_time()).trunc();
    commands.push(RenderCommand::fill(
        Rect::new(cursor_x, 0.0, 1.0, height),
        ThemeToken::Cursor,
    ));

    for (idx, lane) in view.lanes().iter().enumerate() {
        let Some((y, lane_h)) = view.lane_coords(idx) else {
            continue;
        };
        if y + lane_h < 0.0 || y > height {
            continue;
        }
        commands.push(RenderCommand::BeginGroup {
            id: SharedStr::from(format!("lane-{idx}")),
            label: Some(lane.name.clone()),
        });
        render_lane(view, idx, lane, y, lane_h, &mut commands);
        commands.push(RenderCommand::EndGroup);
    }

    commands.push(RenderCommand::DrawText {
        position: Point::new(width - INFO_INSET, INFO_INSET + view.config().info_font_size),
        text: SharedStr::from(info_text(view)),
        paint: ThemeToken::InfoText.into(),
        font_size: view.config().info_font_size,
        align: TextAlign::Right,
    });

    commands
}

fn render_lane_backgrounds(view: &TraceView, width: f64, out: &mut Vec<RenderCommand>) {
    let mut bottom = None;
    for idx in 0..view.lanes().len() {
        let Some((y, h)) = view.lane_coords(idx) else {
            continue;
        };
        let background = if idx % 2 == 1 {
            ThemeToken::LaneBackgroundAlt
        } else {
            ThemeToken::LaneBackground
        };
        out.push(RenderCommand::fill(
            Rect::new(0.0, y, width, 1.0),
            ThemeToken::LaneSeparator,
        ));
        out.push(RenderCommand::fill(
            Rect::new(0.0, y + 1.0, width, h - 1.0),
            background,
        ));
        bottom = Some(y + h);
    }
    if let Some(y) = bottom {
        out.push(RenderCommand::fill(
            Rect::new(0.0, y, width, 1.0),
            ThemeToken::LaneSeparator,
        ));
    }
}

fn render_selection(view: &TraceView, height: f64, out: &mut Vec<RenderCommand>) {
    let Some(range) = view.selected_time_range() else {
        return;
    };
    let x1 = view.viewport().abs_time_to_coord(range.begin).trunc();
    let x2 = view.viewport().abs_time_to_coord(range.end).trunc();

    for x in [x1, x2] {
        out.push(RenderCommand::DrawLine {
            from: Point::new(x, 0.0),
            to: Point::new(x, height),
            paint: ThemeToken::SelectionEdge.into(),
            width: 1.0,
            style: LineStyle::Dotted,
        });
    }

    let (y, h) = match view.selected_lane_range() {
        LaneSpan::Lanes(lanes) => match (view.lane_coords(lanes.begin), view.lane_coords(lanes.end)) {
            (Some((top, _)), Some((end_y, end_h))) => (top, end_y + end_h - top),
            _ => (0.0, height),
        },
        LaneSpan::All => (0.0, height),
    };
    out.push(RenderCommand::fill(
        Rect::new(x1, y, x2 - x1 + 1.0, h),
        ThemeToken::SelectionRange,
    ));
}

fn render_lane(
    view: &TraceView,
    idx: usize,
    lane: &Lane,
    y: f64,
    lane_h: f64,
    out: &mut Vec<RenderCommand>,
) {
    let config = view.config();
    let inset = config.event_inset_y;
    let width = view.viewport().width_px;

    out.extend(render_density(
        lane,
        Rect::new(0.0, y + inset, width, lane_h - inset * 2.0),
        view.viewport().time,
        config.intensity_factor,
    ));

    if let Some(hover) = view.hover()
        && hover.lane == idx
    {
        let x = view
            .viewport()
            .abs_time_to_coord(lane.trace.event_time(hover.event))
            .trunc();
        let hover_y = y + inset / 2.0;
        let hover_h = lane_h - inset;
        let outline = lane.color.darker(HOVER_OUTLINE_DARKEN);
        out.push(RenderCommand::fill(
            Rect::new(
                x - HOVER_OUTSET,
                hover_y - HOVER_OUTSET,
                1.0 + HOVER_OUTSET * 2.0,
                hover_h + HOVER_OUTSET * 2.0,
            ),
            outline.with_alpha(outline.a * 0.5),
        ));
        out.push(RenderCommand::fill(Rect::new(x, hover_y, 1.0, hover_h), lane.color));
    }

    if !lane.name.is_empty() {
        let text_w = lane.name.chars().count() as f64 * config.label_font_size * CHAR_WIDTH_EM;
        let rect = Rect::new(
            config.label_inset_x,
            y + config.label_inset_y,
            text_w + config.label_padding,
            config.label_height,
        );
        out.push(RenderCommand::FillRect {
            rect,
            paint: ThemeToken::LaneLabelBackground.into(),
            corner_radius: config.label_corner_radius,
        });
        out.push(RenderCommand::DrawText {
            position: Point::new(rect.x + rect.w / 2.0, rect.y + rect.h * 0.75),
            text: lane.name.clone(),
            paint: lane.color.into(),
            font_size: config.label_font_size,
            align: TextAlign::Center,
        });
    }
}

/// Cursor time in full form, plus the selected span if any.
pub fn info_text(view: &TraceView) -> String {
    let mut text = time_to_string(view.cursor_time(), true);
    if let Some(range) = view.selected_time_range() {
        text.push_str(" - selected ");
        text.push_str(&time_to_string(range.delta(), false));
    }
    text
}
