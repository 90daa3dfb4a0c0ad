use tracelane_protocol::{Rect, RenderCommand, ThemeToken};

use crate::view::Viewport;

/// Render vertical grid lines over the full view height.
///
/// Lines are spaced at the smallest power of ten (in seconds) that keeps
/// them at least `min_grid_size` pixels apart. Every tenth line is major;
/// minor lines fade in as their spacing grows towards ten times the
/// minimum.
pub fn render_time_grid(viewport: &Viewport, height: f64, min_grid_size: f64) -> Vec<RenderCommand> {
    let visible = viewport.time.delta();
    let width = viewport.width_px;
    if visible <= 0.0 || width <= 0.0 || min_grid_size <= 0.0 {
        return Vec::new();
    }

    let grid_scale = grid_scale(visible, width, min_grid_size);
    let major = ThemeToken::GridLine.color();
    let minor = major.with_alpha(major.a * minor_fade(grid_scale, visible, width, min_grid_size) as f32);

    let first_idx = (viewport.time.begin / grid_scale) as i64;
    let end_idx = (viewport.time.end / grid_scale) as i64;

    (first_idx..end_idx)
        .map(|grid_idx| {
            let x = viewport.abs_time_to_coord(grid_idx as f64 * grid_scale).trunc();
            let paint = if grid_idx % 10 == 0 { major } else { minor };
            RenderCommand::fill(Rect::new(x, 0.0, 1.0, height), paint)
        })
        .collect()
}

/// Grid spacing in seconds.
fn grid_scale(visible: f64, width: f64, min_grid_size: f64) -> f64 {
    let raw = visible / (width / min_grid_size);
    10f64.powf(raw.log10().ceil())
}

/// Alpha multiplier for minor lines, `0.0..=1.0`.
fn minor_fade(grid_scale: f64, visible: f64, width: f64, min_grid_size: f64) -> f64 {
    let spacing = grid_scale * width / visible;
    let factor = (spacing - min_grid_size) / (min_grid_size * 10.0 - min_grid_size);
    factor.clamp(0.0, 1.0).sqrt()
}
