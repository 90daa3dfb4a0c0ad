use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Color, Point, Rect};

/// How a command is colored: either a semantic theme token resolved by the
/// renderer, or an explicit color computed by the core (lane colors and
/// density alphas).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Theme(ThemeToken),
    Rgba(Color),
}

impl From<ThemeToken> for Paint {
    fn from(token: ThemeToken) -> Self {
        Paint::Theme(token)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Rgba(color)
    }
}

impl Paint {
    /// Concrete color, resolving theme tokens through the default palette.
    pub fn resolve(self) -> Color {
        match self {
            Paint::Theme(token) => token.color(),
            Paint::Rgba(color) => color,
        }
    }
}

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` per frame. Renderers consume the
/// list sequentially, painting later commands over earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Fill an axis-aligned rectangle. `corner_radius` is a hint; renderers
    /// without rounded rectangles may ignore it.
    FillRect {
        rect: Rect,
        paint: Paint,
        corner_radius: f64,
    },

    /// Draw a text string anchored at a position.
    DrawText {
        position: Point,
        text: SharedStr,
        paint: Paint,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        paint: Paint,
        width: f64,
        style: LineStyle,
    },

    /// Begin a logical group (e.g. a lane).
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    /// End the current group.
    EndGroup,
}

impl RenderCommand {
    pub fn fill(rect: Rect, paint: impl Into<Paint>) -> Self {
        RenderCommand::FillRect {
            rect,
            paint: paint.into(),
            corner_radius: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Solid,
    Dotted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_fill_with_rgba_paint() {
        let cmd = RenderCommand::fill(Rect::new(1.0, 2.0, 3.0, 4.0), Color::WHITE.with_alpha(0.5));
        let json = serde_json::to_string(&cmd).unwrap_or_default();
        assert!(json.contains("FillRect"));
        assert!(json.contains("\"a\":0.5"));
    }

    #[test]
    fn theme_paint_resolves_through_palette() {
        let paint = Paint::from(ThemeToken::Background);
        assert_eq!(paint.resolve(), ThemeToken::Background.color());
    }
}
