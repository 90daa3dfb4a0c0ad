use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    LaneBackground,
    LaneBackgroundAlt,
    LaneSeparator,
    LaneLabelBackground,

    GridLine,

    SelectionRange,
    SelectionEdge,
    Cursor,

    InfoText,
    ListText,
}

impl ThemeToken {
    /// The default (dark) palette.
    pub fn color(self) -> Color {
        match self {
            ThemeToken::Background => Color::BLACK,
            ThemeToken::LaneBackground => Color::from_rgba8(0, 15, 30, 255),
            ThemeToken::LaneBackgroundAlt => Color::from_rgba8(20, 35, 40, 255),
            ThemeToken::LaneSeparator => Color::from_rgba8(40, 50, 60, 255),
            ThemeToken::LaneLabelBackground => Color::from_rgba8(0, 0, 0, 180),
            ThemeToken::GridLine => Color::from_rgba8(100, 100, 255, 70),
            ThemeToken::SelectionRange => Color::from_rgba8(255, 255, 255, 50),
            ThemeToken::SelectionEdge => Color::from_rgba8(255, 255, 255, 90),
            ThemeToken::Cursor => Color::from_rgba8(220, 220, 255, 70),
            ThemeToken::InfoText => Color::from_rgba8(255, 0, 0, 255),
            ThemeToken::ListText => Color::from_rgba8(200, 200, 200, 255),
        }
    }
}
