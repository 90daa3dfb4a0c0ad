pub mod commands;
pub mod input;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::{LineStyle, Paint, RenderCommand, TextAlign};
pub use input::{KeyCode, Modifiers, PointerButton, PointerButtons};
pub use shared_str::SharedStr;
pub use theme::ThemeToken;
pub use types::{Color, Point, Rect};
