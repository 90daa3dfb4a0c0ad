//! Toolkit-independent input primitives.
//!
//! Hosts translate their platform events (crossterm, winit, DOM, ...) into
//! these types before handing them to the core. Coordinates are logical
//! pixels relative to the top-left corner of the trace view.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Set of pointer buttons currently held down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerButtons {
    pub primary: bool,
    pub secondary: bool,
    pub middle: bool,
}

impl PointerButtons {
    pub const NONE: PointerButtons = PointerButtons {
        primary: false,
        secondary: false,
        middle: false,
    };

    pub fn only(button: PointerButton) -> Self {
        let mut buttons = Self::NONE;
        buttons.set(button, true);
        buttons
    }

    pub fn set(&mut self, button: PointerButton, down: bool) {
        match button {
            PointerButton::Primary => self.primary = down,
            PointerButton::Secondary => self.secondary = down,
            PointerButton::Middle => self.middle = down,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        alt: false,
        ctrl: false,
    };

    pub const ALT: Modifiers = Modifiers {
        shift: false,
        alt: true,
        ctrl: false,
    };
}

/// Keys the trace view reacts to. Letters are case-insensitive; use
/// `Modifiers::shift` for the shifted binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Char(char),
    Plus,
    Minus,
    Escape,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_track_individual_state() {
        let mut held = PointerButtons::only(PointerButton::Secondary);
        assert!(held.secondary);
        assert!(!held.primary && !held.middle);
        held.set(PointerButton::Primary, true);
        assert!(held.primary && held.secondary);
        held.set(PointerButton::Primary, false);
        held.set(PointerButton::Secondary, false);
        assert_eq!(held, PointerButtons::NONE);
    }
}
