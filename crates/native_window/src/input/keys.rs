//! Logical keys, mouse buttons, actions and modifier flags

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Number of slots in a per-window key table, indexed by [`Key::code`]
pub const KEY_TABLE_SIZE: usize = Key::LAST as usize + 1;

/// Number of recognized mouse buttons
pub const MOUSE_BUTTON_COUNT: usize = 3;

/// Press/release state of a key or button
///
/// There is no distinct repeat state; a press while already pressed stays `Press`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Not held down
    #[default]
    Release = 0,
    /// Held down
    Press = 1,
}

impl Action {
    /// Whether this is [`Action::Press`]
    pub const fn is_pressed(self) -> bool {
        matches!(self, Self::Press)
    }
}

/// The three recognized mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MouseButton {
    /// Left mouse button
    Left = 0,
    /// Right mouse button
    Right = 1,
    /// Middle mouse button
    Middle = 2,
}

impl MouseButton {
    /// All recognized buttons in index order
    pub const ALL: [Self; MOUSE_BUTTON_COUNT] = [Self::Left, Self::Right, Self::Middle];

    /// Map a raw host button index to a recognized button
    pub const fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::Middle),
            _ => None,
        }
    }

    /// Index into the per-window button table
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<i32> for MouseButton {
    type Error = i32;

    fn try_from(index: i32) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(index)
    }
}

bitflags! {
    /// Modifier keys held during an input event
    ///
    /// Modifier tracking is not implemented; callbacks always receive an empty set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        /// Either shift key
        const SHIFT = 0x0001;
        /// Either control key
        const CONTROL = 0x0002;
        /// Either alt/option key
        const ALT = 0x0004;
        /// Either super/command key
        const SUPER = 0x0008;
    }
}

/// Logical (layout-independent) key codes
///
/// Printable keys use their ASCII value; the rest live in the 300 and 400 blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum Key {
    Space = 32,
    Apostrophe = 39,
    Comma = 44,
    Minus = 45,
    Period = 46,
    Slash = 47,
    Num0 = 48,
    Num1 = 49,
    Num2 = 50,
    Num3 = 51,
    Num4 = 52,
    Num5 = 53,
    Num6 = 54,
    Num7 = 55,
    Num8 = 56,
    Num9 = 57,
    Semicolon = 59,
    Equal = 61,
    A = 65,
    B = 66,
    C = 67,
    D = 68,
    E = 69,
    F = 70,
    G = 71,
    H = 72,
    I = 73,
    J = 74,
    K = 75,
    L = 76,
    M = 77,
    N = 78,
    O = 79,
    P = 80,
    Q = 81,
    R = 82,
    S = 83,
    T = 84,
    U = 85,
    V = 86,
    W = 87,
    X = 88,
    Y = 89,
    Z = 90,
    LeftBracket = 91,
    Backslash = 92,
    RightBracket = 93,
    GraveAccent = 96,
    Escape = 300,
    Enter = 301,
    Tab = 302,
    Backspace = 303,
    Insert = 304,
    Delete = 305,
    Right = 306,
    Left = 307,
    Down = 308,
    Up = 309,
    PageUp = 310,
    PageDown = 311,
    Home = 312,
    End = 313,
    LeftShift = 400,
    LeftControl = 401,
    RightShift = 402,
    RightControl = 403,
}

impl Key {
    /// Lowest valid key code
    pub const FIRST: u16 = Self::Space as u16;
    /// Highest valid key code
    pub const LAST: u16 = Self::RightControl as u16;

    /// Every recognized key, ordered by code
    #[rustfmt::skip]
    pub const ALL: [Self; 66] = [
        Self::Space, Self::Apostrophe, Self::Comma, Self::Minus, Self::Period, Self::Slash,
        Self::Num0, Self::Num1, Self::Num2, Self::Num3, Self::Num4,
        Self::Num5, Self::Num6, Self::Num7, Self::Num8, Self::Num9,
        Self::Semicolon, Self::Equal,
        Self::A, Self::B, Self::C, Self::D, Self::E, Self::F, Self::G, Self::H, Self::I,
        Self::J, Self::K, Self::L, Self::M, Self::N, Self::O, Self::P, Self::Q, Self::R,
        Self::S, Self::T, Self::U, Self::V, Self::W, Self::X, Self::Y, Self::Z,
        Self::LeftBracket, Self::Backslash, Self::RightBracket, Self::GraveAccent,
        Self::Escape, Self::Enter, Self::Tab, Self::Backspace, Self::Insert, Self::Delete,
        Self::Right, Self::Left, Self::Down, Self::Up,
        Self::PageUp, Self::PageDown, Self::Home, Self::End,
        Self::LeftShift, Self::LeftControl, Self::RightShift, Self::RightControl,
    ];

    /// Numeric key code, usable as an index into a key table
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Whether `code` falls in the supported key range
    pub const fn in_range(code: u16) -> bool {
        code >= Self::FIRST && code <= Self::LAST
    }
}
