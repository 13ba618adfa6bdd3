//! Scancode ↔ logical key translation cache
//!
//! The host describes its active keyboard layout as a [`KeyboardLayout`]. The
//! [`Keymap`] turns that description into fixed lookup tables once, at
//! initialization, and again whenever the host reports a layout change.

use serde::{Deserialize, Serialize};

use super::keys::{Key, KEY_TABLE_SIZE};

/// Number of distinct scancodes the cache can translate
pub const SCANCODE_COUNT: usize = 256;

/// Label returned by [`Keymap::key_name`] when a key has no readable name
pub const UNKNOWN_KEY_NAME: &str = "unknown";

/// One physical key position in a layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Host scancode of the key position
    pub scancode: u16,
    /// Logical key produced at this position
    pub key: Key,
    /// Character the position types, for printable keys
    pub label: Option<String>,
}

impl LayoutEntry {
    fn printable(scancode: u16, key: Key, label: &str) -> Self {
        Self { scancode, key, label: Some(label.to_string()) }
    }

    fn control(scancode: u16, key: Key) -> Self {
        Self { scancode, key, label: None }
    }
}

/// A host keyboard layout as reported by the input-source layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardLayout {
    /// Layout identifier, e.g. `"us-ansi"`
    pub name: String,
    /// Key positions the layout defines
    pub entries: Vec<LayoutEntry>,
}

/// Built-in layouts the headless host can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPreset {
    /// US ANSI QWERTY
    #[default]
    UsAnsi,
    /// German QWERTZ
    German,
}

impl LayoutPreset {
    /// Build the layout this preset names
    pub fn layout(self) -> KeyboardLayout {
        match self {
            Self::UsAnsi => KeyboardLayout::us_ansi(),
            Self::German => KeyboardLayout::german(),
        }
    }
}

impl KeyboardLayout {
    /// US ANSI layout using macOS virtual keycodes as scancodes
    pub fn us_ansi() -> Self {
        let mut entries = vec![
            LayoutEntry::printable(0x00, Key::A, "a"),
            LayoutEntry::printable(0x01, Key::S, "s"),
            LayoutEntry::printable(0x02, Key::D, "d"),
            LayoutEntry::printable(0x03, Key::F, "f"),
            LayoutEntry::printable(0x04, Key::H, "h"),
            LayoutEntry::printable(0x05, Key::G, "g"),
            LayoutEntry::printable(0x06, Key::Z, "z"),
            LayoutEntry::printable(0x07, Key::X, "x"),
            LayoutEntry::printable(0x08, Key::C, "c"),
            LayoutEntry::printable(0x09, Key::V, "v"),
            LayoutEntry::printable(0x0B, Key::B, "b"),
            LayoutEntry::printable(0x0C, Key::Q, "q"),
            LayoutEntry::printable(0x0D, Key::W, "w"),
            LayoutEntry::printable(0x0E, Key::E, "e"),
            LayoutEntry::printable(0x0F, Key::R, "r"),
            LayoutEntry::printable(0x10, Key::Y, "y"),
            LayoutEntry::printable(0x11, Key::T, "t"),
            LayoutEntry::printable(0x12, Key::Num1, "1"),
            LayoutEntry::printable(0x13, Key::Num2, "2"),
            LayoutEntry::printable(0x14, Key::Num3, "3"),
            LayoutEntry::printable(0x15, Key::Num4, "4"),
            LayoutEntry::printable(0x16, Key::Num6, "6"),
            LayoutEntry::printable(0x17, Key::Num5, "5"),
            LayoutEntry::printable(0x18, Key::Equal, "="),
            LayoutEntry::printable(0x19, Key::Num9, "9"),
            LayoutEntry::printable(0x1A, Key::Num7, "7"),
            LayoutEntry::printable(0x1B, Key::Minus, "-"),
            LayoutEntry::printable(0x1C, Key::Num8, "8"),
            LayoutEntry::printable(0x1D, Key::Num0, "0"),
            LayoutEntry::printable(0x1E, Key::RightBracket, "]"),
            LayoutEntry::printable(0x1F, Key::O, "o"),
            LayoutEntry::printable(0x20, Key::U, "u"),
            LayoutEntry::printable(0x21, Key::LeftBracket, "["),
            LayoutEntry::printable(0x22, Key::I, "i"),
            LayoutEntry::printable(0x23, Key::P, "p"),
            LayoutEntry::printable(0x25, Key::L, "l"),
            LayoutEntry::printable(0x26, Key::J, "j"),
            LayoutEntry::printable(0x27, Key::Apostrophe, "'"),
            LayoutEntry::printable(0x28, Key::K, "k"),
            LayoutEntry::printable(0x29, Key::Semicolon, ";"),
            LayoutEntry::printable(0x2A, Key::Backslash, "\\"),
            LayoutEntry::printable(0x2B, Key::Comma, ","),
            LayoutEntry::printable(0x2C, Key::Slash, "/"),
            LayoutEntry::printable(0x2D, Key::N, "n"),
            LayoutEntry::printable(0x2E, Key::M, "m"),
            LayoutEntry::printable(0x2F, Key::Period, "."),
            LayoutEntry::printable(0x32, Key::GraveAccent, "`"),
        ];
        entries.extend(Self::control_entries());

        Self { name: "us-ansi".to_string(), entries }
    }

    /// German QWERTZ layout: Y and Z swap positions, umlauts replace punctuation labels
    pub fn german() -> Self {
        let mut layout = Self::us_ansi();
        layout.name = "german".to_string();

        for entry in &mut layout.entries {
            match entry.scancode {
                0x06 => *entry = LayoutEntry::printable(0x06, Key::Y, "y"),
                0x10 => *entry = LayoutEntry::printable(0x10, Key::Z, "z"),
                0x21 => entry.label = Some("ü".to_string()),
                0x27 => entry.label = Some("ä".to_string()),
                0x29 => entry.label = Some("ö".to_string()),
                0x1B => entry.label = Some("ß".to_string()),
                _ => {}
            }
        }
        layout
    }

    fn control_entries() -> Vec<LayoutEntry> {
        vec![
            LayoutEntry::control(0x24, Key::Enter),
            LayoutEntry::control(0x30, Key::Tab),
            LayoutEntry::printable(0x31, Key::Space, " "),
            LayoutEntry::control(0x33, Key::Backspace),
            LayoutEntry::control(0x35, Key::Escape),
            LayoutEntry::control(0x38, Key::LeftShift),
            LayoutEntry::control(0x3B, Key::LeftControl),
            LayoutEntry::control(0x3C, Key::RightShift),
            LayoutEntry::control(0x3E, Key::RightControl),
            LayoutEntry::control(0x72, Key::Insert),
            LayoutEntry::control(0x73, Key::Home),
            LayoutEntry::control(0x74, Key::PageUp),
            LayoutEntry::control(0x75, Key::Delete),
            LayoutEntry::control(0x77, Key::End),
            LayoutEntry::control(0x79, Key::PageDown),
            LayoutEntry::control(0x7B, Key::Left),
            LayoutEntry::control(0x7C, Key::Right),
            LayoutEntry::control(0x7D, Key::Down),
            LayoutEntry::control(0x7E, Key::Up),
        ]
    }
}

/// Cached translation tables for the active keyboard layout
#[derive(Debug, Clone)]
pub struct Keymap {
    layout_name: String,
    keycodes: [Option<Key>; SCANCODE_COUNT],
    scancodes: [Option<u16>; KEY_TABLE_SIZE],
    names: Vec<Option<String>>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::empty()
    }
}

impl Keymap {
    /// A cache that translates nothing
    pub fn empty() -> Self {
        Self {
            layout_name: String::new(),
            keycodes: [None; SCANCODE_COUNT],
            scancodes: [None; KEY_TABLE_SIZE],
            names: vec![None; SCANCODE_COUNT],
        }
    }

    /// Build the tables for a layout
    pub fn from_layout(layout: &KeyboardLayout) -> Self {
        let mut keymap = Self::empty();
        keymap.rebuild(layout);
        keymap
    }

    /// Discard the current tables and rebuild them from `layout`
    pub fn rebuild(&mut self, layout: &KeyboardLayout) {
        *self = Self::empty();
        self.layout_name.clone_from(&layout.name);

        for entry in &layout.entries {
            let index = usize::from(entry.scancode);
            if index >= SCANCODE_COUNT {
                log::warn!(
                    "Layout '{}' maps scancode {:#x} beyond the {}-entry table, skipping",
                    layout.name,
                    entry.scancode,
                    SCANCODE_COUNT
                );
                continue;
            }

            self.keycodes[index] = Some(entry.key);
            self.names[index].clone_from(&entry.label);

            // First position wins as the canonical scancode for a key
            let canonical = &mut self.scancodes[usize::from(entry.key.code())];
            if canonical.is_none() {
                *canonical = Some(entry.scancode);
            }
        }

        log::debug!(
            "Keymap built for layout '{}' ({} positions)",
            self.layout_name,
            self.keycodes.iter().filter(|key| key.is_some()).count()
        );
    }

    /// Name of the layout the tables were built from
    pub fn layout_name(&self) -> &str {
        &self.layout_name
    }

    /// Logical key at a scancode
    pub fn translate(&self, scancode: u16) -> Option<Key> {
        self.keycodes.get(usize::from(scancode)).copied().flatten()
    }

    /// Canonical scancode of a logical key
    pub fn scancode(&self, key: Key) -> Option<u16> {
        self.scancodes[usize::from(key.code())]
    }

    /// Label of a scancode, if the layout gives it one
    pub fn scancode_name(&self, scancode: u16) -> Option<&str> {
        self.names.get(usize::from(scancode))?.as_deref()
    }

    /// Human-readable name of a key
    ///
    /// A recognized `key` overrides `scancode` with the key's canonical scancode.
    /// Falls back to [`UNKNOWN_KEY_NAME`].
    pub fn key_name(&self, key: Option<Key>, scancode: u16) -> &str {
        let scancode = match key {
            Some(key) => match self.scancode(key) {
                Some(canonical) => canonical,
                None => return UNKNOWN_KEY_NAME,
            },
            None => scancode,
        };
        self.scancode_name(scancode).unwrap_or(UNKNOWN_KEY_NAME)
    }
}
