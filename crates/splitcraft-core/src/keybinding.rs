#![forbid(unsafe_code)]

//! Puzzle commands and the keymap that produces them.
//!
//! Bindings are written in tmux notation so a keymap can be lifted straight
//! out of a user's multiplexer config:
//!
//! | Notation | Meaning |
//! |----------|---------|
//! | `M-h` | Alt+h |
//! | `C-x` | Ctrl+x |
//! | `S-Left` | Shift+Left |
//! | `M-Q` | Alt+Shift+q |
//! | `BSpace`, `DC`, `PPage`, `F5` | named keys |
//!
//! Prefix sequences such as `C-a h` are not supported: a chord is a single key
//! press with modifiers.
//!
//! # Defaults
//!
//! | Command | Chord |
//! |---------|-------|
//! | split horizontal | `M-q` |
//! | split vertical | `M-w` |
//! | delete pane | `M-x` |
//! | navigate left/down/up/right | `M-h` / `M-j` / `M-k` / `M-l` |
//!
//! # Example
//!
//! ```
//! use splitcraft_core::event::{KeyCode, KeyEvent, Modifiers};
//! use splitcraft_core::geometry::Direction;
//! use splitcraft_core::keybinding::{Command, Keymap};
//!
//! let keymap = Keymap::default();
//! let alt_l = KeyEvent::new(KeyCode::Char('l')).with_modifiers(Modifiers::ALT);
//! assert_eq!(keymap.resolve(&alt_l), Some(Command::Navigate(Direction::Right)));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::event::{KeyCode, KeyEvent, Modifiers};
use crate::geometry::{Direction, Orientation};

/// High-level puzzle command, independent of any key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "command", content = "direction", rename_all = "snake_case")]
pub enum Command {
    /// Split the active pane with a new vertical boundary (left/right halves).
    SplitVertical,
    /// Split the active pane with a new horizontal boundary (top/bottom halves).
    SplitHorizontal,
    /// Delete the active pane and let a neighbor absorb it.
    DeletePane,
    /// Move focus to the adjacent pane.
    Navigate(Direction),
}

impl Command {
    /// Every command, in legend order.
    pub const ALL: [Self; 7] = [
        Self::SplitHorizontal,
        Self::SplitVertical,
        Self::DeletePane,
        Self::Navigate(Direction::Left),
        Self::Navigate(Direction::Down),
        Self::Navigate(Direction::Up),
        Self::Navigate(Direction::Right),
    ];

    /// Split orientation for split commands.
    #[must_use]
    pub const fn split_orientation(self) -> Option<Orientation> {
        match self {
            Self::SplitVertical => Some(Orientation::Vertical),
            Self::SplitHorizontal => Some(Orientation::Horizontal),
            Self::DeletePane | Self::Navigate(_) => None,
        }
    }

    /// Short label for control legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SplitVertical => "split vertical",
            Self::SplitHorizontal => "split horizontal",
            Self::DeletePane => "delete pane",
            Self::Navigate(Direction::Left) => "navigate left",
            Self::Navigate(Direction::Right) => "navigate right",
            Self::Navigate(Direction::Up) => "navigate up",
            Self::Navigate(Direction::Down) => "navigate down",
        }
    }
}

// ---------------------------------------------------------------------------
// Key chords
// ---------------------------------------------------------------------------

/// A single key press with modifiers, written in tmux notation.
///
/// Uppercase ASCII letters are normalized to lowercase plus `SHIFT`, so `M-Q`
/// and `M-S-q` describe the same chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyChord {
    code: KeyCode,
    modifiers: Modifiers,
}

impl KeyChord {
    #[must_use]
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        let (code, modifiers) = normalize(code, modifiers);
        Self { code, modifiers }
    }

    /// Alt + character, the default binding style.
    #[must_use]
    pub fn alt(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::ALT)
    }

    #[must_use]
    pub const fn code(&self) -> KeyCode {
        self.code
    }

    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether `event` is this chord.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let (code, modifiers) = normalize(event.code, event.modifiers);
        code == self.code && modifiers == self.modifiers
    }
}

fn normalize(code: KeyCode, modifiers: Modifiers) -> (KeyCode, Modifiers) {
    match code {
        KeyCode::Char(c) if c.is_ascii_uppercase() => (
            KeyCode::Char(c.to_ascii_lowercase()),
            modifiers | Modifiers::SHIFT,
        ),
        _ => (code, modifiers),
    }
}

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("Enter", KeyCode::Enter),
    ("Escape", KeyCode::Escape),
    ("BSpace", KeyCode::Backspace),
    ("Tab", KeyCode::Tab),
    ("DC", KeyCode::Delete),
    ("IC", KeyCode::Insert),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("PPage", KeyCode::PageUp),
    ("NPage", KeyCode::PageDown),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Space", KeyCode::Char(' ')),
];

// Accepted on input only; Display uses the first spelling above.
const KEY_ALIASES: &[(&str, KeyCode)] = &[
    ("PgUp", KeyCode::PageUp),
    ("PageUp", KeyCode::PageUp),
    ("PgDn", KeyCode::PageDown),
    ("PageDown", KeyCode::PageDown),
    ("Delete", KeyCode::Delete),
    ("Insert", KeyCode::Insert),
    ("Backspace", KeyCode::Backspace),
    ("Esc", KeyCode::Escape),
];

fn parse_key_name(name: &str) -> Result<KeyCode, KeyChordError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }
    if let Some(&(_, code)) = NAMED_KEYS
        .iter()
        .chain(KEY_ALIASES)
        .find(|(label, _)| label.eq_ignore_ascii_case(name))
    {
        return Ok(code);
    }
    if let Some(num) = name.strip_prefix(['F', 'f'])
        && let Ok(n) = num.parse::<u8>()
        && (1..=24).contains(&n)
    {
        return Ok(KeyCode::F(n));
    }
    Err(KeyChordError::UnknownKey(name.to_string()))
}

impl FromStr for KeyChord {
    type Err = KeyChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyChordError::Empty);
        }
        if s.split_whitespace().nth(1).is_some() {
            return Err(KeyChordError::Sequence(s.to_string()));
        }

        let mut modifiers = Modifiers::NONE;
        let mut rest = s;
        // "M--" binds Alt+'-', so only strip while a key name remains.
        while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
            let modifier = match rest.as_bytes()[0] {
                b'M' | b'm' => Modifiers::ALT,
                b'C' | b'c' => Modifiers::CTRL,
                b'S' | b's' => Modifiers::SHIFT,
                _ => break,
            };
            if modifiers.contains(modifier) {
                return Err(KeyChordError::DuplicateModifier(s.to_string()));
            }
            modifiers |= modifier;
            rest = &rest[2..];
        }

        let code = parse_key_name(rest)?;
        Ok(Self::new(code, modifiers))
    }
}

impl TryFrom<String> for KeyChord {
    type Error = KeyChordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyChord> for String {
    fn from(chord: KeyChord) -> Self {
        chord.to_string()
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(Modifiers::CTRL) {
            f.write_str("C-")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            f.write_str("M-")?;
        }
        match self.code {
            KeyCode::Char(c) if c.is_ascii_lowercase() => {
                if self.modifiers.contains(Modifiers::SHIFT) {
                    write!(f, "{}", c.to_ascii_uppercase())
                } else {
                    write!(f, "{c}")
                }
            }
            code => {
                if self.modifiers.contains(Modifiers::SHIFT) {
                    f.write_str("S-")?;
                }
                match code {
                    KeyCode::Char(' ') => f.write_str("Space"),
                    KeyCode::Char(c) => write!(f, "{c}"),
                    KeyCode::F(n) => write!(f, "F{n}"),
                    named => {
                        let label = NAMED_KEYS
                            .iter()
                            .find(|(_, code)| *code == named)
                            .map_or("?", |(label, _)| label);
                        f.write_str(label)
                    }
                }
            }
        }
    }
}

/// Errors from parsing a tmux-notation key chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyChordError {
    /// Empty binding string.
    Empty,
    /// Key name not recognized.
    UnknownKey(String),
    /// The same modifier prefix appears twice.
    DuplicateModifier(String),
    /// Multi-key prefix sequence (e.g. `C-a h`).
    Sequence(String),
}

impl fmt::Display for KeyChordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty key binding"),
            Self::UnknownKey(name) => write!(f, "unknown key name {name:?}"),
            Self::DuplicateModifier(chord) => {
                write!(f, "duplicate modifier in key binding {chord:?}")
            }
            Self::Sequence(chord) => write!(
                f,
                "key sequence {chord:?} is not supported; bind a single chord"
            ),
        }
    }
}

impl std::error::Error for KeyChordError {}

// ---------------------------------------------------------------------------
// Keymap
// ---------------------------------------------------------------------------

/// Command bindings. `None` leaves a command unbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keymap {
    pub split_horizontal: Option<KeyChord>,
    pub split_vertical: Option<KeyChord>,
    pub delete_pane: Option<KeyChord>,
    pub left: Option<KeyChord>,
    pub down: Option<KeyChord>,
    pub up: Option<KeyChord>,
    pub right: Option<KeyChord>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            split_horizontal: Some(KeyChord::alt('q')),
            split_vertical: Some(KeyChord::alt('w')),
            delete_pane: Some(KeyChord::alt('x')),
            left: Some(KeyChord::alt('h')),
            down: Some(KeyChord::alt('j')),
            up: Some(KeyChord::alt('k')),
            right: Some(KeyChord::alt('l')),
        }
    }
}

impl Keymap {
    /// A keymap with every command unbound.
    #[must_use]
    pub const fn unbound() -> Self {
        Self {
            split_horizontal: None,
            split_vertical: None,
            delete_pane: None,
            left: None,
            down: None,
            up: None,
            right: None,
        }
    }

    /// The chord bound to `command`, if any.
    #[must_use]
    pub fn binding(&self, command: Command) -> Option<KeyChord> {
        match command {
            Command::SplitHorizontal => self.split_horizontal,
            Command::SplitVertical => self.split_vertical,
            Command::DeletePane => self.delete_pane,
            Command::Navigate(Direction::Left) => self.left,
            Command::Navigate(Direction::Down) => self.down,
            Command::Navigate(Direction::Up) => self.up,
            Command::Navigate(Direction::Right) => self.right,
        }
    }

    /// Bind `command` to `chord`, or unbind it with `None`.
    pub fn bind(&mut self, command: Command, chord: Option<KeyChord>) {
        let slot = match command {
            Command::SplitHorizontal => &mut self.split_horizontal,
            Command::SplitVertical => &mut self.split_vertical,
            Command::DeletePane => &mut self.delete_pane,
            Command::Navigate(Direction::Left) => &mut self.left,
            Command::Navigate(Direction::Down) => &mut self.down,
            Command::Navigate(Direction::Up) => &mut self.up,
            Command::Navigate(Direction::Right) => &mut self.right,
        };
        *slot = chord;
    }

    /// Map a key event to a command. Releases never resolve.
    ///
    /// When two commands share a chord the first in [`Command::ALL`] wins.
    #[must_use]
    pub fn resolve(&self, event: &KeyEvent) -> Option<Command> {
        if !event.is_actionable() {
            return None;
        }
        Command::ALL.into_iter().find(|&command| {
            self.binding(command)
                .is_some_and(|chord| chord.matches(event))
        })
    }

    /// `(command, chord)` pairs for a controls legend, skipping unbound ones.
    #[must_use]
    pub fn describe(&self) -> Vec<(Command, String)> {
        Command::ALL
            .into_iter()
            .filter_map(|command| {
                self.binding(command)
                    .map(|chord| (command, chord.to_string()))
            })
            .collect()
    }

    /// Commands that share a chord with an earlier command.
    #[must_use]
    pub fn conflicts(&self) -> Vec<(Command, Command)> {
        let mut out = Vec::new();
        for (i, &first) in Command::ALL.iter().enumerate() {
            let Some(chord) = self.binding(first) else {
                continue;
            };
            for &second in &Command::ALL[i + 1..] {
                if self.binding(second) == Some(chord) {
                    out.push((first, second));
                }
            }
        }
        out
    }
}
