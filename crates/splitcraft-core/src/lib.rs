#![forbid(unsafe_code)]

//! Core: normalized geometry, keyboard events, and command bindings.
//!
//! # Role in splitcraft
//! `splitcraft-core` holds the leaf types every other crate shares:
//!
//! - **Geometry**: [`Rect`], [`Segment`], [`Interval`] in unit-square
//!   coordinates, plus the single [`EPSILON`] used for edge coincidence.
//! - **Events**: host-neutral [`KeyEvent`]s.
//! - **Keybindings**: tmux-notation [`KeyChord`]s and the [`Keymap`] that
//!   turns key events into puzzle [`Command`]s.
//!
//! # How it fits in the system
//! `splitcraft-layout` builds the pane engine on these primitives and
//! `splitcraft-runtime` drives a session from [`Command`]s.

pub mod event;
pub mod geometry;
pub mod keybinding;

pub use event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use geometry::{
    Direction, EPSILON, Interval, Orientation, Rect, SNAP, Segment, approx_eq, coincides,
};
pub use keybinding::{Command, KeyChord, KeyChordError, Keymap};
