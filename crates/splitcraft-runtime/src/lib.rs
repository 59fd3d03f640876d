#![forbid(unsafe_code)]

//! Runtime for splitcraft puzzles.
//!
//! # Role in splitcraft
//! `splitcraft-runtime` turns the pane engine into a game: it owns the
//! current level, generates each level's [`TargetLine`], and schedules the
//! advance to the next level once the line is covered.
//!
//! # Primary responsibilities
//! - **Session**: the [`Session`] state machine and its render [`SessionSnapshot`].
//! - **Target lines**: deterministic (seeded) [`LineGenerator`].
//! - **Cancellation**: tokens for host timers driving delayed advances.
//! - **Config**: [`SessionConfig`] from defaults, environment, or files.
//!
//! # How it fits in the system
//! Hosts capture input, translate it to [`splitcraft_core::KeyEvent`]s, and
//! feed them to [`Session::handle_key`]. Rendering reads
//! [`Session::snapshot`]. Nothing here touches a terminal or a clock.

pub mod cancellation;
pub mod config;
#[cfg(feature = "tracing-init")]
pub mod logging;
pub mod session;
pub mod target_line;

pub use cancellation::{CancellationSource, CancellationToken};
pub use config::{ConfigError, SessionConfig};
pub use session::{
    AdvanceTicket, CommandOutcome, LevelAdvanced, PaneView, PhaseKind, Session, SessionSnapshot,
};
pub use target_line::{LineGenerator, TargetLine};
