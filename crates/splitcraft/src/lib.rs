#![forbid(unsafe_code)]

//! Splitcraft public facade crate.
//!
//! Re-exports the types a host needs to run the pane-splitting puzzle, plus
//! a prelude for day-to-day usage.
//!
//! ```
//! use splitcraft::prelude::*;
//! use web_time::Instant;
//!
//! let mut session = Session::new(SessionConfig::default().with_seed(1));
//! let outcome = session.apply(Command::SplitVertical, Instant::now());
//! assert!(outcome.line_covered);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use splitcraft_core::{
    Command, Direction, EPSILON, Interval, KeyChord, KeyChordError, KeyCode, KeyEvent,
    KeyEventKind, Keymap, Modifiers, Orientation, Rect, Segment,
};

// --- Layout re-exports -----------------------------------------------------

pub use splitcraft_layout::{
    CoverageResult, CoverageSpan, LineCoverage, Pane, PaneId, PaneLayout, TilingError,
};

// --- Runtime re-exports ----------------------------------------------------

pub use splitcraft_runtime::{
    AdvanceTicket, CommandOutcome, ConfigError, LevelAdvanced, LineGenerator, PhaseKind, Session,
    SessionConfig, SessionSnapshot, TargetLine,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for splitcraft hosts.
#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    KeyChord(KeyChordError),
    Tiling(TilingError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::KeyChord(err) => write!(f, "{err}"),
            Self::Tiling(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::KeyChord(err) => Some(err),
            Self::Tiling(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<KeyChordError> for Error {
    fn from(err: KeyChordError) -> Self {
        Self::KeyChord(err)
    }
}

impl From<TilingError> for Error {
    fn from(err: TilingError) -> Self {
        Self::Tiling(err)
    }
}

/// Standard result type for splitcraft APIs.
pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::{
        Command, Direction, Error, KeyCode, KeyEvent, Keymap, Modifiers, Orientation, PaneId,
        PaneLayout, Result, Segment, Session, SessionConfig, SessionSnapshot,
    };

    pub use crate::{core, layout, runtime};
}

pub use splitcraft_core as core;
pub use splitcraft_layout as layout;
pub use splitcraft_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_convert_and_chain() {
        let err: Error = "C-a h".parse::<KeyChord>().map_err(Error::from).expect_err("sequence");
        assert!(matches!(err, Error::KeyChord(KeyChordError::Sequence(_))));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn validate_surfaces_as_facade_error() {
        fn check(layout: &PaneLayout) -> Result<()> {
            layout.validate()?;
            Ok(())
        }
        assert!(check(&PaneLayout::new()).is_ok());
    }
}
