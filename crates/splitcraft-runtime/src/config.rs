#![forbid(unsafe_code)]

//! Session configuration.
//!
//! [`SessionConfig`] gathers the tunables of a puzzle session. Defaults
//! reproduce the stock game: a one second pause before the next level, at
//! most five segments per line, and Alt-based keybindings.
//!
//! # Sources
//!
//! - [`SessionConfig::default`]
//! - [`SessionConfig::from_env`], reading `SPLITCRAFT_ADVANCE_DELAY_MS`,
//!   `SPLITCRAFT_SEED`, and `SPLITCRAFT_MAX_SEGMENTS`
//! - TOML or JSON files behind the `config-file` feature:
//!
//! ```toml
//! advance_delay_ms = 750
//! seed = 42
//! max_segments = 6
//!
//! [keymap]
//! left = "C-h"
//! delete_pane = "M-BSpace"
//! ```
//!
//! Values from the environment are clamped with [`SessionConfig::validated`].
//! File loaders reject out-of-range values with [`ConfigError::Validation`].

#[cfg(feature = "config-file")]
use std::path::Path;

use serde::{Deserialize, Serialize};
use splitcraft_core::Keymap;
use web_time::Duration;

pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 1000;
pub const MAX_ADVANCE_DELAY_MS: u64 = 10_000;
pub const DEFAULT_MAX_SEGMENTS: usize = 5;
pub const MIN_SEGMENTS: usize = 2;
pub const MAX_SEGMENTS: usize = 8;

/// Tunables for one puzzle session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause between covering a line and loading the next level.
    pub advance_delay_ms: u64,

    /// Seed for target-line generation. `None` draws from the OS.
    pub seed: Option<u64>,

    /// Upper bound on segments per generated line.
    pub max_segments: usize,

    /// Lower bound for random segment positions.
    pub position_min: f64,

    /// Upper bound for random segment positions.
    pub position_max: f64,

    pub keymap: Keymap,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            advance_delay_ms: DEFAULT_ADVANCE_DELAY_MS,
            seed: None,
            max_segments: DEFAULT_MAX_SEGMENTS,
            position_min: 0.2,
            position_max: 0.8,
            keymap: Keymap::default(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    #[must_use]
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    /// Load overrides from the process environment.
    ///
    /// Reads:
    /// - `SPLITCRAFT_ADVANCE_DELAY_MS`: pause before the next level
    /// - `SPLITCRAFT_SEED`: fixed RNG seed for reproducible lines
    /// - `SPLITCRAFT_MAX_SEGMENTS`: cap on segments per line
    ///
    /// Unparseable values are ignored; the result is clamped.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) with a custom lookup, for tests.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = get_env("SPLITCRAFT_ADVANCE_DELAY_MS")
            && let Ok(ms) = val.trim().parse::<u64>()
        {
            config.advance_delay_ms = ms;
        }

        if let Some(val) = get_env("SPLITCRAFT_SEED")
            && let Ok(seed) = val.trim().parse::<u64>()
        {
            config.seed = Some(seed);
        }

        if let Some(val) = get_env("SPLITCRAFT_MAX_SEGMENTS")
            && let Ok(n) = val.trim().parse::<usize>()
        {
            config.max_segments = n;
        }

        config.validated()
    }

    /// Clamp every value into its supported range.
    ///
    /// - `advance_delay_ms` to `0..=10000`
    /// - `max_segments` to `2..=8`
    /// - the position range to `[0.05, 0.95]` with `min <= max`
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.advance_delay_ms = self.advance_delay_ms.min(MAX_ADVANCE_DELAY_MS);
        self.max_segments = self.max_segments.clamp(MIN_SEGMENTS, MAX_SEGMENTS);

        let lo = finite_or(self.position_min, 0.2).clamp(0.05, 0.95);
        let hi = finite_or(self.position_max, 0.8).clamp(0.05, 0.95);
        (self.position_min, self.position_max) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self
    }

    /// Human-readable problems with this config. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.advance_delay_ms > MAX_ADVANCE_DELAY_MS {
            errors.push(format!(
                "advance_delay_ms must be at most {MAX_ADVANCE_DELAY_MS}, got {}",
                self.advance_delay_ms
            ));
        }
        if !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&self.max_segments) {
            errors.push(format!(
                "max_segments must be in [{MIN_SEGMENTS}, {MAX_SEGMENTS}], got {}",
                self.max_segments
            ));
        }
        for (name, value) in [
            ("position_min", self.position_min),
            ("position_max", self.position_max),
        ] {
            if !(0.05..=0.95).contains(&value) {
                errors.push(format!("{name} must be in [0.05, 0.95], got {value}"));
            }
        }
        if self.position_min > self.position_max {
            errors.push(format!(
                "position_min ({}) must not exceed position_max ({})",
                self.position_min, self.position_max
            ));
        }
        for (a, b) in self.keymap.conflicts() {
            errors.push(format!(
                "keymap binds {} and {} to the same chord",
                a.label(),
                b.label()
            ));
        }

        errors
    }

    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    #[cfg(feature = "config-file")]
    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Errors from loading a [`SessionConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// Values outside their supported ranges.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "invalid config: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
