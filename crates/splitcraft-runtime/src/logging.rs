#![forbid(unsafe_code)]

//! Subscriber setup for binaries embedding splitcraft.
//!
//! Libraries only emit `tracing` events. Hosts that want them printed call
//! [`init_from_env`] once at startup:
//!
//! - `SPLITCRAFT_LOG`: an `EnvFilter` directive such as
//!   `splitcraft_layout=debug,info` (default `info`)
//! - `SPLITCRAFT_LOG_FORMAT=json`: one JSON object per line instead of text
//!
//! Output goes to stderr so it never interleaves with a renderer on stdout.

use tracing_subscriber::EnvFilter;

pub const FILTER_ENV: &str = "SPLITCRAFT_LOG";
pub const FORMAT_ENV: &str = "SPLITCRAFT_LOG_FORMAT";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

fn filter_from(value: Option<&str>) -> EnvFilter {
    value
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install a global subscriber configured from the environment.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_from_env() -> bool {
    let filter = std::env::var(FILTER_ENV).ok();
    let format = std::env::var(FORMAT_ENV).ok();
    init_with(filter.as_deref(), LogFormat::from_env_value(format.as_deref()))
}

/// Install a global subscriber with explicit settings.
pub fn init_with(filter: Option<&str>, format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from(filter))
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_defaults_to_text() {
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Text);
        assert_eq!(LogFormat::from_env_value(Some("pretty")), LogFormat::Text);
        assert_eq!(LogFormat::from_env_value(Some(" JSON ")), LogFormat::Json);
    }

    #[test]
    fn filter_uses_directives_or_info() {
        assert_eq!(filter_from(None).to_string(), "info");
        let filter = filter_from(Some("splitcraft_layout=debug"));
        assert!(filter.to_string().contains("splitcraft_layout=debug"));
    }

    #[test]
    fn second_init_reports_existing_subscriber() {
        let _ = init_with(Some("warn"), LogFormat::Text);
        assert!(!init_with(Some("warn"), LogFormat::Json));
    }
}
