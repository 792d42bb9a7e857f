//! Structured logging configuration.

use std::path::PathBuf;

/// Default filter when neither `EVENTSENSE_LOG` nor `RUST_LOG` is set.
const DEFAULT_FILTER: &str = "warn,eventsense=info";
/// Filter used for verbose runs.
const VERBOSE_FILTER: &str = "info,eventsense=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format string; anything but `json` is pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive string.
    pub filter: String,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: DEFAULT_FILTER.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds a config from the process environment.
    ///
    /// `verbose` raises the default filter; an explicit filter variable wins.
    #[must_use]
    pub fn from_env(verbose: bool) -> Self {
        Self::from_lookup(verbose, |key| std::env::var(key).ok())
    }

    /// Builds a config from variables read through `lookup`.
    ///
    /// | Variable | Effect |
    /// |----------|--------|
    /// | `EVENTSENSE_LOG` | Filter directive |
    /// | `RUST_LOG` | Filter directive when `EVENTSENSE_LOG` is unset |
    /// | `EVENTSENSE_LOG_FORMAT` | `json` or `pretty` |
    /// | `EVENTSENSE_LOG_FILE` | Append-mode log file |
    #[must_use]
    pub fn from_lookup<F>(verbose: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let filter = get("EVENTSENSE_LOG")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or_else(|| {
                if verbose {
                    VERBOSE_FILTER.to_string()
                } else {
                    DEFAULT_FILTER.to_string()
                }
            });
        Self {
            format: get("EVENTSENSE_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            filter,
            file: get("EVENTSENSE_LOG_FILE").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::from_lookup(false, |_| None);
        assert_eq!(config, LoggingConfig::default());

        let verbose = LoggingConfig::from_lookup(true, |_| None);
        assert_eq!(verbose.filter, VERBOSE_FILTER);
    }

    #[test]
    fn test_eventsense_log_beats_rust_log() {
        let config = LoggingConfig::from_lookup(true, |key| match key {
            "EVENTSENSE_LOG" => Some("trace".to_string()),
            "RUST_LOG" => Some("error".to_string()),
            _ => None,
        });
        assert_eq!(config.filter, "trace");

        let config = LoggingConfig::from_lookup(false, |key| {
            (key == "RUST_LOG").then(|| "error".to_string())
        });
        assert_eq!(config.filter, "error");
    }

    #[test]
    fn test_format_and_file() {
        let config = LoggingConfig::from_lookup(false, |key| match key {
            "EVENTSENSE_LOG_FORMAT" => Some("JSON".to_string()),
            "EVENTSENSE_LOG_FILE" => Some("/tmp/eventsense.log".to_string()),
            _ => None,
        });
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("/tmp/eventsense.log")));
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("yaml"), LogFormat::Pretty);
    }
}
