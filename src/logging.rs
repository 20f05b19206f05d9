//! Diagnostic log settings.
//!
//! Settings are layered: built-in defaults, then `TYPEFORWARDER_LOG_FORMAT` /
//! `TYPEFORWARDER_LOG_LEVEL`, then `--log-format` / `--log-level`.
//! Unparseable environment values are ignored; unparseable flags are
//! argument errors.

use std::env;
use std::fmt;
use std::str::FromStr;

pub const LOG_FORMAT_ENV: &str = "TYPEFORWARDER_LOG_FORMAT";
pub const LOG_LEVEL_ENV: &str = "TYPEFORWARDER_LOG_LEVEL";

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Auto,
    Text,
    Json,
}

impl LogFormat {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("auto", Self::Auto),
        ("text", Self::Text),
        ("plain", Self::Text),
        ("json", Self::Json),
    ];
}

/// Logging verbosity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("error", Self::Error),
        ("err", Self::Error),
        ("warn", Self::Warn),
        ("warning", Self::Warn),
        ("info", Self::Info),
        ("debug", Self::Debug),
        ("trace", Self::Trace),
        ("verbose", Self::Trace),
    ];

    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// A log format or level name that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLogSetting {
    setting: &'static str,
    value: String,
    accepted: &'static str,
}

impl fmt::Display for InvalidLogSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid log {} '{}'; supported values: {}",
            self.setting, self.value, self.accepted
        )
    }
}

impl std::error::Error for InvalidLogSetting {}

fn lookup<T: Copy>(
    names: &[(&str, T)],
    value: &str,
    setting: &'static str,
    accepted: &'static str,
) -> Result<T, InvalidLogSetting> {
    names
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value.trim()))
        .map(|(_, parsed)| *parsed)
        .ok_or_else(|| InvalidLogSetting {
            setting,
            value: value.to_string(),
            accepted,
        })
}

impl FromStr for LogFormat {
    type Err = InvalidLogSetting;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        lookup(Self::NAMES, value, "format", "auto, text, json")
    }
}

impl FromStr for LogLevel {
    type Err = InvalidLogSetting;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        lookup(Self::NAMES, value, "level", "error, warn, info, debug, trace")
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}

/// Effective log configuration for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    pub format: LogFormat,
    pub level: LogLevel,
}

impl LogOptions {
    /// A successful run prints nothing to stderr.
    pub const DEFAULT: Self = Self {
        format: LogFormat::Auto,
        level: LogLevel::Warn,
    };

    /// Overlay `settings` on `self`, keeping fields that `settings` leaves
    /// unset.
    #[must_use]
    pub fn overlay(self, settings: LogSettings) -> Self {
        Self {
            format: settings.format.unwrap_or(self.format),
            level: settings.level.unwrap_or(self.level),
        }
    }

    /// `Auto` renders as text: there is no terminal-dependent JSON switch.
    #[must_use]
    pub fn resolved(self) -> Self {
        match self.format {
            LogFormat::Auto => Self {
                format: LogFormat::Text,
                ..self
            },
            _ => self,
        }
    }
}

impl Default for LogOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Partial log configuration from one source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub format: Option<LogFormat>,
    pub level: Option<LogLevel>,
}

impl LogSettings {
    /// Settings read through `var`, a lookup such as `std::env::var(..).ok()`.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            format: var(LOG_FORMAT_ENV).and_then(|value| value.parse().ok()),
            level: var(LOG_LEVEL_ENV).and_then(|value| value.parse().ok()),
        }
    }

    /// Defaults, then the process environment, then `self`.
    #[must_use]
    pub fn merged_with_env(self) -> LogOptions {
        let env_settings = Self::from_vars(|key| env::var(key).ok());
        LogOptions::DEFAULT.overlay(env_settings).overlay(self)
    }
}
