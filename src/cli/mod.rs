//! CLI front-end: option parsing and usage text for the `typeforwarder` binary.

mod help;
mod options;

pub mod dispatch;

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use crate::logging::{InvalidLogSetting, LogFormat, LogLevel, LogOptions, LogSettings};
use options::{reject_value, required_value, split_option};

/// Immutable configuration for one forwarding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwarderConfig {
    /// Assembly whose public types are excluded from the output (`--in1`).
    pub source: PathBuf,
    /// Assembly whose public types are forwarded (`--in2`).
    pub target: PathBuf,
    /// Destination for the generated directives (`--out`).
    pub output: PathBuf,
}

impl ForwarderConfig {
    /// Describe the first input that is not an existing file, if any.
    #[must_use]
    pub fn missing_input(&self) -> Option<String> {
        [("in1", &self.source), ("in2", &self.target)]
            .into_iter()
            .find(|(_, path)| !path.is_file())
            .map(|(flag, path)| format!("{flag} '{}' does not exist", path.display()))
    }
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate(ForwarderConfig),
    /// Print usage; `reason` explains why when help was not asked for.
    Usage { reason: Option<String> },
}

/// Parsed CLI invocation.
#[derive(Debug, Clone)]
pub struct Cli {
    pub command: Command,
    pub log_options: LogOptions,
}

/// Error emitted while parsing command-line arguments.
#[derive(Debug, Clone)]
pub struct CliError {
    message: String,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for CliError {}

impl From<InvalidLogSetting> for CliError {
    fn from(error: InvalidLogSetting) -> Self {
        Self::new(error.to_string())
    }
}

impl Cli {
    /// Parse arguments, excluding the program name.
    ///
    /// Missing required options are not an error: they produce
    /// [`Command::Usage`] so the caller can print help and exit quietly.
    ///
    /// # Errors
    /// Returns a [`CliError`] for malformed or unrecognised options.
    pub fn parse_from<I, T>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut iter = args.into_iter().map(Into::into);
        let mut source = None;
        let mut target = None;
        let mut output = None;
        let mut help = false;
        let mut log_settings = LogSettings::default();

        while let Some(arg) = iter.next() {
            let Some(option) = split_option(&arg) else {
                return Err(CliError::new(format!("unexpected argument '{arg}'")));
            };
            match option.name {
                "in1" => source = Some(PathBuf::from(required_value(&option, &mut iter)?)),
                "in2" => target = Some(PathBuf::from(required_value(&option, &mut iter)?)),
                "out" => output = Some(PathBuf::from(required_value(&option, &mut iter)?)),
                "help" | "h" | "?" => {
                    reject_value(&option)?;
                    help = true;
                }
                "log-format" => {
                    let value = required_value(&option, &mut iter)?;
                    log_settings.format = Some(value.parse::<LogFormat>()?);
                }
                "log-level" => {
                    let value = required_value(&option, &mut iter)?;
                    log_settings.level = Some(value.parse::<LogLevel>()?);
                }
                _ => {
                    return Err(CliError::new(format!("unrecognized option '{}'", option.flag)));
                }
            }
        }

        let command = if help {
            Command::Usage { reason: None }
        } else {
            match (source, target, output) {
                (Some(source), Some(target), Some(output)) => Command::Generate(ForwarderConfig {
                    source,
                    target,
                    output,
                }),
                (source, target, output) => {
                    let missing = [
                        ("--in1", source.is_none()),
                        ("--in2", target.is_none()),
                        ("--out", output.is_none()),
                    ]
                    .into_iter()
                    .filter_map(|(flag, absent)| absent.then_some(flag))
                    .collect::<Vec<_>>();
                    Command::Usage {
                        reason: Some(format!("missing required option {}", missing.join(", "))),
                    }
                }
            }
        };

        Ok(Cli {
            command,
            log_options: log_settings.merged_with_env(),
        })
    }

    /// Return formatted usage text.
    #[must_use]
    pub fn usage() -> String {
        help::render_usage()
    }
}
