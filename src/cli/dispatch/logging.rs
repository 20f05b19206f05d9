use std::time::Duration;

use crate::cli::Command;
use crate::logging::{LogFormat, LogOptions};

/// `RUST_LOG` wins over the configured level when it is set and valid.
pub(super) fn init_logging(options: &LogOptions) {
    use std::io::IsTerminal;
    use std::sync::OnceLock;
    use tracing_subscriber::{EnvFilter, fmt};

    static INITIALISED: OnceLock<()> = OnceLock::new();

    let _ = INITIALISED.get_or_init(|| {
        let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(options.level.as_directive()));
        let builder = fmt::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        let _ = match options.format {
            LogFormat::Json => {
                tracing::subscriber::set_global_default(builder.with_ansi(false).json().finish())
            }
            _ => tracing::subscriber::set_global_default(
                builder.with_ansi(use_ansi).compact().finish(),
            ),
        };
    });
}

pub(super) fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Generate(_) => "generate",
        Command::Usage { .. } => "usage",
    }
}

pub(super) fn log_run_start(command: &Command, options: &LogOptions) {
    match command {
        Command::Generate(config) => tracing::info!(
            target: "pipeline",
            stage = "cli.run.start",
            command = command_name(command),
            log_level = %options.level,
            log_format = %options.format,
            in1 = %config.source.display(),
            in2 = %config.target.display(),
            out = %config.output.display()
        ),
        Command::Usage { .. } => tracing::info!(
            target: "pipeline",
            stage = "cli.run.start",
            command = command_name(command),
            log_level = %options.level,
            log_format = %options.format
        ),
    }
}

pub(super) fn log_run_complete(
    command: &Command,
    elapsed: Duration,
    result: &crate::error::Result<()>,
) {
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    match result {
        Ok(()) => tracing::info!(
            target: "pipeline",
            stage = "cli.run.footer",
            command = command_name(command),
            status = "ok",
            elapsed_ms
        ),
        Err(err) => tracing::error!(
            target: "pipeline",
            stage = "cli.run.footer",
            command = command_name(command),
            status = "error",
            error = %err,
            elapsed_ms
        ),
    }
}
