use std::io::{self, Write};
use std::time::Instant;

use crate::cli::{Cli, CliError, Command};
use crate::error::{Error, Result};
use crate::metadata::{FileLoader, MetadataLoader};

mod generate;
mod logging;
mod reporting;

/// Execute a parsed CLI invocation against the file system. Logging is
/// configured here so the binary entrypoint can stay thin.
///
/// # Errors
/// Returns an error when an assembly cannot be loaded or the output cannot
/// be written.
pub fn run(cli: &Cli) -> Result<()> {
    let log_options = cli.log_options.resolved();
    logging::init_logging(&log_options);
    let mut stdout = io::stdout().lock();
    run_with(&FileLoader, cli, &mut stdout)
}

/// Execute `cli` with the given loader, printing usage to `out`.
///
/// # Errors
/// Returns an error when an assembly cannot be loaded or the output cannot
/// be written. Missing inputs are not errors: usage is printed instead and
/// the output path is left alone.
pub fn run_with<L, W>(loader: &L, cli: &Cli, out: &mut W) -> Result<()>
where
    L: MetadataLoader + ?Sized,
    W: Write,
{
    let log_options = cli.log_options.resolved();
    let start = Instant::now();
    logging::log_run_start(&cli.command, &log_options);
    let result = dispatch_command(loader, &cli.command, out);
    logging::log_run_complete(&cli.command, start.elapsed(), &result);
    result
}

fn dispatch_command<L, W>(loader: &L, command: &Command, out: &mut W) -> Result<()>
where
    L: MetadataLoader + ?Sized,
    W: Write,
{
    match command {
        Command::Usage { reason } => {
            reporting::print_usage_to(reason.as_deref(), out)?;
            Ok(())
        }
        Command::Generate(config) => {
            if let Some(reason) = config.missing_input() {
                tracing::warn!(target: "pipeline", stage = "cli.validate", %reason);
                reporting::print_usage_to(Some(&reason), out)?;
                return Ok(());
            }
            generate::generate(loader, config).map(|_| ())
        }
    }
}

/// Print a fatal error to stderr.
pub fn report_error(err: &Error) {
    reporting::report_error(err);
}

/// Print an argument error and the usage text to stdout.
pub fn report_usage_error(err: &CliError) {
    reporting::report_usage_error(err);
}
