use std::io::{self, Write};

use crate::cli::{Cli, CliError};
use crate::error::Error;

pub(super) fn report_error(err: &Error) {
    let mut out = io::stderr();
    if let Err(io_err) = report_error_to(err, &mut out) {
        let _ = writeln!(io::stderr(), "failed to report error: {io_err}");
    }
}

pub(super) fn report_error_to(err: &Error, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "error: {err}")?;
    out.flush()
}

pub(super) fn report_usage_error(err: &CliError) {
    let mut out = io::stdout();
    if let Err(io_err) = print_usage_to(Some(err.message()), &mut out) {
        let _ = writeln!(io::stderr(), "failed to print usage: {io_err}");
    }
}

/// Usage goes to stdout, prefixed by `reason` when the run was not an
/// explicit help request.
pub(super) fn print_usage_to(reason: Option<&str>, out: &mut dyn Write) -> io::Result<()> {
    if let Some(reason) = reason {
        writeln!(out, "typeforwarder: {reason}")?;
    }
    out.write_all(Cli::usage().as_bytes())?;
    out.flush()
}
