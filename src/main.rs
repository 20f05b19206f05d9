#![deny(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

use std::process::ExitCode;
use typeforwarder::cli::{Cli, dispatch};
use typeforwarder::error::{Error, Result};

fn main() -> ExitCode {
    run_with_args(std::env::args().skip(1))
}

/// Argument errors are benign: usage is shown and the exit stays zero.
fn run_with_args<I, S>(args: I) -> ExitCode
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Cli(err)) => {
            dispatch::report_usage_error(&err);
            ExitCode::SUCCESS
        }
        Err(err) => {
            dispatch::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn try_main<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let cli = Cli::parse_from(args)?;
    dispatch::run(&cli)
}
