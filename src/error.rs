use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::cli::CliError;
use crate::metadata::MetadataError;

/// Unified error type for a forwarding run.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Cli(CliError),
    Metadata(MetadataError),
    /// The generated file could not be written; any previous file is intact.
    Output {
        path: PathBuf,
        source: io::Error,
    },
}

/// Convenience result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {err}"),
            Error::Cli(err) => write!(f, "{err}"),
            Error::Metadata(err) => write!(f, "metadata error: {err}"),
            Error::Output { path, source } => {
                write!(f, "failed to write '{}': {source}", path.display())
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) | Error::Output { source: err, .. } => Some(err),
            Error::Cli(err) => Some(err),
            Error::Metadata(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<CliError> for Error {
    fn from(error: CliError) -> Self {
        Error::Cli(error)
    }
}

impl From<MetadataError> for Error {
    fn from(error: MetadataError) -> Self {
        Error::Metadata(error)
    }
}
