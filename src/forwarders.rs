//! Forwarding plan and directive output.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::canonical::CanonicalTypeName;
use crate::error::{Error, Result};
use crate::inventory::TypeInventory;

const DIRECTIVE_PREFIX: &str = "[assembly: System.Runtime.CompilerServices.TypeForwardedTo(typeof(";
const DIRECTIVE_SUFFIX: &str = "))]";

/// Host text-line terminator used between directives.
pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// A type selected for forwarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingEntry {
    name: CanonicalTypeName,
}

impl ForwardingEntry {
    #[must_use]
    pub fn new(name: CanonicalTypeName) -> Self {
        Self { name }
    }

    #[must_use]
    pub fn name(&self) -> &CanonicalTypeName {
        &self.name
    }

    /// The attribute line for this entry, without a line terminator.
    #[must_use]
    pub fn directive(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ForwardingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DIRECTIVE_PREFIX}{}{DIRECTIVE_SUFFIX}", self.name)
    }
}

/// Names in `target` that `source` does not declare, in `target`'s discovery
/// order. A name that `target` lists more than once is planned once, at its
/// first position.
#[must_use]
pub fn plan(source: &TypeInventory, target: &TypeInventory) -> Vec<ForwardingEntry> {
    let mut planned = HashSet::new();
    target
        .iter()
        .filter(|name| !source.contains(name.as_str()))
        .filter(|name| planned.insert(name.as_str()))
        .map(|name| ForwardingEntry::new(name.clone()))
        .collect()
}

/// Write one directive per line.
///
/// # Errors
/// Propagates any error from `writer`.
pub fn write_directives<W: Write>(entries: &[ForwardingEntry], writer: &mut W) -> io::Result<()> {
    for entry in entries {
        write!(writer, "{entry}{LINE_ENDING}")?;
    }
    writer.flush()
}

/// Replace `path` with the directives for `entries`.
///
/// Output is staged in a temporary file beside `path` and moved into place
/// only once fully written, so a failed run never leaves a partial file. A
/// replaced file keeps its permissions; a new one gets the usual creation
/// mode rather than the private mode of a temporary file.
///
/// # Errors
/// Returns [`Error::Output`] when the destination cannot be written.
pub fn write_output_file(path: &Path, entries: &[ForwardingEntry]) -> Result<()> {
    let output_error = |source: io::Error| Error::Output {
        path: path.to_path_buf(),
        source,
    };
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let staged = staging_file(directory).map_err(output_error)?;
    if let Ok(existing) = fs::metadata(path) {
        staged
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(output_error)?;
    }
    {
        let mut writer = BufWriter::new(staged.as_file());
        write_directives(entries, &mut writer).map_err(output_error)?;
    }
    staged.as_file().sync_all().map_err(output_error)?;
    staged
        .persist(path)
        .map_err(|err| output_error(err.error))?;

    tracing::debug!(
        target: "pipeline",
        stage = "forwarders.write",
        path = %path.display(),
        entries = entries.len()
    );
    Ok(())
}

fn staging_file(directory: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".typeforwarder-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Subject to the process umask, like any plain file creation.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(directory)
}
