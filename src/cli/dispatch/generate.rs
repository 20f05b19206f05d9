use std::path::Path;

use crate::cli::ForwarderConfig;
use crate::error::Result;
use crate::forwarders;
use crate::inventory::TypeInventory;
use crate::metadata::MetadataLoader;

/// Counts reported once a run has written its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RunSummary {
    pub(super) source_types: usize,
    pub(super) target_types: usize,
    pub(super) forwarded: usize,
}

/// Both assemblies are loaded before the output is touched, so a load
/// failure leaves any existing output file as it was.
pub(super) fn generate<L>(loader: &L, config: &ForwarderConfig) -> Result<RunSummary>
where
    L: MetadataLoader + ?Sized,
{
    let source = load_inventory(loader, &config.source, "in1")?;
    let target = load_inventory(loader, &config.target, "in2")?;

    let entries = forwarders::plan(&source, &target);
    forwarders::write_output_file(&config.output, &entries)?;

    let summary = RunSummary {
        source_types: source.distinct_len(),
        target_types: target.distinct_len(),
        forwarded: entries.len(),
    };
    tracing::info!(
        target: "pipeline",
        stage = "forwarders.summary",
        out = %config.output.display(),
        source_types = summary.source_types,
        target_types = summary.target_types,
        forwarded = summary.forwarded
    );
    Ok(summary)
}

fn load_inventory<L>(loader: &L, path: &Path, role: &'static str) -> Result<TypeInventory>
where
    L: MetadataLoader + ?Sized,
{
    let assembly = loader.load(path)?;
    let inventory = TypeInventory::extract(&assembly);
    tracing::debug!(
        target: "pipeline",
        stage = "inventory.extract",
        role,
        path = %path.display(),
        public_types = inventory.len()
    );
    Ok(inventory)
}
