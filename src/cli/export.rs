//! Export command implementation

use crate::cli::ExportArgs;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::export::export_provider;
use crate::source::SqliteSource;
use crate::tags::resolve_named;

/// Run the export command
pub fn run(args: ExportArgs, config: &Config) -> Result<()> {
    let source = SqliteSource::open(&args.database)?;
    let provider = resolve_named(&source, &args.provider, config)?;
    let include_types = config.export.include_types && !args.no_types;

    export_provider(&provider, &args.output, include_types)?;

    println!(
        "Exported {} ({} tags) to {}",
        provider.record.name,
        provider.root.subtree_len() - 1,
        args.output.display()
    );
    Ok(())
}
