//! Providers command implementation

use crate::cli::{OutputFormat, ProvidersArgs};
use crate::core::error::Result;
use crate::output::format_providers;
use crate::source::{RowSource, SqliteSource};

/// Run the providers command
pub fn run(args: ProvidersArgs) -> Result<()> {
    let source = SqliteSource::open(&args.database)?;
    let providers = source.providers()?;

    print!(
        "{}",
        format_providers(&providers, OutputFormat::from_json_flag(args.json))
    );
    Ok(())
}
