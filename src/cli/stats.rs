//! Stats command implementation

use crate::cli::{OutputFormat, StatsArgs};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::output::{format_statistics, ProviderReport, StatisticsReport};
use crate::source::SqliteSource;
use crate::tags::{resolve_all, resolve_named};

/// Run the stats command
pub fn run(args: StatsArgs, config: &Config) -> Result<()> {
    let source = SqliteSource::open(&args.database)?;
    let format = OutputFormat::from_json_flag(args.json);

    let output = match args.provider.as_deref() {
        Some(name) => {
            let provider = resolve_named(&source, name, config)?;
            let report = StatisticsReport {
                providers: vec![ProviderReport {
                    name: &provider.record.name,
                    statistics: &provider.statistics,
                    dropped_rows: provider.dropped_rows,
                }],
                failed: &[],
                totals: None,
            };
            format_statistics(&report, format)
        }
        None => {
            let backup = resolve_all(&source, config)?;
            format_statistics(&StatisticsReport::from_backup(&backup), format)
        }
    };

    print!("{}", output);
    Ok(())
}
