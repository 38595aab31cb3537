//! Output formatting

pub mod human;
pub mod json;

use crate::cli::OutputFormat;
use crate::tags::{ProviderStatistics, ResolvedBackup, TagProviderRecord};

/// Statistics of one provider as reported
#[derive(Debug, Clone, Copy)]
pub struct ProviderReport<'a> {
    pub name: &'a str,
    pub statistics: &'a ProviderStatistics,
    pub dropped_rows: usize,
}

/// What `stats` prints: some providers, plus totals when there are several
#[derive(Debug, Clone)]
pub struct StatisticsReport<'a> {
    pub providers: Vec<ProviderReport<'a>>,
    pub failed: &'a [String],
    pub totals: Option<&'a ProviderStatistics>,
}

impl<'a> StatisticsReport<'a> {
    pub fn from_backup(backup: &'a ResolvedBackup) -> Self {
        let providers: Vec<_> = backup
            .providers
            .iter()
            .map(|provider| ProviderReport {
                name: &provider.record.name,
                statistics: &provider.statistics,
                dropped_rows: provider.dropped_rows,
            })
            .collect();
        let totals = (providers.len() > 1).then_some(&backup.totals);

        Self {
            providers,
            failed: &backup.failed,
            totals,
        }
    }
}

/// Format provider statistics
pub fn format_statistics(report: &StatisticsReport<'_>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format_statistics(report),
        OutputFormat::Json => json::format_statistics(report),
    }
}

/// Format the provider list
pub fn format_providers(providers: &[TagProviderRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format_providers(providers),
        OutputFormat::Json => json::format_providers(providers),
    }
}
