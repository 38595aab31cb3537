//! JSON output formatting

use serde_json::{json, Value};

use super::StatisticsReport;
use crate::tags::{ProviderStatistics, TagProviderRecord};

/// Statistics with the derived orphan total added
fn statistics_value(stats: &ProviderStatistics) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(stats)?;
    if let Value::Object(map) = &mut value {
        map.insert(
            "totalOrphanedTags".to_string(),
            json!(stats.total_orphaned_tags()),
        );
    }
    Ok(value)
}

/// Format statistics as JSON
pub fn format_statistics(report: &StatisticsReport<'_>) -> String {
    statistics_document(report)
        .map(|out| to_pretty(&out))
        .unwrap_or_else(|e| error_json(&e))
}

fn statistics_document(report: &StatisticsReport<'_>) -> serde_json::Result<Value> {
    let providers = report
        .providers
        .iter()
        .map(|provider| -> serde_json::Result<Value> {
            Ok(json!({
                "name": provider.name,
                "droppedRows": provider.dropped_rows,
                "statistics": statistics_value(provider.statistics)?,
            }))
        })
        .collect::<serde_json::Result<Vec<_>>>()?;

    let mut out = json!({
        "providers": providers,
        "failed": report.failed,
    });
    if let Some(totals) = report.totals {
        out["totals"] = statistics_value(totals)?;
    }
    Ok(out)
}

/// Format the provider list as JSON
pub fn format_providers(providers: &[TagProviderRecord]) -> String {
    to_pretty(&providers)
}

fn to_pretty<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| error_json(&e))
}

fn error_json(err: &serde_json::Error) -> String {
    json!({ "error": format!("Failed to serialize output: {}", err) }).to_string()
}
