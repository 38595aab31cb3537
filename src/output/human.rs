//! Human-readable output formatting

use std::collections::BTreeMap;

use super::StatisticsReport;
use crate::tags::{Node, ProviderStatistics, TagProviderRecord};

/// Format statistics for human consumption
pub fn format_statistics(report: &StatisticsReport<'_>) -> String {
    let mut output = String::new();

    if report.providers.is_empty() && report.failed.is_empty() {
        output.push_str("No tag providers found.\n");
        return output;
    }

    for provider in &report.providers {
        output.push_str(&format!("{}\n", provider.name));
        write_statistics(&mut output, provider.statistics);
        if provider.dropped_rows > 0 {
            output.push_str(&format!("  Unreadable Rows: {}\n", provider.dropped_rows));
        }
        output.push('\n');
    }

    if let Some(totals) = report.totals {
        output.push_str("All Providers\n");
        write_statistics(&mut output, totals);
        output.push('\n');
    }

    for name in report.failed {
        output.push_str(&format!("{}: failed to resolve (see log)\n", name));
    }

    output
}

fn write_statistics(output: &mut String, stats: &ProviderStatistics) {
    output.push_str(&format!("  Atomic Tags: {}\n", stats.total_atomic_tags));
    write_histogram(output, "By Value Source", &stats.value_sources);
    write_histogram(output, "By Data Type", &stats.data_types);
    output.push_str(&format!("  Folders: {}\n", stats.total_folders));
    output.push_str(&format!("  UDT Instances: {}\n", stats.total_udt_instances));
    output.push_str(&format!("  UDT Definitions: {}\n", stats.total_udt_definitions));
    output.push_str(&format!(
        "  Tags with History Enabled: {}\n",
        stats.total_tags_with_history
    ));
    output.push_str(&format!("  Read-only Tags: {}\n", stats.total_read_only_tags));
    output.push_str(&format!(
        "  Scripts: {} enabled on {} tags\n",
        stats.total_enabled_scripts, stats.total_tags_with_enabled_scripts
    ));
    output.push_str(&format!(
        "  Alarms: {} enabled on {} tags\n",
        stats.total_alarms, stats.total_tags_with_alarms
    ));
    output.push_str(&format!("  Orphaned Tags: {}\n", stats.total_orphaned_tags()));
}

fn write_histogram(output: &mut String, title: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    output.push_str(&format!("  - {}\n", title));
    for (key, count) in counts {
        output.push_str(&format!("  |- {}: {}\n", key, count));
    }
}

/// Format the provider list as a table
pub fn format_providers(providers: &[TagProviderRecord]) -> String {
    if providers.is_empty() {
        return "No tag providers found.\n".to_string();
    }

    let width = providers
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:<width$}  {:<8}  {:<10}  DESCRIPTION\n",
        "ID", "NAME", "ENABLED", "TYPE"
    ));
    for provider in providers {
        output.push_str(&format!(
            "{:>4}  {:<width$}  {:<8}  {:<10}  {}\n",
            provider.id,
            provider.name,
            if provider.enabled { "yes" } else { "no" },
            provider.type_id,
            provider.description.as_deref().unwrap_or("")
        ));
    }
    output
}

/// Tree rendering options
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeOptions {
    /// Levels below the root to print; `None` prints everything
    pub max_depth: Option<usize>,
}

/// Render a node tree; inferred nodes are marked with `*`
pub fn format_tree(root: &Node, options: TreeOptions) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", label(root, options.max_depth == Some(0))));
    write_children(&mut output, root, "", 1, options);
    output
}

fn write_children(
    output: &mut String,
    node: &Node,
    indent: &str,
    depth: usize,
    options: TreeOptions,
) {
    if options.max_depth.is_some_and(|max| depth > max) {
        return;
    }
    let children = node.children();
    for (idx, child) in children.iter().enumerate() {
        let last = idx + 1 == children.len();
        let (branch, next) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        let truncated = options.max_depth == Some(depth);
        output.push_str(&format!("{}{}{}\n", indent, branch, label(child, truncated)));
        write_children(output, child, &format!("{}{}", indent, next), depth + 1, options);
    }
}

fn label(node: &Node, truncated: bool) -> String {
    let mut label = node.display_name().to_string();
    if label.is_empty() {
        label = node.id.clone();
    }
    if node.inferred {
        label.push('*');
    }
    if let Some(tag_type) = node.tag_type() {
        label.push_str(&format!(" [{}]", tag_type));
    }
    if truncated && !node.children().is_empty() {
        label.push_str(&format!(" (+{})", node.subtree_len() - 1));
    }
    label
}
