//! Provider statistics
//!
//! Counters are filled in while a provider tree is assembled, one call per
//! assembled node. Type library nodes only count as definitions; orphans are
//! carried along but never counted.
//!
//! @module tags/stats

use std::collections::BTreeMap;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::config::TagType;
use super::node::Node;
use crate::core::config::StatisticsConfig;

/// Data type label for atomic tags whose data type is bound to an expression
pub const BOUND_DATA_TYPE: &str = "Bound";

/// Statistics of one provider, or the merged totals of several
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatistics {
    pub total_atomic_tags: usize,
    pub total_folders: usize,
    pub total_udt_instances: usize,
    pub total_udt_definitions: usize,
    pub total_tags_with_alarms: usize,
    pub total_alarms: usize,
    pub total_tags_with_history: usize,
    pub total_tags_with_enabled_scripts: usize,
    pub total_enabled_scripts: usize,
    pub total_read_only_tags: usize,
    pub data_types: BTreeMap<String, usize>,
    pub value_sources: BTreeMap<String, usize>,
    #[serde(serialize_with = "serialize_orphans")]
    pub orphaned_tags: Vec<Node>,
}

impl ProviderStatistics {
    /// Orphans, counting the nodes nested under them
    pub fn total_orphaned_tags(&self) -> usize {
        self.orphaned_tags.iter().map(Node::subtree_len).sum()
    }

    /// Fold another provider's statistics into these
    pub fn merge(&mut self, other: ProviderStatistics) {
        self.total_atomic_tags += other.total_atomic_tags;
        self.total_folders += other.total_folders;
        self.total_udt_instances += other.total_udt_instances;
        self.total_udt_definitions += other.total_udt_definitions;
        self.total_tags_with_alarms += other.total_tags_with_alarms;
        self.total_alarms += other.total_alarms;
        self.total_tags_with_history += other.total_tags_with_history;
        self.total_tags_with_enabled_scripts += other.total_tags_with_enabled_scripts;
        self.total_enabled_scripts += other.total_enabled_scripts;
        self.total_read_only_tags += other.total_read_only_tags;
        merge_counts(&mut self.data_types, other.data_types);
        merge_counts(&mut self.value_sources, other.value_sources);
        self.orphaned_tags.extend(other.orphaned_tags);
    }
}

fn merge_counts(into: &mut BTreeMap<String, usize>, from: BTreeMap<String, usize>) {
    for (key, count) in from {
        *into.entry(key).or_default() += count;
    }
}

/// Orphans serialize as a short summary each, not as whole subtrees
fn serialize_orphans<S: Serializer>(orphans: &[Node], serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Orphan<'a> {
        id: &'a str,
        folder_id: Option<&'a str>,
        name: &'a str,
        nodes: usize,
    }

    let mut seq = serializer.serialize_seq(Some(orphans.len()))?;
    for node in orphans {
        seq.serialize_element(&Orphan {
            id: &node.id,
            folder_id: node.folder_id.as_deref(),
            name: node.display_name(),
            nodes: node.subtree_len(),
        })?;
    }
    seq.end()
}

/// Accumulates [`ProviderStatistics`] node by node
pub struct StatisticsAggregator<'c> {
    config: &'c StatisticsConfig,
    stats: ProviderStatistics,
}

impl<'c> StatisticsAggregator<'c> {
    pub fn new(config: &'c StatisticsConfig) -> Self {
        Self {
            config,
            stats: ProviderStatistics::default(),
        }
    }

    /// Count a node inside the type library
    pub fn record_type_library(&mut self, node: &Node) {
        if node.config.is_udt_definition() {
            self.stats.total_udt_definitions += 1;
        }
    }

    /// Count a node of the live tag tree
    pub fn record(&mut self, node: &Node) {
        let config = &node.config;
        let stats = &mut self.stats;

        match config.tag_type.as_ref() {
            Some(TagType::UdtType) => {
                stats.total_udt_definitions += 1;
                return;
            }
            Some(TagType::AtomicTag) => {
                stats.total_atomic_tags += 1;
                let data_type = data_type_label(config.data_type.as_ref())
                    .unwrap_or_else(|| self.config.default_data_type.clone());
                *stats.data_types.entry(data_type).or_default() += 1;
                let value_source = config
                    .value_source
                    .clone()
                    .unwrap_or_else(|| self.config.default_value_source.clone());
                *stats.value_sources.entry(value_source).or_default() += 1;
            }
            Some(TagType::Folder) => stats.total_folders += 1,
            Some(TagType::UdtInstance) => stats.total_udt_instances += 1,
            _ => {}
        }

        if config.read_only == Some(true) {
            stats.total_read_only_tags += 1;
        }

        if history_enabled(config.history_enabled.as_ref()) {
            stats.total_tags_with_history += 1;
        }

        let alarms = enabled_alarms(config.alarms.as_deref().unwrap_or_default());
        if alarms > 0 {
            stats.total_tags_with_alarms += 1;
            stats.total_alarms += alarms;
        }

        let scripts = config
            .event_scripts
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|script| script.enabled.unwrap_or(true))
            .count();
        if scripts > 0 {
            stats.total_tags_with_enabled_scripts += 1;
            stats.total_enabled_scripts += scripts;
        }
    }

    pub fn add_orphans(&mut self, orphans: impl IntoIterator<Item = Node>) {
        self.stats.orphaned_tags.extend(orphans);
    }

    pub fn finish(self) -> ProviderStatistics {
        self.stats
    }
}

/// Histogram label for a data type; `None` when the default applies
fn data_type_label(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(name) => Some(name.clone()),
        Value::Object(_) => Some(BOUND_DATA_TYPE.to_string()),
        Value::Null | Value::Array(_) => None,
        other => Some(other.to_string()),
    }
}

/// `true`/`false` as a JSON boolean or its exact string spelling
fn strict_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => None,
    }
}

/// A binding or any other value that isn't a boolean counts as enabled
fn history_enabled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(value) => strict_bool(value).unwrap_or(true),
    }
}

/// Named alarms that aren't explicitly disabled.
///
/// A name is any scalar, JSON `null` included; only a missing or structured
/// name leaves the alarm out.
fn enabled_alarms(alarms: &[Value]) -> usize {
    alarms
        .iter()
        .filter_map(Value::as_object)
        .filter(|alarm| {
            alarm
                .get("name")
                .is_some_and(|name| !name.is_object() && !name.is_array())
        })
        .filter(|alarm| {
            alarm
                .get("enabled")
                .and_then(strict_bool)
                .unwrap_or(true)
        })
        .count()
}

// =============================================================================
// TESTS
// =============================================================================
