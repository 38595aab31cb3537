//! Tag provider resolution
//!
//! Runs the whole pipeline for one provider (load rows, group, index
//! definitions, resolve inheritance, assemble) and fans providers out over
//! rayon when resolving a whole backup.
//!
//! @module tags/provider

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info};

use super::assemble::assemble;
use super::config::{TagConfig, TagType};
use super::definitions::DefinitionIndex;
use super::group::GroupSet;
use super::loader::{load_nodes, TagRow};
use super::node::{Node, TYPES_FOLDER_ID};
use super::resolve::resolve_groups;
use super::stats::ProviderStatistics;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::source::RowSource;

/// A tag provider as recorded in the gateway's settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagProviderRecord {
    pub id: i32,
    pub name: String,
    pub uuid: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub type_id: String,
    pub allow_back_fill: bool,
}

impl TagProviderRecord {
    /// The synthesized node every provider tree hangs from
    pub fn root_node(&self) -> Node {
        Node::synthetic(
            self.uuid.clone(),
            self.id,
            TagConfig {
                name: Some(self.name.clone()),
                tag_type: Some(TagType::Provider),
                ..TagConfig::default()
            },
        )
    }
}

/// One provider's fully resolved tag tree
#[derive(Debug)]
pub struct ResolvedProvider {
    pub record: TagProviderRecord,
    /// Provider node; its first child is the `_types_` folder
    pub root: Node,
    pub statistics: ProviderStatistics,
    /// Rows skipped because their configuration was unusable
    pub dropped_rows: usize,
}

impl ResolvedProvider {
    /// The type library
    pub fn types_folder(&self) -> Option<&Node> {
        self.root
            .children()
            .first()
            .filter(|node| node.id == TYPES_FOLDER_ID)
    }

    /// Top-level tags outside the type library
    pub fn tags(&self) -> &[Node] {
        match self.types_folder() {
            Some(_) => &self.root.children()[1..],
            None => self.root.children(),
        }
    }
}

/// Resolve one provider from its tag rows.
///
/// Fails only on cyclic inheritance or an inconsistent definition index;
/// every other data defect is logged and tolerated.
pub fn resolve_provider(
    record: TagProviderRecord,
    rows: Vec<TagRow>,
    config: &Config,
) -> Result<ResolvedProvider> {
    let start = Instant::now();
    let row_count = rows.len();

    let loaded = load_nodes(rows);
    let mut groups = GroupSet::build(loaded.nodes);
    let group_count = groups.len();
    let definitions = DefinitionIndex::build(&groups);
    let member_orphans = resolve_groups(&mut groups, &definitions)?;
    let tree = assemble(
        record.root_node(),
        groups,
        member_orphans,
        &config.statistics,
    );

    info!(
        provider = %record.name,
        rows = row_count,
        dropped = loaded.dropped,
        groups = group_count,
        definitions = definitions.len(),
        orphans = tree.statistics.total_orphaned_tags(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Resolved provider"
    );

    Ok(ResolvedProvider {
        record,
        root: tree.root,
        statistics: tree.statistics,
        dropped_rows: loaded.dropped,
    })
}

/// Load and resolve one provider
pub fn load_provider<S>(
    source: &S,
    record: TagProviderRecord,
    config: &Config,
) -> Result<ResolvedProvider>
where
    S: RowSource + ?Sized,
{
    let rows = source.tag_rows(record.id)?;
    resolve_provider(record, rows, config)
}

/// Resolve the provider called `name` (case-insensitive)
pub fn resolve_named<S>(source: &S, name: &str, config: &Config) -> Result<ResolvedProvider>
where
    S: RowSource + ?Sized,
{
    let record = source
        .providers()?
        .into_iter()
        .find(|record| record.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::ProviderNotFound {
            name: name.to_string(),
        })?;
    load_provider(source, record, config)
}

/// Every provider of a source plus the combined statistics
#[derive(Debug, Default)]
pub struct ResolvedBackup {
    pub providers: Vec<ResolvedProvider>,
    /// Names of providers that failed to resolve
    pub failed: Vec<String>,
    pub totals: ProviderStatistics,
}

/// Resolve every provider of `source`.
///
/// Providers resolve independently; one failing is logged and left out of
/// the result without affecting the others.
pub fn resolve_all<S>(source: &S, config: &Config) -> Result<ResolvedBackup>
where
    S: RowSource + ?Sized,
{
    let records = source.providers()?;
    let resolve_one = |record: TagProviderRecord| {
        let name = record.name.clone();
        load_provider(source, record, config).map_err(|err| (name, err))
    };

    let results: Vec<_> = if config.resolution.parallel {
        if config.resolution.threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(config.resolution.threads)
                .build()
                .map_err(|e| Error::ConfigError {
                    message: format!("Failed to build resolution thread pool: {}", e),
                })?
                .install(|| records.into_par_iter().map(resolve_one).collect())
        } else {
            records.into_par_iter().map(resolve_one).collect()
        }
    } else {
        records.into_iter().map(resolve_one).collect()
    };

    // Merge sequentially, in provider order
    let mut backup = ResolvedBackup::default();
    for result in results {
        match result {
            Ok(provider) => {
                backup.totals.merge(provider.statistics.clone());
                backup.providers.push(provider);
            }
            Err((name, err)) => {
                let cause = if err.is_provider_fatal() {
                    "tag data"
                } else {
                    "source"
                };
                error!(provider = %name, cause, error = %err, "Failed to resolve provider");
                backup.failed.push(name);
            }
        }
    }

    Ok(backup)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn record(id: i32, name: &str) -> TagProviderRecord {
        TagProviderRecord {
            id,
            name: name.to_string(),
            uuid: format!("{:08}-provider", id),
            description: None,
            enabled: true,
            type_id: "STANDARD".to_string(),
            allow_back_fill: false,
        }
    }

    fn tag(provider_id: i32, id: &str, folder: Option<&str>, config: &str) -> TagRow {
        TagRow {
            id: id.to_string(),
            provider_id,
            folder_id: folder.map(str::to_string),
            config: Some(config.to_string()),
            rank: 0,
            name: None,
        }
    }

    fn source() -> MemorySource {
        let mut source = MemorySource::default();
        source.add_provider(record(1, "default"));
        source.add_provider(record(2, "Broken"));
        source.add_rows(vec![
            tag(1, "area", None, r#"{"name": "Area", "tagType": "Folder"}"#),
            tag(1, "level", Some("area"), r#"{"name": "Level", "tagType": "AtomicTag"}"#),
            tag(2, "a", Some("_types_"), r#"{"name": "A", "tagType": "UdtType", "typeId": "B"}"#),
            tag(2, "b", Some("_types_"), r#"{"name": "B", "tagType": "UdtType", "typeId": "A"}"#),
            tag(2, "c", None, r#"{"name": "C", "tagType": "AtomicTag"}"#),
        ]);
        source
    }

    #[test]
    fn test_root_node_carries_provider_identity() {
        let node = record(3, "edge").root_node();
        assert_eq!(node.id, "00000003-provider");
        assert_eq!(node.provider_id, 3);
        assert_eq!(node.display_name(), "edge");
        assert_eq!(node.tag_type(), Some(&TagType::Provider));
    }

    #[test]
    fn test_resolved_provider_layout() {
        let provider = resolve_named(&source(), "DEFAULT", &Config::default()).unwrap();

        assert_eq!(provider.record.id, 1);
        assert!(provider.types_folder().is_some());
        let tops: Vec<_> = provider.tags().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(tops, vec!["area"]);
        assert_eq!(provider.statistics.total_atomic_tags, 1);
        assert_eq!(provider.dropped_rows, 0);
    }

    #[test]
    fn test_unknown_provider() {
        let err = resolve_named(&source(), "nope", &Config::default()).unwrap_err();
        assert!(matches!(err, Error::ProviderNotFound { .. }));
    }

    #[test]
    fn test_failed_provider_is_left_out() {
        for parallel in [true, false] {
            let mut config = Config::default();
            config.resolution.parallel = parallel;
            config.resolution.threads = 2;

            let backup = resolve_all(&source(), &config).unwrap();

            assert_eq!(backup.providers.len(), 1);
            assert_eq!(backup.providers[0].record.name, "default");
            assert_eq!(backup.failed, vec!["Broken".to_string()]);
            assert_eq!(backup.totals, backup.providers[0].statistics);
        }
    }

    #[test]
    fn test_totals_merge_all_providers() {
        let mut source = source();
        source.add_provider(record(3, "edge"));
        source.add_rows(vec![tag(3, "x", None, r#"{"tagType": "AtomicTag", "dataType": "Float4"}"#)]);

        let backup = resolve_all(&source, &Config::default()).unwrap();

        assert_eq!(backup.providers.len(), 2);
        assert_eq!(backup.totals.total_atomic_tags, 2);
        assert_eq!(backup.totals.data_types.get("Float4"), Some(&1));
        assert_eq!(backup.totals.data_types.get("Int4"), Some(&1));
    }
}
