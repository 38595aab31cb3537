//! Row loading
//!
//! Turns raw tag table rows into typed nodes. Backups in the wild carry
//! partially corrupt rows; any row without an id, or whose configuration is
//! missing, is not a JSON object, or doesn't fit the schema is dropped and
//! counted.
//!
//! @module tags/loader

use serde_json::Value;
use tracing::debug;

use super::config::TagConfig;
use super::node::Node;

/// One row of the tag configuration table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRow {
    pub id: String,
    pub provider_id: i32,
    pub folder_id: Option<String>,
    /// Raw JSON configuration
    pub config: Option<String>,
    pub rank: i32,
    pub name: Option<String>,
}

/// Nodes produced from one provider's rows
#[derive(Debug, Default)]
pub struct LoadedNodes {
    pub nodes: Vec<Node>,
    /// Rows skipped because their configuration was unusable
    pub dropped: usize,
}

/// Convert rows to nodes, preserving row order
pub fn load_nodes(rows: Vec<TagRow>) -> LoadedNodes {
    let mut loaded = LoadedNodes {
        nodes: Vec::with_capacity(rows.len()),
        dropped: 0,
    };

    for row in rows {
        let parsed = if row.id.is_empty() {
            Err("no id".to_string())
        } else {
            parse_config(row.config.as_deref())
        };
        match parsed {
            Ok(config) => loaded.nodes.push(Node {
                id: row.id,
                provider_id: row.provider_id,
                folder_id: row.folder_id,
                config,
                rank: row.rank,
                name: row.name,
                inferred: false,
            }),
            Err(reason) => {
                debug!(
                    id = %row.id,
                    provider = row.provider_id,
                    reason = %reason,
                    "Dropping tag row"
                );
                loaded.dropped += 1;
            }
        }
    }

    loaded
}

/// Parse one row's configuration
fn parse_config(raw: Option<&str>) -> Result<TagConfig, String> {
    let raw = raw.ok_or_else(|| "no configuration".to_string())?;
    let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let Value::Object(mut map) = value else {
        return Err("configuration is not a JSON object".to_string());
    };

    // Children are rebuilt from rows, never taken from a row's own JSON
    map.remove("tags");

    serde_json::from_value(Value::Object(map)).map_err(|e| e.to_string())
}

// =============================================================================
// TESTS
// =============================================================================
