//! UDT definition index
//!
//! UDT instances name their definition by path (`typeId`), relative to the
//! provider's `_types_` folder and compared case-insensitively. The index is
//! built from the raw groups before any resolution happens, by walking the
//! groups reachable from `_types_` through folder ids.
//!
//! @module tags/definitions

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use super::group::{GroupId, GroupSet};
use super::node::TYPES_FOLDER_ID;

/// Case-insensitive definition path → identity prefix of the definition group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionIndex {
    by_path: BTreeMap<String, String>,
}

impl DefinitionIndex {
    /// Index every UDT definition under the `_types_` folder
    pub fn build(groups: &GroupSet) -> Self {
        let mut children: HashMap<&str, Vec<GroupId>> = HashMap::new();
        for (id, group) in groups.iter() {
            if let Some(folder_id) = group.root.folder_id.as_deref() {
                children.entry(folder_id).or_default().push(id);
            }
        }

        let mut index = Self::default();
        let mut visited = HashSet::new();
        let mut stack: Vec<(GroupId, String)> = children
            .get(TYPES_FOLDER_ID)
            .into_iter()
            .flatten()
            .rev()
            .map(|&id| (id, groups[id].root.display_name().to_string()))
            .collect();

        while let Some((id, path)) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let root = &groups[id].root;

            if root.config.is_udt_definition() {
                index.insert(&path, &groups[id].prefix);
            }

            if let Some(nested) = children.get(root.id.as_str()) {
                for &child in nested.iter().rev() {
                    let child_path = format!("{}/{}", path, groups[child].root.display_name());
                    stack.push((child, child_path));
                }
            }
        }

        debug!(definitions = index.len(), "Indexed UDT definitions");
        index
    }

    /// Register a definition; the first registration of a path wins
    pub fn insert(&mut self, path: &str, prefix: &str) {
        let key = normalize_path(path);
        if let Some(existing) = self.by_path.get(&key) {
            warn!(
                path = %key,
                kept = %existing,
                ignored = %prefix,
                "Duplicate UDT definition path"
            );
            return;
        }
        self.by_path.insert(key, prefix.to_string());
    }

    /// Identity prefix of the definition named by `type_id`
    pub fn lookup(&self, type_id: &str) -> Option<&str> {
        self.by_path
            .get(&normalize_path(type_id))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

/// Lower-cased path without a leading `/` or `_types_/`
fn normalize_path(path: &str) -> String {
    let path = path.trim().trim_start_matches('/');
    let path = path
        .strip_prefix(TYPES_FOLDER_ID)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path);
    path.to_lowercase()
}

// =============================================================================
// TESTS
// =============================================================================
