//! Tag configuration nodes
//!
//! A `Node` is one row of the provider's tag table, or a node materialized
//! from a UDT definition. Nodes own their children outright, so cloning a
//! subtree always yields an independent copy.
//!
//! @module tags/node

use serde::{Serialize, Serializer};

use super::config::{TagConfig, TagType};

/// Length of the identity prefix shared by all rows of one tag or UDT (a UUID)
pub const IDENTITY_PREFIX_LEN: usize = 36;

/// Folder id of every top-level entry of the type library
pub const TYPES_FOLDER_ID: &str = "_types_";

/// The identity prefix of a row id (the whole id when it is shorter)
pub fn identity_prefix(id: &str) -> &str {
    match id.char_indices().nth(IDENTITY_PREFIX_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// One tag configuration node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub provider_id: i32,
    pub folder_id: Option<String>,
    pub config: TagConfig,
    pub rank: i32,
    pub name: Option<String>,
    /// Materialized from a UDT definition rather than loaded from a row
    pub inferred: bool,
}

impl Node {
    /// A node that doesn't come from a row (provider root, `_types_`, tests)
    pub fn synthetic(id: impl Into<String>, provider_id: i32, config: TagConfig) -> Self {
        let name = config.name.clone();
        Self {
            id: id.into(),
            provider_id,
            folder_id: None,
            config,
            rank: 0,
            name,
            inferred: false,
        }
    }

    /// The `_types_` folder that holds a provider's UDT definitions
    pub fn types_folder(provider_id: i32) -> Self {
        let mut node = Self::synthetic(
            TYPES_FOLDER_ID,
            provider_id,
            TagConfig::folder(TYPES_FOLDER_ID),
        );
        node.rank = 1;
        node
    }

    /// Name shown for this node: the configured name, else the row name
    pub fn display_name(&self) -> &str {
        match self.config.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.name.as_deref().unwrap_or(""),
        }
    }

    pub fn tag_type(&self) -> Option<&TagType> {
        self.config.tag_type.as_ref()
    }

    pub fn children(&self) -> &[Node] {
        &self.config.tags
    }

    /// Find a node by id in this subtree (including this node)
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.config.tags.iter().find_map(|child| child.find(id))
    }

    /// Find a node by id in this subtree (including this node)
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.config
            .tags
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Deep copy of this subtree with `from` replaced by `to` at the start of
    /// every id and folder id, marked as inferred.
    pub fn materialized_copy(&self, from: &str, to: &str) -> Node {
        Node {
            id: replace_prefix(&self.id, from, to),
            provider_id: self.provider_id,
            folder_id: self
                .folder_id
                .as_deref()
                .map(|folder| replace_prefix(folder, from, to)),
            config: TagConfig {
                tags: self
                    .config
                    .tags
                    .iter()
                    .map(|child| child.materialized_copy(from, to))
                    .collect(),
                ..self.config.clone_without_tags()
            },
            rank: self.rank,
            name: self.name.clone(),
            inferred: true,
        }
    }

    /// Number of nodes in this subtree (including this node)
    pub fn subtree_len(&self) -> usize {
        1 + self
            .config
            .tags
            .iter()
            .map(Node::subtree_len)
            .sum::<usize>()
    }

    /// Visit every node in this subtree, parents before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.config.tags {
            child.walk(visit);
        }
    }
}

impl TagConfig {
    /// Clone every property except the child list
    pub(crate) fn clone_without_tags(&self) -> TagConfig {
        let mut shallow = TagConfig::default();
        shallow.inherit_from(self);
        shallow
    }
}

/// Replace `from` at the start of `id` with `to`; ids outside `from` are kept
pub fn replace_prefix(id: &str, from: &str, to: &str) -> String {
    match id.strip_prefix(from) {
        Some(rest) => format!("{}{}", to, rest),
        None => id.to_string(),
    }
}

/// A node serializes as its configuration, children included
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.config.serialize(serializer)
    }
}

// =============================================================================
// TESTS
// =============================================================================
