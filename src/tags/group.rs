//! Node groups
//!
//! All rows describing one tag or UDT share the identity prefix of their id.
//! The lexicographically first row of a group is its root; the rest are
//! member rows describing the root's nested configuration.
//!
//! Groups live in a [`GroupSet`] arena and are addressed by [`GroupId`].
//!
//! @module tags/group

use std::collections::{BTreeMap, HashMap};
use std::ops::{Index, IndexMut};

use super::node::{identity_prefix, Node};

/// Index of a group in its [`GroupSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub usize);

/// The rows sharing one identity prefix
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGroup {
    pub prefix: String,
    pub root: Node,
    /// Member rows sorted by id, consumed when the group is resolved
    pub members: Vec<Node>,
}

impl NodeGroup {
    /// Build a group from its rows; `None` for an empty row set
    pub fn new(prefix: impl Into<String>, mut nodes: Vec<Node>) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        let root = nodes.remove(0);
        Some(Self {
            prefix: prefix.into(),
            root,
            members: nodes,
        })
    }

    /// Number of rows in the group
    pub fn row_count(&self) -> usize {
        1 + self.members.len()
    }
}

/// Arena of one provider's groups, ordered by prefix
#[derive(Debug, Default)]
pub struct GroupSet {
    groups: Vec<NodeGroup>,
    by_prefix: HashMap<String, GroupId>,
    by_root_id: HashMap<String, GroupId>,
}

impl GroupSet {
    /// Partition nodes into groups by identity prefix
    pub fn build(nodes: Vec<Node>) -> Self {
        let mut partitions: BTreeMap<String, Vec<Node>> = BTreeMap::new();
        for node in nodes {
            partitions
                .entry(identity_prefix(&node.id).to_string())
                .or_default()
                .push(node);
        }

        partitions
            .into_iter()
            .filter_map(|(prefix, nodes)| NodeGroup::new(prefix, nodes))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group ids in prefix order
    pub fn ids(&self) -> impl Iterator<Item = GroupId> {
        (0..self.groups.len()).map(GroupId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &NodeGroup)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(idx, group)| (GroupId(idx), group))
    }

    /// Group whose identity prefix is `prefix`
    pub fn by_prefix(&self, prefix: &str) -> Option<GroupId> {
        self.by_prefix.get(prefix).copied()
    }

    /// Group whose root row has id `id`
    pub fn by_root_id(&self, id: &str) -> Option<GroupId> {
        self.by_root_id.get(id).copied()
    }

    /// Total rows across all groups
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(NodeGroup::row_count).sum()
    }

    pub fn into_groups(self) -> Vec<NodeGroup> {
        self.groups
    }
}

impl FromIterator<NodeGroup> for GroupSet {
    fn from_iter<I: IntoIterator<Item = NodeGroup>>(iter: I) -> Self {
        let mut set = GroupSet::default();
        for group in iter {
            let id = GroupId(set.groups.len());
            set.by_prefix.insert(group.prefix.clone(), id);
            set.by_root_id.insert(group.root.id.clone(), id);
            set.groups.push(group);
        }
        set
    }
}

impl Index<GroupId> for GroupSet {
    type Output = NodeGroup;

    fn index(&self, id: GroupId) -> &NodeGroup {
        &self.groups[id.0]
    }
}

impl IndexMut<GroupId> for GroupSet {
    fn index_mut(&mut self, id: GroupId) -> &mut NodeGroup {
        &mut self.groups[id.0]
    }
}

// =============================================================================
// TESTS
// =============================================================================
