//! Provider tree assembly
//!
//! Places each resolved group root under the provider root, the `_types_`
//! folder, or the group whose root id equals its folder id. Everything that
//! can't be placed ends up in the orphan list. Statistics are gathered from
//! the finished tree.
//!
//! @module tags/assemble

use tracing::{debug, warn};

use super::group::GroupSet;
use super::node::{Node, TYPES_FOLDER_ID};
use super::stats::{ProviderStatistics, StatisticsAggregator};
use crate::core::config::StatisticsConfig;

/// Where a group root goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Provider,
    Types,
    Group(usize),
    Orphan,
}

/// The assembled provider tree and its statistics
#[derive(Debug)]
pub struct AssembledTree {
    pub root: Node,
    pub statistics: ProviderStatistics,
}

/// Assemble resolved groups under `root`.
///
/// `root` gets the provider's `_types_` folder as its first child, followed
/// by the live top-level groups in prefix order. `member_orphans` are member
/// rows the resolver couldn't place; they are reported alongside groups
/// whose folder can't be found.
pub fn assemble(
    mut root: Node,
    groups: GroupSet,
    member_orphans: Vec<Node>,
    config: &StatisticsConfig,
) -> AssembledTree {
    let placements: Vec<Placement> = groups
        .iter()
        .map(|(id, group)| match group.root.folder_id.as_deref() {
            None => Placement::Provider,
            Some(TYPES_FOLDER_ID) => Placement::Types,
            Some(folder_id) => match groups.by_root_id(folder_id) {
                Some(parent) if parent != id => Placement::Group(parent.0),
                _ => Placement::Orphan,
            },
        })
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); placements.len()];
    for (idx, placement) in placements.iter().enumerate() {
        if let Placement::Group(parent) = *placement {
            children[parent].push(idx);
        }
    }

    let mut slots: Vec<Option<Node>> = groups
        .into_groups()
        .into_iter()
        .map(|group| Some(group.root))
        .collect();

    let mut types = Node::types_folder(root.provider_id);
    let mut orphans = Vec::new();

    for (idx, placement) in placements.iter().enumerate() {
        let target = match placement {
            Placement::Provider => &mut root.config.tags,
            Placement::Types => &mut types.config.tags,
            Placement::Orphan => &mut orphans,
            Placement::Group(_) => continue,
        };
        if let Some(node) = take_subtree(idx, &mut slots, &children) {
            target.push(node);
        }
    }

    for node in &orphans {
        warn!(
            id = %node.id,
            name = node.display_name(),
            folder = ?node.folder_id,
            "Tag has no parent folder"
        );
    }

    // groups left over only reach each other through a folder cycle
    for idx in 0..slots.len() {
        if let Some(node) = take_subtree(idx, &mut slots, &children) {
            warn!(id = %node.id, folder = ?node.folder_id, "Tag folders form a cycle");
            orphans.push(node);
        }
    }

    let mut aggregator = StatisticsAggregator::new(config);
    for definition in types.children() {
        definition.walk(&mut |node| aggregator.record_type_library(node));
    }
    for tag in root.children() {
        tag.walk(&mut |node| aggregator.record(node));
    }

    root.config.tags.insert(0, types);

    debug!(
        provider = %root.id,
        nodes = root.subtree_len(),
        group_orphans = orphans.len(),
        member_orphans = member_orphans.len(),
        "Assembled provider tree"
    );

    aggregator.add_orphans(orphans);
    aggregator.add_orphans(member_orphans);

    AssembledTree {
        root,
        statistics: aggregator.finish(),
    }
}

/// Take a group root out of `slots` with every group nested under it
fn take_subtree(idx: usize, slots: &mut [Option<Node>], children: &[Vec<usize>]) -> Option<Node> {
    let mut node = slots[idx].take()?;
    for &child in &children[idx] {
        if let Some(child) = take_subtree(child, slots, children) {
            node.config.tags.push(child);
        }
    }
    Some(node)
}

// =============================================================================
// TESTS
// =============================================================================
