//! Intra-group hierarchy
//!
//! Rebuilds the parent/child structure of one group by attaching each member
//! row under the node whose id equals the member's folder id. The root may
//! already carry structure materialized from a UDT definition; a member whose
//! id matches one of those nodes is an override and is merged onto it.
//!
//! @module tags/hierarchy

use std::collections::HashSet;

use tracing::{trace, warn};

use super::node::Node;
use crate::core::error::Result;

/// Attach `members` to the tree under `root`.
///
/// Members are attached in repeated passes so row order never matters.
/// `on_attach` runs on every newly attached member before it is placed, which
/// lets the resolver expand nested UDT instances as they appear. Members
/// whose parent can't be found are returned as orphans, nested under one
/// another where their folder ids allow.
pub fn attach_members<F>(
    root: &mut Node,
    members: Vec<Node>,
    mut on_attach: F,
) -> Result<Vec<Node>>
where
    F: FnMut(Node) -> Result<Node>,
{
    let mut pending = members;

    loop {
        let before = pending.len();
        let mut deferred = Vec::new();

        for member in pending {
            if let Some(existing) = root.find_mut(&member.id) {
                override_node(existing, member);
                continue;
            }

            let parent = member
                .folder_id
                .as_deref()
                .and_then(|folder_id| root.find_mut(folder_id));

            match parent {
                Some(parent) => {
                    trace!(id = %member.id, parent = %parent.id, "Attaching member");
                    let member = on_attach(member)?;
                    parent.config.tags.push(member);
                }
                None => deferred.push(member),
            }
        }

        pending = deferred;
        if pending.is_empty() || pending.len() == before {
            break;
        }
    }

    for orphan in &pending {
        warn!(
            id = %orphan.id,
            folder = ?orphan.folder_id,
            group = %root.id,
            "Member row has no parent in its group"
        );
    }

    Ok(nest_orphans(pending))
}

/// Merge a member row onto the node it overrides.
///
/// Properties set on the member win; everything else, children included,
/// comes from the existing node.
fn override_node(existing: &mut Node, mut member: Node) {
    if !existing.inferred {
        warn!(id = %member.id, "Duplicate row id in group, merging");
    }
    member.config.inherit_from(&existing.config);
    member.config.tags = std::mem::take(&mut existing.config.tags);
    member.inferred = false;
    *existing = member;
}

/// Nest orphans whose folder id names another orphan under it
fn nest_orphans(orphans: Vec<Node>) -> Vec<Node> {
    let ids: HashSet<String> = orphans.iter().map(|node| node.id.clone()).collect();
    let (mut forest, mut rest): (Vec<Node>, Vec<Node>) = orphans.into_iter().partition(|node| {
        node.folder_id
            .as_ref()
            .map_or(true, |folder_id| !ids.contains(folder_id))
    });

    loop {
        let before = rest.len();
        let mut deferred = Vec::new();

        for node in rest {
            let parent = node.folder_id.as_deref().and_then(|folder_id| {
                forest
                    .iter_mut()
                    .find_map(|tree| tree.find_mut(folder_id))
            });
            match parent {
                Some(parent) => parent.config.tags.push(node),
                None => deferred.push(node),
            }
        }

        rest = deferred;
        if rest.is_empty() || rest.len() == before {
            break;
        }
    }

    // whatever is left only points at itself through a folder cycle
    forest.extend(rest);
    forest
}

// =============================================================================
// TESTS
// =============================================================================
