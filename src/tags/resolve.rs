//! UDT inheritance resolution
//!
//! Resolving a group turns its root and member rows into one tree:
//!
//! 1. If the root names a definition (`typeId`), that definition's group is
//!    resolved first. Its root properties fill the unset properties of this
//!    root, and its children are deep-copied in with the definition's identity
//!    prefix replaced by this group's.
//! 2. Member rows are attached on top ([`attach_members`]). A member that
//!    matches an inherited node is an override; a member that is itself a
//!    UDT instance is expanded from its own definition as it is attached, so
//!    definitions are complete before anything uses them as a template.
//!
//! Resolution recurses on demand and is memoized per group outside the nodes,
//! so the order groups are visited in never matters. A group met again while
//! it is still being resolved is cyclic inheritance and fails the provider.
//!
//! @module tags/resolve

use tracing::{debug, warn};

use super::definitions::DefinitionIndex;
use super::group::{GroupId, GroupSet};
use super::hierarchy::attach_members;
use super::node::{replace_prefix, Node};
use crate::core::error::{Error, Result};

/// Resolution progress of one group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    Pending,
    InProgress,
    Resolved,
}

/// Resolves the groups of one provider in place
pub struct InheritanceResolver<'a> {
    groups: &'a mut GroupSet,
    definitions: &'a DefinitionIndex,
    states: Vec<ResolveState>,
    /// Groups currently being resolved, outermost first
    chain: Vec<GroupId>,
    orphans: Vec<Node>,
}

impl<'a> InheritanceResolver<'a> {
    pub fn new(groups: &'a mut GroupSet, definitions: &'a DefinitionIndex) -> Self {
        let states = vec![ResolveState::Pending; groups.len()];
        Self {
            groups,
            definitions,
            states,
            chain: Vec::new(),
            orphans: Vec::new(),
        }
    }

    /// Resolve every group in prefix order
    pub fn resolve_all(&mut self) -> Result<()> {
        for id in self.groups.ids().collect::<Vec<_>>() {
            self.resolve(id)?;
        }
        Ok(())
    }

    pub fn state(&self, id: GroupId) -> ResolveState {
        self.states[id.0]
    }

    /// Resolve one group, and whatever it inherits from, at most once.
    ///
    /// After an error the group set is left partially resolved and should be
    /// discarded.
    pub fn resolve(&mut self, id: GroupId) -> Result<()> {
        match self.states[id.0] {
            ResolveState::Resolved => return Ok(()),
            ResolveState::InProgress => return Err(self.cycle_error(id)),
            ResolveState::Pending => {}
        }

        self.states[id.0] = ResolveState::InProgress;
        self.chain.push(id);

        let group = &mut self.groups[id];
        let prefix = group.prefix.clone();
        let placeholder =
            Node::synthetic(prefix.clone(), group.root.provider_id, Default::default());
        let root = std::mem::replace(&mut group.root, placeholder);
        let members = std::mem::take(&mut group.members);
        let member_count = members.len();

        let mut root = self.materialize(root, &prefix)?;
        let orphans = attach_members(&mut root, members, |member| self.expand_nested(member))?;

        debug!(
            group = %prefix,
            name = root.display_name(),
            members = member_count,
            nodes = root.subtree_len(),
            orphans = orphans.len(),
            "Resolved group"
        );

        self.orphans.extend(orphans);
        self.groups[id].root = root;
        self.states[id.0] = ResolveState::Resolved;
        self.chain.pop();
        Ok(())
    }

    /// Member rows that couldn't be attached inside their groups
    pub fn into_orphans(self) -> Vec<Node> {
        self.orphans
    }

    /// Expand a member that is itself a UDT instance, using its own id as
    /// the identity its inherited children are re-keyed under.
    fn expand_nested(&mut self, member: Node) -> Result<Node> {
        if !member.config.is_udt_instance() {
            return Ok(member);
        }
        let identity = member.id.clone();
        self.materialize(member, &identity)
    }

    /// Apply the definition named by `node`'s type id, if any
    fn materialize(&mut self, mut node: Node, identity: &str) -> Result<Node> {
        let Some(type_id) = node.config.type_id.as_deref() else {
            return Ok(node);
        };

        let definitions = self.definitions;
        let Some(ancestor_prefix) = definitions.lookup(type_id) else {
            warn!(
                id = %node.id,
                name = node.display_name(),
                type_id,
                "UDT definition not found, nothing inherited"
            );
            return Ok(node);
        };

        let ancestor = self
            .groups
            .by_prefix(ancestor_prefix)
            .ok_or_else(|| Error::MissingAncestorGroup {
                type_id: type_id.to_string(),
                prefix: ancestor_prefix.to_string(),
            })?;

        self.resolve(ancestor)?;

        let template = &self.groups[ancestor].root;
        node.config.inherit_from(&template.config);
        merge_children(&mut node, template.children(), ancestor_prefix, identity);
        Ok(node)
    }

    fn cycle_error(&self, id: GroupId) -> Error {
        let start = self.chain.iter().position(|&g| g == id).unwrap_or(0);
        let chain = self.chain[start..]
            .iter()
            .chain(std::iter::once(&id))
            .map(|&g| self.groups[g].prefix.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        Error::CyclicInheritance { chain }
    }
}

/// Merge a definition's children into `node`, re-keying ids from `from` to
/// `to`. Children `node` already has are merged property by property and
/// recursively; the rest are copied in.
fn merge_children(node: &mut Node, template_children: &[Node], from: &str, to: &str) {
    for template in template_children {
        let id = replace_prefix(&template.id, from, to);
        match node.config.tags.iter_mut().find(|child| child.id == id) {
            Some(existing) => {
                existing.config.inherit_from(&template.config);
                merge_children(existing, template.children(), from, to);
            }
            None => node
                .config
                .tags
                .push(template.materialized_copy(from, to)),
        }
    }
}

/// Resolve every group of a provider, returning member rows that had no
/// parent inside their group
pub fn resolve_groups(groups: &mut GroupSet, definitions: &DefinitionIndex) -> Result<Vec<Node>> {
    let mut resolver = InheritanceResolver::new(groups, definitions);
    resolver.resolve_all()?;
    Ok(resolver.into_orphans())
}

// =============================================================================
// TESTS
// =============================================================================
