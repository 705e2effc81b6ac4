//! Nodes of the redundancy lattice.

use std::fmt;

use super::redundancy::LatticeTag;
use super::SourceSet;

/// An antichain of source elements: no element's member-set contains
/// another's.
///
/// Nodes are created and wired to their children by `RedundancyLattice`
/// and are immutable afterwards. Elements and children are stored as ids
/// into the owning lattice's arenas, both in ascending order.
#[derive(Debug, Clone)]
pub struct LatticeNode {
    id: usize,
    lattice: LatticeTag,
    elements: Vec<usize>,
    element_sets: Vec<SourceSet>,
    children: Vec<usize>,
    interaction_order: usize,
}

impl LatticeNode {
    pub(crate) fn new(
        id: usize,
        lattice: LatticeTag,
        elements: Vec<usize>,
        element_sets: Vec<SourceSet>,
        children: Vec<usize>,
    ) -> Self {
        let interaction_order = element_sets.iter().map(|s| s.len()).min().unwrap_or(0);
        Self {
            id,
            lattice,
            elements,
            element_sets,
            children,
            interaction_order,
        }
    }

    /// Stable id, also the index of this node's cache slots.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Ids of the source elements in this node.
    pub fn elements(&self) -> &[usize] {
        &self.elements
    }

    /// Canonical (sorted) member-sets of the elements; the node's lookup key.
    pub fn element_sets(&self) -> &[SourceSet] {
        &self.element_sets
    }

    /// Ids of the nodes directly covered by this one.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Minimum element size within the node.
    pub fn interaction_order(&self) -> usize {
        self.interaction_order
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn lattice_tag(&self) -> LatticeTag {
        self.lattice
    }
}

impl fmt::Display for LatticeNode {
    /// Format as `{0}{1,2}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for set in &self.element_sets {
            write!(f, "{}", set)?;
        }
        Ok(())
    }
}

/// Williams & Beer order on antichains: `alpha ≤ beta` iff every element
/// of `beta` contains some element of `alpha`.
pub fn precedes(alpha: &[SourceSet], beta: &[SourceSet]) -> bool {
    beta.iter()
        .all(|b| alpha.iter().any(|a| a.is_subset_of(*b)))
}
