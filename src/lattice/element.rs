//! Source elements: non-empty subsets of sources treated as one joint variable.

use std::fmt;

use super::redundancy::LatticeTag;
use super::SourceSet;

/// A non-empty subset of the sources, owned by a `RedundancyLattice`.
///
/// The ascending member list fixes the digit order used when the joint
/// value of the element is computed from a full observation (most
/// significant digit first).
#[derive(Debug, Clone)]
pub struct SourceElement {
    id: usize,
    lattice: LatticeTag,
    sources: SourceSet,
    ordered_sources: Vec<usize>,
}

impl SourceElement {
    pub(crate) fn new(id: usize, lattice: LatticeTag, sources: SourceSet) -> Self {
        Self {
            id,
            lattice,
            sources,
            ordered_sources: sources.members(),
        }
    }

    /// Stable id, also the index of this element's count and cache tables.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn sources(&self) -> SourceSet {
        self.sources
    }

    /// Member source indices in ascending order.
    pub fn members(&self) -> &[usize] {
        &self.ordered_sources
    }

    pub fn size(&self) -> usize {
        self.ordered_sources.len()
    }

    pub(crate) fn lattice_tag(&self) -> LatticeTag {
        self.lattice
    }
}

impl fmt::Display for SourceElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sources)
    }
}
