//! Lattice Module: The Williams & Beer Redundancy Lattice
//!
//! For n sources, a **source element** is a non-empty subset A ⊆ {0..n-1}
//! and a **node** is a non-empty antichain α of source elements (no
//! element contains another). Nodes are ordered by
//!
//!   α ≼ β  ⟺  ∀B ∈ β, ∃A ∈ α : A ⊆ B
//!
//! The top node {0..n-1} carries the joint information of all sources;
//! the bottom node {0}{1}...{n-1} carries what every single source shares.
//! Each node's direct children are the nodes it covers in this order, and
//! its **interaction order** is the size of its smallest element.
//!
//! Elements and nodes live in arenas owned by `RedundancyLattice` and are
//! addressed by stable integer ids.

mod element;
mod node;
mod redundancy;
mod source_set;
mod spec;

pub use element::SourceElement;
pub use node::{precedes, LatticeNode};
pub use redundancy::{RedundancyLattice, MAX_SOURCES};
pub use source_set::SourceSet;
pub use spec::{parse_element_spec, parse_node_spec};
