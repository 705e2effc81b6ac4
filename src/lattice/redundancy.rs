//! Redundancy lattice construction for an arbitrary number of sources.
//!
//! ## Algorithm Overview
//!
//! 1. Enumerate the 2ⁿ−1 non-empty subsets of {0..n-1} as source elements,
//!    ordered by size then lexicographically
//! 2. Enumerate every non-empty antichain of elements by depth-first
//!    extension in element order
//! 3. Compare every pair of antichains under the Williams & Beer order and
//!    record, per node, the bitset of nodes strictly below it
//! 4. Renumber nodes along a linear extension (ascending size of the
//!    strictly-below set), so children always carry smaller ids than their
//!    parents
//! 5. Extract the covering relation: walking a node's strictly-below set
//!    from the highest id down, a node is a direct child unless it lies
//!    below a child already found
//! 6. Bucket nodes by interaction order and publish lookup tables
//!
//! ## Complexity
//!
//! Node counts are the Dedekind numbers minus two (1, 4, 18, 166, 7579 for
//! n = 1..5) and step 3 keeps a dense node × node bitset, quadratic in that
//! count. Five sources need a few megabytes; six sources (7.8 million
//! nodes) would need terabytes, so construction stops at `MAX_SOURCES`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::error::{PidError, Result};

use super::node::precedes;
use super::spec::{canonicalize, parse_element_spec, parse_node_spec};
use super::{LatticeNode, SourceElement, SourceSet};

/// Largest source count the construction can build.
pub const MAX_SOURCES: usize = 5;

static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

/// Identity of one lattice instance, carried by every node and element it
/// creates so that engines can reject foreign handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct LatticeTag(u64);

impl LatticeTag {
    pub(crate) fn next() -> Self {
        Self(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
    }
}

/// Fixed-width bitset over node indices.
#[derive(Debug, Clone)]
struct NodeBits(Vec<u64>);

impl NodeBits {
    fn new(len: usize) -> Self {
        Self(vec![0; len.div_ceil(64)])
    }

    fn set(&mut self, i: usize) {
        self.0[i / 64] |= 1 << (i % 64);
    }

    fn get(&self, i: usize) -> bool {
        (self.0[i / 64] >> (i % 64)) & 1 != 0
    }

    fn union_with(&mut self, other: &NodeBits) {
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a |= *b;
        }
    }

    fn count(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Set indices, highest first.
    fn iter_desc(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().rev().flat_map(|(w, &word)| {
            (0..64).rev().filter(move |b| (word >> b) & 1 != 0).map(move |b| w * 64 + b)
        })
    }
}

/// The redundancy lattice of Williams & Beer for `n` sources.
///
/// Owns every `SourceElement` and `LatticeNode` as arenas indexed by id.
/// Immutable once built and safe to share between threads and between
/// decomposers.
#[derive(Debug)]
pub struct RedundancyLattice {
    tag: LatticeTag,
    num_sources: usize,
    elements: Vec<SourceElement>,
    element_index: HashMap<SourceSet, usize>,
    nodes: Vec<LatticeNode>,
    node_index: HashMap<Vec<SourceSet>, usize>,
    nodes_by_order: Vec<Vec<usize>>,
    top: usize,
    bottom: usize,
}

impl RedundancyLattice {
    /// Build the lattice for `num_sources` sources.
    pub fn new(num_sources: usize) -> Result<Self> {
        if num_sources < 1 || num_sources > MAX_SOURCES {
            return Err(PidError::unsupported_sources(num_sources));
        }
        let tag = LatticeTag::next();

        // 1. Source elements
        let mut sets: Vec<SourceSet> = (1..(1u64 << num_sources))
            .map(SourceSet::from_bits)
            .collect();
        sets.sort_by(|a, b| a.canonical_cmp(b));

        let elements: Vec<SourceElement> = sets
            .iter()
            .enumerate()
            .map(|(id, &set)| SourceElement::new(id, tag, set))
            .collect();
        let element_index: HashMap<SourceSet, usize> =
            sets.iter().enumerate().map(|(id, &set)| (set, id)).collect();

        // 2. Candidate nodes
        let antichains = enumerate_antichains(&sets);
        let keys: Vec<Vec<SourceSet>> = antichains
            .iter()
            .map(|ac| ac.iter().map(|&e| sets[e]).collect())
            .collect();
        let m = antichains.len();

        // 3. Strictly-below sets
        let mut below: Vec<NodeBits> = (0..m).map(|_| NodeBits::new(m)).collect();
        for (b, beta) in keys.iter().enumerate() {
            for (a, alpha) in keys.iter().enumerate() {
                if a != b && precedes(alpha, beta) {
                    below[b].set(a);
                }
            }
        }

        // 4. Linear extension
        let mut order: Vec<usize> = (0..m).collect();
        order.sort_by_key(|&i| (below[i].count(), i));
        let mut new_id = vec![0usize; m];
        for (id, &old) in order.iter().enumerate() {
            new_id[old] = id;
        }
        let below: Vec<NodeBits> = order
            .iter()
            .map(|&old| {
                let mut bits = NodeBits::new(m);
                for a in 0..m {
                    if below[old].get(a) {
                        bits.set(new_id[a]);
                    }
                }
                bits
            })
            .collect();

        // 5. Covering relation
        let mut nodes = Vec::with_capacity(m);
        for (id, &old) in order.iter().enumerate() {
            let children = covers(&below, id, m);
            nodes.push(LatticeNode::new(
                id,
                tag,
                antichains[old].clone(),
                keys[old].clone(),
                children,
            ));
        }

        // 6. Buckets and lookup
        let mut nodes_by_order = vec![Vec::new(); num_sources];
        for node in &nodes {
            nodes_by_order[node.interaction_order() - 1].push(node.id());
        }
        let node_index: HashMap<Vec<SourceSet>, usize> = nodes
            .iter()
            .map(|n| (n.element_sets().to_vec(), n.id()))
            .collect();

        let top = node_index[&vec![SourceSet::full(num_sources)]];
        let bottom_key: Vec<SourceSet> = (0..num_sources)
            .map(|s| SourceSet::from_bits(1 << s))
            .collect();
        let bottom = node_index[&bottom_key];

        debug!(
            num_sources,
            elements = elements.len(),
            nodes = nodes.len(),
            per_order = ?nodes_by_order.iter().map(Vec::len).collect::<Vec<_>>(),
            "built redundancy lattice"
        );

        Ok(Self {
            tag,
            num_sources,
            elements,
            element_index,
            nodes,
            node_index,
            nodes_by_order,
            top,
            bottom,
        })
    }

    pub fn num_sources(&self) -> usize {
        self.num_sources
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// All source elements, indexed by id.
    pub fn elements(&self) -> &[SourceElement] {
        &self.elements
    }

    /// All nodes, indexed by id. Children precede their parents.
    pub fn nodes(&self) -> &[LatticeNode] {
        &self.nodes
    }

    /// Node whose single element is the full source set.
    pub fn top_node(&self) -> &LatticeNode {
        &self.nodes[self.top]
    }

    /// Node made of every singleton element.
    pub fn bottom_node(&self) -> &LatticeNode {
        &self.nodes[self.bottom]
    }

    pub fn node(&self, id: usize) -> Option<&LatticeNode> {
        self.nodes.get(id)
    }

    /// Range-checked element lookup by id.
    pub fn element(&self, id: usize) -> Result<&SourceElement> {
        self.elements.get(id).ok_or(PidError::ElementIdOutOfRange {
            id,
            count: self.elements.len(),
        })
    }

    pub fn lookup_element(&self, sources: SourceSet) -> Option<&SourceElement> {
        self.element_id_of(sources).map(|id| &self.elements[id])
    }

    pub fn element_id_of(&self, sources: SourceSet) -> Option<usize> {
        if sources.span() > self.num_sources {
            return None;
        }
        self.element_index.get(&sources).copied()
    }

    /// Look up an element by its source indices, in any order. Indices a
    /// `SourceSet` cannot hold are simply absent.
    pub fn element_for_members(&self, members: &[usize]) -> Option<&SourceElement> {
        SourceSet::try_from_members(members).and_then(|set| self.lookup_element(set))
    }

    /// Look up an element from a string such as `{0,1}` or `0,1`.
    pub fn element_from_str(&self, spec: &str) -> Result<Option<&SourceElement>> {
        Ok(self.lookup_element(parse_element_spec(spec)?))
    }

    /// Look up a node by its member-sets, in any order.
    ///
    /// Returns `None` for specifications that are not antichains of this
    /// lattice's elements.
    pub fn lookup_node(&self, element_sets: &[SourceSet]) -> Option<&LatticeNode> {
        let key = canonicalize(element_sets.to_vec());
        self.node_index.get(&key).map(|&id| &self.nodes[id])
    }

    /// Look up a node from a string such as `{0}{1,2}`.
    pub fn node_from_str(&self, spec: &str) -> Result<Option<&LatticeNode>> {
        Ok(self.lookup_node(&parse_node_spec(spec)?))
    }

    /// Direct children of the node with the given member-sets.
    pub fn children_of(&self, element_sets: &[SourceSet]) -> Option<&[usize]> {
        self.lookup_node(element_sets).map(|n| n.children())
    }

    /// Nodes whose smallest element has `order` sources; empty when the
    /// order is out of range.
    pub fn nodes_at_order(&self, order: usize) -> impl Iterator<Item = &LatticeNode> + '_ {
        let ids: &[usize] = if order >= 1 && order <= self.nodes_by_order.len() {
            &self.nodes_by_order[order - 1]
        } else {
            &[]
        };
        ids.iter().map(move |&id| &self.nodes[id])
    }

    pub fn num_nodes_at_order(&self, order: usize) -> usize {
        self.nodes_at_order(order).count()
    }

    /// Non-strict lattice order `a ≤ b`.
    pub fn is_below(&self, a: &LatticeNode, b: &LatticeNode) -> bool {
        precedes(a.element_sets(), b.element_sets())
    }

    pub fn owns_node(&self, node: &LatticeNode) -> bool {
        node.lattice_tag() == self.tag && node.id() < self.nodes.len()
    }

    pub fn owns_element(&self, element: &SourceElement) -> bool {
        element.lattice_tag() == self.tag && element.id() < self.elements.len()
    }

    /// Indented dump of `node` and everything below it, one node per line.
    /// Nodes reachable along several paths are printed once per path.
    pub fn render_tree(&self, node: &LatticeNode) -> String {
        let mut out = String::new();
        self.render_into(node, 0, &mut out);
        out
    }

    fn render_into(&self, node: &LatticeNode, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push('\t');
        }
        out.push_str(&node.to_string());
        out.push('\n');
        for &child in node.children().iter().rev() {
            self.render_into(&self.nodes[child], depth + 1, out);
        }
    }
}

/// All non-empty antichains of `sets`, as ascending index lists.
fn enumerate_antichains(sets: &[SourceSet]) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    extend_antichain(sets, 0, &mut current, &mut out);
    out
}

fn extend_antichain(
    sets: &[SourceSet],
    start: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    for i in start..sets.len() {
        if current.iter().all(|&j| sets[j].is_incomparable_with(sets[i])) {
            current.push(i);
            out.push(current.clone());
            extend_antichain(sets, i + 1, current, out);
            current.pop();
        }
    }
}

/// Direct children of `node`, ascending.
fn covers(below: &[NodeBits], node: usize, m: usize) -> Vec<usize> {
    let mut shadowed = NodeBits::new(m);
    let mut children = Vec::new();
    for candidate in below[node].iter_desc() {
        if !shadowed.get(candidate) {
            children.push(candidate);
            shadowed.union_with(&below[candidate]);
        }
    }
    children.reverse();
    children
}
