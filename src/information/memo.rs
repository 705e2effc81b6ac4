//! Memo tables for lattice-indexed quantities.
//!
//! Every table is indexed by target value and by node or element id, sized
//! once against the lattice arenas. Ingesting an observation can shift any
//! probability, so `clear` wipes all of them together; the tables are never
//! reallocated.

use ndarray::Array2;
use tracing::trace;

/// The element of a node attaining the node's minimum specific
/// information for one target value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimisingElement {
    /// Element id
    pub element: usize,
    /// Its specific information, in bits
    pub value: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct DecompositionMemo {
    /// (target, node) -> minimising element of the node
    pub(crate) min_of_is: Array2<Option<MinimisingElement>>,
    /// (target, node) -> minimising element of the child with the largest
    /// minimum; the inner `None` records a node without children
    pub(crate) max_over_children: Array2<Option<Option<MinimisingElement>>>,
    /// (target, element) -> specific information
    pub(crate) specific: Array2<Option<f64>>,
    /// element -> (target, joint value) -> local specific information
    pub(crate) local_specific: Vec<Array2<Option<f64>>>,
    populated: bool,
}

impl DecompositionMemo {
    pub(crate) fn new(target_base: usize, num_nodes: usize, joint_states: &[usize]) -> Self {
        Self {
            min_of_is: Array2::from_elem((target_base, num_nodes), None),
            max_over_children: Array2::from_elem((target_base, num_nodes), None),
            specific: Array2::from_elem((target_base, joint_states.len()), None),
            local_specific: joint_states
                .iter()
                .map(|&states| Array2::from_elem((target_base, states), None))
                .collect(),
            populated: false,
        }
    }

    /// Note that some entry has been filled since the last clear.
    pub(crate) fn mark_populated(&mut self) {
        self.populated = true;
    }

    pub(crate) fn is_populated(&self) -> bool {
        self.populated
    }

    pub(crate) fn clear(&mut self) {
        if !self.populated {
            return;
        }
        trace!("invalidating decomposition memo");
        self.min_of_is.fill(None);
        self.max_over_children.fill(None);
        self.specific.fill(None);
        for table in &mut self.local_specific {
            table.fill(None);
        }
        self.populated = false;
    }
}
