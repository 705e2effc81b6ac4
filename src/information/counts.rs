//! Observation statistics for every source element.
//!
//! For target value t and an element A with joint value v:
//!
//! - `target_count[t]`      = #{ observations with S = t }
//! - `joint_count[A][t, v]` = #{ observations with S = t, A = v }
//! - `element_count[A][v]`  = #{ observations with A = v }
//!
//! so that Σ_v joint_count[A][t, v] = target_count[t] and
//! Σ_t joint_count[A][t, v] = element_count[A][v] for every element.

use ndarray::Array2;

use crate::error::{PidError, Result};
use crate::lattice::{RedundancyLattice, SourceElement};

/// Count tables sized once against a lattice's element arena.
#[derive(Debug, Clone)]
pub struct ObservationCounts {
    source_bases: Vec<usize>,
    num_observations: usize,
    target_count: Vec<usize>,
    joint_count: Vec<Array2<usize>>,
    element_count: Vec<Vec<usize>>,
}

impl ObservationCounts {
    pub fn new(target_base: usize, source_bases: &[usize], lattice: &RedundancyLattice) -> Result<Self> {
        let mut joint_count = Vec::with_capacity(lattice.num_elements());
        let mut element_count = Vec::with_capacity(lattice.num_elements());

        for element in lattice.elements() {
            let states = joint_states(source_bases, element)?;
            joint_count.push(Array2::zeros((target_base, states)));
            element_count.push(vec![0; states]);
        }

        Ok(Self {
            source_bases: source_bases.to_vec(),
            num_observations: 0,
            target_count: vec![0; target_base],
            joint_count,
            element_count,
        })
    }

    /// Mixed-radix joint value of `element`'s sources, most significant
    /// digit first. Inputs must already be range-checked.
    pub fn joint_value(&self, source_values: &[usize], element: &SourceElement) -> usize {
        element.members().iter().fold(0, |joint, &s| {
            joint * self.source_bases[s] + source_values[s]
        })
    }

    /// Record one validated observation against every element.
    pub fn add(&mut self, target: usize, source_values: &[usize], lattice: &RedundancyLattice) {
        self.target_count[target] += 1;
        for element in lattice.elements() {
            let v = self.joint_value(source_values, element);
            self.joint_count[element.id()][[target, v]] += 1;
            self.element_count[element.id()][v] += 1;
        }
        self.num_observations += 1;
    }

    /// Zero every count without reallocating.
    pub fn clear(&mut self) {
        self.num_observations = 0;
        self.target_count.fill(0);
        for table in &mut self.joint_count {
            table.fill(0);
        }
        for row in &mut self.element_count {
            row.fill(0);
        }
    }

    pub fn num_observations(&self) -> usize {
        self.num_observations
    }

    pub fn target_count(&self, target: usize) -> usize {
        self.target_count[target]
    }

    pub fn joint_counts(&self, element: usize) -> &Array2<usize> {
        &self.joint_count[element]
    }

    pub fn element_counts(&self, element: usize) -> &[usize] {
        &self.element_count[element]
    }

    pub fn num_joint_states(&self, element: usize) -> usize {
        self.element_count[element].len()
    }
}

fn joint_states(source_bases: &[usize], element: &SourceElement) -> Result<usize> {
    element
        .members()
        .iter()
        .try_fold(1usize, |acc, &s| acc.checked_mul(source_bases[s]))
        .ok_or_else(|| PidError::InvalidAlphabet {
            what: format!("joint alphabet of element {}", element),
            size: usize::MAX,
        })
}
