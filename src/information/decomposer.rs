//! Partial Information Decomposition engine.
//!
//! Accumulates joint counts of the target with every source element, then
//! evaluates the Williams & Beer redundancy measure over the lattice:
//!
//!   Imin(α) = Σₜ p(t) min_{A ∈ α} I(S=t; A)
//!
//!   PI(α)   = Imin(α) − Σₜ p(t) max_{β ∈ children(α)} min_{B ∈ β} I(S=t; B)
//!
//! Local (single observation) variants replace each specific information
//! by the log-ratio of the observed outcome, keeping the same minimising
//! and maximising witnesses.
//!
//! All quantities are in bits. Results are memoised per target value and
//! node or element id until the next observation arrives.

use std::sync::Arc;

use tracing::debug;

use crate::config::DecomposerConfig;
use crate::error::{PidError, Result};
use crate::lattice::{LatticeNode, RedundancyLattice, SourceElement};

use super::counts::ObservationCounts;
use super::memo::{DecompositionMemo, MinimisingElement};
use super::specific::{local_specific_information, specific_information};

/// PID engine bound to one redundancy lattice.
///
/// Single-threaded: ingestion and queries take `&mut self`. The lattice is
/// shared through an `Arc` and may back several engines.
#[derive(Debug, Clone)]
pub struct PartialInfoDecomposer {
    config: DecomposerConfig,
    lattice: Arc<RedundancyLattice>,
    counts: ObservationCounts,
    memo: DecompositionMemo,
}

impl PartialInfoDecomposer {
    /// Target and `num_sources` sources all with alphabet size `base`.
    pub fn new(base: usize, num_sources: usize) -> Result<Self> {
        Self::from_config(DecomposerConfig::uniform(base, num_sources))
    }

    /// Target alphabet `target_base`, one alphabet size per source.
    pub fn with_source_bases(target_base: usize, source_bases: &[usize]) -> Result<Self> {
        Self::from_config(DecomposerConfig::new(target_base, source_bases))
    }

    pub fn from_config(config: DecomposerConfig) -> Result<Self> {
        config.validate()?;
        let lattice = Arc::new(RedundancyLattice::new(config.num_sources())?);
        Self::with_lattice(lattice, config)
    }

    /// Build against an existing lattice, which must have one source per
    /// entry of `config.source_bases`.
    pub fn with_lattice(lattice: Arc<RedundancyLattice>, config: DecomposerConfig) -> Result<Self> {
        config.validate()?;
        if config.num_sources() != lattice.num_sources() {
            return Err(PidError::SourceCountMismatch {
                expected: lattice.num_sources(),
                actual: config.num_sources(),
            });
        }

        let counts = ObservationCounts::new(config.target_base, &config.source_bases, &lattice)?;
        let joint_states: Vec<usize> = (0..lattice.num_elements())
            .map(|e| counts.num_joint_states(e))
            .collect();
        let memo = DecompositionMemo::new(config.target_base, lattice.num_nodes(), &joint_states);

        debug!(
            target_base = config.target_base,
            source_bases = ?config.source_bases,
            nodes = lattice.num_nodes(),
            "constructed partial info decomposer"
        );

        Ok(Self {
            config,
            lattice,
            counts,
            memo,
        })
    }

    pub fn lattice(&self) -> &Arc<RedundancyLattice> {
        &self.lattice
    }

    pub fn config(&self) -> &DecomposerConfig {
        &self.config
    }

    pub fn target_base(&self) -> usize {
        self.config.target_base
    }

    pub fn source_bases(&self) -> &[usize] {
        &self.config.source_bases
    }

    pub fn num_sources(&self) -> usize {
        self.config.num_sources()
    }

    pub fn num_observations(&self) -> usize {
        self.counts.num_observations()
    }

    /// Clear all observations and memoised values. The lattice is kept.
    pub fn reinitialize(&mut self) {
        self.counts.clear();
        self.memo.clear();
        debug!("reinitialized partial info decomposer");
    }

    /// Add one observation of the target and all sources.
    ///
    /// Fails without touching any count if a value is out of range.
    pub fn add_observation(&mut self, target: usize, source_values: &[usize]) -> Result<()> {
        self.check_target(target)?;
        self.check_sources(source_values)?;
        self.counts.add(target, source_values, &self.lattice);
        self.memo.clear();
        Ok(())
    }

    /// Add a batch of observations given as parallel series. The whole
    /// batch is validated before any of it is counted.
    pub fn add_observations<S: AsRef<[usize]>>(&mut self, targets: &[usize], source_values: &[S]) -> Result<()> {
        if targets.len() != source_values.len() {
            return Err(PidError::LengthMismatch {
                targets: targets.len(),
                sources: source_values.len(),
            });
        }
        for (&t, row) in targets.iter().zip(source_values) {
            self.check_target(t)?;
            self.check_sources(row.as_ref())?;
        }
        for (&t, row) in targets.iter().zip(source_values) {
            self.counts.add(t, row.as_ref(), &self.lattice);
        }
        self.memo.clear();
        Ok(())
    }

    /// Joint value of `element`'s sources within a full observation.
    pub fn joint_value_for_element(&self, source_values: &[usize], element: &SourceElement) -> Result<usize> {
        self.check_sources(source_values)?;
        self.check_element(element)?;
        Ok(self.counts.joint_value(source_values, element))
    }

    /// p(t), or 0 before any observation.
    pub fn target_probability(&self, target: usize) -> f64 {
        let n = self.counts.num_observations();
        if n == 0 || target >= self.config.target_base {
            return 0.0;
        }
        self.counts.target_count(target) as f64 / n as f64
    }

    /// Specific information I(S=t; A).
    pub fn specific_information(&mut self, target: usize, element: &SourceElement) -> Result<f64> {
        self.check_target(target)?;
        self.check_element(element)?;
        Ok(self.specific_by_id(target, element.id()))
    }

    /// Local specific information of the joint value of `element` induced
    /// by `source_values`; zero if that outcome never co-occurred with t.
    pub fn local_specific_information(
        &mut self,
        target: usize,
        source_values: &[usize],
        element: &SourceElement,
    ) -> Result<f64> {
        self.check_target(target)?;
        self.check_sources(source_values)?;
        self.check_element(element)?;
        Ok(self.local_specific_by_id(target, source_values, element.id()))
    }

    /// The element of `node` with the smallest specific information about
    /// t; ties go to the lowest element id.
    pub fn which_element_gives_min_of_is(&mut self, target: usize, node: &LatticeNode) -> Result<MinimisingElement> {
        self.check_target(target)?;
        self.check_node(node)?;
        Ok(self.min_of_is_by_id(target, node.id()))
    }

    pub fn min_of_is(&mut self, target: usize, node: &LatticeNode) -> Result<f64> {
        Ok(self.which_element_gives_min_of_is(target, node)?.value)
    }

    /// Minimising element of the direct child whose minimum is largest, or
    /// `None` for a node without children. Ties go to the lowest child id.
    pub fn max_over_children(&mut self, target: usize, node: &LatticeNode) -> Result<Option<MinimisingElement>> {
        self.check_target(target)?;
        self.check_node(node)?;
        Ok(self.max_over_children_by_id(target, node.id()))
    }

    /// Average redundancy Imin(α) (Williams & Beer eq. 3).
    pub fn imin(&mut self, node: &LatticeNode) -> Result<f64> {
        self.check_node(node)?;
        Ok(self.imin_by_id(node.id()))
    }

    /// Local redundancy of one observation at `node`.
    pub fn local_imin(&mut self, target: usize, source_values: &[usize], node: &LatticeNode) -> Result<f64> {
        self.check_target(target)?;
        self.check_sources(source_values)?;
        self.check_node(node)?;
        Ok(self.local_imin_by_id(target, source_values, node.id()))
    }

    /// Partial information PI(α).
    pub fn pi(&mut self, node: &LatticeNode) -> Result<f64> {
        self.check_node(node)?;
        Ok(self.pi_by_id(node.id()))
    }

    /// Local partial information of one observation at `node`.
    pub fn local_pi(&mut self, target: usize, source_values: &[usize], node: &LatticeNode) -> Result<f64> {
        self.check_target(target)?;
        self.check_sources(source_values)?;
        self.check_node(node)?;
        Ok(self.local_pi_by_id(target, source_values, node.id()))
    }

    /// Σ PI over the nodes of one interaction order; 0 for orders outside
    /// 1..=n.
    pub fn pi_at_interaction_order(&mut self, order: usize) -> f64 {
        let lattice = Arc::clone(&self.lattice);
        let mut total = 0.0;
        for node in lattice.nodes_at_order(order) {
            let pi = self.pi_by_id(node.id());
            debug!(node = %node, order, pi, "partial information");
            total += pi;
        }
        total
    }

    /// PI per interaction order 1..=n.
    pub fn pi_at_each_interaction_order(&mut self) -> Vec<f64> {
        (1..=self.num_sources())
            .map(|order| self.pi_at_interaction_order(order))
            .collect()
    }

    pub fn local_pi_at_interaction_order(&mut self, target: usize, source_values: &[usize], order: usize) -> Result<f64> {
        self.check_target(target)?;
        self.check_sources(source_values)?;
        let lattice = Arc::clone(&self.lattice);
        Ok(lattice
            .nodes_at_order(order)
            .map(|node| self.local_pi_by_id(target, source_values, node.id()))
            .sum())
    }

    pub fn local_pi_at_each_interaction_order(&mut self, target: usize, source_values: &[usize]) -> Result<Vec<f64>> {
        (1..=self.num_sources())
            .map(|order| self.local_pi_at_interaction_order(target, source_values, order))
            .collect()
    }

    // Unchecked evaluation over ids of this engine's own lattice.

    fn specific_by_id(&mut self, target: usize, element: usize) -> f64 {
        if let Some(value) = self.memo.specific[[target, element]] {
            return value;
        }
        let value = specific_information(
            self.counts.joint_counts(element).row(target),
            self.counts.element_counts(element),
            self.counts.target_count(target),
            self.counts.num_observations(),
        );
        self.memo.specific[[target, element]] = Some(value);
        self.memo.mark_populated();
        value
    }

    fn local_specific_by_id(&mut self, target: usize, source_values: &[usize], element: usize) -> f64 {
        let v = self.counts.joint_value(source_values, &self.lattice.elements()[element]);
        if let Some(value) = self.memo.local_specific[element][[target, v]] {
            return value;
        }
        let value = local_specific_information(
            self.counts.joint_counts(element)[[target, v]],
            self.counts.element_counts(element)[v],
            self.counts.target_count(target),
            self.counts.num_observations(),
        );
        self.memo.local_specific[element][[target, v]] = Some(value);
        self.memo.mark_populated();
        value
    }

    fn min_of_is_by_id(&mut self, target: usize, node: usize) -> MinimisingElement {
        if let Some(min) = self.memo.min_of_is[[target, node]] {
            return min;
        }
        let lattice = Arc::clone(&self.lattice);
        let mut min: Option<MinimisingElement> = None;
        for &element in lattice.nodes()[node].elements() {
            let value = self.specific_by_id(target, element);
            if min.is_none_or(|m| value < m.value) {
                min = Some(MinimisingElement { element, value });
            }
        }
        // Nodes are non-empty antichains
        let min = min.unwrap_or(MinimisingElement { element: 0, value: 0.0 });
        self.memo.min_of_is[[target, node]] = Some(min);
        self.memo.mark_populated();
        min
    }

    fn max_over_children_by_id(&mut self, target: usize, node: usize) -> Option<MinimisingElement> {
        if let Some(cached) = self.memo.max_over_children[[target, node]] {
            return cached;
        }
        let lattice = Arc::clone(&self.lattice);
        let mut max: Option<MinimisingElement> = None;
        for &child in lattice.nodes()[node].children() {
            let min = self.min_of_is_by_id(target, child);
            if max.is_none_or(|m| min.value > m.value) {
                max = Some(min);
            }
        }
        self.memo.max_over_children[[target, node]] = Some(max);
        self.memo.mark_populated();
        max
    }

    fn imin_by_id(&mut self, node: usize) -> f64 {
        (0..self.config.target_base)
            .map(|t| {
                let p = self.target_probability(t);
                if p == 0.0 {
                    0.0
                } else {
                    p * self.min_of_is_by_id(t, node).value
                }
            })
            .sum()
    }

    fn local_imin_by_id(&mut self, target: usize, source_values: &[usize], node: usize) -> f64 {
        let min = self.min_of_is_by_id(target, node);
        self.local_specific_by_id(target, source_values, min.element)
    }

    fn pi_by_id(&mut self, node: usize) -> f64 {
        let mut pi = self.imin_by_id(node);
        for t in 0..self.config.target_base {
            let p = self.target_probability(t);
            if p == 0.0 {
                continue;
            }
            if let Some(max) = self.max_over_children_by_id(t, node) {
                pi -= p * max.value;
            }
        }
        pi
    }

    fn local_pi_by_id(&mut self, target: usize, source_values: &[usize], node: usize) -> f64 {
        let mut local = self.local_imin_by_id(target, source_values, node);
        if let Some(max) = self.max_over_children_by_id(target, node) {
            local -= self.local_specific_by_id(target, source_values, max.element);
        }
        local
    }

    // Validation

    fn check_target(&self, target: usize) -> Result<()> {
        if target >= self.config.target_base {
            return Err(PidError::ValueOutOfRange {
                what: "target".to_string(),
                value: target,
                base: self.config.target_base,
            });
        }
        Ok(())
    }

    fn check_sources(&self, source_values: &[usize]) -> Result<()> {
        if source_values.len() != self.num_sources() {
            return Err(PidError::SourceCountMismatch {
                expected: self.num_sources(),
                actual: source_values.len(),
            });
        }
        for (s, (&value, &base)) in source_values.iter().zip(&self.config.source_bases).enumerate() {
            if value >= base {
                return Err(PidError::ValueOutOfRange {
                    what: format!("source {}", s),
                    value,
                    base,
                });
            }
        }
        Ok(())
    }

    fn check_node(&self, node: &LatticeNode) -> Result<()> {
        if !self.lattice.owns_node(node) {
            return Err(PidError::ForeignNode { id: node.id() });
        }
        Ok(())
    }

    fn check_element(&self, element: &SourceElement) -> Result<()> {
        if !self.lattice.owns_element(element) {
            return Err(PidError::ForeignElement { id: element.id() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRECISION: f64 = 5e-7;

    /// Two binary sources, each input combination observed once.
    fn two_input_gate(outputs: [usize; 4]) -> PartialInfoDecomposer {
        let mut pid = PartialInfoDecomposer::new(2, 2).unwrap();
        let inputs = [[0, 0], [0, 1], [1, 0], [1, 1]];
        for (out, input) in outputs.iter().zip(inputs.iter()) {
            pid.add_observation(*out, input).unwrap();
        }
        pid
    }

    fn node_of(pid: &PartialInfoDecomposer, spec: &str) -> LatticeNode {
        pid.lattice().node_from_str(spec).unwrap().unwrap().clone()
    }

    #[test]
    fn test_or_gate() {
        let mut pid = two_input_gate([0, 1, 1, 1]);
        let expected = [
            ("{0}{1}", 0.311278, 0.311278),
            ("{0}", 0.311278, 0.0),
            ("{1}", 0.311278, 0.0),
            ("{0,1}", 0.811278, 0.5),
        ];
        for (spec, imin, pi) in expected {
            let node = node_of(&pid, spec);
            assert!((pid.imin(&node).unwrap() - imin).abs() < PRECISION, "Imin {}", spec);
            assert!((pid.pi(&node).unwrap() - pi).abs() < PRECISION, "PI {}", spec);
        }
    }

    #[test]
    fn test_xor_is_purely_synergistic() {
        let mut pid = two_input_gate([0, 1, 1, 0]);
        for spec in ["{0}{1}", "{0}", "{1}"] {
            let node = node_of(&pid, spec);
            assert!(pid.imin(&node).unwrap().abs() < PRECISION);
            assert!(pid.pi(&node).unwrap().abs() < PRECISION);
        }
        let top = pid.lattice().top_node().clone();
        assert!((pid.imin(&top).unwrap() - 1.0).abs() < PRECISION);
        assert!((pid.pi(&top).unwrap() - 1.0).abs() < PRECISION);
    }

    #[test]
    fn test_empty_engine_is_zero() {
        let mut pid = PartialInfoDecomposer::new(2, 2).unwrap();
        let top = pid.lattice().top_node().clone();
        assert_eq!(pid.imin(&top).unwrap(), 0.0);
        assert_eq!(pid.pi(&top).unwrap(), 0.0);
        assert_eq!(pid.target_probability(0), 0.0);
    }

    #[test]
    fn test_observation_invalidates_memo() {
        let mut pid = two_input_gate([0, 1, 1, 0]);
        let node = node_of(&pid, "{0}");
        assert!(pid.imin(&node).unwrap().abs() < PRECISION);
        assert!(pid.memo.is_populated());

        // Skew the data so source 0 becomes informative
        for _ in 0..4 {
            pid.add_observation(1, &[1, 1]).unwrap();
        }
        assert!(!pid.memo.is_populated());
        assert!(pid.imin(&node).unwrap() > 0.01);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let mut pid = PartialInfoDecomposer::new(2, 2).unwrap();
        assert!(matches!(
            pid.add_observation(2, &[0, 0]),
            Err(PidError::ValueOutOfRange { value: 2, .. })
        ));
        assert!(matches!(
            pid.add_observation(0, &[0, 3]),
            Err(PidError::ValueOutOfRange { value: 3, base: 2, .. })
        ));
        assert!(matches!(
            pid.add_observation(0, &[0]),
            Err(PidError::SourceCountMismatch { expected: 2, actual: 1 })
        ));
        assert_eq!(pid.num_observations(), 0);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut pid = PartialInfoDecomposer::new(2, 2).unwrap();
        let sources = vec![vec![0, 0], vec![1, 5]];
        assert!(pid.add_observations(&[0, 1], &sources).is_err());
        assert_eq!(pid.num_observations(), 0);
        assert!(matches!(
            pid.add_observations(&[0], &sources),
            Err(PidError::LengthMismatch { targets: 1, sources: 2 })
        ));

        pid.add_observations(&[0, 1, 1, 0], &[[0, 0], [0, 1], [1, 0], [1, 1]]).unwrap();
        assert_eq!(pid.num_observations(), 4);
    }

    #[test]
    fn test_foreign_node_rejected() {
        let mut pid = PartialInfoDecomposer::new(2, 2).unwrap();
        let other = RedundancyLattice::new(2).unwrap();
        assert!(matches!(
            pid.imin(other.top_node()),
            Err(PidError::ForeignNode { .. })
        ));
        assert!(matches!(
            pid.specific_information(0, &other.elements()[0]),
            Err(PidError::ForeignElement { .. })
        ));
    }

    #[test]
    fn test_shared_lattice() {
        let lattice = Arc::new(RedundancyLattice::new(2).unwrap());
        let mut a = PartialInfoDecomposer::with_lattice(Arc::clone(&lattice), DecomposerConfig::uniform(2, 2)).unwrap();
        let mut b = PartialInfoDecomposer::with_lattice(Arc::clone(&lattice), DecomposerConfig::new(2, &[2, 2])).unwrap();
        a.add_observations(&[0, 1, 1, 1], &[[0, 0], [0, 1], [1, 0], [1, 1]]).unwrap();
        b.add_observations(&[0, 1, 1, 0], &[[0, 0], [0, 1], [1, 0], [1, 1]]).unwrap();

        let top = lattice.top_node();
        assert!((a.imin(top).unwrap() - 0.811278).abs() < PRECISION);
        assert!((b.imin(top).unwrap() - 1.0).abs() < PRECISION);

        let mismatch = PartialInfoDecomposer::with_lattice(lattice, DecomposerConfig::uniform(2, 3));
        assert!(matches!(mismatch, Err(PidError::SourceCountMismatch { .. })));
    }

    #[test]
    fn test_local_pi_of_copy_gate() {
        // Target copies source 0
        let mut pid = two_input_gate([0, 0, 1, 1]);
        let node_0 = node_of(&pid, "{0}");
        let node_1 = node_of(&pid, "{1}");
        for (t, input) in [(0, [0, 1]), (1, [1, 0])] {
            assert!((pid.local_pi(t, &input, &node_0).unwrap() - 1.0).abs() < PRECISION);
            assert!(pid.local_pi(t, &input, &node_1).unwrap().abs() < PRECISION);
        }
        // Never observed: target 1 with source 0 at value 0
        let element = pid.lattice().element_from_str("{0}").unwrap().unwrap().clone();
        assert_eq!(pid.local_specific_information(1, &[0, 0], &element).unwrap(), 0.0);
    }

    #[test]
    fn test_max_over_children_witness() {
        let mut pid = two_input_gate([0, 0, 1, 1]);
        let top = pid.lattice().top_node().clone();
        let witness = pid.max_over_children(0, &top).unwrap().unwrap();
        let element_0 = pid.lattice().element_id_of(crate::lattice::SourceSet::try_from_members(&[0]).unwrap());
        assert_eq!(Some(witness.element), element_0);
        assert!((witness.value - 1.0).abs() < PRECISION);

        let bottom = pid.lattice().bottom_node().clone();
        assert_eq!(pid.max_over_children(0, &bottom).unwrap(), None);
    }

    #[test]
    fn test_reinitialize() {
        let mut pid = two_input_gate([0, 1, 1, 1]);
        let top = pid.lattice().top_node().clone();
        let before = pid.pi_at_each_interaction_order();

        pid.reinitialize();
        assert_eq!(pid.num_observations(), 0);
        assert_eq!(pid.imin(&top).unwrap(), 0.0);

        for (out, input) in [0, 1, 1, 1].iter().zip([[0, 0], [0, 1], [1, 0], [1, 1]]) {
            pid.add_observation(*out, &input).unwrap();
        }
        assert_eq!(pid.pi_at_each_interaction_order(), before);
    }

    #[test]
    fn test_orders_sum_to_top_imin() {
        let mut pid = two_input_gate([0, 1, 1, 1]);
        let top = pid.lattice().top_node().clone();
        let per_order = pid.pi_at_each_interaction_order();
        assert_eq!(per_order.len(), 2);
        let total: f64 = per_order.iter().sum();
        assert!((total - pid.imin(&top).unwrap()).abs() < 1e-12);
        assert_eq!(pid.pi_at_interaction_order(0), 0.0);
        assert_eq!(pid.pi_at_interaction_order(3), 0.0);
    }
}
