//! Partial information decomposition on one-dimensional lattices.
//!
//! Each cell c at time n is a target. Source 0 is the cell's own past
//! (xᶜₙ₋ₖ .. xᶜₙ₋₁) packed into one base-b value of k digits; source s+1 is
//! the previous-step value of the cell at offset oₛ,
//!
//!   sₛ₊₁ = x^{(c − oₛ) mod W}_{n−1}
//!
//! so a positive offset looks to the left. From the resulting lattice:
//!
//! - active information storage A = Imin({0}) = I(xₙ; x⁽ᵏ⁾ₙ₋₁)
//! - apparent transfer entropy from source s
//!   T = Imin({0,s+1}) − Imin({0}) = I(xₙ; sₛ | x⁽ᵏ⁾ₙ₋₁)
//!
//! The memory value slides along time with one subtraction, one shift and
//! one addition per step.

use std::sync::Arc;

use ndarray::{Array2, Array3};
use tracing::debug;

use crate::config::SpatiotemporalConfig;
use crate::error::{PidError, Result};
use crate::information::PartialInfoDecomposer;
use crate::lattice::{LatticeNode, RedundancyLattice, SourceSet};

/// Decomposer fed by space-time arrays of shape (time, cell).
#[derive(Debug, Clone)]
pub struct LatticePartialInfoDecomposer {
    config: SpatiotemporalConfig,
    decomposer: PartialInfoDecomposer,
    /// v · base^(k−1) for each cell value v: the weight of the oldest digit
    oldest_digit_weight: Vec<usize>,
}

impl LatticePartialInfoDecomposer {
    pub fn new(base: usize, source_offsets: &[isize], history_length: usize) -> Result<Self> {
        Self::from_config(SpatiotemporalConfig::new(base, source_offsets, history_length))
    }

    pub fn from_config(config: SpatiotemporalConfig) -> Result<Self> {
        let decomposer = PartialInfoDecomposer::from_config(config.decomposer_config()?)?;
        let top_weight = config.memory_base()? / config.base;
        let oldest_digit_weight = (0..config.base).map(|v| v * top_weight).collect();

        debug!(
            base = config.base,
            offsets = ?config.source_offsets,
            k = config.history_length,
            "constructed lattice decomposer"
        );

        Ok(Self {
            config,
            decomposer,
            oldest_digit_weight,
        })
    }

    pub fn config(&self) -> &SpatiotemporalConfig {
        &self.config
    }

    pub fn history_length(&self) -> usize {
        self.config.history_length
    }

    /// The underlying decomposer over (memory, offset sources...).
    pub fn decomposer(&self) -> &PartialInfoDecomposer {
        &self.decomposer
    }

    pub fn decomposer_mut(&mut self) -> &mut PartialInfoDecomposer {
        &mut self.decomposer
    }

    pub fn lattice(&self) -> &Arc<RedundancyLattice> {
        self.decomposer.lattice()
    }

    pub fn num_observations(&self) -> usize {
        self.decomposer.num_observations()
    }

    pub fn reinitialize(&mut self) {
        self.decomposer.reinitialize();
    }

    /// Add one observation per cell for every time step from k onwards.
    pub fn add_observations(&mut self, values: &Array2<usize>) -> Result<()> {
        self.check_values(values)?;
        let decomposer = &mut self.decomposer;
        sweep(&self.config, &self.oldest_digit_weight, values, |_, _, target, sources| {
            decomposer.add_observation(target, sources)
        })?;
        debug!(
            rows = values.nrows(),
            width = values.ncols(),
            total = self.decomposer.num_observations(),
            "added lattice observations"
        );
        Ok(())
    }

    /// Local PI of `node` at every cell; rows before k are zero.
    pub fn local_pi(&mut self, values: &Array2<usize>, node: &LatticeNode) -> Result<Array2<f64>> {
        self.check_values(values)?;
        let mut local = Array2::zeros(values.dim());
        let decomposer = &mut self.decomposer;
        sweep(&self.config, &self.oldest_digit_weight, values, |n, c, target, sources| {
            local[[n, c]] = decomposer.local_pi(target, sources, node)?;
            Ok(())
        })?;
        Ok(local)
    }

    /// Local PI summed over the nodes of one interaction order.
    pub fn local_pi_at_interaction_order(&mut self, values: &Array2<usize>, order: usize) -> Result<Array2<f64>> {
        self.check_values(values)?;
        let mut local = Array2::zeros(values.dim());
        let decomposer = &mut self.decomposer;
        sweep(&self.config, &self.oldest_digit_weight, values, |n, c, target, sources| {
            local[[n, c]] = decomposer.local_pi_at_interaction_order(target, sources, order)?;
            Ok(())
        })?;
        Ok(local)
    }

    /// Local PI per interaction order, indexed (order − 1, time, cell).
    pub fn local_pi_at_each_interaction_order(&mut self, values: &Array2<usize>) -> Result<Array3<f64>> {
        self.check_values(values)?;
        let (rows, width) = values.dim();
        let mut local = Array3::zeros((self.decomposer.num_sources(), rows, width));
        let decomposer = &mut self.decomposer;
        sweep(&self.config, &self.oldest_digit_weight, values, |n, c, target, sources| {
            let per_order = decomposer.local_pi_at_each_interaction_order(target, sources)?;
            for (o, value) in per_order.into_iter().enumerate() {
                local[[o, n, c]] = value;
            }
            Ok(())
        })?;
        Ok(local)
    }

    /// Average active information storage, Imin({0}).
    pub fn average_active_info_storage(&mut self) -> Result<f64> {
        let lattice = Arc::clone(self.lattice());
        let memory = single_element_node(&lattice, &[0])?;
        let active = self.decomposer.imin(memory)?;
        debug!(active, "average active info storage");
        Ok(active)
    }

    /// Average apparent transfer entropy from the source at
    /// `source_offsets[source_index]`.
    pub fn average_apparent_transfer_entropy(&mut self, source_index: usize) -> Result<f64> {
        let offsets = self.config.source_offsets.len();
        if source_index >= offsets {
            return Err(PidError::ValueOutOfRange {
                what: "source index".to_string(),
                value: source_index,
                base: offsets,
            });
        }
        let lattice = Arc::clone(self.lattice());
        let memory = single_element_node(&lattice, &[0])?;
        let joint = single_element_node(&lattice, &[0, source_index + 1])?;
        let joint_mi = self.decomposer.imin(joint)?;
        let memory_mi = self.decomposer.imin(memory)?;
        debug!(source_index, joint_mi, memory_mi, "average apparent transfer entropy");
        Ok(joint_mi - memory_mi)
    }

    pub fn pi_at_each_interaction_order(&mut self) -> Vec<f64> {
        self.decomposer.pi_at_each_interaction_order()
    }

    fn check_values(&self, values: &Array2<usize>) -> Result<()> {
        let (rows, width) = values.dim();
        let k = self.config.history_length;
        if width == 0 {
            return Err(PidError::InvalidObservations("lattice has no cells".to_string()));
        }
        if rows <= k {
            return Err(PidError::InvalidObservations(format!(
                "{} time steps is too short for history length {}",
                rows, k
            )));
        }
        if let Some(&value) = values.iter().find(|&&v| v >= self.config.base) {
            return Err(PidError::ValueOutOfRange {
                what: "cell".to_string(),
                value,
                base: self.config.base,
            });
        }
        Ok(())
    }
}

fn single_element_node<'a>(lattice: &'a RedundancyLattice, members: &[usize]) -> Result<&'a LatticeNode> {
    SourceSet::try_from_members(members)
        .and_then(|set| lattice.lookup_node(&[set]))
        .ok_or_else(|| PidError::InvalidObservations(format!("lattice has no node for sources {:?}", members)))
}

/// Visit (time, cell, target, sources) for every observation of
/// already checked `values`, time-major.
fn sweep<F>(
    config: &SpatiotemporalConfig,
    oldest_digit_weight: &[usize],
    values: &Array2<usize>,
    mut visit: F,
) -> Result<()>
where
    F: FnMut(usize, usize, usize, &[usize]) -> Result<()>,
{
    let (rows, width) = values.dim();
    let base = config.base;
    let k = config.history_length;
    let offsets = &config.source_offsets;

    let mut past = vec![0usize; width];
    for n in 0..k {
        for c in 0..width {
            past[c] = past[c] * base + values[[n, c]];
        }
    }

    let mut sources = vec![0usize; offsets.len() + 1];
    for n in k..rows {
        for c in 0..width {
            sources[0] = past[c];
            for (s, &offset) in offsets.iter().enumerate() {
                let cell = (c as isize - offset).rem_euclid(width as isize) as usize;
                sources[s + 1] = values[[n - 1, cell]];
            }
            visit(n, c, values[[n, c]], &sources)?;

            past[c] -= oldest_digit_weight[values[[n - k, c]]];
            past[c] = past[c] * base + values[[n, c]];
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{ElementaryCellularAutomaton, SpatiotemporalSystem};

    /// Cyclic de Bruijn sequence: every 3-cell window appears exactly once.
    const DE_BRUIJN_3: [usize; 8] = [0, 0, 0, 1, 0, 1, 1, 1];

    fn shifting_history(steps: usize) -> Array2<usize> {
        // Rule 170: each cell takes its right neighbour's value
        let mut ca = ElementaryCellularAutomaton::from_row(170, &DE_BRUIJN_3).unwrap();
        ca.run(steps)
    }

    #[test]
    fn test_rejects_zero_history() {
        assert!(matches!(
            LatticePartialInfoDecomposer::new(2, &[1, -1], 0),
            Err(PidError::InvalidHistoryLength(0))
        ));
    }

    #[test]
    fn test_memory_source_base() {
        let lpid = LatticePartialInfoDecomposer::new(2, &[1, -1], 3).unwrap();
        assert_eq!(lpid.decomposer().source_bases(), &[8, 2, 2]);
        assert_eq!(lpid.decomposer().num_sources(), 3);
    }

    #[test]
    fn test_observation_count() {
        let mut lpid = LatticePartialInfoDecomposer::new(2, &[1, -1], 2).unwrap();
        let history = shifting_history(10);
        lpid.add_observations(&history).unwrap();
        // Rows 2..=10, eight cells each
        assert_eq!(lpid.num_observations(), 9 * 8);
    }

    #[test]
    fn test_shift_transfers_from_the_right() {
        let mut lpid = LatticePartialInfoDecomposer::new(2, &[1, -1], 1).unwrap();
        lpid.add_observations(&shifting_history(16)).unwrap();

        assert!(lpid.average_active_info_storage().unwrap().abs() < 1e-10);
        // Offset 1 is the left neighbour, offset -1 the right one
        assert!(lpid.average_apparent_transfer_entropy(0).unwrap().abs() < 1e-10);
        assert!((lpid.average_apparent_transfer_entropy(1).unwrap() - 1.0).abs() < 1e-10);
        assert!(matches!(
            lpid.average_apparent_transfer_entropy(2),
            Err(PidError::ValueOutOfRange { value: 2, .. })
        ));
    }

    #[test]
    fn test_sliding_memory_matches_direct_encoding() {
        let mut ca = ElementaryCellularAutomaton::new(110, 30, 0.5).unwrap();
        let history = ca.run(40);
        let k = 3;
        let lpid = LatticePartialInfoDecomposer::new(2, &[1], k).unwrap();

        let mut seen = 0;
        sweep(&lpid.config, &lpid.oldest_digit_weight, &history, |n, c, target, sources| {
            let direct = (n - k..n).fold(0, |acc, m| acc * 2 + history[[m, c]]);
            assert_eq!(sources[0], direct);
            assert_eq!(sources[1], history[[n - 1, (c + 29) % 30]]);
            assert_eq!(target, history[[n, c]]);
            seen += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, (41 - k) * 30);
    }

    #[test]
    fn test_local_pi_averages_to_pi() {
        let mut ca = ElementaryCellularAutomaton::new(54, 60, 0.5).unwrap();
        let history = ca.run(60);
        let mut lpid = LatticePartialInfoDecomposer::new(2, &[1, -1], 2).unwrap();
        lpid.add_observations(&history).unwrap();

        let lattice = Arc::clone(lpid.lattice());
        let node = lattice.node_from_str("{0}{1,2}").unwrap().unwrap();
        let local = lpid.local_pi(&history, node).unwrap();
        assert!(local.row(0).iter().chain(local.row(1).iter()).all(|&v| v == 0.0));

        let total: f64 = local.iter().sum();
        let mean = total / lpid.num_observations() as f64;
        let pi = lpid.decomposer_mut().pi(node).unwrap();
        assert!((mean - pi).abs() < 1e-9, "mean {} vs PI {}", mean, pi);
    }

    #[test]
    fn test_local_pi_per_order_shape() {
        let history = shifting_history(6);
        let mut lpid = LatticePartialInfoDecomposer::new(2, &[1, -1], 1).unwrap();
        lpid.add_observations(&history).unwrap();

        let per_order = lpid.local_pi_at_each_interaction_order(&history).unwrap();
        assert_eq!(per_order.dim(), (3, 7, 8));
        let order_2 = lpid.local_pi_at_interaction_order(&history, 2).unwrap();
        for n in 0..7 {
            for c in 0..8 {
                assert!((per_order[[1, n, c]] - order_2[[n, c]]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_rejects_bad_arrays() {
        let mut lpid = LatticePartialInfoDecomposer::new(2, &[1], 2).unwrap();
        let short = Array2::<usize>::zeros((2, 5));
        assert!(matches!(lpid.add_observations(&short), Err(PidError::InvalidObservations(_))));

        let mut bad = Array2::<usize>::zeros((4, 5));
        bad[[3, 2]] = 2;
        assert!(matches!(
            lpid.add_observations(&bad),
            Err(PidError::ValueOutOfRange { value: 2, .. })
        ));
        assert_eq!(lpid.num_observations(), 0);
    }
}
