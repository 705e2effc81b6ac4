//! Elementary Cellular Automata
//!
//! A row of binary cells on a ring, updated synchronously:
//!
//!   xᶜₙ₊₁ = rule bit (4·xᶜ⁻¹ₙ + 2·xᶜₙ + xᶜ⁺¹ₙ)
//!
//! using Wolfram's numbering, where bit i of the rule byte is the next
//! state for neighbourhood value i.
//!
//! ## Notable Rules
//!
//! - **Rule 54**: Gliders on a periodic domain; rich storage and transfer
//! - **Rule 110**: Turing-complete; gliders on an irregular background
//! - **Rule 18**: Domain walls performing random walks
//!
//! ## References
//!
//! - Wolfram, S. (1983). Statistical mechanics of cellular automata.
//!   Rev. Mod. Phys. 55, 601.
//! - Lizier, J. T., Prokopenko, M., & Zomaya, A. Y. (2008). Local
//!   information transfer as a spatiotemporal filter for complex systems.
//!   Phys. Rev. E 77, 026110.

use rand_distr::{Bernoulli, Distribution};

use crate::error::{PidError, Result};

use super::traits::SpatiotemporalSystem;

/// Elementary (binary, radius 1) cellular automaton on a ring
#[derive(Debug, Clone)]
pub struct ElementaryCellularAutomaton {
    /// Wolfram rule number
    rule: u8,
    /// Current cell states, each 0 or 1
    row: Vec<usize>,
    /// Steps taken since construction
    steps: usize,
}

impl ElementaryCellularAutomaton {
    /// Random initial row with each cell 1 with probability `density`.
    pub fn new(rule: u8, width: usize, density: f64) -> Result<Self> {
        if width == 0 {
            return Err(PidError::InvalidAutomaton("width must be at least 1".to_string()));
        }
        let bernoulli = Bernoulli::new(density)
            .map_err(|_| PidError::InvalidAutomaton(format!("density {} outside [0, 1]", density)))?;
        let mut rng = rand::rng();
        let row = (0..width).map(|_| bernoulli.sample(&mut rng) as usize).collect();

        Ok(Self { rule, row, steps: 0 })
    }

    /// Start from a given row of 0/1 cells.
    pub fn from_row(rule: u8, row: &[usize]) -> Result<Self> {
        if row.is_empty() {
            return Err(PidError::InvalidAutomaton("width must be at least 1".to_string()));
        }
        if let Some(&value) = row.iter().find(|&&v| v > 1) {
            return Err(PidError::ValueOutOfRange {
                what: "cell".to_string(),
                value,
                base: 2,
            });
        }
        Ok(Self {
            rule,
            row: row.to_vec(),
            steps: 0,
        })
    }

    pub fn rule(&self) -> u8 {
        self.rule
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Fraction of cells in state 1
    pub fn density(&self) -> f64 {
        self.row.iter().sum::<usize>() as f64 / self.row.len() as f64
    }

    fn next_state(&self, left: usize, centre: usize, right: usize) -> usize {
        let neighbourhood = (left << 2) | (centre << 1) | right;
        ((self.rule >> neighbourhood) & 1) as usize
    }
}

impl SpatiotemporalSystem for ElementaryCellularAutomaton {
    fn step(&mut self) {
        let w = self.row.len();
        let next: Vec<usize> = (0..w)
            .map(|c| {
                let left = self.row[(c + w - 1) % w];
                let right = self.row[(c + 1) % w];
                self.next_state(left, self.row[c], right)
            })
            .collect();
        self.row = next;
        self.steps += 1;
    }

    fn width(&self) -> usize {
        self.row.len()
    }

    fn base(&self) -> usize {
        2
    }

    fn current_row(&self) -> &[usize] {
        &self.row
    }
}
