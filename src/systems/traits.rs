//! Spatiotemporal System Traits: Standardized API for Lattice PID
//!
//! Any discrete one-dimensional system that produces a row of cell states
//! per time step can feed `LatticePartialInfoDecomposer`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 SpatiotemporalSystem Trait                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + step()          - Advance every cell by one time step    │
//! │  + run(n)          - Run n steps, returning the history     │
//! │  + width()         - Number of cells per row                │
//! │  + base()          - Alphabet size of a cell                │
//! │  + current_row()   - Cell states at the current time        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use ndarray::Array2;

/// Trait for discrete spatiotemporal systems with periodic boundaries
pub trait SpatiotemporalSystem {
    /// Advance the system by one time step
    fn step(&mut self);

    /// Number of cells in a row
    fn width(&self) -> usize;

    /// Number of distinct cell states
    fn base(&self) -> usize;

    /// Current row of cell states
    fn current_row(&self) -> &[usize];

    /// Run `n_steps` steps and return the history as a
    /// `(n_steps + 1) × width` array, starting with the current row.
    fn run(&mut self, n_steps: usize) -> Array2<usize> {
        let width = self.width();
        let mut history = Array2::zeros((n_steps + 1, width));
        for (c, &value) in self.current_row().iter().enumerate() {
            history[[0, c]] = value;
        }
        for n in 1..=n_steps {
            self.step();
            for (c, &value) in self.current_row().iter().enumerate() {
                history[[n, c]] = value;
            }
        }
        history
    }
}
