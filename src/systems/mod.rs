//! Systems Module: Spatiotemporal Sources for Lattice PID
//!
//! Discrete one-dimensional systems and the decomposer that reads their
//! space-time histories:
//!
//! - **Elementary cellular automata**: Binary radius-1 rules on a ring
//! - **LatticePartialInfoDecomposer**: Information storage, transfer and
//!   per-order partial information at every cell
//!
//! Any `SpatiotemporalSystem` can generate input for the decomposer.

mod cellular_automaton;
mod lattice_decomposer;
mod traits;

pub use cellular_automaton::ElementaryCellularAutomaton;
pub use lattice_decomposer::LatticePartialInfoDecomposer;
pub use traits::SpatiotemporalSystem;
