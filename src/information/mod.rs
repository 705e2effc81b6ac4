//! Information Module: Redundancy and Partial Information
//!
//! Given a target S and sources R₁..Rₙ, the **specific information** an
//! element A provides about outcome t is
//!
//!   I(S=t; A) = Σₐ p(a|t) [ log₂ 1/p(t) − log₂ 1/p(t|a) ]
//!
//! The redundancy of a lattice node α is the expected minimum over its
//! elements,
//!
//!   Imin(α) = Σₜ p(t) min_{A ∈ α} I(S=t; A)
//!
//! and the **partial information** of α is what remains after removing the
//! largest redundancy among its direct children:
//!
//!   PI(α) = Imin(α) − Σₜ p(t) max_{β ∈ children(α)} min_{B ∈ β} I(S=t; B)
//!
//! Summed over every node, PI recovers Imin of the top node, the full
//! mutual information I(S; R₁..Rₙ).

mod counts;
mod decomposer;
mod memo;
mod specific;

pub use counts::ObservationCounts;
pub use decomposer::PartialInfoDecomposer;
pub use memo::MinimisingElement;
pub use specific::{local_specific_information, specific_information};
