//! Specific Information: What One Element Says About One Target Value
//!
//! Implements Williams & Beer eq. 2 from raw counts. For target value t
//! and source element A,
//!
//!   I(S=t; A) = Σₐ p(a|t) log₂ [ p(t|a) / p(t) ]
//!
//! With N observations, p(t|a)/p(t) = p(a|t) · N / count(a), so no
//! division by p(t) is needed. Outcomes a never seen jointly with t
//! contribute exactly zero and are skipped.

use ndarray::ArrayView1;

/// Specific information I(S=t; A) in bits.
///
/// `joint_row[v]` counts co-occurrences of t with joint value v,
/// `element_counts[v]` the marginal occurrences of v.
pub fn specific_information(
    joint_row: ArrayView1<'_, usize>,
    element_counts: &[usize],
    target_count: usize,
    num_observations: usize,
) -> f64 {
    if target_count == 0 {
        return 0.0;
    }

    let mut info = 0.0;
    for (v, &joint) in joint_row.iter().enumerate() {
        if joint == 0 {
            continue;
        }
        let p_source_given_target = joint as f64 / target_count as f64;
        let ratio = p_source_given_target * num_observations as f64 / element_counts[v] as f64;
        info += p_source_given_target * ratio.ln();
    }

    info / std::f64::consts::LN_2
}

/// Local specific information log₂ [ p(t|a) / p(t) ] of one outcome.
///
/// Zero by convention when the (t, a) pair was never observed.
pub fn local_specific_information(
    joint: usize,
    element_count: usize,
    target_count: usize,
    num_observations: usize,
) -> f64 {
    if joint == 0 {
        return 0.0;
    }
    let p_source_given_target = joint as f64 / target_count as f64;
    (p_source_given_target * num_observations as f64 / element_count as f64).log2()
}
