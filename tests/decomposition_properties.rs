use pid_lattice::PartialInfoDecomposer;
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-10;

/// (target base, source bases, observations) with every value in range.
fn arb_observations(num_sources: usize) -> impl Strategy<Value = (usize, Vec<usize>, Vec<(usize, Vec<usize>)>)> {
    (2usize..4, prop::collection::vec(2usize..4, num_sources)).prop_flat_map(|(target_base, source_bases)| {
        let row = (
            0..target_base,
            source_bases.iter().map(|&b| 0..b).collect::<Vec<_>>(),
        );
        (
            Just(target_base),
            Just(source_bases),
            prop::collection::vec(row, 1..60),
        )
    })
}

fn build(target_base: usize, source_bases: &[usize], observations: &[(usize, Vec<usize>)]) -> PartialInfoDecomposer {
    let mut pid = PartialInfoDecomposer::with_source_bases(target_base, source_bases).unwrap();
    for (t, sources) in observations {
        pid.add_observation(*t, sources).unwrap();
    }
    pid
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn imin_is_non_negative((tb, sb, obs) in arb_observations(3)) {
        let mut pid = build(tb, &sb, &obs);
        let lattice = std::sync::Arc::clone(pid.lattice());
        for node in lattice.nodes() {
            let imin = pid.imin(node).unwrap();
            prop_assert!(imin >= -TOLERANCE, "Imin{} = {}", node, imin);
        }
    }

    #[test]
    fn pi_sums_to_top_imin_two_sources((tb, sb, obs) in arb_observations(2)) {
        let mut pid = build(tb, &sb, &obs);
        let lattice = std::sync::Arc::clone(pid.lattice());
        let total: f64 = lattice.nodes().iter().map(|n| pid.pi(n).unwrap()).sum();
        let top = pid.imin(lattice.top_node()).unwrap();
        prop_assert!((total - top).abs() < TOLERANCE, "Σ PI = {}, Imin(top) = {}", total, top);
    }

    #[test]
    fn pi_sums_to_top_imin_three_sources((tb, sb, obs) in arb_observations(3)) {
        let mut pid = build(tb, &sb, &obs);
        let lattice = std::sync::Arc::clone(pid.lattice());
        let per_order: f64 = pid.pi_at_each_interaction_order().iter().sum();
        let top = pid.imin(lattice.top_node()).unwrap();
        prop_assert!((per_order - top).abs() < TOLERANCE, "Σ PI = {}, Imin(top) = {}", per_order, top);
    }

    #[test]
    fn target_probabilities_sum_to_one((tb, sb, obs) in arb_observations(2)) {
        let pid = build(tb, &sb, &obs);
        let total: f64 = (0..tb).map(|t| pid.target_probability(t)).sum();
        prop_assert!((total - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn reinitialize_is_idempotent((tb, sb, obs) in arb_observations(2)) {
        let mut pid = build(tb, &sb, &obs);
        let lattice = std::sync::Arc::clone(pid.lattice());
        let before: Vec<f64> = lattice.nodes().iter().map(|n| pid.pi(n).unwrap()).collect();

        pid.reinitialize();
        for (t, sources) in &obs {
            pid.add_observation(*t, sources).unwrap();
        }
        let after: Vec<f64> = lattice.nodes().iter().map(|n| pid.pi(n).unwrap()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn local_pi_averages_to_pi((tb, sb, obs) in arb_observations(2)) {
        let mut pid = build(tb, &sb, &obs);
        let lattice = std::sync::Arc::clone(pid.lattice());
        for node in lattice.nodes() {
            let mut total = 0.0;
            for (t, sources) in &obs {
                total += pid.local_pi(*t, sources, node).unwrap();
            }
            let mean = total / obs.len() as f64;
            let pi = pid.pi(node).unwrap();
            prop_assert!((mean - pi).abs() < 1e-9, "mean local PI{} = {}, PI = {}", node, mean, pi);
        }
    }
}
