//! Property-based tests for the estimators and the objective.

use proptest::prelude::*;
use tfim_sim::Counts;
use tfim_vqe::{Objective, expectation_x, expectation_zz, parity};

/// Random counts over `n` qubits with at least one positive entry.
fn counts_strategy(n: usize) -> impl Strategy<Value = Counts> {
    prop::collection::vec((prop::collection::vec(0u8..2, n), 0.5f64..100.0), 1..12).prop_map(
        move |pairs| {
            let mut counts = Counts::new(n);
            for (outcome, c) in pairs {
                counts.add(outcome, c).unwrap();
            }
            counts
        },
    )
}

fn sized_counts() -> impl Strategy<Value = (usize, Counts)> {
    (1usize..6).prop_flat_map(|n| (Just(n), counts_strategy(n)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parity_is_bounded((n, counts) in sized_counts(), q in 0usize..6) {
        let q = q % n;
        let p = parity(&counts, &[q]).unwrap();
        prop_assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(&p));
    }

    #[test]
    fn repeated_qubits_cancel((n, counts) in sized_counts(), q in 0usize..6) {
        let q = q % n;
        prop_assert!((parity(&counts, &[q, q]).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ring_sum_is_bounded((n, counts) in sized_counts()) {
        let zz = expectation_zz(&counts, n).unwrap();
        let x = expectation_x(&counts, n).unwrap();
        prop_assert!(zz.abs() <= n as f64 + 1e-9);
        prop_assert!(x.abs() <= n as f64 + 1e-9);
    }

    #[test]
    fn energy_respects_operator_norm(
        n in 1usize..5,
        theta in prop::array::uniform3(0.0f64..std::f64::consts::TAU),
        field in 0.0f64..3.0,
    ) {
        let obj = Objective::new(n).unwrap();
        let e = obj.energy(&theta, field).unwrap();
        prop_assert!(e.abs() <= n as f64 * (0.25 + field / 2.0) + 1e-9);
    }
}

#[test]
fn scan_point_serializes() {
    use tfim_vqe::{Driver, NelderMead};

    let driver = Driver::new(Objective::new(2).unwrap(), NelderMead::new().with_max_iterations(5))
        .with_restarts(1);
    let points = driver.scan(&[0.25]).unwrap();
    let json = serde_json::to_value(&points[0]).unwrap();
    assert_eq!(json["field"], 0.25);
    assert_eq!(json["best_params"].as_array().unwrap().len(), 3);
    assert_eq!(json["restarts"], 1);
}
