//! Pauli expectation values estimated from outcome counts.
//!
//! Every estimator is a weighted parity: an outcome contributes
//! `count / N · (-1)^(Σ bits)` over the qubits the observable touches, with
//! `N` the total mass of the counts.

use tfim_sim::Counts;

use crate::error::{VqeError, VqeResult};

fn check_register(counts: &Counts, num_qubits: usize) -> VqeResult<()> {
    if counts.num_qubits() != num_qubits {
        return Err(VqeError::DimensionMismatch {
            context: "measured register width".into(),
            expected: num_qubits,
            got: counts.num_qubits(),
        });
    }
    if counts.total() <= 0.0 {
        return Err(VqeError::NoMeasurements);
    }
    Ok(())
}

/// `⟨Z_{q₁} ⊗ … ⊗ Z_{q_m}⟩` estimated from computational-basis counts.
///
/// Repeated qubits cancel pairwise, as they would in the operator product.
pub fn parity(counts: &Counts, qubits: &[usize]) -> VqeResult<f64> {
    if let Some(&q) = qubits.iter().find(|&&q| q >= counts.num_qubits()) {
        return Err(VqeError::QubitOutOfRange {
            qubit: q,
            num_qubits: counts.num_qubits(),
        });
    }
    let total = counts.total();
    if total <= 0.0 {
        return Err(VqeError::NoMeasurements);
    }

    let signed: f64 = counts
        .iter()
        .map(|(outcome, n)| {
            let ones: u32 = qubits.iter().map(|&q| u32::from(outcome[q])).sum();
            if ones % 2 == 0 { n } else { -n }
        })
        .sum();
    Ok(signed / total)
}

/// `⟨Z_q⟩`.
pub fn expectation_z(counts: &Counts, qubit: usize) -> VqeResult<f64> {
    parity(counts, &[qubit])
}

/// `Σ_i ⟨Z_i Z_{(i+1) mod n}⟩` over the ring of `num_qubits` qubits.
///
/// All `n` pairs are summed, so for `n = 2` the bond between the two qubits
/// is counted twice and for `n = 1` the single self-pair contributes 1.
pub fn expectation_zz(counts: &Counts, num_qubits: usize) -> VqeResult<f64> {
    check_register(counts, num_qubits)?;
    (0..num_qubits)
        .map(|i| parity(counts, &[i, (i + 1) % num_qubits]))
        .sum()
}

/// `Σ_i ⟨X_i⟩` from counts measured after a terminal Hadamard layer.
///
/// The Hadamard layer maps X eigenstates onto Z eigenstates, so this is the
/// single-qubit Z parity summed over all qubits.
pub fn expectation_x(counts: &Counts, num_qubits: usize) -> VqeResult<f64> {
    check_register(counts, num_qubits)?;
    (0..num_qubits).map(|i| expectation_z(counts, i)).sum()
}
