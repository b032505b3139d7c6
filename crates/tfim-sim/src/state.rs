//! Rank-n state tensors.

use ndarray::{ArrayD, IxDyn};
use num_complex::Complex64;

use crate::error::{SimError, SimResult};

/// Largest register the engine will allocate (`2^24` amplitudes).
pub const MAX_QUBITS: usize = 24;

/// Amplitudes `[a0, a1]` of a single qubit in the computational basis.
pub type QubitState = [Complex64; 2];

/// `|0⟩`.
pub const ZERO_STATE: QubitState = [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];

/// `|1⟩`.
pub const ONE_STATE: QubitState = [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];

/// Check a register width against the zero/ceiling bounds.
pub(crate) fn check_width(num_qubits: usize, max: usize) -> SimResult<()> {
    if num_qubits == 0 {
        return Err(SimError::EmptyRegister);
    }
    if num_qubits > max {
        return Err(SimError::TooManyQubits {
            requested: num_qubits,
            max,
        });
    }
    Ok(())
}

/// Joint state of `n` qubits as a rank-`n` tensor with every axis of extent 2.
///
/// Axis `i` is qubit `i`. Flattened views are row-major, so qubit 0 is the
/// most significant bit of a basis index. The tensor is not renormalised.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTensor {
    data: ArrayD<Complex64>,
}

impl StateTensor {
    /// `|0…0⟩` on `num_qubits` qubits.
    pub fn zero(num_qubits: usize) -> SimResult<Self> {
        check_width(num_qubits, MAX_QUBITS)?;
        let mut data = ArrayD::zeros(IxDyn(&vec![2usize; num_qubits]));
        data[IxDyn(&vec![0usize; num_qubits])] = Complex64::new(1.0, 0.0);
        Ok(Self { data })
    }

    /// Ordered Kronecker product of per-qubit vectors.
    pub fn product(qubits: &[QubitState]) -> SimResult<Self> {
        check_width(qubits.len(), MAX_QUBITS)?;
        for (i, q) in qubits.iter().enumerate() {
            if !q.iter().all(|a| a.re.is_finite() && a.im.is_finite()) {
                return Err(SimError::InvalidQubitState {
                    qubit: i,
                    reason: "amplitude is not finite".into(),
                });
            }
        }

        let mut amplitudes = vec![Complex64::new(1.0, 0.0)];
        for q in qubits {
            amplitudes = amplitudes
                .iter()
                .flat_map(|&a| [a * q[0], a * q[1]])
                .collect();
        }
        Self::from_amplitudes(qubits.len(), amplitudes)
    }

    /// Computational basis state; `bits[i]` is the value of qubit `i`.
    pub fn basis(bits: &[u8]) -> SimResult<Self> {
        let qubits = bits
            .iter()
            .enumerate()
            .map(|(i, &b)| match b {
                0 => Ok(ZERO_STATE),
                1 => Ok(ONE_STATE),
                other => Err(SimError::InvalidQubitState {
                    qubit: i,
                    reason: format!("basis label {other} is not 0 or 1"),
                }),
            })
            .collect::<SimResult<Vec<_>>>()?;
        Self::product(&qubits)
    }

    /// Build from `2^num_qubits` row-major amplitudes.
    pub fn from_amplitudes(num_qubits: usize, amplitudes: Vec<Complex64>) -> SimResult<Self> {
        check_width(num_qubits, MAX_QUBITS)?;
        let expected = 1usize << num_qubits;
        if amplitudes.len() != expected {
            return Err(SimError::DimensionMismatch {
                context: "state amplitudes".into(),
                expected,
                got: amplitudes.len(),
            });
        }
        let data = ArrayD::from_shape_vec(IxDyn(&vec![2usize; num_qubits]), amplitudes)?;
        Ok(Self { data })
    }

    /// Wrap a tensor produced by the engine.
    pub(crate) fn from_tensor(data: ArrayD<Complex64>) -> Self {
        Self { data }
    }

    /// Number of qubits (tensor rank).
    pub fn num_qubits(&self) -> usize {
        self.data.ndim()
    }

    /// The underlying tensor.
    pub fn tensor(&self) -> &ArrayD<Complex64> {
        &self.data
    }

    /// Take the underlying tensor.
    pub fn into_tensor(self) -> ArrayD<Complex64> {
        self.data
    }

    /// Flattened amplitudes in basis-index order.
    pub fn amplitudes(&self) -> Vec<Complex64> {
        self.data.iter().copied().collect()
    }

    /// Flattened `|amplitude|²` in basis-index order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.data.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Amplitude of the basis state `bits`, or `None` if `bits` is not a
    /// valid label for this register.
    pub fn amplitude(&self, bits: &[u8]) -> Option<Complex64> {
        if bits.len() != self.num_qubits() || bits.iter().any(|&b| b > 1) {
            return None;
        }
        let index: Vec<usize> = bits.iter().map(|&b| b as usize).collect();
        self.data.get(IxDyn(&index)).copied()
    }

    /// Sum of `|amplitude|²`.
    pub fn norm_sqr(&self) -> f64 {
        self.data.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Element-wise comparison within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.data.shape() == other.data.shape()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).norm() <= tol)
    }
}

/// Basis label of flat index `index` in an `num_qubits` register, qubit 0 first.
pub fn index_to_bits(index: usize, num_qubits: usize) -> Vec<u8> {
    (0..num_qubits)
        .map(|q| ((index >> (num_qubits - 1 - q)) & 1) as u8)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_zero_state() {
        let s = StateTensor::zero(3).unwrap();
        assert_eq!(s.num_qubits(), 3);
        assert_eq!(s.tensor().shape(), &[2, 2, 2]);
        assert!(approx_eq(s.amplitude(&[0, 0, 0]).unwrap(), Complex64::new(1.0, 0.0)));
        assert!((s.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_basis_state_ordering() {
        // qubit 0 is the most significant bit
        let s = StateTensor::basis(&[1, 0, 1]).unwrap();
        let amps = s.amplitudes();
        assert!(approx_eq(amps[0b101], Complex64::new(1.0, 0.0)));
        assert!((s.probabilities().iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_product_state() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let plus = [Complex64::new(h, 0.0), Complex64::new(h, 0.0)];
        let s = StateTensor::product(&[plus, ONE_STATE]).unwrap();
        assert!(approx_eq(s.amplitude(&[0, 1]).unwrap(), Complex64::new(h, 0.0)));
        assert!(approx_eq(s.amplitude(&[1, 1]).unwrap(), Complex64::new(h, 0.0)));
        assert!(approx_eq(s.amplitude(&[1, 0]).unwrap(), Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_width_bounds() {
        assert!(matches!(StateTensor::zero(0), Err(SimError::EmptyRegister)));
        assert!(matches!(
            StateTensor::zero(MAX_QUBITS + 1),
            Err(SimError::TooManyQubits { .. })
        ));
    }

    #[test]
    fn test_invalid_basis_label() {
        assert!(matches!(
            StateTensor::basis(&[0, 2]),
            Err(SimError::InvalidQubitState { qubit: 1, .. })
        ));
    }

    #[test]
    fn test_from_amplitudes_length() {
        let err = StateTensor::from_amplitudes(2, vec![Complex64::new(1.0, 0.0); 3]).unwrap_err();
        assert!(matches!(err, SimError::DimensionMismatch { expected: 4, got: 3, .. }));
    }

    #[test]
    fn test_amplitude_rejects_bad_label() {
        let s = StateTensor::zero(2).unwrap();
        assert!(s.amplitude(&[0]).is_none());
        assert!(s.amplitude(&[0, 3]).is_none());
    }

    #[test]
    fn test_index_to_bits() {
        assert_eq!(index_to_bits(0b011, 3), vec![0, 1, 1]);
        assert_eq!(index_to_bits(0b100, 3), vec![1, 0, 0]);
    }
}
