//! Closed-form ground-state energy of the infinite transverse-field Ising chain.
//!
//! For `H = -J'·Σ Z_i Z_{i+1} - h'·Σ X_i` the energy per site is
//! `-(1/π)·∫₀^π √(J'² + h'² + 2J'h'·cos k) dk`. The ring Hamiltonian used by the
//! objective has `J' = J/4` and `h' = h/2`. Used only to validate scans.

use std::f64::consts::PI;

/// Simpson panels used by [`energy_per_site`].
pub const DEFAULT_PANELS: usize = 1000;

/// Composite Simpson rule over `[a, b]` with `panels` sub-intervals.
///
/// An odd panel count is rounded up to the next even number.
pub fn simpson<F>(f: F, a: f64, b: f64, panels: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = (panels.max(2) + 1) & !1;
    let h = (b - a) / n as f64;
    let interior: f64 = (1..n)
        .map(|i| {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            weight * f(a + h * i as f64)
        })
        .sum();
    h / 3.0 * (f(a) + interior + f(b))
}

/// Ground-state energy per site at field `field` and coupling `coupling`.
pub fn energy_per_site(field: f64, coupling: f64) -> f64 {
    let j = coupling / 4.0;
    let h = field / 2.0;
    let integrand = |k: f64| (j * j + h * h + 2.0 * j * h * k.cos()).max(0.0).sqrt();
    -simpson(integrand, 0.0, PI, DEFAULT_PANELS) / PI
}

/// `(h, e(h))` for each field value.
pub fn curve(fields: &[f64], coupling: f64) -> Vec<(f64, f64)> {
    fields
        .iter()
        .map(|&h| (h, energy_per_site(h, coupling)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simpson_polynomial_exact() {
        // Simpson is exact for cubics
        let v = simpson(|x| x * x * x - 2.0 * x + 1.0, 0.0, 2.0, 4);
        assert!((v - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_simpson_odd_panels() {
        let v = simpson(f64::sin, 0.0, PI, 7);
        assert!((v - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_field_limit() {
        for j in [0.5, 1.0, 2.0] {
            assert!((energy_per_site(0.0, j) + j / 4.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_zero_coupling_limit() {
        for h in [0.5, 1.0, 3.0] {
            assert!((energy_per_site(h, 0.0) + h / 2.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_critical_point() {
        // J' = h' = 1/4: e = -(1/π)·∫ √(2·(1/16)(1 + cos k)) dk = -1/π
        let e = energy_per_site(0.5, 1.0);
        assert!((e + 1.0 / PI).abs() < 1e-6);
    }

    #[test]
    fn test_curve_monotone_in_field() {
        let c = curve(&[0.0, 0.5, 1.0, 1.5, 2.0], 1.0);
        assert!(c.windows(2).all(|w| w[1].1 < w[0].1));
    }
}
