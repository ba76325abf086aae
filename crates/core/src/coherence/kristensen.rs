//! Kristensen (1979) longitudinal coherence
//!
//! Kristensen, L. (1979). "On longitudinal spectral coherence."
//! Boundary-Layer Meteorology, 16(2), 145-153.
//!
//! ```text
//! ξ = f·L/U
//! α = (σ/U)·r/L
//! G(ξ) = 33^(-2/3)·(33ξ)²·(33ξ + 3/11)^(1/2) / (33ξ + 1)^(11/6)     (Eq. 29)
//! γ² = exp(-2αG(ξ))·(1 - exp(-1/(2α^m ξ²)))²,  m = 2 if α ≤ 1 else 1 (Eq. 20)
//! ```

/// Kristensen's G function of the non-dimensional frequency ξ
#[must_use]
pub fn g_function(xi: f64) -> f64 {
    let s = 33.0 * xi;
    33.0_f64.powf(-2.0 / 3.0) * s * s * (s + 3.0 / 11.0).sqrt() / (s + 1.0).powf(11.0 / 6.0)
}

/// Squared coherence at frequency `f` and separation `r`
///
/// `sigma_total` is the combined u/v/w RMS and `length_scale` the
/// longitudinal integral length scale.
#[must_use]
pub fn squared_coherence(f: f64, r: f64, wind_speed: f64, sigma_total: f64, length_scale: f64) -> f64 {
    let xi = f * length_scale / wind_speed;
    let alpha = sigma_total / wind_speed * r / length_scale;

    // Both limits tend to full coherence; the closed form divides by zero there
    if alpha <= 0.0 || xi <= 0.0 {
        return 1.0;
    }

    let m = if alpha <= 1.0 { 2 } else { 1 };
    let decay = (-2.0 * alpha * g_function(xi)).exp();
    let shape = 1.0 - (-1.0 / (2.0 * alpha.powi(m) * xi * xi)).exp();
    (decay * shape * shape).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_g_function_limits() {
        assert_eq!(g_function(0.0), 0.0);

        // Large ξ: G → 33^(-2/3)·(33ξ)^(2 + 1/2 - 11/6) = 33^(-2/3)·(33ξ)^(2/3) = ξ^(2/3)
        let xi = 1.0e6;
        assert_relative_eq!(g_function(xi), xi.powf(2.0 / 3.0), max_relative = 1e-4);
    }

    #[test]
    fn test_zero_separation_is_fully_coherent() {
        for f in [0.01, 0.1, 1.0, 10.0] {
            assert_eq!(squared_coherence(f, 0.0, 12.0, 2.5, 340.0), 1.0);
        }
    }

    #[test]
    fn test_closed_form_value() {
        let (f, r, u, sigma, l) = (0.05, 50.0, 16.0, 4.1, 340.0);
        let xi = f * l / u;
        let alpha: f64 = sigma / u * r / l;
        assert!(alpha <= 1.0);
        let expected = (-2.0 * alpha * g_function(xi)).exp()
            * (1.0 - (-1.0 / (2.0 * alpha.powi(2) * xi * xi)).exp()).powi(2);
        assert_relative_eq!(squared_coherence(f, r, u, sigma, l), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_exponent_switch_above_unit_alpha() {
        let (f, r, u, sigma, l) = (0.2, 2000.0, 8.0, 3.0, 100.0);
        let xi = f * l / u;
        let alpha: f64 = sigma / u * r / l;
        assert!(alpha > 1.0);
        let expected = (-2.0 * alpha * g_function(xi)).exp()
            * (1.0 - (-1.0 / (2.0 * alpha * xi * xi)).exp()).powi(2);
        assert_relative_eq!(squared_coherence(f, r, u, sigma, l), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_coherence_decays_with_separation() {
        let near = squared_coherence(0.1, 20.0, 10.0, 2.0, 200.0);
        let far = squared_coherence(0.1, 200.0, 10.0, 2.0, 200.0);
        assert!(near > far);
        assert!((0.0..=1.0).contains(&far));
    }
}
