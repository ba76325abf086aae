//! Injection of longitudinal coherence into independent planes
//!
//! At every spatial point the one-sided spectra of all planes are stacked
//! into a plane vector `X(f)`. The correlated spectra are
//!
//! ```text
//! Y(f) = H(f) · X(f)
//! ```
//!
//! where `H(f)` is the lower-triangular mixing operator. Since the input
//! planes are independent with equal spectra, `E[Y·Yᴴ] ∝ H·Hᵗ = C(f)`. The
//! inverse transform of `Y` plus the original per-plane mean gives the
//! evolved field.
//!
//! Spatial points are independent; they are processed in parallel and each
//! one writes only its own output series.

mod transform;

pub use transform::{OneSidedSpectrum, SpectralTransform};

use crate::core_types::{ComponentGrid, PlaneField, VelocityComponent};
use crate::correlation::MixingOperator;
use crate::error::{EvoTurbError, Result};
use rayon::prelude::*;
use rustfft::num_complex::Complex64;
use tracing::{debug, info};

/// Applies mixing operators to the spectra of a set of planes
#[derive(Debug, Clone)]
pub struct SpectralSynthesizer {
    transform: SpectralTransform,
}

impl SpectralSynthesizer {
    /// Synthesizer for series of `nt` samples
    ///
    /// # Errors
    /// Returns a configuration error if `nt` is odd or smaller than 2.
    pub fn new(nt: usize) -> Result<Self> {
        Ok(Self {
            transform: SpectralTransform::new(nt)?,
        })
    }

    /// Mix one velocity component across planes
    ///
    /// Returns one grid per input plane, in the same order.
    ///
    /// # Errors
    /// Returns a configuration error if grid shapes, plane count or
    /// frequency count disagree with the synthesizer and `mixing`.
    pub fn mix_component(
        &self,
        planes: &[&ComponentGrid],
        mixing: &MixingOperator,
    ) -> Result<Vec<ComponentGrid>> {
        let first = planes
            .first()
            .ok_or_else(|| EvoTurbError::configuration("no planes to synthesize"))?;
        let (nz, ny, nt) = (first.nz, first.ny, first.nt);
        self.check_inputs(planes, mixing)?;

        let n_planes = planes.len();
        let n_bins = self.transform.bin_count();
        let transform = &self.transform;

        // One output block of n_planes * nt samples per spatial point
        let blocks: Vec<Vec<f64>> = (0..nz * ny)
            .into_par_iter()
            .map(|point| {
                let spectra: Vec<OneSidedSpectrum> = planes
                    .iter()
                    .map(|grid| transform.analyze(grid.series_at(point)))
                    .collect();

                let mut block = vec![0.0; n_planes * nt];
                let mut mixed = vec![Complex64::new(0.0, 0.0); n_bins];
                for (row, out) in block.chunks_mut(nt).enumerate() {
                    for (k, value) in mixed.iter_mut().enumerate() {
                        let h = mixing.at(k);
                        *value = (0..=row)
                            .map(|col| spectra[col].bins[k] * h[(row, col)])
                            .sum();
                    }
                    transform.synthesize(&mixed, spectra[row].mean, out);
                }
                block
            })
            .collect();

        let mut output = vec![ComponentGrid::new(nz, ny, nt); n_planes];
        for (point, block) in blocks.iter().enumerate() {
            for (grid, series) in output.iter_mut().zip(block.chunks(nt)) {
                grid.series_at_mut(point).copy_from_slice(series);
            }
        }
        Ok(output)
    }

    /// Evolve a set of independent planes into a correlated set
    ///
    /// u is always mixed. w is mixed with the same operators when
    /// `couple_vertical` is set (Mann boxes, where u and w are correlated);
    /// otherwise it is passed through like v.
    ///
    /// # Errors
    /// See [`Self::mix_component`].
    pub fn synthesize(
        &self,
        planes: &[PlaneField],
        mixing: &MixingOperator,
        couple_vertical: bool,
    ) -> Result<Vec<PlaneField>> {
        info!(
            planes = planes.len(),
            frequencies = mixing.len(),
            couple_vertical,
            "Unfreezing turbulence"
        );

        let mixed_u = self.mix_component(&component_refs(planes, VelocityComponent::U), mixing)?;
        let mixed_w = if couple_vertical {
            debug!("Applying u mixing operators to w");
            Some(self.mix_component(&component_refs(planes, VelocityComponent::W), mixing)?)
        } else {
            None
        };

        let mut result: Vec<PlaneField> = planes
            .iter()
            .zip(mixed_u)
            .map(|(plane, u)| PlaneField {
                u,
                v: plane.v.clone(),
                w: plane.w.clone(),
            })
            .collect();
        if let Some(mixed_w) = mixed_w {
            for (plane, w) in result.iter_mut().zip(mixed_w) {
                plane.w = w;
            }
        }
        Ok(result)
    }

    fn check_inputs(&self, planes: &[&ComponentGrid], mixing: &MixingOperator) -> Result<()> {
        let first = planes[0];
        if first.nt != self.transform.len() {
            return Err(EvoTurbError::configuration(format!(
                "planes have {} time samples, synthesizer expects {}",
                first.nt,
                self.transform.len()
            )));
        }
        if let Some(i) = planes
            .iter()
            .position(|g| (g.nz, g.ny, g.nt) != (first.nz, first.ny, first.nt))
        {
            return Err(EvoTurbError::configuration(format!(
                "plane {i} grid differs from plane 0 ({}x{}x{})",
                first.nz, first.ny, first.nt
            )));
        }
        if mixing.plane_count() != planes.len() {
            return Err(EvoTurbError::configuration(format!(
                "mixing operator covers {} planes, got {}",
                mixing.plane_count(),
                planes.len()
            )));
        }
        if mixing.len() != self.transform.bin_count() {
            return Err(EvoTurbError::configuration(format!(
                "mixing operator has {} frequencies, series have {} one-sided bins",
                mixing.len(),
                self.transform.bin_count()
            )));
        }
        Ok(())
    }
}

fn component_refs(planes: &[PlaneField], component: VelocityComponent) -> Vec<&ComponentGrid> {
    planes.iter().map(|p| p.component(component)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coherence::{CoherenceMatrix, CoherenceModel};
    use crate::config::FrequencyVector;
    use nalgebra::DMatrix;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_plane(rng: &mut StdRng, nz: usize, ny: usize, nt: usize, mean: f64) -> PlaneField {
        let mut grid = |m: f64| ComponentGrid::from_fn(nz, ny, nt, |_, _, _| m + rng.random_range(-1.0..1.0));
        PlaneField {
            u: grid(mean),
            v: grid(0.0),
            w: grid(0.0),
        }
    }

    #[test]
    fn test_identity_mixing_reproduces_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let (nz, ny, nt) = (3, 4, 32);
        let planes: Vec<PlaneField> = (0..3).map(|_| random_plane(&mut rng, nz, ny, nt, 12.0)).collect();
        let freqs = FrequencyVector::new(nt, 0.1);
        let mixing = MixingOperator::identity(3, freqs.as_slice());

        let synth = SpectralSynthesizer::new(nt).unwrap();
        let out = synth.synthesize(&planes, &mixing, true).unwrap();

        for (a, b) in planes.iter().zip(&out) {
            assert!(a.u.max_abs_diff(&b.u) < 1e-10);
            assert!(a.w.max_abs_diff(&b.w) < 1e-10);
            assert_eq!(a.v, b.v);
        }
    }

    #[test]
    fn test_reference_plane_is_unchanged() {
        // Row 0 of a Cholesky factor of a unit-diagonal matrix is e_0
        let mut rng = StdRng::seed_from_u64(11);
        let (nz, ny, nt) = (2, 2, 64);
        let planes: Vec<PlaneField> = (0..2).map(|_| random_plane(&mut rng, nz, ny, nt, 8.0)).collect();
        let freqs = FrequencyVector::new(nt, 0.25);
        let coh = CoherenceMatrix::compute(
            &CoherenceModel::Exponential { a: 1.0, b: 0.0 },
            &[0.0, 50.0],
            &freqs,
            16.0,
        );
        let mixing = MixingOperator::factorize(&coh).unwrap();

        let out = SpectralSynthesizer::new(nt)
            .unwrap()
            .synthesize(&planes, &mixing, false)
            .unwrap();
        assert!(planes[0].u.max_abs_diff(&out[0].u) < 1e-10);
        assert!(planes[1].u.max_abs_diff(&out[1].u) > 1e-3);
        assert_eq!(planes[1].w, out[1].w);
    }

    #[test]
    fn test_mean_is_preserved_per_point() {
        let mut rng = StdRng::seed_from_u64(3);
        let nt = 16;
        let planes: Vec<PlaneField> = (0..2).map(|_| random_plane(&mut rng, 1, 1, nt, 10.0)).collect();
        let h = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.6, 0.8]);
        let coh = CoherenceMatrix::from_matrices(
            FrequencyVector::new(nt, 1.0).as_slice().to_vec(),
            vec![&h * h.transpose(); nt / 2],
        )
        .unwrap();
        let mixing = MixingOperator::factorize(&coh).unwrap();

        let out = SpectralSynthesizer::new(nt)
            .unwrap()
            .synthesize(&planes, &mixing, false)
            .unwrap();
        for (a, b) in planes.iter().zip(&out) {
            let mean_in: f64 = a.u.series(0, 0).iter().sum::<f64>() / nt as f64;
            let mean_out: f64 = b.u.series(0, 0).iter().sum::<f64>() / nt as f64;
            assert!((mean_in - mean_out).abs() < 1e-10);
        }
    }

    #[test]
    fn test_full_coherence_copies_reference_fluctuations() {
        // All-ones coherence: every plane gets plane 0's fluctuations
        let mut rng = StdRng::seed_from_u64(5);
        let nt = 32;
        let planes: Vec<PlaneField> = (0..3).map(|_| random_plane(&mut rng, 1, 2, nt, 9.0)).collect();
        let freqs = FrequencyVector::new(nt, 0.5);
        let coh = CoherenceMatrix::from_matrices(
            freqs.as_slice().to_vec(),
            vec![DMatrix::from_element(3, 3, 1.0); nt / 2],
        )
        .unwrap();
        let mixing = MixingOperator::factorize(&coh).unwrap();
        let out = SpectralSynthesizer::new(nt)
            .unwrap()
            .synthesize(&planes, &mixing, false)
            .unwrap();

        let reference = out[0].u.series(0, 1);
        let ref_mean = reference.iter().sum::<f64>() / nt as f64;
        for plane in &out[1..] {
            let series = plane.u.series(0, 1);
            let mean = series.iter().sum::<f64>() / nt as f64;
            for (a, b) in reference.iter().zip(series) {
                assert!(((a - ref_mean) - (b - mean)).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_mismatched_inputs_rejected() {
        let planes = vec![PlaneField::zeros(2, 2, 16); 2];
        let synth = SpectralSynthesizer::new(16).unwrap();

        let wrong_planes = MixingOperator::identity(3, FrequencyVector::new(16, 1.0).as_slice());
        assert!(synth.synthesize(&planes, &wrong_planes, false).is_err());

        let wrong_bins = MixingOperator::identity(2, FrequencyVector::new(32, 1.0).as_slice());
        assert!(synth.synthesize(&planes, &wrong_bins, false).is_err());

        let mut uneven = planes.clone();
        uneven[1] = PlaneField::zeros(2, 3, 16);
        let ok_mixing = MixingOperator::identity(2, FrequencyVector::new(16, 1.0).as_slice());
        assert!(synth.synthesize(&uneven, &ok_mixing, false).is_err());

        assert!(SpectralSynthesizer::new(15).is_err());
    }
}
