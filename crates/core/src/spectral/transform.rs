//! One-sided spectra of real time series
//!
//! For an `nt`-sample series the positive-frequency bins `1..=nt/2` are kept;
//! bin `j` sits at frequency `j·df`, so entry `k` of a one-sided spectrum
//! lines up with entry `k` of the frequency vector. The DC bin is always zero
//! because the mean is removed first and stored separately.

use crate::error::{EvoTurbError, Result};
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Forward/inverse FFT pair for series of one length
#[derive(Clone)]
pub struct SpectralTransform {
    nt: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("nt", &self.nt)
            .finish()
    }
}

/// Fluctuation spectrum of one series plus the mean that was removed
#[derive(Debug, Clone, PartialEq)]
pub struct OneSidedSpectrum {
    /// Time mean of the series
    pub mean: f64,
    /// Bins `1..=nt/2`
    pub bins: Vec<Complex64>,
}

impl SpectralTransform {
    /// Plan transforms for `nt` samples
    ///
    /// # Errors
    /// Returns a configuration error if `nt` is odd or smaller than 2.
    pub fn new(nt: usize) -> Result<Self> {
        if nt < 2 || !nt.is_multiple_of(2) {
            return Err(EvoTurbError::configuration(format!(
                "time sample count must be even and at least 2, got {nt}"
            )));
        }
        let mut planner = FftPlanner::new();
        Ok(Self {
            nt,
            forward: planner.plan_fft_forward(nt),
            inverse: planner.plan_fft_inverse(nt),
        })
    }

    /// Series length
    #[must_use]
    pub fn len(&self) -> usize {
        self.nt
    }

    /// Always false; a transform has at least two samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of one-sided bins (`nt/2`)
    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.nt / 2
    }

    /// Remove the mean and return the positive-frequency bins
    #[must_use]
    pub fn analyze(&self, series: &[f64]) -> OneSidedSpectrum {
        assert_eq!(series.len(), self.nt, "Series length mismatch");
        let mean = series.iter().sum::<f64>() / self.nt as f64;

        let mut buffer: Vec<Complex64> = series
            .iter()
            .map(|&x| Complex64::new(x - mean, 0.0))
            .collect();
        self.forward.process(&mut buffer);

        OneSidedSpectrum {
            mean,
            bins: buffer[1..=self.bin_count()].to_vec(),
        }
    }

    /// Rebuild a real series from positive-frequency bins, then add `mean`
    ///
    /// The full spectrum is made Hermitian (DC zero, Nyquist real) and the
    /// inverse is scaled by `1/nt`, so `synthesize(analyze(x)) == x` up to
    /// rounding.
    pub fn synthesize(&self, bins: &[Complex64], mean: f64, out: &mut [f64]) {
        let half = self.bin_count();
        assert_eq!(bins.len(), half, "Bin count mismatch");
        assert_eq!(out.len(), self.nt, "Output length mismatch");

        let mut buffer = vec![Complex64::new(0.0, 0.0); self.nt];
        for j in 1..half {
            buffer[j] = bins[j - 1];
            buffer[self.nt - j] = bins[j - 1].conj();
        }
        buffer[half] = Complex64::new(bins[half - 1].re, 0.0);

        self.inverse.process(&mut buffer);

        let scale = 1.0 / self.nt as f64;
        for (sample, value) in out.iter_mut().zip(&buffer) {
            *sample = value.re * scale + mean;
        }
    }
}
