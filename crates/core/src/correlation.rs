//! Per-frequency Cholesky factorization of the coherence matrices
//!
//! The lower-triangular factor `H` of `C = H·Hᵗ` mixes independent plane
//! spectra into spectra whose cross-plane correlation follows `C`.
//! Perfectly coherent planes give a semi-definite `C`; those zero pivots
//! produce a rank-deficient `H` instead of an error. There is no
//! regularization: anything that is not positive semi-definite is fatal.

use crate::coherence::CoherenceMatrix;
use crate::error::{EvoTurbError, Result};
use nalgebra::DMatrix;
use rayon::prelude::*;
use tracing::debug;

/// Pivots with magnitude below this are treated as exact zeros
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Largest residual allowed below a zero pivot
const RESIDUAL_TOLERANCE: f64 = 1e-6;

/// Coherence entries may exceed 1 by rounding noise only
const ENTRY_TOLERANCE: f64 = 1e-12;

/// Lower-triangular Cholesky factor of a symmetric positive semi-definite matrix
///
/// Only the lower triangle of `matrix` is read.
///
/// # Errors
/// Returns a description of the failure when an entry lies outside
/// `[-1, 1]`, a pivot is negative, or a zero pivot leaves a non-zero
/// residual in its column.
pub fn cholesky_lower(matrix: &DMatrix<f64>) -> std::result::Result<DMatrix<f64>, String> {
    let n = matrix.nrows();
    if matrix.ncols() != n {
        return Err(format!("matrix is {}x{}, not square", n, matrix.ncols()));
    }
    if let Some(bad) = matrix
        .iter()
        .find(|v| !v.is_finite() || v.abs() > 1.0 + ENTRY_TOLERANCE)
    {
        return Err(format!("coherence entry {bad} outside [-1, 1]"));
    }

    let mut lower = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        let mut pivot = matrix[(j, j)];
        for k in 0..j {
            pivot -= lower[(j, k)] * lower[(j, k)];
        }

        if pivot < -PIVOT_TOLERANCE {
            return Err(format!("negative pivot {pivot:e} at row {j}"));
        }

        if pivot <= PIVOT_TOLERANCE {
            // Row j is a combination of earlier rows; the column below must vanish
            for i in (j + 1)..n {
                let mut residual = matrix[(i, j)];
                for k in 0..j {
                    residual -= lower[(i, k)] * lower[(j, k)];
                }
                if residual.abs() > RESIDUAL_TOLERANCE {
                    return Err(format!(
                        "zero pivot at row {j} with residual {residual:e} in row {i}"
                    ));
                }
            }
            continue;
        }

        let diag = pivot.sqrt();
        lower[(j, j)] = diag;
        for i in (j + 1)..n {
            let mut sum = matrix[(i, j)];
            for k in 0..j {
                sum -= lower[(i, k)] * lower[(j, k)];
            }
            lower[(i, j)] = sum / diag;
        }
    }
    Ok(lower)
}

/// Lower-triangular mixing matrix for every frequency
#[derive(Debug, Clone, PartialEq)]
pub struct MixingOperator {
    frequencies: Vec<f64>,
    factors: Vec<DMatrix<f64>>,
}

impl MixingOperator {
    /// Factorize every coherence matrix, in parallel over frequencies
    ///
    /// # Errors
    /// Returns a numerical error for the lowest frequency index whose
    /// matrix cannot be factorized.
    pub fn factorize(coherence: &CoherenceMatrix) -> Result<Self> {
        let results: Vec<_> = coherence
            .matrices()
            .par_iter()
            .map(cholesky_lower)
            .collect();

        let mut factors = Vec::with_capacity(results.len());
        for (k, result) in results.into_iter().enumerate() {
            match result {
                Ok(factor) => factors.push(factor),
                Err(message) => {
                    return Err(EvoTurbError::Numerical {
                        frequency_index: k,
                        frequency: coherence.frequencies()[k],
                        message,
                    })
                }
            }
        }

        debug!(
            frequencies = factors.len(),
            planes = coherence.plane_count(),
            "Factorized coherence matrices"
        );

        Ok(Self {
            frequencies: coherence.frequencies().to_vec(),
            factors,
        })
    }

    /// Identity mixing (planes left independent) at every frequency
    #[must_use]
    pub fn identity(plane_count: usize, frequencies: &[f64]) -> Self {
        Self {
            frequencies: frequencies.to_vec(),
            factors: vec![DMatrix::identity(plane_count, plane_count); frequencies.len()],
        }
    }

    /// Number of frequencies
    #[must_use]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether there are no frequencies
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Number of planes
    #[must_use]
    pub fn plane_count(&self) -> usize {
        self.factors.first().map_or(0, DMatrix::nrows)
    }

    /// Frequencies (Hz)
    #[must_use]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Factor at frequency index `k`
    #[must_use]
    pub fn at(&self, k: usize) -> &DMatrix<f64> {
        &self.factors[k]
    }

    /// Largest `|H·Hᵗ - C|` over all frequencies and entries
    #[must_use]
    pub fn reconstruction_error(&self, coherence: &CoherenceMatrix) -> f64 {
        self.factors
            .iter()
            .zip(coherence.matrices())
            .map(|(h, c)| (h * h.transpose() - c).amax())
            .fold(0.0, f64::max)
    }
}
