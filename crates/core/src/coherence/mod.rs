//! Longitudinal coherence between unfrozen planes
//!
//! Given plane offsets `x_i`, the separation of a plane pair is
//! `r = |x_i - x_j|`. Each model gives the squared coherence γ²(f, r); the
//! matrices built here hold γ itself.
//!
//! # Models
//!
//! - Exponential (Simley & Pao 2015, Eq. 4 and 7):
//!   ```text
//!   γ² = exp(-a·sqrt((f·r/U)² + (b·r)²))
//!   ```
//!   with user-defined `a`, `b`, or `a = 8.4·σ/U + 0.05`, `b = 0.25·L^(-1.24)`
//!   fitted to LES.
//! - Kristensen (1979), see [`kristensen`].
//!
//! # References
//! - Simley, E., & Pao, L. Y. (2015). "A longitudinal spatial coherence model
//!   for wind evolution based on large-eddy simulation." ACC 2015, 3708-3714.

pub mod kristensen;

use crate::config::{EvolutionModel, FrequencyVector, TurbulenceStatistics};
use crate::error::{EvoTurbError, Result};
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Coherence model with every parameter resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CoherenceModel {
    /// `γ² = exp(-a·sqrt((f·r/U)² + (b·r)²))`
    Exponential {
        /// Decay parameter
        a: f64,
        /// Decay offset parameter (1/m)
        b: f64,
    },
    /// Kristensen (1979)
    Kristensen {
        /// Combined RMS of u, v, w (m/s)
        sigma_total: f64,
        /// Longitudinal integral length scale (m)
        length_scale: f64,
    },
}

impl CoherenceModel {
    /// Turn a configured evolution model into a concrete one
    ///
    /// # Errors
    /// Returns a configuration error when the model needs statistics and
    /// none are available.
    pub fn resolve(
        model: &EvolutionModel,
        statistics: Option<&TurbulenceStatistics>,
        wind_speed: f64,
    ) -> Result<Self> {
        let statistics = || {
            statistics.ok_or_else(|| {
                EvoTurbError::configuration(format!(
                    "evolution model {} needs sigma_u, sigma_v, sigma_w and the integral length scale",
                    model.name()
                ))
            })
        };

        Ok(match *model {
            EvolutionModel::ExpUserDefined { a, b } => Self::Exponential { a, b },
            EvolutionModel::ExpSimley => {
                let stats = statistics()?;
                Self::Exponential {
                    a: 8.4 * stats.sigma_total() / wind_speed + 0.05,
                    b: 0.25 * stats.length_scale.powf(-1.24),
                }
            }
            EvolutionModel::Kristensen => {
                let stats = statistics()?;
                Self::Kristensen {
                    sigma_total: stats.sigma_total(),
                    length_scale: stats.length_scale,
                }
            }
        })
    }

    /// Squared coherence at frequency `f` (Hz) and separation `r` (m)
    #[must_use]
    pub fn squared_coherence(&self, f: f64, r: f64, wind_speed: f64) -> f64 {
        if r == 0.0 {
            return 1.0;
        }
        match *self {
            Self::Exponential { a, b } => {
                let reduced = f * r / wind_speed;
                (-a * (reduced * reduced + (b * r) * (b * r)).sqrt()).exp()
            }
            Self::Kristensen {
                sigma_total,
                length_scale,
            } => kristensen::squared_coherence(f, r, wind_speed, sigma_total, length_scale),
        }
    }

    /// Coherence (not squared)
    #[must_use]
    pub fn coherence(&self, f: f64, r: f64, wind_speed: f64) -> f64 {
        self.squared_coherence(f, r, wind_speed).sqrt()
    }
}

/// Symmetric plane×plane coherence matrix for every frequency
#[derive(Debug, Clone, PartialEq)]
pub struct CoherenceMatrix {
    frequencies: Vec<f64>,
    matrices: Vec<DMatrix<f64>>,
}

impl CoherenceMatrix {
    /// Evaluate `model` for every plane pair and frequency
    ///
    /// Frequencies are independent and evaluated in parallel.
    #[must_use]
    pub fn compute(
        model: &CoherenceModel,
        offsets: &[f64],
        frequencies: &FrequencyVector,
        wind_speed: f64,
    ) -> Self {
        let n = offsets.len();
        let separation = DMatrix::from_fn(n, n, |i, j| (offsets[i] - offsets[j]).abs());

        let matrices = frequencies
            .as_slice()
            .par_iter()
            .map(|&f| {
                DMatrix::from_fn(n, n, |i, j| {
                    if i == j {
                        1.0
                    } else {
                        model.coherence(f, separation[(i, j)], wind_speed)
                    }
                })
            })
            .collect();

        Self {
            frequencies: frequencies.as_slice().to_vec(),
            matrices,
        }
    }

    /// Wrap precomputed matrices, one per frequency
    ///
    /// # Errors
    /// Returns a configuration error if the counts differ or a matrix is
    /// not square.
    pub fn from_matrices(frequencies: Vec<f64>, matrices: Vec<DMatrix<f64>>) -> Result<Self> {
        if frequencies.len() != matrices.len() {
            return Err(EvoTurbError::configuration(format!(
                "{} frequencies but {} coherence matrices",
                frequencies.len(),
                matrices.len()
            )));
        }
        if let Some(bad) = matrices.iter().position(|m| !m.is_square()) {
            return Err(EvoTurbError::configuration(format!(
                "coherence matrix #{bad} is not square"
            )));
        }
        Ok(Self {
            frequencies,
            matrices,
        })
    }

    /// Number of frequencies
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// Whether there are no frequencies
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Number of planes
    #[must_use]
    pub fn plane_count(&self) -> usize {
        self.matrices.first().map_or(0, DMatrix::nrows)
    }

    /// Frequencies (Hz)
    #[must_use]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Matrix at frequency index `k`
    #[must_use]
    pub fn at(&self, k: usize) -> &DMatrix<f64> {
        &self.matrices[k]
    }

    /// All matrices, in frequency order
    #[must_use]
    pub fn matrices(&self) -> &[DMatrix<f64>] {
        &self.matrices
    }
}
