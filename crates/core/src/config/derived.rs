//! Quantities derived from a validated [`Configuration`]

use super::{Configuration, TurbulenceStatistics};
use crate::coherence::CoherenceModel;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Positive one-sided frequencies `f_j = j·df`, `j = 1..=nt/2`
///
/// The last entry is the Nyquist frequency. Entry `k` corresponds to DFT
/// bin `k + 1` of an `nt`-sample series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyVector {
    step: f64,
    values: Vec<f64>,
}

impl FrequencyVector {
    /// Frequencies for `nt` samples spaced `dt` apart
    #[must_use]
    pub fn new(nt: usize, dt: f64) -> Self {
        let step = 1.0 / (nt as f64 * dt);
        let values = (1..=nt / 2).map(|j| j as f64 * step).collect();
        Self { step, values }
    }

    /// Frequency resolution `df` (Hz)
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of frequencies
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Frequencies (Hz)
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Result of [`Configuration::derive`]
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedParameters {
    /// Number of planes
    pub plane_count: usize,
    /// Plane offsets copied from the configuration (m)
    pub plane_offsets: Vec<f64>,
    /// Reference wind speed (m/s)
    pub wind_speed: f64,
    /// Sampling frequency `1/dt` (Hz)
    pub sampling_frequency: f64,
    /// Nyquist frequency (Hz)
    pub nyquist_frequency: f64,
    /// Streamwise step of the frozen box, `U·dt` (m)
    pub streamwise_step: f64,
    /// One-sided frequency vector
    pub frequencies: FrequencyVector,
    /// Statistics, when the configuration provides or implies them
    pub statistics: Option<TurbulenceStatistics>,
    /// Coherence model with all parameters resolved
    pub coherence_model: CoherenceModel,
}

impl DerivedParameters {
    pub(super) fn from_config(config: &Configuration) -> Result<Self> {
        let grid = &config.grid;
        let statistics = config.resolve_statistics();
        let coherence_model = CoherenceModel::resolve(
            &config.evolution_model,
            statistics.as_ref(),
            config.reference_wind_speed,
        )?;
        let sampling_frequency = 1.0 / grid.dt;

        Ok(Self {
            plane_count: config.plane_offsets.len(),
            plane_offsets: config.plane_offsets.clone(),
            wind_speed: config.reference_wind_speed,
            sampling_frequency,
            nyquist_frequency: sampling_frequency / 2.0,
            streamwise_step: config.reference_wind_speed * grid.dt,
            frequencies: FrequencyVector::new(grid.nt, grid.dt),
            statistics,
            coherence_model,
        })
    }
}
