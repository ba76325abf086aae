//! Run configuration
//!
//! [`Configuration`] is the immutable record handed over by whoever prepared
//! the 3D turbulence boxes. Everything computed from it (frequency vector,
//! turbulence statistics, resolved coherence model) lives in
//! [`DerivedParameters`], produced by the pure [`Configuration::derive`] step.

mod derived;
mod turbulence_class;

pub use derived::{DerivedParameters, FrequencyVector};
pub use turbulence_class::TurbulenceClass;

use crate::error::{EvoTurbError, Result};
use serde::{Deserialize, Serialize};

/// Relative tolerance used when checking `duration == nt * dt`
const DURATION_TOLERANCE: f64 = 1e-6;

/// Grid resolution and spacing of every 3D turbulence box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of horizontal (y) points
    pub ny: usize,
    /// Number of vertical (z) points
    pub nz: usize,
    /// Number of time samples
    pub nt: usize,
    /// Horizontal grid step (m)
    pub dy: f64,
    /// Vertical grid step (m)
    pub dz: f64,
    /// Time step (s)
    pub dt: f64,
    /// Total simulated time (s), checked against `nt * dt` when present
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            ny: 32,
            nz: 32,
            nt: 2048,
            dy: 5.0,
            dz: 5.0,
            dt: 0.25,
            duration: None,
        }
    }
}

/// Generator that produced the independent 3D boxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TurbulenceModel {
    /// IEC Kaimal spectrum (`TurbSim` `.wnd` + `.sum` files)
    Kaimal {
        /// IEC turbulence class used to derive statistics
        turbulence_class: TurbulenceClass,
    },
    /// Mann uniform-shear model (three `.bin` files per plane)
    Mann {
        /// Spectral tensor energy parameter αε^(2/3)
        alpha_epsilon: f64,
        /// Mann turbulence length scale (m)
        length_scale: f64,
        /// Shear distortion parameter Γ
        gamma: f64,
    },
}

impl TurbulenceModel {
    /// Whether the generator also emits a w field coupled to u
    ///
    /// The Mann tensor correlates u and w, so the same mixing must be
    /// applied to both to keep the u-w cross spectrum intact.
    #[must_use]
    pub fn couples_vertical_component(&self) -> bool {
        matches!(self, Self::Mann { .. })
    }
}

/// Longitudinal coherence model selected by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum EvolutionModel {
    /// Exponential model with user-supplied decay parameters
    #[serde(rename = "Exp-UserDefined")]
    ExpUserDefined {
        /// Coherence decay parameter
        a: f64,
        /// Coherence decay offset parameter (1/m)
        b: f64,
    },
    /// Exponential model parameterized from LES statistics (Simley & Pao 2015)
    #[serde(rename = "Exp-Simley")]
    ExpSimley,
    /// Kristensen (1979) physically derived model
    #[serde(rename = "Kristensen")]
    Kristensen,
}

impl EvolutionModel {
    /// Resolve a model from its name
    ///
    /// `user_parameters` supplies `(a, b)` and is only read for
    /// `Exp-UserDefined`.
    ///
    /// # Errors
    /// Returns a configuration error for unknown names or when
    /// `Exp-UserDefined` is chosen without parameters.
    pub fn from_name(name: &str, user_parameters: Option<(f64, f64)>) -> Result<Self> {
        match name.trim() {
            "Exp-UserDefined" => {
                let (a, b) = user_parameters.ok_or_else(|| {
                    EvoTurbError::configuration("Exp-UserDefined requires parameters a and b")
                })?;
                Ok(Self::ExpUserDefined { a, b })
            }
            "Exp-Simley" => Ok(Self::ExpSimley),
            "Kristensen" => Ok(Self::Kristensen),
            other => Err(EvoTurbError::configuration(format!(
                "unknown evolution model '{other}', expected Exp-UserDefined, Exp-Simley or Kristensen"
            ))),
        }
    }

    /// Name used in configuration files
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExpUserDefined { .. } => "Exp-UserDefined",
            Self::ExpSimley => "Exp-Simley",
            Self::Kristensen => "Kristensen",
        }
    }

    /// Whether the model needs turbulence statistics
    #[must_use]
    pub fn needs_statistics(&self) -> bool {
        !matches!(self, Self::ExpUserDefined { .. })
    }
}

/// Velocity standard deviations and longitudinal integral length scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurbulenceStatistics {
    /// Standard deviation of u (m/s)
    pub sigma_u: f64,
    /// Standard deviation of v (m/s)
    pub sigma_v: f64,
    /// Standard deviation of w (m/s)
    pub sigma_w: f64,
    /// Integral length scale of u (m)
    pub length_scale: f64,
}

impl TurbulenceStatistics {
    /// Statistics of the IEC Kaimal model for a turbulence class
    ///
    /// `σ_u` is the 90% quantile representative value
    /// `I_ref·(0.75·U + 5.6)` (IEC 61400-1:2005 §6.3.1.3), `σ_v = 0.8σ_u`,
    /// `σ_w = 0.5σ_u`. The longitudinal scale parameter Λ is `0.7·H` below
    /// 60 m and 42 m above, and `L_u = 8.1·Λ`.
    #[must_use]
    pub fn from_iec_class(class: TurbulenceClass, wind_speed: f64, reference_height: f64) -> Self {
        let sigma_u = class.reference_intensity() * (0.75 * wind_speed + 5.6);
        let lambda = if reference_height > 60.0 {
            42.0
        } else {
            0.7 * reference_height
        };
        Self {
            sigma_u,
            sigma_v: 0.8 * sigma_u,
            sigma_w: 0.5 * sigma_u,
            length_scale: 8.1 * lambda,
        }
    }

    /// Combined RMS of the three components
    #[must_use]
    pub fn sigma_total(&self) -> f64 {
        (self.sigma_u.powi(2) + self.sigma_v.powi(2) + self.sigma_w.powi(2)).sqrt()
    }
}

/// Immutable run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Generator of the independent planes
    pub turbulence_model: TurbulenceModel,
    /// Streamwise offsets of the planes (m), turbine plane 0 first
    pub plane_offsets: Vec<f64>,
    /// Grid of each 3D box
    pub grid: GridConfig,
    /// Reference (hub height) mean wind speed (m/s)
    pub reference_wind_speed: f64,
    /// Height of the reference wind speed (m)
    pub reference_height: f64,
    /// Coherence model
    pub evolution_model: EvolutionModel,
    /// Statistics for the derived models; Kaimal falls back to the IEC table
    #[serde(default)]
    pub statistics: Option<TurbulenceStatistics>,
}

impl Configuration {
    /// Check every invariant of the record
    ///
    /// # Errors
    /// Returns a configuration error naming the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.plane_offsets.is_empty() {
            return Err(EvoTurbError::configuration("at least one plane is required"));
        }
        for (i, &x) in self.plane_offsets.iter().enumerate() {
            if !x.is_finite() || x < 0.0 {
                return Err(EvoTurbError::configuration(format!(
                    "plane offset #{i} must be finite and non-negative, got {x}"
                )));
            }
            if self.plane_offsets[..i].contains(&x) {
                return Err(EvoTurbError::configuration(format!(
                    "plane offset {x} is repeated; offsets must be unique"
                )));
            }
        }
        if self.plane_offsets[0] != 0.0 {
            return Err(EvoTurbError::configuration(
                "the first plane offset must be 0 (the turbine plane)",
            ));
        }

        let grid = &self.grid;
        if grid.ny == 0 || grid.nz == 0 {
            return Err(EvoTurbError::configuration(format!(
                "grid must have at least one point, got ny={} nz={}",
                grid.ny, grid.nz
            )));
        }
        if grid.nt < 2 || !grid.nt.is_multiple_of(2) {
            return Err(EvoTurbError::configuration(format!(
                "time sample count must be even and at least 2, got {}",
                grid.nt
            )));
        }
        for (name, step) in [("dy", grid.dy), ("dz", grid.dz), ("dt", grid.dt)] {
            if !(step.is_finite() && step > 0.0) {
                return Err(EvoTurbError::configuration(format!(
                    "grid step {name} must be finite and positive, got {step}"
                )));
            }
        }
        if let Some(duration) = grid.duration {
            let expected = grid.nt as f64 * grid.dt;
            if (duration - expected).abs() > DURATION_TOLERANCE * expected.max(1.0) {
                return Err(EvoTurbError::configuration(format!(
                    "duration {duration} s does not match nt * dt = {expected} s"
                )));
            }
        }
        if matches!(self.turbulence_model, TurbulenceModel::Mann { .. }) {
            for (name, n) in [("nt", grid.nt), ("ny", grid.ny), ("nz", grid.nz)] {
                if !n.is_power_of_two() {
                    return Err(EvoTurbError::configuration(format!(
                        "Mann turbulence boxes require power-of-two dimensions, {name} = {n}"
                    )));
                }
            }
        }

        if !(self.reference_wind_speed.is_finite() && self.reference_wind_speed > 0.0) {
            return Err(EvoTurbError::configuration(format!(
                "reference wind speed must be positive, got {}",
                self.reference_wind_speed
            )));
        }
        if let Some(stats) = &self.statistics {
            if !(stats.length_scale > 0.0 && stats.sigma_total() > 0.0) {
                return Err(EvoTurbError::configuration(
                    "turbulence statistics need a positive length scale and non-zero sigma",
                ));
            }
        }
        Ok(())
    }

    /// Statistics used by the derived coherence models
    ///
    /// Explicit statistics win; otherwise the Kaimal model derives them from
    /// its IEC class. Returns `None` when neither is available.
    #[must_use]
    pub fn resolve_statistics(&self) -> Option<TurbulenceStatistics> {
        if let Some(stats) = self.statistics {
            return Some(stats);
        }
        match &self.turbulence_model {
            TurbulenceModel::Kaimal { turbulence_class } => Some(
                TurbulenceStatistics::from_iec_class(
                    *turbulence_class,
                    self.reference_wind_speed,
                    self.reference_height,
                ),
            ),
            TurbulenceModel::Mann { .. } => None,
        }
    }

    /// Validate and compute every derived quantity
    ///
    /// # Errors
    /// Returns a configuration error if validation fails or the chosen
    /// evolution model needs statistics that cannot be resolved.
    pub fn derive(&self) -> Result<DerivedParameters> {
        self.validate()?;
        DerivedParameters::from_config(self)
    }
}
