//! Batch driver: decode → derive → coherence → factorization → synthesis → encode
//!
//! Each stage is also exposed on its own so callers can stop after
//! synthesis (e.g. to inspect the merged field) or feed planes that did not
//! come from disk.

use crate::codec::{read_mann_plane, read_wnd, write_evo, BinaryScaling};
use crate::coherence::CoherenceMatrix;
use crate::config::{Configuration, DerivedParameters, TurbulenceModel};
use crate::core_types::{MergedField, PlaneField};
use crate::correlation::MixingOperator;
use crate::error::{EvoTurbError, Result};
use crate::spectral::SpectralSynthesizer;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Relative mismatch between a decoded and configured time step that is
/// reported
const TIME_STEP_TOLERANCE: f64 = 1e-3;

/// Files holding one independent plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaneSource {
    /// `TurbSim` grid file; the summary is the same path with `.sum`
    Wnd(PathBuf),
    /// Mann generator component files
    Mann {
        /// Longitudinal component
        u: PathBuf,
        /// Transverse component
        v: PathBuf,
        /// Vertical component
        w: PathBuf,
    },
}

/// Decoded planes in configuration order
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedPlanes {
    /// One field per configured offset
    pub planes: Vec<PlaneField>,
    /// Dequantization of the reference plane, for `.wnd` inputs
    pub reference_scaling: Option<BinaryScaling>,
}

/// Decode one plane per configured offset
///
/// # Errors
/// Returns a configuration error if the source count or kind does not match
/// the configuration, or a decoded grid differs from the configured one.
/// Codec errors are passed through. Every per-plane error carries the plane
/// index.
pub fn import_planes(config: &Configuration, sources: &[PlaneSource]) -> Result<ImportedPlanes> {
    config.validate()?;
    if sources.len() != config.plane_offsets.len() {
        return Err(EvoTurbError::configuration(format!(
            "{} plane sources for {} configured planes",
            sources.len(),
            config.plane_offsets.len()
        )));
    }

    let grid = &config.grid;
    let mut planes = Vec::with_capacity(sources.len());
    let mut reference_scaling = None;

    for (i, source) in sources.iter().enumerate() {
        let plane = match (&config.turbulence_model, source) {
            (TurbulenceModel::Kaimal { .. }, PlaneSource::Wnd(path)) => {
                let decoded = read_wnd(path).map_err(|e| e.in_plane(i))?;
                if (decoded.dt - grid.dt).abs() > TIME_STEP_TOLERANCE * grid.dt {
                    warn!(
                        plane = i,
                        decoded = decoded.dt,
                        configured = grid.dt,
                        "Decoded time step differs from configuration"
                    );
                }
                if i == 0 {
                    reference_scaling = Some(decoded.scaling);
                }
                decoded.field
            }
            (TurbulenceModel::Mann { .. }, PlaneSource::Mann { u, v, w }) => {
                read_mann_plane(u, v, w, grid.nz, grid.ny, grid.nt).map_err(|e| e.in_plane(i))?
            }
            _ => {
                return Err(EvoTurbError::configuration(
                    "plane source does not match the configured turbulence model",
                )
                .in_plane(i))
            }
        };

        let expected = (grid.nz, grid.ny, grid.nt);
        if plane.shape() != expected {
            let (nz, ny, nt) = plane.shape();
            return Err(EvoTurbError::configuration(format!(
                "decoded grid {nz}x{ny}x{nt} differs from configured {}x{}x{}",
                expected.0, expected.1, expected.2
            ))
            .in_plane(i));
        }
        debug!(plane = i, offset = config.plane_offsets[i], "Imported plane");
        planes.push(plane);
    }

    info!(planes = planes.len(), "Imported independent planes");
    Ok(ImportedPlanes {
        planes,
        reference_scaling,
    })
}

/// Impose longitudinal coherence on independent planes
///
/// # Errors
/// Returns a numerical error if a coherence matrix cannot be factorized and
/// a configuration error if the planes do not match `derived`.
pub fn unfreeze(
    config: &Configuration,
    derived: &DerivedParameters,
    planes: &[PlaneField],
) -> Result<MergedField> {
    info!(
        model = config.evolution_model.name(),
        planes = derived.plane_count,
        frequencies = derived.frequencies.len(),
        "Computing longitudinal coherence"
    );
    let coherence = CoherenceMatrix::compute(
        &derived.coherence_model,
        &derived.plane_offsets,
        &derived.frequencies,
        derived.wind_speed,
    );
    let mixing = MixingOperator::factorize(&coherence)?;

    let synthesizer = SpectralSynthesizer::new(config.grid.nt)?;
    let planes = synthesizer.synthesize(
        planes,
        &mixing,
        config.turbulence_model.couples_vertical_component(),
    )?;

    Ok(MergedField {
        offsets: derived.plane_offsets.clone(),
        planes,
    })
}

/// Scaling used to quantize the exported field
///
/// Mann boxes use offset 0 and scale `γ/1000`; Kaimal boxes reuse the
/// reference plane's `.wnd` scaling.
///
/// # Errors
/// Returns a configuration error for Kaimal boxes without a decoded
/// reference scaling.
pub fn export_scaling(config: &Configuration, imported: &ImportedPlanes) -> Result<BinaryScaling> {
    match config.turbulence_model {
        TurbulenceModel::Mann { gamma, .. } => Ok(BinaryScaling::from_mann_gamma(gamma)),
        TurbulenceModel::Kaimal { .. } => imported.reference_scaling.ok_or_else(|| {
            EvoTurbError::configuration("Kaimal export needs the reference plane's .wnd scaling")
        }),
    }
}

/// Run the whole batch and write the `.evo` file to `output`
///
/// # Errors
/// Any stage error, see [`import_planes`], [`unfreeze`] and
/// [`write_evo`].
pub fn run<P: AsRef<Path>>(
    config: &Configuration,
    sources: &[PlaneSource],
    output: P,
) -> Result<MergedField> {
    let derived = config.derive()?;
    let imported = import_planes(config, sources)?;
    let merged = unfreeze(config, &derived, &imported.planes)?;
    let scaling = export_scaling(config, &imported)?;
    write_evo(output, &merged, &scaling)?;
    Ok(merged)
}
