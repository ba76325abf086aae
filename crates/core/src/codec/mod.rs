//! Binary turbulence box formats
//!
//! - [`wnd`]: `TurbSim`/Bladed `.wnd` grid files (legacy and extended header)
//!   with their [`summary`] `.sum` companion
//! - [`mann`]: Mann generator `_u/_v/_w.bin` float files
//! - [`evo`]: the 4D `.evo` container written after unfreezing
//!
//! Every format is little-endian. Quantized formats store
//! `raw = trunc((value - offset) / scale)` per velocity component, see
//! [`BinaryScaling`].

pub mod evo;
pub mod mann;
pub mod summary;
pub mod wnd;

pub use evo::{read_evo, write_evo};
pub use mann::{read_mann_component, read_mann_plane};
pub use summary::SummaryMetadata;
pub use wnd::{read_wnd, summary_path, GridGeometry, TurbulenceBox, WndHeader, WndLayout};

use crate::core_types::VelocityComponent;
use crate::error::{EvoTurbError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Per-component dequantization `value = raw·scale + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinaryScaling {
    /// Scale of u, v, w
    pub scale: [f64; 3],
    /// Offset of u, v, w
    pub offset: [f64; 3],
}

impl BinaryScaling {
    /// Scaling of `.wnd` payloads: `1e-5·Ū·TI_k` with TI in percent, u offset Ū
    #[must_use]
    pub fn from_wind_statistics(mean_speed: f64, turbulence_intensity: [f64; 3]) -> Self {
        Self {
            scale: turbulence_intensity.map(|ti| 1e-5 * mean_speed * ti),
            offset: [mean_speed, 0.0, 0.0],
        }
    }

    /// Export scaling for Mann boxes: no offset, scale `γ/1000`
    #[must_use]
    pub fn from_mann_gamma(gamma: f64) -> Self {
        Self {
            scale: [gamma / 1000.0; 3],
            offset: [0.0; 3],
        }
    }

    /// Physical value of a stored sample
    #[must_use]
    pub fn dequantize(&self, component: VelocityComponent, raw: i16) -> f64 {
        let k = component.index();
        f64::from(raw) * self.scale[k] + self.offset[k]
    }

    /// Stored sample of a physical value, truncated toward zero
    ///
    /// Values outside the `i16` range saturate; NaN maps to 0.
    #[must_use]
    pub fn quantize(&self, component: VelocityComponent, value: f64) -> i16 {
        let k = component.index();
        ((value - self.offset[k]) / self.scale[k]) as i16
    }

    /// Check every scale is finite and non-zero
    ///
    /// # Errors
    /// Returns a configuration error naming the offending component.
    pub fn validate(&self) -> Result<()> {
        for component in VelocityComponent::ALL {
            let k = component.index();
            let (scale, offset) = (self.scale[k], self.offset[k]);
            if !scale.is_finite() || scale == 0.0 || !offset.is_finite() {
                return Err(EvoTurbError::configuration(format!(
                    "binary scaling of {component:?} is unusable (scale {scale}, offset {offset})"
                )));
            }
        }
        Ok(())
    }
}

/// Fail with an I/O error if `path` does not exist
pub(crate) fn require_file(path: &Path) -> Result<()> {
    fs::metadata(path)
        .map(|_| ())
        .map_err(|e| EvoTurbError::io(path, e))
}

/// Little-endian primitive reader that maps short reads to format errors
pub(crate) struct LittleEndianReader<'a, R> {
    inner: R,
    path: &'a Path,
    position: u64,
}

impl<'a, R: Read> LittleEndianReader<'a, R> {
    pub(crate) fn new(inner: R, path: &'a Path) -> Self {
        Self {
            inner,
            path,
            position: 0,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        self.path
    }

    /// Bytes consumed so far
    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    /// Fill `buf` completely; `what` names the record for error messages
    pub(crate) fn read_bytes(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        self.inner.read_exact(buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                EvoTurbError::file_format(self.path, format!("file ends inside {what}"))
            } else {
                EvoTurbError::io(self.path, e)
            }
        })?;
        self.position += buf.len() as u64;
        Ok(())
    }

    pub(crate) fn read_i16(&mut self, what: &str) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.read_bytes(&mut buf, what)?;
        Ok(i16::from_le_bytes(buf))
    }

    pub(crate) fn read_u16(&mut self, what: &str) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_bytes(&mut buf, what)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub(crate) fn read_i32(&mut self, what: &str) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_bytes(&mut buf, what)?;
        Ok(i32::from_le_bytes(buf))
    }

    pub(crate) fn read_f32(&mut self, what: &str) -> Result<f64> {
        let mut buf = [0u8; 4];
        self.read_bytes(&mut buf, what)?;
        Ok(f64::from(f32::from_le_bytes(buf)))
    }

    /// Read `count` consecutive `i16` values into `out`
    pub(crate) fn read_i16_slice(&mut self, out: &mut [i16], what: &str) -> Result<()> {
        let mut bytes = vec![0u8; out.len() * 2];
        self.read_bytes(&mut bytes, what)?;
        for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(2)) {
            *value = i16::from_le_bytes([chunk[0], chunk[1]]);
        }
        Ok(())
    }

    /// Discard `count` records of `width` bytes
    pub(crate) fn skip(&mut self, count: usize, width: usize, what: &str) -> Result<()> {
        let mut bytes = vec![0u8; count * width];
        self.read_bytes(&mut bytes, what)
    }
}
