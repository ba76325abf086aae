//! `TurbSim`/Bladed `.wnd` full-field grid files
//!
//! The first `i16` selects the header layout:
//!
//! | marker | layout   | header fields                                          |
//! |--------|----------|--------------------------------------------------------|
//! | `-99`  | extended | `i16` fc, `i32` n, `f32` lat, z0, zref, TI u/v/w (%),  |
//! |        |          | dz, dy, dx, `i32` nt/2, `f32` Ū, 3 `f32` + 2 `i32`,     |
//! |        |          | `i32` nz, ny, `3(n-1)` `i32`                           |
//! | `-n`   | legacy   | `i16` dz, dy, dx (mm), nt/2, 10·Ū, 5 unused,           |
//! |        |          | 1000·nz, 1000·ny (as `u16`), `3(n-1)` unused           |
//!
//! After the header, each time step holds `nz × ny × 3` `i16` samples with
//! the component varying fastest, then the horizontal index, then the
//! vertical index. Clockwise boxes store the horizontal axis right to left.

use super::{require_file, BinaryScaling, LittleEndianReader, SummaryMetadata};
use crate::core_types::{PlaneField, VelocityComponent};
use crate::error::{EvoTurbError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Marker of the extended header
const EXTENDED_MARKER: i16 = -99;

/// Only full u/v/w boxes are supported
const COMPONENT_COUNT: usize = 3;

/// Header layout of a `.wnd` file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WndLayout {
    /// 16-bit header with implied unit factors
    Legacy,
    /// 32-bit header carrying turbulence intensities
    Extended,
}

/// Decoded `.wnd` header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WndHeader {
    /// Which layout the file uses
    pub layout: WndLayout,
    /// Number of vertical points
    pub nz: usize,
    /// Number of horizontal points
    pub ny: usize,
    /// Number of time steps (twice the stored half count)
    pub nt: usize,
    /// Vertical step (m)
    pub dz: f64,
    /// Horizontal step (m)
    pub dy: f64,
    /// Streamwise step (m)
    pub dx: f64,
    /// Mean full-field wind speed (m/s); zero when the header left it blank
    pub mean_speed: f64,
    /// Turbulence intensity of u, v, w (%), extended layout only
    pub turbulence_intensity: Option<[f64; 3]>,
    /// Reference height `z1 + grid height / 2` (m), extended layout only
    pub reference_height: Option<f64>,
    /// Latitude (deg), extended layout only
    pub latitude: Option<f64>,
    /// Roughness length (m), extended layout only
    pub roughness_length: Option<f64>,
}

impl WndHeader {
    pub(crate) fn read<R: std::io::Read>(reader: &mut LittleEndianReader<'_, R>) -> Result<Self> {
        let marker = reader.read_i16("header marker")?;
        if marker == EXTENDED_MARKER {
            Self::read_extended(reader)
        } else if marker < 0 {
            let components = usize::from(marker.unsigned_abs());
            check_component_count(reader.path(), components)?;
            Self::read_legacy(reader, components)
        } else {
            Err(EvoTurbError::file_format(
                reader.path(),
                format!("unexpected header marker {marker}"),
            ))
        }
    }

    fn read_legacy<R: std::io::Read>(
        reader: &mut LittleEndianReader<'_, R>,
        components: usize,
    ) -> Result<Self> {
        const WHAT: &str = "legacy header";
        let dz = f64::from(reader.read_i16(WHAT)?) * 0.001;
        let dy = f64::from(reader.read_i16(WHAT)?) * 0.001;
        let dx = f64::from(reader.read_i16(WHAT)?) * 0.001;
        let half = i32::from(reader.read_i16(WHAT)?);
        let mean_speed = f64::from(reader.read_i16(WHAT)?) * 0.1;
        reader.skip(5, 2, WHAT)?;
        // Grids above 32 points overflow i16; the u16 view keeps them readable
        let nz = usize::from(reader.read_u16(WHAT)? / 1000);
        let ny = usize::from(reader.read_u16(WHAT)? / 1000);
        reader.skip(3 * (components - 1), 2, WHAT)?;

        Ok(Self {
            layout: WndLayout::Legacy,
            nz,
            ny,
            nt: time_count(half),
            dz,
            dy,
            dx,
            mean_speed,
            turbulence_intensity: None,
            reference_height: None,
            latitude: None,
            roughness_length: None,
        })
    }

    fn read_extended<R: std::io::Read>(reader: &mut LittleEndianReader<'_, R>) -> Result<Self> {
        const WHAT: &str = "extended header";
        let _fc = reader.read_i16(WHAT)?;
        let components = reader.read_i32(WHAT)?;
        let components = usize::try_from(components).map_err(|_| {
            EvoTurbError::file_format(reader.path(), format!("component count {components}"))
        })?;
        check_component_count(reader.path(), components)?;

        let latitude = reader.read_f32(WHAT)?;
        let roughness_length = reader.read_f32(WHAT)?;
        let reference_height = reader.read_f32(WHAT)?;
        let ti_u = reader.read_f32(WHAT)?;
        let ti_v = reader.read_f32(WHAT)?;
        let ti_w = reader.read_f32(WHAT)?;
        let dz = reader.read_f32(WHAT)?;
        let dy = reader.read_f32(WHAT)?;
        let dx = reader.read_f32(WHAT)?;
        let half = reader.read_i32(WHAT)?;
        let mean_speed = reader.read_f32(WHAT)?;
        reader.skip(3, 4, WHAT)?;
        reader.skip(2, 4, WHAT)?;
        let nz = reader.read_i32(WHAT)?;
        let ny = reader.read_i32(WHAT)?;
        reader.skip(3 * (components - 1), 4, WHAT)?;

        let dimension = |name: &str, n: i32| {
            usize::try_from(n).map_err(|_| {
                EvoTurbError::file_format(reader.path(), format!("negative grid size {name} = {n}"))
            })
        };

        Ok(Self {
            layout: WndLayout::Extended,
            nz: dimension("nz", nz)?,
            ny: dimension("ny", ny)?,
            nt: time_count(half),
            dz,
            dy,
            dx,
            mean_speed,
            turbulence_intensity: Some([ti_u, ti_v, ti_w]),
            reference_height: Some(reference_height),
            latitude: Some(latitude),
            roughness_length: Some(roughness_length),
        })
    }

    /// Summary fields this header already provides
    fn known_summary_fields(&self) -> SummaryMetadata {
        SummaryMetadata {
            mean_speed: (self.mean_speed != 0.0).then_some(self.mean_speed),
            turbulence_intensity: self
                .turbulence_intensity
                .map_or([None; 3], |ti| ti.map(|v| (v != 0.0).then_some(v))),
            ..SummaryMetadata::default()
        }
    }
}

fn check_component_count(path: &Path, components: usize) -> Result<()> {
    if components == COMPONENT_COUNT {
        Ok(())
    } else {
        Err(EvoTurbError::file_format(
            path,
            format!("expected {COMPONENT_COUNT} velocity components, header declares {components}"),
        ))
    }
}

/// Fail unless the file holds the whole payload the header declares
///
/// Runs before the grid is allocated.
fn check_payload_size(path: &Path, header: &WndHeader, header_bytes: u64) -> Result<()> {
    let (nz, ny, nt) = (header.nz, header.ny, header.nt);
    let payload_bytes = nz
        .checked_mul(ny)
        .and_then(|n| n.checked_mul(COMPONENT_COUNT))
        .and_then(|n| n.checked_mul(nt))
        .and_then(|n| n.checked_mul(2))
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| {
            EvoTurbError::file_format(path, format!("declared grid {nz}x{ny}x{nt} is too large"))
        })?;

    let file_bytes = fs::metadata(path)
        .map_err(|e| EvoTurbError::io(path, e))?
        .len();
    let available = file_bytes.saturating_sub(header_bytes);
    if available < payload_bytes {
        return Err(EvoTurbError::file_format(
            path,
            format!(
                "truncated payload: grid {nz}x{ny}x{nt} needs {payload_bytes} bytes, file holds {available}"
            ),
        ));
    }
    Ok(())
}

fn time_count(half: i32) -> usize {
    usize::try_from(half.saturating_mul(2)).unwrap_or(0).max(1)
}

/// Physical coordinates of the grid points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Horizontal coordinates (m), centred on 0
    pub y: Vec<f64>,
    /// Vertical coordinates (m), bottom first
    pub z: Vec<f64>,
    /// Hub height (m)
    pub hub_height: f64,
    /// Height of the lowest grid row (m)
    pub bottom_height: f64,
}

impl GridGeometry {
    /// Coordinates for a box centred on the hub, lowered by `height_offset`
    #[must_use]
    pub fn new(header: &WndHeader, hub_height: f64, height_offset: f64) -> Self {
        let (ny, nz) = (header.ny as f64, header.nz as f64);
        let bottom_height = hub_height - height_offset - header.dz * (nz - 1.0) / 2.0;
        Self {
            y: (0..header.ny)
                .map(|i| i as f64 * header.dy - header.dy * (ny - 1.0) / 2.0)
                .collect(),
            z: (0..header.nz)
                .map(|i| i as f64 * header.dz + bottom_height)
                .collect(),
            hub_height,
            bottom_height,
        }
    }
}

/// Everything recovered from one `.wnd` + `.sum` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbulenceBox {
    /// Grid header
    pub header: WndHeader,
    /// Summary values, header fields merged in
    pub summary: SummaryMetadata,
    /// Time step `dx / Ū` (s)
    pub dt: f64,
    /// Dequantization used for the payload
    pub scaling: BinaryScaling,
    /// Physical velocities
    pub field: PlaneField,
}

impl TurbulenceBox {
    /// Grid coordinates, when a hub height is known
    ///
    /// The summary hub height wins over the extended header's reference
    /// height.
    #[must_use]
    pub fn geometry(&self) -> Option<GridGeometry> {
        let hub_height = self.summary.hub_height.or(self.header.reference_height)?;
        Some(GridGeometry::new(
            &self.header,
            hub_height,
            self.summary.height_offset.unwrap_or(0.0),
        ))
    }
}

/// Summary file path for a grid file: same stem, `.sum` extension
#[must_use]
pub fn summary_path(grid: &Path) -> PathBuf {
    grid.with_extension("sum")
}

/// Decode a `.wnd` grid file and its `.sum` companion
///
/// # Errors
/// Returns an I/O error if either file is missing (checked before anything
/// is read), and a file format error for an unknown header marker, a
/// component count other than 3, a truncated payload, or a summary that
/// lacks the mean speed or a turbulence intensity.
pub fn read_wnd<P: AsRef<Path>>(path: P) -> Result<TurbulenceBox> {
    let path = path.as_ref();
    let sum_path = summary_path(path);
    require_file(path)?;
    require_file(&sum_path)?;

    let file = File::open(path).map_err(|e| EvoTurbError::io(path, e))?;
    let mut reader = LittleEndianReader::new(BufReader::new(file), path);
    let header = WndHeader::read(&mut reader)?;
    debug!(
        path = %path.display(),
        layout = ?header.layout,
        nz = header.nz,
        ny = header.ny,
        nt = header.nt,
        "Read wnd header"
    );
    check_payload_size(path, &header, reader.position())?;

    let summary = SummaryMetadata::read(&sum_path, header.known_summary_fields())?;
    if !summary.is_complete() {
        warn!(
            path = %sum_path.display(),
            missing = ?summary.missing_fields(),
            "Reached the end of the summary file without all fields"
        );
    }

    let mean_speed = summary.mean_speed.ok_or_else(|| {
        EvoTurbError::file_format(&sum_path, "mean wind speed (UBAR) not found")
    })?;
    let mut turbulence_intensity = [0.0; 3];
    for (k, ti) in summary.turbulence_intensity.iter().enumerate() {
        turbulence_intensity[k] = ti.ok_or_else(|| {
            EvoTurbError::file_format(
                &sum_path,
                format!("turbulence intensity of {:?} not found", VelocityComponent::ALL[k]),
            )
        })?;
    }
    let scaling = BinaryScaling::from_wind_statistics(mean_speed, turbulence_intensity);

    let field = read_payload(&mut reader, &header, &scaling, summary.is_clockwise())?;

    Ok(TurbulenceBox {
        dt: header.dx / mean_speed,
        header,
        summary,
        scaling,
        field,
    })
}

fn read_payload<R: std::io::Read>(
    reader: &mut LittleEndianReader<'_, R>,
    header: &WndHeader,
    scaling: &BinaryScaling,
    clockwise: bool,
) -> Result<PlaneField> {
    let (nz, ny, nt) = (header.nz, header.ny, header.nt);
    let mut field = PlaneField::zeros(nz, ny, nt);
    let mut record = vec![0i16; nz * ny * COMPONENT_COUNT];

    for it in 0..nt {
        let what = format!("grid record {} of {nt}", it + 1);
        reader.read_i16_slice(&mut record, &what)?;

        let mut samples = record.iter();
        for iz in 0..nz {
            for stored_y in 0..ny {
                let iy = if clockwise { ny - 1 - stored_y } else { stored_y };
                for component in VelocityComponent::ALL {
                    if let Some(&raw) = samples.next() {
                        field
                            .component_mut(component)
                            .set(iz, iy, it, scaling.dequantize(component, raw));
                    }
                }
            }
        }
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_relative_eq;
    use std::fs;

    fn temp_stem(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("evoturb_wnd_{}_{name}", std::process::id()))
    }

    fn write_pair(name: &str, wnd: &[u8], sum: &str) -> PathBuf {
        let wnd_path = temp_stem(name).with_extension("wnd");
        fs::write(&wnd_path, wnd).unwrap();
        fs::write(summary_path(&wnd_path), sum).unwrap();
        wnd_path
    }

    fn cleanup(wnd_path: &Path) {
        let _ = fs::remove_file(wnd_path);
        let _ = fs::remove_file(summary_path(wnd_path));
    }

    fn push_i16(bytes: &mut Vec<u8>, values: &[i16]) {
        for v in values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
    }

    /// Legacy header for a 1×2 grid with 2 time steps (dz = dy = 5 m, Ū = 12)
    fn legacy_header(bytes: &mut Vec<u8>) {
        push_i16(bytes, &[-3, 5000, 5000, 3000, 1, 120, 0, 0, 0, 0, 0, 1000, 2000]);
        push_i16(bytes, &[0; 6]);
    }

    const SUMMARY: &str = "\
Hub height = 90.0
Clockwise rotation = F
UBar = 12.0
TI(u) = 10.0 %
TI(v) = 8.0 %
TI(w) = 5.0 %
";

    #[test]
    fn test_legacy_minimal_file() {
        let mut bytes = Vec::new();
        legacy_header(&mut bytes);
        // 2 time steps × (1 z × 2 y × 3 components)
        let raw: [i16; 12] = [100, -50, 20, 0, 10, -10, 1000, 0, 0, -1000, 200, 400];
        push_i16(&mut bytes, &raw);
        let path = write_pair("legacy", &bytes, SUMMARY);

        let decoded = read_wnd(&path).unwrap();
        cleanup(&path);

        assert_eq!(decoded.header.layout, WndLayout::Legacy);
        assert_eq!((decoded.header.nz, decoded.header.ny, decoded.header.nt), (1, 2, 2));
        assert_relative_eq!(decoded.header.dz, 5.0);
        assert_relative_eq!(decoded.header.dx, 3.0);
        assert_relative_eq!(decoded.dt, 0.25, epsilon = 1e-12);

        // scale = 1e-5 · 12 · TI
        let (su, sv, sw) = (1e-5 * 12.0 * 10.0, 1e-5 * 12.0 * 8.0, 1e-5 * 12.0 * 5.0);
        let f = &decoded.field;
        assert_relative_eq!(f.u.get(0, 0, 0), 100.0 * su + 12.0, epsilon = 1e-12);
        assert_relative_eq!(f.v.get(0, 0, 0), -50.0 * sv, epsilon = 1e-12);
        assert_relative_eq!(f.w.get(0, 0, 0), 20.0 * sw, epsilon = 1e-12);
        assert_relative_eq!(f.u.get(0, 1, 0), 12.0, epsilon = 1e-12);
        assert_relative_eq!(f.v.get(0, 1, 0), 10.0 * sv, epsilon = 1e-12);
        assert_relative_eq!(f.u.get(0, 0, 1), 1000.0 * su + 12.0, epsilon = 1e-12);
        assert_relative_eq!(f.u.get(0, 1, 1), -1000.0 * su + 12.0, epsilon = 1e-12);
        assert_relative_eq!(f.w.get(0, 1, 1), 400.0 * sw, epsilon = 1e-12);

        let geometry = decoded.geometry().unwrap();
        assert_eq!(geometry.y, vec![-2.5, 2.5]);
        assert_eq!(geometry.z, vec![90.0]);
    }

    #[test]
    fn test_clockwise_flips_horizontal_axis() {
        let mut bytes = Vec::new();
        legacy_header(&mut bytes);
        push_i16(&mut bytes, &[1, 0, 0, 2, 0, 0, 3, 0, 0, 4, 0, 0]);
        let sum = SUMMARY.replace("rotation = F", "rotation = T");
        let path = write_pair("clockwise", &bytes, &sum);

        let decoded = read_wnd(&path).unwrap();
        cleanup(&path);

        let su = 1e-5 * 12.0 * 10.0;
        assert!(decoded.summary.is_clockwise());
        assert_relative_eq!(decoded.field.u.get(0, 0, 0), 2.0 * su + 12.0, epsilon = 1e-12);
        assert_relative_eq!(decoded.field.u.get(0, 1, 0), su + 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extended_header() {
        let mut bytes = Vec::new();
        extended_header(&mut bytes, 1, 2, 1);
        push_i16(&mut bytes, &[500, 0, 0, -500, 0, 0, 0, 0, 0, 0, 0, 0]);
        let path = write_pair("extended", &bytes, "Hub height = 90\nClockwise = F\n");

        let decoded = read_wnd(&path).unwrap();
        cleanup(&path);

        assert_eq!(decoded.header.layout, WndLayout::Extended);
        assert_eq!(decoded.header.turbulence_intensity, Some([12.0, 9.5, 6.0]));
        assert_eq!((decoded.header.nz, decoded.header.ny, decoded.header.nt), (2, 1, 2));
        assert_relative_eq!(decoded.dt, 0.5, epsilon = 1e-12);
        let su = 1e-5 * 8.0 * 12.0;
        assert_relative_eq!(decoded.field.u.get(0, 0, 0), 500.0 * su + 8.0, epsilon = 1e-9);
        assert_relative_eq!(decoded.field.u.get(1, 0, 0), -500.0 * su + 8.0, epsilon = 1e-9);

        let geometry = decoded.geometry().unwrap();
        assert_eq!(geometry.z, vec![85.0, 95.0]);
    }

    /// Extended header for a 3-component grid, followed by no payload
    fn extended_header(bytes: &mut Vec<u8>, half: i32, nz: i32, ny: i32) {
        push_i16(bytes, &[-99, 4]);
        bytes.extend_from_slice(&3_i32.to_le_bytes());
        for v in [52.0_f32, 0.03, 90.0, 12.0, 9.5, 6.0, 10.0, 10.0, 4.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&half.to_le_bytes());
        bytes.extend_from_slice(&8.0_f32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 3 * 4 + 2 * 4]);
        bytes.extend_from_slice(&nz.to_le_bytes());
        bytes.extend_from_slice(&ny.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 6 * 4]);
    }

    #[test]
    fn test_height_offset_lowers_grid() {
        let mut bytes = Vec::new();
        extended_header(&mut bytes, 1, 2, 1);
        push_i16(&mut bytes, &[0; 12]);
        let sum = "Hub height = 90\nClockwise = F\nHeight offset = 2.5\n";
        let path = write_pair("height_offset", &bytes, sum);

        let decoded = read_wnd(&path).unwrap();
        cleanup(&path);

        assert_eq!(decoded.summary.height_offset, Some(2.5));
        let geometry = decoded.geometry().unwrap();
        // z1 = 90 - 2.5 - 10·(2 - 1)/2
        assert_relative_eq!(geometry.bottom_height, 82.5, epsilon = 1e-12);
        assert_relative_eq!(geometry.z[0], 82.5, epsilon = 1e-12);
        assert_relative_eq!(geometry.z[1], 92.5, epsilon = 1e-12);
        assert_eq!(geometry.hub_height, 90.0);
        assert_eq!(geometry.y, vec![0.0]);

        let lowered = GridGeometry::new(&decoded.header, 120.0, -4.0);
        assert_relative_eq!(lowered.bottom_height, 119.0, epsilon = 1e-12);
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = Vec::new();
        legacy_header(&mut bytes);
        push_i16(&mut bytes, &[1, 2, 3, 4, 5, 6, 7]);
        let path = write_pair("truncated", &bytes, SUMMARY);

        let err = read_wnd(&path).unwrap_err();
        cleanup(&path);
        assert_eq!(err.kind(), ErrorKind::FileFormat);
        assert!(err.to_string().contains("truncated payload"));
        assert!(err.to_string().contains("needs 24 bytes, file holds 14"));
    }

    #[test]
    fn test_oversized_grid_rejected_before_allocation() {
        let mut bytes = Vec::new();
        extended_header(&mut bytes, 1_000_000, 100_000, 100_000);
        bytes.extend_from_slice(&[0u8; 8]);
        let path = write_pair("oversized", &bytes, SUMMARY);

        let err = read_wnd(&path).unwrap_err();
        cleanup(&path);
        assert_eq!(err.kind(), ErrorKind::FileFormat);
        assert!(err.to_string().contains("grid 100000x100000x2000000"));
    }

    #[test]
    fn test_overflowing_grid_size_rejected() {
        let mut bytes = Vec::new();
        extended_header(&mut bytes, i32::MAX, i32::MAX, i32::MAX);
        let path = write_pair("overflow", &bytes, SUMMARY);

        let err = read_wnd(&path).unwrap_err();
        cleanup(&path);
        assert_eq!(err.kind(), ErrorKind::FileFormat);
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_unknown_marker() {
        let mut bytes = Vec::new();
        push_i16(&mut bytes, &[7, 0, 0]);
        let path = write_pair("marker", &bytes, SUMMARY);
        let err = read_wnd(&path).unwrap_err();
        cleanup(&path);
        assert!(err.to_string().contains("unexpected header marker 7"));
    }

    #[test]
    fn test_two_component_legacy_rejected() {
        let mut bytes = Vec::new();
        push_i16(&mut bytes, &[-2, 5000]);
        let path = write_pair("components", &bytes, SUMMARY);
        let err = read_wnd(&path).unwrap_err();
        cleanup(&path);
        assert_eq!(err.kind(), ErrorKind::FileFormat);
    }

    #[test]
    fn test_missing_intensity_in_summary() {
        let mut bytes = Vec::new();
        legacy_header(&mut bytes);
        push_i16(&mut bytes, &[0; 12]);
        let path = write_pair("no_ti", &bytes, "Hub height = 90\nUBar = 12\n");
        let err = read_wnd(&path).unwrap_err();
        cleanup(&path);
        assert_eq!(err.kind(), ErrorKind::FileFormat);
        assert!(err.to_string().contains("turbulence intensity"));
    }

    #[test]
    fn test_missing_summary_is_io_error() {
        let wnd_path = temp_stem("no_sum").with_extension("wnd");
        fs::write(&wnd_path, [0u8; 4]).unwrap();
        let err = read_wnd(&wnd_path).unwrap_err();
        let _ = fs::remove_file(&wnd_path);
        assert_eq!(err.kind(), ErrorKind::Io);

        let err = read_wnd(temp_stem("absent").with_extension("wnd")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
