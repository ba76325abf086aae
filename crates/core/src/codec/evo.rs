//! `.evo` container for unfrozen planes
//!
//! ```text
//! i16  n                      number of exported planes
//! i16  x_1 .. x_n             streamwise offsets (m, truncated)
//! i16  payload[plane][z][y][component][t]
//! ```
//!
//! The reference (turbine) plane is not exported. The payload nesting is
//! part of the format: time varies fastest, the plane index slowest.

use super::{require_file, BinaryScaling, LittleEndianReader};
use crate::core_types::{MergedField, PlaneField, VelocityComponent};
use crate::error::{EvoTurbError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

fn header_value(path: &Path, what: &str, value: f64) -> Result<i16> {
    let truncated = value.trunc();
    if truncated < f64::from(i16::MIN) || truncated > f64::from(i16::MAX) {
        return Err(EvoTurbError::file_format(
            path,
            format!("{what} {value} does not fit a 16-bit header field"),
        ));
    }
    Ok(truncated as i16)
}

/// Write every plane except the first (reference) one
///
/// # Errors
/// Returns a configuration error if the first plane is not at offset 0 or
/// the scaling is unusable, a file format error if a header value does not
/// fit an `i16`, and an I/O error if the file cannot be written.
pub fn write_evo<P: AsRef<Path>>(
    path: P,
    field: &MergedField,
    scaling: &BinaryScaling,
) -> Result<()> {
    let path = path.as_ref();
    scaling.validate()?;
    if field.offsets.len() != field.planes.len() {
        return Err(EvoTurbError::configuration(format!(
            "{} plane offsets for {} planes",
            field.offsets.len(),
            field.planes.len()
        )));
    }
    if field.offsets.first() != Some(&0.0) {
        return Err(EvoTurbError::configuration(
            "the first plane of an exported field must be the reference plane at offset 0",
        ));
    }

    let exported = &field.planes[1..];
    let mut header = vec![header_value(path, "plane count", exported.len() as f64)?];
    for &offset in &field.offsets[1..] {
        header.push(header_value(path, "plane offset", offset)?);
    }

    let file = File::create(path).map_err(|e| EvoTurbError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let io_err = |e| EvoTurbError::io(path, e);

    for value in &header {
        writer.write_all(&value.to_le_bytes()).map_err(io_err)?;
    }
    for plane in exported {
        let (nz, ny, _) = plane.shape();
        for iz in 0..nz {
            for iy in 0..ny {
                for component in VelocityComponent::ALL {
                    for &value in plane.component(component).series(iz, iy) {
                        let raw = scaling.quantize(component, value);
                        writer.write_all(&raw.to_le_bytes()).map_err(io_err)?;
                    }
                }
            }
        }
    }
    writer.flush().map_err(io_err)?;

    info!(
        path = %path.display(),
        planes = exported.len(),
        "Exported unfrozen planes"
    );
    Ok(())
}

/// Read an `.evo` file back into physical values
///
/// The grid shape is not stored in the file and must be supplied. The
/// returned field holds only the exported planes.
///
/// # Errors
/// Returns an I/O error if the file is missing and a file format error if
/// the header or payload is truncated.
pub fn read_evo<P: AsRef<Path>>(
    path: P,
    nz: usize,
    ny: usize,
    nt: usize,
    scaling: &BinaryScaling,
) -> Result<MergedField> {
    let path = path.as_ref();
    require_file(path)?;
    let file = File::open(path).map_err(|e| EvoTurbError::io(path, e))?;
    let mut reader = LittleEndianReader::new(BufReader::new(file), path);

    let count = reader.read_i16("plane count")?;
    let count = usize::try_from(count).map_err(|_| {
        EvoTurbError::file_format(path, format!("negative plane count {count}"))
    })?;
    let mut offsets = Vec::with_capacity(count);
    for _ in 0..count {
        offsets.push(f64::from(reader.read_i16("plane offsets")?));
    }

    let mut planes = Vec::with_capacity(count);
    let mut series = vec![0i16; nt];
    for p in 0..count {
        let what = format!("payload of plane {}", p + 1);
        let mut plane = PlaneField::zeros(nz, ny, nt);
        for iz in 0..nz {
            for iy in 0..ny {
                for component in VelocityComponent::ALL {
                    reader.read_i16_slice(&mut series, &what)?;
                    let grid = plane.component_mut(component);
                    for (it, &raw) in series.iter().enumerate() {
                        grid.set(iz, iy, it, scaling.dequantize(component, raw));
                    }
                }
            }
        }
        planes.push(plane);
    }

    Ok(MergedField { offsets, planes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::ComponentGrid;
    use crate::error::ErrorKind;
    use std::fs;
    use std::path::PathBuf;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("evoturb_evo_{}_{name}.evo", std::process::id()))
    }

    fn tagged_plane(nz: usize, ny: usize, nt: usize, plane: usize) -> PlaneField {
        // value encodes (plane, iz, iy, component, it) so order mistakes show up
        let grid = |k: usize| {
            ComponentGrid::from_fn(nz, ny, nt, |iz, iy, it| {
                (plane * 10000 + iz * 1000 + iy * 100 + k * 10 + it) as f64
            })
        };
        PlaneField {
            u: grid(0),
            v: grid(1),
            w: grid(2),
        }
    }

    fn unit_scaling() -> BinaryScaling {
        BinaryScaling {
            scale: [1.0; 3],
            offset: [0.0; 3],
        }
    }

    #[test]
    fn test_layout_time_fastest_plane_slowest() {
        let (nz, ny, nt) = (2, 2, 3);
        let field = MergedField {
            offsets: vec![0.0, 40.7, 80.0],
            planes: (0..3).map(|p| tagged_plane(nz, ny, nt, p)).collect(),
        };
        let path = temp_file("layout");
        write_evo(&path, &field, &unit_scaling()).unwrap();
        let bytes = fs::read(&path).unwrap();
        let _ = fs::remove_file(&path);

        let values: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(&values[..3], &[2, 40, 80]);

        let payload = &values[3..];
        assert_eq!(payload.len(), 2 * nz * ny * 3 * nt);
        let mut expected = Vec::new();
        for p in 1..3 {
            for iz in 0..nz {
                for iy in 0..ny {
                    for k in 0..3 {
                        for it in 0..nt {
                            expected.push((p * 10000 + iz * 1000 + iy * 100 + k * 10 + it) as i16);
                        }
                    }
                }
            }
        }
        assert_eq!(payload, &expected[..]);
    }

    #[test]
    fn test_round_trip_within_one_step() {
        let (nz, ny, nt) = (2, 3, 8);
        let scaling = BinaryScaling::from_wind_statistics(11.0, [14.0, 11.0, 7.0]);
        let plane = |seed: f64| PlaneField {
            u: ComponentGrid::from_fn(nz, ny, nt, |iz, iy, it| {
                11.0 + (seed + iz as f64 + 0.3 * iy as f64 + 0.7 * it as f64).sin()
            }),
            v: ComponentGrid::from_fn(nz, ny, nt, |_, iy, it| 0.5 * (seed + iy as f64 * it as f64).cos()),
            w: ComponentGrid::from_fn(nz, ny, nt, |iz, _, it| -0.2 * (seed * iz as f64 + it as f64).sin()),
        };
        let field = MergedField {
            offsets: vec![0.0, 30.0, 60.0],
            planes: vec![plane(0.0), plane(1.0), plane(2.0)],
        };
        let path = temp_file("round_trip");
        write_evo(&path, &field, &scaling).unwrap();
        let decoded = read_evo(&path, nz, ny, nt, &scaling).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(decoded.offsets, vec![30.0, 60.0]);
        assert_eq!(decoded.plane_count(), 2);
        for (original, back) in field.planes[1..].iter().zip(&decoded.planes) {
            for component in VelocityComponent::ALL {
                let step = scaling.scale[component.index()];
                let diff = original
                    .component(component)
                    .max_abs_diff(back.component(component));
                assert!(diff < step, "{component:?}: {diff} >= {step}");
            }
        }
    }

    #[test]
    fn test_reference_plane_must_be_first() {
        let field = MergedField {
            offsets: vec![50.0, 0.0],
            planes: vec![PlaneField::zeros(1, 1, 2); 2],
        };
        let err = write_evo(temp_file("unused"), &field, &unit_scaling()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_offset_overflow_rejected() {
        let field = MergedField {
            offsets: vec![0.0, 40000.0],
            planes: vec![PlaneField::zeros(1, 1, 2); 2],
        };
        let path = temp_file("overflow");
        let err = write_evo(&path, &field, &unit_scaling()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileFormat);
        assert!(!path.exists());
    }

    #[test]
    fn test_truncated_payload() {
        let path = temp_file("truncated");
        let mut bytes = Vec::new();
        for v in [1_i16, 25, 7, 7, 7] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        fs::write(&path, bytes).unwrap();
        let err = read_evo(&path, 1, 1, 2, &unit_scaling()).unwrap_err();
        let _ = fs::remove_file(&path);
        assert_eq!(err.kind(), ErrorKind::FileFormat);
        assert!(err.to_string().contains("payload of plane 1"));
    }
}
