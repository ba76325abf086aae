//! Mann turbulence generator output
//!
//! One headerless file per component holding `nz·ny·nt` little-endian `f32`
//! values, the vertical index varying fastest, then the horizontal index,
//! then the streamwise (time) index. The generator's streamwise and
//! horizontal axes run opposite to the `.wnd` convention, so both are
//! reversed on read.

use super::require_file;
use crate::core_types::{ComponentGrid, PlaneField};
use crate::error::{EvoTurbError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Decode one component file
///
/// # Errors
/// Returns an I/O error if the file is missing or unreadable, and a file
/// format error if it does not hold exactly `nz·ny·nt` values.
pub fn read_mann_component<P: AsRef<Path>>(
    path: P,
    nz: usize,
    ny: usize,
    nt: usize,
) -> Result<ComponentGrid> {
    let path = path.as_ref();
    require_file(path)?;

    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|file| BufReader::new(file).read_to_end(&mut bytes))
        .map_err(|e| EvoTurbError::io(path, e))?;

    let expected = nz * ny * nt;
    if bytes.len() != expected * 4 {
        return Err(EvoTurbError::file_format(
            path,
            format!(
                "expected {expected} f32 values ({nz}x{ny}x{nt}), file holds {} bytes",
                bytes.len()
            ),
        ));
    }

    let values: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    // file index = iz + nz·(iy + ny·it), with y and t reversed
    let grid = ComponentGrid::from_fn(nz, ny, nt, |iz, iy, it| {
        let (sy, st) = (ny - 1 - iy, nt - 1 - it);
        f64::from(values[iz + nz * (sy + ny * st)])
    });
    debug!(path = %path.display(), nz, ny, nt, "Read Mann component");
    Ok(grid)
}

/// Decode the u, v and w files of one plane
///
/// All three paths are checked before any file is read.
///
/// # Errors
/// See [`read_mann_component`].
pub fn read_mann_plane(
    u: &Path,
    v: &Path,
    w: &Path,
    nz: usize,
    ny: usize,
    nt: usize,
) -> Result<PlaneField> {
    for path in [u, v, w] {
        require_file(path)?;
    }
    Ok(PlaneField {
        u: read_mann_component(u, nz, ny, nt)?,
        v: read_mann_component(v, nz, ny, nt)?,
        w: read_mann_component(w, nz, ny, nt)?,
    })
}
