//! Velocity field containers
//!
//! Axis order is fixed and named instead of relying on reshape tricks:
//! - [`ComponentGrid`]: (vertical, horizontal, time), time contiguous
//! - [`PlaneField`]: three component grids (u, v, w) for one y-z plane
//! - [`MergedField`]: one [`PlaneField`] per plane, i.e.
//!   (plane, vertical, horizontal, time, component)

use serde::{Deserialize, Serialize};

/// Velocity component of the wind vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VelocityComponent {
    /// Longitudinal (streamwise)
    U,
    /// Transverse (horizontal, perpendicular to the flow)
    V,
    /// Vertical
    W,
}

impl VelocityComponent {
    /// All components in storage order
    pub const ALL: [VelocityComponent; 3] = [Self::U, Self::V, Self::W];

    /// Storage index (u = 0, v = 1, w = 2)
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::U => 0,
            Self::V => 1,
            Self::W => 2,
        }
    }
}

/// One velocity component sampled on a (vertical × horizontal × time) grid
///
/// Values are stored with time varying fastest, so the series at one spatial
/// point is a contiguous slice of length `nt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentGrid {
    /// Number of vertical points
    pub nz: usize,
    /// Number of horizontal points
    pub ny: usize,
    /// Number of time samples
    pub nt: usize,
    data: Vec<f64>,
}

impl ComponentGrid {
    /// Create a grid initialized to zero
    #[must_use]
    pub fn new(nz: usize, ny: usize, nt: usize) -> Self {
        Self::with_value(nz, ny, nt, 0.0)
    }

    /// Create a grid initialized to `value`
    #[must_use]
    pub fn with_value(nz: usize, ny: usize, nt: usize, value: f64) -> Self {
        Self {
            nz,
            ny,
            nt,
            data: vec![value; nz * ny * nt],
        }
    }

    /// Build a grid by evaluating `f(iz, iy, it)` at every sample
    pub fn from_fn(nz: usize, ny: usize, nt: usize, mut f: impl FnMut(usize, usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(nz * ny * nt);
        for iz in 0..nz {
            for iy in 0..ny {
                for it in 0..nt {
                    data.push(f(iz, iy, it));
                }
            }
        }
        Self { nz, ny, nt, data }
    }

    /// Number of spatial points (`nz * ny`)
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.nz * self.ny
    }

    #[inline]
    fn index(&self, iz: usize, iy: usize, it: usize) -> usize {
        assert!(
            iz < self.nz && iy < self.ny && it < self.nt,
            "Coordinates out of bounds"
        );
        (iz * self.ny + iy) * self.nt + it
    }

    /// Value at (vertical, horizontal, time)
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, iz: usize, iy: usize, it: usize) -> f64 {
        self.data[self.index(iz, iy, it)]
    }

    /// Set value at (vertical, horizontal, time)
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, iz: usize, iy: usize, it: usize, value: f64) {
        let idx = self.index(iz, iy, it);
        self.data[idx] = value;
    }

    /// Time series at one spatial point
    #[must_use]
    pub fn series(&self, iz: usize, iy: usize) -> &[f64] {
        let start = self.index(iz, iy, 0);
        &self.data[start..start + self.nt]
    }

    /// Time series at the spatial point with flat index `iz * ny + iy`
    #[must_use]
    pub fn series_at(&self, point: usize) -> &[f64] {
        &self.data[point * self.nt..(point + 1) * self.nt]
    }

    /// Mutable time series at the spatial point with flat index `iz * ny + iy`
    pub fn series_at_mut(&mut self, point: usize) -> &mut [f64] {
        let nt = self.nt;
        &mut self.data[point * nt..(point + 1) * nt]
    }

    /// Raw samples in (vertical, horizontal, time) order
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mean over all samples
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Largest absolute difference to another grid of the same shape
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        assert_eq!(
            (self.nz, self.ny, self.nt),
            (other.nz, other.ny, other.nt),
            "Grid shapes differ"
        );
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

/// The three velocity components of one y-z plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneField {
    /// Longitudinal component
    pub u: ComponentGrid,
    /// Transverse component
    pub v: ComponentGrid,
    /// Vertical component
    pub w: ComponentGrid,
}

impl PlaneField {
    /// Plane of zeros with the given shape
    #[must_use]
    pub fn zeros(nz: usize, ny: usize, nt: usize) -> Self {
        Self {
            u: ComponentGrid::new(nz, ny, nt),
            v: ComponentGrid::new(nz, ny, nt),
            w: ComponentGrid::new(nz, ny, nt),
        }
    }

    /// Grid shape as (nz, ny, nt)
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.u.nz, self.u.ny, self.u.nt)
    }

    /// Grid of one component
    #[must_use]
    pub fn component(&self, component: VelocityComponent) -> &ComponentGrid {
        match component {
            VelocityComponent::U => &self.u,
            VelocityComponent::V => &self.v,
            VelocityComponent::W => &self.w,
        }
    }

    /// Mutable grid of one component
    pub fn component_mut(&mut self, component: VelocityComponent) -> &mut ComponentGrid {
        match component {
            VelocityComponent::U => &mut self.u,
            VelocityComponent::V => &mut self.v,
            VelocityComponent::W => &mut self.w,
        }
    }
}

/// Four-dimensional field: one plane per configured streamwise offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedField {
    /// Streamwise offset of each plane (m), reference plane first
    pub offsets: Vec<f64>,
    /// Plane data, same order as `offsets`
    pub planes: Vec<PlaneField>,
}

impl MergedField {
    /// Number of planes
    #[must_use]
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Grid shape shared by every plane as (nz, ny, nt)
    #[must_use]
    pub fn shape(&self) -> Option<(usize, usize, usize)> {
        self.planes.first().map(PlaneField::shape)
    }
}
