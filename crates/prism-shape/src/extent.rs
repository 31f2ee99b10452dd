//! N-dimensional extent descriptor

use crate::coord::Coord;
use crate::MAX_RANK;
use std::fmt;

/// N-dimensional shape for ranks 1 through 3
///
/// An extent is an ordered tuple of per-axis sizes. Internally the axes are
/// stored in a fixed `[usize; 3]` padded with `1`, so [`Extent::count`] and
/// the row-major linearization formula are uniform across ranks.
///
/// Extents are immutable once constructed.
///
/// # Example
///
/// ```
/// use prism_shape::{Coord, Extent};
///
/// let e = Extent::d3(2, 3, 4);
/// assert_eq!(e.rank(), 3);
/// assert_eq!(e.count(), 24);
/// assert_eq!(e.linear_index(Coord::d3(1, 2, 3)), Some((1 * 3 + 2) * 4 + 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    rank: usize,
    dims: [usize; MAX_RANK],
}

impl Extent {
    /// Create a 1-D extent
    pub const fn d1(x: usize) -> Self {
        Self {
            rank: 1,
            dims: [x, 1, 1],
        }
    }

    /// Create a 2-D extent
    pub const fn d2(x: usize, y: usize) -> Self {
        Self {
            rank: 2,
            dims: [x, y, 1],
        }
    }

    /// Create a 3-D extent
    pub const fn d3(x: usize, y: usize, z: usize) -> Self {
        Self {
            rank: 3,
            dims: [x, y, z],
        }
    }

    /// Number of axes (1, 2, or 3)
    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// Size along one axis
    ///
    /// Axes at or beyond the rank report `1`, matching the padded internal
    /// representation.
    pub const fn axis(&self, i: usize) -> usize {
        self.dims[i]
    }

    /// Active axes as a slice
    pub fn dims(&self) -> &[usize] {
        &self.dims[..self.rank]
    }

    /// Padded axes, always three entries
    pub const fn padded(&self) -> [usize; MAX_RANK] {
        self.dims
    }

    /// Total element count, the product of all axes
    pub const fn count(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    /// Whether a coordinate addresses an element of this extent
    ///
    /// Requires matching rank and every component strictly below the
    /// corresponding axis size.
    pub fn contains(&self, coord: Coord) -> bool {
        if coord.rank() != self.rank {
            return false;
        }
        let idx = coord.padded();
        idx[0] < self.dims[0] && idx[1] < self.dims[1] && idx[2] < self.dims[2]
    }

    /// Row-major linearization of a coordinate
    ///
    /// The outermost axis varies slowest: for a 3-D extent `(r0, r1, r2)`
    /// the coordinate `(i, j, k)` maps to `(i * r1 + j) * r2 + k`. Lower
    /// ranks fall out of the same formula through the padding.
    ///
    /// Returns `None` on rank mismatch or an out-of-range component.
    pub fn linear_index(&self, coord: Coord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let idx = coord.padded();
        Some((idx[0] * self.dims[1] + idx[1]) * self.dims[2] + idx[2])
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.dims().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, ")")
    }
}
