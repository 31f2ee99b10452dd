//! Dimension-indexed views over a storage core
//!
//! One view kind per supported rank, selected at construction from the
//! storage's extent. The kinds share the storage and differ only in what
//! indexing one coordinate returns:
//!
//! - [`View1`]: an element reference
//! - [`View2`]: a row slice
//! - [`View3`]: a transient [`Plane`] proxy, whose second index yields the
//!   innermost row
//!
//! Linearization is row-major throughout; the addresses produced here are
//! bit-identical to the flattened accessor's. Indexing is range-checked by
//! default, with `unsafe` unchecked variants preserving the O(1)
//! pointer-arithmetic fast path.
//!
//! Views and proxies borrow the storage, so they cannot outlive it or
//! survive a rebind - the borrow checker rejects both.

use crate::error::{Error, Result};
use crate::storage::Storage;
use prism_shape::Extent;
use std::marker::PhantomData;
use std::slice;

/// View over a storage core, tagged by rank
#[derive(Debug, Clone, Copy)]
pub enum DimView<'s, T: bytemuck::Pod> {
    /// 1-D: indexing yields an element
    D1(View1<'s, T>),
    /// 2-D: indexing yields a row
    D2(View2<'s, T>),
    /// 3-D: indexing yields a sub-array proxy
    D3(View3<'s, T>),
}

impl<'s, T: bytemuck::Pod> DimView<'s, T> {
    pub(crate) fn over(storage: &'s Storage<T>) -> Self {
        match storage.extent().rank() {
            1 => Self::D1(View1 { storage }),
            2 => Self::D2(View2 { storage }),
            _ => Self::D3(View3 { storage }),
        }
    }

    /// Rank of the underlying extent
    pub fn rank(&self) -> usize {
        match self {
            Self::D1(_) => 1,
            Self::D2(_) => 2,
            Self::D3(_) => 3,
        }
    }

    /// The 1-D view, if that is the active kind
    pub fn as_d1(&self) -> Option<View1<'s, T>> {
        match self {
            Self::D1(v) => Some(*v),
            _ => None,
        }
    }

    /// The 2-D view, if that is the active kind
    pub fn as_d2(&self) -> Option<View2<'s, T>> {
        match self {
            Self::D2(v) => Some(*v),
            _ => None,
        }
    }

    /// The 3-D view, if that is the active kind
    pub fn as_d3(&self) -> Option<View3<'s, T>> {
        match self {
            Self::D3(v) => Some(*v),
            _ => None,
        }
    }
}

/// 1-D view: one index resolves an element
#[derive(Debug, Clone, Copy)]
pub struct View1<'s, T: bytemuck::Pod> {
    storage: &'s Storage<T>,
}

impl<'s, T: bytemuck::Pod> View1<'s, T> {
    /// Element at linear offset `i`
    pub fn at(&self, i: usize) -> Result<&'s T> {
        let ptr = self.storage.target()?;
        let count = self.storage.count();
        if i >= count {
            return Err(Error::out_of_range(i, count));
        }
        Ok(unsafe { &*ptr.add(i) })
    }

    /// Element at linear offset `i`, no bounds or detach check
    ///
    /// # Safety
    ///
    /// The storage must be bound to memory and `i < count()`.
    pub unsafe fn at_unchecked(&self, i: usize) -> &'s T {
        &*self.storage.as_ptr().add(i)
    }
}

/// 2-D view: one index resolves a row
#[derive(Debug, Clone, Copy)]
pub struct View2<'s, T: bytemuck::Pod> {
    storage: &'s Storage<T>,
}

impl<'s, T: bytemuck::Pod> View2<'s, T> {
    /// Row `i`, a slice of the second-axis extent
    ///
    /// Row stride equals the second axis; the column index is the caller's
    /// second subscript into the returned slice.
    pub fn row(&self, i: usize) -> Result<&'s [T]> {
        let ptr = self.storage.target()?;
        let extent = self.storage.extent();
        let rows = extent.axis(0);
        if i >= rows {
            return Err(Error::out_of_range(i, rows));
        }
        let width = extent.axis(1);
        Ok(unsafe { slice::from_raw_parts(ptr.add(i * width), width) })
    }

    /// Row `i`, no bounds or detach check
    ///
    /// # Safety
    ///
    /// The storage must be bound to memory and `i < extent().axis(0)`.
    pub unsafe fn row_unchecked(&self, i: usize) -> &'s [T] {
        let width = self.storage.extent().axis(1);
        slice::from_raw_parts(self.storage.as_ptr().add(i * width), width)
    }
}

/// 3-D view: one index resolves a sub-array proxy
#[derive(Debug, Clone, Copy)]
pub struct View3<'s, T: bytemuck::Pod> {
    storage: &'s Storage<T>,
}

impl<'s, T: bytemuck::Pod> View3<'s, T> {
    /// Sub-array at outermost coordinate `i`
    ///
    /// The proxy's base pointer is advanced by `i * axis(1) * axis(2)`
    /// elements; indexing it again completes row-major resolution.
    pub fn plane(&self, i: usize) -> Result<Plane<'s, T>> {
        let ptr = self.storage.target()?;
        let extent = self.storage.extent();
        let planes = extent.axis(0);
        if i >= planes {
            return Err(Error::out_of_range(i, planes));
        }
        let base = unsafe { ptr.add(i * extent.axis(1) * extent.axis(2)) };
        Ok(Plane {
            base,
            extent,
            _marker: PhantomData,
        })
    }

    /// Sub-array at outermost coordinate `i`, no bounds or detach check
    ///
    /// # Safety
    ///
    /// The storage must be bound to memory and `i < extent().axis(0)`.
    pub unsafe fn plane_unchecked(&self, i: usize) -> Plane<'s, T> {
        let extent = self.storage.extent();
        Plane {
            base: self
                .storage
                .as_ptr()
                .add(i * extent.axis(1) * extent.axis(2)),
            extent,
            _marker: PhantomData,
        }
    }
}

/// Transient sub-array proxy for chained 3-D indexing
///
/// Holds the extent and a base pointer advanced to one fixed outermost
/// coordinate. Intended to be indexed once more and discarded within the
/// statement that produced it; it borrows the storage and cannot outlive
/// it.
#[derive(Debug, Clone, Copy)]
pub struct Plane<'s, T> {
    base: *const T,
    extent: Extent,
    _marker: PhantomData<&'s T>,
}

impl<'s, T: bytemuck::Pod> Plane<'s, T> {
    /// Innermost row `j`, advanced by `j * axis(2)` elements
    pub fn row(&self, j: usize) -> Result<&'s [T]> {
        let rows = self.extent.axis(1);
        if j >= rows {
            return Err(Error::out_of_range(j, rows));
        }
        let width = self.extent.axis(2);
        Ok(unsafe { slice::from_raw_parts(self.base.add(j * width), width) })
    }

    /// Innermost row `j`, no bounds check
    ///
    /// # Safety
    ///
    /// `j < extent().axis(1)`.
    pub unsafe fn row_unchecked(&self, j: usize) -> &'s [T] {
        let width = self.extent.axis(2);
        slice::from_raw_parts(self.base.add(j * width), width)
    }
}
