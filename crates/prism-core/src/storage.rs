//! Buffer storage core
//!
//! A [`Storage`] owns or borrows one contiguous run of elements sized by an
//! extent. The backing pointer can be rebound after construction
//! (late-rebind) to redirect where finalized data lands; ownership of the
//! current target is always explicit in the [`Ownership`] tag.
//!
//! ## Ownership model
//!
//! - **Owned**: the storage holds a co-owning handle to an [`Allocation`];
//!   memory is released when the last handle drops.
//! - **Borrowed**: the storage wraps caller-owned memory and never frees it.
//! - **Detached**: the storage targets nothing; element access fails with
//!   [`Error::Detached`].
//!
//! Copying is always deep ([`Storage::try_clone`]): the copy is allocated
//! fresh and never aliases the source. Moving is a plain Rust move, so the
//! moved-from core is statically gone and no two live cores claim the same
//! allocation.
//!
//! Storage is not synchronized. Rebinds are single-writer operations; the
//! caller keeps every derived view and accessor inside the storage's
//! lifetime.

use crate::accessor::DeviceView;
use crate::alloc::{Allocation, HostAlloc, SystemAlloc};
use crate::error::{Error, Rebind, Result};
use crate::view::DimView;
use prism_shape::{Coord, Extent};
use std::mem;
use std::ptr;
use std::sync::{Arc, Weak};

/// Where the storage's current target memory comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Co-owned allocation, released with the last handle
    Owned,
    /// Caller-owned memory, never freed here
    Borrowed,
    /// No target memory bound
    Detached,
}

enum Backing<T> {
    Owned(Arc<Allocation<T>>),
    Borrowed,
    Detached,
}

/// Contiguous element storage addressed by an extent
///
/// `T` must be `bytemuck::Pod`: elements are bitwise-copied on deep copy
/// and zero-initialized on allocation, so every read is defined.
///
/// # Example
///
/// ```
/// use prism_core::Storage;
/// use prism_shape::Extent;
///
/// let mut s: Storage<f64> = Storage::new(Extent::d1(5))?;
/// *s.get_mut(3)? = 9.5;
/// assert_eq!(*s.get(3)?, 9.5);
/// assert_eq!(s.size_bytes(), 5 * 8);
/// # Ok::<(), prism_core::Error>(())
/// ```
pub struct Storage<T: bytemuck::Pod> {
    extent: Extent,
    alloc: Arc<dyn HostAlloc<T>>,
    ptr: *mut T,
    backing: Backing<T>,
}

impl<T: bytemuck::Pod> Storage<T> {
    /// Allocate storage for `extent.count()` elements from the system heap
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] when the allocator cannot satisfy the
    /// request. Construction is all-or-nothing; no partially-built storage
    /// is observable.
    pub fn new(extent: Extent) -> Result<Self> {
        Self::with_alloc(extent, Arc::new(SystemAlloc))
    }

    /// Allocate storage through a caller-supplied allocator
    pub fn with_alloc(extent: Extent, alloc: Arc<dyn HostAlloc<T>>) -> Result<Self> {
        let run = Allocation::new(Arc::clone(&alloc), extent.count())?;
        let ptr = run.as_ptr();
        tracing::debug!(
            extent = %extent,
            count = extent.count(),
            bytes = extent.count() * mem::size_of::<T>(),
            type_name = std::any::type_name::<T>(),
            "storage_allocated"
        );
        Ok(Self {
            extent,
            alloc,
            ptr,
            backing: Backing::Owned(Arc::new(run)),
        })
    }

    /// Wrap caller-owned memory; nothing is allocated or ever freed here
    ///
    /// # Safety
    ///
    /// `data` must be valid for reads and writes of `extent.count()`
    /// contiguous elements for as long as this storage (or anything derived
    /// from it) accesses them.
    pub unsafe fn from_raw(data: *mut T, extent: Extent) -> Self {
        Self::from_raw_with_alloc(data, extent, Arc::new(SystemAlloc))
    }

    /// Wrap caller-owned memory, keeping a caller-supplied allocator for
    /// later deep copies
    ///
    /// # Safety
    ///
    /// Same contract as [`Storage::from_raw`].
    pub unsafe fn from_raw_with_alloc(
        data: *mut T,
        extent: Extent,
        alloc: Arc<dyn HostAlloc<T>>,
    ) -> Self {
        tracing::debug!(extent = %extent, count = extent.count(), "storage_wrapped");
        Self {
            extent,
            alloc,
            ptr: data,
            backing: Backing::Borrowed,
        }
    }

    /// Extent this storage is addressed by
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Number of elements
    pub fn count(&self) -> usize {
        self.extent.count()
    }

    /// Total size in bytes, `size_of::<T>() * count()`
    pub fn size_bytes(&self) -> usize {
        mem::size_of::<T>() * self.extent.count()
    }

    /// Allocator capability in use
    pub fn allocator(&self) -> Arc<dyn HostAlloc<T>> {
        Arc::clone(&self.alloc)
    }

    /// Ownership of the current target memory
    pub fn ownership(&self) -> Ownership {
        match self.backing {
            Backing::Owned(_) => Ownership::Owned,
            Backing::Borrowed => Ownership::Borrowed,
            Backing::Detached => Ownership::Detached,
        }
    }

    /// Current backing pointer; null while detached
    pub fn as_ptr(&self) -> *mut T {
        self.ptr
    }

    /// Current backing pointer as untyped bytes
    pub fn as_raw_ptr(&self) -> *mut u8 {
        self.ptr.cast()
    }

    /// Backing pointer, or [`Error::Detached`] when none is bound
    pub(crate) fn target(&self) -> Result<*mut T> {
        match self.backing {
            Backing::Detached => Err(Error::Detached),
            _ => Ok(self.ptr),
        }
    }

    /// Element at linear offset `index`
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] past the element count, [`Error::Detached`]
    /// when no memory is bound.
    pub fn get(&self, index: usize) -> Result<&T> {
        let ptr = self.target()?;
        let count = self.extent.count();
        if index >= count {
            return Err(Error::out_of_range(index, count));
        }
        Ok(unsafe { &*ptr.add(index) })
    }

    /// Mutable element at linear offset `index`
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let ptr = self.target()?;
        let count = self.extent.count();
        if index >= count {
            return Err(Error::out_of_range(index, count));
        }
        Ok(unsafe { &mut *ptr.add(index) })
    }

    /// Element at linear offset `index`, no bounds or detach check
    ///
    /// # Safety
    ///
    /// The storage must be bound to memory and `index < count()`.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        &*self.ptr.add(index)
    }

    /// Fill the storage from a host slice
    ///
    /// # Errors
    ///
    /// [`Error::SizeMismatch`] when the slice length differs from the
    /// element count.
    pub fn copy_from_slice(&mut self, src: &[T]) -> Result<()> {
        let ptr = self.target()?;
        let count = self.extent.count();
        if src.len() != count {
            return Err(Error::SizeMismatch {
                expected: count,
                actual: src.len(),
            });
        }
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), ptr, count);
        }
        Ok(())
    }

    /// Copy the storage contents into a `Vec`
    pub fn to_vec(&self) -> Result<Vec<T>> {
        let ptr = self.target()?;
        let count = self.extent.count();
        let mut out = Vec::with_capacity(count);
        unsafe {
            ptr::copy_nonoverlapping(ptr, out.as_mut_ptr(), count);
            out.set_len(count);
        }
        Ok(out)
    }

    /// Deep copy into fresh allocator-owned storage
    ///
    /// The copy never aliases the source; mutating one side is invisible to
    /// the other.
    ///
    /// # Errors
    ///
    /// [`Error::Allocation`] when the allocator cannot satisfy the copy,
    /// [`Error::Detached`] when the source targets nothing.
    pub fn try_clone(&self) -> Result<Self> {
        let src = self.target()?;
        let count = self.extent.count();
        let run = Allocation::new(Arc::clone(&self.alloc), count)?;
        unsafe {
            ptr::copy_nonoverlapping(src, run.as_ptr(), count);
        }
        tracing::debug!(
            extent = %self.extent,
            bytes = self.size_bytes(),
            "storage_deep_copied"
        );
        let ptr = run.as_ptr();
        Ok(Self {
            extent: self.extent,
            alloc: Arc::clone(&self.alloc),
            ptr,
            backing: Backing::Owned(Arc::new(run)),
        })
    }

    /// Rebind the backing pointer to nothing
    ///
    /// Finalized writes are discarded from here on; any owned allocation is
    /// released. Subsequent element access fails with [`Error::Detached`].
    pub fn detach(&mut self) {
        tracing::debug!(extent = %self.extent, "storage_detached");
        self.ptr = ptr::null_mut();
        self.backing = Backing::Detached;
    }

    /// Rebind the backing pointer to caller-supplied memory
    ///
    /// Redirects where finalized data lands. Any owned allocation is
    /// released; the new target is borrowed and never freed here.
    ///
    /// # Safety
    ///
    /// `data` must be valid for reads and writes of `count()` contiguous
    /// elements for as long as this storage accesses them.
    pub unsafe fn rebind_raw(&mut self, data: *mut T) {
        tracing::debug!(extent = %self.extent, "storage_rebound_raw");
        self.ptr = data;
        self.backing = Backing::Borrowed;
    }

    /// Rebind to shared host memory observed through a weak reference
    ///
    /// If the referent is alive, the storage co-owns it from here on and
    /// targets its base pointer. If it has expired the previous pointer is
    /// retained and [`Rebind::Expired`] reports the no-op.
    ///
    /// # Errors
    ///
    /// [`Error::SizeMismatch`] when the live referent holds fewer elements
    /// than this storage's extent requires; the storage is left unchanged.
    pub fn rebind_shared(&mut self, target: &Weak<Allocation<T>>) -> Result<Rebind> {
        let Some(shared) = target.upgrade() else {
            tracing::debug!(extent = %self.extent, "storage_rebind_expired");
            return Ok(Rebind::Expired);
        };
        let count = self.extent.count();
        if shared.count() < count {
            return Err(Error::SizeMismatch {
                expected: count,
                actual: shared.count(),
            });
        }
        tracing::debug!(extent = %self.extent, "storage_rebound_shared");
        self.ptr = shared.as_ptr();
        self.backing = Backing::Owned(shared);
        Ok(Rebind::Rebound)
    }

    /// Dimension-indexed view over this storage
    ///
    /// The view kind is selected by the extent's rank; the indexing result
    /// type differs per rank (element, row, sub-array proxy).
    pub fn view(&self) -> DimView<'_, T> {
        DimView::over(self)
    }

    /// Flattened accessor over the whole extent
    ///
    /// # Errors
    ///
    /// [`Error::Detached`] when no memory is bound.
    pub fn flatten(&self) -> Result<DeviceView<'_, T>> {
        DeviceView::over(self, Coord::zero(self.extent.rank()))
    }

    /// Flattened accessor whose work items report `origin` as their offset
    ///
    /// # Errors
    ///
    /// [`Error::RankMismatch`] when the origin's rank differs from the
    /// extent's, [`Error::Detached`] when no memory is bound.
    pub fn flatten_at(&self, origin: Coord) -> Result<DeviceView<'_, T>> {
        DeviceView::over(self, origin)
    }
}

impl<T: bytemuck::Pod> std::fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("extent", &self.extent)
            .field("ptr", &self.ptr)
            .field("ownership", &self.ownership())
            .finish()
    }
}
