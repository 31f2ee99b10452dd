//! Host allocator capability and owned allocations
//!
//! Storage cores consume allocators through the [`HostAlloc`] trait and hold
//! the result as an [`Allocation`]. Shared host memory - the target of the
//! weak form of late-rebind - is an `Arc<Allocation<T>>` observed through a
//! `Weak`.

use crate::error::{Error, Result};
use std::alloc::{self, Layout};
use std::mem;
use std::ptr::NonNull;
use std::sync::Arc;

/// Allocator capability consumed by storage cores
///
/// Implementations hand out contiguous runs of `count` elements and take
/// them back. Only the allocate contract is consumed here; strategy is the
/// implementor's business.
///
/// Returned storage must be zero-initialized, so that `Pod` element reads
/// are defined before the first write.
pub trait HostAlloc<T>: Send + Sync {
    /// Allocate a zero-initialized run of `count` contiguous elements
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] when the request cannot be satisfied.
    fn allocate(&self, count: usize) -> Result<NonNull<T>>;

    /// Release a run previously returned by [`allocate`](HostAlloc::allocate)
    ///
    /// # Safety
    ///
    /// `ptr` must come from a call to `allocate(count)` on this same
    /// allocator and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<T>, count: usize);
}

/// Default allocator over the global heap
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAlloc;

impl<T> HostAlloc<T> for SystemAlloc {
    fn allocate(&self, count: usize) -> Result<NonNull<T>> {
        if count == 0 {
            return Ok(NonNull::dangling());
        }
        let layout = Layout::array::<T>(count)
            .map_err(|_| Error::allocation(count, count.saturating_mul(mem::size_of::<T>())))?;
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        NonNull::new(raw.cast::<T>()).ok_or_else(|| Error::allocation(count, layout.size()))
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, count: usize) {
        if count == 0 {
            return;
        }
        // Layout was validated when the run was allocated.
        let layout = Layout::array::<T>(count).expect("layout valid at allocation");
        alloc::dealloc(ptr.as_ptr().cast(), layout);
    }
}

/// Owned run of contiguous elements
///
/// Pairs the raw pointer with the element count and the allocator that
/// produced it; the run is released on drop. Wrapping an allocation in an
/// `Arc` turns it into shared host memory that storage cores can co-own or
/// observe weakly.
pub struct Allocation<T> {
    ptr: NonNull<T>,
    count: usize,
    alloc: Arc<dyn HostAlloc<T>>,
}

impl<T: bytemuck::Pod> Allocation<T> {
    /// Allocate `count` zero-initialized elements from `alloc`
    pub fn new(alloc: Arc<dyn HostAlloc<T>>, count: usize) -> Result<Self> {
        let ptr = alloc.allocate(count)?;
        tracing::trace!(
            count,
            bytes = count * mem::size_of::<T>(),
            "allocation_created"
        );
        Ok(Self { ptr, count, alloc })
    }

    /// Allocate and fill from existing host data
    pub fn from_slice(alloc: Arc<dyn HostAlloc<T>>, data: &[T]) -> Result<Self> {
        let run = Self::new(alloc, data.len())?;
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), run.ptr.as_ptr(), data.len());
        }
        Ok(run)
    }
}

impl<T> Allocation<T> {
    /// Base pointer of the run
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Number of elements in the run
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<T> Drop for Allocation<T> {
    fn drop(&mut self) {
        unsafe {
            self.alloc.deallocate(self.ptr, self.count);
        }
    }
}

impl<T> std::fmt::Debug for Allocation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Allocation")
            .field("ptr", &self.ptr)
            .field("count", &self.count)
            .finish()
    }
}
