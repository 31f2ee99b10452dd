//! # prism-core - Memory and Dispatch Core
//!
//! Host-side memory containers and kernel-dispatch accumulation for a
//! single-source heterogeneous-compute runtime.
//!
//! ## Architecture
//!
//! ```text
//! Storage<T>  ──view()──▶  DimView (View1 / View2 / View3 ─▶ Plane)
//!     │
//!     ├──flatten()──▶  DeviceView ──erase()──▶ RawDeviceView
//!     │                                             │
//!     └─ late-rebind (detach / raw / shared)        ▼
//!                                        DispatchRecord ──▶ Dispatcher
//! ```
//!
//! - [`Storage`] owns or borrows one contiguous run of `Pod` elements
//!   sized by an [`Extent`], with explicit [`Ownership`] tagging, deep
//!   copies, and a late-rebind surface for host write-back.
//! - [`DimView`] layers rank-specific indexing on top: element, row, or
//!   chained sub-array resolution, checked by default.
//! - [`DeviceView`] is the flattened pointer-plus-strides accessor used on
//!   the execution path; it resolves to the same addresses as the views.
//! - [`DispatchRecord`] accumulates one kernel invocation (identity,
//!   launch shape, argument bindings) for submission across the
//!   [`Dispatcher`] boundary.
//!
//! No kernel executes here and nothing blocks: every operation is
//! synchronous, local, and unsynchronized. Callers keep derived views and
//! records inside the lifetime of the storage they reference.
//!
//! ## Example
//!
//! ```
//! use prism_core::{DispatchRecord, KernelId, Storage};
//! use prism_shape::{Extent, LaunchShape};
//!
//! // Allocate a 2-D buffer and fill it.
//! let mut input: Storage<f32> = Storage::new(Extent::d2(4, 256))?;
//! let data = vec![1.0f32; 1024];
//! input.copy_from_slice(&data)?;
//!
//! // Build one kernel invocation against it.
//! let mut record = DispatchRecord::new(KernelId::new("scale_rows")?);
//! record.record_launch_shape(LaunchShape::Range {
//!     global: input.extent(),
//! })?;
//! record.set_arg(0, input.flatten()?.erase());
//! record.set_arg(1, 2.0f32);
//!
//! // `record` now crosses the Dispatcher boundary to a backend executor.
//! # Ok::<(), prism_core::Error>(())
//! ```

pub mod accessor;
pub mod alloc;
pub mod error;
pub mod record;
pub mod storage;
pub mod view;

pub use accessor::{DeviceView, RawDeviceView};
pub use alloc::{Allocation, HostAlloc, SystemAlloc};
pub use error::{Error, Rebind, Result};
pub use record::{DispatchRecord, Dispatcher, KernelArg, KernelId, Scalar};
pub use storage::{Ownership, Storage};
pub use view::{DimView, Plane, View1, View2, View3};

// Shape types are part of the public vocabulary.
pub use prism_shape::{Coord, Extent, LaunchShape, Offset, WorkItem};
