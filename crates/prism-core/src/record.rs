//! Kernel-dispatch record
//!
//! A [`DispatchRecord`] accumulates one kernel invocation across its build
//! phase: the kernel's identity, the launch shape, and an index-to-value
//! argument mapping. No execution happens here; the finished record is the
//! one artifact handed across the [`Dispatcher`] boundary to an external
//! executor.
//!
//! Kernel identity is a caller-supplied stable name ([`KernelId`]), not a
//! derived type name, so it survives recompilation unchanged.

use crate::accessor::RawDeviceView;
use crate::error::{Error, Result};
use prism_shape::LaunchShape;
use std::collections::BTreeMap;
use std::fmt;

/// Stable kernel identity
///
/// Names are caller-registered and must be non-empty; the same name always
/// denotes the same kernel to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KernelId(String);

impl KernelId {
    /// Create a kernel identity from a registered name
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKernelName`] for an empty name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyKernelName);
        }
        Ok(Self(name))
    }

    /// The registered name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KernelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scalar argument value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
}

/// One bound kernel argument
///
/// Arguments are device-visible data: plain scalars, erased buffer
/// accessors, or opaque bytes the backend knows how to interpret.
#[derive(Debug, Clone)]
pub enum KernelArg {
    /// Plain scalar
    Scalar(Scalar),
    /// Erased flattened accessor referencing a buffer
    View(RawDeviceView),
    /// Opaque device-visible bytes
    Bytes(Vec<u8>),
}

impl KernelArg {
    /// Short name of the argument kind
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::View(_) => "view",
            Self::Bytes(_) => "bytes",
        }
    }
}

impl From<Scalar> for KernelArg {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<RawDeviceView> for KernelArg {
    fn from(value: RawDeviceView) -> Self {
        Self::View(value)
    }
}

impl From<Vec<u8>> for KernelArg {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

macro_rules! scalar_arg {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for KernelArg {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::$variant(value))
                }
            }
        )*
    };
}

scalar_arg! {
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}

/// Accumulated description of one kernel invocation
///
/// Created fresh per submission, populated during a single build phase,
/// then consumed read-only by a [`Dispatcher`]. Argument indices are
/// caller-supplied; binding the same index twice overwrites, and the
/// previous binding is returned so the caller can diagnose the collision.
///
/// # Example
///
/// ```
/// use prism_core::{DispatchRecord, KernelId};
/// use prism_shape::{Extent, LaunchShape};
///
/// let mut record = DispatchRecord::new(KernelId::new("vector_add")?);
/// record.record_launch_shape(LaunchShape::Range {
///     global: Extent::d1(1024),
/// })?;
/// record.set_arg(0, 1024u32);
/// assert_eq!(record.arg_count(), 1);
/// # Ok::<(), prism_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DispatchRecord {
    kernel: KernelId,
    shape: Option<LaunchShape>,
    args: BTreeMap<usize, KernelArg>,
}

impl DispatchRecord {
    /// Begin a record for the named kernel
    pub fn new(kernel: KernelId) -> Self {
        tracing::debug!(kernel = %kernel, "dispatch_record_opened");
        Self {
            kernel,
            shape: None,
            args: BTreeMap::new(),
        }
    }

    /// Kernel identity
    pub fn kernel(&self) -> &KernelId {
        &self.kernel
    }

    /// Record the launch shape
    ///
    /// Exactly one launch form is active per record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeAlreadyRecorded`] if a shape was recorded
    /// before; the existing shape is kept.
    pub fn record_launch_shape(&mut self, shape: LaunchShape) -> Result<()> {
        if let Some(existing) = &self.shape {
            return Err(Error::ShapeAlreadyRecorded {
                existing: existing.kind(),
            });
        }
        tracing::debug!(kernel = %self.kernel, shape = %shape, "launch_shape_recorded");
        self.shape = Some(shape);
        Ok(())
    }

    /// Recorded launch shape, if any
    pub fn launch_shape(&self) -> Option<&LaunchShape> {
        self.shape.as_ref()
    }

    /// Bind `value` at argument position `index`
    ///
    /// Call order does not matter; the final state is the index-to-value
    /// mapping. A duplicate index overwrites and hands back the previous
    /// binding.
    pub fn set_arg(&mut self, index: usize, value: impl Into<KernelArg>) -> Option<KernelArg> {
        let value = value.into();
        let previous = self.args.insert(index, value);
        if previous.is_some() {
            tracing::debug!(kernel = %self.kernel, index, "argument_overwritten");
        }
        previous
    }

    /// Bind a run of values at positions `0..n`
    ///
    /// Positional assignment with the same overwrite semantics as
    /// [`set_arg`](Self::set_arg): the run replaces whatever was bound at
    /// those indices, and bindings past the run are untouched.
    pub fn set_args<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<KernelArg>,
    {
        for (index, value) in values.into_iter().enumerate() {
            self.set_arg(index, value);
        }
    }

    /// Binding at argument position `index`
    pub fn arg(&self, index: usize) -> Option<&KernelArg> {
        self.args.get(&index)
    }

    /// Number of bound arguments
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Bindings in ascending index order
    pub fn args(&self) -> impl Iterator<Item = (usize, &KernelArg)> {
        self.args.iter().map(|(&i, a)| (i, a))
    }
}

/// Backend dispatch boundary
///
/// The sole artifact this subsystem emits: a finalized record - kernel
/// identity, launch shape, argument bindings - submitted for execution
/// elsewhere. Implementations live outside this crate.
pub trait Dispatcher {
    /// Consume one finalized dispatch record
    fn submit(&mut self, record: &DispatchRecord) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_shape::Extent;

    #[test]
    fn test_kernel_id_rejects_empty() {
        assert!(matches!(KernelId::new(""), Err(Error::EmptyKernelName)));
        assert_eq!(KernelId::new("relu").unwrap().as_str(), "relu");
    }

    #[test]
    fn test_set_arg_order_independent() {
        let mut record = DispatchRecord::new(KernelId::new("k").unwrap());
        record.set_arg(2, 30u32);
        record.set_arg(0, 10u32);
        record.set_arg(1, 20u32);

        let collected: Vec<usize> = record.args().map(|(i, _)| i).collect();
        assert_eq!(collected, vec![0, 1, 2]);
        assert!(matches!(
            record.arg(2),
            Some(KernelArg::Scalar(Scalar::U32(30)))
        ));
    }

    #[test]
    fn test_duplicate_index_overwrites_and_reports() {
        let mut record = DispatchRecord::new(KernelId::new("k").unwrap());
        assert!(record.set_arg(0, 1u32).is_none());
        let previous = record.set_arg(0, 2u32);
        assert!(matches!(
            previous,
            Some(KernelArg::Scalar(Scalar::U32(1)))
        ));
        assert_eq!(record.arg_count(), 1);
    }

    #[test]
    fn test_set_args_assigns_from_zero() {
        let mut record = DispatchRecord::new(KernelId::new("k").unwrap());
        record.set_arg(5, 99u32);
        record.set_args([1.0f32, 2.0, 3.0]);

        assert_eq!(record.arg_count(), 4);
        assert!(matches!(
            record.arg(0),
            Some(KernelArg::Scalar(Scalar::F32(v))) if *v == 1.0
        ));
        // Bindings past the run are untouched.
        assert!(matches!(
            record.arg(5),
            Some(KernelArg::Scalar(Scalar::U32(99)))
        ));
    }

    #[test]
    fn test_single_launch_shape() {
        let mut record = DispatchRecord::new(KernelId::new("k").unwrap());
        record
            .record_launch_shape(LaunchShape::Range {
                global: Extent::d1(64),
            })
            .unwrap();
        let second = record.record_launch_shape(LaunchShape::SingleTask);
        assert!(matches!(
            second,
            Err(Error::ShapeAlreadyRecorded { existing: "range" })
        ));
        assert_eq!(record.launch_shape().unwrap().kind(), "range");
    }
}
