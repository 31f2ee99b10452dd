//! Launch-shape descriptors

use crate::coord::Offset;
use crate::extent::Extent;
use std::fmt;

/// Iteration-space descriptor for one kernel dispatch
///
/// A dispatch record carries exactly one launch shape. The variants cover
/// the launch forms a single-source kernel can be submitted with:
///
/// - [`SingleTask`](LaunchShape::SingleTask) - one invocation
/// - [`Range`](LaunchShape::Range) - an N-dimensional range of work items
/// - [`RangeWithOffset`](LaunchShape::RangeWithOffset) - a range whose work
///   items see a shifted origin
/// - [`NdRange`](LaunchShape::NdRange) - a global range with an explicit
///   per-group local range
/// - [`WorkGroups`](LaunchShape::WorkGroups) - a range of groups, with the
///   per-group size either stated or left to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchShape {
    /// One kernel invocation, no iteration space
    SingleTask,
    /// N-dimensional range of independent work items
    Range { global: Extent },
    /// Range whose items observe a shifted origin
    RangeWithOffset { global: Extent, offset: Offset },
    /// Global range partitioned into groups of an explicit local size
    NdRange { global: Extent, local: Extent },
    /// Range of work groups; `size` is the per-group size when stated
    WorkGroups { count: Extent, size: Option<Extent> },
}

impl LaunchShape {
    /// Short name of the launch form
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SingleTask => "single_task",
            Self::Range { .. } => "range",
            Self::RangeWithOffset { .. } => "range_with_offset",
            Self::NdRange { .. } => "nd_range",
            Self::WorkGroups { .. } => "work_groups",
        }
    }

    /// Total number of work items this shape describes
    ///
    /// For grouped shapes without an explicit per-group size only the group
    /// count is known, so that count is reported.
    pub fn work_item_count(&self) -> usize {
        match self {
            Self::SingleTask => 1,
            Self::Range { global } | Self::RangeWithOffset { global, .. } => global.count(),
            Self::NdRange { global, .. } => global.count(),
            Self::WorkGroups { count, size } => match size {
                Some(s) => count.count() * s.count(),
                None => count.count(),
            },
        }
    }
}

impl fmt::Display for LaunchShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleTask => write!(f, "single_task"),
            Self::Range { global } => write!(f, "range {global}"),
            Self::RangeWithOffset { global, offset } => {
                write!(f, "range {global} offset {offset}")
            }
            Self::NdRange { global, local } => write!(f, "nd_range {global} local {local}"),
            Self::WorkGroups { count, size } => match size {
                Some(s) => write!(f, "work_groups {count} size {s}"),
                None => write!(f, "work_groups {count}"),
            },
        }
    }
}
