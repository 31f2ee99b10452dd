//! Work-item descriptor

use crate::coord::{Coord, Offset};
use crate::extent::Extent;

/// One point of a launch range
///
/// A work item pairs a coordinate with the global range it was launched
/// over and the origin offset of that launch. Kernel-side code receives
/// work items; host-side accessors resolve them back to element addresses
/// through the coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    range: Extent,
    id: Coord,
    offset: Offset,
}

impl WorkItem {
    /// Create a work item from range, coordinate, and launch offset
    ///
    /// The three parts are expected to share one rank; mixed ranks are not
    /// rejected here but fail any later range resolution.
    pub const fn new(range: Extent, id: Coord, offset: Offset) -> Self {
        Self { range, id, offset }
    }

    /// Coordinate of this item within its range
    pub const fn id(&self) -> Coord {
        self.id
    }

    /// Global range the item belongs to
    pub const fn range(&self) -> Extent {
        self.range
    }

    /// Origin offset the range was launched with
    pub const fn offset(&self) -> Offset {
        self.offset
    }

    /// Coordinate shifted by the launch offset
    ///
    /// Returns `None` if the offset's rank does not match the item's.
    pub fn global_id(&self) -> Option<Coord> {
        self.id.offset_by(self.offset)
    }

    /// Row-major linear position of this item within its range
    ///
    /// Returns `None` if the coordinate falls outside the range.
    pub fn linear(&self) -> Option<usize> {
        self.range.linear_index(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_linear() {
        let item = WorkItem::new(Extent::d2(3, 4), Coord::d2(2, 1), Coord::zero(2));
        assert_eq!(item.linear(), Some(2 * 4 + 1));
    }

    #[test]
    fn test_work_item_global_id() {
        let item = WorkItem::new(Extent::d1(8), Coord::d1(3), Coord::d1(16));
        assert_eq!(item.global_id(), Some(Coord::d1(19)));
        assert_eq!(item.linear(), Some(3));
    }

    #[test]
    fn test_work_item_out_of_range() {
        let item = WorkItem::new(Extent::d1(4), Coord::d1(4), Coord::zero(1));
        assert_eq!(item.linear(), None);
    }
}
