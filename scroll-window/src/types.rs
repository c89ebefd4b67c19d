/// A contiguous run of logical indices that share one header.
///
/// The range is half-open: `begin` is the first index of the group and `end` is one past the
/// last. A group's identity is its `begin`, which is unique because groups never overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub begin: usize,
    pub end: usize, // exclusive
}

impl Group {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.begin && index < self.end
    }

    /// Returns `true` when the group shares at least one index with `range`.
    pub fn intersects(&self, range: IndexRange) -> bool {
        self.begin < range.end && range.start < self.end
    }
}

/// A half-open range of logical indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexRange {
    pub start: usize,
    pub end: usize, // exclusive
}

impl IndexRange {
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    pub fn iter(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }
}

/// The scroll axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

/// Orientation of the scroll coordinate system.
///
/// `Reversed` covers right-to-left horizontal lists and bottom-anchored vertical lists: a scroll
/// position of `0` shows the *end* of the content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Forward,
    Reversed,
}

/// Fixed per-item geometry of the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    /// Size of one row along the scroll axis.
    pub item_size: u32,
    /// Size of a group header along the scroll axis.
    pub header_size: u32,
    /// Number of items tiled along the cross axis in each row.
    pub cross_axis_count: u32,
    pub axis: Axis,
}

impl Geometry {
    pub fn new(item_size: u32, header_size: u32, cross_axis_count: u32, axis: Axis) -> Self {
        Self {
            item_size,
            header_size,
            cross_axis_count,
            axis,
        }
    }

    /// Item size clamped to at least one pixel.
    pub fn item_extent(&self) -> i64 {
        self.item_size.max(1) as i64
    }

    /// Items per row, clamped to at least one.
    pub fn per_row(&self) -> usize {
        self.cross_axis_count.max(1) as usize
    }

    /// Number of rows needed to lay out `len` items.
    pub fn rows_for(&self, len: usize) -> usize {
        len.div_ceil(self.per_row())
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(1, 0, 1, Axis::Vertical)
    }
}

/// Where an item element should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub index: usize,
    /// Row within the item's run (group or ungrouped gap).
    pub row: usize,
    /// Column along the cross axis.
    pub column: usize,
    /// Leading edge of the item along the scroll axis, in content pixels. Measured from the end
    /// of the content in reversed mode.
    pub main_start: i64,
    pub first_in_group: bool,
    pub direction: Direction,
    pub axis: Axis,
}
