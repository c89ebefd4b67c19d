use crate::{Direction, IndexRange};

/// A lightweight, serializable snapshot of the viewport, in item units.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    /// First logical index estimated to sit at the leading edge of the viewport.
    pub offset: usize,
    /// Items that fit in the viewport along the scroll axis.
    pub capacity: usize,
    /// Symmetric lookahead, in items, on both sides of the visible items.
    pub extra_margin: usize,
    pub direction: Direction,
}

impl ViewportState {
    /// The needed window: visible items plus `extra_margin` on both sides, clamped to `total`.
    ///
    /// Empty when nothing fits in the viewport.
    pub fn candidate(&self, total: usize) -> IndexRange {
        if self.capacity == 0 || total == 0 {
            return IndexRange::EMPTY;
        }
        let start = self.offset.saturating_sub(self.extra_margin).min(total);
        let end = self
            .offset
            .saturating_add(self.capacity)
            .saturating_add(self.extra_margin)
            .min(total);
        IndexRange::new(start, end)
    }
}
