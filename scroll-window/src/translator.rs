use alloc::vec::Vec;

use crate::{Direction, Geometry, IndexSpace, Placement};

/// A maximal run of indices laid out the same way: either one group (header + rows) or a gap
/// between groups (rows only).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Run {
    begin: usize,
    end: usize,
    header: bool,
    /// Leading pixel of the run, before its header.
    start: i64,
}

/// Bidirectional mapping between scroll pixels and logical indices.
///
/// Pixels are signed so that the reversed transform
/// (`content_extent - viewport_extent - px`) is its own inverse even when the viewport is larger
/// than the content.
#[derive(Clone, Debug)]
pub struct OffsetTranslator {
    geometry: Geometry,
    direction: Direction,
    viewport_extent: u32,
    total: usize,
    runs: Vec<Run>,
    content_extent: i64,
}

impl OffsetTranslator {
    pub fn new(space: &IndexSpace, geometry: Geometry) -> Self {
        let mut t = Self {
            geometry,
            direction: Direction::Forward,
            viewport_extent: 0,
            total: space.total(),
            runs: Vec::new(),
            content_extent: 0,
        };
        t.rebuild(space);
        t
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_viewport_extent(mut self, viewport_extent: u32) -> Self {
        self.viewport_extent = viewport_extent;
        self
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn viewport_extent(&self) -> u32 {
        self.viewport_extent
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn set_viewport_extent(&mut self, viewport_extent: u32) {
        self.viewport_extent = viewport_extent;
    }

    /// Recomputes the run table for new metadata or geometry.
    pub fn rebuild_with(&mut self, space: &IndexSpace, geometry: Geometry) {
        self.geometry = geometry;
        self.rebuild(space);
    }

    fn rebuild(&mut self, space: &IndexSpace) {
        self.total = space.total();
        self.runs.clear();

        let item = self.geometry.item_extent();
        let header = self.geometry.header_size;
        let mut rows_before = 0i64;
        let mut cursor = 0usize;
        let mut push = |runs: &mut Vec<Run>, begin: usize, end: usize, is_group: bool| {
            let start = rows_before * item + space.header_overhead_before(begin, header) as i64;
            runs.push(Run {
                begin,
                end,
                header: is_group,
                start,
            });
            rows_before += self.geometry.rows_for(end - begin) as i64;
        };

        for g in space.groups() {
            if cursor < g.begin {
                push(&mut self.runs, cursor, g.begin, false);
            }
            push(&mut self.runs, g.begin, g.end, true);
            cursor = g.end;
        }
        if cursor < self.total {
            push(&mut self.runs, cursor, self.total, false);
        }

        self.content_extent = self.runs.last().map_or(0, |r| self.run_end(r));
    }

    fn header_of(&self, run: &Run) -> i64 {
        if run.header {
            self.geometry.header_size as i64
        } else {
            0
        }
    }

    fn run_end(&self, run: &Run) -> i64 {
        let rows = self.geometry.rows_for(run.end - run.begin) as i64;
        run.start + self.header_of(run) + rows * self.geometry.item_extent()
    }

    fn run_for_index(&self, index: usize) -> Option<&Run> {
        let after = self.runs.partition_point(|r| r.begin <= index);
        self.runs.get(after.checked_sub(1)?)
    }

    /// Total pixel extent of the laid-out content (items plus headers).
    pub fn content_extent(&self) -> i64 {
        self.content_extent
    }

    /// Largest forward scroll position that still fills the viewport.
    pub fn max_scroll(&self) -> i64 {
        (self.content_extent - self.viewport_extent as i64).max(0)
    }

    /// Maps a raw scroll position to the forward coordinate system.
    ///
    /// In reversed mode this is `content_extent - viewport_extent - px`; applying it twice
    /// returns the original value. Results saturate at the bounds of `i64`.
    pub fn normalize(&self, px: i64) -> i64 {
        match self.direction {
            Direction::Forward => px,
            Direction::Reversed => (self.content_extent - self.viewport_extent as i64)
                .saturating_sub(px),
        }
    }

    /// Items that fit in the viewport: visible rows (rounded up) times items per row.
    pub fn capacity(&self) -> usize {
        let rows = (self.viewport_extent as u64).div_ceil(self.geometry.item_extent() as u64);
        (rows as usize).saturating_mul(self.geometry.per_row())
    }

    /// The logical index at scroll position `px`.
    pub fn offset_to_index(&self, px: i64) -> usize {
        let px = self.normalize(px);
        let after = self.runs.partition_point(|r| r.start <= px);
        let Some(run) = after.checked_sub(1).and_then(|i| self.runs.get(i)) else {
            return 0;
        };

        let item = self.geometry.item_extent();
        let rel = px.saturating_sub(run.start + self.header_of(run));
        let row = if rel <= 0 {
            0
        } else {
            usize::try_from(rel.saturating_add(item / 2) / item).unwrap_or(usize::MAX)
        };
        let index = run
            .begin
            .saturating_add(row.saturating_mul(self.geometry.per_row()));
        index.clamp(run.begin, run.end - 1)
    }

    /// The scroll position that brings `index` to the leading edge of the viewport.
    ///
    /// Items inside a group (other than its first) land one pixel past the row boundary so the
    /// group's header is fully scrolled out.
    pub fn index_to_offset(&self, index: usize) -> i64 {
        let Some(run) = self.run_for_index(index.min(self.total.saturating_sub(1))) else {
            return self.normalize(0);
        };
        let index = index.min(run.end - 1);
        let correction = i64::from(run.header && index != run.begin);
        self.normalize(self.forward_item_start(run, index) + correction)
    }

    fn forward_item_start(&self, run: &Run, index: usize) -> i64 {
        let row = ((index - run.begin) / self.geometry.per_row()) as i64;
        run.start + self.header_of(run) + row * self.geometry.item_extent()
    }

    /// Leading pixel of `index` in content coordinates, without the boundary correction.
    ///
    /// In reversed mode this is measured from the end of the content.
    pub fn item_start(&self, index: usize) -> Option<i64> {
        let run = self.run_for_index(index).filter(|r| index < r.end)?;
        let start = self.forward_item_start(run, index);
        Some(match self.direction {
            Direction::Forward => start,
            Direction::Reversed => self.content_extent - start - self.geometry.item_extent(),
        })
    }

    /// Leading pixel of the header of the group starting at `begin`.
    pub fn header_start(&self, begin: usize) -> Option<i64> {
        let run = self
            .run_for_index(begin)
            .filter(|r| r.header && r.begin == begin)?;
        Some(match self.direction {
            Direction::Forward => run.start,
            Direction::Reversed => {
                self.content_extent - run.start - self.geometry.header_size as i64
            }
        })
    }

    /// Positional geometry for the item at `index`.
    pub fn placement(&self, index: usize) -> Option<Placement> {
        let run = self.run_for_index(index).filter(|r| index < r.end)?;
        let rel = index - run.begin;
        let per_row = self.geometry.per_row();
        Some(Placement {
            index,
            row: rel / per_row,
            column: rel % per_row,
            main_start: self.item_start(index)?,
            first_in_group: run.header && index == run.begin,
            direction: self.direction,
            axis: self.geometry.axis,
        })
    }
}
