use alloc::sync::Arc;

use scroll_window::{Axis, Direction, Geometry};

use crate::Settled;

/// A callback fired once per render cycle, after every load that cycle triggered has resolved.
pub type OnSettledCallback = Arc<dyn Fn(&Settled) + Send + Sync>;

/// Configuration for [`crate::Engine`].
///
/// Cheap to clone: the settle callback is stored in an `Arc`.
#[derive(Clone)]
pub struct EngineOptions {
    pub geometry: Geometry,

    /// Symmetric lookahead, in items, rendered and fetched on both sides of the viewport.
    pub extra_margin: usize,

    pub direction: Direction,

    /// Viewport size along the scroll axis, in pixels.
    pub viewport_extent: u32,

    /// Raw scroll position applied by `Engine::new`.
    pub initial_scroll: i64,

    pub on_settled: Option<OnSettledCallback>,
}

impl EngineOptions {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            extra_margin: 1,
            direction: Direction::Forward,
            viewport_extent: 0,
            initial_scroll: 0,
            on_settled: None,
        }
    }

    /// Options for a vertical list with one item per row and no headers.
    pub fn list(item_size: u32) -> Self {
        Self::new(Geometry::new(item_size, 0, 1, Axis::Vertical))
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_header_size(mut self, header_size: u32) -> Self {
        self.geometry.header_size = header_size;
        self
    }

    pub fn with_extra_margin(mut self, extra_margin: usize) -> Self {
        self.extra_margin = extra_margin;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_viewport_extent(mut self, viewport_extent: u32) -> Self {
        self.viewport_extent = viewport_extent;
        self
    }

    pub fn with_initial_scroll(mut self, initial_scroll: i64) -> Self {
        self.initial_scroll = initial_scroll;
        self
    }

    pub fn with_on_settled(
        mut self,
        on_settled: Option<impl Fn(&Settled) + Send + Sync + 'static>,
    ) -> Self {
        self.on_settled = on_settled.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EngineOptions")
            .field("geometry", &self.geometry)
            .field("extra_margin", &self.extra_margin)
            .field("direction", &self.direction)
            .field("viewport_extent", &self.viewport_extent)
            .field("initial_scroll", &self.initial_scroll)
            .finish_non_exhaustive()
    }
}
