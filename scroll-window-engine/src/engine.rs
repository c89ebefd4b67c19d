use alloc::sync::Arc;
use alloc::vec::Vec;

use scroll_window::{
    Axis, Direction, Epoch, Geometry, Group, IdentityMap, IndexRange, IndexSpace, OffsetTranslator,
    PageCache, ViewportState, WindowPlan,
};

use crate::diff::Reconciler;
use crate::loader::LoadCoordinator;
use crate::{
    CycleId, EngineOptions, Error, FetchError, FetchTicket, Model, OnSettledCallback, Renderer,
    Resolution, Settled,
};

/// A paged, grouped windowing engine.
///
/// The engine owns the page cache and every rendered element. The host drives it:
/// - [`Engine::resize`] / [`Engine::scroll_to`] / [`Engine::render`] from its (rate-limited)
///   scroll and resize listeners
/// - [`Engine::complete_fetch`] whenever a page requested through [`Model::fetch_page`] resolves
///
/// All calls are expected on one thread, one at a time.
pub struct Engine<M: Model, R: Renderer<Datum = M::Datum>> {
    model: M,
    renderer: R,
    options: EngineOptions,
    space: IndexSpace,
    translator: OffsetTranslator,
    cache: PageCache<M::Datum>,
    reconciler: Reconciler<R>,
    loader: LoadCoordinator,
    scroll: i64,
    plan: WindowPlan,
}

impl<M: Model, R: Renderer<Datum = M::Datum>> Engine<M, R> {
    /// Creates an engine and reads the model's metadata. Nothing is rendered until the first
    /// [`Engine::render`].
    pub fn new(model: M, renderer: R, options: EngineOptions) -> Self {
        let space = IndexSpace::new(model.total(), model.groups());
        let translator = OffsetTranslator::new(&space, options.geometry)
            .with_direction(options.direction)
            .with_viewport_extent(options.viewport_extent);
        let cache = PageCache::new(model.page_size());
        vdebug!(
            total = space.total(),
            groups = space.groups().len(),
            page_size = cache.page_size(),
            "Engine::new"
        );
        Self {
            scroll: options.initial_scroll,
            model,
            renderer,
            options,
            space,
            translator,
            cache,
            reconciler: Reconciler::new(),
            loader: LoadCoordinator::default(),
            plan: WindowPlan::default(),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Sets the settle callback.
    pub fn on_settled(&mut self, on_settled: impl Fn(&Settled) + Send + Sync + 'static) {
        self.options.on_settled = Some(Arc::new(on_settled) as OnSettledCallback);
    }

    /// Updates item/header geometry. Takes effect on the next render.
    pub fn set_viewport_geometry(
        &mut self,
        item_size: u32,
        header_size: u32,
        cross_axis_count: u32,
        axis: Axis,
    ) {
        let geometry = Geometry::new(item_size, header_size, cross_axis_count, axis);
        if geometry == self.options.geometry {
            return;
        }
        self.options.geometry = geometry;
        self.translator.rebuild_with(&self.space, geometry);
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.options.direction = direction;
        self.translator.set_direction(direction);
    }

    pub fn set_extra_margin(&mut self, extra_margin: usize) {
        self.options.extra_margin = extra_margin;
    }

    /// Applies a new viewport extent and renders.
    pub fn resize(&mut self, viewport_extent: u32) -> CycleId {
        self.options.viewport_extent = viewport_extent;
        self.translator.set_viewport_extent(viewport_extent);
        self.render()
    }

    /// Applies a raw scroll position (as reported by the host's scroller) and renders.
    pub fn scroll_to(&mut self, scroll: i64) -> CycleId {
        self.scroll = scroll;
        self.render()
    }

    /// Navigates to `index` and renders.
    ///
    /// Returns the raw scroll position the host should apply to its scroller.
    pub fn set_offset(&mut self, index: usize) -> i64 {
        let scroll = self.translator.index_to_offset(index);
        self.scroll_to(scroll);
        scroll
    }

    pub fn scroll_position(&self) -> i64 {
        self.scroll
    }

    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            offset: self.translator.offset_to_index(self.scroll),
            capacity: self.translator.capacity(),
            extra_margin: self.options.extra_margin,
            direction: self.options.direction,
        }
    }

    /// Runs one render cycle.
    ///
    /// Evicts pages and destroys elements that left the window, renders every ready index,
    /// and requests the missing pages as one batch. When nothing is missing the settle callback
    /// fires before this returns.
    pub fn render(&mut self) -> CycleId {
        let cycle = self.loader.begin_cycle();
        let plan = WindowPlan::compute(self.viewport_state(), self.space.total(), &self.cache);

        self.cache.evict_outside(&plan.needed_pages);
        let renderer = &self.renderer;
        let ready = plan.ready_identities(&self.cache, |datum| renderer.identity(datum));
        let obsolete = plan.obsolete_identities(self.reconciler.keys(), &ready);
        self.reconciler.retire(obsolete);
        self.reconciler.retire_headers(plan.candidate);

        for &index in &plan.ready {
            if let Some(datum) = self.cache.datum(index) {
                self.reconciler.show(
                    &mut self.renderer,
                    index,
                    datum,
                    &self.space,
                    &self.translator,
                );
            }
        }
        self.reconciler.sync_placeholder(&mut self.renderer);

        vtrace!(
            cycle = cycle.0,
            start = plan.candidate.start,
            end = plan.candidate.end,
            missing = plan.missing.len(),
            rendered = self.reconciler.len(),
            "render"
        );

        let epoch = self.cache.epoch();
        let waiting = self
            .loader
            .request(cycle, epoch, &plan.missing_pages, &mut self.model);
        self.plan = plan;
        if !waiting {
            self.notify(&Settled {
                cycle,
                result: Ok(()),
            });
        }
        cycle
    }

    /// Delivers the result of a page fetch.
    ///
    /// A successful page is cached and the part of it inside the current window is rendered.
    /// Results for an older epoch are dropped. When this was the last outstanding fetch of its
    /// cycle, the settle callback fires before this returns.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<M::Datum>, FetchError>,
    ) -> Resolution {
        if ticket.epoch != self.cache.epoch() {
            vdebug!(
                page = ticket.page,
                epoch = ticket.epoch.0,
                current = self.cache.epoch().0,
                "discarding fetch from stale epoch"
            );
            return Resolution::Stale;
        }
        if !self.loader.is_pending(&ticket) {
            return Resolution::Unknown;
        }

        let (resolution, failure) = match result {
            Ok(items) => {
                self.cache.put(ticket.epoch, ticket.page, items);
                let rendered = self.show_page(ticket.page);
                (Resolution::Applied { rendered }, None)
            }
            Err(source) => {
                vwarn!(page = ticket.page, error = %source, "page fetch failed");
                (
                    Resolution::Failed,
                    Some(Error::FetchFailed {
                        page: ticket.page,
                        source,
                    }),
                )
            }
        };

        if let Some(settled) = self.loader.resolve(ticket, failure) {
            self.notify(&settled);
        }
        resolution
    }

    fn show_page(&mut self, page: usize) -> usize {
        let range = self.cache.page_range(page);
        let candidate = self.plan.candidate;
        let start = range.start.max(candidate.start);
        let end = range.end.min(candidate.end);

        // Identities the page no longer holds lose their element.
        let mut incoming = IdentityMap::default();
        for index in start..end {
            if let Some(datum) = self.cache.datum(index) {
                incoming.insert(self.renderer.identity(datum), index);
            }
        }
        let stale: Vec<R::Key> = self
            .reconciler
            .keys_within(IndexRange::new(start, end))
            .filter(|key| !incoming.contains_key(*key))
            .cloned()
            .collect();
        if !stale.is_empty() {
            vtrace!(page, stale = stale.len(), "retiring replaced identities");
            self.reconciler.retire(stale);
        }

        let mut shown = 0usize;
        for index in start..end {
            let Some(datum) = self.cache.datum(index) else {
                continue;
            };
            self.reconciler.show(
                &mut self.renderer,
                index,
                datum,
                &self.space,
                &self.translator,
            );
            shown += 1;
        }
        self.reconciler.sync_placeholder(&mut self.renderer);
        shown
    }

    /// Whether a ticket would still be applied. Models can use this to skip work for requests
    /// that were superseded by [`Engine::clear`].
    pub fn is_ticket_current(&self, ticket: &FetchTicket) -> bool {
        ticket.epoch == self.cache.epoch() && self.loader.is_pending(ticket)
    }

    /// Destroys every rendered element, header and placeholder, empties the cache and starts a
    /// new epoch. Outstanding fetches become stale and their cycles never settle.
    pub fn clear(&mut self) -> Epoch {
        self.reconciler.clear();
        self.loader.abandon();
        self.plan = WindowPlan::default();
        self.cache.bump_epoch()
    }

    /// Clears, re-reads the model's metadata (total, groups, page size) and renders.
    pub fn reload(&mut self) -> CycleId {
        self.clear();
        self.space = IndexSpace::new(self.model.total(), self.model.groups());
        self.cache.set_page_size(self.model.page_size());
        self.translator
            .rebuild_with(&self.space, self.options.geometry);
        self.scroll = self.scroll.clamp(0, self.translator.max_scroll());
        self.render()
    }

    fn notify(&self, settled: &Settled) {
        vdebug!(cycle = settled.cycle.0, ok = settled.result.is_ok(), "settled");
        if let Some(cb) = &self.options.on_settled {
            cb(settled);
        }
    }

    pub fn epoch(&self) -> Epoch {
        self.cache.epoch()
    }

    pub fn cache(&self) -> &PageCache<M::Datum> {
        &self.cache
    }

    pub fn index_space(&self) -> &IndexSpace {
        &self.space
    }

    pub fn translator(&self) -> &OffsetTranslator {
        &self.translator
    }

    /// The plan of the last render cycle.
    pub fn plan(&self) -> &WindowPlan {
        &self.plan
    }

    pub fn candidate(&self) -> IndexRange {
        self.plan.candidate
    }

    pub fn rendered_len(&self) -> usize {
        self.reconciler.len()
    }

    pub fn is_rendered(&self, key: &R::Key) -> bool {
        self.reconciler.contains(key)
    }

    /// Index the element of `key` was last rendered at.
    pub fn rendered_index(&self, key: &R::Key) -> Option<usize> {
        self.reconciler.index_of(key)
    }

    pub fn rendered_item(&self, key: &R::Key) -> Option<&R::Item> {
        self.reconciler.item(key)
    }

    /// Rendered indices in ascending order.
    pub fn rendered_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.reconciler.indices()
    }

    /// Groups whose header is currently rendered.
    pub fn rendered_headers(&self) -> impl Iterator<Item = Group> + '_ {
        self.reconciler.header_groups()
    }

    pub fn has_placeholder(&self) -> bool {
        self.reconciler.has_placeholder()
    }

    /// Render cycles still waiting for fetches.
    pub fn pending_batches(&self) -> usize {
        self.loader.pending_batches()
    }

    /// Fetches issued and not yet resolved, across all pending cycles.
    pub fn in_flight(&self) -> usize {
        self.loader.in_flight()
    }
}

impl<M, R> core::fmt::Debug for Engine<M, R>
where
    M: Model,
    R: Renderer<Datum = M::Datum>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("total", &self.space.total())
            .field("epoch", &self.cache.epoch())
            .field("scroll", &self.scroll)
            .field("candidate", &self.plan.candidate)
            .field("cached_pages", &self.cache.len())
            .field("reconciler", &self.reconciler)
            .field("pending_batches", &self.loader.pending_batches())
            .finish_non_exhaustive()
    }
}
