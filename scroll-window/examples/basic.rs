// Example: translate a scroll position into a window plan and see which pages it needs.
use scroll_window::{
    Axis, Geometry, IndexSpace, OffsetTranslator, PageCache, ViewportState, WindowPlan,
};

fn main() {
    let space = IndexSpace::ungrouped(100_000);
    let translator = OffsetTranslator::new(&space, Geometry::new(50, 0, 1, Axis::Vertical))
        .with_viewport_extent(500);
    let mut cache = PageCache::<u32>::new(20);

    let viewport = ViewportState {
        offset: translator.offset_to_index(12_345),
        capacity: translator.capacity(),
        extra_margin: 2,
        ..ViewportState::default()
    };
    let plan = WindowPlan::compute(viewport, space.total(), &cache);
    println!("content_extent={}", translator.content_extent());
    println!("candidate={:?}", plan.candidate);
    println!("missing_pages={:?}", plan.missing_pages);

    // Pretend the fetches came back.
    let epoch = cache.epoch();
    for &page in &plan.missing_pages {
        let range = cache.page_range(page);
        cache.put(epoch, page, (range.start as u32..range.end as u32).collect());
    }
    let plan = WindowPlan::compute(viewport, space.total(), &cache);
    println!("ready={:?}..={:?}", plan.ready.first(), plan.ready.last());
}
