use crate::*;

use alloc::collections::BTreeSet;
use alloc::vec;
use alloc::vec::Vec;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

fn random_space(rng: &mut Lcg) -> IndexSpace {
    let total = rng.gen_range_usize(1, 400);
    let mut groups = Vec::new();
    let mut cursor = 0usize;
    while cursor < total {
        let gap = if rng.gen_bool() {
            rng.gen_range_usize(0, 8)
        } else {
            0
        };
        let begin = cursor + gap;
        if begin >= total {
            break;
        }
        let end = (begin + rng.gen_range_usize(1, 40)).min(total);
        groups.push(Group::new(begin, end));
        cursor = end;
    }
    IndexSpace::try_new(total, groups).unwrap()
}

fn filled_cache(page_size: usize, pages: &[usize]) -> PageCache<usize> {
    let mut cache = PageCache::new(page_size);
    let epoch = cache.epoch();
    for &page in pages {
        let start = page * page_size;
        assert!(cache.put(epoch, page, (start..start + page_size).collect()));
    }
    cache
}

#[test]
fn group_lookup_skips_gaps() {
    let space = IndexSpace::try_new(50, [Group::new(0, 10), Group::new(15, 30)]).unwrap();
    assert_eq!(space.group_at(0), Some(Group::new(0, 10)));
    assert_eq!(space.group_at(9), Some(Group::new(0, 10)));
    assert_eq!(space.group_at(10), None);
    assert_eq!(space.group_at(14), None);
    assert_eq!(space.group_at(15), Some(Group::new(15, 30)));
    assert_eq!(space.group_at(30), None);
    assert_eq!(space.group_at(49), None);
    assert!(space.is_group_start(15));
    assert!(!space.is_group_start(16));
}

#[test]
fn header_overhead_counts_passed_headers() {
    let space = IndexSpace::try_new(50, [Group::new(0, 10), Group::new(15, 30)]).unwrap();
    assert_eq!(space.header_overhead_before(0, 32), 0);
    assert_eq!(space.header_overhead_before(1, 32), 32);
    assert_eq!(space.header_overhead_before(12, 32), 32);
    assert_eq!(space.header_overhead_before(15, 32), 32);
    assert_eq!(space.header_overhead_before(16, 32), 64);
    assert_eq!(space.header_overhead_before(49, 32), 64);
}

#[test]
fn strict_metadata_is_rejected() {
    assert_eq!(
        IndexSpace::try_new(10, [Group::new(0, 12)]),
        Err(MetadataError::OutOfBounds {
            position: 0,
            end: 12,
            total: 10
        })
    );
    assert_eq!(
        IndexSpace::try_new(10, [Group::new(4, 4)]),
        Err(MetadataError::EmptyGroup { position: 0 })
    );
    assert_eq!(
        IndexSpace::try_new(20, [Group::new(5, 8), Group::new(2, 4)]),
        Err(MetadataError::Unsorted { position: 1 })
    );
    assert_eq!(
        IndexSpace::try_new(20, [Group::new(0, 8), Group::new(4, 12)]),
        Err(MetadataError::Overlapping { position: 1 })
    );
}

#[test]
fn inconsistent_metadata_is_clamped() {
    let space = IndexSpace::new(
        20,
        [
            Group::new(0, 8),
            Group::new(4, 12),
            Group::new(12, 12),
            Group::new(15, 40),
            Group::new(25, 30),
        ],
    );
    assert_eq!(space.groups(), &[Group::new(0, 8), Group::new(15, 20)]);
    assert_eq!(space.total(), 20);
}

#[test]
fn groups_intersecting_range() {
    let space = IndexSpace::try_new(
        100,
        [Group::new(0, 10), Group::new(10, 20), Group::new(40, 60)],
    )
    .unwrap();
    let hit: Vec<Group> = space
        .groups_intersecting(IndexRange::new(15, 45))
        .copied()
        .collect();
    assert_eq!(hit, vec![Group::new(10, 20), Group::new(40, 60)]);
    assert_eq!(
        space.groups_intersecting(IndexRange::new(20, 40)).count(),
        0
    );
}

#[test]
fn grouped_offsets_include_header_and_boundary_pixel() {
    let space = IndexSpace::try_new(20, [Group::new(0, 20)]).unwrap();
    let t = OffsetTranslator::new(&space, Geometry::new(48, 32, 1, Axis::Vertical));
    assert_eq!(t.index_to_offset(0), 32);
    assert_eq!(t.index_to_offset(5), 32 + 5 * 48 + 1);
    assert_eq!(t.offset_to_index(32), 0);
    assert_eq!(t.offset_to_index(32 + 5 * 48 + 1), 5);
    assert_eq!(t.content_extent(), 32 + 20 * 48);
}

#[test]
fn offsets_inside_header_clamp_to_group_begin() {
    let space = IndexSpace::try_new(40, [Group::new(0, 20), Group::new(20, 40)]).unwrap();
    let t = OffsetTranslator::new(&space, Geometry::new(48, 32, 1, Axis::Vertical));
    // Second group starts after the first group's header and rows.
    let second = 32 + 20 * 48;
    assert_eq!(t.offset_to_index(second), 20);
    assert_eq!(t.offset_to_index(second + 10), 20);
    assert_eq!(t.index_to_offset(20), second + 32);
}

#[test]
fn ungrouped_fallback_tiles_by_cross_axis_count() {
    let space = IndexSpace::ungrouped(100);
    let t = OffsetTranslator::new(&space, Geometry::new(50, 0, 3, Axis::Vertical));
    assert_eq!(t.offset_to_index(0), 0);
    assert_eq!(t.offset_to_index(100), 6);
    assert_eq!(t.offset_to_index(124), 6);
    assert_eq!(t.offset_to_index(125), 9);
    assert_eq!(t.index_to_offset(7), 100);
    assert_eq!(t.content_extent(), 34 * 50);
}

#[test]
fn reversed_scroll_is_normalized_from_the_end() {
    let space = IndexSpace::ungrouped(100);
    let t = OffsetTranslator::new(&space, Geometry::new(10, 0, 1, Axis::Horizontal))
        .with_direction(Direction::Reversed)
        .with_viewport_extent(300);
    assert_eq!(t.content_extent(), 1000);
    assert_eq!(t.normalize(100), 600);
    assert_eq!(t.normalize(t.normalize(100)), 100);
    assert_eq!(t.offset_to_index(100), 60);
    assert_eq!(t.index_to_offset(60), 100);
}

#[test]
fn extreme_offsets_saturate_to_the_ends() {
    let space = IndexSpace::new(100, [Group::new(10, 40)]);
    let mut t = OffsetTranslator::new(&space, Geometry::new(10, 20, 1, Axis::Vertical))
        .with_viewport_extent(300);
    assert_eq!(t.offset_to_index(i64::MAX), 99);
    assert_eq!(t.offset_to_index(i64::MIN), 0);

    t.set_direction(Direction::Reversed);
    assert_eq!(t.normalize(i64::MIN), i64::MAX);
    assert_eq!(t.offset_to_index(i64::MIN), 99);
    assert_eq!(t.offset_to_index(i64::MAX), 0);
}

#[test]
fn round_trip_random_layouts() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..200 {
        let space = random_space(&mut rng);
        let geometry = Geometry::new(
            rng.gen_range_usize(3, 80) as u32,
            rng.gen_range_usize(0, 60) as u32,
            1,
            Axis::Vertical,
        );
        let direction = if rng.gen_bool() {
            Direction::Reversed
        } else {
            Direction::Forward
        };
        let t = OffsetTranslator::new(&space, geometry)
            .with_direction(direction)
            .with_viewport_extent(rng.gen_range_usize(0, 2000) as u32);
        for i in 0..space.total() {
            assert_eq!(
                t.offset_to_index(t.index_to_offset(i)),
                i,
                "space={space:?} geometry={geometry:?} direction={direction:?}"
            );
        }
    }
}

#[test]
fn placement_reports_rows_columns_and_group_start() {
    let space = IndexSpace::try_new(30, [Group::new(10, 30)]).unwrap();
    let t = OffsetTranslator::new(&space, Geometry::new(20, 30, 4, Axis::Vertical));

    let p = t.placement(3).unwrap();
    assert_eq!((p.row, p.column, p.main_start), (0, 3, 0));
    assert!(!p.first_in_group);

    let p = t.placement(10).unwrap();
    // 10 ungrouped items take 3 rows.
    assert_eq!((p.row, p.column, p.main_start), (0, 0, 60 + 30));
    assert!(p.first_in_group);

    let p = t.placement(15).unwrap();
    assert_eq!((p.row, p.column, p.main_start), (1, 1, 60 + 30 + 20));
    assert_eq!(t.header_start(10), Some(60));
    assert_eq!(t.header_start(11), None);
    assert!(t.placement(30).is_none());
}

#[test]
fn capacity_rounds_partial_rows_up() {
    let space = IndexSpace::ungrouped(100);
    let t = OffsetTranslator::new(&space, Geometry::new(50, 0, 1, Axis::Vertical))
        .with_viewport_extent(500);
    assert_eq!(t.capacity(), 10);
    let t = t.with_viewport_extent(510);
    assert_eq!(t.capacity(), 11);
    let t = OffsetTranslator::new(&space, Geometry::new(50, 0, 2, Axis::Vertical))
        .with_viewport_extent(120);
    assert_eq!(t.capacity(), 6);
}

#[test]
fn empty_space_maps_everything_to_zero() {
    let space = IndexSpace::ungrouped(0);
    let t = OffsetTranslator::new(&space, Geometry::new(50, 0, 1, Axis::Vertical));
    assert_eq!(t.content_extent(), 0);
    assert_eq!(t.offset_to_index(1234), 0);
    assert_eq!(t.index_to_offset(5), 0);
    assert!(t.placement(0).is_none());
}

#[test]
fn stale_epoch_pages_are_dropped() {
    let mut cache = PageCache::<u32>::new(20);
    let old = cache.epoch();
    assert!(cache.put(old, 3, vec![1; 20]));
    let new = cache.bump_epoch();
    assert!(cache.is_empty());
    assert!(!cache.put(old, 3, vec![1; 20]));
    assert!(cache.get(3).is_none());
    assert!(cache.put(new, 3, vec![2; 20]));
    assert_eq!(cache.datum(61), Some(&2));
}

#[test]
fn evict_outside_keeps_only_needed_pages() {
    let mut cache = filled_cache(10, &[0, 1, 2, 5, 9]);
    let needed: BTreeSet<usize> = [1, 2, 3].into_iter().collect();
    let evicted = cache.evict_outside(&needed);
    assert_eq!(evicted, vec![0, 5, 9]);
    assert_eq!(cache.pages().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn put_replaces_existing_page() {
    let mut cache = filled_cache(4, &[0]);
    let epoch = cache.epoch();
    assert!(cache.put(epoch, 0, vec![9, 9]));
    assert_eq!(cache.get(0).map(|p| p.items.len()), Some(2));
    assert_eq!(cache.datum(1), Some(&9));
    assert_eq!(cache.datum(2), None);
    assert_eq!(cache.page_range(2), IndexRange::new(8, 12));
}

#[test]
fn first_window_requests_first_page() {
    let space = IndexSpace::ungrouped(100);
    let t = OffsetTranslator::new(&space, Geometry::new(50, 0, 1, Axis::Vertical))
        .with_viewport_extent(500);
    let viewport = ViewportState {
        offset: t.offset_to_index(0),
        capacity: t.capacity(),
        extra_margin: 2,
        direction: Direction::Forward,
    };

    let cache = PageCache::<usize>::new(20);
    let plan = WindowPlan::compute(viewport, space.total(), &cache);
    assert_eq!(plan.candidate, IndexRange::new(0, 12));
    assert!(plan.ready.is_empty());
    assert_eq!(plan.missing, (0..12).collect::<Vec<_>>());
    assert_eq!(plan.missing_pages, vec![0]);

    let cache = filled_cache(20, &[0]);
    let plan = WindowPlan::compute(viewport, space.total(), &cache);
    assert_eq!(plan.ready, (0..12).collect::<Vec<_>>());
    assert!(plan.missing_pages.is_empty());
}

#[test]
fn window_spanning_pages_partitions_ready_and_missing() {
    let cache = filled_cache(20, &[0, 2, 4]);
    let viewport = ViewportState {
        offset: 35,
        capacity: 10,
        extra_margin: 5,
        direction: Direction::Forward,
    };
    let plan = WindowPlan::compute(viewport, 100, &cache);
    assert_eq!(plan.candidate, IndexRange::new(30, 50));
    assert_eq!(plan.ready, (40..50).collect::<Vec<_>>());
    assert_eq!(plan.missing, (30..40).collect::<Vec<_>>());
    assert_eq!(plan.missing_pages, vec![1]);
    assert_eq!(plan.obsolete_pages, vec![0, 4]);
    assert_eq!(plan.needed_pages.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn zero_capacity_only_evicts() {
    let cache = filled_cache(20, &[0, 1]);
    let viewport = ViewportState {
        offset: 0,
        capacity: 0,
        extra_margin: 3,
        direction: Direction::Forward,
    };
    let plan = WindowPlan::compute(viewport, 100, &cache);
    assert!(plan.is_empty());
    assert!(plan.ready.is_empty());
    assert!(plan.missing.is_empty());
    assert_eq!(plan.obsolete_pages, vec![0, 1]);
}

#[test]
fn candidate_clamps_to_total() {
    let viewport = ViewportState {
        offset: 95,
        capacity: 10,
        extra_margin: 2,
        direction: Direction::Forward,
    };
    assert_eq!(viewport.candidate(100), IndexRange::new(93, 100));
    assert_eq!(viewport.candidate(0), IndexRange::EMPTY);
}

#[test]
fn obsolete_identities_follow_ready_data() {
    let cache = filled_cache(20, &[0]);
    let viewport = ViewportState {
        offset: 4,
        capacity: 4,
        extra_margin: 1,
        direction: Direction::Forward,
    };
    let plan = WindowPlan::compute(viewport, 100, &cache);
    assert_eq!(plan.candidate, IndexRange::new(3, 9));

    let ready = plan.ready_identities(&cache, |d| *d as u64 + 100);
    assert_eq!(ready.len(), 6);
    assert_eq!(ready.get(&103), Some(&3));

    // 102 and 109 sit outside the window; 150 is not backed by any ready datum.
    let rendered: Vec<u64> = vec![102, 103, 106, 109, 150];
    let mut obsolete = plan.obsolete_identities(rendered.iter(), &ready);
    obsolete.sort_unstable();
    assert_eq!(obsolete, vec![102, 109, 150]);
}
