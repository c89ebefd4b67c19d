// Example: header-aware index <-> pixel translation, forward and reversed.
use scroll_window::{Axis, Direction, Geometry, Group, IndexSpace, OffsetTranslator};

fn main() {
    let space = IndexSpace::new(60, [Group::new(0, 19), Group::new(25, 60)]);
    let geometry = Geometry::new(48, 32, 1, Axis::Vertical);
    let mut translator = OffsetTranslator::new(&space, geometry).with_viewport_extent(300);

    for index in [0, 5, 19, 25, 30] {
        let px = translator.index_to_offset(index);
        println!(
            "index={index} offset={px} back={} group={:?}",
            translator.offset_to_index(px),
            space.group_at(index)
        );
    }

    translator.set_direction(Direction::Reversed);
    println!(
        "reversed: raw 100px -> forward {}px -> index {}",
        translator.normalize(100),
        translator.offset_to_index(100)
    );
    println!("placement(30)={:?}", translator.placement(30));
}
