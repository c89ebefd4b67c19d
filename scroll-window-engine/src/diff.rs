use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use scroll_window::{Group, IdentityMap, IndexRange, IndexSpace, OffsetTranslator};

use crate::{Element, HeaderElement, ItemElement, Renderer};

struct Slot<I> {
    element: I,
    index: usize,
}

/// The rendered element set: one item element per visible identity, one header per relevant
/// group, and an optional empty-state placeholder.
///
/// Items stay in ascending index order in the host's container: a new element is inserted before
/// the nearest following rendered node instead of tracking sibling pointers.
pub(crate) struct Reconciler<R: Renderer> {
    items: IdentityMap<R::Key, Slot<R::Item>>,
    /// Rendered index -> identity, for neighbor lookups.
    order: BTreeMap<usize, R::Key>,
    /// Group begin -> header.
    headers: BTreeMap<usize, (Group, R::Header)>,
    empty: Option<R::Empty>,
}

impl<R: Renderer> Reconciler<R> {
    pub(crate) fn new() -> Self {
        Self {
            items: IdentityMap::default(),
            order: BTreeMap::new(),
            headers: BTreeMap::new(),
            empty: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &R::Key> + '_ {
        self.items.keys()
    }

    pub(crate) fn contains(&self, key: &R::Key) -> bool {
        self.items.contains_key(key)
    }

    pub(crate) fn index_of(&self, key: &R::Key) -> Option<usize> {
        self.items.get(key).map(|slot| slot.index)
    }

    pub(crate) fn item(&self, key: &R::Key) -> Option<&R::Item> {
        self.items.get(key).map(|slot| &slot.element)
    }

    /// Rendered indices in ascending order.
    pub(crate) fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.keys().copied()
    }

    pub(crate) fn header_groups(&self) -> impl Iterator<Item = Group> + '_ {
        self.headers.values().map(|(group, _)| *group)
    }

    /// Identities whose element was last shown at an index inside `range`.
    pub(crate) fn keys_within(&self, range: IndexRange) -> impl Iterator<Item = &R::Key> + '_ {
        self.items
            .iter()
            .filter(move |(_, slot)| range.contains(slot.index))
            .map(|(key, _)| key)
    }

    pub(crate) fn has_placeholder(&self) -> bool {
        self.empty.is_some()
    }

    /// Destroys the elements of `keys`.
    pub(crate) fn retire(&mut self, keys: Vec<R::Key>) {
        for key in keys {
            let Some(slot) = self.items.remove(&key) else {
                continue;
            };
            if self.order.get(&slot.index) == Some(&key) {
                self.order.remove(&slot.index);
            }
            slot.element.destroy();
        }
    }

    /// Destroys headers whose group no longer intersects `candidate`.
    pub(crate) fn retire_headers(&mut self, candidate: IndexRange) {
        let stale: Vec<usize> = self
            .headers
            .iter()
            .filter(|(_, (group, _))| !group.intersects(candidate))
            .map(|(&begin, _)| begin)
            .collect();
        for begin in stale {
            if let Some((_, header)) = self.headers.remove(&begin) {
                header.destroy();
            }
        }
    }

    /// Shows `datum` at `index`, reusing the element of the same identity when there is one.
    ///
    /// A reused element whose index changed is moved in the container so that rendered items
    /// stay in ascending index order. Returns `true` when a new element was created.
    pub(crate) fn show(
        &mut self,
        renderer: &mut R,
        index: usize,
        datum: &R::Datum,
        space: &IndexSpace,
        translator: &OffsetTranslator,
    ) -> bool {
        let key = renderer.identity(datum);
        let placement = translator.placement(index);
        let first = placement.is_some_and(|p| p.first_in_group);

        let (created, moved) = if let Some(slot) = self.items.get_mut(&key) {
            renderer.update_item(&mut slot.element, datum, index);
            let moved = slot.index != index;
            if moved {
                if self.order.get(&slot.index) == Some(&key) {
                    self.order.remove(&slot.index);
                }
                slot.index = index;
                self.order.insert(index, key.clone());
            }
            slot.element.mark_first(first);
            if let Some(placement) = placement {
                slot.element.place(placement);
            }
            (false, moved)
        } else {
            let mut element = renderer.create_item(datum, index);
            element.mark_first(first);
            if let Some(placement) = placement {
                element.place(placement);
            }
            renderer.insert_before(element.root(), self.anchor_after(index));
            self.order.insert(index, key.clone());
            self.items.insert(key.clone(), Slot { element, index });
            (true, false)
        };

        if moved {
            vtrace!(index, "moving reused element");
            if let Some(slot) = self.items.get(&key) {
                renderer.insert_before(slot.element.root(), self.anchor_after(index));
            }
        }

        if first {
            if let Some(group) = space.group_at(index) {
                self.show_header(renderer, group, &key, translator, created || moved);
            }
        }
        created
    }

    /// Creates or places the header of `group`. A new header, or an existing one when `relink`
    /// is set, is inserted right before the element of `leader`.
    fn show_header(
        &mut self,
        renderer: &mut R,
        group: Group,
        leader: &R::Key,
        translator: &OffsetTranslator,
        relink: bool,
    ) {
        let main_start = translator.header_start(group.begin);
        let Some(slot) = self.items.get(leader) else {
            return;
        };
        if let Some((_, header)) = self.headers.get_mut(&group.begin) {
            if let Some(main_start) = main_start {
                header.place(main_start);
            }
            if relink {
                renderer.insert_before(header.root(), Some(slot.element.root()));
            }
            return;
        }
        let mut header = renderer.create_header(group);
        if let Some(main_start) = main_start {
            header.place(main_start);
        }
        renderer.insert_before(header.root(), Some(slot.element.root()));
        self.headers.insert(group.begin, (group, header));
    }

    /// The node a new element at `index` must precede: the first rendered node past `index`,
    /// which is a header when a group starts before the next rendered item.
    fn anchor_after(&self, index: usize) -> Option<&R::Node> {
        let next_item = self.order.range(index + 1..).next();
        let next_header = self.headers.range(index + 1..).next();
        match (next_item, next_header) {
            (Some((&item_index, _)), Some((&begin, (_, header)))) if begin <= item_index => {
                Some(header.root())
            }
            (Some((_, key)), _) => self.items.get(key).map(|slot| slot.element.root()),
            (None, Some((_, (_, header)))) => Some(header.root()),
            (None, None) => None,
        }
    }

    /// Shows the empty-state placeholder when nothing is rendered, and removes it otherwise.
    pub(crate) fn sync_placeholder(&mut self, renderer: &mut R) {
        if self.items.is_empty() {
            if self.empty.is_none() {
                let empty = renderer.create_empty();
                renderer.insert_before(empty.root(), None);
                self.empty = Some(empty);
            }
        } else if let Some(empty) = self.empty.take() {
            empty.destroy();
        }
    }

    /// Destroys every element, header and the placeholder.
    pub(crate) fn clear(&mut self) {
        self.order.clear();
        for (_, slot) in core::mem::take(&mut self.items) {
            slot.element.destroy();
        }
        for (_, (_, header)) in core::mem::take(&mut self.headers) {
            header.destroy();
        }
        if let Some(empty) = self.empty.take() {
            empty.destroy();
        }
    }
}

impl<R: Renderer> fmt::Debug for Reconciler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("items", &self.items.len())
            .field("headers", &self.headers.len())
            .field("empty", &self.empty.is_some())
            .finish()
    }
}
