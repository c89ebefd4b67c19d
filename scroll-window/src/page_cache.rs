use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::IndexRange;

/// Dataset generation. Bumped whenever the dataset is swapped or filtered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Epoch(pub u64);

impl Epoch {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A fetched chunk of the dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub index: usize,
    pub items: Vec<T>,
}

/// Fetched pages keyed by page number, tagged with the epoch they belong to.
///
/// The cache only ever holds pages of its current epoch: [`PageCache::put`] drops pages fetched
/// for another epoch and [`PageCache::bump_epoch`] empties the cache.
#[derive(Clone, Debug)]
pub struct PageCache<T> {
    page_size: usize,
    epoch: Epoch,
    pages: BTreeMap<usize, Page<T>>,
}

impl<T> PageCache<T> {
    /// Creates an empty cache. A `page_size` of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            epoch: Epoch::default(),
            pages: BTreeMap::new(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Changes the page size. Cached pages are dropped since their boundaries no longer apply.
    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        if page_size != self.page_size {
            self.page_size = page_size;
            self.pages.clear();
        }
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Starts a new epoch and drops every cached page.
    pub fn bump_epoch(&mut self) -> Epoch {
        self.epoch = self.epoch.next();
        self.pages.clear();
        vtrace!(epoch = self.epoch.0, "bump_epoch");
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page_of(&self, index: usize) -> usize {
        index / self.page_size
    }

    /// Index range covered by `page`.
    pub fn page_range(&self, page: usize) -> IndexRange {
        let start = page.saturating_mul(self.page_size);
        IndexRange::new(start, start.saturating_add(self.page_size))
    }

    pub fn contains(&self, page: usize) -> bool {
        self.pages.contains_key(&page)
    }

    pub fn get(&self, page: usize) -> Option<&Page<T>> {
        self.pages.get(&page)
    }

    /// Looks up the cached datum at a logical index.
    pub fn datum(&self, index: usize) -> Option<&T> {
        let page = self.pages.get(&self.page_of(index))?;
        page.items.get(index % self.page_size)
    }

    /// Stores a page fetched during `epoch`, replacing any existing entry.
    ///
    /// Returns `false` (and stores nothing) when `epoch` is not the current epoch.
    pub fn put(&mut self, epoch: Epoch, page: usize, items: Vec<T>) -> bool {
        if epoch != self.epoch {
            vtrace!(
                page,
                fetched = epoch.0,
                current = self.epoch.0,
                "dropping page from stale epoch"
            );
            return false;
        }
        self.pages.insert(page, Page { index: page, items });
        true
    }

    /// Removes every page that is not in `needed` and returns the evicted page numbers.
    pub fn evict_outside(&mut self, needed: &BTreeSet<usize>) -> Vec<usize> {
        let evicted: Vec<usize> = self
            .pages
            .keys()
            .copied()
            .filter(|page| !needed.contains(page))
            .collect();
        for page in &evicted {
            self.pages.remove(page);
        }
        if !evicted.is_empty() {
            vtrace!(evicted = evicted.len(), kept = self.pages.len(), "evict_outside");
        }
        evicted
    }

    /// Cached page numbers in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.pages.keys().copied()
    }

    /// Drops every page without changing the epoch.
    pub fn clear(&mut self) {
        self.pages.clear();
    }
}
