use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::{IdentityKey, IdentityMap, IndexRange, PageCache, ViewportState};

/// What one render cycle has to do, computed from the viewport and the current cache contents.
///
/// A plan is built once per cycle and never mutated; the engine applies it as one batch of
/// evictions, destructions and creations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowPlan {
    pub viewport: ViewportState,
    pub candidate: IndexRange,
    /// Candidate indices whose data is cached, ascending.
    pub ready: Vec<usize>,
    /// Candidate indices whose page is not cached, ascending.
    pub missing: Vec<usize>,
    /// Pages to fetch, deduplicated and ascending.
    pub missing_pages: Vec<usize>,
    /// Every page referenced by the candidate range.
    pub needed_pages: BTreeSet<usize>,
    /// Cached pages referenced by no candidate index.
    pub obsolete_pages: Vec<usize>,
}

impl WindowPlan {
    pub fn compute<T>(viewport: ViewportState, total: usize, cache: &PageCache<T>) -> Self {
        let candidate = viewport.candidate(total);
        let mut plan = Self {
            viewport,
            candidate,
            ..Self::default()
        };

        for index in candidate.iter() {
            let page = cache.page_of(index);
            plan.needed_pages.insert(page);
            if cache.contains(page) {
                if cache.datum(index).is_some() {
                    plan.ready.push(index);
                } else {
                    vwarn!(index, page, "cached page is shorter than the reported total");
                }
            } else {
                plan.missing.push(index);
                if plan.missing_pages.last() != Some(&page) {
                    plan.missing_pages.push(page);
                }
            }
        }

        plan.obsolete_pages = cache
            .pages()
            .filter(|page| !plan.needed_pages.contains(page))
            .collect();

        vtrace!(
            start = candidate.start,
            end = candidate.end,
            ready = plan.ready.len(),
            missing = plan.missing.len(),
            missing_pages = plan.missing_pages.len(),
            obsolete_pages = plan.obsolete_pages.len(),
            "WindowPlan::compute"
        );
        plan
    }

    /// Resolves the identity of every ready index.
    ///
    /// If the identity function reports duplicates, the highest index wins.
    pub fn ready_identities<T, K: IdentityKey>(
        &self,
        cache: &PageCache<T>,
        mut identity: impl FnMut(&T) -> K,
    ) -> IdentityMap<K, usize> {
        let mut out = IdentityMap::default();
        for &index in &self.ready {
            if let Some(datum) = cache.datum(index) {
                out.insert(identity(datum), index);
            }
        }
        out
    }

    /// Rendered identities that no ready index backs any more.
    ///
    /// This covers identities whose index left the candidate range and identities whose slot now
    /// holds another datum. An identity that merely moved to a different ready index is kept.
    pub fn obsolete_identities<'a, K: IdentityKey + 'a>(
        &self,
        rendered: impl IntoIterator<Item = &'a K>,
        ready: &IdentityMap<K, usize>,
    ) -> Vec<K> {
        rendered
            .into_iter()
            .filter(|key| !ready.contains_key(*key))
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.candidate.is_empty()
    }
}
