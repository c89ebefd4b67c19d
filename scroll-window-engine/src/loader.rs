use alloc::collections::{BTreeMap, BTreeSet};

use scroll_window::Epoch;

use crate::{CycleId, Error, FetchTicket, Model};

/// Settle notification for one render cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settled {
    pub cycle: CycleId,
    /// `Err` carries the first failure of the cycle's batch. Pages that did load stay cached and
    /// rendered.
    pub result: Result<(), Error>,
}

/// Outcome of handing a fetch result back to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The page was cached; `rendered` indices of it were inside the current window.
    Applied { rendered: usize },
    /// The failure was recorded on the ticket's batch.
    Failed,
    /// The ticket belongs to an older epoch and was discarded.
    Stale,
    /// The ticket was already resolved, or was never issued.
    Unknown,
}

#[derive(Debug)]
struct Batch {
    epoch: Epoch,
    pending: BTreeSet<usize>,
    error: Option<Error>,
}

/// Tracks the fetches issued by each render cycle.
#[derive(Debug, Default)]
pub(crate) struct LoadCoordinator {
    next_cycle: u64,
    batches: BTreeMap<CycleId, Batch>,
}

impl LoadCoordinator {
    pub(crate) fn begin_cycle(&mut self) -> CycleId {
        let cycle = CycleId(self.next_cycle);
        self.next_cycle = self.next_cycle.wrapping_add(1);
        cycle
    }

    /// Issues one fetch per page as a single batch.
    ///
    /// Returns `false` when `pages` is empty: the cycle has nothing to wait for.
    pub(crate) fn request<M: Model>(
        &mut self,
        cycle: CycleId,
        epoch: Epoch,
        pages: &[usize],
        model: &mut M,
    ) -> bool {
        if pages.is_empty() {
            return false;
        }
        vdebug!(cycle = cycle.0, epoch = epoch.0, pages = pages.len(), "request batch");
        self.batches.insert(
            cycle,
            Batch {
                epoch,
                pending: pages.iter().copied().collect(),
                error: None,
            },
        );
        for &page in pages {
            model.fetch_page(FetchTicket { page, epoch, cycle });
        }
        true
    }

    pub(crate) fn is_pending(&self, ticket: &FetchTicket) -> bool {
        self.batches
            .get(&ticket.cycle)
            .is_some_and(|b| b.epoch == ticket.epoch && b.pending.contains(&ticket.page))
    }

    /// Marks `ticket` resolved, recording `failure` if any.
    ///
    /// Returns the settle notification once the last fetch of the batch has resolved.
    pub(crate) fn resolve(
        &mut self,
        ticket: FetchTicket,
        failure: Option<Error>,
    ) -> Option<Settled> {
        let batch = self.batches.get_mut(&ticket.cycle)?;
        if batch.epoch != ticket.epoch || !batch.pending.remove(&ticket.page) {
            return None;
        }
        if let Some(err) = failure {
            if batch.error.is_none() {
                batch.error = Some(err);
            }
        }
        if !batch.pending.is_empty() {
            return None;
        }
        let batch = self.batches.remove(&ticket.cycle)?;
        Some(Settled {
            cycle: ticket.cycle,
            result: batch.error.map_or(Ok(()), Err),
        })
    }

    /// Forgets every outstanding batch. Their settle notifications never fire.
    pub(crate) fn abandon(&mut self) {
        if !self.batches.is_empty() {
            vdebug!(batches = self.batches.len(), "abandoning outstanding batches");
        }
        self.batches.clear();
    }

    pub(crate) fn pending_batches(&self) -> usize {
        self.batches.len()
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.batches.values().map(|b| b.pending.len()).sum()
    }
}
