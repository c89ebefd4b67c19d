use alloc::vec::Vec;

use scroll_window::{Epoch, Group, IdentityKey, Placement};

/// Identifies one render cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleId(pub u64);

/// A page request handed to [`Model::fetch_page`].
///
/// Hand the ticket back to [`crate::Engine::complete_fetch`] together with the result. Tickets
/// of a past epoch are discarded on arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchTicket {
    pub page: usize,
    pub epoch: Epoch,
    pub cycle: CycleId,
}

/// The data source.
pub trait Model {
    type Datum;

    fn total(&self) -> usize;

    /// Groups sorted by `begin`, non-overlapping, within `[0, total)`.
    fn groups(&self) -> Vec<Group>;

    fn page_size(&self) -> usize;

    /// Starts fetching a page.
    ///
    /// The result is delivered asynchronously through [`crate::Engine::complete_fetch`]. It may
    /// arrive in any order relative to other tickets, and after later render cycles.
    fn fetch_page(&mut self, ticket: FetchTicket);
}

/// A visual element owned by the engine on behalf of the host.
pub trait Element {
    type Node;

    /// The handle inserted into the host's container.
    fn root(&self) -> &Self::Node;

    /// Detaches the element and releases its resources.
    fn destroy(self);
}

pub trait ItemElement: Element {
    /// Marks the element as the first item of its group (for styling).
    fn mark_first(&mut self, first: bool);

    fn place(&mut self, _placement: Placement) {}
}

pub trait HeaderElement: Element {
    /// `main_start` is the header's leading pixel along the scroll axis.
    fn place(&mut self, _main_start: i64) {}
}

/// The fixed set of rendering capabilities the engine depends on.
///
/// Implemented by the host and injected at construction.
pub trait Renderer {
    type Datum;
    type Key: IdentityKey;
    type Node;
    type Item: ItemElement<Node = Self::Node>;
    type Header: HeaderElement<Node = Self::Node>;
    type Empty: Element<Node = Self::Node>;

    /// Stable identity of a datum, unique within one epoch.
    fn identity(&self, datum: &Self::Datum) -> Self::Key;

    fn create_item(&mut self, datum: &Self::Datum, index: usize) -> Self::Item;

    /// Called when an existing element is reused for `datum`, possibly at a new index.
    fn update_item(&mut self, _item: &mut Self::Item, _datum: &Self::Datum, _index: usize) {}

    fn create_header(&mut self, group: Group) -> Self::Header;

    /// Creates the placeholder shown while nothing is rendered.
    fn create_empty(&mut self) -> Self::Empty;

    /// Inserts `node` into the container right before `anchor`, or at the end when `anchor` is
    /// `None`.
    fn insert_before(&mut self, node: &Self::Node, anchor: Option<&Self::Node>);
}
