//! Headless windowing math for paged, grouped lists.
//!
//! For element reconciliation and page loading, see the `scroll-window-engine` crate.
//!
//! This crate holds the pure parts of a virtualized list whose data arrives in fixed-size pages:
//! an index space with optional header-carrying groups, pixel ↔ index translation (including
//! reversed, end-anchored coordinates), an epoch-tagged page cache, and a per-cycle window plan
//! that says which indices are ready, which pages are missing, and what can be evicted.
//!
//! It is UI-agnostic. A host is expected to provide:
//! - item/header geometry and the viewport extent
//! - the scroll position
//! - page data, fetched however it likes
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod index_space;
mod key;
mod page_cache;
mod state;
mod translator;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use error::MetadataError;
pub use index_space::IndexSpace;
pub use key::{IdentityKey, IdentityMap};
pub use page_cache::{Epoch, Page, PageCache};
pub use state::ViewportState;
pub use translator::OffsetTranslator;
pub use types::{Axis, Direction, Geometry, Group, IndexRange, Placement};
pub use window::WindowPlan;
