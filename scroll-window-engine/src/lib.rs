//! Element reconciliation and page loading for the `scroll-window` crate.
//!
//! `scroll-window` computes what should be on screen. This crate makes it so:
//!
//! - It owns the rendered item elements, group headers and the empty-state placeholder, and keeps
//!   them in index order in the host's container (through a [`Renderer`]).
//! - It reuses an element whenever a datum with the same identity stays in the window, even if
//!   its index changed.
//! - It requests missing pages from a [`Model`] as one batch per render cycle and reports, once per
//!   cycle, when that batch has settled.
//!
//! The engine never touches a real UI toolkit. Adapters implement [`Model`] and [`Renderer`] and
//! call [`Engine::scroll_to`], [`Engine::resize`] and [`Engine::complete_fetch`] from their event
//! loop.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod diff;
mod engine;
mod error;
mod host;
mod loader;
mod options;


pub use engine::Engine;
pub use error::{Error, FetchError};
pub use host::{CycleId, Element, FetchTicket, HeaderElement, ItemElement, Model, Renderer};
pub use loader::{Resolution, Settled};
pub use options::{EngineOptions, OnSettledCallback};

pub use scroll_window;
