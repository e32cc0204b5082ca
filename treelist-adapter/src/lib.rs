//! Adapter utilities for the `treelist` crate.
//!
//! The `treelist` crate is UI-agnostic and focuses on the core range-tree
//! state. This crate provides small, framework-neutral pieces commonly needed
//! to wire it into an event loop:
//!
//! - [`LayoutModel`]: an in-memory scroll container implementing the engine's
//!   host contract, with stacked one-dimensional layout, alignment-aware
//!   scroll-into-view, and rect queries for the polling provider.
//! - [`ScrollDriver`]: event plumbing that forwards scroll/resize/frame ticks
//!   to whichever visibility provider the list was built with, simulating a
//!   native batched intersection observer for the event-driven strategy.
//!
//! This crate is intentionally framework-agnostic (no DOM/TUI bindings); it
//! also serves as the reference for what a real host integration has to do.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod driver;
mod layout;


pub use driver::ScrollDriver;
pub use layout::LayoutModel;
