//! A headless hierarchical virtualization engine for very large lists.
//!
//! `treelist` renders only the currently-visible slice of a one-dimensional
//! list while still producing a plausible total scroll extent before any item
//! has been measured. Instead of prefix sums over per-item sizes, it keeps a
//! recursive range-splitting tree: every contiguous index range either
//! renders a real item, reserves space with a placeholder, or splits into two
//! halves, driven by per-range visibility signals. Visibility is tracked as a
//! fraction of each range's own (estimate-corrected) extent, so replacing a
//! guess with a real measurement never invalidates ancestor state.
//!
//! The engine is UI-agnostic. A host layer is expected to provide:
//! - the visual elements behind each mounted wrapper (via [`ListHost`])
//! - visibility signals, either as batched native-observer entries
//!   ([`TreeList::deliver_intersections`]) or as scroll/resize notifications
//!   for the polling provider ([`TreeList::notify_scroll`])
//! - a monotonic timestamp for the scroll-settle tick
//!   ([`TreeList::update_settle`])
//!
//! For a framework-neutral in-memory host and event plumbing, see the
//! `treelist-adapter` crate.
//!
//! Everything runs on the host's single UI thread: state is shared through
//! `Rc`/`RefCell` and callbacks are plain `Rc<dyn Fn>`. That single-thread
//! discipline is a contract of the crate, not an accident.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod extent_cache;
mod geometry;
mod host;
mod key;
mod list;
mod node;
mod observer;
mod options;
mod types;


pub use extent_cache::ExtentCache;
pub use geometry::{expand_by_margin, intersection_fraction, propagate, split};
pub use host::{ListHost, RenderContent};
pub use list::TreeList;
pub use observer::{
    EventObserver, ObserverEntry, ScrollObserver, Subscription, VisibilityCallback,
    VisibilityObserver,
};
pub use options::TreeListOptions;
pub use types::{
    Align, Axis, ElementId, Intersection, InvalidIndex, Rect, RectPair, ScrollBehavior,
    ScrollIntoViewOptions, ScrollToRequest, Span, VisibilityStrategy,
};
