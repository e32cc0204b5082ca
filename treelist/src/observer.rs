//! Visibility-detection providers.
//!
//! Both providers satisfy the same capability contract: register an element
//! plus callback, get notified with an in-view flag and a rect pair, cancel
//! on destruction. Range-node code never branches on which provider is
//! active; the list controller picks one at construction.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::geometry;
use crate::host::ListHost;
use crate::key::CallbackMap;
use crate::{Axis, ElementId, Rect, RectPair};

/// Invoked with `(in_view, rects)` whenever the observed element's visibility
/// is (re)reported.
///
/// Callbacks are `Rc`, not `Arc`: the engine is single-threaded by contract
/// and all dispatch happens on the host's UI thread.
pub type VisibilityCallback = Rc<dyn Fn(bool, RectPair)>;

/// One visibility-change notification from an event-driven host, mirroring a
/// native intersection-observer entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverEntry {
    pub element: ElementId,
    pub is_intersecting: bool,
    pub bounding: Rect,
    pub intersection: Rect,
}

/// Cancellation guard for one observation.
///
/// Deregisters the element exactly once: either through an explicit
/// [`Subscription::cancel`] or on drop, whichever comes first.
pub struct Subscription(Option<Box<dyn FnOnce()>>);

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(cancel)))
    }

    pub fn cancel(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscription")
            .field(&self.0.is_some())
            .finish()
    }
}

/// The visibility capability every range node subscribes through.
pub trait VisibilityObserver {
    fn observe(&self, element: ElementId, callback: VisibilityCallback) -> Subscription;

    /// Tears the provider down, forgetting every registered callback.
    fn disconnect(&self);
}

fn register(
    callbacks: &Rc<RefCell<CallbackMap>>,
    element: ElementId,
    callback: VisibilityCallback,
) -> Subscription {
    callbacks.borrow_mut().insert(element, callback);
    let callbacks = Rc::downgrade(callbacks);
    Subscription::new(move || {
        if let Some(callbacks) = callbacks.upgrade() {
            callbacks.borrow_mut().remove(&element);
        }
    })
}

/// Event-driven provider.
///
/// One shared observer instance per scroll container: the host wires the
/// engine's margin into its native visibility primitive and pushes coalesced
/// batches of entries into [`EventObserver::deliver`]. Batches arrive
/// asynchronously relative to the scroll that caused them and their internal
/// ordering across targets is unspecified; each entry is dispatched to its
/// own registered callback independently.
pub struct EventObserver {
    callbacks: Rc<RefCell<CallbackMap>>,
    margin: f64,
    active: Cell<bool>,
}

impl EventObserver {
    pub fn new(margin: f64) -> Self {
        Self {
            callbacks: Rc::new(RefCell::new(CallbackMap::new())),
            margin,
            active: Cell::new(false),
        }
    }

    /// The overscan margin, projected onto the active axis, that the host
    /// should configure its native observer with.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Whether any observation has activated the shared observer yet.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Dispatches a batch of visibility-change notifications.
    ///
    /// Entries for elements that are no longer observed are dropped. The
    /// callback lookup is re-done per entry because a callback may observe or
    /// cancel other elements while the batch is in flight.
    pub fn deliver(&self, entries: &[ObserverEntry]) {
        for entry in entries {
            let callback = self.callbacks.borrow().get(&entry.element).cloned();
            if let Some(callback) = callback {
                vtrace!(
                    element = entry.element.0,
                    is_intersecting = entry.is_intersecting,
                    "EventObserver::deliver"
                );
                callback(
                    entry.is_intersecting,
                    RectPair {
                        bounding: entry.bounding,
                        intersection: entry.intersection,
                    },
                );
            }
        }
    }
}

impl VisibilityObserver for EventObserver {
    fn observe(&self, element: ElementId, callback: VisibilityCallback) -> Subscription {
        // The shared observer is created lazily on first use.
        self.active.set(true);
        register(&self.callbacks, element, callback)
    }

    fn disconnect(&self) {
        self.active.set(false);
        self.callbacks.borrow_mut().clear();
    }
}

/// Polling provider.
///
/// No native primitive: the host forwards its scroll and container-resize
/// events, and every firing recomputes the margin-expanded viewport rect and
/// each registered element's intersection synchronously. More frequent than
/// the event-driven provider, but deterministic and immediate.
pub struct ScrollObserver {
    callbacks: Rc<RefCell<CallbackMap>>,
    host: Rc<RefCell<dyn ListHost>>,
    margin: f64,
    axis: Axis,
}

impl ScrollObserver {
    pub fn new(host: Rc<RefCell<dyn ListHost>>, margin: f64, axis: Axis) -> Self {
        Self {
            callbacks: Rc::new(RefCell::new(CallbackMap::new())),
            host,
            margin,
            axis,
        }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Recomputes visibility for every registered element.
    ///
    /// A detached container (no rect) makes this a no-op. Targets and their
    /// rects are snapshotted before dispatch: callbacks mount and unmount
    /// elements re-entrantly, and they re-borrow the host to do so. Elements
    /// registered during dispatch are picked up by the next firing.
    pub fn update(&self) {
        let viewport = {
            let host = self.host.borrow();
            let Some(container) = host.container_rect() else {
                return;
            };
            geometry::expand_by_margin(container, self.margin, self.axis)
        };

        let targets: Vec<(VisibilityCallback, Rect)> = {
            let host = self.host.borrow();
            self.callbacks
                .borrow()
                .iter()
                .filter_map(|(element, callback)| {
                    host.element_rect(*element).map(|rect| (callback.clone(), rect))
                })
                .collect()
        };

        for (callback, bounding) in targets {
            let fraction = geometry::intersection_fraction(bounding, viewport, self.axis);
            vtrace!(in_view = fraction.is_some(), "ScrollObserver::update");
            callback(
                fraction.is_some(),
                RectPair {
                    bounding,
                    intersection: viewport,
                },
            );
        }
    }
}

impl VisibilityObserver for ScrollObserver {
    fn observe(&self, element: ElementId, callback: VisibilityCallback) -> Subscription {
        register(&self.callbacks, element, callback)
    }

    fn disconnect(&self) {
        self.callbacks.borrow_mut().clear();
    }
}
