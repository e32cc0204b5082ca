use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::extent_cache::ExtentCache;
use crate::geometry;
use crate::host::{ListHost, RenderContent};
use crate::key::NodeMap;
use crate::node::{Node, NodeBody, NodeId};
use crate::observer::{
    EventObserver, ObserverEntry, ScrollObserver, VisibilityCallback, VisibilityObserver,
};
use crate::{
    Axis, ElementId, Intersection, InvalidIndex, RectPair, ScrollIntoViewOptions, ScrollToRequest,
    Span, TreeListOptions, VisibilityStrategy,
};

enum ObserverKind {
    Event(EventObserver),
    Poll(ScrollObserver),
}

impl ObserverKind {
    fn as_observer(&self) -> &dyn VisibilityObserver {
        match self {
            Self::Event(observer) => observer,
            Self::Poll(observer) => observer,
        }
    }
}

struct PendingScroll {
    request: ScrollToRequest,
    /// Leaf that fired the native scroll action. The settle timer is disarmed
    /// when that leaf is torn down before it elapses; the request itself
    /// stays pending and re-fires on remount.
    fired_by: Option<NodeId>,
    settle_started_ms: Option<u64>,
}

/// A rendering decision, before it is applied to a node.
enum Decision {
    Placeholder { extent: f64 },
    Item { index: usize, expected_extent: f64 },
    Split,
}

/// The hierarchical virtualization engine.
///
/// Owns the root range node covering `[0, nr_items)`, the shared
/// [`ExtentCache`], the single pending scroll request, and the visibility
/// provider selected at construction. Each node in the tree independently
/// subscribes to visibility for its own wrapping region and, on every signal,
/// either stays a placeholder/leaf or re-splits, recursively mounting or
/// tearing down its two children through the [`ListHost`].
///
/// Everything runs on the host's single UI thread; the engine is not `Send`
/// and shares state through `Rc`/`RefCell` by design. Dropping the list
/// tears down the whole tree and cancels every subscription.
pub struct TreeList {
    core: Rc<ListCore>,
}

struct ListCore {
    weak: Weak<ListCore>,
    options: TreeListOptions,
    host: Rc<RefCell<dyn ListHost>>,
    observer: ObserverKind,
    cache: RefCell<ExtentCache>,
    nodes: RefCell<NodeMap<Node>>,
    root: Cell<Option<NodeId>>,
    pending: RefCell<Option<PendingScroll>>,
    /// Native scroll action staged by the target leaf, fired only once the
    /// current tree mutation has fully committed.
    staged_fire: Cell<Option<ElementId>>,
    next_node: Cell<u64>,
    next_element: Cell<u64>,
}

impl TreeList {
    pub fn new(options: TreeListOptions, host: Rc<RefCell<dyn ListHost>>) -> Self {
        let margin = options.margin();
        let observer = match options.strategy {
            VisibilityStrategy::EventDriven => ObserverKind::Event(EventObserver::new(margin)),
            VisibilityStrategy::Polling => {
                ObserverKind::Poll(ScrollObserver::new(Rc::clone(&host), margin, options.axis))
            }
        };

        let mut cache = ExtentCache::new(options.estimated_extent);
        if !options.initial_extents.is_empty() {
            cache.import(options.initial_extents.iter().copied());
        }

        vdebug!(
            nr_items = options.nr_items,
            estimated_extent = options.estimated_extent,
            strategy = ?options.strategy,
            "TreeList::new"
        );

        let core = Rc::new_cyclic(|weak| ListCore {
            weak: weak.clone(),
            options,
            host,
            observer,
            cache: RefCell::new(cache),
            nodes: RefCell::new(NodeMap::new()),
            root: Cell::new(None),
            pending: RefCell::new(None),
            staged_fire: Cell::new(None),
            next_node: Cell::new(0),
            next_element: Cell::new(0),
        });
        core.mount_root();
        Self { core }
    }

    pub fn options(&self) -> &TreeListOptions {
        &self.core.options
    }

    pub fn nr_items(&self) -> usize {
        self.core.options.nr_items
    }

    pub fn axis(&self) -> Axis {
        self.core.options.axis
    }

    /// The overscan margin projected onto the active axis.
    pub fn margin(&self) -> f64 {
        self.core.options.margin()
    }

    /// Best-known extent of the whole list along the active axis.
    pub fn total_extent(&self) -> f64 {
        let span = Span::new(0, self.core.options.nr_items);
        self.core.cache.borrow().extent_of(span)
    }

    /// Requests that the item at `index` be scrolled into view.
    ///
    /// The tree re-evaluates the path covering `index`, splitting through
    /// placeholders that would otherwise stay collapsed, until the
    /// single-item leaf mounts and triggers the host's native scroll action.
    /// The request is cleared once the settle delay has elapsed after that
    /// action (advance it via [`TreeList::update_settle`]).
    ///
    /// At most one request is pending at a time, last request wins: issuing a
    /// new one before the previous settles replaces it and disarms its settle
    /// timer.
    pub fn scroll_to(
        &self,
        index: usize,
        options: ScrollIntoViewOptions,
    ) -> Result<(), InvalidIndex> {
        let nr_items = self.core.options.nr_items;
        if index >= nr_items {
            return Err(InvalidIndex { index, nr_items });
        }
        vdebug!(index, "TreeList::scroll_to");
        *self.core.pending.borrow_mut() = Some(PendingScroll {
            request: ScrollToRequest { index, options },
            fired_by: None,
            settle_started_ms: None,
        });
        self.core.reevaluate_towards(index);
        self.core.flush_staged_fire();
        Ok(())
    }

    /// The scroll request currently awaiting its target, if any.
    pub fn pending_scroll_to(&self) -> Option<ScrollToRequest> {
        self.core.pending.borrow().as_ref().map(|p| p.request)
    }

    /// Advances the settle delay of a fired scroll request.
    ///
    /// Call once per host frame/timer tick with a monotonic timestamp. The
    /// first tick after the native scroll action records the baseline; a tick
    /// at least `settle_delay_ms` later clears the request.
    pub fn update_settle(&self, now_ms: u64) {
        let mut pending = self.core.pending.borrow_mut();
        let Some(p) = pending.as_mut() else {
            return;
        };
        if p.fired_by.is_none() {
            return;
        }
        match p.settle_started_ms {
            None => p.settle_started_ms = Some(now_ms),
            Some(started) => {
                if now_ms.saturating_sub(started) >= self.core.options.settle_delay_ms {
                    vdebug!(index = p.request.index, "scroll_to settled");
                    *pending = None;
                }
            }
        }
    }

    /// Feeds a batch of native observer entries to an event-driven list.
    pub fn deliver_intersections(&self, entries: &[ObserverEntry]) {
        match &self.core.observer {
            ObserverKind::Event(observer) => observer.deliver(entries),
            ObserverKind::Poll(_) => {
                vwarn!("deliver_intersections called on a polling list; ignored");
            }
        }
    }

    /// Recomputes visibility on a polling list after a scroll event.
    pub fn notify_scroll(&self) {
        match &self.core.observer {
            ObserverKind::Poll(observer) => observer.update(),
            ObserverKind::Event(_) => {
                vwarn!("notify_scroll called on an event-driven list; ignored");
            }
        }
    }

    /// Recomputes visibility on a polling list after a container resize.
    pub fn notify_resize(&self) {
        match &self.core.observer {
            ObserverKind::Poll(observer) => observer.update(),
            ObserverKind::Event(_) => {
                vwarn!("notify_resize called on an event-driven list; ignored");
            }
        }
    }

    /// Exports the measured extents for persistence across mount cycles.
    pub fn export_extent_cache(&self) -> Vec<(Span, f64)> {
        self.core.cache.borrow().export()
    }

    /// Replaces the measured extents from a snapshot and refreshes every
    /// mounted placeholder so the imported extents take effect immediately.
    pub fn import_extent_cache(&self, entries: impl IntoIterator<Item = (Span, f64)>) {
        self.core.cache.borrow_mut().import(entries);
        self.core.refresh_decisions();
    }

    /// Number of spans with a recorded measurement.
    pub fn extent_cache_len(&self) -> usize {
        self.core.cache.borrow().len()
    }

    /// Walks the current leaf decisions in index order.
    ///
    /// The reported spans always form a contiguous, non-overlapping partition
    /// of `[0, nr_items)`. Only [`RenderContent::Placeholder`] and
    /// [`RenderContent::Item`] are reported.
    pub fn for_each_leaf(&self, mut f: impl FnMut(Span, &RenderContent)) {
        fn walk(nodes: &NodeMap<Node>, id: NodeId, f: &mut dyn FnMut(Span, &RenderContent)) {
            let Some(node) = nodes.get(&id) else {
                return;
            };
            match node.body {
                Some(NodeBody::Split { top, bottom }) => {
                    walk(nodes, top, f);
                    walk(nodes, bottom, f);
                }
                Some(body) => {
                    let content = body.render();
                    f(node.span, &content);
                }
                None => {}
            }
        }

        let nodes = self.core.nodes.borrow();
        if let Some(root) = self.core.root.get() {
            walk(&nodes, root, &mut f);
        }
    }
}

impl Drop for TreeList {
    fn drop(&mut self) {
        if let Some(root) = self.core.root.take() {
            self.core.teardown(root);
        }
        self.core.observer.as_observer().disconnect();
    }
}

impl ListCore {
    fn mount_root(&self) {
        let nr_items = self.options.nr_items;
        if nr_items == 0 {
            return;
        }
        let seed = if self.options.initial_in_view_count > 0 {
            let to = (self.options.initial_in_view_count as f64 / nr_items as f64).min(1.0);
            Some(Intersection::new(0.0, to))
        } else {
            None
        };
        let root = self.mount_node(Span::new(0, nr_items), None, seed);
        self.root.set(Some(root));
    }

    /// Mounts a node for `span` under `parent`, decides its initial body, and
    /// subscribes it to visibility.
    ///
    /// A node seeded with a non-`None` intersection mounts in view and splits
    /// synchronously all the way down to its visible items; this is how the
    /// initial viewport renders without waiting for observer callbacks.
    fn mount_node(
        &self,
        span: Span,
        parent: Option<ElementId>,
        seed: Option<Intersection>,
    ) -> NodeId {
        let id = NodeId(self.next_node.replace(self.next_node.get() + 1));
        let element = ElementId(self.next_element.replace(self.next_element.get() + 1));
        self.nodes.borrow_mut().insert(
            id,
            Node {
                span,
                element,
                in_view: seed.is_some(),
                intersection: seed,
                body: None,
                subscription: None,
            },
        );

        self.host.borrow_mut().mount(element, parent);
        let subscription = self
            .observer
            .as_observer()
            .observe(element, self.visibility_callback(id));
        if let Some(node) = self.nodes.borrow_mut().get_mut(&id) {
            node.subscription = Some(subscription);
        }

        self.decide(id);
        id
    }

    fn visibility_callback(&self, id: NodeId) -> VisibilityCallback {
        let weak = self.weak.clone();
        Rc::new(move |in_view, rects| {
            if let Some(core) = weak.upgrade() {
                core.on_visibility(id, in_view, rects);
            }
        })
    }

    /// Handles one visibility signal for one node.
    ///
    /// The measurement is written before the decision runs so the decision
    /// reads the fresh extent, and the node's intersection is re-derived from
    /// the delivered rects on every signal.
    fn on_visibility(&self, id: NodeId, in_view: bool, rects: RectPair) {
        let axis = self.options.axis;
        let span = {
            let nodes = self.nodes.borrow();
            let Some(node) = nodes.get(&id) else {
                return;
            };
            node.span
        };

        self.cache
            .borrow_mut()
            .set(span, rects.bounding.size(axis));

        let intersection = if in_view {
            geometry::intersection_fraction(rects.bounding, rects.intersection, axis)
        } else {
            None
        };
        {
            let mut nodes = self.nodes.borrow_mut();
            let Some(node) = nodes.get_mut(&id) else {
                return;
            };
            node.in_view = in_view;
            node.intersection = intersection;
        }

        self.decide(id);
        self.flush_staged_fire();
    }

    /// The decision function: nothing, placeholder, leaf item, or split.
    ///
    /// A range that is out of view still renders through when it straddles
    /// the pending scroll target, so the tree can descend toward an
    /// as-yet-unmeasured item and trigger the native scroll action.
    fn choose(&self, span: Span, in_view: bool) -> Decision {
        let straddles_target = self
            .pending
            .borrow()
            .as_ref()
            .is_some_and(|p| span.contains(p.request.index));

        if !in_view && !straddles_target {
            return Decision::Placeholder {
                extent: self.cache.borrow().extent_of(span),
            };
        }
        if span.count == 1 {
            return Decision::Item {
                index: span.first_index,
                expected_extent: self.cache.borrow().extent_of(span),
            };
        }
        Decision::Split
    }

    /// Applies the decision for `id`, mounting or tearing down children as
    /// needed. Re-entrant: runs at mount and inside every visibility
    /// callback. No internal borrow is held across a host or observer call.
    fn decide(&self, id: NodeId) {
        let Some((span, element, in_view, intersection, body)) = self.snapshot(id) else {
            return;
        };
        if span.is_empty() {
            return;
        }

        match self.choose(span, in_view) {
            Decision::Split => {
                if let Some(NodeBody::Split { .. }) = body {
                    // Children are autonomous once mounted; their own
                    // subscriptions drive any further change.
                    return;
                }
                vtrace!(span = %span, "split");
                self.host.borrow_mut().update(element, &RenderContent::Branch);
                let (top, bottom) = geometry::split(span);
                let (top_seed, bottom_seed) = {
                    let cache = self.cache.borrow();
                    geometry::propagate(intersection, top, bottom, &cache)
                };
                let top_id = self.mount_node(top, Some(element), top_seed);
                let bottom_id = self.mount_node(bottom, Some(element), bottom_seed);
                if let Some(node) = self.nodes.borrow_mut().get_mut(&id) {
                    node.body = Some(NodeBody::Split {
                        top: top_id,
                        bottom: bottom_id,
                    });
                }
            }
            Decision::Placeholder { extent } => {
                if let Some(NodeBody::Split { top, bottom }) = body {
                    vtrace!(span = %span, "collapse");
                    self.teardown(top);
                    self.teardown(bottom);
                }
                self.apply_leaf(id, element, body, NodeBody::Placeholder { extent });
            }
            Decision::Item {
                index,
                expected_extent,
            } => {
                self.apply_leaf(
                    id,
                    element,
                    body,
                    NodeBody::Item {
                        index,
                        expected_extent,
                    },
                );
                self.maybe_fire_scroll(id, element, span);
            }
        }
    }

    fn apply_leaf(
        &self,
        id: NodeId,
        element: ElementId,
        old: Option<NodeBody>,
        new: NodeBody,
    ) {
        if old == Some(new) {
            return;
        }
        if let Some(node) = self.nodes.borrow_mut().get_mut(&id) {
            node.body = Some(new);
        }
        self.host.borrow_mut().update(element, &new.render());
    }

    /// Stages the host scroll action once per pending request, when this node
    /// is the single-item leaf the request targets. The action itself runs in
    /// [`ListCore::flush_staged_fire`], after the tree mutation that mounted
    /// this leaf has committed and the host sees the complete layout.
    fn maybe_fire_scroll(&self, id: NodeId, element: ElementId, span: Span) {
        let mut pending = self.pending.borrow_mut();
        let Some(p) = pending.as_mut() else {
            return;
        };
        if span.count != 1 || span.first_index != p.request.index || p.fired_by.is_some() {
            return;
        }
        p.fired_by = Some(id);
        p.settle_started_ms = None;
        self.staged_fire.set(Some(element));
    }

    fn flush_staged_fire(&self) {
        let Some(element) = self.staged_fire.take() else {
            return;
        };
        let Some(options) = self.pending.borrow().as_ref().map(|p| p.request.options) else {
            return;
        };
        vdebug!(element = element.0, "scroll_into_view");
        self.host.borrow_mut().scroll_into_view(element, &options);
    }

    /// Re-runs decisions along the path from the root to `index`, so
    /// placeholders covering a fresh scroll target split toward it.
    fn reevaluate_towards(&self, index: usize) {
        let mut current = self.root.get();
        while let Some(id) = current {
            let Some(span) = self.nodes.borrow().get(&id).map(|n| n.span) else {
                return;
            };
            if !span.contains(index) {
                return;
            }
            self.decide(id);
            current = {
                let nodes = self.nodes.borrow();
                match nodes.get(&id).and_then(|n| n.body) {
                    Some(NodeBody::Split { top, bottom }) => {
                        if nodes.get(&top).is_some_and(|n| n.span.contains(index)) {
                            Some(top)
                        } else {
                            Some(bottom)
                        }
                    }
                    _ => None,
                }
            };
        }
    }

    /// Re-runs every node's decision against the current cache contents.
    fn refresh_decisions(&self) {
        let ids: Vec<NodeId> = self.nodes.borrow().keys().copied().collect();
        for id in ids {
            self.decide(id);
        }
        self.flush_staged_fire();
    }

    /// Destroys `id` and its subtree: children first, then the node's own
    /// element; the visibility subscription cancels when the node drops.
    fn teardown(&self, id: NodeId) {
        let Some(node) = self.nodes.borrow_mut().remove(&id) else {
            return;
        };
        if let Some(NodeBody::Split { top, bottom }) = node.body {
            self.teardown(top);
            self.teardown(bottom);
        }
        {
            let mut pending = self.pending.borrow_mut();
            if let Some(p) = pending.as_mut() {
                if p.fired_by == Some(id) {
                    p.fired_by = None;
                    p.settle_started_ms = None;
                    self.staged_fire.set(None);
                }
            }
        }
        self.host.borrow_mut().unmount(node.element);
    }

    fn snapshot(
        &self,
        id: NodeId,
    ) -> Option<(Span, ElementId, bool, Option<Intersection>, Option<NodeBody>)> {
        let nodes = self.nodes.borrow();
        let node = nodes.get(&id)?;
        Some((
            node.span,
            node.element,
            node.in_view,
            node.intersection,
            node.body,
        ))
    }
}
