use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use treelist::{
    Axis, InvalidIndex, ListHost, ObserverEntry, Rect, ScrollIntoViewOptions, TreeList,
    TreeListOptions, VisibilityStrategy, expand_by_margin, intersection_fraction,
};

use crate::LayoutModel;

/// Geometric overlap of `bounding` and `viewport` along the active axis,
/// clamped to a non-negative size. This is what a native observer reports as
/// the intersection rect.
fn overlap(bounding: Rect, viewport: Rect, axis: Axis) -> Rect {
    let lo = bounding.pos(axis).max(viewport.pos(axis));
    let hi = (bounding.pos(axis) + bounding.size(axis))
        .min(viewport.pos(axis) + viewport.size(axis));
    let size = (hi - lo).max(0.0);
    match axis {
        Axis::Vertical => Rect::new(viewport.x, lo, viewport.width, size),
        Axis::Horizontal => Rect::new(lo, viewport.y, size, viewport.height),
    }
}

/// Drives a [`TreeList`] from a [`LayoutModel`].
///
/// Adapters call:
/// - [`ScrollDriver::on_scroll`] / [`ScrollDriver::on_resize`] when UI events
///   occur
/// - [`ScrollDriver::tick`] each frame/timer tick
///
/// For the polling strategy, scroll and resize forward straight into the
/// list's synchronous recomputation. For the event-driven strategy, the
/// driver plays the role of a native batched intersection observer: scroll
/// events only move the layout, and the next `tick` delivers a coalesced
/// batch containing one entry per newly observed element plus one entry per
/// element whose intersecting state flipped since the last report.
pub struct ScrollDriver {
    list: TreeList,
    layout: Rc<RefCell<LayoutModel>>,
    strategy: VisibilityStrategy,
    reported: BTreeMap<u64, bool>,
}

impl ScrollDriver {
    pub fn new(options: TreeListOptions, layout: Rc<RefCell<LayoutModel>>) -> Self {
        let strategy = options.strategy;
        let list = TreeList::new(options, layout.clone());
        Self {
            list,
            layout,
            strategy,
            reported: BTreeMap::new(),
        }
    }

    pub fn list(&self) -> &TreeList {
        &self.list
    }

    pub fn layout(&self) -> &Rc<RefCell<LayoutModel>> {
        &self.layout
    }

    /// Call when the UI reports a scroll offset change (e.g. wheel/drag).
    pub fn on_scroll(&mut self, offset: f64, now_ms: u64) {
        self.layout.borrow_mut().set_scroll_offset(offset);
        if self.strategy == VisibilityStrategy::Polling {
            self.list.notify_scroll();
        }
        self.list.update_settle(now_ms);
    }

    /// Call when the scroll container's viewport extent changes.
    pub fn on_resize(&mut self, viewport_extent: f64, now_ms: u64) {
        self.layout.borrow_mut().set_viewport_extent(viewport_extent);
        if self.strategy == VisibilityStrategy::Polling {
            self.list.notify_resize();
        }
        self.list.update_settle(now_ms);
    }

    /// Requests a programmatic scroll to `index`.
    pub fn scroll_to(
        &mut self,
        index: usize,
        options: ScrollIntoViewOptions,
    ) -> Result<(), InvalidIndex> {
        self.list.scroll_to(index, options)
    }

    /// Advances the driver by one frame.
    ///
    /// Flushes the simulated native observer (event-driven strategy only) and
    /// advances the settle delay. Returns the number of observer entries
    /// delivered this frame.
    pub fn tick(&mut self, now_ms: u64) -> usize {
        let delivered = match self.strategy {
            VisibilityStrategy::EventDriven => self.flush_observations(),
            VisibilityStrategy::Polling => 0,
        };
        self.list.update_settle(now_ms);
        delivered
    }

    /// Ticks at `frame_ms` intervals until the observation stream goes quiet
    /// and no scroll request is pending, or `max_frames` elapse. Returns the
    /// timestamp after the last frame.
    pub fn settle_frames(&mut self, mut now_ms: u64, frame_ms: u64, max_frames: usize) -> u64 {
        for _ in 0..max_frames {
            let delivered = self.tick(now_ms);
            now_ms += frame_ms;
            if delivered == 0 && self.list.pending_scroll_to().is_none() {
                break;
            }
        }
        now_ms
    }

    fn flush_observations(&mut self) -> usize {
        let entries: Vec<ObserverEntry> = {
            let layout = self.layout.borrow();
            let axis = layout.axis();
            let Some(container) = layout.container_rect() else {
                // Detached container: nothing observes, nothing reports.
                return 0;
            };
            let viewport = expand_by_margin(container, self.list.margin(), axis);

            let mut out = Vec::new();
            layout.for_each_element(|element| {
                let Some(bounding) = layout.element_rect(element) else {
                    return;
                };
                let is_intersecting = intersection_fraction(bounding, viewport, axis).is_some();
                if self.reported.get(&element.0) == Some(&is_intersecting) {
                    return;
                }
                out.push(ObserverEntry {
                    element,
                    is_intersecting,
                    bounding,
                    intersection: overlap(bounding, viewport, axis),
                });
            });
            out
        };

        {
            // Forget departed elements so a remount gets an initial entry
            // again.
            let layout = self.layout.borrow();
            self.reported
                .retain(|&element, _| layout.contains_element(treelist::ElementId(element)));
        }
        for entry in &entries {
            self.reported.insert(entry.element.0, entry.is_intersecting);
        }

        if !entries.is_empty() {
            vdebug!(entries = entries.len(), "flush_observations");
        }
        self.list.deliver_intersections(&entries);
        entries.len()
    }
}
