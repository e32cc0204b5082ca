use alloc::vec::Vec;

use crate::{Axis, Span, VisibilityStrategy};

/// Configuration for [`crate::TreeList`].
#[derive(Clone, Debug)]
pub struct TreeListOptions {
    /// Number of items in the list.
    pub nr_items: usize,

    /// The estimated extent of a single item along the active axis, in
    /// pixel-equivalent units. Used for every span until it is measured at
    /// least once. Must be finite and positive.
    pub estimated_extent: f64,

    /// The scroll direction of the list.
    pub axis: Axis,

    /// Extra items' worth of viewport margin, on both sides of the active
    /// axis, applied before computing intersections. Ranges just outside the
    /// literal viewport are treated as visible.
    pub overscan_items: usize,

    /// Which visibility-detection provider to build the list with.
    ///
    /// Pick [`VisibilityStrategy::Polling`] when the host has no native
    /// batched intersection primitive, or when deterministic synchronous
    /// recomputation is preferred over coalesced asynchronous batches.
    pub strategy: VisibilityStrategy,

    /// Measured extents from a previous mount cycle, as exported by
    /// [`crate::TreeList::export_extent_cache`]. Lets a fresh tree reproduce
    /// its placeholder extents exactly, without re-measuring.
    pub initial_extents: Vec<(Span, f64)>,

    /// Number of items known to be in view at mount.
    ///
    /// Seeds the root intersection so the initial viewport renders real items
    /// synchronously instead of waiting a round-trip for the first visibility
    /// signal.
    pub initial_in_view_count: usize,

    /// Pause after the native scroll-into-view action before the pending
    /// scroll request is cleared, letting the scroll complete and the target
    /// get re-measured.
    pub settle_delay_ms: u64,
}

impl TreeListOptions {
    pub fn new(nr_items: usize, estimated_extent: f64) -> Self {
        debug_assert!(
            estimated_extent.is_finite() && estimated_extent > 0.0,
            "estimated_extent must be a positive finite number"
        );
        Self {
            nr_items,
            estimated_extent,
            axis: Axis::Vertical,
            overscan_items: 0,
            strategy: VisibilityStrategy::EventDriven,
            initial_extents: Vec::new(),
            initial_in_view_count: 0,
            settle_delay_ms: 100,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_overscan_items(mut self, overscan_items: usize) -> Self {
        self.overscan_items = overscan_items;
        self
    }

    pub fn with_strategy(mut self, strategy: VisibilityStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_initial_extents(mut self, initial_extents: Vec<(Span, f64)>) -> Self {
        self.initial_extents = initial_extents;
        self
    }

    pub fn with_initial_in_view_count(mut self, initial_in_view_count: usize) -> Self {
        self.initial_in_view_count = initial_in_view_count;
        self
    }

    pub fn with_settle_delay_ms(mut self, settle_delay_ms: u64) -> Self {
        self.settle_delay_ms = settle_delay_ms;
        self
    }

    /// The overscan margin projected onto the active axis.
    pub fn margin(&self) -> f64 {
        self.overscan_items as f64 * self.estimated_extent
    }
}
