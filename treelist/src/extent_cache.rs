use alloc::vec::Vec;

use crate::Span;
use crate::key::SpanExtentMap;

/// Shared cache of measured extents, keyed by span.
///
/// Entries are created lazily by nodes that received a real measurement;
/// absence means "use `estimated_extent × count`". Fresher measurements
/// unconditionally overwrite older ones, and nothing is ever evicted during a
/// session — memory is bounded by the number of distinct spans the tree can
/// address, each holding a single scalar.
///
/// The whole tree reads through one cache instance; writes are
/// single-threaded and last-write-wins, so no locking is involved. Every
/// rendering decision must read the latest value rather than hold an extent
/// across rebuilds.
#[derive(Clone, Debug)]
pub struct ExtentCache {
    measured: SpanExtentMap,
    estimated_extent: f64,
}

impl ExtentCache {
    pub fn new(estimated_extent: f64) -> Self {
        debug_assert!(
            estimated_extent.is_finite() && estimated_extent > 0.0,
            "estimated_extent must be a positive finite number"
        );
        Self {
            measured: SpanExtentMap::new(),
            estimated_extent,
        }
    }

    pub fn estimated_extent(&self) -> f64 {
        self.estimated_extent
    }

    /// Returns the measured extent for `span`, if one was recorded.
    pub fn get(&self, span: Span) -> Option<f64> {
        self.measured.get(&span).copied()
    }

    /// Best-known extent for `span`: the measurement if present, otherwise
    /// `estimated_extent × count`.
    pub fn extent_of(&self, span: Span) -> f64 {
        match self.measured.get(&span) {
            Some(&measured) => measured,
            None => self.estimated_extent * span.count as f64,
        }
    }

    /// Records a measurement, overwriting any prior value for `span`.
    ///
    /// Degenerate measurements (non-finite, zero, or negative) are rejected
    /// and the prior estimate stays in effect. Returns whether the value was
    /// stored.
    pub fn set(&mut self, span: Span, extent: f64) -> bool {
        if !extent.is_finite() || extent <= 0.0 {
            vwarn!(
                first_index = span.first_index,
                count = span.count,
                extent,
                "ExtentCache: degenerate measurement ignored"
            );
            return false;
        }
        self.measured.insert(span, extent);
        true
    }

    /// Number of spans with a recorded measurement.
    pub fn len(&self) -> usize {
        self.measured.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measured.is_empty()
    }

    /// Iterates over the recorded measurements without allocating.
    pub fn for_each(&self, mut f: impl FnMut(Span, f64)) {
        for (span, extent) in self.measured.iter() {
            f(*span, *extent);
        }
    }

    /// Exports the recorded measurements as flat `(span, extent)` pairs.
    ///
    /// The snapshot round-trips through [`ExtentCache::import`] to reproduce
    /// placeholder extents across mount cycles without re-measuring.
    pub fn export(&self) -> Vec<(Span, f64)> {
        let mut out = Vec::with_capacity(self.measured.len());
        self.for_each(|span, extent| out.push((span, extent)));
        out
    }

    /// Replaces the recorded measurements from a snapshot.
    ///
    /// Degenerate entries are skipped with a warning, same as [`ExtentCache::set`].
    pub fn import(&mut self, entries: impl IntoIterator<Item = (Span, f64)>) {
        self.measured.clear();
        let mut n = 0usize;
        for (span, extent) in entries {
            if self.set(span, extent) {
                n += 1;
            }
        }
        vdebug!(entries = n, "ExtentCache::import");
    }
}
