//! Pure interval geometry: span splitting and the fractional-intersection
//! algebra that drives the range tree.

use crate::extent_cache::ExtentCache;
use crate::{Axis, Intersection, Rect, Span};

/// Splits a span into two contiguous halves, larger half first.
///
/// `top.count = ceil(count / 2)`, so the halves differ by at most one and the
/// recursion depth over any span is `O(log count)`.
pub fn split(span: Span) -> (Span, Span) {
    let top = span.count - span.count / 2;
    (
        Span::new(span.first_index, top),
        Span::new(span.first_index + top, span.count - top),
    )
}

/// Re-normalizes a parent intersection onto the two halves of a split.
///
/// `f` is the fraction of the parent's extent attributable to `top`, computed
/// from the best-known extents at call time. A visible window straddling the
/// split point contributes to both children; a child whose share is disjoint
/// from the window receives `None`.
///
/// Because the window is tracked as a fraction of an evolving, size-corrected
/// interval rather than in absolute pixels, replacing an estimate with a real
/// measurement mid-flight does not invalidate ancestor state.
pub fn propagate(
    parent: Option<Intersection>,
    top: Span,
    bottom: Span,
    cache: &ExtentCache,
) -> (Option<Intersection>, Option<Intersection>) {
    let Some(Intersection { from, to }) = parent else {
        return (None, None);
    };

    let top_extent = cache.extent_of(top);
    let bottom_extent = cache.extent_of(bottom);
    let f = top_extent / (top_extent + bottom_extent);
    let g = 1.0 - f;

    let top_part = (from <= f).then(|| Intersection {
        from: from / f,
        to: (to / f).min(1.0),
    });
    let bottom_part = (to > f).then(|| Intersection {
        from: ((from - f) / g).max(0.0),
        to: (to - f) / g,
    });
    (top_part, bottom_part)
}

/// Computes how much of `bounding` is covered by `viewport` along `axis`, as a
/// fraction of `bounding`'s own extent.
///
/// Returns `None` when the rects are disjoint on the axis, and for a
/// degenerate (zero or negative sized) target. Otherwise `from` is clamped to
/// `>= 0` and `to` capped at `1`.
pub fn intersection_fraction(bounding: Rect, viewport: Rect, axis: Axis) -> Option<Intersection> {
    let size = bounding.size(axis);
    if !size.is_finite() || size <= 0.0 {
        return None;
    }
    let from = (viewport.pos(axis) - bounding.pos(axis)) / size;
    let to = from + viewport.size(axis) / size;
    if to < 0.0 || from > 1.0 {
        return None;
    }
    Some(Intersection {
        from: from.max(0.0),
        to: to.min(1.0),
    })
}

/// Expands `rect` by `margin` on both sides of the active axis only.
pub fn expand_by_margin(rect: Rect, margin: f64, axis: Axis) -> Rect {
    let mut out = rect;
    match axis {
        Axis::Vertical => {
            out.y -= margin;
            out.height += 2.0 * margin;
        }
        Axis::Horizontal => {
            out.x -= margin;
            out.width += 2.0 * margin;
        }
    }
    out
}
