use crate::{ElementId, Rect, ScrollIntoViewOptions};

/// What the host should currently render inside a mounted wrapper element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderContent {
    /// A spacer of the given extent along the active axis. This is the
    /// space-reservation mechanism keeping the total scrollable extent stable
    /// while the covered items stay unmaterialized.
    Placeholder { extent: f64 },
    /// The real item at `index`. `expected_extent` is the best-known extent
    /// along the active axis, for hosts that render a stand-in while data
    /// loads.
    Item { index: usize, expected_extent: f64 },
    /// A wrapper holding two child wrapper elements.
    Branch,
}

/// The rendering collaborator contract.
///
/// The engine is UI-agnostic: it mints [`ElementId`]s and tells the host what
/// to do with them; the host owns the actual visual elements. Children are
/// mounted under their parent in visual order (leading half first).
///
/// The rect queries are only exercised by the polling visibility provider.
/// Their `None` defaults are the correct answer for an event-driven host and
/// for a container that has left the document: absent geometry makes the
/// polling update a no-op rather than an error.
///
/// Contract: a host must not call back into the engine from inside any of
/// these methods. The engine runs on a single UI thread and never holds its
/// internal borrows across a host call, but re-entering mid-mutation is not
/// supported.
pub trait ListHost {
    /// Creates the visual wrapper for `element` under `parent` (`None` for
    /// the root wrapper). Content follows via [`ListHost::update`].
    fn mount(&mut self, element: ElementId, parent: Option<ElementId>);

    /// Replaces what `element` renders.
    fn update(&mut self, element: ElementId, content: &RenderContent);

    /// Removes the visual wrapper for `element`. Children are always
    /// unmounted before their parent.
    fn unmount(&mut self, element: ElementId);

    /// Performs the native scroll-into-view action for `element`.
    fn scroll_into_view(&mut self, element: ElementId, options: &ScrollIntoViewOptions);

    /// Bounding rect of the scroll container, if it is live.
    fn container_rect(&self) -> Option<Rect> {
        None
    }

    /// Bounding rect of a mounted element, if it is live.
    fn element_rect(&self, element: ElementId) -> Option<Rect> {
        let _ = element;
        None
    }
}
