// Example: export and import the measured-extent cache.
use std::cell::RefCell;
use std::rc::Rc;

use treelist::{
    ElementId, ListHost, ObserverEntry, Rect, RenderContent, ScrollIntoViewOptions, TreeList,
    TreeListOptions,
};

struct NullHost;

impl ListHost for NullHost {
    fn mount(&mut self, _element: ElementId, _parent: Option<ElementId>) {}
    fn update(&mut self, _element: ElementId, _content: &RenderContent) {}
    fn unmount(&mut self, _element: ElementId) {}
    fn scroll_into_view(&mut self, _element: ElementId, _options: &ScrollIntoViewOptions) {}
}

fn main() {
    // Persisting the cache across mount cycles lets a fresh tree start with
    // the measured extents instead of estimates, which keeps scroll position
    // stable across screens/sessions.
    let host = Rc::new(RefCell::new(NullHost));
    let v1 = TreeList::new(TreeListOptions::new(200, 60.0), host.clone());

    // The host's observer reports the root wrapper at its real size.
    v1.deliver_intersections(&[ObserverEntry {
        element: ElementId(0),
        is_intersecting: true,
        bounding: Rect::new(0.0, 0.0, 800.0, 12_840.0),
        intersection: Rect::new(0.0, 0.0, 800.0, 600.0),
    }]);

    let snapshot = v1.export_extent_cache();
    println!("exported_cache_len={}", snapshot.len());
    drop(v1);

    let v2 = TreeList::new(
        TreeListOptions::new(200, 60.0).with_initial_extents(snapshot),
        host,
    );
    println!("restored total_extent={}", v2.total_extent());
}
