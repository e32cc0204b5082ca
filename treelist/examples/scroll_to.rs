// Example: programmatic scroll to an unmaterialized item.
use std::cell::RefCell;
use std::rc::Rc;

use treelist::{
    Align, ElementId, ListHost, RenderContent, ScrollBehavior, ScrollIntoViewOptions, TreeList,
    TreeListOptions,
};

struct PrintHost;

impl ListHost for PrintHost {
    fn mount(&mut self, _element: ElementId, _parent: Option<ElementId>) {}
    fn update(&mut self, _element: ElementId, _content: &RenderContent) {}
    fn unmount(&mut self, _element: ElementId) {}
    fn scroll_into_view(&mut self, element: ElementId, options: &ScrollIntoViewOptions) {
        println!("scroll_into_view: element {} ({:?})", element.0, options);
    }
}

fn main() {
    let host = Rc::new(RefCell::new(PrintHost));
    let list = TreeList::new(TreeListOptions::new(100_000, 40.0), host);

    // Index 73500 sits inside the root placeholder; the tree splits through
    // it down to the single-item leaf, which triggers the native action.
    let options = ScrollIntoViewOptions {
        behavior: ScrollBehavior::Smooth,
        align: Align::Start,
    };
    list.scroll_to(73_500, options).unwrap();
    println!("pending={:?}", list.pending_scroll_to());

    // The host drives the settle delay with its own clock.
    list.update_settle(0);
    list.update_settle(150);
    println!("after settle: pending={:?}", list.pending_scroll_to());

    println!(
        "out of range: {:?}",
        list.scroll_to(100_000, ScrollIntoViewOptions::default())
    );
}
