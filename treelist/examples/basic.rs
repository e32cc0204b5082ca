// Example: minimal usage with a synchronous first paint.
use std::cell::RefCell;
use std::rc::Rc;

use treelist::{ElementId, ListHost, RenderContent, TreeList, TreeListOptions};

struct PrintHost;

impl ListHost for PrintHost {
    fn mount(&mut self, _element: ElementId, _parent: Option<ElementId>) {}
    fn update(&mut self, _element: ElementId, _content: &RenderContent) {}
    fn unmount(&mut self, _element: ElementId) {}
    fn scroll_into_view(
        &mut self,
        element: ElementId,
        _options: &treelist::ScrollIntoViewOptions,
    ) {
        println!("scroll_into_view: element {}", element.0);
    }
}

fn main() {
    let host = Rc::new(RefCell::new(PrintHost));
    let options = TreeListOptions::new(1_000_000, 24.0).with_initial_in_view_count(30);
    let list = TreeList::new(options, host);

    println!("total_extent={}", list.total_extent());
    list.for_each_leaf(|span, content| match content {
        RenderContent::Item { index, .. } => println!("item {index}"),
        RenderContent::Placeholder { extent } => println!("spacer {span} ({extent}px)"),
        RenderContent::Branch => {}
    });
}
