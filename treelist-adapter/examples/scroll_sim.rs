// Example: simulate a scroll session against the in-memory layout host.
use std::cell::RefCell;
use std::rc::Rc;

use treelist::{Axis, RenderContent, ScrollIntoViewOptions, TreeListOptions, VisibilityStrategy};
use treelist_adapter::{LayoutModel, ScrollDriver};

fn print_leaves(driver: &ScrollDriver, label: &str) {
    let mut items = Vec::new();
    let mut spacers = 0usize;
    driver.list().for_each_leaf(|_, content| match content {
        RenderContent::Item { index, .. } => items.push(*index),
        RenderContent::Placeholder { .. } => spacers += 1,
        RenderContent::Branch => {}
    });
    println!("{label}: items={items:?} spacers={spacers}");
}

fn main() {
    // 10k rows, estimated at 28px but really 24-44px tall.
    let layout = Rc::new(RefCell::new(LayoutModel::new(
        Axis::Vertical,
        240.0,
        800.0,
        |index| 24.0 + (index % 6) as f64 * 4.0,
    )));
    let options = TreeListOptions::new(10_000, 28.0)
        .with_overscan_items(3)
        .with_strategy(VisibilityStrategy::EventDriven);
    let mut driver = ScrollDriver::new(options, layout);

    println!("content_extent={}", driver.layout().borrow().content_extent());

    // Frames until the initial viewport settles.
    let mut now = driver.settle_frames(0, 16, 30);
    print_leaves(&driver, "initial");

    // The user drags a third of the way down.
    driver.on_scroll(90_000.0, now);
    now = driver.settle_frames(now, 16, 30);
    print_leaves(&driver, "after scroll");

    // Programmatic jump to a row that was never materialized.
    driver
        .scroll_to(9_500, ScrollIntoViewOptions::default())
        .unwrap();
    now = driver.settle_frames(now, 16, 60);
    print_leaves(&driver, "after scroll_to(9500)");
    println!("pending={:?}", driver.list().pending_scroll_to());

    // Persist the measurements gathered along the way.
    let snapshot = driver.list().export_extent_cache();
    println!("measured_spans={}", snapshot.len());
    let _ = now;
}
