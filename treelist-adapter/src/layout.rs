use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;

use treelist::{Align, Axis, ElementId, ListHost, Rect, RenderContent, ScrollIntoViewOptions};

struct LayoutNode {
    parent: Option<u64>,
    children: Vec<u64>,
    content: Option<RenderContent>,
}

/// An in-memory scroll container implementing the engine's host contract.
///
/// Elements stack along the active axis in mount order: a placeholder
/// occupies its given extent, an item occupies its *true* extent (from the
/// `item_extent` function, which is how measurements come to disagree with
/// the engine's estimates), and a branch occupies the sum of its children.
///
/// The model answers the rect queries the polling provider needs, and its
/// `scroll_into_view` applies [`Align`] semantics immediately (no animation;
/// the behavior hint is ignored).
pub struct LayoutModel {
    axis: Axis,
    viewport_extent: f64,
    cross_extent: f64,
    scroll_offset: f64,
    detached: bool,
    item_extent: Rc<dyn Fn(usize) -> f64>,
    nodes: BTreeMap<u64, LayoutNode>,
    roots: Vec<u64>,
    scroll_log: Vec<(ElementId, ScrollIntoViewOptions)>,
}

impl LayoutModel {
    pub fn new(
        axis: Axis,
        viewport_extent: f64,
        cross_extent: f64,
        item_extent: impl Fn(usize) -> f64 + 'static,
    ) -> Self {
        Self {
            axis,
            viewport_extent,
            cross_extent,
            scroll_offset: 0.0,
            detached: false,
            item_extent: Rc::new(item_extent),
            nodes: BTreeMap::new(),
            roots: Vec::new(),
            scroll_log: Vec::new(),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    pub fn set_viewport_extent(&mut self, viewport_extent: f64) {
        self.viewport_extent = viewport_extent;
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset.clamp(0.0, self.max_scroll_offset());
    }

    /// Simulates the container leaving the document: rect queries answer
    /// `None` and the polling provider degrades to a no-op.
    pub fn set_detached(&mut self, detached: bool) {
        self.detached = detached;
    }

    /// Total extent of the mounted content along the active axis.
    pub fn content_extent(&self) -> f64 {
        self.roots.iter().map(|&root| self.extent(root)).sum()
    }

    pub fn max_scroll_offset(&self) -> f64 {
        (self.content_extent() - self.viewport_extent).max(0.0)
    }

    /// Scroll-into-view calls recorded so far, in order.
    pub fn scroll_log(&self) -> &[(ElementId, ScrollIntoViewOptions)] {
        &self.scroll_log
    }

    pub fn for_each_element(&self, mut f: impl FnMut(ElementId)) {
        for &element in self.nodes.keys() {
            f(ElementId(element));
        }
    }

    pub fn contains_element(&self, element: ElementId) -> bool {
        self.nodes.contains_key(&element.0)
    }

    fn extent(&self, element: u64) -> f64 {
        let Some(node) = self.nodes.get(&element) else {
            return 0.0;
        };
        match node.content {
            Some(RenderContent::Placeholder { extent }) => extent,
            Some(RenderContent::Item { index, .. }) => (self.item_extent)(index),
            Some(RenderContent::Branch) => node
                .children
                .iter()
                .map(|&child| self.extent(child))
                .sum(),
            None => 0.0,
        }
    }

    /// Content-space start of an element along the active axis.
    fn content_start(&self, element: u64) -> f64 {
        let Some(node) = self.nodes.get(&element) else {
            return 0.0;
        };
        let (mut pos, siblings) = match node.parent {
            None => (0.0, &self.roots),
            Some(parent) => (
                self.content_start(parent),
                match self.nodes.get(&parent) {
                    Some(parent_node) => &parent_node.children,
                    None => return 0.0,
                },
            ),
        };
        for &sibling in siblings {
            if sibling == element {
                break;
            }
            pos += self.extent(sibling);
        }
        pos
    }

    fn scroll_target(&self, element: u64, align: Align) -> f64 {
        let start = self.content_start(element);
        let extent = self.extent(element);
        let end = start + extent;
        let view = self.viewport_extent;

        let target = match align {
            Align::Start => start,
            Align::End => end - view,
            Align::Center => start + extent / 2.0 - view / 2.0,
            Align::Auto => {
                let current = self.scroll_offset;
                let current_end = current + view;
                if start >= current && end <= current_end {
                    current
                } else if start < current {
                    start
                } else {
                    end - view
                }
            }
        };
        target.clamp(0.0, self.max_scroll_offset())
    }

    fn axis_rect(&self, pos: f64, size: f64) -> Rect {
        match self.axis {
            Axis::Vertical => Rect::new(0.0, pos, self.cross_extent, size),
            Axis::Horizontal => Rect::new(pos, 0.0, size, self.cross_extent),
        }
    }
}

impl ListHost for LayoutModel {
    fn mount(&mut self, element: ElementId, parent: Option<ElementId>) {
        self.nodes.insert(
            element.0,
            LayoutNode {
                parent: parent.map(|p| p.0),
                children: Vec::new(),
                content: None,
            },
        );
        match parent {
            None => self.roots.push(element.0),
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent.0) {
                    parent_node.children.push(element.0);
                }
            }
        }
    }

    fn update(&mut self, element: ElementId, content: &RenderContent) {
        if let Some(node) = self.nodes.get_mut(&element.0) {
            node.content = Some(*content);
        }
    }

    fn unmount(&mut self, element: ElementId) {
        let Some(node) = self.nodes.remove(&element.0) else {
            return;
        };
        match node.parent {
            None => self.roots.retain(|&root| root != element.0),
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|&child| child != element.0);
                }
            }
        }
    }

    fn scroll_into_view(&mut self, element: ElementId, options: &ScrollIntoViewOptions) {
        self.scroll_log.push((element, *options));
        self.scroll_offset = self.scroll_target(element.0, options.align);
    }

    fn container_rect(&self) -> Option<Rect> {
        if self.detached {
            return None;
        }
        Some(self.axis_rect(0.0, self.viewport_extent))
    }

    fn element_rect(&self, element: ElementId) -> Option<Rect> {
        if self.detached || !self.nodes.contains_key(&element.0) {
            return None;
        }
        let pos = self.content_start(element.0) - self.scroll_offset;
        Some(self.axis_rect(pos, self.extent(element.0)))
    }
}
